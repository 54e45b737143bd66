//! Shared configuration and domain vocabulary for the gbpdash workspace.

use thiserror::Error;

pub mod app_config;
pub mod config;
pub mod domain;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use domain::{
    sentiment_from_rating, short_date_label, truncate_with_ellipsis, Period, Sentiment,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
