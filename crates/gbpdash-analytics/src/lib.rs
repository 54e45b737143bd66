//! Analytics aggregation: folds stored insight, post, review, and question
//! rows into per-organization dashboard snapshots.
//!
//! The heavy lifting lives in [`aggregate`], which is pure and fully unit
//! tested; [`service`] only resolves scope and loads rows.

pub mod aggregate;
mod error;
pub mod export;
pub mod service;
pub mod types;

pub use error::AnalyticsError;
pub use export::{export_analytics_data, render_overview_csv};
pub use service::get_analytics_data;
pub use types::{
    AnalyticsSnapshot, LocationComparison, OverviewMetrics, ProfileData, RecentReview, TopPost,
    TrendPoint, TrendSeries,
};
