//! Typed client for the external business directory API.
//!
//! One implementation, one transport: a single `reqwest`-backed client with
//! a test-injectable base URL. Consumers treat the remote as unreliable,
//! rate-limited, and schema-drifting; every failure is classified into a
//! [`DirectoryError`] category the caller can act on.

mod client;
mod error;
pub mod types;

pub use client::DirectoryClient;
pub use error::DirectoryError;
pub use types::{
    Account, ListReviewsResponse, LocationDetail, LocationSummary, RemoteReview, Reviewer,
    ReviewReply, StarRating,
};
