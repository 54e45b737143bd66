//! Synchronization engine: reconciles remote directory state into the
//! record store.
//!
//! All sync passes share the same failure semantics: a single item's failure
//! is caught, logged, and skipped rather than aborting siblings; writes that
//! committed before a later failure stay committed. Idempotency comes from
//! the store's unique keys (external id for profiles and reviews, the
//! (profile, date, period) triple for insights), so re-running a pass is
//! always safe. No ordering is guaranteed across concurrent invocations.

mod error;
pub mod insights;
pub mod profiles;
pub mod reviews;

pub use error::SyncError;
pub use insights::{backfill_insights, BackfillReport, BACKFILL_DAYS};
pub use profiles::{sync_business_profiles, ProfileSyncReport};
pub use reviews::{sync_reviews, ReviewSyncOutcome};
