use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by the synchronization engine.
///
/// Per-item failures inside a sync pass are logged and counted, never
/// propagated; these variants cover the cases where the operation cannot
/// produce any usable result at all.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The user does not exist or belongs to no organization. Surfaced as
    /// not-found without distinguishing the two cases.
    #[error("no organization found for user {0}")]
    OrganizationNotFound(Uuid),

    /// The profile does not exist or belongs to another organization.
    #[error("business profile {0} not found")]
    ProfileNotFound(i64),

    #[error(transparent)]
    Directory(#[from] gbpdash_directory::DirectoryError),

    #[error(transparent)]
    Db(#[from] gbpdash_db::DbError),
}
