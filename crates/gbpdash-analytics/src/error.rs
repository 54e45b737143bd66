use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("no organization found for user {0}")]
    OrganizationNotFound(Uuid),
    #[error("business profile {0} not found in this organization")]
    ProfileNotFound(i64),
    #[error(transparent)]
    Db(#[from] gbpdash_db::DbError),
}
