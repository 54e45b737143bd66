//! Database operations for the `organizations` and `users` tables.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `organizations` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrganizationRow {
    pub id: i64,
    pub public_id: Uuid,
    pub name: String,
    pub timezone: String,
    pub locale: String,
    /// Settings bag (notification flags and similar tenant preferences).
    pub settings: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A row from the `users` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: i64,
    pub public_id: Uuid,
    pub organization_id: i64,
    pub email: String,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns one organization by internal id, or `None` if not found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_organization(
    pool: &PgPool,
    organization_id: i64,
) -> Result<Option<OrganizationRow>, DbError> {
    let row = sqlx::query_as::<_, OrganizationRow>(
        "SELECT id, public_id, name, timezone, locale, settings, created_at, updated_at \
         FROM organizations \
         WHERE id = $1",
    )
    .bind(organization_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Resolves the organization a user belongs to, by the user's public id.
///
/// Returns `None` when the user does not exist; callers treat that the same
/// as an unknown organization.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_organization_for_user(
    pool: &PgPool,
    user_public_id: Uuid,
) -> Result<Option<OrganizationRow>, DbError> {
    let row = sqlx::query_as::<_, OrganizationRow>(
        "SELECT o.id, o.public_id, o.name, o.timezone, o.locale, o.settings, \
                o.created_at, o.updated_at \
         FROM organizations o \
         JOIN users u ON u.organization_id = o.id \
         WHERE u.public_id = $1",
    )
    .bind(user_public_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Creates a new organization and returns the full inserted row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn create_organization(
    pool: &PgPool,
    name: &str,
    timezone: &str,
    locale: &str,
) -> Result<OrganizationRow, DbError> {
    let row = sqlx::query_as::<_, OrganizationRow>(
        "INSERT INTO organizations (name, timezone, locale) \
         VALUES ($1, $2, $3) \
         RETURNING id, public_id, name, timezone, locale, settings, created_at, updated_at",
    )
    .bind(name)
    .bind(timezone)
    .bind(locale)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Creates a new user under an organization and returns the full inserted row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails (including a duplicate email).
pub async fn create_user(
    pool: &PgPool,
    organization_id: i64,
    email: &str,
    display_name: Option<&str>,
) -> Result<UserRow, DbError> {
    let row = sqlx::query_as::<_, UserRow>(
        "INSERT INTO users (organization_id, email, display_name) \
         VALUES ($1, $2, $3) \
         RETURNING id, public_id, organization_id, email, display_name, created_at",
    )
    .bind(organization_id)
    .bind(email)
    .bind(display_name)
    .fetch_one(pool)
    .await?;

    Ok(row)
}
