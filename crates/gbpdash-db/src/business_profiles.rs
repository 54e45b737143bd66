//! Database operations for the `business_profiles` table.
//!
//! Profiles are keyed by `external_id`, the immutable hierarchical resource
//! name from the remote directory. The sync engine upserts on that key;
//! rows are never hard-deleted during sync, only via
//! [`delete_business_profile`] on explicit user action.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `business_profiles` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BusinessProfileRow {
    pub id: i64,
    pub public_id: Uuid,
    pub organization_id: i64,
    pub external_id: String,
    pub name: String,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub address_lines: Vec<String>,
    pub locality: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country_code: Option<String>,
    pub categories: Vec<String>,
    /// Free-form attribute bag from the remote directory.
    pub attributes: serde_json::Value,
    /// Typed opt-in flag for aggregate reporting. Profiles with this unset
    /// contribute nothing to analytics output.
    pub selected_for_analytics: bool,
    pub is_verified: bool,
    pub status: String,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Mutable fields written by the sync engine on every pass.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpsert {
    pub external_id: String,
    pub name: String,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub address_lines: Vec<String>,
    pub locality: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
    pub country_code: Option<String>,
    pub categories: Vec<String>,
    pub attributes: serde_json::Value,
    pub is_verified: bool,
}

const PROFILE_COLUMNS: &str = "id, public_id, organization_id, external_id, name, description, \
     phone, website, address_lines, locality, region, postal_code, country_code, categories, \
     attributes, selected_for_analytics, is_verified, status, last_synced_at, \
     created_at, updated_at";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Upserts a business profile by its immutable external id.
///
/// A conflict on `external_id` updates the mutable fields and advances
/// `last_synced_at`/`updated_at`; `organization_id`, `status`,
/// `selected_for_analytics`, and `created_at` are left untouched. A fresh
/// insert lands with status `ACTIVE`.
///
/// Returns the upserted row plus `true` when a new row was inserted.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_business_profile(
    pool: &PgPool,
    organization_id: i64,
    profile: &ProfileUpsert,
) -> Result<(BusinessProfileRow, bool), DbError> {
    // xmax = 0 only on freshly inserted tuples; used to report insert vs update.
    let sql = format!(
        "INSERT INTO business_profiles \
             (organization_id, external_id, name, description, phone, website, \
              address_lines, locality, region, postal_code, country_code, \
              categories, attributes, is_verified, status, last_synced_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13::jsonb, $14, \
                 'ACTIVE', NOW()) \
         ON CONFLICT (external_id) DO UPDATE SET \
             name           = EXCLUDED.name, \
             description    = EXCLUDED.description, \
             phone          = EXCLUDED.phone, \
             website        = EXCLUDED.website, \
             address_lines  = EXCLUDED.address_lines, \
             locality       = EXCLUDED.locality, \
             region         = EXCLUDED.region, \
             postal_code    = EXCLUDED.postal_code, \
             country_code   = EXCLUDED.country_code, \
             categories     = EXCLUDED.categories, \
             attributes     = EXCLUDED.attributes, \
             is_verified    = EXCLUDED.is_verified, \
             last_synced_at = NOW(), \
             updated_at     = NOW() \
         RETURNING {PROFILE_COLUMNS}, (xmax = 0) AS inserted"
    );

    #[derive(sqlx::FromRow)]
    struct UpsertResult {
        #[sqlx(flatten)]
        row: BusinessProfileRow,
        inserted: bool,
    }

    let result = sqlx::query_as::<_, UpsertResult>(&sql)
        .bind(organization_id)
        .bind(&profile.external_id)
        .bind(&profile.name)
        .bind(&profile.description)
        .bind(&profile.phone)
        .bind(&profile.website)
        .bind(&profile.address_lines)
        .bind(&profile.locality)
        .bind(&profile.region)
        .bind(&profile.postal_code)
        .bind(&profile.country_code)
        .bind(&profile.categories)
        .bind(&profile.attributes)
        .bind(profile.is_verified)
        .fetch_one(pool)
        .await?;

    Ok((result.row, result.inserted))
}

/// Returns all profiles owned by an organization, ordered by name.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_profiles_for_org(
    pool: &PgPool,
    organization_id: i64,
) -> Result<Vec<BusinessProfileRow>, DbError> {
    let sql = format!(
        "SELECT {PROFILE_COLUMNS} FROM business_profiles \
         WHERE organization_id = $1 \
         ORDER BY name"
    );
    let rows = sqlx::query_as::<_, BusinessProfileRow>(&sql)
        .bind(organization_id)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Returns the organization's profiles that are opted in to aggregate
/// reporting, ordered by name.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_selected_profiles_for_org(
    pool: &PgPool,
    organization_id: i64,
) -> Result<Vec<BusinessProfileRow>, DbError> {
    let sql = format!(
        "SELECT {PROFILE_COLUMNS} FROM business_profiles \
         WHERE organization_id = $1 AND selected_for_analytics = TRUE \
         ORDER BY name"
    );
    let rows = sqlx::query_as::<_, BusinessProfileRow>(&sql)
        .bind(organization_id)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Returns one profile scoped to an organization, or `None`.
///
/// A profile that exists but belongs to a different organization is reported
/// as `None`, indistinguishable from a missing row.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_profile_for_org(
    pool: &PgPool,
    organization_id: i64,
    profile_id: i64,
) -> Result<Option<BusinessProfileRow>, DbError> {
    let sql = format!(
        "SELECT {PROFILE_COLUMNS} FROM business_profiles \
         WHERE id = $1 AND organization_id = $2"
    );
    let row = sqlx::query_as::<_, BusinessProfileRow>(&sql)
        .bind(profile_id)
        .bind(organization_id)
        .fetch_optional(pool)
        .await?;

    Ok(row)
}

/// Sets the analytics opt-in flag for one profile.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the profile does not exist, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn set_selected_for_analytics(
    pool: &PgPool,
    profile_id: i64,
    selected: bool,
) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE business_profiles \
         SET selected_for_analytics = $1, updated_at = NOW() \
         WHERE id = $2",
    )
    .bind(selected)
    .bind(profile_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    Ok(())
}

/// Hard-deletes a profile on explicit user action; all child rows (insights,
/// posts, reviews, questions) cascade.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the profile does not exist, or
/// [`DbError::Sqlx`] if the delete fails.
pub async fn delete_business_profile(pool: &PgPool, profile_id: i64) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM business_profiles WHERE id = $1")
        .bind(profile_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    Ok(())
}
