//! Database operations for the `insights` table.
//!
//! One row per (profile, date, period), enforced by a unique constraint in
//! the schema — not just application logic — so concurrent backfills at
//! worst do redundant work. Rows are written by sync/backfill and read-only
//! for the aggregation engine.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `insights` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InsightRow {
    pub id: i64,
    pub business_profile_id: i64,
    pub date: NaiveDate,
    pub period: String,
    pub views_search: i64,
    pub views_maps: i64,
    pub queries_direct: i64,
    pub queries_discovery: i64,
    pub queries_branded: i64,
    pub website_clicks: i64,
    pub phone_clicks: i64,
    pub direction_requests: i64,
    pub photo_views: i64,
    pub is_synthetic: bool,
    pub created_at: DateTime<Utc>,
}

impl InsightRow {
    /// Total profile views (search + maps surfaces).
    #[must_use]
    pub fn views(&self) -> i64 {
        self.views_search + self.views_maps
    }

    /// Total searches (direct + discovery + branded).
    #[must_use]
    pub fn searches(&self) -> i64 {
        self.queries_direct + self.queries_discovery + self.queries_branded
    }

    /// Combined customer actions (website + phone + directions).
    #[must_use]
    pub fn actions(&self) -> i64 {
        self.website_clicks + self.phone_clicks + self.direction_requests
    }
}

/// Values for a new insight row.
#[derive(Debug, Clone)]
pub struct NewInsight {
    pub business_profile_id: i64,
    pub date: NaiveDate,
    pub period: String,
    pub views_search: i64,
    pub views_maps: i64,
    pub queries_direct: i64,
    pub queries_discovery: i64,
    pub queries_branded: i64,
    pub website_clicks: i64,
    pub phone_clicks: i64,
    pub direction_requests: i64,
    pub photo_views: i64,
    pub is_synthetic: bool,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Inserts an insight row only if no row exists for the same
/// (profile, date, period) key. Existing rows are never overwritten.
///
/// Returns `true` if a row was inserted, `false` if the key was taken.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_insight_if_absent(
    pool: &PgPool,
    insight: &NewInsight,
) -> Result<bool, DbError> {
    let rows_affected = sqlx::query(
        "INSERT INTO insights \
             (business_profile_id, date, period, views_search, views_maps, \
              queries_direct, queries_discovery, queries_branded, \
              website_clicks, phone_clicks, direction_requests, photo_views, \
              is_synthetic) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
         ON CONFLICT (business_profile_id, date, period) DO NOTHING",
    )
    .bind(insight.business_profile_id)
    .bind(insight.date)
    .bind(&insight.period)
    .bind(insight.views_search)
    .bind(insight.views_maps)
    .bind(insight.queries_direct)
    .bind(insight.queries_discovery)
    .bind(insight.queries_branded)
    .bind(insight.website_clicks)
    .bind(insight.phone_clicks)
    .bind(insight.direction_requests)
    .bind(insight.photo_views)
    .bind(insight.is_synthetic)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(rows_affected > 0)
}

/// Returns a profile's daily insight rows within a closed date range,
/// ordered by date.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_insights_for_profile(
    pool: &PgPool,
    business_profile_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<InsightRow>, DbError> {
    let rows = sqlx::query_as::<_, InsightRow>(
        "SELECT id, business_profile_id, date, period, views_search, views_maps, \
                queries_direct, queries_discovery, queries_branded, \
                website_clicks, phone_clicks, direction_requests, photo_views, \
                is_synthetic, created_at \
         FROM insights \
         WHERE business_profile_id = $1 AND period = 'DAILY' \
           AND date BETWEEN $2 AND $3 \
         ORDER BY date",
    )
    .bind(business_profile_id)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
