//! Database operations for the `reviews` and `review_responses` tables.
//!
//! Reviews are create-if-absent by external id: sync never updates an
//! existing review's content, it only counts the match. A review is
//! `RESPONDED` if and only if a response row exists; [`respond_to_review`]
//! maintains that invariant transactionally.

use chrono::{DateTime, Utc};
use gbpdash_core::Sentiment;
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A review joined with its optional response sub-record.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReviewRow {
    pub id: i64,
    pub business_profile_id: i64,
    pub external_id: String,
    pub author_name: String,
    pub rating: i16,
    pub comment: Option<String>,
    pub sentiment: String,
    pub status: String,
    pub is_synthetic: bool,
    pub published_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub response_content: Option<String>,
    pub responded_at: Option<DateTime<Utc>>,
}

/// Values for a new review row.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub business_profile_id: i64,
    pub external_id: String,
    pub author_name: String,
    pub rating: i16,
    pub comment: Option<String>,
    pub sentiment: Sentiment,
    pub is_synthetic: bool,
    pub published_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Inserts a review only if no row with the same external id exists.
///
/// Returns `true` if a row was inserted, `false` if the external id was
/// already present (the existing row is left untouched).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_review_if_absent(pool: &PgPool, review: &NewReview) -> Result<bool, DbError> {
    let rows_affected = sqlx::query(
        "INSERT INTO reviews \
             (business_profile_id, external_id, author_name, rating, comment, \
              sentiment, status, is_synthetic, published_at) \
         VALUES ($1, $2, $3, $4, $5, $6, 'NEW', $7, $8) \
         ON CONFLICT (external_id) DO NOTHING",
    )
    .bind(review.business_profile_id)
    .bind(&review.external_id)
    .bind(&review.author_name)
    .bind(review.rating)
    .bind(&review.comment)
    .bind(review.sentiment.as_str())
    .bind(review.is_synthetic)
    .bind(review.published_at)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(rows_affected > 0)
}

/// Returns a profile's most recent reviews with their responses, newest
/// first by publish time.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_recent_reviews(
    pool: &PgPool,
    business_profile_id: i64,
    limit: i64,
) -> Result<Vec<ReviewRow>, DbError> {
    let rows = sqlx::query_as::<_, ReviewRow>(
        "SELECT r.id, r.business_profile_id, r.external_id, r.author_name, r.rating, \
                r.comment, r.sentiment, r.status, r.is_synthetic, r.published_at, \
                r.created_at, \
                resp.content AS response_content, resp.responded_at \
         FROM reviews r \
         LEFT JOIN review_responses resp ON resp.review_id = r.id \
         WHERE r.business_profile_id = $1 \
         ORDER BY r.published_at DESC \
         LIMIT $2",
    )
    .bind(business_profile_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Persists a response to a review and flips its status to `RESPONDED`, in
/// one transaction. Replacing an existing response keeps the invariant
/// intact.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if the review does not exist, or
/// [`DbError::Sqlx`] if either statement fails.
pub async fn respond_to_review(
    pool: &PgPool,
    review_id: i64,
    content: &str,
) -> Result<(), DbError> {
    let mut tx = pool.begin().await?;

    let updated = sqlx::query(
        "UPDATE reviews SET status = 'RESPONDED', updated_at = NOW() WHERE id = $1",
    )
    .bind(review_id)
    .execute(&mut *tx)
    .await?
    .rows_affected();

    if updated == 0 {
        return Err(DbError::NotFound);
    }

    sqlx::query(
        "INSERT INTO review_responses (review_id, content) \
         VALUES ($1, $2) \
         ON CONFLICT (review_id) DO UPDATE SET \
             content      = EXCLUDED.content, \
             responded_at = NOW()",
    )
    .bind(review_id)
    .bind(content)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}

/// Sets a review's workflow status to `NEW`, `FLAGGED`, or `ARCHIVED`.
///
/// `RESPONDED` is deliberately rejected here: that status only ever comes
/// from [`respond_to_review`], which also writes the response row.
///
/// # Errors
///
/// Returns [`DbError::InvalidStatus`] if the status is not an allowed
/// target, [`DbError::NotFound`] if the review does not exist, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn set_review_status(pool: &PgPool, review_id: i64, status: &str) -> Result<(), DbError> {
    if !matches!(status, "NEW" | "FLAGGED" | "ARCHIVED") {
        return Err(DbError::InvalidStatus(status.to_string()));
    }

    let result = sqlx::query(
        "UPDATE reviews SET status = $1, updated_at = NOW() WHERE id = $2",
    )
    .bind(status)
    .bind(review_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    Ok(())
}
