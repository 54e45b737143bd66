//! Database operations for the `posts` and `post_metrics` tables.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A post joined with its optional metrics sub-record.
///
/// The metric columns come from a LEFT JOIN against `post_metrics`; a post
/// that has never accumulated metrics carries `None` in all three.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRow {
    pub id: i64,
    pub public_id: Uuid,
    pub business_profile_id: i64,
    pub title: Option<String>,
    pub content: String,
    pub status: String,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub published_at: Option<DateTime<Utc>>,
    pub image_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub metric_views: Option<i64>,
    pub metric_clicks: Option<i64>,
    pub metric_engagement: Option<i64>,
}

impl PostRow {
    /// True when a metrics sub-record exists for this post.
    #[must_use]
    pub fn has_metrics(&self) -> bool {
        self.metric_views.is_some()
    }

    /// Ranking score for top-performing content: views + clicks.
    #[must_use]
    pub fn performance_score(&self) -> i64 {
        self.metric_views.unwrap_or(0) + self.metric_clicks.unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns a profile's most recent posts with their metrics, newest first.
///
/// Ordered by publish time falling back to creation time, so drafts sort by
/// when they were written.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_recent_posts(
    pool: &PgPool,
    business_profile_id: i64,
    limit: i64,
) -> Result<Vec<PostRow>, DbError> {
    let rows = sqlx::query_as::<_, PostRow>(
        "SELECT p.id, p.public_id, p.business_profile_id, p.title, p.content, p.status, \
                p.scheduled_at, p.published_at, p.image_urls, p.created_at, \
                m.views AS metric_views, m.clicks AS metric_clicks, \
                m.engagement AS metric_engagement \
         FROM posts p \
         LEFT JOIN post_metrics m ON m.post_id = p.id \
         WHERE p.business_profile_id = $1 AND p.status <> 'DELETED' \
         ORDER BY COALESCE(p.published_at, p.created_at) DESC \
         LIMIT $2",
    )
    .bind(business_profile_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Creates a post and returns its internal id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn create_post(
    pool: &PgPool,
    business_profile_id: i64,
    title: Option<&str>,
    content: &str,
    status: &str,
    published_at: Option<DateTime<Utc>>,
) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO posts (business_profile_id, title, content, status, published_at) \
         VALUES ($1, $2, $3, $4, $5) \
         RETURNING id",
    )
    .bind(business_profile_id)
    .bind(title)
    .bind(content)
    .bind(status)
    .bind(published_at)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Upserts the metrics sub-record for a post.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_post_metrics(
    pool: &PgPool,
    post_id: i64,
    views: i64,
    clicks: i64,
    engagement: i64,
) -> Result<(), DbError> {
    sqlx::query(
        "INSERT INTO post_metrics (post_id, views, clicks, engagement) \
         VALUES ($1, $2, $3, $4) \
         ON CONFLICT (post_id) DO UPDATE SET \
             views      = EXCLUDED.views, \
             clicks     = EXCLUDED.clicks, \
             engagement = EXCLUDED.engagement, \
             updated_at = NOW()",
    )
    .bind(post_id)
    .bind(views)
    .bind(clicks)
    .bind(engagement)
    .execute(pool)
    .await?;

    Ok(())
}
