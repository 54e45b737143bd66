//! Output types for the analytics snapshot.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use gbpdash_core::Period;
use gbpdash_db::{BusinessProfileRow, InsightRow, PostRow, QuestionRow, ReviewRow};

/// Everything loaded for one selected profile, as consumed by the
/// aggregation functions.
#[derive(Debug)]
pub struct ProfileData {
    pub profile: BusinessProfileRow,
    pub insights: Vec<InsightRow>,
    pub posts: Vec<PostRow>,
    pub reviews: Vec<ReviewRow>,
    pub questions: Vec<QuestionRow>,
}

/// Point-in-time analytics snapshot for one organization.
#[derive(Debug, Serialize)]
pub struct AnalyticsSnapshot {
    pub period: Period,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub overview: OverviewMetrics,
    pub trends: TrendSeries,
    pub locations: Vec<LocationComparison>,
    pub top_posts: Vec<TopPost>,
    pub recent_reviews: Vec<RecentReview>,
}

/// Summed metrics across all selected profiles and all days in range.
///
/// `average_rating` is a global average weighted by review count, not an
/// average of per-profile averages; `0.0` when no reviews were loaded.
#[derive(Debug, Default, Serialize, PartialEq)]
pub struct OverviewMetrics {
    pub total_views: i64,
    pub total_searches: i64,
    pub website_clicks: i64,
    pub phone_clicks: i64,
    pub direction_requests: i64,
    pub photo_views: i64,
    pub post_count: usize,
    pub answered_question_count: usize,
    pub review_count: usize,
    pub average_rating: f64,
}

/// One point in a day-ordered trend series.
#[derive(Debug, Serialize, PartialEq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    /// Short human label, e.g. `"Jan 5"`.
    pub label: String,
    pub value: i64,
}

/// Three parallel day-ordered series. Days with no insight rows produce no
/// point: the series are sparse, not zero-filled.
#[derive(Debug, Default, Serialize)]
pub struct TrendSeries {
    pub views: Vec<TrendPoint>,
    pub searches: Vec<TrendPoint>,
    /// Combined customer actions: website + phone + direction sums.
    pub actions: Vec<TrendPoint>,
}

/// Per-profile summed metrics, independent of the merged trend series.
#[derive(Debug, Serialize)]
pub struct LocationComparison {
    pub profile_id: i64,
    pub name: String,
    pub views: i64,
    pub searches: i64,
    pub website_clicks: i64,
    pub phone_clicks: i64,
    pub direction_requests: i64,
    pub photo_views: i64,
    pub review_count: usize,
    /// Average over this profile's loaded reviews only; `0.0` when none.
    pub average_rating: f64,
}

/// One entry in the top-performing content list.
#[derive(Debug, Serialize)]
pub struct TopPost {
    pub post_id: i64,
    pub profile_id: i64,
    /// Truncated to 100 characters with an ellipsis marker when longer.
    pub content: String,
    pub views: i64,
    pub clicks: i64,
    /// Ranking score: views + clicks.
    pub score: i64,
}

/// One entry in the recent-activity review feed.
#[derive(Debug, Serialize)]
pub struct RecentReview {
    pub review_id: i64,
    pub profile_id: i64,
    pub author_name: String,
    pub rating: i16,
    pub sentiment: String,
    /// Truncated to 150 characters with an ellipsis marker when longer.
    pub comment: Option<String>,
    pub is_synthetic: bool,
    pub published_at: DateTime<Utc>,
}
