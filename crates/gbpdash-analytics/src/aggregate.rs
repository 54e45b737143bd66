//! Pure aggregation over loaded profile data.
//!
//! Everything here is read-only and deterministic: the service layer loads
//! rows, these functions fold them into the snapshot. "No data" always
//! yields zeroed or empty structures, never an error.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use gbpdash_core::{short_date_label, truncate_with_ellipsis, Period};

use crate::types::{
    AnalyticsSnapshot, LocationComparison, OverviewMetrics, ProfileData, RecentReview, TopPost,
    TrendPoint, TrendSeries,
};

/// Content truncation width for top-performing posts.
const POST_CONTENT_CHARS: usize = 100;
/// Content truncation width for the recent-review feed.
const REVIEW_COMMENT_CHARS: usize = 150;
/// Number of entries in the top-performing post list.
const TOP_POSTS: usize = 5;
/// Number of entries in the recent-review feed.
const RECENT_REVIEWS: usize = 5;

/// Folds the loaded profile data into a full snapshot.
#[must_use]
pub fn build_snapshot(
    period: Period,
    start_date: NaiveDate,
    end_date: NaiveDate,
    data: &[ProfileData],
) -> AnalyticsSnapshot {
    AnalyticsSnapshot {
        period,
        start_date,
        end_date,
        overview: overview_metrics(data),
        trends: trend_series(data),
        locations: location_comparisons(data),
        top_posts: top_posts(data),
        recent_reviews: recent_reviews(data),
    }
}

/// Sums every insight metric across all profiles and days, plus loaded
/// post/question/review counts and the global average rating.
///
/// The average is (sum of all ratings) / (count of all loaded reviews):
/// profiles with more loaded reviews weight the result more heavily. That is
/// deliberate, not an average of per-profile averages.
#[must_use]
pub fn overview_metrics(data: &[ProfileData]) -> OverviewMetrics {
    let mut overview = OverviewMetrics::default();
    let mut rating_sum: i64 = 0;

    for profile_data in data {
        for insight in &profile_data.insights {
            overview.total_views += insight.views();
            overview.total_searches += insight.searches();
            overview.website_clicks += insight.website_clicks;
            overview.phone_clicks += insight.phone_clicks;
            overview.direction_requests += insight.direction_requests;
            overview.photo_views += insight.photo_views;
        }
        overview.post_count += profile_data.posts.len();
        overview.answered_question_count += profile_data.questions.len();
        overview.review_count += profile_data.reviews.len();
        rating_sum += profile_data
            .reviews
            .iter()
            .map(|r| i64::from(r.rating))
            .sum::<i64>();
    }

    overview.average_rating = average(rating_sum, overview.review_count);
    overview
}

/// Groups insight rows by calendar date across all profiles (same-day rows
/// from different profiles merge) and emits three parallel day-ordered
/// series. Days without rows produce no point.
#[must_use]
pub fn trend_series(data: &[ProfileData]) -> TrendSeries {
    let mut by_date: BTreeMap<NaiveDate, (i64, i64, i64)> = BTreeMap::new();

    for profile_data in data {
        for insight in &profile_data.insights {
            let entry = by_date.entry(insight.date).or_insert((0, 0, 0));
            entry.0 += insight.views();
            entry.1 += insight.searches();
            entry.2 += insight.actions();
        }
    }

    let mut series = TrendSeries::default();
    for (date, (views, searches, actions)) in by_date {
        let label = short_date_label(date);
        series.views.push(TrendPoint {
            date,
            label: label.clone(),
            value: views,
        });
        series.searches.push(TrendPoint {
            date,
            label: label.clone(),
            value: searches,
        });
        series.actions.push(TrendPoint {
            date,
            label,
            value: actions,
        });
    }
    series
}

/// One comparison row per profile, with sums and an average rating computed
/// only from that profile's own loaded reviews.
#[must_use]
pub fn location_comparisons(data: &[ProfileData]) -> Vec<LocationComparison> {
    data.iter()
        .map(|profile_data| {
            let mut row = LocationComparison {
                profile_id: profile_data.profile.id,
                name: profile_data.profile.name.clone(),
                views: 0,
                searches: 0,
                website_clicks: 0,
                phone_clicks: 0,
                direction_requests: 0,
                photo_views: 0,
                review_count: profile_data.reviews.len(),
                average_rating: 0.0,
            };
            for insight in &profile_data.insights {
                row.views += insight.views();
                row.searches += insight.searches();
                row.website_clicks += insight.website_clicks;
                row.phone_clicks += insight.phone_clicks;
                row.direction_requests += insight.direction_requests;
                row.photo_views += insight.photo_views;
            }
            let rating_sum: i64 = profile_data
                .reviews
                .iter()
                .map(|r| i64::from(r.rating))
                .sum();
            row.average_rating = average(rating_sum, row.review_count);
            row
        })
        .collect()
}

/// Flattens posts across profiles, keeps only those with a metrics
/// sub-record, and returns the top 5 by views + clicks, descending.
#[must_use]
pub fn top_posts(data: &[ProfileData]) -> Vec<TopPost> {
    let mut candidates: Vec<TopPost> = data
        .iter()
        .flat_map(|profile_data| {
            profile_data
                .posts
                .iter()
                .filter(|p| p.has_metrics())
                .map(|p| TopPost {
                    post_id: p.id,
                    profile_id: p.business_profile_id,
                    content: truncate_with_ellipsis(&p.content, POST_CONTENT_CHARS),
                    views: p.metric_views.unwrap_or(0),
                    clicks: p.metric_clicks.unwrap_or(0),
                    score: p.performance_score(),
                })
        })
        .collect();

    candidates.sort_by_key(|p| std::cmp::Reverse(p.score));
    candidates.truncate(TOP_POSTS);
    candidates
}

/// Flattens reviews across profiles and returns the 5 most recent by
/// publish timestamp.
#[must_use]
pub fn recent_reviews(data: &[ProfileData]) -> Vec<RecentReview> {
    let mut all: Vec<RecentReview> = data
        .iter()
        .flat_map(|profile_data| {
            profile_data.reviews.iter().map(|r| RecentReview {
                review_id: r.id,
                profile_id: r.business_profile_id,
                author_name: r.author_name.clone(),
                rating: r.rating,
                sentiment: r.sentiment.clone(),
                comment: r
                    .comment
                    .as_deref()
                    .map(|c| truncate_with_ellipsis(c, REVIEW_COMMENT_CHARS)),
                is_synthetic: r.is_synthetic,
                published_at: r.published_at,
            })
        })
        .collect();

    all.sort_by_key(|r| std::cmp::Reverse(r.published_at));
    all.truncate(RECENT_REVIEWS);
    all
}

#[allow(clippy::cast_precision_loss)] // rating sums stay far below 2^52
fn average(sum: i64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    sum as f64 / count as f64
}
