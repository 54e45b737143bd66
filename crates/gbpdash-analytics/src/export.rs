//! Two-column delimited export of the overview metrics.

use sqlx::PgPool;
use uuid::Uuid;

use gbpdash_core::Period;

use crate::service::get_analytics_data;
use crate::types::OverviewMetrics;
use crate::AnalyticsError;

/// Runs the snapshot aggregation and renders the overview section as a
/// two-column CSV table. Trends and comparisons are not exported.
///
/// # Errors
///
/// Propagates [`AnalyticsError`] from the underlying aggregation.
pub async fn export_analytics_data(
    pool: &PgPool,
    user_public_id: Uuid,
    period: Period,
    business_profile_id: Option<i64>,
) -> Result<String, AnalyticsError> {
    let snapshot = get_analytics_data(pool, user_public_id, period, business_profile_id).await?;
    Ok(render_overview_csv(&snapshot.overview))
}

/// Renders the overview metrics as `Metric,Value` lines.
#[must_use]
pub fn render_overview_csv(overview: &OverviewMetrics) -> String {
    let mut out = String::from("Metric,Value\n");
    let rows: [(&str, String); 10] = [
        ("Total Views", overview.total_views.to_string()),
        ("Total Searches", overview.total_searches.to_string()),
        ("Website Clicks", overview.website_clicks.to_string()),
        ("Phone Clicks", overview.phone_clicks.to_string()),
        ("Direction Requests", overview.direction_requests.to_string()),
        ("Photo Views", overview.photo_views.to_string()),
        ("Posts", overview.post_count.to_string()),
        ("Answered Questions", overview.answered_question_count.to_string()),
        ("Reviews", overview.review_count.to_string()),
        ("Average Rating", format!("{:.2}", overview.average_rating)),
    ];
    for (name, value) in rows {
        out.push_str(name);
        out.push(',');
        out.push_str(&value);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_every_overview_metric_as_a_row() {
        let overview = OverviewMetrics {
            total_views: 180,
            total_searches: 48,
            website_clicks: 12,
            phone_clicks: 6,
            direction_requests: 3,
            photo_views: 60,
            post_count: 4,
            answered_question_count: 2,
            review_count: 3,
            average_rating: 11.0 / 3.0,
        };

        let csv = render_overview_csv(&overview);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[0], "Metric,Value");
        assert_eq!(lines[1], "Total Views,180");
        assert_eq!(lines[10], "Average Rating,3.67");
    }

    #[test]
    fn zeroed_overview_still_renders_cleanly() {
        let csv = render_overview_csv(&OverviewMetrics::default());
        assert!(csv.contains("Total Views,0\n"));
        assert!(csv.contains("Average Rating,0.00\n"));
    }
}
