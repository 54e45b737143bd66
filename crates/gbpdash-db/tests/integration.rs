//! Offline unit tests for gbpdash-db pool configuration and row types.
//! These tests do not require a live database connection.

use chrono::{NaiveDate, Utc};
use gbpdash_core::{AppConfig, Environment};
use gbpdash_db::{InsightRow, PoolConfig, PostRow, ReviewRow};
use uuid::Uuid;

#[test]
fn pool_config_from_app_config_uses_core_values() {
    let app_config = AppConfig {
        database_url: "postgres://example".to_string(),
        env: Environment::Test,
        log_level: "info".to_string(),
        directory_access_token: None,
        directory_base_url: "https://example.com/v1/".to_string(),
        directory_reviews_base_url: "https://example.com/v4/".to_string(),
        db_max_connections: 42,
        db_min_connections: 7,
        db_acquire_timeout_secs: 9,
        directory_request_timeout_secs: 30,
        directory_user_agent: "ua".to_string(),
        sync_max_concurrent_locations: 1,
    };

    let pool_config = PoolConfig::from_app_config(&app_config);
    assert_eq!(pool_config.max_connections, 42);
    assert_eq!(pool_config.min_connections, 7);
    assert_eq!(pool_config.acquire_timeout_secs, 9);
}

fn insight_row(views_search: i64, views_maps: i64) -> InsightRow {
    InsightRow {
        id: 1,
        business_profile_id: 10,
        date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
        period: "DAILY".to_string(),
        views_search,
        views_maps,
        queries_direct: 30,
        queries_discovery: 20,
        queries_branded: 10,
        website_clicks: 5,
        phone_clicks: 3,
        direction_requests: 2,
        photo_views: 50,
        is_synthetic: false,
        created_at: Utc::now(),
    }
}

#[test]
fn insight_row_derived_totals() {
    let row = insight_row(100, 40);
    assert_eq!(row.views(), 140);
    assert_eq!(row.searches(), 60);
    assert_eq!(row.actions(), 10);
}

#[test]
fn post_row_performance_score_and_metric_presence() {
    let mut row = PostRow {
        id: 1,
        public_id: Uuid::new_v4(),
        business_profile_id: 10,
        title: None,
        content: "Hello".to_string(),
        status: "PUBLISHED".to_string(),
        scheduled_at: None,
        published_at: Some(Utc::now()),
        image_urls: vec![],
        created_at: Utc::now(),
        metric_views: Some(100),
        metric_clicks: Some(5),
        metric_engagement: Some(10),
    };
    assert!(row.has_metrics());
    assert_eq!(row.performance_score(), 105);

    row.metric_views = None;
    row.metric_clicks = None;
    row.metric_engagement = None;
    assert!(!row.has_metrics());
    assert_eq!(row.performance_score(), 0);
}

/// Compile-time smoke test: confirm that [`ReviewRow`] has all expected
/// fields with the correct types. No database required.
#[test]
fn review_row_has_expected_fields() {
    let row = ReviewRow {
        id: 1_i64,
        business_profile_id: 10_i64,
        external_id: "rev-1".to_string(),
        author_name: "Pat".to_string(),
        rating: 5_i16,
        comment: Some("Great".to_string()),
        sentiment: "POSITIVE".to_string(),
        status: "NEW".to_string(),
        is_synthetic: false,
        published_at: Utc::now(),
        created_at: Utc::now(),
        response_content: None,
        responded_at: None,
    };

    assert_eq!(row.rating, 5);
    assert_eq!(row.sentiment, "POSITIVE");
    assert!(row.response_content.is_none());
}
