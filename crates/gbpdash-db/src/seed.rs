//! Demo/seed mode: populates a fresh database with a small, clearly
//! synthetic tenant so the dashboard has content before any real sync runs.
//!
//! Everything written here is labeled `is_synthetic = true` where the schema
//! carries the flag. Intended for development databases; duplicate emails or
//! external ids from a previous seed will surface as constraint errors.

use chrono::{Duration, Utc};
use gbpdash_core::sentiment_from_rating;
use sqlx::PgPool;
use uuid::Uuid;

use crate::business_profiles::ProfileUpsert;
use crate::insights::NewInsight;
use crate::reviews::NewReview;
use crate::{DbError, OrganizationRow};

/// Identifiers created by [`seed_demo_data`], for the caller to print or
/// reuse.
#[derive(Debug)]
pub struct SeedOutcome {
    pub organization: OrganizationRow,
    pub user_public_id: Uuid,
    pub profile_ids: Vec<i64>,
}

/// Seeds one organization with a user and two business profiles (one opted
/// in to analytics), plus posts, reviews, questions, and a week of daily
/// insight rows.
///
/// # Errors
///
/// Returns [`DbError`] if any write fails.
pub async fn seed_demo_data(pool: &PgPool) -> Result<SeedOutcome, DbError> {
    let organization =
        crate::create_organization(pool, "Demo Organization", "UTC", "en").await?;
    let user = crate::create_user(
        pool,
        organization.id,
        "demo@example.com",
        Some("Demo User"),
    )
    .await?;

    let mut profile_ids = Vec::new();
    for (external_id, name, selected) in [
        ("accounts/demo/locations/1001", "Demo Cafe Downtown", true),
        ("accounts/demo/locations/1002", "Demo Cafe Airport", false),
    ] {
        let upsert = ProfileUpsert {
            external_id: external_id.to_string(),
            name: name.to_string(),
            description: Some("Seeded demo listing".to_string()),
            phone: Some("+1 555 0100".to_string()),
            website: Some("https://demo.example".to_string()),
            address_lines: vec!["1 Demo Street".to_string()],
            locality: Some("Springfield".to_string()),
            region: Some("IL".to_string()),
            postal_code: Some("62701".to_string()),
            country_code: Some("US".to_string()),
            categories: vec!["Cafe".to_string()],
            attributes: serde_json::json!({}),
            is_verified: true,
        };
        let (row, _) = crate::upsert_business_profile(pool, organization.id, &upsert).await?;
        if selected {
            crate::set_selected_for_analytics(pool, row.id, true).await?;
        }
        profile_ids.push(row.id);
    }

    let primary = profile_ids[0];
    seed_posts(pool, primary).await?;
    seed_reviews(pool, primary).await?;
    seed_questions(pool, primary).await?;
    seed_insights(pool, primary).await?;

    Ok(SeedOutcome {
        organization,
        user_public_id: user.public_id,
        profile_ids,
    })
}

async fn seed_posts(pool: &PgPool, profile_id: i64) -> Result<(), DbError> {
    let now = Utc::now();
    let posts: [(&str, i64, i64); 3] = [
        ("Fresh pastries every morning from 7am.", 120, 14),
        ("We now take online orders for pickup.", 85, 22),
        ("Closed for the holiday on Monday.", 40, 3),
    ];

    for (i, (content, views, clicks)) in posts.iter().enumerate() {
        let published = now - Duration::days(i64::try_from(i).unwrap_or(0) + 1);
        let post_id = crate::create_post(
            pool,
            profile_id,
            None,
            content,
            "PUBLISHED",
            Some(published),
        )
        .await?;
        crate::upsert_post_metrics(pool, post_id, *views, *clicks, views / 10).await?;
    }

    Ok(())
}

async fn seed_reviews(pool: &PgPool, profile_id: i64) -> Result<(), DbError> {
    let now = Utc::now();
    let reviews: [(&str, i16, &str); 3] = [
        ("Morgan", 5, "Best espresso in town."),
        ("Riley", 4, "Friendly staff, quick service."),
        ("Casey", 2, "Long wait at lunch."),
    ];

    for (i, (author, rating, comment)) in reviews.iter().enumerate() {
        let review = NewReview {
            business_profile_id: profile_id,
            external_id: format!("seed-review-{profile_id}-{i}"),
            author_name: (*author).to_string(),
            rating: *rating,
            comment: Some((*comment).to_string()),
            sentiment: sentiment_from_rating(*rating),
            is_synthetic: true,
            published_at: now - Duration::days(i64::try_from(i).unwrap_or(0)),
        };
        crate::insert_review_if_absent(pool, &review).await?;
    }

    Ok(())
}

async fn seed_questions(pool: &PgPool, profile_id: i64) -> Result<(), DbError> {
    let question_id = crate::create_question(
        pool,
        profile_id,
        &format!("seed-question-{profile_id}-0"),
        "Jordan",
        "Do you have oat milk?",
    )
    .await?;
    crate::answer_question(pool, question_id, "Yes, for all espresso drinks.").await?;

    Ok(())
}

async fn seed_insights(pool: &PgPool, profile_id: i64) -> Result<(), DbError> {
    let today = Utc::now().date_naive();

    for offset in 1..=7 {
        let Some(date) = today.checked_sub_days(chrono::Days::new(offset)) else {
            continue;
        };
        let base = 100 + i64::try_from(offset).unwrap_or(0) * 10;
        let insight = NewInsight {
            business_profile_id: profile_id,
            date,
            period: "DAILY".to_string(),
            views_search: base,
            views_maps: base / 2,
            queries_direct: base / 3,
            queries_discovery: base / 4,
            queries_branded: base / 10,
            website_clicks: base / 5,
            phone_clicks: base / 8,
            direction_requests: base / 6,
            photo_views: base / 2,
            is_synthetic: true,
        };
        crate::insert_insight_if_absent(pool, &insight).await?;
    }

    Ok(())
}
