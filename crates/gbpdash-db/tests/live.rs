//! Live integration tests for gbpdash-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/gbpdash-db/`), so `"../../migrations"` resolves to the workspace
//! migration directory.

use chrono::{NaiveDate, Utc};
use gbpdash_core::Sentiment;
use gbpdash_db::{
    create_organization, get_profile_for_org, insert_insight_if_absent, insert_review_if_absent,
    list_insights_for_profile, list_profiles_for_org, list_recent_reviews,
    list_selected_profiles_for_org, respond_to_review, set_review_status,
    set_selected_for_analytics, upsert_business_profile, BusinessProfileRow, DbError, NewInsight,
    NewReview, OrganizationRow, ProfileUpsert,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn insert_test_org(pool: &sqlx::PgPool, name: &str) -> OrganizationRow {
    create_organization(pool, name, "America/Chicago", "en-US")
        .await
        .unwrap_or_else(|e| panic!("create_organization failed for '{name}': {e}"))
}

fn make_profile_upsert(external_id: &str, name: &str) -> ProfileUpsert {
    ProfileUpsert {
        external_id: external_id.to_string(),
        name: name.to_string(),
        description: Some("Neighborhood hardware store".to_string()),
        phone: Some("+1 555 0100".to_string()),
        website: Some("https://acme.example".to_string()),
        address_lines: vec!["1 Main St".to_string()],
        locality: Some("Springfield".to_string()),
        region: Some("IL".to_string()),
        postal_code: Some("62701".to_string()),
        country_code: Some("US".to_string()),
        categories: vec!["Hardware Store".to_string()],
        attributes: serde_json::json!({}),
        is_verified: true,
    }
}

async fn insert_test_profile(
    pool: &sqlx::PgPool,
    organization_id: i64,
    external_id: &str,
) -> BusinessProfileRow {
    let (row, _) = upsert_business_profile(
        pool,
        organization_id,
        &make_profile_upsert(external_id, "Acme Downtown"),
    )
    .await
    .unwrap_or_else(|e| panic!("upsert_business_profile failed for '{external_id}': {e}"));
    row
}

fn make_review(business_profile_id: i64, external_id: &str, rating: i16) -> NewReview {
    NewReview {
        business_profile_id,
        external_id: external_id.to_string(),
        author_name: "Pat".to_string(),
        rating,
        comment: Some("Great service".to_string()),
        sentiment: Sentiment::Positive,
        is_synthetic: false,
        published_at: Utc::now(),
    }
}

fn make_insight(business_profile_id: i64, date: NaiveDate, views_search: i64) -> NewInsight {
    NewInsight {
        business_profile_id,
        date,
        period: "DAILY".to_string(),
        views_search,
        views_maps: views_search / 2,
        queries_direct: 40,
        queries_discovery: 30,
        queries_branded: 10,
        website_clicks: 12,
        phone_clicks: 6,
        direction_requests: 8,
        photo_views: 33,
        is_synthetic: true,
    }
}

// ---------------------------------------------------------------------------
// Section 1: Profile upsert
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn profile_upsert_inserts_then_updates_same_row(pool: sqlx::PgPool) {
    let org = insert_test_org(&pool, "Acme Holdings").await;
    let external_id = "accounts/1/locations/111";

    let (first, inserted) = upsert_business_profile(
        &pool,
        org.id,
        &make_profile_upsert(external_id, "Acme Downtown"),
    )
    .await
    .expect("first upsert failed");
    assert!(inserted, "first upsert should insert");
    assert_eq!(first.status, "ACTIVE");
    assert!(first.last_synced_at.is_some());

    let (second, inserted) = upsert_business_profile(
        &pool,
        org.id,
        &make_profile_upsert(external_id, "Acme Downtown (renamed)"),
    )
    .await
    .expect("second upsert failed");

    assert!(!inserted, "second upsert should update, not insert");
    assert_eq!(second.id, first.id);
    assert_eq!(second.name, "Acme Downtown (renamed)");
    assert_eq!(second.created_at, first.created_at);

    let all = list_profiles_for_org(&pool, org.id)
        .await
        .expect("list_profiles_for_org failed");
    assert_eq!(all.len(), 1, "repeated sync must not duplicate profiles");
}

#[sqlx::test(migrations = "../../migrations")]
async fn profile_upsert_preserves_opt_in_and_owner(pool: sqlx::PgPool) {
    let org = insert_test_org(&pool, "Acme Holdings").await;
    let profile = insert_test_profile(&pool, org.id, "accounts/1/locations/111").await;
    assert!(!profile.selected_for_analytics, "opt-in defaults off");

    set_selected_for_analytics(&pool, profile.id, true)
        .await
        .expect("set_selected_for_analytics failed");

    let (after, _) = upsert_business_profile(
        &pool,
        org.id,
        &make_profile_upsert(&profile.external_id, "Acme Downtown"),
    )
    .await
    .expect("re-upsert failed");

    assert!(
        after.selected_for_analytics,
        "sync must not reset the analytics opt-in"
    );
    assert_eq!(after.organization_id, org.id);
}

// ---------------------------------------------------------------------------
// Section 2: Organization scoping
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn profile_lookup_is_scoped_to_owning_organization(pool: sqlx::PgPool) {
    let owner = insert_test_org(&pool, "Acme Holdings").await;
    let other = insert_test_org(&pool, "Rival Corp").await;
    let profile = insert_test_profile(&pool, owner.id, "accounts/1/locations/111").await;

    let found = get_profile_for_org(&pool, owner.id, profile.id)
        .await
        .expect("owner lookup failed");
    assert!(found.is_some());

    let cross_tenant = get_profile_for_org(&pool, other.id, profile.id)
        .await
        .expect("cross-tenant lookup failed");
    assert!(
        cross_tenant.is_none(),
        "another org's profile must look missing, not forbidden"
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn selected_profiles_list_filters_on_opt_in(pool: sqlx::PgPool) {
    let org = insert_test_org(&pool, "Acme Holdings").await;
    let opted_in = insert_test_profile(&pool, org.id, "accounts/1/locations/111").await;
    let _opted_out = insert_test_profile(&pool, org.id, "accounts/1/locations/222").await;

    set_selected_for_analytics(&pool, opted_in.id, true)
        .await
        .expect("set_selected_for_analytics failed");

    let all = list_profiles_for_org(&pool, org.id)
        .await
        .expect("list_profiles_for_org failed");
    assert_eq!(all.len(), 2);

    let selected = list_selected_profiles_for_org(&pool, org.id)
        .await
        .expect("list_selected_profiles_for_org failed");
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].id, opted_in.id);
}

// ---------------------------------------------------------------------------
// Section 3: Reviews
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn review_insert_is_create_if_absent(pool: sqlx::PgPool) {
    let org = insert_test_org(&pool, "Acme Holdings").await;
    let profile = insert_test_profile(&pool, org.id, "accounts/1/locations/111").await;

    let original = make_review(profile.id, "rev-1", 5);
    assert!(
        insert_review_if_absent(&pool, &original)
            .await
            .expect("first insert failed"),
        "first insert should create"
    );

    let mut resynced = make_review(profile.id, "rev-1", 1);
    resynced.comment = Some("Edited remotely".to_string());
    assert!(
        !insert_review_if_absent(&pool, &resynced)
            .await
            .expect("second insert failed"),
        "re-sync of the same external id should be a no-op"
    );

    let rows = list_recent_reviews(&pool, profile.id, 10)
        .await
        .expect("list_recent_reviews failed");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].rating, 5, "existing review content must survive");
    assert_eq!(rows[0].comment.as_deref(), Some("Great service"));
    assert_eq!(rows[0].status, "NEW");
}

#[sqlx::test(migrations = "../../migrations")]
async fn responding_flips_status_and_writes_response_row(pool: sqlx::PgPool) {
    let org = insert_test_org(&pool, "Acme Holdings").await;
    let profile = insert_test_profile(&pool, org.id, "accounts/1/locations/111").await;
    insert_review_if_absent(&pool, &make_review(profile.id, "rev-1", 4))
        .await
        .expect("review insert failed");

    let review_id = list_recent_reviews(&pool, profile.id, 1)
        .await
        .expect("list_recent_reviews failed")[0]
        .id;

    respond_to_review(&pool, review_id, "Thanks for visiting!")
        .await
        .expect("respond_to_review failed");

    let rows = list_recent_reviews(&pool, profile.id, 1)
        .await
        .expect("list_recent_reviews failed");
    assert_eq!(rows[0].status, "RESPONDED");
    assert_eq!(rows[0].response_content.as_deref(), Some("Thanks for visiting!"));
    assert!(rows[0].responded_at.is_some());

    let missing = respond_to_review(&pool, review_id + 999, "hello?").await;
    assert!(matches!(missing, Err(DbError::NotFound)), "got: {missing:?}");
}

#[sqlx::test(migrations = "../../migrations")]
async fn status_update_distinguishes_bad_input_from_missing_row(pool: sqlx::PgPool) {
    let org = insert_test_org(&pool, "Acme Holdings").await;
    let profile = insert_test_profile(&pool, org.id, "accounts/1/locations/111").await;
    insert_review_if_absent(&pool, &make_review(profile.id, "rev-1", 4))
        .await
        .expect("review insert failed");
    let review_id = list_recent_reviews(&pool, profile.id, 1)
        .await
        .expect("list_recent_reviews failed")[0]
        .id;

    let bad_value = set_review_status(&pool, review_id, "RESPONDED").await;
    assert!(
        matches!(bad_value, Err(DbError::InvalidStatus(ref s)) if s.as_str() == "RESPONDED"),
        "got: {bad_value:?}"
    );

    let missing = set_review_status(&pool, review_id + 999, "FLAGGED").await;
    assert!(matches!(missing, Err(DbError::NotFound)), "got: {missing:?}");

    set_review_status(&pool, review_id, "FLAGGED")
        .await
        .expect("set_review_status failed");
    let rows = list_recent_reviews(&pool, profile.id, 1)
        .await
        .expect("list_recent_reviews failed");
    assert_eq!(rows[0].status, "FLAGGED");
}

// ---------------------------------------------------------------------------
// Section 4: Insights
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn insight_rows_are_never_overwritten(pool: sqlx::PgPool) {
    let org = insert_test_org(&pool, "Acme Holdings").await;
    let profile = insert_test_profile(&pool, org.id, "accounts/1/locations/111").await;
    let date = NaiveDate::from_ymd_opt(2026, 2, 1).expect("valid date");

    assert!(
        insert_insight_if_absent(&pool, &make_insight(profile.id, date, 200))
            .await
            .expect("first insert failed"),
        "first insert should create"
    );
    assert!(
        !insert_insight_if_absent(&pool, &make_insight(profile.id, date, 999))
            .await
            .expect("second insert failed"),
        "same (profile, date, period) key must be a no-op"
    );

    let rows = list_insights_for_profile(&pool, profile.id, date, date)
        .await
        .expect("list_insights_for_profile failed");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].views_search, 200, "original row must survive");

    // A different date under the same profile is a fresh key.
    let next = date.succ_opt().expect("valid date");
    assert!(
        insert_insight_if_absent(&pool, &make_insight(profile.id, next, 150))
            .await
            .expect("third insert failed")
    );
    let rows = list_insights_for_profile(&pool, profile.id, date, next)
        .await
        .expect("list_insights_for_profile failed");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, date, "range listing is ordered by date");
}
