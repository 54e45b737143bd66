//! Insight backfill: synthetic daily metrics for profiles with gaps.
//!
//! The remote insights capability does not exist yet; until it does, this
//! routine fills the last 30 days with bounded-random, plausibly-shaped
//! metrics. Strictly additive: a (profile, date, DAILY) key that already has
//! a row is never overwritten, and every generated row is labeled
//! `is_synthetic`.

use chrono::{Days, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sqlx::PgPool;
use uuid::Uuid;

use gbpdash_db::{BusinessProfileRow, NewInsight};

use crate::SyncError;

/// Number of days of history the backfill generates.
pub const BACKFILL_DAYS: u64 = 30;

/// Totals for one backfill pass.
#[derive(Debug, Default)]
pub struct BackfillReport {
    pub profiles: usize,
    /// Rows actually inserted.
    pub inserted: usize,
    /// Keys skipped because a row already existed.
    pub skipped: usize,
}

/// Backfills synthetic daily insights for the user's opted-in profiles, or
/// for one specific profile when `business_profile_id` is given.
///
/// Per-profile failures are logged and skipped; sibling profiles still get
/// their backfill.
///
/// # Errors
///
/// Returns [`SyncError::OrganizationNotFound`] if the user resolves to no
/// organization, or [`SyncError::ProfileNotFound`] if the named profile does
/// not belong to it.
pub async fn backfill_insights(
    pool: &PgPool,
    user_public_id: Uuid,
    business_profile_id: Option<i64>,
) -> Result<BackfillReport, SyncError> {
    let organization = gbpdash_db::get_organization_for_user(pool, user_public_id)
        .await?
        .ok_or(SyncError::OrganizationNotFound(user_public_id))?;

    let profiles: Vec<BusinessProfileRow> = match business_profile_id {
        Some(id) => {
            let profile = gbpdash_db::get_profile_for_org(pool, organization.id, id)
                .await?
                .ok_or(SyncError::ProfileNotFound(id))?;
            vec![profile]
        }
        None => gbpdash_db::list_selected_profiles_for_org(pool, organization.id).await?,
    };

    let mut report = BackfillReport {
        profiles: profiles.len(),
        ..BackfillReport::default()
    };

    let today = Utc::now().date_naive();
    // StdRng rather than ThreadRng: the rng lives across await points, and
    // the returned future must stay Send so callers can spawn it.
    let mut rng = StdRng::from_os_rng();

    for profile in &profiles {
        if let Err(e) = backfill_one_profile(pool, profile.id, today, &mut rng, &mut report).await {
            tracing::error!(
                profile = profile.id,
                error = %e,
                "insight backfill failed for profile; skipping"
            );
        }
    }

    tracing::info!(
        profiles = report.profiles,
        inserted = report.inserted,
        skipped = report.skipped,
        "insight backfill finished"
    );

    Ok(report)
}

async fn backfill_one_profile<R: Rng>(
    pool: &PgPool,
    profile_id: i64,
    today: NaiveDate,
    rng: &mut R,
    report: &mut BackfillReport,
) -> Result<(), SyncError> {
    for offset in 1..=BACKFILL_DAYS {
        let Some(date) = today.checked_sub_days(Days::new(offset)) else {
            continue;
        };
        let insight = synthetic_insight(profile_id, date, rng);
        if gbpdash_db::insert_insight_if_absent(pool, &insight).await? {
            report.inserted += 1;
        } else {
            report.skipped += 1;
        }
    }
    Ok(())
}

/// Generates one synthetic daily row: a bounded random search-view base with
/// fixed ratios between the sub-categories, so charts look plausible without
/// pretending to be real data.
pub fn synthetic_insight<R: Rng>(profile_id: i64, date: NaiveDate, rng: &mut R) -> NewInsight {
    let views_search = rng.random_range(80..=300);
    let views_maps = views_search / 2;
    let searches = views_search + views_maps;

    NewInsight {
        business_profile_id: profile_id,
        date,
        period: "DAILY".to_string(),
        views_search,
        views_maps,
        queries_direct: searches / 2,
        queries_discovery: searches / 3,
        queries_branded: searches / 10,
        website_clicks: views_search / 10,
        phone_clicks: views_search / 20,
        direction_requests: views_search / 15,
        photo_views: views_search / 3,
        is_synthetic: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_insight_values_stay_in_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let date = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();

        for _ in 0..100 {
            let insight = synthetic_insight(1, date, &mut rng);
            assert!((80..=300).contains(&insight.views_search));
            assert_eq!(insight.views_maps, insight.views_search / 2);
            assert!(insight.website_clicks <= insight.views_search);
            assert!(insight.is_synthetic);
            assert_eq!(insight.period, "DAILY");
        }
    }

    #[test]
    fn synthetic_insight_keeps_fixed_ratios() {
        let mut rng = StdRng::seed_from_u64(42);
        let date = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let insight = synthetic_insight(9, date, &mut rng);

        let searches = insight.views_search + insight.views_maps;
        assert_eq!(insight.queries_direct, searches / 2);
        assert_eq!(insight.queries_discovery, searches / 3);
        assert_eq!(insight.queries_branded, searches / 10);
        assert_eq!(insight.photo_views, insight.views_search / 3);
    }
}
