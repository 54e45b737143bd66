//! Snapshot assembly: resolves the caller's organization, loads per-profile
//! rows, and hands them to the aggregation layer.

use sqlx::PgPool;
use uuid::Uuid;

use gbpdash_core::Period;
use gbpdash_db::BusinessProfileRow;

use crate::aggregate::build_snapshot;
use crate::types::{AnalyticsSnapshot, ProfileData};
use crate::AnalyticsError;

/// How many posts to load per profile as top-post candidates.
const POSTS_PER_PROFILE: i64 = 10;
/// How many reviews to load per profile for the recent feed and rating stats.
const REVIEWS_PER_PROFILE: i64 = 10;

/// Builds the analytics snapshot for a user's organization.
///
/// The scope is the organization's opted-in profiles, or the single named
/// profile when `business_profile_id` is given (the explicit selection
/// overrides the opt-in flag). An organization with no matching profiles or
/// no rows in range gets a snapshot full of zeroes and empty lists, never an
/// error.
///
/// # Errors
///
/// Returns [`AnalyticsError::OrganizationNotFound`] if the user resolves to
/// no organization, [`AnalyticsError::ProfileNotFound`] if the named profile
/// does not belong to it, or [`AnalyticsError::Db`] on query failure.
pub async fn get_analytics_data(
    pool: &PgPool,
    user_public_id: Uuid,
    period: Period,
    business_profile_id: Option<i64>,
) -> Result<AnalyticsSnapshot, AnalyticsError> {
    let organization = gbpdash_db::get_organization_for_user(pool, user_public_id)
        .await?
        .ok_or(AnalyticsError::OrganizationNotFound(user_public_id))?;

    let profiles: Vec<BusinessProfileRow> = match business_profile_id {
        Some(id) => {
            let profile = gbpdash_db::get_profile_for_org(pool, organization.id, id)
                .await?
                .ok_or(AnalyticsError::ProfileNotFound(id))?;
            vec![profile]
        }
        None => gbpdash_db::list_selected_profiles_for_org(pool, organization.id).await?,
    };

    let (start_date, end_date) = period.window(chrono::Utc::now());

    let mut data = Vec::with_capacity(profiles.len());
    for profile in profiles {
        let insights =
            gbpdash_db::list_insights_for_profile(pool, profile.id, start_date, end_date).await?;
        let posts = gbpdash_db::list_recent_posts(pool, profile.id, POSTS_PER_PROFILE).await?;
        let reviews =
            gbpdash_db::list_recent_reviews(pool, profile.id, REVIEWS_PER_PROFILE).await?;
        let questions = gbpdash_db::list_answered_questions(pool, profile.id).await?;
        data.push(ProfileData {
            profile,
            insights,
            posts,
            reviews,
            questions,
        });
    }

    tracing::debug!(
        organization = organization.id,
        profiles = data.len(),
        period = period.days(),
        "built analytics snapshot"
    );

    Ok(build_snapshot(period, start_date, end_date, &data))
}
