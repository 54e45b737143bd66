//! Business profile synchronization: remote directory -> record store.
//!
//! Pulls every location reachable by the credential and upserts it into
//! `business_profiles` by external id. Each (account, location) pair is
//! processed independently: one location failing to fetch or parse is
//! logged and skipped, never aborting its siblings, and upserts committed
//! before a later failure stay committed (at-least-once, idempotent by
//! external id).

use futures::stream::{self, StreamExt};
use sqlx::PgPool;
use uuid::Uuid;

use gbpdash_db::ProfileUpsert;
use gbpdash_directory::types::LocationDetail;
use gbpdash_directory::DirectoryClient;

use crate::SyncError;

/// Totals for one profile sync pass. `failed` counts locations that were
/// seen but could not be fetched or written.
#[derive(Debug, Default)]
pub struct ProfileSyncReport {
    pub accounts: usize,
    pub locations_seen: usize,
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
}

enum LocationOutcome {
    Created,
    Updated,
    Failed,
}

/// Synchronizes all business profiles reachable by the caller's credential
/// into the record store.
///
/// Location detail fetches fan out with bounded concurrency
/// (`max_concurrent`, minimum 1 = sequential) to bound remote-API load.
///
/// # Errors
///
/// Returns [`SyncError::OrganizationNotFound`] if the user resolves to no
/// organization, or [`SyncError::Directory`] if the account listing itself
/// fails; individual account/location failures are logged and counted
/// instead.
pub async fn sync_business_profiles(
    pool: &PgPool,
    client: &DirectoryClient,
    user_public_id: Uuid,
    max_concurrent: usize,
) -> Result<ProfileSyncReport, SyncError> {
    let organization = gbpdash_db::get_organization_for_user(pool, user_public_id)
        .await?
        .ok_or(SyncError::OrganizationNotFound(user_public_id))?;

    let accounts = client.list_accounts().await?;

    let mut report = ProfileSyncReport {
        accounts: accounts.len(),
        ..ProfileSyncReport::default()
    };

    let mut pairs: Vec<(String, String)> = Vec::new();
    for account in &accounts {
        match client.list_locations(&account.name).await {
            Ok(locations) => {
                for location in locations {
                    pairs.push((account.name.clone(), location.name));
                }
            }
            Err(e) => {
                tracing::error!(
                    account = %account.name,
                    error = %e,
                    "failed to list locations; skipping account"
                );
                report.failed += 1;
            }
        }
    }
    report.locations_seen = pairs.len();

    let outcomes: Vec<LocationOutcome> = stream::iter(&pairs)
        .map(|(account_name, location_name)| {
            sync_one_location(pool, client, organization.id, account_name, location_name)
        })
        .buffer_unordered(max_concurrent.max(1))
        .collect()
        .await;

    for outcome in outcomes {
        match outcome {
            LocationOutcome::Created => report.created += 1,
            LocationOutcome::Updated => report.updated += 1,
            LocationOutcome::Failed => report.failed += 1,
        }
    }

    tracing::info!(
        accounts = report.accounts,
        locations = report.locations_seen,
        created = report.created,
        updated = report.updated,
        failed = report.failed,
        "profile sync finished"
    );

    Ok(report)
}

async fn sync_one_location(
    pool: &PgPool,
    client: &DirectoryClient,
    organization_id: i64,
    account_name: &str,
    location_name: &str,
) -> LocationOutcome {
    let detail = match client.get_location(location_name).await {
        Ok(detail) => detail,
        Err(e) => {
            tracing::error!(
                location = %location_name,
                error = %e,
                "failed to fetch location detail; skipping"
            );
            return LocationOutcome::Failed;
        }
    };

    let external_id = derive_external_id(account_name, location_name);
    let upsert = profile_upsert_from_detail(external_id, account_name, &detail);

    match gbpdash_db::upsert_business_profile(pool, organization_id, &upsert).await {
        Ok((_, true)) => LocationOutcome::Created,
        Ok((_, false)) => LocationOutcome::Updated,
        Err(e) => {
            tracing::error!(
                location = %location_name,
                error = %e,
                "failed to upsert business profile; skipping"
            );
            LocationOutcome::Failed
        }
    }
}

/// Derives the stable external id from the hierarchical resource names,
/// e.g. `accounts/104312345` + `locations/98765` ->
/// `accounts/104312345/locations/98765`.
#[must_use]
pub fn derive_external_id(account_name: &str, location_name: &str) -> String {
    format!("{account_name}/{location_name}")
}

/// Maps a remote location detail onto the mutable profile fields.
#[must_use]
pub fn profile_upsert_from_detail(
    external_id: String,
    account_name: &str,
    detail: &LocationDetail,
) -> ProfileUpsert {
    let address = detail.storefront_address.as_ref();

    ProfileUpsert {
        external_id,
        name: detail.title.clone(),
        description: detail
            .profile
            .as_ref()
            .and_then(|p| p.description.clone()),
        phone: detail
            .phone_numbers
            .as_ref()
            .and_then(|p| p.primary_phone.clone()),
        website: detail.website_uri.clone(),
        address_lines: address.map(|a| a.address_lines.clone()).unwrap_or_default(),
        locality: address.and_then(|a| a.locality.clone()),
        region: address.and_then(|a| a.administrative_area.clone()),
        postal_code: address.and_then(|a| a.postal_code.clone()),
        country_code: address.and_then(|a| a.region_code.clone()),
        categories: detail.category_names(),
        attributes: serde_json::json!({ "account": account_name }),
        is_verified: detail.is_verified(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_id_concatenates_hierarchical_names() {
        assert_eq!(
            derive_external_id("accounts/104312345", "locations/98765"),
            "accounts/104312345/locations/98765"
        );
    }

    #[test]
    fn upsert_mapping_covers_all_mutable_fields() {
        let detail: LocationDetail = serde_json::from_str(
            r#"{
                "name": "locations/98765",
                "title": "Acme Downtown",
                "profile": { "description": "Flagship store" },
                "phoneNumbers": { "primaryPhone": "+1 555 0100" },
                "websiteUri": "https://acme.example",
                "storefrontAddress": {
                    "addressLines": ["1 Main St", "Suite 2"],
                    "locality": "Springfield",
                    "administrativeArea": "IL",
                    "postalCode": "62701",
                    "regionCode": "US"
                },
                "categories": {
                    "primaryCategory": { "displayName": "Hardware Store" }
                },
                "metadata": { "hasVoiceOfMerchant": true }
            }"#,
        )
        .unwrap();

        let external_id = derive_external_id("accounts/1", "locations/98765");
        let upsert = profile_upsert_from_detail(external_id, "accounts/1", &detail);

        assert_eq!(upsert.external_id, "accounts/1/locations/98765");
        assert_eq!(upsert.name, "Acme Downtown");
        assert_eq!(upsert.description.as_deref(), Some("Flagship store"));
        assert_eq!(upsert.phone.as_deref(), Some("+1 555 0100"));
        assert_eq!(upsert.website.as_deref(), Some("https://acme.example"));
        assert_eq!(upsert.address_lines, vec!["1 Main St", "Suite 2"]);
        assert_eq!(upsert.locality.as_deref(), Some("Springfield"));
        assert_eq!(upsert.region.as_deref(), Some("IL"));
        assert_eq!(upsert.postal_code.as_deref(), Some("62701"));
        assert_eq!(upsert.country_code.as_deref(), Some("US"));
        assert_eq!(upsert.categories, vec!["Hardware Store"]);
        assert!(upsert.is_verified);
        assert_eq!(upsert.attributes["account"], "accounts/1");
    }

    #[test]
    fn upsert_mapping_tolerates_sparse_detail() {
        let detail: LocationDetail =
            serde_json::from_str(r#"{"name": "locations/1", "title": "Bare Listing"}"#).unwrap();

        let upsert =
            profile_upsert_from_detail("accounts/1/locations/1".to_string(), "accounts/1", &detail);

        assert_eq!(upsert.name, "Bare Listing");
        assert!(upsert.description.is_none());
        assert!(upsert.address_lines.is_empty());
        assert!(upsert.categories.is_empty());
        assert!(!upsert.is_verified);
    }
}
