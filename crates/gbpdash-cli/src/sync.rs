//! Sync command handlers for the CLI.
//!
//! These are called from `main` after the database pool and config are
//! established. Per-profile failures are logged and skipped rather than
//! propagated so a single bad location does not abort the full run.

use clap::Subcommand;
use sqlx::PgPool;
use uuid::Uuid;

use gbpdash_core::AppConfig;
use gbpdash_directory::DirectoryClient;

/// Sub-commands available under `sync`.
#[derive(Debug, Subcommand)]
pub enum SyncCommands {
    /// Pull accounts and locations from the remote directory and upsert
    /// business profiles
    Profiles {
        /// Public id of the requesting user
        #[arg(long)]
        user: Uuid,
    },
    /// Pull reviews for opted-in profiles (or one specific profile)
    Reviews {
        /// Public id of the requesting user
        #[arg(long)]
        user: Uuid,
        /// Restrict the sync to a specific business profile (by id)
        #[arg(long)]
        profile: Option<i64>,
    },
    /// Backfill synthetic daily insights for profiles with gaps
    Backfill {
        /// Public id of the requesting user
        #[arg(long)]
        user: Uuid,
        /// Restrict the backfill to a specific business profile (by id)
        #[arg(long)]
        profile: Option<i64>,
    },
}

pub(crate) async fn run(
    pool: &PgPool,
    config: &AppConfig,
    command: SyncCommands,
) -> anyhow::Result<()> {
    match command {
        SyncCommands::Profiles { user } => run_sync_profiles(pool, config, user).await,
        SyncCommands::Reviews { user, profile } => {
            run_sync_reviews(pool, config, user, profile).await
        }
        SyncCommands::Backfill { user, profile } => {
            let report = gbpdash_sync::backfill_insights(pool, user, profile).await?;
            println!(
                "backfilled insights for {} profile(s): {} inserted, {} skipped",
                report.profiles, report.inserted, report.skipped
            );
            Ok(())
        }
    }
}

/// Build the directory client from config, requiring an access token.
fn build_directory_client(config: &AppConfig) -> anyhow::Result<DirectoryClient> {
    let access_token = config
        .directory_access_token
        .as_deref()
        .ok_or_else(|| {
            anyhow::anyhow!("GBPDASH_DIRECTORY_ACCESS_TOKEN is not set; cannot run sync")
        })?;

    DirectoryClient::with_base_urls(
        access_token,
        config.directory_request_timeout_secs,
        &config.directory_user_agent,
        &config.directory_base_url,
        &config.directory_reviews_base_url,
    )
    .map_err(|e| anyhow::anyhow!("failed to build directory client: {e}"))
}

async fn run_sync_profiles(
    pool: &PgPool,
    config: &AppConfig,
    user: Uuid,
) -> anyhow::Result<()> {
    let client = build_directory_client(config)?;

    let report = gbpdash_sync::sync_business_profiles(
        pool,
        &client,
        user,
        config.sync_max_concurrent_locations,
    )
    .await?;

    println!(
        "synced {} location(s) across {} account(s): {} created, {} updated, {} failed",
        report.locations_seen, report.accounts, report.created, report.updated, report.failed
    );
    Ok(())
}

async fn run_sync_reviews(
    pool: &PgPool,
    config: &AppConfig,
    user: Uuid,
    profile_filter: Option<i64>,
) -> anyhow::Result<()> {
    let client = build_directory_client(config)?;

    let organization = gbpdash_db::get_organization_for_user(pool, user)
        .await?
        .ok_or_else(|| anyhow::anyhow!("no organization found for user {user}"))?;

    let profiles = match profile_filter {
        Some(id) => {
            let profile = gbpdash_db::get_profile_for_org(pool, organization.id, id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("business profile {id} not found"))?;
            vec![profile]
        }
        None => gbpdash_db::list_selected_profiles_for_org(pool, organization.id).await?,
    };

    if profiles.is_empty() {
        println!("no profiles opted in to analytics; run `sync profiles` and opt some in first");
        return Ok(());
    }

    let mut synced = 0_usize;
    let mut new = 0_usize;
    let mut fallbacks = 0_usize;
    for profile in &profiles {
        match gbpdash_sync::sync_reviews(pool, &client, profile.id, &profile.external_id).await {
            Ok(outcome) => {
                synced += outcome.synced;
                new += outcome.new;
                if outcome.synthetic {
                    fallbacks += 1;
                }
            }
            Err(e) => {
                tracing::error!(
                    profile = profile.id,
                    error = %e,
                    "review sync failed for profile; skipping"
                );
            }
        }
    }

    println!(
        "synced {synced} review(s) ({new} new) across {} profile(s); {fallbacks} used placeholder data",
        profiles.len()
    );
    Ok(())
}
