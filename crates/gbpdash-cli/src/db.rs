//! Database housekeeping command handlers for the CLI.

use clap::Subcommand;
use sqlx::PgPool;

/// Sub-commands available under `db`.
#[derive(Debug, Subcommand)]
pub enum DbCommands {
    /// Verify database connectivity
    Ping,
    /// Run pending schema migrations
    Migrate,
    /// Populate a development database with a demo tenant
    Seed,
}

pub(crate) async fn run(pool: &PgPool, command: DbCommands) -> anyhow::Result<()> {
    match command {
        DbCommands::Ping => {
            gbpdash_db::health_check(pool).await?;
            println!("database ok");
        }
        DbCommands::Migrate => {
            let applied = gbpdash_db::run_migrations(pool).await?;
            println!("applied {applied} migration(s)");
        }
        DbCommands::Seed => {
            let outcome = gbpdash_db::seed_demo_data(pool).await?;
            println!(
                "seeded organization '{}' (id {})",
                outcome.organization.name, outcome.organization.id
            );
            println!("demo user public id: {}", outcome.user_public_id);
            println!(
                "business profiles: {}",
                outcome
                    .profile_ids
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
    }
    Ok(())
}
