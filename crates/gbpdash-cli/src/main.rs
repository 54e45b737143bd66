mod db;
mod report;
mod sync;

#[cfg(test)]
mod tests;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::db::DbCommands;
use crate::sync::SyncCommands;

#[derive(Debug, Parser)]
#[command(name = "gbpdash-cli")]
#[command(about = "Business profile dashboard command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database housekeeping (ping, migrate, seed)
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Synchronize remote directory data into the record store
    Sync {
        #[command(subcommand)]
        command: SyncCommands,
    },
    /// Print the analytics snapshot for a user's organization
    Report {
        /// Public id of the requesting user
        #[arg(long)]
        user: Uuid,
        /// Reporting window: week, month, or quarter
        #[arg(long, default_value = "month")]
        period: String,
        /// Restrict the snapshot to one business profile (by id)
        #[arg(long)]
        profile: Option<i64>,
        /// Emit the full snapshot as JSON instead of a text summary
        #[arg(long)]
        json: bool,
    },
    /// Export overview metrics as a two-column CSV table
    Export {
        /// Public id of the requesting user
        #[arg(long)]
        user: Uuid,
        /// Reporting window: week, month, or quarter
        #[arg(long, default_value = "month")]
        period: String,
        /// Restrict the export to one business profile (by id)
        #[arg(long)]
        profile: Option<i64>,
        /// Write the table to a file instead of stdout
        #[arg(long)]
        output: Option<std::path::PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("no command given; run with --help for usage");
        return Ok(());
    };

    let config = gbpdash_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = gbpdash_db::PoolConfig::from_app_config(&config);
    let pool = gbpdash_db::connect_pool(&config.database_url, pool_config).await?;

    match command {
        Commands::Db { command } => db::run(&pool, command).await,
        Commands::Sync { command } => sync::run(&pool, &config, command).await,
        Commands::Report {
            user,
            period,
            profile,
            json,
        } => report::run_report(&pool, user, &period, profile, json).await,
        Commands::Export {
            user,
            period,
            profile,
            output,
        } => report::run_export(&pool, user, &period, profile, output.as_deref()).await,
    }
}
