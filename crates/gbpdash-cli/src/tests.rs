use clap::Parser;

use super::*;

const DEMO_USER: &str = "2f9d9a66-3f6e-4a3a-9c57-0a4a2f1de111";

#[test]
fn parses_db_ping_command() {
    let cli = Cli::try_parse_from(["gbpdash-cli", "db", "ping"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Ping
        })
    ));
}

#[test]
fn parses_db_migrate_command() {
    let cli =
        Cli::try_parse_from(["gbpdash-cli", "db", "migrate"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Migrate
        })
    ));
}

#[test]
fn parses_db_seed_command() {
    let cli = Cli::try_parse_from(["gbpdash-cli", "db", "seed"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Db {
            command: DbCommands::Seed
        })
    ));
}

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["gbpdash-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_sync_profiles_with_user() {
    let cli = Cli::try_parse_from(["gbpdash-cli", "sync", "profiles", "--user", DEMO_USER])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Sync {
            command: SyncCommands::Profiles { .. }
        })
    ));
}

#[test]
fn sync_profiles_requires_user() {
    assert!(Cli::try_parse_from(["gbpdash-cli", "sync", "profiles"]).is_err());
}

#[test]
fn parses_sync_reviews_with_profile_filter() {
    let cli = Cli::try_parse_from([
        "gbpdash-cli",
        "sync",
        "reviews",
        "--user",
        DEMO_USER,
        "--profile",
        "7",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Sync {
            command: SyncCommands::Reviews {
                profile: Some(7),
                ..
            }
        })
    ));
}

#[test]
fn parses_sync_backfill_without_profile_filter() {
    let cli = Cli::try_parse_from(["gbpdash-cli", "sync", "backfill", "--user", DEMO_USER])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Sync {
            command: SyncCommands::Backfill { profile: None, .. }
        })
    ));
}

#[test]
fn report_defaults_to_month_text_output() {
    let cli = Cli::try_parse_from(["gbpdash-cli", "report", "--user", DEMO_USER])
        .expect("expected valid cli args");

    match cli.command {
        Some(Commands::Report {
            period,
            profile,
            json,
            ..
        }) => {
            assert_eq!(period, "month");
            assert!(profile.is_none());
            assert!(!json);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn report_accepts_period_and_json_flag() {
    let cli = Cli::try_parse_from([
        "gbpdash-cli",
        "report",
        "--user",
        DEMO_USER,
        "--period",
        "quarter",
        "--json",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Some(Commands::Report { period, json, .. }) => {
            assert_eq!(period, "quarter");
            assert!(json);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn parses_export_with_profile() {
    let cli = Cli::try_parse_from([
        "gbpdash-cli",
        "export",
        "--user",
        DEMO_USER,
        "--profile",
        "3",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Some(Commands::Export {
            profile: Some(3),
            ..
        })
    ));
}

#[test]
fn parses_export_output_path() {
    let cli = Cli::try_parse_from([
        "gbpdash-cli",
        "export",
        "--user",
        DEMO_USER,
        "--output",
        "overview.csv",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Some(Commands::Export { output, .. }) => {
            assert_eq!(output.as_deref(), Some(std::path::Path::new("overview.csv")));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn rejects_malformed_user_uuid() {
    assert!(Cli::try_parse_from(["gbpdash-cli", "report", "--user", "not-a-uuid"]).is_err());
}
