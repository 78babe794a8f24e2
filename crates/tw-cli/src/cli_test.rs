use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    // Validates the entire command tree: short flag conflicts,
    // duplicate args, and other clap definition errors.
    Cli::command().debug_assert();
}

#[test]
fn test_migrate_dry_run() {
    let cli = Cli::try_parse_from(["tw", "migrate", "--dry-run"]).unwrap();
    assert!(matches!(cli.command, Commands::Migrate(MigrateArgs { dry_run: true })));
    assert_eq!(cli.global.project_dir, ".");
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "tw",
        "status",
        "-p",
        "app",
        "--target",
        "prod",
        "--database",
        "/tmp/app.duckdb",
        "-o",
        "json",
    ])
    .unwrap();
    assert_eq!(cli.global.project_dir, "app");
    assert_eq!(cli.global.target.as_deref(), Some("prod"));
    assert_eq!(cli.global.database.as_deref(), Some("/tmp/app.duckdb"));
    match cli.command {
        Commands::Status(args) => assert_eq!(args.output, OutputFormat::Json),
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_compile_positional_migrations() {
    let cli = Cli::try_parse_from(["tw", "compile", "A_001", "A_002", "--down"]).unwrap();
    match cli.command {
        Commands::Compile(args) => {
            assert_eq!(args.migrations, vec!["A_001", "A_002"]);
            assert!(args.down);
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_make_requires_name() {
    assert!(Cli::try_parse_from(["tw", "make"]).is_err());
}
