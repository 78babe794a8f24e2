use super::*;
use serial_test::serial;

#[test]
fn test_parse_minimal_config() {
    let config: Config = serde_yaml::from_str("name: app").unwrap();
    assert_eq!(config.name, "app");
    assert_eq!(config.migrations_dir, "migrations");
    assert_eq!(config.ledger_table, DEFAULT_LEDGER_TABLE);
    assert_eq!(config.database.db_type, DbType::DuckDb);
    assert_eq!(config.database.path, ":memory:");

    let root = PathBuf::from("/tmp/app");
    assert_eq!(
        config.migrations_dir_absolute(&root),
        root.join("migrations")
    );
}

#[test]
fn test_parse_full_config() {
    let yaml = r#"
name: app
migrations_dir: db/migrations
ledger_table: meta.schema_ledger
database:
  type: duckdb
  path: ./app.duckdb
targets:
  prod:
    database:
      type: duckdb
      path: /srv/app.duckdb
  scratch: {}
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    config.validate().unwrap();
    assert_eq!(config.migrations_dir, "db/migrations");
    assert_eq!(config.ledger_table, "meta.schema_ledger");
    assert_eq!(config.available_targets(), vec!["prod", "scratch"]);

    let prod = config.get_database_config(Some("prod")).unwrap();
    assert_eq!(prod.path, "/srv/app.duckdb");

    // Targets without a database block fall back to the base config.
    let scratch = config.get_database_config(Some("scratch")).unwrap();
    assert_eq!(scratch.path, "./app.duckdb");
}

#[test]
fn test_unknown_target_lists_available() {
    let yaml = r#"
name: app
targets:
  dev: {}
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    let err = config.get_database_config(Some("prod")).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("prod"));
    assert!(msg.contains("dev"));
}

#[test]
fn test_unknown_fields_rejected() {
    let result: Result<Config, _> = serde_yaml::from_str("name: app\nmigration_dir: x");
    assert!(result.is_err());
}

#[test]
fn test_validate_rejects_empty_name() {
    let config: Config = serde_yaml::from_str("name: ''").unwrap();
    assert!(matches!(
        config.validate(),
        Err(CoreError::ConfigInvalid { .. })
    ));
}

#[test]
fn test_validate_rejects_bad_ledger_table() {
    let config: Config =
        serde_yaml::from_str("name: app\nledger_table: \"x; DROP TABLE y\"").unwrap();
    assert!(matches!(
        config.validate(),
        Err(CoreError::ConfigInvalid { .. })
    ));
}

#[test]
fn test_load_from_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("tablewright.yaml"), "name: from_yaml\n").unwrap();
    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.name, "from_yaml");
}

#[test]
fn test_load_from_dir_missing() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::load_from_dir(dir.path()).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
    assert!(err.to_string().contains("tablewright.yml"));
}

#[test]
#[serial]
fn test_resolve_target_priority() {
    std::env::set_var(TARGET_ENV_VAR, "staging");
    assert_eq!(Config::resolve_target(Some("prod")).as_deref(), Some("prod"));
    assert_eq!(Config::resolve_target(None).as_deref(), Some("staging"));
    std::env::remove_var(TARGET_ENV_VAR);
    assert_eq!(Config::resolve_target(None), None);
}
