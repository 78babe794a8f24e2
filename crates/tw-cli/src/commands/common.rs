//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tw_core::config::{Config, DatabaseConfig};
use tw_core::DirectorySource;
use tw_db::DuckDbBackend;
use tw_migrate::Migrator;

use crate::cli::GlobalArgs;

const MEMORY_PATH: &str = ":memory:";

/// A loaded project: its root directory and configuration.
#[derive(Debug)]
pub(crate) struct Project {
    pub root: PathBuf,
    pub config: Config,
}

impl Project {
    /// Directory holding the migration files.
    pub fn migrations_dir(&self) -> PathBuf {
        self.config.migrations_dir_absolute(&self.root)
    }

    /// Discovery source over the migrations directory.
    pub fn source(&self) -> DirectorySource {
        DirectorySource::new(self.migrations_dir())
    }

    /// Migrator for `db` reading this project's migrations and ledger table.
    pub fn migrator<'a>(
        &self,
        db: &'a DuckDbBackend,
        source: &'a DirectorySource,
    ) -> Migrator<'a> {
        Migrator::new(db, source).with_ledger_table(self.config.ledger_table.as_str())
    }
}

/// Load the project config from `--config` or the project directory.
pub(crate) fn load_project(global: &GlobalArgs) -> Result<Project> {
    let root = PathBuf::from(&global.project_dir);
    let config = match &global.config {
        Some(path) => Config::load(Path::new(path)),
        None => Config::load_from_dir(&root),
    }
    .context("Failed to load project")?;
    Ok(Project { root, config })
}

/// Resolve the database settings: `--target` / `TW_TARGET`, then
/// `--database`. Relative file paths are taken from the project root.
pub(crate) fn resolve_database_config(
    project: &Project,
    global: &GlobalArgs,
) -> Result<DatabaseConfig> {
    let target = Config::resolve_target(global.target.as_deref());
    let mut db_config = project
        .config
        .get_database_config(target.as_deref())
        .context("Failed to get database configuration")?;

    if let Some(path) = &global.database {
        db_config.path = path.clone();
    }
    if db_config.path != MEMORY_PATH && Path::new(&db_config.path).is_relative() {
        db_config.path = project.root.join(&db_config.path).display().to_string();
    }
    Ok(db_config)
}

/// Open the connection used for the whole command.
pub(crate) fn open_database(project: &Project, global: &GlobalArgs) -> Result<DuckDbBackend> {
    let db_config = resolve_database_config(project, global)?;
    if db_config.path != MEMORY_PATH {
        if let Some(parent) = Path::new(&db_config.path).parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    log::debug!("Connecting to {} at {}", db_config.db_type, db_config.path);
    tw_migrate::connect(&db_config).context("Failed to connect to database")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global(dir: &Path) -> GlobalArgs {
        GlobalArgs {
            verbose: false,
            project_dir: dir.display().to_string(),
            config: None,
            target: None,
            database: None,
        }
    }

    fn write_config(dir: &Path) {
        std::fs::write(
            dir.join("tablewright.yml"),
            "name: app\ndatabase:\n  type: duckdb\n  path: data/app.duckdb\ntargets:\n  test:\n    database:\n      type: duckdb\n      path: \":memory:\"\n",
        )
        .unwrap();
    }

    #[test]
    fn test_relative_database_path_uses_project_root() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path());
        let args = global(dir.path());
        let project = load_project(&args).unwrap();
        let db_config = resolve_database_config(&project, &args).unwrap();
        assert_eq!(
            PathBuf::from(db_config.path),
            dir.path().join("data/app.duckdb")
        );
    }

    #[test]
    fn test_target_and_database_overrides() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path());
        let mut args = global(dir.path());
        args.target = Some("test".to_string());
        let project = load_project(&args).unwrap();
        assert_eq!(
            resolve_database_config(&project, &args).unwrap().path,
            ":memory:"
        );

        args.database = Some("/srv/other.duckdb".to_string());
        assert_eq!(
            resolve_database_config(&project, &args).unwrap().path,
            "/srv/other.duckdb"
        );
    }

    #[test]
    fn test_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_project(&global(dir.path())).is_err());
    }

    #[test]
    fn test_explicit_config_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.yml");
        std::fs::write(&path, "name: custom\nmigrations_dir: db/migrations\n").unwrap();
        let mut args = global(dir.path());
        args.config = Some(path.display().to_string());
        let project = load_project(&args).unwrap();
        assert_eq!(project.config.name, "custom");
        assert_eq!(project.migrations_dir(), dir.path().join("db/migrations"));
    }
}
