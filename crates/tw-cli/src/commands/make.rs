//! Make command implementation

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tw_core::sql_utils::is_valid_identifier;

use crate::cli::{GlobalArgs, MakeArgs};
use crate::commands::common::load_project;

const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Execute the make command
pub async fn execute(args: &MakeArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let dir = project.migrations_dir();
    let path = create_migration_file(&dir, &args.name, Utc::now())?;
    println!("Created {}", path.display());
    Ok(())
}

/// Write a new, empty migration file into `dir` and return its path.
fn create_migration_file(dir: &Path, name: &str, now: DateTime<Utc>) -> Result<PathBuf> {
    let file_name = migration_file_name(name, now)?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let path = dir.join(file_name);
    if path.exists() {
        bail!("Migration file already exists: {}", path.display());
    }
    std::fs::write(&path, template(name))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

fn migration_file_name(name: &str, now: DateTime<Utc>) -> Result<String> {
    if !is_valid_identifier(name) {
        bail!(
            "Invalid migration name '{}': use letters, digits, and underscores",
            name
        );
    }
    Ok(format!("{}_{}.yml", now.format(TIMESTAMP_FORMAT), name))
}

fn template(name: &str) -> String {
    format!(
        "description: {}\n\
         up: []\n\
         # up:\n\
         #   - create_table:\n\
         #       name: example\n\
         #       columns:\n\
         #         - {{ name: id, type: id }}\n\
         #         - {{ type: timestamps }}\n\
         down: []\n",
        name.replace('_', " ")
    )
}
