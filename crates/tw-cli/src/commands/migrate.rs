//! Migrate command implementation

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, MigrateArgs};
use crate::commands::common::{load_project, open_database};

/// Execute the migrate command
pub async fn execute(args: &MigrateArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let db = open_database(&project, global)?;
    let source = project.source();
    let migrator = project.migrator(&db, &source);

    if args.dry_run {
        let plan = migrator
            .plan()
            .await
            .context("Failed to compile pending migrations")?;
        if plan.is_empty() {
            println!("Nothing to migrate.");
            return Ok(());
        }
        println!("Dry run - would apply {} migration(s):", plan.len());
        for planned in &plan {
            println!();
            println!("-- {}", planned.name);
            for statement in &planned.statements {
                println!("{statement};");
            }
        }
        return Ok(());
    }

    let report = migrator.run().await.context("Migration failed")?;
    match report.batch {
        None => println!("Nothing to migrate."),
        Some(batch) => {
            println!("Batch {}: applied {} migration(s)", batch, report.applied.len());
            for name in &report.applied {
                println!("  {name}");
            }
        }
    }
    Ok(())
}
