//! Rollback command implementation

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, RollbackArgs};
use crate::commands::common::{load_project, open_database};

/// Execute the rollback command
pub async fn execute(args: &RollbackArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let db = open_database(&project, global)?;
    let source = project.source();
    let migrator = project.migrator(&db, &source);

    if args.dry_run {
        let records = migrator
            .last_batch()
            .await
            .context("Failed to read the ledger")?;
        let Some(first) = records.first() else {
            println!("Nothing to roll back.");
            return Ok(());
        };
        println!(
            "Dry run - would roll back batch {} ({} migration(s)):",
            first.batch,
            records.len()
        );
        for record in &records {
            println!("  {}", record.name);
        }
        return Ok(());
    }

    let report = migrator.rollback().await.context("Rollback failed")?;
    match report.batch {
        None => println!("Nothing to roll back."),
        Some(batch) => {
            println!(
                "Batch {}: rolled back {} migration(s)",
                batch,
                report.reverted.len()
            );
            for name in &report.reverted {
                println!("  {name}");
            }
        }
    }
    Ok(())
}
