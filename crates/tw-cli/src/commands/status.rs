//! Status command implementation

use anyhow::{Context, Result};
use tw_migrate::{MigrationState, MigrationStatus};

use crate::cli::{GlobalArgs, OutputFormat, StatusArgs};
use crate::commands::common::{load_project, open_database};

/// Execute the status command
pub async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let db = open_database(&project, global)?;
    let source = project.source();
    let statuses = project
        .migrator(&db, &source)
        .status()
        .await
        .context("Failed to read migration status")?;

    match args.output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&statuses)?);
        }
        OutputFormat::Table => print_table(&statuses),
    }
    Ok(())
}

fn print_table(statuses: &[MigrationStatus]) {
    if statuses.is_empty() {
        println!("No migrations found.");
        return;
    }

    let rows: Vec<[String; 4]> = statuses.iter().map(row).collect();
    let name_width = rows
        .iter()
        .map(|r| r[0].len())
        .max()
        .unwrap_or(0)
        .max("MIGRATION".len());

    println!(
        "{:<name_width$}  {:<8}  {:>5}  APPLIED AT",
        "MIGRATION", "STATUS", "BATCH"
    );
    for [name, state, batch, applied_at] in &rows {
        println!("{name:<name_width$}  {state:<8}  {batch:>5}  {applied_at}");
    }

    let pending = statuses
        .iter()
        .filter(|s| s.state == MigrationState::Pending)
        .count();
    println!();
    println!("{} migration(s), {} pending", statuses.len(), pending);
}

fn row(status: &MigrationStatus) -> [String; 4] {
    let (state, batch, applied_at) = match &status.state {
        MigrationState::Pending => ("pending", String::new(), String::new()),
        MigrationState::Applied { batch, applied_at } => {
            ("applied", batch.to_string(), applied_at.format("%Y-%m-%d %H:%M:%S").to_string())
        }
        MigrationState::Missing { batch, applied_at } => {
            ("missing", batch.to_string(), applied_at.format("%Y-%m-%d %H:%M:%S").to_string())
        }
    };
    [status.name.to_string(), state.to_string(), batch, applied_at]
}
