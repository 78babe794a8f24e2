//! Compile command implementation

use anyhow::{Context, Result};
use tw_core::{compile_schema, Migration, MigrationName, MigrationSource, Schema};

use crate::cli::{CompileArgs, GlobalArgs};
use crate::commands::common::load_project;

/// Execute the compile command
///
/// Compiles migrations without connecting to the database.
pub async fn execute(args: &CompileArgs, global: &GlobalArgs) -> Result<()> {
    let project = load_project(global)?;
    let source = project.source();

    let names = if args.migrations.is_empty() {
        source
            .list_available()
            .context("Failed to list migrations")?
    } else {
        args.migrations
            .iter()
            .map(|name| {
                MigrationName::try_new(name.as_str())
                    .with_context(|| format!("Invalid migration name '{name}'"))
            })
            .collect::<Result<Vec<_>>>()?
    };

    for (i, name) in names.iter().enumerate() {
        let migration = source
            .load(name)
            .with_context(|| format!("Failed to load migration '{name}'"))?;
        let statements = compile(&*migration, args.down)
            .with_context(|| format!("Failed to compile migration '{name}'"))?;

        if i > 0 {
            println!();
        }
        println!("-- {name}");
        for statement in &statements {
            println!("{statement};");
        }
    }
    Ok(())
}

fn compile(migration: &dyn Migration, down: bool) -> tw_core::CoreResult<Vec<String>> {
    let mut schema = Schema::new();
    if down {
        migration.down(&mut schema);
    } else {
        migration.up(&mut schema);
    }
    compile_schema(&schema)
}
