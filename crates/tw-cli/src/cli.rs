//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Tablewright - schema migrations compiled from a table builder DSL
#[derive(Parser, Debug)]
#[command(name = "tw")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override target (database connection)
    #[arg(short, long, global = true)]
    pub target: Option<String>,

    /// Override database path of the resolved target
    #[arg(long, global = true)]
    pub database: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply all pending migrations as a new batch
    Migrate(MigrateArgs),

    /// Show applied, pending, and missing migrations
    Status(StatusArgs),

    /// Revert the most recent batch
    Rollback(RollbackArgs),

    /// Print the SQL a migration compiles to
    Compile(CompileArgs),

    /// Create a new migration file
    Make(MakeArgs),
}

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Print the statements of pending migrations without executing them
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

/// Status output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Aligned text columns
    Table,
    /// JSON array
    Json,
}

/// Arguments for the rollback command
#[derive(Args, Debug)]
pub struct RollbackArgs {
    /// List the migrations of the last batch without reverting them
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the compile command
#[derive(Args, Debug)]
pub struct CompileArgs {
    /// Migration identifiers to compile (default: all)
    pub migrations: Vec<String>,

    /// Compile the down direction instead of up
    #[arg(long)]
    pub down: bool,
}

/// Arguments for the make command
#[derive(Args, Debug)]
pub struct MakeArgs {
    /// Migration name, e.g. create_users
    pub name: String,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
