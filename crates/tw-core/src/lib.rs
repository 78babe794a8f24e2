//! tw-core - Core library for Tablewright
//!
//! This crate provides project configuration, the table builder DSL, the DDL
//! compiler, and the migration definitions and sources shared by the other
//! Tablewright crates.

pub mod config;
pub mod ddl;
pub mod error;
pub mod migration;
pub mod migration_name;
pub mod schema;
pub mod source;
pub mod sql_utils;

pub use config::{Config, DatabaseConfig, DbType, TargetConfig};
pub use ddl::{compile_column, compile_schema, compile_table};
pub use error::{CoreError, CoreResult};
pub use migration::{FnMigration, Migration};
pub use migration_name::MigrationName;
pub use schema::{
    ColumnClause, ColumnHandle, ColumnKind, DefaultValue, ForeignKey, ForeignKeyHandle, Modifier,
    OnDelete, PendingReference, Schema, SchemaOp, TableBuilder, TableDefinition,
};
pub use source::{DirectorySource, EmbeddedSource, MigrationFile, MigrationSource};
