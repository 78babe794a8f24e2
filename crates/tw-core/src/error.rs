//! Error types for tw-core

use thiserror::Error;

/// Core error type for Tablewright
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Invalid configuration value
    #[error("[E002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E003: Migrations directory not found
    #[error("[E003] Migrations directory not found: {path}")]
    MigrationsDirNotFound { path: String },

    /// E004: Migration identifier not available from the source
    #[error("[E004] Migration not found: {name}")]
    MigrationNotFound { name: String },

    /// E005: Two migration files resolve to the same identifier
    #[error("[E005] Duplicate migration '{name}' in {path1} and {path2}")]
    DuplicateMigration {
        name: String,
        path1: String,
        path2: String,
    },

    /// E006: Migration file could not be interpreted
    #[error("[E006] Failed to parse migration file {path}: {message}")]
    MigrationParseError { path: String, message: String },

    /// E007: Table definition cannot be compiled
    #[error("[E007] Invalid table definition for '{table}': {reason}")]
    InvalidTable { table: String, reason: String },

    /// E008: Identifier contains characters that cannot be emitted unquoted
    #[error("[E008] Invalid identifier '{name}': must match [A-Za-z_][A-Za-z0-9_]*")]
    InvalidIdentifier { name: String },

    /// E009: IO error
    #[error("[E009] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// E010: IO error with file path context
    #[error("[E010] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E011: YAML parse error
    #[error("[E011] YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
