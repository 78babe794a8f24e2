//! Error types for the migration executor.

use thiserror::Error;
use tw_core::CoreError;

/// Migration errors.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Failed to open the target database (M001).
    #[error("[M001] Database connection failed: {0}")]
    ConnectionError(String),

    /// The ledger table could not be created or verified (M002).
    #[error("[M002] Ledger initialization failed: {0}")]
    LedgerInit(String),

    /// The identifier is already present in the ledger (M003).
    #[error("[M003] Migration '{name}' is already recorded in the ledger")]
    DuplicateMigration { name: String },

    /// A compiled statement was rejected by the database (M004).
    #[error("[M004] Migration '{migration}' failed: {message}")]
    DdlExecution { migration: String, message: String },

    /// Reading or writing ledger rows failed (M005).
    #[error("[M005] Ledger query failed: {0}")]
    LedgerQuery(String),

    /// The migration definition could not be loaded (M006).
    #[error("[M006] Failed to load migration '{migration}'")]
    Load {
        migration: String,
        #[source]
        source: CoreError,
    },

    /// The migration body produced an invalid schema (M007).
    #[error("[M007] Failed to compile migration '{migration}'")]
    Compile {
        migration: String,
        #[source]
        source: CoreError,
    },

    /// A ledger record has no matching definition (M008).
    #[error("[M008] Migration '{name}' is recorded in the ledger but has no definition")]
    MissingMigration { name: String },

    /// Transaction management error (M009).
    #[error("[M009] Transaction failed: {0}")]
    TransactionError(String),

    /// Listing available migrations failed (M010).
    #[error("[M010] Migration discovery failed")]
    Discovery(#[source] CoreError),
}

/// Result type alias for [`MigrateError`].
pub type MigrateResult<T> = Result<T, MigrateError>;

impl MigrateError {
    /// Identifier of the migration the error is attributed to, if any.
    pub fn migration(&self) -> Option<&str> {
        match self {
            MigrateError::DuplicateMigration { name }
            | MigrateError::MissingMigration { name } => Some(name),
            MigrateError::DdlExecution { migration, .. }
            | MigrateError::Load { migration, .. }
            | MigrateError::Compile { migration, .. } => Some(migration),
            _ => None,
        }
    }
}
