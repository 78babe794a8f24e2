//! Migration discovery.
//!
//! A [`MigrationSource`] enumerates migration identifiers in execution order
//! and loads a definition by identifier. Execution order is the lexicographic
//! order of identifiers; callers choose identifiers (timestamp prefixes) so
//! that this matches the order migrations were authored in. The sources do not
//! check that precondition.

mod directory;
mod embedded;
mod file;

pub use directory::DirectorySource;
pub use embedded::EmbeddedSource;
pub use file::{ColumnSpec, ColumnType, DefaultSpec, MigrationFile, ReferenceSpec, Step, TableSpec};

use crate::error::CoreResult;
use crate::migration::Migration;
use crate::migration_name::MigrationName;
use std::sync::Arc;

/// Enumerates and loads migration definitions.
pub trait MigrationSource: Send + Sync {
    /// All available identifiers, sorted lexicographically.
    fn list_available(&self) -> CoreResult<Vec<MigrationName>>;

    /// Load the definition registered under `name`.
    fn load(&self, name: &MigrationName) -> CoreResult<Arc<dyn Migration>>;
}
