//! Opening the target database.

use crate::error::{MigrateError, MigrateResult};
use tw_core::config::DatabaseConfig;
use tw_db::DuckDbBackend;

/// Open the database described by `config`.
///
/// The returned backend holds the single connection used for a run and
/// closes it when dropped.
pub fn connect(config: &DatabaseConfig) -> MigrateResult<DuckDbBackend> {
    DuckDbBackend::from_config(config).map_err(|e| MigrateError::ConnectionError(e.to_string()))
}
