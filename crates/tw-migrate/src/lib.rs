//! tw-migrate - Migration ledger and executor for Tablewright
//!
//! [`Migrator`] diffs the migrations offered by a
//! [`MigrationSource`](tw_core::MigrationSource) against the [`Ledger`] table
//! and applies the pending ones, in identifier order, as one numbered batch.

pub mod connection;
pub mod error;
pub mod ledger;
pub mod migrator;

pub use connection::connect;
pub use error::{MigrateError, MigrateResult};
pub use ledger::{Ledger, MigrationRecord};
pub use migrator::{
    MigrationState, MigrationStatus, Migrator, PlannedMigration, RollbackReport, RunReport,
};
