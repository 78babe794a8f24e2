//! Database trait definition

use crate::error::DbResult;
use async_trait::async_trait;

/// Database abstraction trait for Tablewright
///
/// All calls on one value share a single session, so `BEGIN TRANSACTION`
/// issued through `execute` stays open until a later `COMMIT` or `ROLLBACK`.
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute a single statement, returns affected rows
    async fn execute(&self, sql: &str) -> DbResult<usize>;

    /// Execute multiple semicolon separated statements
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Check if a table or view exists
    async fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Execute query returning row count
    async fn query_count(&self, sql: &str) -> DbResult<usize>;

    /// Execute a query and return every row with each value rendered as text.
    ///
    /// NULL renders as `"null"`.
    async fn query_rows(&self, sql: &str) -> DbResult<Vec<Vec<String>>>;

    /// Create a schema if it does not exist
    async fn create_schema_if_not_exists(&self, schema: &str) -> DbResult<()>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
