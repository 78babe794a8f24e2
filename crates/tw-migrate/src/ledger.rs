//! The ledger of applied migrations.
//!
//! One row per applied migration:
//!
//! | column           | type      | notes                              |
//! |------------------|-----------|------------------------------------|
//! | `id`             | INTEGER   | primary key, from `<table>_id_seq` |
//! | `name`           | VARCHAR   | unique identifier                  |
//! | `batch`          | INTEGER   | run that applied the migration     |
//! | `migration_time` | TIMESTAMP | defaults to apply time             |

use crate::error::{MigrateError, MigrateResult};
use chrono::NaiveDateTime;
use serde::Serialize;
use tw_core::sql_utils::{check_qualified_name, quote_literal, split_qualified_name};
use tw_core::MigrationName;
use tw_db::Database;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// One applied migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationRecord {
    pub id: i64,
    pub name: MigrationName,
    pub batch: i64,
    pub applied_at: NaiveDateTime,
}

/// Reads and writes the ledger table.
pub struct Ledger<'a> {
    db: &'a dyn Database,
    table: String,
}

impl<'a> Ledger<'a> {
    pub fn new(db: &'a dyn Database, table: impl Into<String>) -> Self {
        Self {
            db,
            table: table.into(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Whether the ledger table has been created.
    pub async fn exists(&self) -> MigrateResult<bool> {
        self.db
            .relation_exists(&self.table)
            .await
            .map_err(|e| MigrateError::LedgerQuery(e.to_string()))
    }

    /// Create the ledger table (and its schema and id sequence) if absent.
    pub async fn ensure(&self) -> MigrateResult<()> {
        check_qualified_name(&self.table).map_err(|e| MigrateError::LedgerInit(e.to_string()))?;

        if self.table.contains('.') {
            let (schema, _) = split_qualified_name(&self.table);
            self.db
                .create_schema_if_not_exists(schema)
                .await
                .map_err(|e| MigrateError::LedgerInit(e.to_string()))?;
        }

        let t = &self.table;
        let sql = format!(
            "CREATE SEQUENCE IF NOT EXISTS {t}_id_seq;
             CREATE TABLE IF NOT EXISTS {t} (
                 id             INTEGER PRIMARY KEY DEFAULT nextval('{t}_id_seq'),
                 name           VARCHAR NOT NULL UNIQUE,
                 batch          INTEGER NOT NULL,
                 migration_time TIMESTAMP NOT NULL DEFAULT current_timestamp
             );"
        );
        self.db
            .execute_batch(&sql)
            .await
            .map_err(|e| MigrateError::LedgerInit(format!("failed to create {t}: {e}")))
    }

    /// All records, ordered by id ascending.
    pub async fn list_applied(&self) -> MigrateResult<Vec<MigrationRecord>> {
        let sql = format!(
            "SELECT id, name, batch, CAST(migration_time AS VARCHAR) FROM {} ORDER BY id",
            self.table
        );
        let rows = self
            .db
            .query_rows(&sql)
            .await
            .map_err(|e| MigrateError::LedgerQuery(e.to_string()))?;
        rows.into_iter().map(parse_record).collect()
    }

    /// `max(batch) + 1`, or 1 for an empty ledger.
    pub async fn next_batch_number(&self) -> MigrateResult<i64> {
        let sql = format!("SELECT COALESCE(MAX(batch), 0) + 1 FROM {}", self.table);
        let rows = self
            .db
            .query_rows(&sql)
            .await
            .map_err(|e| MigrateError::LedgerQuery(e.to_string()))?;
        let value = rows
            .first()
            .and_then(|row| row.first())
            .ok_or_else(|| MigrateError::LedgerQuery("batch query returned no rows".to_string()))?;
        parse_int(value, "batch")
    }

    /// Append a record for `name`.
    ///
    /// Fails with [`MigrateError::DuplicateMigration`] when `name` is already
    /// present.
    pub async fn record(&self, name: &MigrationName, batch: i64) -> MigrateResult<()> {
        let literal = quote_literal(name.as_str());
        let existing = self
            .db
            .query_count(&format!(
                "SELECT 1 FROM {} WHERE name = {literal}",
                self.table
            ))
            .await
            .map_err(|e| MigrateError::LedgerQuery(e.to_string()))?;
        if existing > 0 {
            return Err(MigrateError::DuplicateMigration {
                name: name.to_string(),
            });
        }

        let sql = format!(
            "INSERT INTO {} (name, batch) VALUES ({literal}, {batch})",
            self.table
        );
        self.db.execute(&sql).await.map_err(|e| {
            let msg = e.to_string();
            if msg.contains("Duplicate key") || msg.contains("unique constraint") {
                MigrateError::DuplicateMigration {
                    name: name.to_string(),
                }
            } else {
                MigrateError::LedgerQuery(msg)
            }
        })?;
        log::debug!("Recorded {} in batch {}", name, batch);
        Ok(())
    }

    /// Delete the record for `name`.
    pub async fn remove(&self, name: &MigrationName) -> MigrateResult<()> {
        let sql = format!(
            "DELETE FROM {} WHERE name = {}",
            self.table,
            quote_literal(name.as_str())
        );
        let affected = self
            .db
            .execute(&sql)
            .await
            .map_err(|e| MigrateError::LedgerQuery(e.to_string()))?;
        if affected == 0 {
            return Err(MigrateError::LedgerQuery(format!(
                "no ledger record for '{name}'"
            )));
        }
        Ok(())
    }
}

fn parse_record(row: Vec<String>) -> MigrateResult<MigrationRecord> {
    let [id, name, batch, applied_at]: [String; 4] = row.try_into().map_err(|row: Vec<String>| {
        MigrateError::LedgerQuery(format!("expected 4 ledger columns, got {}", row.len()))
    })?;
    let name = MigrationName::try_new(name)
        .ok_or_else(|| MigrateError::LedgerQuery("ledger record with empty name".to_string()))?;
    let applied_at = NaiveDateTime::parse_from_str(&applied_at, TIMESTAMP_FORMAT).map_err(|e| {
        MigrateError::LedgerQuery(format!("invalid migration_time '{applied_at}': {e}"))
    })?;
    Ok(MigrationRecord {
        id: parse_int(&id, "id")?,
        name,
        batch: parse_int(&batch, "batch")?,
        applied_at,
    })
}

fn parse_int(value: &str, column: &str) -> MigrateResult<i64> {
    value
        .parse()
        .map_err(|_| MigrateError::LedgerQuery(format!("invalid {column} value '{value}'")))
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
