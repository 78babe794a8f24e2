//! Migration executor.
//!
//! A run lists the available identifiers, subtracts the ledger, assigns one
//! batch number, then applies each pending migration in order. Each
//! migration's statements and its ledger insert share one transaction. The
//! first failure stops the run; migrations committed before it stay recorded.

use crate::error::{MigrateError, MigrateResult};
use crate::ledger::{Ledger, MigrationRecord};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tw_core::config::DEFAULT_LEDGER_TABLE;
use tw_core::{compile_schema, CoreError, Migration, MigrationName, MigrationSource, Schema};
use tw_db::Database;

/// Outcome of [`Migrator::run`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Batch shared by this run, `None` when nothing was pending
    pub batch: Option<i64>,
    pub applied: Vec<MigrationName>,
}

/// Outcome of [`Migrator::rollback`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RollbackReport {
    /// Batch that was reverted, `None` when the ledger was empty
    pub batch: Option<i64>,
    /// Identifiers in the order they were reverted
    pub reverted: Vec<MigrationName>,
}

/// A pending migration and the statements it would execute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedMigration {
    pub name: MigrationName,
    pub statements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MigrationState {
    Pending,
    Applied {
        batch: i64,
        applied_at: NaiveDateTime,
    },
    /// Recorded in the ledger, but no longer provided by the source
    Missing {
        batch: i64,
        applied_at: NaiveDateTime,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationStatus {
    pub name: MigrationName,
    #[serde(flatten)]
    pub state: MigrationState,
}

enum LedgerChange {
    Record(i64),
    Remove,
}

/// Applies migrations from a [`MigrationSource`] to a [`Database`].
pub struct Migrator<'a> {
    db: &'a dyn Database,
    source: &'a dyn MigrationSource,
    ledger_table: String,
}

impl<'a> Migrator<'a> {
    pub fn new(db: &'a dyn Database, source: &'a dyn MigrationSource) -> Self {
        Self {
            db,
            source,
            ledger_table: DEFAULT_LEDGER_TABLE.to_string(),
        }
    }

    /// Use `table` (optionally schema-qualified) as the ledger.
    pub fn with_ledger_table(mut self, table: impl Into<String>) -> Self {
        self.ledger_table = table.into();
        self
    }

    pub fn ledger(&self) -> Ledger<'a> {
        Ledger::new(self.db, self.ledger_table.clone())
    }

    /// Apply every pending migration as one new batch.
    pub async fn run(&self) -> MigrateResult<RunReport> {
        let ledger = self.ledger();
        ledger.ensure().await?;

        let pending = self.diff(&ledger.list_applied().await?)?;
        if pending.is_empty() {
            log::info!("Nothing to migrate");
            return Ok(RunReport {
                batch: None,
                applied: Vec::new(),
            });
        }

        let batch = ledger.next_batch_number().await?;
        log::info!(
            "Applying {} migration(s) as batch {} on {}",
            pending.len(),
            batch,
            self.db.db_type()
        );

        let mut applied = Vec::with_capacity(pending.len());
        for name in pending {
            let migration = self.load(&name)?;
            let statements = compile(&name, |schema| migration.up(schema))?;
            self.apply_atomically(&ledger, &name, &statements, LedgerChange::Record(batch))
                .await?;
            log::info!("Migrated {} ({} statement(s))", name, statements.len());
            applied.push(name);
        }

        Ok(RunReport {
            batch: Some(batch),
            applied,
        })
    }

    /// Identifiers that a run would apply, in order. Does not create the ledger.
    pub async fn pending(&self) -> MigrateResult<Vec<MigrationName>> {
        let applied = self.applied_if_exists().await?;
        self.diff(&applied)
    }

    /// Compile every pending migration without executing anything.
    pub async fn plan(&self) -> MigrateResult<Vec<PlannedMigration>> {
        let mut planned = Vec::new();
        for name in self.pending().await? {
            let migration = self.load(&name)?;
            let statements = compile(&name, |schema| migration.up(schema))?;
            planned.push(PlannedMigration { name, statements });
        }
        Ok(planned)
    }

    /// Revert the most recent batch.
    ///
    /// Records of that batch are reverted newest first, each running its
    /// `down` body and deleting its ledger record in one transaction. Every
    /// definition is loaded and compiled before anything is executed.
    pub async fn rollback(&self) -> MigrateResult<RollbackReport> {
        let ledger = self.ledger();
        let records = self.last_batch().await?;
        let Some(batch) = records.first().map(|r| r.batch) else {
            log::info!("Nothing to roll back");
            return Ok(RollbackReport {
                batch: None,
                reverted: Vec::new(),
            });
        };

        let mut steps = Vec::new();
        for record in &records {
            let migration = match self.source.load(&record.name) {
                Ok(m) => m,
                Err(CoreError::MigrationNotFound { .. }) => {
                    return Err(MigrateError::MissingMigration {
                        name: record.name.to_string(),
                    })
                }
                Err(source) => {
                    return Err(MigrateError::Load {
                        migration: record.name.to_string(),
                        source,
                    })
                }
            };
            let statements = compile(&record.name, |schema| migration.down(schema))?;
            steps.push((record.name.clone(), statements));
        }

        log::info!("Rolling back batch {} ({} migration(s))", batch, steps.len());
        let mut reverted = Vec::with_capacity(steps.len());
        for (name, statements) in steps {
            self.apply_atomically(&ledger, &name, &statements, LedgerChange::Remove)
                .await?;
            log::info!("Rolled back {}", name);
            reverted.push(name);
        }

        Ok(RollbackReport {
            batch: Some(batch),
            reverted,
        })
    }

    /// Records of the most recent batch, newest first.
    pub async fn last_batch(&self) -> MigrateResult<Vec<MigrationRecord>> {
        let records = self.applied_if_exists().await?;
        let Some(batch) = records.iter().map(|r| r.batch).max() else {
            return Ok(Vec::new());
        };
        Ok(records
            .into_iter()
            .rev()
            .filter(|r| r.batch == batch)
            .collect())
    }

    /// Every available identifier with its state, followed by ledger records
    /// whose definitions are gone.
    pub async fn status(&self) -> MigrateResult<Vec<MigrationStatus>> {
        let available = self.source.list_available().map_err(MigrateError::Discovery)?;
        let records = self.applied_if_exists().await?;
        let by_name: HashMap<&MigrationName, &MigrationRecord> =
            records.iter().map(|r| (&r.name, r)).collect();

        let mut statuses: Vec<MigrationStatus> = available
            .iter()
            .map(|name| MigrationStatus {
                name: name.clone(),
                state: match by_name.get(name) {
                    Some(r) => MigrationState::Applied {
                        batch: r.batch,
                        applied_at: r.applied_at,
                    },
                    None => MigrationState::Pending,
                },
            })
            .collect();

        let known: HashSet<&MigrationName> = available.iter().collect();
        for record in records.iter().filter(|r| !known.contains(&r.name)) {
            log::warn!(
                "Ledger record {} (batch {}) has no migration definition",
                record.name,
                record.batch
            );
            statuses.push(MigrationStatus {
                name: record.name.clone(),
                state: MigrationState::Missing {
                    batch: record.batch,
                    applied_at: record.applied_at,
                },
            });
        }
        Ok(statuses)
    }

    fn diff(&self, applied: &[MigrationRecord]) -> MigrateResult<Vec<MigrationName>> {
        let available = self.source.list_available().map_err(MigrateError::Discovery)?;
        let done: HashSet<&MigrationName> = applied.iter().map(|r| &r.name).collect();
        Ok(available
            .into_iter()
            .filter(|name| !done.contains(name))
            .collect())
    }

    async fn applied_if_exists(&self) -> MigrateResult<Vec<MigrationRecord>> {
        let ledger = self.ledger();
        if ledger.exists().await? {
            ledger.list_applied().await
        } else {
            Ok(Vec::new())
        }
    }

    fn load(&self, name: &MigrationName) -> MigrateResult<Arc<dyn Migration>> {
        self.source.load(name).map_err(|source| MigrateError::Load {
            migration: name.to_string(),
            source,
        })
    }

    /// Execute `statements` and apply `change` to the ledger inside a
    /// `BEGIN` / `COMMIT` transaction, rolling back on error.
    async fn apply_atomically(
        &self,
        ledger: &Ledger<'_>,
        name: &MigrationName,
        statements: &[String],
        change: LedgerChange,
    ) -> MigrateResult<()> {
        self.db
            .execute("BEGIN TRANSACTION")
            .await
            .map_err(|e| MigrateError::TransactionError(format!("BEGIN failed: {e}")))?;

        let result = self.apply_statements(ledger, name, statements, change).await;

        match &result {
            Ok(()) => {
                if let Err(commit_err) = self.db.execute("COMMIT").await {
                    if let Err(e) = self.db.execute("ROLLBACK").await {
                        log::warn!("ROLLBACK after failed COMMIT of {} failed: {}", name, e);
                    }
                    return Err(MigrateError::TransactionError(format!(
                        "COMMIT failed for '{name}': {commit_err}"
                    )));
                }
            }
            Err(_) => {
                if let Err(e) = self.db.execute("ROLLBACK").await {
                    log::warn!("ROLLBACK after failed migration {} failed: {}", name, e);
                }
            }
        }
        result
    }

    async fn apply_statements(
        &self,
        ledger: &Ledger<'_>,
        name: &MigrationName,
        statements: &[String],
        change: LedgerChange,
    ) -> MigrateResult<()> {
        for sql in statements {
            log::debug!("{}: {}", name, sql);
            self.db
                .execute_batch(sql)
                .await
                .map_err(|e| MigrateError::DdlExecution {
                    migration: name.to_string(),
                    message: e.to_string(),
                })?;
        }
        match change {
            LedgerChange::Record(batch) => ledger.record(name, batch).await,
            LedgerChange::Remove => ledger.remove(name).await,
        }
    }
}

/// Run a migration body against a fresh [`Schema`] and compile the result.
fn compile<F>(name: &MigrationName, body: F) -> MigrateResult<Vec<String>>
where
    F: FnOnce(&mut Schema),
{
    let mut schema = Schema::new();
    body(&mut schema);
    compile_schema(&schema).map_err(|source| MigrateError::Compile {
        migration: name.to_string(),
        source,
    })
}
