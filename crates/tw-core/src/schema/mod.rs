//! Table builder DSL.
//!
//! A migration body receives a [`Schema`] and describes the structure it
//! wants through chained calls:
//!
//! ```
//! use tw_core::schema::{OnDelete, Schema};
//!
//! let mut schema = Schema::new();
//! schema.create_table("posts", |t| {
//!     t.id("id");
//!     t.string("title", Some(200)).not_nullable().default_to("untitled");
//!     t.uuid("author_id")
//!         .references("id")
//!         .in_table("users")
//!         .on_delete(OnDelete::Cascade);
//!     t.timestamps();
//! });
//! assert_eq!(schema.ops().len(), 1);
//! ```
//!
//! The accumulated operations are turned into SQL by [`crate::ddl`].

mod column;
mod handle;
mod table;

pub use column::{ColumnClause, ColumnKind, DefaultValue, ForeignKey, Modifier, OnDelete};
pub use handle::{ColumnHandle, ForeignKeyHandle, PendingReference};
pub use table::{TableBuilder, TableDefinition, UUID_GENERATOR};

/// One schema operation recorded by a migration body.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaOp {
    /// `CREATE TABLE IF NOT EXISTS`
    CreateTable(TableDefinition),
    /// `DROP TABLE IF EXISTS`
    DropTable(String),
    /// A statement passed through verbatim
    Raw(String),
}

/// Ordered accumulator of schema operations for one migration direction.
#[derive(Debug, Default)]
pub struct Schema {
    ops: Vec<SchemaOp>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Describe a table with a fresh [`TableBuilder`].
    pub fn create_table<F>(&mut self, name: impl Into<String>, build: F) -> &mut Self
    where
        F: FnOnce(&mut TableBuilder),
    {
        let mut table = TableBuilder::new(name);
        build(&mut table);
        self.ops.push(SchemaOp::CreateTable(table.into_definition()));
        self
    }

    pub fn drop_table_if_exists(&mut self, name: impl Into<String>) -> &mut Self {
        self.ops.push(SchemaOp::DropTable(name.into()));
        self
    }

    pub fn raw(&mut self, sql: impl Into<String>) -> &mut Self {
        self.ops.push(SchemaOp::Raw(sql.into()));
        self
    }

    pub fn ops(&self) -> &[SchemaOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<SchemaOp> {
        self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

#[cfg(test)]
#[path = "schema_test.rs"]
mod tests;
