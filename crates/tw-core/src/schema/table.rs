//! Table builder: accumulates column clauses for one `CREATE TABLE`.

use super::column::{ColumnClause, ColumnKind, DefaultValue, Modifier};
use super::handle::ColumnHandle;

/// Generator used by [`TableBuilder::id`] columns.
pub const UUID_GENERATOR: &str = "gen_random_uuid()";

/// A finished table description, consumed once by the DDL compiler.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDefinition {
    pub name: String,
    pub columns: Vec<ColumnClause>,
}

impl TableDefinition {
    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&ColumnClause> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Chainable builder for a single table.
///
/// Each column-introducing call appends one clause and returns a
/// [`ColumnHandle`] bound to it.
#[derive(Debug)]
pub struct TableBuilder {
    name: String,
    pub(super) columns: Vec<ColumnClause>,
}

impl TableBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[ColumnClause] {
        &self.columns
    }

    /// Append a column of `kind` and return its handle.
    pub fn column(&mut self, name: impl Into<String>, kind: ColumnKind) -> ColumnHandle<'_> {
        let index = self.columns.len();
        self.columns.push(ColumnClause::new(name, kind));
        ColumnHandle::new(&mut self.columns, index)
    }

    /// UUID primary key generated by the store:
    /// `<name> UUID DEFAULT gen_random_uuid() PRIMARY KEY`.
    pub fn id(&mut self, name: impl Into<String>) -> ColumnHandle<'_> {
        self.column(name, ColumnKind::Uuid)
            .default_to(DefaultValue::expression(UUID_GENERATOR))
            .primary()
    }

    /// Auto-incrementing integer primary key backed by a sequence named
    /// `<table>_<name>_seq`.
    pub fn increments(&mut self, name: impl Into<String>) -> ColumnHandle<'_> {
        let name = name.into();
        let sequence = format!("{}_{}_seq", self.name, name);
        self.column(name, ColumnKind::Integer)
            .default_to(DefaultValue::NextVal(sequence))
            .primary()
    }

    /// `VARCHAR(length)`, or unbounded `VARCHAR` when `length` is `None`.
    pub fn string(&mut self, name: impl Into<String>, length: Option<u32>) -> ColumnHandle<'_> {
        self.column(name, ColumnKind::String { length })
    }

    pub fn text(&mut self, name: impl Into<String>) -> ColumnHandle<'_> {
        self.column(name, ColumnKind::Text)
    }

    pub fn integer(&mut self, name: impl Into<String>) -> ColumnHandle<'_> {
        self.column(name, ColumnKind::Integer)
    }

    pub fn big_integer(&mut self, name: impl Into<String>) -> ColumnHandle<'_> {
        self.column(name, ColumnKind::BigInteger)
    }

    pub fn decimal(
        &mut self,
        name: impl Into<String>,
        precision: u8,
        scale: u8,
    ) -> ColumnHandle<'_> {
        self.column(name, ColumnKind::Decimal { precision, scale })
    }

    pub fn boolean(&mut self, name: impl Into<String>) -> ColumnHandle<'_> {
        self.column(name, ColumnKind::Boolean)
    }

    pub fn json(&mut self, name: impl Into<String>) -> ColumnHandle<'_> {
        self.column(name, ColumnKind::Json)
    }

    pub fn uuid(&mut self, name: impl Into<String>) -> ColumnHandle<'_> {
        self.column(name, ColumnKind::Uuid)
    }

    pub fn date(&mut self, name: impl Into<String>) -> ColumnHandle<'_> {
        self.column(name, ColumnKind::Date)
    }

    pub fn timestamp(&mut self, name: impl Into<String>) -> ColumnHandle<'_> {
        self.column(name, ColumnKind::Timestamp)
    }

    /// `created_at` and `updated_at`, both `TIMESTAMP NOT NULL DEFAULT current_timestamp`.
    pub fn timestamps(&mut self) {
        for name in ["created_at", "updated_at"] {
            let mut clause = ColumnClause::new(name, ColumnKind::Timestamp);
            clause.apply(Modifier::NotNull);
            clause.apply(Modifier::Default(DefaultValue::expression(
                "current_timestamp",
            )));
            self.columns.push(clause);
        }
    }

    /// Finish the table.
    pub fn into_definition(self) -> TableDefinition {
        TableDefinition {
            name: self.name,
            columns: self.columns,
        }
    }
}
