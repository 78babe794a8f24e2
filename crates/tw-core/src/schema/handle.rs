//! Modifier handles returned by column-introducing builder calls.
//!
//! A handle borrows the table's column list and remembers the index of the
//! clause it was created for. Every modifier writes through that index, so a
//! chain like `.not_nullable().default_to("x")` always lands on the clause
//! that started it.

use super::column::{ColumnClause, DefaultValue, ForeignKey, Modifier, OnDelete};

/// Handle bound to one column clause.
#[derive(Debug)]
pub struct ColumnHandle<'a> {
    columns: &'a mut Vec<ColumnClause>,
    index: usize,
}

impl<'a> ColumnHandle<'a> {
    pub(crate) fn new(columns: &'a mut Vec<ColumnClause>, index: usize) -> Self {
        debug_assert!(index < columns.len());
        Self { columns, index }
    }

    /// Position of the bound clause within the table definition.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Read access to the bound clause.
    pub fn clause(&self) -> &ColumnClause {
        &self.columns[self.index]
    }

    fn apply(self, modifier: Modifier) -> Self {
        self.columns[self.index].apply(modifier);
        self
    }

    /// Append `NOT NULL`.
    pub fn not_nullable(self) -> Self {
        self.apply(Modifier::NotNull)
    }

    /// Append `DEFAULT <value>`.
    pub fn default_to(self, value: impl Into<DefaultValue>) -> Self {
        self.apply(Modifier::Default(value.into()))
    }

    /// Append `PRIMARY KEY`.
    pub fn primary(self) -> Self {
        self.apply(Modifier::PrimaryKey)
    }

    /// Append `UNIQUE`.
    pub fn unique(self) -> Self {
        self.apply(Modifier::Unique)
    }

    /// Start a foreign-key reference to `column`; finish it with
    /// [`PendingReference::in_table`].
    pub fn references(self, column: impl Into<String>) -> PendingReference<'a> {
        PendingReference {
            handle: self,
            column: column.into(),
        }
    }
}

/// A reference whose target table has not been named yet.
///
/// Nothing is written to the clause until [`in_table`](Self::in_table) is called.
#[must_use = "a reference is only recorded once `in_table` is called"]
#[derive(Debug)]
pub struct PendingReference<'a> {
    handle: ColumnHandle<'a>,
    column: String,
}

impl<'a> PendingReference<'a> {
    /// Name the referenced table and record `REFERENCES <table>(<column>)`.
    pub fn in_table(self, table: impl Into<String>) -> ForeignKeyHandle<'a> {
        let handle = self.handle.apply(Modifier::References(ForeignKey {
            table: table.into(),
            column: self.column,
            on_delete: None,
        }));
        ForeignKeyHandle { handle }
    }
}

/// Handle for a clause whose foreign key is complete.
#[derive(Debug)]
pub struct ForeignKeyHandle<'a> {
    handle: ColumnHandle<'a>,
}

impl<'a> ForeignKeyHandle<'a> {
    /// Append `ON DELETE <action>` to the reference.
    pub fn on_delete(self, action: OnDelete) -> ColumnHandle<'a> {
        let recorded = self.handle.columns[self.handle.index].set_on_delete(action);
        debug_assert!(recorded, "foreign key handle without a reference");
        self.handle
    }

    /// Continue with the column's other modifiers, leaving `ON DELETE` unset.
    pub fn column(self) -> ColumnHandle<'a> {
        self.handle
    }
}
