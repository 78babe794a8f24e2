//! DDL compiler: renders builder output into executable statements.
//!
//! Every `CREATE` statement is emitted with `IF NOT EXISTS` so that a
//! statement can be re-executed against a store where the object already
//! exists, independently of the migration ledger.

use crate::error::{CoreError, CoreResult};
use crate::schema::{
    ColumnClause, ColumnKind, DefaultValue, ForeignKey, Modifier, Schema, SchemaOp,
    TableDefinition,
};
use crate::sql_utils::{check_identifier, check_qualified_name, quote_literal};
use std::collections::HashSet;

/// Compile one table definition into a single `CREATE TABLE IF NOT EXISTS` statement.
///
/// Fails when the table has no columns, repeats a column name, or uses an
/// identifier that cannot be emitted unquoted.
pub fn compile_table(def: &TableDefinition) -> CoreResult<String> {
    validate_table(def)?;
    let columns = def
        .columns
        .iter()
        .map(compile_column)
        .collect::<Vec<_>>()
        .join(", ");
    Ok(format!("CREATE TABLE IF NOT EXISTS {} ({})", def.name, columns))
}

/// Render one column clause: `<name> <type>` followed by its modifiers in
/// the order they were applied.
pub fn compile_column(clause: &ColumnClause) -> String {
    let mut sql = format!("{} {}", clause.name, render_type(&clause.kind));
    for modifier in &clause.modifiers {
        sql.push(' ');
        sql.push_str(&render_modifier(modifier));
    }
    sql
}

/// Compile every operation of a migration body, in order.
///
/// Tables whose columns draw from a sequence are preceded by the matching
/// `CREATE SEQUENCE IF NOT EXISTS`.
pub fn compile_schema(schema: &Schema) -> CoreResult<Vec<String>> {
    let mut statements = Vec::with_capacity(schema.ops().len());
    for op in schema.ops() {
        match op {
            SchemaOp::CreateTable(def) => {
                let table = compile_table(def)?;
                for sequence in sequences(def) {
                    check_qualified_name(sequence)?;
                    statements.push(format!("CREATE SEQUENCE IF NOT EXISTS {sequence}"));
                }
                statements.push(table);
            }
            SchemaOp::DropTable(name) => {
                check_qualified_name(name)?;
                statements.push(format!("DROP TABLE IF EXISTS {name}"));
            }
            SchemaOp::Raw(sql) => {
                if !sql.trim().is_empty() {
                    statements.push(sql.clone());
                }
            }
        }
    }
    Ok(statements)
}

fn render_type(kind: &ColumnKind) -> String {
    match kind {
        ColumnKind::String { length: Some(n) } => format!("VARCHAR({n})"),
        ColumnKind::String { length: None } => "VARCHAR".to_string(),
        ColumnKind::Text => "TEXT".to_string(),
        ColumnKind::Integer => "INTEGER".to_string(),
        ColumnKind::BigInteger => "BIGINT".to_string(),
        ColumnKind::Decimal { precision, scale } => format!("DECIMAL({precision}, {scale})"),
        ColumnKind::Boolean => "BOOLEAN".to_string(),
        ColumnKind::Json => "JSON".to_string(),
        ColumnKind::Uuid => "UUID".to_string(),
        ColumnKind::Date => "DATE".to_string(),
        ColumnKind::Timestamp => "TIMESTAMP".to_string(),
    }
}

fn render_modifier(modifier: &Modifier) -> String {
    match modifier {
        Modifier::NotNull => "NOT NULL".to_string(),
        Modifier::Default(value) => format!("DEFAULT {}", render_default(value)),
        Modifier::PrimaryKey => "PRIMARY KEY".to_string(),
        Modifier::Unique => "UNIQUE".to_string(),
        Modifier::References(fk) => render_reference(fk),
    }
}

fn render_default(value: &DefaultValue) -> String {
    match value {
        DefaultValue::Text(s) => quote_literal(s),
        DefaultValue::Integer(n) => n.to_string(),
        DefaultValue::Float(f) => f.to_string(),
        DefaultValue::Boolean(b) => b.to_string(),
        DefaultValue::Expression(expr) => expr.clone(),
        DefaultValue::NextVal(sequence) => format!("nextval({})", quote_literal(sequence)),
    }
}

fn render_reference(fk: &ForeignKey) -> String {
    let mut sql = format!("REFERENCES {}({})", fk.table, fk.column);
    if let Some(action) = fk.on_delete {
        sql.push_str(" ON DELETE ");
        sql.push_str(action.as_sql());
    }
    sql
}

fn sequences(def: &TableDefinition) -> impl Iterator<Item = &str> {
    def.columns.iter().filter_map(|c| match c.default_value() {
        Some(DefaultValue::NextVal(sequence)) => Some(sequence.as_str()),
        _ => None,
    })
}

fn validate_table(def: &TableDefinition) -> CoreResult<()> {
    let invalid = |reason: String| CoreError::InvalidTable {
        table: def.name.clone(),
        reason,
    };

    check_qualified_name(&def.name)?;
    if def.columns.is_empty() {
        return Err(invalid("a table needs at least one column".to_string()));
    }

    let mut seen = HashSet::with_capacity(def.columns.len());
    for column in &def.columns {
        check_identifier(&column.name)?;
        if !seen.insert(column.name.as_str()) {
            return Err(invalid(format!("duplicate column '{}'", column.name)));
        }
        if let Some(DefaultValue::Float(f)) = column.default_value() {
            if !f.is_finite() {
                return Err(invalid(format!(
                    "column '{}' has a non-finite default",
                    column.name
                )));
            }
        }
        if let Some(fk) = column.foreign_key() {
            check_qualified_name(&fk.table)?;
            check_identifier(&fk.column)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "ddl_test.rs"]
mod tests;
