//! Declarative YAML migration files.
//!
//! ```yaml
//! description: create users
//! up:
//!   - create_table:
//!       name: users
//!       columns:
//!         - { name: id, type: id }
//!         - { name: email, type: string, length: 255, not_null: true, unique: true }
//!         - { name: team_id, type: uuid, references: { table: teams, on_delete: cascade } }
//!         - { type: timestamps }
//!   - raw: CREATE INDEX idx_users_email ON users (email)
//! down:
//!   - drop_table: users
//! ```
//!
//! Each step is interpreted through the table builder DSL, so a file and a
//! hand-written [`Migration`] produce the same statements.

use crate::error::{CoreError, CoreResult};
use crate::migration::Migration;
use crate::schema::{ColumnHandle, DefaultValue, OnDelete, Schema, TableBuilder};
use serde::Deserialize;
use std::path::Path;

/// One column entry of a `create_table` step.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnSpec {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(rename = "type")]
    pub kind: ColumnType,

    /// `string` only
    #[serde(default)]
    pub length: Option<u32>,

    /// `decimal` only, required there
    #[serde(default)]
    pub precision: Option<u8>,

    /// `decimal` only, required there
    #[serde(default)]
    pub scale: Option<u8>,

    #[serde(default)]
    pub not_null: bool,

    #[serde(default)]
    pub default: Option<DefaultSpec>,

    #[serde(default)]
    pub primary: bool,

    #[serde(default)]
    pub unique: bool,

    #[serde(default)]
    pub references: Option<ReferenceSpec>,
}

/// The `type` of a column entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Id,
    Increments,
    String,
    Text,
    Integer,
    BigInteger,
    Decimal,
    Boolean,
    Json,
    Uuid,
    Date,
    Timestamp,
    Timestamps,
}

/// A default value as written in YAML.
///
/// Scalars map to typed defaults; `{ raw: <expr> }` passes an SQL expression
/// through unquoted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DefaultSpec {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Expression { raw: String },
}

impl From<DefaultSpec> for DefaultValue {
    fn from(spec: DefaultSpec) -> Self {
        match spec {
            DefaultSpec::Boolean(b) => DefaultValue::Boolean(b),
            DefaultSpec::Integer(n) => DefaultValue::Integer(n),
            DefaultSpec::Float(f) => DefaultValue::Float(f),
            DefaultSpec::Text(s) => DefaultValue::Text(s),
            DefaultSpec::Expression { raw } => DefaultValue::Expression(raw),
        }
    }
}

/// `references:` block of a column entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReferenceSpec {
    pub table: String,

    #[serde(default = "default_reference_column")]
    pub column: String,

    #[serde(default)]
    pub on_delete: Option<OnDelete>,
}

fn default_reference_column() -> String {
    "id".to_string()
}

/// `create_table:` step body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableSpec {
    pub name: String,
    pub columns: Vec<ColumnSpec>,
}

/// One interpreted step of a migration file.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    CreateTable(TableSpec),
    DropTable(String),
    Raw(String),
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawStep {
    #[serde(default)]
    create_table: Option<TableSpec>,
    #[serde(default)]
    drop_table: Option<String>,
    #[serde(default)]
    raw: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMigrationFile {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    up: Vec<RawStep>,
    #[serde(default)]
    down: Vec<RawStep>,
}

/// A parsed and validated migration file.
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationFile {
    pub description: Option<String>,
    pub up: Vec<Step>,
    pub down: Vec<Step>,
}

impl MigrationFile {
    /// Read and parse a migration file.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Parse migration YAML; `origin` names the file in error messages.
    pub fn parse(content: &str, origin: &str) -> CoreResult<Self> {
        let parse_error = |message: String| CoreError::MigrationParseError {
            path: origin.to_string(),
            message,
        };

        let raw: RawMigrationFile =
            serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))?;

        let convert = |steps: Vec<RawStep>, direction: &str| -> CoreResult<Vec<Step>> {
            steps
                .into_iter()
                .enumerate()
                .map(|(i, step)| {
                    resolve_step(step)
                        .map_err(|reason| parse_error(format!("{direction}[{i}]: {reason}")))
                })
                .collect()
        };

        Ok(Self {
            description: raw.description,
            up: convert(raw.up, "up")?,
            down: convert(raw.down, "down")?,
        })
    }
}

impl Migration for MigrationFile {
    fn up(&self, schema: &mut Schema) {
        apply_steps(&self.up, schema);
    }

    fn down(&self, schema: &mut Schema) {
        apply_steps(&self.down, schema);
    }
}

fn resolve_step(step: RawStep) -> Result<Step, String> {
    let step = match (step.create_table, step.drop_table, step.raw) {
        (Some(table), None, None) => Step::CreateTable(table),
        (None, Some(name), None) => Step::DropTable(name),
        (None, None, Some(sql)) => Step::Raw(sql),
        (None, None, None) => {
            return Err("step must contain one of create_table, drop_table, raw".to_string())
        }
        _ => return Err("step must contain exactly one operation".to_string()),
    };
    if let Step::CreateTable(table) = &step {
        for (i, column) in table.columns.iter().enumerate() {
            validate_column(column)
                .map_err(|reason| format!("table '{}' column {i}: {reason}", table.name))?;
        }
    }
    Ok(step)
}

fn validate_column(column: &ColumnSpec) -> Result<(), String> {
    validate_type_parameters(column)?;
    if column.kind == ColumnType::Timestamps {
        let has_modifiers = column.not_null
            || column.default.is_some()
            || column.primary
            || column.unique
            || column.references.is_some();
        if column.name.is_some() || has_modifiers {
            return Err("timestamps takes no name or modifiers".to_string());
        }
        return Ok(());
    }
    match column.name.as_deref() {
        Some(name) if !name.is_empty() => Ok(()),
        _ => Err("column is missing a name".to_string()),
    }
}

/// Reject `length`, `precision` and `scale` on types that do not take them.
fn validate_type_parameters(column: &ColumnSpec) -> Result<(), String> {
    let allowed: &[&str] = match column.kind {
        ColumnType::String => &["length"],
        ColumnType::Decimal => {
            if column.precision.is_none() || column.scale.is_none() {
                return Err("decimal requires precision and scale".to_string());
            }
            &["precision", "scale"]
        }
        _ => &[],
    };
    let present = [
        ("length", column.length.is_some()),
        ("precision", column.precision.is_some()),
        ("scale", column.scale.is_some()),
    ];
    for (key, is_set) in present {
        if is_set && !allowed.contains(&key) {
            return Err(format!("'{key}' is not valid for this column type"));
        }
    }
    Ok(())
}

fn apply_steps(steps: &[Step], schema: &mut Schema) {
    for step in steps {
        match step {
            Step::CreateTable(table) => {
                schema.create_table(table.name.as_str(), |t| {
                    for column in &table.columns {
                        apply_column(t, column);
                    }
                });
            }
            Step::DropTable(name) => {
                schema.drop_table_if_exists(name.as_str());
            }
            Step::Raw(sql) => {
                schema.raw(sql.as_str());
            }
        }
    }
}

fn apply_column(t: &mut TableBuilder, spec: &ColumnSpec) {
    let name = spec.name.clone().unwrap_or_default();
    let handle = match spec.kind {
        ColumnType::Timestamps => {
            t.timestamps();
            return;
        }
        ColumnType::Id => t.id(name),
        ColumnType::Increments => t.increments(name),
        ColumnType::String => t.string(name, spec.length),
        ColumnType::Text => t.text(name),
        ColumnType::Integer => t.integer(name),
        ColumnType::BigInteger => t.big_integer(name),
        ColumnType::Decimal => t.decimal(
            name,
            spec.precision.unwrap_or_default(),
            spec.scale.unwrap_or_default(),
        ),
        ColumnType::Boolean => t.boolean(name),
        ColumnType::Json => t.json(name),
        ColumnType::Uuid => t.uuid(name),
        ColumnType::Date => t.date(name),
        ColumnType::Timestamp => t.timestamp(name),
    };
    apply_modifiers(handle, spec);
}

fn apply_modifiers(mut handle: ColumnHandle<'_>, spec: &ColumnSpec) {
    if spec.not_null {
        handle = handle.not_nullable();
    }
    if let Some(default) = &spec.default {
        handle = handle.default_to(DefaultValue::from(default.clone()));
    }
    if spec.primary {
        handle = handle.primary();
    }
    if spec.unique {
        handle = handle.unique();
    }
    if let Some(reference) = &spec.references {
        let fk = handle
            .references(reference.column.as_str())
            .in_table(reference.table.as_str());
        if let Some(action) = reference.on_delete {
            fk.on_delete(action);
        }
    }
}

#[cfg(test)]
#[path = "file_test.rs"]
mod tests;
