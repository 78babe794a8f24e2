//! Column clause vocabulary: kinds, modifiers, defaults, and on-delete actions.

use serde::{Deserialize, Deserializer};
use std::fmt;

/// Storage type of a column.
///
/// The DDL compiler maps each variant to exactly one type fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// `VARCHAR` or `VARCHAR(n)`
    String { length: Option<u32> },
    /// `TEXT`
    Text,
    /// `INTEGER`
    Integer,
    /// `BIGINT`
    BigInteger,
    /// `DECIMAL(p, s)`
    Decimal { precision: u8, scale: u8 },
    /// `BOOLEAN`
    Boolean,
    /// `JSON`
    Json,
    /// `UUID`
    Uuid,
    /// `DATE`
    Date,
    /// `TIMESTAMP`
    Timestamp,
}

/// A column default.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    /// Rendered single-quoted with embedded quotes doubled
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    /// An SQL expression emitted verbatim, e.g. `current_timestamp`
    Expression(String),
    /// `nextval('<sequence>')`; the compiler also emits the sequence
    NextVal(String),
}

impl DefaultValue {
    /// Wrap a raw SQL expression such as `current_timestamp`.
    pub fn expression(expr: impl Into<String>) -> Self {
        DefaultValue::Expression(expr.into())
    }
}

impl From<&str> for DefaultValue {
    fn from(value: &str) -> Self {
        DefaultValue::Text(value.to_string())
    }
}

impl From<String> for DefaultValue {
    fn from(value: String) -> Self {
        DefaultValue::Text(value)
    }
}

impl From<i64> for DefaultValue {
    fn from(value: i64) -> Self {
        DefaultValue::Integer(value)
    }
}

impl From<i32> for DefaultValue {
    fn from(value: i32) -> Self {
        DefaultValue::Integer(i64::from(value))
    }
}

impl From<f64> for DefaultValue {
    fn from(value: f64) -> Self {
        DefaultValue::Float(value)
    }
}

impl From<bool> for DefaultValue {
    fn from(value: bool) -> Self {
        DefaultValue::Boolean(value)
    }
}

/// Referential action taken when the referenced row is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDelete {
    Cascade,
    SetNull,
    SetDefault,
    Restrict,
    NoAction,
}

impl OnDelete {
    /// SQL keyword form, e.g. `SET NULL`.
    pub fn as_sql(&self) -> &'static str {
        match self {
            OnDelete::Cascade => "CASCADE",
            OnDelete::SetNull => "SET NULL",
            OnDelete::SetDefault => "SET DEFAULT",
            OnDelete::Restrict => "RESTRICT",
            OnDelete::NoAction => "NO ACTION",
        }
    }
}

impl fmt::Display for OnDelete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl std::str::FromStr for OnDelete {
    type Err = String;

    /// Case-insensitive; accepts `set null`, `SET_NULL`, and `set-null` alike.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['_', '-'], " ");
        match normalized.as_str() {
            "CASCADE" => Ok(OnDelete::Cascade),
            "SET NULL" => Ok(OnDelete::SetNull),
            "SET DEFAULT" => Ok(OnDelete::SetDefault),
            "RESTRICT" => Ok(OnDelete::Restrict),
            "NO ACTION" => Ok(OnDelete::NoAction),
            _ => Err(format!(
                "unknown on_delete action '{s}' (expected cascade, set null, set default, restrict, or no action)"
            )),
        }
    }
}

impl<'de> Deserialize<'de> for OnDelete {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Foreign-key reference attached to a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    pub table: String,
    pub column: String,
    pub on_delete: Option<OnDelete>,
}

/// A modifier fragment, rendered in the order it was applied.
#[derive(Debug, Clone, PartialEq)]
pub enum Modifier {
    NotNull,
    Default(DefaultValue),
    PrimaryKey,
    Unique,
    References(ForeignKey),
}

/// One column of a table definition: name, kind, and applied modifiers.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnClause {
    pub name: String,
    pub kind: ColumnKind,
    pub modifiers: Vec<Modifier>,
}

impl ColumnClause {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
            modifiers: Vec::new(),
        }
    }

    /// Apply a modifier to this clause.
    ///
    /// Flag modifiers (`NOT NULL`, `PRIMARY KEY`, `UNIQUE`) are applied at most
    /// once. A second default or reference replaces the first one in place so
    /// the fragment keeps its original position.
    pub fn apply(&mut self, modifier: Modifier) {
        let existing = self
            .modifiers
            .iter()
            .position(|m| std::mem::discriminant(m) == std::mem::discriminant(&modifier));
        match (existing, modifier) {
            (Some(pos), m @ (Modifier::Default(_) | Modifier::References(_))) => {
                self.modifiers[pos] = m;
            }
            (Some(_), _) => {}
            (None, m) => self.modifiers.push(m),
        }
    }

    /// Set the on-delete action of this clause's foreign key.
    ///
    /// Returns `false` when the clause carries no reference.
    pub fn set_on_delete(&mut self, action: OnDelete) -> bool {
        match self.foreign_key_mut() {
            Some(fk) => {
                fk.on_delete = Some(action);
                true
            }
            None => false,
        }
    }

    pub fn has(&self, modifier: &Modifier) -> bool {
        self.modifiers.contains(modifier)
    }

    pub fn is_not_null(&self) -> bool {
        self.has(&Modifier::NotNull)
    }

    pub fn is_primary_key(&self) -> bool {
        self.has(&Modifier::PrimaryKey)
    }

    pub fn default_value(&self) -> Option<&DefaultValue> {
        self.modifiers.iter().find_map(|m| match m {
            Modifier::Default(v) => Some(v),
            _ => None,
        })
    }

    pub fn foreign_key(&self) -> Option<&ForeignKey> {
        self.modifiers.iter().find_map(|m| match m {
            Modifier::References(fk) => Some(fk),
            _ => None,
        })
    }

    fn foreign_key_mut(&mut self) -> Option<&mut ForeignKey> {
        self.modifiers.iter_mut().find_map(|m| match m {
            Modifier::References(fk) => Some(fk),
            _ => None,
        })
    }
}
