//! SQL identifier and literal helpers
//!
//! The DDL compiler emits identifiers unquoted, so every table and column
//! name is checked against a conservative identifier grammar before it is
//! written into a statement.

use crate::error::{CoreError, CoreResult};

/// Returns `true` for `[A-Za-z_][A-Za-z0-9_]*`.
///
/// # Examples
/// ```
/// use tw_core::sql_utils::is_valid_identifier;
/// assert!(is_valid_identifier("created_at"));
/// assert!(!is_valid_identifier("1st"));
/// assert!(!is_valid_identifier("users; DROP TABLE x"));
/// ```
pub fn is_valid_identifier(ident: &str) -> bool {
    let mut chars = ident.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Returns `true` for an identifier optionally qualified by one schema name.
///
/// # Examples
/// ```
/// use tw_core::sql_utils::is_valid_qualified_name;
/// assert!(is_valid_qualified_name("users"));
/// assert!(is_valid_qualified_name("audit.events"));
/// assert!(!is_valid_qualified_name("a.b.c"));
/// ```
pub fn is_valid_qualified_name(name: &str) -> bool {
    match name.split_once('.') {
        Some((schema, table)) => is_valid_identifier(schema) && is_valid_identifier(table),
        None => is_valid_identifier(name),
    }
}

/// Check an unqualified identifier, returning [`CoreError::InvalidIdentifier`] on failure.
pub fn check_identifier(ident: &str) -> CoreResult<()> {
    if is_valid_identifier(ident) {
        Ok(())
    } else {
        Err(CoreError::InvalidIdentifier {
            name: ident.to_string(),
        })
    }
}

/// Check a possibly schema-qualified name, returning [`CoreError::InvalidIdentifier`] on failure.
pub fn check_qualified_name(name: &str) -> CoreResult<()> {
    if is_valid_qualified_name(name) {
        Ok(())
    } else {
        Err(CoreError::InvalidIdentifier {
            name: name.to_string(),
        })
    }
}

/// Split a potentially schema-qualified table name into (schema, table).
///
/// If no `.` is present, returns `("main", name)` as the default schema.
///
/// # Examples
/// ```
/// use tw_core::sql_utils::split_qualified_name;
/// assert_eq!(split_qualified_name("users"), ("main", "users"));
/// assert_eq!(split_qualified_name("audit.events"), ("audit", "events"));
/// ```
pub fn split_qualified_name(name: &str) -> (&str, &str) {
    if let Some(pos) = name.rfind('.') {
        (&name[..pos], &name[pos + 1..])
    } else {
        ("main", name)
    }
}

/// Escape a SQL string literal value by doubling single quotes.
///
/// This is for use inside single-quoted SQL string literals, not identifiers.
pub fn escape_sql_string(value: &str) -> String {
    value.replace('\'', "''")
}

/// Render a value as a single-quoted SQL string literal.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", escape_sql_string(value))
}
