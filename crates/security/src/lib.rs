//! SQL identifier validation for promrag.
//!
//! Collection names come from configuration and end up as table names in
//! `CREATE TABLE`, `DROP TABLE` and every query against the collection.
//! SQLite has no bound parameters for identifiers, so names are checked and
//! quoted here. [`QuotedIdentifier`] can only be built through
//! [`safe_identifier`], which makes this module the single place where a
//! schema identifier is produced.

#![warn(missing_docs)]

use std::fmt;

use promrag_core::{VectorDbError, VectorDbResult};

/// Maximum identifier length accepted by [`validate_identifier`].
pub const MAX_IDENTIFIER_LENGTH: usize = 64;

/// Keywords rejected as identifiers, compared case-insensitively.
///
/// Covers the SQLite DDL/DML vocabulary plus transaction and maintenance
/// statements.
const RESERVED_KEYWORDS: &[&str] = &[
    "ABORT", "ADD", "AFTER", "ALL", "ALTER", "ANALYZE", "AND", "AS", "ASC", "ATTACH",
    "AUTOINCREMENT", "BEFORE", "BEGIN", "BETWEEN", "BY", "CASCADE", "CASE", "CAST", "CHECK",
    "COLLATE", "COLUMN", "COMMIT", "CONFLICT", "CONSTRAINT", "CREATE", "CROSS", "DATABASE",
    "DEFAULT", "DEFERRABLE", "DEFERRED", "DELETE", "DESC", "DETACH", "DISTINCT", "DO", "DROP",
    "EACH", "ELSE", "END", "ESCAPE", "EXCEPT", "EXCLUSIVE", "EXISTS", "EXPLAIN", "FAIL", "FOR",
    "FOREIGN", "FROM", "GLOB", "GRANT", "GROUP", "HAVING", "IF", "IGNORE", "IMMEDIATE", "IN",
    "INDEX", "INNER", "INSERT", "INSTEAD", "INTERSECT", "INTO", "IS", "ISNULL", "JOIN", "KEY",
    "LEFT", "LIKE", "LIMIT", "MATCH", "MERGE", "NATURAL", "NOT", "NOTHING", "NOTNULL", "NULL",
    "OF", "OFFSET", "ON", "OR", "ORDER", "OUTER", "PLAN", "PRAGMA", "PRIMARY", "QUERY",
    "RECURSIVE", "REFERENCES", "REGEXP", "REINDEX", "RELEASE", "RENAME", "REPLACE", "RESTRICT",
    "RETURNING", "REVOKE", "RIGHT", "ROLLBACK", "ROW", "ROWID", "SAVEPOINT", "SCHEMA", "SELECT",
    "SET", "TABLE", "TEMP", "TEMPORARY", "THEN", "TO", "TRANSACTION", "TRIGGER", "TRUNCATE",
    "UNION", "UNIQUE", "UPDATE", "UPSERT", "USING", "VACUUM", "VALUES", "VIEW", "VIRTUAL",
    "WHEN", "WHERE", "WITH", "WITHOUT",
];

/// An identifier that passed validation and is wrapped in SQL quotes.
///
/// Safe to interpolate into schema statements as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuotedIdentifier(String);

impl QuotedIdentifier {
    /// The quoted form, e.g. `"prag-metrics"`
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuotedIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Check that `name` is safe to use as a table or index name.
///
/// # Validation Rules
/// - Cannot be empty
/// - Cannot exceed [`MAX_IDENTIFIER_LENGTH`] characters
/// - Must match `^[A-Za-z_][A-Za-z0-9_-]*$`
/// - Cannot be a reserved SQL keyword (any case)
pub fn validate_identifier(name: &str) -> VectorDbResult<()> {
    if name.is_empty() {
        return Err(VectorDbError::invalid_identifier(
            name,
            "identifier cannot be empty",
        ));
    }

    let length = name.chars().count();
    if length > MAX_IDENTIFIER_LENGTH {
        return Err(VectorDbError::invalid_identifier(
            name,
            format!(
                "identifier too long: {} characters (max {})",
                length, MAX_IDENTIFIER_LENGTH
            ),
        ));
    }

    let mut chars = name.chars();
    let starts_ok = chars
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false);
    let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !starts_ok || !rest_ok {
        return Err(VectorDbError::invalid_identifier(
            name,
            "identifier contains invalid characters",
        ));
    }

    if is_reserved_keyword(name) {
        return Err(VectorDbError::invalid_identifier(
            name,
            "identifier cannot be a SQL keyword",
        ));
    }

    Ok(())
}

/// Wrap `name` in double quotes, doubling any embedded quote.
///
/// Only meaningful after [`validate_identifier`]. The result is a plain
/// string; schema statements take a [`QuotedIdentifier`] from
/// [`safe_identifier`] instead.
pub fn escape_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Validate and quote `name` in one step.
pub fn safe_identifier(name: &str) -> VectorDbResult<QuotedIdentifier> {
    validate_identifier(name)?;
    Ok(QuotedIdentifier(escape_identifier(name)))
}

fn is_reserved_keyword(name: &str) -> bool {
    RESERVED_KEYWORDS
        .iter()
        .any(|keyword| keyword.eq_ignore_ascii_case(name))
}
