//! Statement-shape validation.
//!
//! This is a coarse regex check, not a parser: text is accepted when it starts
//! with one of five recognized statement shapes. Nothing is checked against
//! the schema.

use crate::error::{OrmError, OrmResult};
use regex::Regex;
use std::sync::OnceLock;

/// The statement shapes the validator recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    /// `SELECT … FROM … [WHERE …]`
    Select,
    /// `INSERT INTO … VALUES (…)`
    Insert,
    /// `UPDATE … SET … [WHERE …]`
    Update,
    /// `DELETE FROM … [WHERE …]`
    Delete,
    /// `CREATE TABLE …`
    CreateTable,
}

fn patterns() -> &'static [(StatementKind, Regex)] {
    static PATTERNS: OnceLock<Vec<(StatementKind, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            (StatementKind::Select, r"(?is)^\s*SELECT\s+.+\s+FROM\s+.+"),
            (StatementKind::Insert, r"(?is)^\s*INSERT\s+INTO\s+\S+.*\s*VALUES\s*\(.*\)"),
            (StatementKind::Update, r"(?is)^\s*UPDATE\s+\S+\s+SET\s+.+"),
            (StatementKind::Delete, r"(?is)^\s*DELETE\s+FROM\s+\S+"),
            (StatementKind::CreateTable, r"(?is)^\s*CREATE\s+TABLE\s+\S+"),
        ]
        .into_iter()
        .map(|(kind, pattern)| {
            let re = Regex::new(pattern).expect("invalid built-in statement regex");
            (kind, re)
        })
        .collect()
    })
}

/// The recognized shape of `sql`, if any.
pub fn detect_statement_kind(sql: &str) -> Option<StatementKind> {
    patterns()
        .iter()
        .find(|(_, re)| re.is_match(sql))
        .map(|(kind, _)| *kind)
}

/// `true` when `sql` matches one of the recognized shapes.
pub fn is_valid_sql(sql: &str) -> bool {
    detect_statement_kind(sql).is_some()
}

/// Returns `Ok(true)` for recognized statements and `InvalidSql` otherwise.
pub fn validate_sql(sql: &str) -> OrmResult<bool> {
    if is_valid_sql(sql) {
        Ok(true)
    } else {
        Err(OrmError::InvalidSql(sql.to_string()))
    }
}
