use crate::value::Value;
use std::fmt;

/// Column-equality filters in insertion order.
///
/// Inserting a column twice replaces its value but keeps its original
/// position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    entries: Vec<(String, Value)>,
}

impl Filters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chaining form of [`Filters::insert`].
    pub fn and_eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(c, _)| *c == column) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((column, value)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(c, v)| (c.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Filters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut filters = Self::new();
        for (column, value) in iter {
            filters.insert(column, value);
        }
        filters
    }
}

/// Join flavour rendered before `JOIN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
}

impl JoinKind {
    pub const fn as_sql(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER",
            JoinKind::Left => "LEFT",
            JoinKind::Right => "RIGHT",
            JoinKind::Full => "FULL",
        }
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Sort direction for `ORDER BY`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub const fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Stateless SQL fragment functions.
///
/// Identifiers and conditions are inserted verbatim. Fragments that extend a
/// statement start with a space so they can be appended directly; none ends
/// with a semicolon.
pub struct SqlBuilder;

impl SqlBuilder {
    /// `SELECT <cols|*> FROM <table>`
    pub fn select(table: &str, columns: &[&str]) -> String {
        let cols = if columns.is_empty() {
            "*".to_string()
        } else {
            columns.join(", ")
        };
        format!("SELECT {cols} FROM {table}")
    }

    /// `k1 = ? AND k2 = ?` and the parameters in the same order. Empty
    /// filters give an empty clause.
    pub fn filter(filters: &Filters) -> (String, Vec<Value>) {
        if filters.is_empty() {
            return (String::new(), Vec::new());
        }
        let (clauses, params): (Vec<String>, Vec<Value>) = filters
            .iter()
            .map(|(column, value)| (format!("{column} = ?"), value.clone()))
            .unzip();
        (clauses.join(" AND "), params)
    }

    /// ` <KIND> JOIN <table> ON <on>`
    pub fn join(kind: JoinKind, table: &str, on: &str) -> String {
        format!(" {kind} JOIN {table} ON {on}")
    }

    /// ` ORDER BY c1, c2 <direction>`
    pub fn order_by(columns: &[&str], direction: Direction) -> String {
        format!(" ORDER BY {} {direction}", columns.join(", "))
    }

    /// ` LIMIT n` or ` LIMIT n OFFSET m`
    pub fn limit(limit: u64, offset: Option<u64>) -> String {
        match offset {
            Some(offset) => format!(" LIMIT {limit} OFFSET {offset}"),
            None => format!(" LIMIT {limit}"),
        }
    }

    /// ` GROUP BY c1, c2`
    pub fn group_by(columns: &[&str]) -> String {
        format!(" GROUP BY {}", columns.join(", "))
    }

    /// ` HAVING <condition>`
    pub fn having(condition: &str) -> String {
        format!(" HAVING {condition}")
    }

    /// `<name> AS (<subquery>)`
    pub fn cte(name: &str, subquery: &str) -> String {
        format!("{name} AS ({subquery})")
    }
}
