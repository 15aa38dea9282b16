use super::builder::{Direction, Filters, JoinKind, SqlBuilder};
use crate::config::DatabaseConfig;
use crate::error::{OrmError, OrmResult};
use crate::executor::{self, Executor, Row};
use crate::value::{Value, format_params};
use std::fmt;

/// Fluent query over one table.
///
/// SQL text and bound parameters accumulate in call order. `filter`, `join`,
/// `order_by`, `limit` and `group_by` require [`Query::select`] first;
/// `having` only requires `GROUP BY` somewhere in the text.
///
/// ```ignore
/// let mut q = db.query("users");
/// q.select(&["id", "name"])
///     .filter(&Filters::new().and_eq("name", "test"))?
///     .order_by(&["name"], Direction::Desc)?
///     .limit(10, None)?;
/// let rows = q.execute()?;
/// ```
#[derive(Clone)]
pub struct Query<'e> {
    table: String,
    text: Option<String>,
    selected: bool,
    params: Vec<Value>,
    executor: Option<&'e dyn Executor>,
    config: DatabaseConfig,
}

impl<'e> Query<'e> {
    /// A query on `table` with no executor attached.
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            text: None,
            selected: false,
            params: Vec::new(),
            executor: None,
            config: DatabaseConfig::default(),
        }
    }

    pub fn with_executor(mut self, executor: &'e dyn Executor) -> Self {
        self.executor = Some(executor);
        self
    }

    pub fn with_config(mut self, config: DatabaseConfig) -> Self {
        self.config = config;
        self
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Accumulated SQL text, if any clause has been added.
    pub fn sql(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    /// Prepend a common table expression.
    ///
    /// Each call adds its own `WITH` keyword, so two calls produce
    /// `WITH b AS (...), WITH a AS (...) `.
    pub fn with_cte(&mut self, name: &str, subquery: &str) -> &mut Self {
        let cte = SqlBuilder::cte(name, subquery);
        self.text = Some(match self.text.take() {
            Some(text) => format!("WITH {cte}, {text}"),
            None => format!("WITH {cte} "),
        });
        self
    }

    /// `SELECT <cols|*> FROM <table>`; appended to any text already present.
    pub fn select(&mut self, columns: &[&str]) -> &mut Self {
        let select = SqlBuilder::select(&self.table, columns);
        self.text.get_or_insert_with(String::new).push_str(&select);
        self.selected = true;
        self
    }

    fn push_clause(&mut self, method: &'static str, clause: &str) -> OrmResult<&mut Self> {
        if !self.selected {
            return Err(OrmError::sequence(method, "select"));
        }
        self.text.get_or_insert_with(String::new).push_str(clause);
        Ok(self)
    }

    /// ` WHERE k1 = ? AND ...`; empty filters leave the text unchanged.
    pub fn filter(&mut self, filters: &Filters) -> OrmResult<&mut Self> {
        let (clause, params) = SqlBuilder::filter(filters);
        let clause = if clause.is_empty() {
            clause
        } else {
            format!(" WHERE {clause}")
        };
        self.push_clause("filter", &clause)?;
        self.params.extend(params);
        Ok(self)
    }

    pub fn join(&mut self, kind: JoinKind, table: &str, on: &str) -> OrmResult<&mut Self> {
        self.push_clause("join", &SqlBuilder::join(kind, table, on))
    }

    pub fn order_by(&mut self, columns: &[&str], direction: Direction) -> OrmResult<&mut Self> {
        self.push_clause("order_by", &SqlBuilder::order_by(columns, direction))
    }

    pub fn limit(&mut self, limit: u64, offset: Option<u64>) -> OrmResult<&mut Self> {
        self.push_clause("limit", &SqlBuilder::limit(limit, offset))
    }

    pub fn group_by(&mut self, columns: &[&str]) -> OrmResult<&mut Self> {
        self.push_clause("group_by", &SqlBuilder::group_by(columns))
    }

    /// ` HAVING <condition>`; the text must already contain `GROUP BY`,
    /// whether from `group_by` or a CTE body.
    pub fn having(&mut self, condition: &str) -> OrmResult<&mut Self> {
        let grouped = self.text.as_deref().is_some_and(|t| t.contains("GROUP BY"));
        if !grouped {
            return Err(OrmError::sequence("having", "group_by"));
        }
        self.text
            .get_or_insert_with(String::new)
            .push_str(&SqlBuilder::having(condition));
        Ok(self)
    }

    /// Send the accumulated text and parameters to the executor.
    ///
    /// Whatever text has accumulated is sent, including CTE-only text. The
    /// query is left as is, so executing again re-sends the same statement.
    pub fn execute(&self) -> OrmResult<Vec<Row>> {
        let executor = executor::require(self.executor, "executing a query")?;
        let sql = self
            .text
            .as_deref()
            .ok_or(OrmError::sequence("execute", "select"))?;
        executor::run(executor, &self.config, sql, &self.params)
    }
}

impl fmt::Display for Query<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text.as_deref().unwrap_or_default())?;
        if !self.params.is_empty() {
            write!(f, ", {}", format_params(&self.params))?;
        }
        Ok(())
    }
}

impl fmt::Debug for Query<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("table", &self.table)
            .field("text", &self.text)
            .field("params", &self.params)
            .field("has_executor", &self.executor.is_some())
            .finish()
    }
}
