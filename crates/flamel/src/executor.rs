//! The executor seam.
//!
//! Everything that talks to a storage engine goes through [`Executor`]: the
//! query builder, DDL generation and the write path only ever produce
//! `(sql, params)` pairs.

use crate::check;
use crate::config::{CheckMode, DatabaseConfig};
use crate::error::{OrmError, OrmResult};
use crate::value::Value;
use std::sync::Arc;

/// One result row; values are in select-list order.
pub type Row = Vec<Value>;

/// Runs SQL text against a storage engine.
///
/// Implementations apply autocommit per call: commit on success, roll back
/// before returning an error.
pub trait Executor {
    /// Run one statement and return all rows it produced.
    fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<Vec<Row>>;

    /// Run one statement once per parameter set.
    ///
    /// The default implementation calls [`Executor::execute`] per set and
    /// stops at the first error.
    fn execute_many(&self, sql: &str, param_sets: &[Vec<Value>]) -> OrmResult<()> {
        for params in param_sets {
            self.execute(sql, params)?;
        }
        Ok(())
    }

    /// Run a batch of `;`-separated statements without parameters.
    fn execute_script(&self, sql: &str) -> OrmResult<()> {
        self.execute(sql, &[]).map(|_| ())
    }

    /// Release the underlying connection.
    fn close(&self) -> OrmResult<()> {
        Ok(())
    }
}

impl<E: Executor + ?Sized> Executor for &E {
    fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<Vec<Row>> {
        (**self).execute(sql, params)
    }

    fn execute_many(&self, sql: &str, param_sets: &[Vec<Value>]) -> OrmResult<()> {
        (**self).execute_many(sql, param_sets)
    }

    fn execute_script(&self, sql: &str) -> OrmResult<()> {
        (**self).execute_script(sql)
    }

    fn close(&self) -> OrmResult<()> {
        (**self).close()
    }
}

impl<E: Executor + ?Sized> Executor for Box<E> {
    fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<Vec<Row>> {
        (**self).execute(sql, params)
    }

    fn execute_many(&self, sql: &str, param_sets: &[Vec<Value>]) -> OrmResult<()> {
        (**self).execute_many(sql, param_sets)
    }

    fn execute_script(&self, sql: &str) -> OrmResult<()> {
        (**self).execute_script(sql)
    }

    fn close(&self) -> OrmResult<()> {
        (**self).close()
    }
}

impl<E: Executor + ?Sized> Executor for Arc<E> {
    fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<Vec<Row>> {
        (**self).execute(sql, params)
    }

    fn execute_many(&self, sql: &str, param_sets: &[Vec<Value>]) -> OrmResult<()> {
        (**self).execute_many(sql, param_sets)
    }

    fn execute_script(&self, sql: &str) -> OrmResult<()> {
        (**self).execute_script(sql)
    }

    fn close(&self) -> OrmResult<()> {
        (**self).close()
    }
}

/// Shorten `sql` to at most `max_bytes`, backing off to a char boundary.
pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

fn display_sql(sql: &str, max: Option<usize>) -> String {
    match max {
        Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
        _ => sql.to_string(),
    }
}

/// Apply the check mode to a statement.
pub(crate) fn check_statement(config: &DatabaseConfig, sql: &str) -> OrmResult<()> {
    match config.check_mode {
        CheckMode::Disabled => Ok(()),
        CheckMode::WarnOnly => {
            if !check::is_valid_sql(sql) {
                tracing::warn!(
                    target: "flamel.sql",
                    sql = %display_sql(sql, config.max_sql_length),
                    "unrecognized statement shape"
                );
            }
            Ok(())
        }
        CheckMode::Strict => check::validate_sql(sql).map(|_| ()),
    }
}

/// Check, log and run one statement.
pub(crate) fn run(
    executor: &dyn Executor,
    config: &DatabaseConfig,
    sql: &str,
    params: &[Value],
) -> OrmResult<Vec<Row>> {
    check_statement(config, sql)?;
    tracing::debug!(
        target: "flamel.sql",
        sql = %display_sql(sql, config.max_sql_length),
        param_count = params.len(),
        "execute"
    );
    executor.execute(sql, params).inspect_err(|err| {
        tracing::debug!(target: "flamel.sql", error = %err, "statement failed");
    })
}

/// Fail with `EngineNotSet` when no executor is configured.
pub(crate) fn require<'e>(
    executor: Option<&'e dyn Executor>,
    action: &'static str,
) -> OrmResult<&'e dyn Executor> {
    executor.ok_or(OrmError::EngineNotSet(action))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingExecutor;

    #[test]
    fn test_truncate_sql_bytes_respects_char_boundary() {
        assert_eq!(truncate_sql_bytes("SELECT 1", 100), "SELECT 1");
        assert_eq!(truncate_sql_bytes("héllo", 2), "h");
        assert_eq!(display_sql("SELECT 1", Some(3)), "SEL...");
        assert_eq!(display_sql("SELECT 1", None), "SELECT 1");
    }

    #[test]
    fn test_strict_mode_blocks_unrecognized_sql() {
        let exec = RecordingExecutor::new();
        let config = DatabaseConfig::new().strict();
        let err = run(&exec, &config, "DROP TABLE users", &[]).unwrap_err();
        assert!(matches!(err, OrmError::InvalidSql(_)));
        assert!(exec.statements().is_empty());
    }

    #[test]
    fn test_warn_only_mode_still_executes() {
        let exec = RecordingExecutor::new();
        let config = DatabaseConfig::new().check_mode(CheckMode::WarnOnly);
        run(&exec, &config, "DROP TABLE users", &[]).unwrap();
        assert_eq!(exec.statements(), vec!["DROP TABLE users".to_string()]);
    }

    #[test]
    fn test_require_executor() {
        let err = require(None, "executing a query").err().unwrap();
        assert_eq!(
            err.to_string(),
            "Database engine is not set. Please set the engine before executing a query."
        );
    }
}
