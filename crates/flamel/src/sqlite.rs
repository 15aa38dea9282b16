//! SQLite executor backed by `rusqlite`.

use crate::error::{OrmError, OrmResult};
use crate::executor::{Executor, Row};
use crate::value::Value;
use rusqlite::types::{Null, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{Connection, params_from_iter};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Null => ToSqlOutput::from(Null),
            Value::Integer(n) => ToSqlOutput::from(*n),
            Value::Real(f) => ToSqlOutput::from(*f),
            Value::Text(s) => ToSqlOutput::from(s.as_str()),
            Value::Blob(bytes) => ToSqlOutput::from(bytes.as_slice()),
            Value::Boolean(b) => ToSqlOutput::from(*b),
            Value::DateTime(dt) => ToSqlOutput::from(dt.format("%F %T%.f").to_string()),
        })
    }
}

fn from_value_ref(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(n) => Value::Integer(n),
        ValueRef::Real(f) => Value::Real(f),
        ValueRef::Text(bytes) => Value::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::Blob(bytes.to_vec()),
    }
}

/// An [`Executor`] over a single SQLite connection.
///
/// Every call runs in its own transaction, committed on success and rolled
/// back when the call fails. After [`Executor::close`] every call fails with
/// `OrmError::Connection`.
#[derive(Debug)]
pub struct SqliteExecutor {
    conn: Mutex<Option<Connection>>,
}

impl SqliteExecutor {
    /// Open (or create) a database file.
    pub fn open(path: impl AsRef<Path>) -> OrmResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        tracing::debug!(target: "flamel.sql", path = %path.display(), "opened sqlite database");
        Ok(Self::from_connection(conn))
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> OrmResult<Self> {
        Ok(Self::from_connection(Connection::open_in_memory()?))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(Some(conn)),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.lock().map_or(true, |guard| guard.is_none())
    }

    fn lock(&self) -> OrmResult<MutexGuard<'_, Option<Connection>>> {
        self.conn
            .lock()
            .map_err(|_| OrmError::Connection("connection mutex poisoned".to_string()))
    }

    fn with_connection<T>(&self, f: impl FnOnce(&mut Connection) -> OrmResult<T>) -> OrmResult<T> {
        let mut guard = self.lock()?;
        let conn = guard
            .as_mut()
            .ok_or_else(|| OrmError::Connection("connection is closed".to_string()))?;
        f(conn)
    }
}

impl Executor for SqliteExecutor {
    fn execute(&self, sql: &str, params: &[Value]) -> OrmResult<Vec<Row>> {
        self.with_connection(|conn| {
            let tx = conn.transaction()?;
            let out = {
                let mut stmt = tx.prepare(sql)?;
                let column_count = stmt.column_count();
                let mut rows = stmt.query(params_from_iter(params.iter()))?;
                let mut out = Vec::new();
                while let Some(row) = rows.next()? {
                    let mut values = Vec::with_capacity(column_count);
                    for idx in 0..column_count {
                        values.push(from_value_ref(row.get_ref(idx)?));
                    }
                    out.push(values);
                }
                out
            };
            tx.commit()?;
            Ok(out)
        })
    }

    fn execute_many(&self, sql: &str, param_sets: &[Vec<Value>]) -> OrmResult<()> {
        self.with_connection(|conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(sql)?;
                for params in param_sets {
                    stmt.execute(params_from_iter(params.iter()))?;
                }
            }
            tx.commit()?;
            Ok(())
        })
    }

    fn execute_script(&self, sql: &str) -> OrmResult<()> {
        self.with_connection(|conn| {
            let tx = conn.transaction()?;
            tx.execute_batch(sql)?;
            tx.commit()?;
            Ok(())
        })
    }

    fn close(&self) -> OrmResult<()> {
        let conn = self.lock()?.take();
        if let Some(conn) = conn {
            conn.close().map_err(|(_, err)| OrmError::from(err))?;
            tracing::debug!(target: "flamel.sql", "closed sqlite connection");
        }
        Ok(())
    }
}
