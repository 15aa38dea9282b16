//! Insert-or-update of model instances.

use crate::config::{DatabaseConfig, UpsertStrategy};
use crate::error::{OrmError, OrmResult};
use crate::executor::{self, Executor};
use crate::schema::Instance;
use crate::value::Value;

/// Which statement an upsert issued.
///
/// `Updated` means the lookup found a row and an UPDATE was sent. It does not
/// mean a row changed: the UPDATE is keyed on the primary-key value, so a
/// NULL key matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

/// Write `instance` with an INSERT, or an UPDATE when a lookup finds a row.
///
/// Values are collected in column declaration order: the explicit value,
/// else the column default (`CURRENT_TIMESTAMP` resolves to the current UTC
/// time), else `NULL`. The existence lookup follows
/// [`DatabaseConfig::upsert_strategy`]:
///
/// - [`UpsertStrategy::SecondColumn`] needs an autoincrementing primary key
///   and counts rows matching the second declared column, or the primary
///   key for single-column models.
/// - [`UpsertStrategy::PrimaryKey`] counts rows matching the primary key. An
///   unset autoincrementing key skips the lookup and inserts.
///
/// A positive count issues `UPDATE <table> SET c1 = ?, ... WHERE <pk> = ?`
/// with every value followed by the key; otherwise
/// `INSERT INTO <table> (c1, ...) VALUES (?, ...)`.
///
/// Under `SecondColumn` an instance whose key is unset still matches by the
/// second column, and the UPDATE then binds `NULL` for the key and changes
/// no row.
pub fn upsert(
    executor: &dyn Executor,
    config: &DatabaseConfig,
    instance: &Instance,
) -> OrmResult<UpsertOutcome> {
    let model = instance.model();
    let table = model.name();

    let mut columns: Vec<&str> = Vec::with_capacity(model.columns().len());
    let mut values: Vec<Value> = Vec::with_capacity(model.columns().len());
    let mut primary = None;
    for def in model.columns() {
        let value = instance.resolve(def);
        if def.is_primary_key() && primary.is_none() {
            primary = Some((def, value.clone()));
        }
        columns.push(def.name());
        values.push(value);
    }
    let (pk, pk_value) = primary.ok_or(OrmError::MissingPrimaryKey)?;

    let lookup = match config.upsert_strategy {
        UpsertStrategy::SecondColumn => {
            if !pk.is_autoincrement() {
                return Err(OrmError::MissingPrimaryKey);
            }
            if columns.len() > 1 {
                Some((columns[1], values[1].clone()))
            } else {
                Some((pk.name(), pk_value.clone()))
            }
        }
        UpsertStrategy::PrimaryKey => match (pk_value.is_null(), pk.is_autoincrement()) {
            (true, true) => None,
            (true, false) => return Err(OrmError::MissingPrimaryKey),
            (false, _) => Some((pk.name(), pk_value.clone())),
        },
    };

    let exists = match lookup {
        Some((column, value)) => count_matching(executor, config, table, column, value)? > 0,
        None => false,
    };

    if exists {
        let assignments: Vec<String> = columns.iter().map(|c| format!("{c} = ?")).collect();
        let sql = format!(
            "UPDATE {table} SET {} WHERE {} = ?",
            assignments.join(", "),
            pk.name()
        );
        values.push(pk_value);
        executor::run(executor, config, &sql, &values)?;
        tracing::debug!(target: "flamel.sql", model = table, "updated existing row");
        Ok(UpsertOutcome::Updated)
    } else {
        let placeholders = vec!["?"; columns.len()].join(", ");
        let sql = format!(
            "INSERT INTO {table} ({}) VALUES ({placeholders})",
            columns.join(", ")
        );
        executor::run(executor, config, &sql, &values)?;
        tracing::debug!(target: "flamel.sql", model = table, "inserted new row");
        Ok(UpsertOutcome::Inserted)
    }
}

fn count_matching(
    executor: &dyn Executor,
    config: &DatabaseConfig,
    table: &str,
    column: &str,
    value: Value,
) -> OrmResult<i64> {
    let sql = format!("SELECT COUNT(*) FROM {table} WHERE {column} = ?");
    let rows = executor::run(executor, config, &sql, &[value])?;
    match rows.first().and_then(|row| row.first()) {
        None => Ok(0),
        Some(v) => v
            .as_i64()
            .ok_or_else(|| OrmError::decode("COUNT(*)", format!("expected integer, got {}", v.kind()))),
    }
}
