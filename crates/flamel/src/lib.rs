//! # flamel
//!
//! A small declarative ORM.
//!
//! ## Features
//!
//! - **Declarative schema**: models are ordered column lists, declared with a
//!   builder or `#[derive(Model)]`
//! - **DDL generation**: one `CREATE TABLE IF NOT EXISTS` per registered model,
//!   including defaults, checks and foreign keys
//! - **Fluent queries**: select/filter/join/order/limit/group/having/CTE with
//!   `?` placeholders and parameters bound in call order
//! - **Upserts**: insert-or-update decided by a `COUNT(*)` lookup
//! - **Pluggable execution**: everything runs through the [`Executor`] trait;
//!   a SQLite executor ships behind the `sqlite` feature
//!
//! ```ignore
//! use flamel::prelude::*;
//!
//! #[derive(Debug, Model)]
//! struct Worker {
//!     #[orm(id, autoincrement)]
//!     id: Option<i64>,
//!     #[orm(unique)]
//!     name: String,
//!     #[orm(column = "mail", unique)]
//!     email: String,
//! }
//!
//! let mut db = Database::with_declared_models()?;
//! db.set_engine(SqliteExecutor::open("company.db")?);
//! db.create_tables()?;
//!
//! db.save(&Worker { id: None, name: "John Doe".into(), email: "john@example.com".into() })?;
//!
//! let mut q = db.query_for::<Worker>();
//! q.select(&[]).filter(&Filters::new().and_eq("name", "John Doe"))?;
//! println!("{q}");
//! let rows = q.execute()?;
//! ```

pub mod check;
pub mod config;
pub mod database;
pub mod error;
pub mod executor;
pub mod prelude;
pub mod query;
pub mod schema;
pub mod value;
pub mod write;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(test)]
mod testing;

pub use check::{StatementKind, detect_statement_kind, is_valid_sql, validate_sql};
pub use config::{CheckMode, DatabaseConfig, UpsertStrategy};
pub use database::Database;
pub use error::{OrmError, OrmResult};
pub use executor::{Executor, Row};
pub use query::{Direction, Filters, JoinKind, Query, SqlBuilder};
pub use schema::{
    Column, ColumnDef, ColumnDefault, ColumnType, ForeignKeyRef, Instance, Model, ModelDef,
    ModelDefBuilder, ModelRegistration, Registry,
};
pub use value::Value;
pub use write::{UpsertOutcome, upsert};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteExecutor;

#[cfg(feature = "derive")]
pub use flamel_derive::Model;

// Re-export inventory for use by derive macros
pub use inventory;
