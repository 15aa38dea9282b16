//! Convenient imports for typical `flamel` usage.
//!
//! ```ignore
//! use flamel::prelude::*;
//! ```

pub use crate::{
    Column, ColumnType, Database, DatabaseConfig, Direction, Executor, Filters, Instance, JoinKind,
    Model, ModelDef, OrmError, OrmResult, Query, UpsertOutcome, Value,
};

#[cfg(feature = "sqlite")]
pub use crate::SqliteExecutor;
