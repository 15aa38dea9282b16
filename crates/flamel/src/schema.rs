//! Declarative schema metadata.
//!
//! A model is a named, ordered list of columns. Models are collected in a
//! [`Registry`] which renders one `CREATE TABLE IF NOT EXISTS` statement per
//! model:
//!
//! ```ignore
//! use flamel::schema::{Column, ColumnType, ModelDef, Registry};
//!
//! let worker = ModelDef::builder("Worker")
//!     .column(Column::new("id", ColumnType::Integer).primary_key().autoincrement())
//!     .column(Column::new("name", ColumnType::String).not_null().unique())
//!     .build()?;
//!
//! let mut registry = Registry::new();
//! registry.register(worker);
//! assert_eq!(
//!     registry.create_table_statements()[0],
//!     "CREATE TABLE IF NOT EXISTS Worker (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL UNIQUE);"
//! );
//! ```

pub mod column;
pub mod model;
pub mod registry;

pub use column::{Column, ColumnDef, ColumnDefault, ColumnType, ForeignKeyRef};
pub use model::{Instance, Model, ModelDef, ModelDefBuilder};
pub use registry::{ModelRegistration, Registry};
