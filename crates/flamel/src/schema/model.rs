use super::column::{Column, ColumnDef, ForeignKeyRef};
use crate::error::{OrmError, OrmResult};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// A named, ordered list of columns.
///
/// Declaration order drives DDL column order and the positional parameter
/// order of writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDef {
    name: String,
    columns: Vec<ColumnDef>,
}

impl ModelDef {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnDef>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    pub fn builder(name: impl Into<String>) -> ModelDefBuilder {
        ModelDefBuilder {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    /// Model (and table) name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// The first column flagged as primary key.
    pub fn primary_key(&self) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.is_primary_key())
    }

    pub fn foreign_keys(&self) -> impl Iterator<Item = &ForeignKeyRef> {
        self.columns.iter().filter_map(ColumnDef::foreign_key)
    }

    /// `CREATE TABLE IF NOT EXISTS <name> (<col-defs>, <fk-defs>);`
    pub fn create_table_sql(&self) -> String {
        let clauses: Vec<String> = self
            .columns
            .iter()
            .map(ColumnDef::to_ddl)
            .chain(self.foreign_keys().map(ForeignKeyRef::to_ddl))
            .collect();
        format!(
            "CREATE TABLE IF NOT EXISTS {} ({});",
            self.name,
            clauses.join(", ")
        )
    }
}

/// Builder returned by [`ModelDef::builder`].
#[derive(Debug, Clone)]
#[must_use]
pub struct ModelDefBuilder {
    name: String,
    columns: Vec<Column>,
}

impl ModelDefBuilder {
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn columns(mut self, columns: impl IntoIterator<Item = Column>) -> Self {
        self.columns.extend(columns);
        self
    }

    /// Validate every column; the first invalid one fails the model.
    pub fn build(self) -> OrmResult<ModelDef> {
        let columns = self
            .columns
            .into_iter()
            .map(Column::build)
            .collect::<OrmResult<Vec<_>>>()?;
        Ok(ModelDef::new(self.name, columns))
    }
}

/// A type that maps to a table.
///
/// Usually implemented with `#[derive(Model)]`:
///
/// ```ignore
/// #[derive(Model)]
/// #[orm(table = "Worker")]
/// struct Worker {
///     #[orm(id, autoincrement)]
///     id: Option<i64>,
///     #[orm(unique)]
///     name: String,
/// }
/// ```
pub trait Model {
    /// Registry key and table name.
    const MODEL_NAME: &'static str;

    /// Build the model definition.
    fn declare() -> OrmResult<ModelDef>;

    /// Current field values keyed by column name, in declaration order.
    fn values(&self) -> Vec<(&'static str, Value)>;
}

/// Runtime value of a model: column name to value.
///
/// Columns left unset (or set to [`Value::Null`]) fall back to the column
/// default when read with [`Instance::get`] or written.
#[derive(Debug, Clone)]
pub struct Instance {
    model: Arc<ModelDef>,
    values: HashMap<String, Value>,
}

impl Instance {
    pub fn new(model: Arc<ModelDef>) -> Self {
        Self {
            model,
            values: HashMap::new(),
        }
    }

    /// Build an instance from `(column, value)` pairs.
    pub fn from_values<K, V, I>(model: Arc<ModelDef>, values: I) -> OrmResult<Self>
    where
        K: AsRef<str>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut instance = Self::new(model);
        for (column, value) in values {
            instance.set(column.as_ref(), value)?;
        }
        Ok(instance)
    }

    pub fn model(&self) -> &ModelDef {
        &self.model
    }

    /// Set a column value. Fails with `UnknownColumn` if the model has no
    /// such column.
    pub fn set(&mut self, column: &str, value: impl Into<Value>) -> OrmResult<&mut Self> {
        if !self.model.has_column(column) {
            return Err(OrmError::UnknownColumn {
                model: self.model.name().to_string(),
                column: column.to_string(),
            });
        }
        self.values.insert(column.to_string(), value.into());
        Ok(self)
    }

    /// Chaining form of [`Instance::set`].
    pub fn with(mut self, column: &str, value: impl Into<Value>) -> OrmResult<Self> {
        self.set(column, value)?;
        Ok(self)
    }

    /// The explicitly set value, if any.
    pub fn explicit(&self, column: &str) -> Option<&Value> {
        self.values.get(column).filter(|v| !v.is_null())
    }

    /// Explicit value, else the resolved column default, else `Null`.
    /// `None` when the model has no such column.
    pub fn get(&self, column: &str) -> Option<Value> {
        let def = self.model.column(column)?;
        Some(self.resolve(def))
    }

    pub(crate) fn resolve(&self, def: &ColumnDef) -> Value {
        if let Some(value) = self.explicit(def.name()) {
            return value.clone();
        }
        def.default().map_or(Value::Null, |d| d.resolve())
    }
}
