use crate::error::{OrmError, OrmResult};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of column types, each with a canonical SQL name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    Integer,
    String,
    DateTime,
    Real,
    Blob,
    Boolean,
}

impl ColumnType {
    pub const ALL: [ColumnType; 6] = [
        ColumnType::Integer,
        ColumnType::String,
        ColumnType::DateTime,
        ColumnType::Real,
        ColumnType::Blob,
        ColumnType::Boolean,
    ];

    /// SQL type name used verbatim in DDL.
    pub const fn sql_name(self) -> &'static str {
        match self {
            ColumnType::Integer => "INTEGER",
            ColumnType::String => "TEXT",
            ColumnType::DateTime => "DATETIME",
            ColumnType::Real => "REAL",
            ColumnType::Blob => "BLOB",
            ColumnType::Boolean => "BOOLEAN",
        }
    }

    /// Resolve a type by its SQL name (`TEXT`) or variant name (`String`),
    /// case-insensitively.
    pub fn from_sql_name(name: &str) -> OrmResult<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|ty| {
                ty.sql_name().eq_ignore_ascii_case(name)
                    || format!("{ty:?}").eq_ignore_ascii_case(name)
            })
            .ok_or_else(|| OrmError::InvalidType(name.to_string()))
    }

    /// Whether a default value of this runtime kind may be stored in the column.
    pub fn accepts(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (ColumnType::Integer, Value::Integer(_))
                | (ColumnType::Boolean, Value::Boolean(_) | Value::Integer(_))
                | (ColumnType::Real, Value::Real(_))
                | (ColumnType::String, Value::Text(_))
                | (ColumnType::Blob, Value::Blob(_))
                | (ColumnType::DateTime, Value::DateTime(_) | Value::Text(_))
        )
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql_name())
    }
}

impl FromStr for ColumnType {
    type Err = OrmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_sql_name(s)
    }
}

/// `FOREIGN KEY (<column>) REFERENCES <table>(<referenced column>)`.
///
/// The referenced table is not looked up at declaration time; the storage
/// engine validates it when the DDL runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyRef {
    column: String,
    referenced_table: String,
    referenced_column: String,
}

impl ForeignKeyRef {
    pub fn new(
        column: impl Into<String>,
        referenced_table: impl Into<String>,
        referenced_column: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into(),
            referenced_table: referenced_table.into(),
            referenced_column: referenced_column.into(),
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn referenced_table(&self) -> &str {
        &self.referenced_table
    }

    pub fn referenced_column(&self) -> &str {
        &self.referenced_column
    }

    pub fn to_ddl(&self) -> String {
        format!(
            "FOREIGN KEY ({}) REFERENCES {}({})",
            self.column, self.referenced_table, self.referenced_column
        )
    }

    fn validate(&self, owner: &str) -> OrmResult<()> {
        let parts = [
            ("column", &self.column),
            ("referenced table", &self.referenced_table),
            ("referenced column", &self.referenced_column),
        ];
        for (what, part) in parts {
            if part.trim().is_empty() {
                return Err(OrmError::InvalidForeignKey {
                    column: owner.to_string(),
                    message: format!("{what} must not be empty"),
                });
            }
        }
        Ok(())
    }
}

/// A column default: a literal, or the current time resolved at write time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnDefault {
    Value(Value),
    CurrentTimestamp,
}

impl ColumnDefault {
    /// The literal placed after `DEFAULT` in DDL.
    pub fn to_sql(&self) -> String {
        match self {
            ColumnDefault::Value(v) => v.to_sql_literal(),
            ColumnDefault::CurrentTimestamp => "CURRENT_TIMESTAMP".to_string(),
        }
    }

    /// The value written when an instance leaves the column unset.
    pub fn resolve(&self) -> Value {
        match self {
            ColumnDefault::Value(v) => v.clone(),
            ColumnDefault::CurrentTimestamp => Value::DateTime(chrono::Utc::now().naive_utc()),
        }
    }
}

/// A validated column definition. Build one with [`Column`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    name: String,
    column_type: ColumnType,
    nullable: bool,
    default: Option<ColumnDefault>,
    primary_key: bool,
    unique: bool,
    check: Option<String>,
    autoincrement: bool,
    foreign_key: Option<ForeignKeyRef>,
}

impl ColumnDef {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    pub fn default(&self) -> Option<&ColumnDefault> {
        self.default.as_ref()
    }

    pub fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    pub fn check(&self) -> Option<&str> {
        self.check.as_deref()
    }

    pub fn is_autoincrement(&self) -> bool {
        self.autoincrement
    }

    pub fn foreign_key(&self) -> Option<&ForeignKeyRef> {
        self.foreign_key.as_ref()
    }

    /// Column clause for `CREATE TABLE`.
    ///
    /// Token order is fixed:
    /// `name TYPE [NOT NULL] [DEFAULT lit] [UNIQUE] [CHECK (expr)] [PRIMARY KEY] [AUTOINCREMENT]`.
    pub fn to_ddl(&self) -> String {
        let mut out = format!("{} {}", self.name, self.column_type.sql_name());
        if !self.nullable {
            out.push_str(" NOT NULL");
        }
        if let Some(default) = &self.default {
            out.push_str(" DEFAULT ");
            out.push_str(&default.to_sql());
        }
        if self.unique {
            out.push_str(" UNIQUE");
        }
        if let Some(check) = &self.check {
            out.push_str(" CHECK (");
            out.push_str(check);
            out.push(')');
        }
        if self.primary_key {
            out.push_str(" PRIMARY KEY");
        }
        if self.autoincrement {
            out.push_str(" AUTOINCREMENT");
        }
        out
    }
}

/// Builder for [`ColumnDef`].
///
/// ```ignore
/// let id = Column::new("id", ColumnType::Integer).primary_key().autoincrement();
/// let name = Column::new("name", ColumnType::String).not_null().unique();
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct Column {
    name: String,
    column_type: Result<ColumnType, String>,
    nullable: bool,
    default: Option<ColumnDefault>,
    primary_key: bool,
    unique: bool,
    check: Option<String>,
    autoincrement: bool,
    foreign_key: Option<ForeignKeyRef>,
}

impl Column {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self::with_type(name.into(), Ok(column_type))
    }

    /// Declare a column by SQL type name; unknown names fail in [`Column::build`].
    pub fn of_type_name(name: impl Into<String>, type_name: &str) -> Self {
        let column_type = ColumnType::from_sql_name(type_name).map_err(|_| type_name.to_string());
        Self::with_type(name.into(), column_type)
    }

    fn with_type(name: String, column_type: Result<ColumnType, String>) -> Self {
        Self {
            name,
            column_type,
            nullable: true,
            default: None,
            primary_key: false,
            unique: false,
            check: None,
            autoincrement: false,
            foreign_key: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn not_null(self) -> Self {
        self.nullable(false)
    }

    /// Literal default. `Value::Null` clears the default.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.default = (!value.is_null()).then_some(ColumnDefault::Value(value));
        self
    }

    /// Default to the current timestamp (`DEFAULT CURRENT_TIMESTAMP`).
    pub fn default_now(mut self) -> Self {
        self.default = Some(ColumnDefault::CurrentTimestamp);
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Raw SQL boolean expression for a `CHECK` constraint.
    pub fn check(mut self, expr: impl Into<String>) -> Self {
        self.check = Some(expr.into());
        self
    }

    pub fn autoincrement(mut self) -> Self {
        self.autoincrement = true;
        self
    }

    pub fn foreign_key(mut self, fk: ForeignKeyRef) -> Self {
        self.foreign_key = Some(fk);
        self
    }

    /// Shorthand for a foreign key from this column to `table(column)`.
    pub fn references(self, table: impl Into<String>, column: impl Into<String>) -> Self {
        let fk = ForeignKeyRef::new(self.name.clone(), table, column);
        self.foreign_key(fk)
    }

    /// Validate and produce the column definition.
    pub fn build(self) -> OrmResult<ColumnDef> {
        let column_type = self.column_type.map_err(OrmError::InvalidType)?;

        if let Some(ColumnDefault::Value(value)) = &self.default {
            if !column_type.accepts(value) {
                return Err(OrmError::invalid_default(
                    &self.name,
                    format!(
                        "a {} default does not fit a {} column",
                        value.kind(),
                        column_type.sql_name()
                    ),
                ));
            }
            if let Value::Real(f) = value {
                if !f.is_finite() {
                    return Err(OrmError::invalid_default(
                        &self.name,
                        format!("{f} has no SQL literal"),
                    ));
                }
            }
        }

        if let Some(check) = &self.check {
            if check.trim().is_empty() {
                return Err(OrmError::InvalidCheck {
                    column: self.name,
                    message: "check expression must not be empty".to_string(),
                });
            }
        }

        if let Some(fk) = &self.foreign_key {
            fk.validate(&self.name)?;
        }

        Ok(ColumnDef {
            name: self.name,
            column_type,
            nullable: self.nullable,
            default: self.default,
            primary_key: self.primary_key,
            unique: self.unique,
            check: self.check,
            autoincrement: self.autoincrement,
            foreign_key: self.foreign_key,
        })
    }
}

impl TryFrom<Column> for ColumnDef {
    type Error = OrmError;

    fn try_from(column: Column) -> Result<Self, Self::Error> {
        column.build()
    }
}
