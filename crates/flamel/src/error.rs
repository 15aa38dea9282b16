//! Error types for flamel

use thiserror::Error;

/// Result type alias for flamel operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Boxed error produced by an executor / database driver.
pub type DriverError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error types for schema declaration, query building and execution
#[derive(Debug, Error)]
pub enum OrmError {
    /// A column type name outside the supported set
    #[error("Invalid column type '{0}': expected one of INTEGER, TEXT, DATETIME, REAL, BLOB, BOOLEAN")]
    InvalidType(String),

    /// A column default that does not fit the column type
    #[error("Invalid default for column '{column}': {message}")]
    InvalidDefault { column: String, message: String },

    /// A malformed CHECK constraint
    #[error("Invalid check constraint for column '{column}': {message}")]
    InvalidCheck { column: String, message: String },

    /// A malformed foreign key reference
    #[error("Invalid foreign key for column '{column}': {message}")]
    InvalidForeignKey { column: String, message: String },

    /// No executor configured
    #[error("Database engine is not set. Please set the engine before {0}.")]
    EngineNotSet(&'static str),

    /// Fluent query methods called out of order
    #[error("The '{required}' method must be called before '{method}'.")]
    Sequence {
        method: &'static str,
        required: &'static str,
    },

    /// Upsert without a usable primary key
    #[error("Primary key value is not set")]
    MissingPrimaryKey,

    /// Column name not declared on the model
    #[error("Unknown column '{column}' for model '{model}'")]
    UnknownColumn { model: String, column: String },

    /// Model name not present in the registry
    #[error("Unknown model '{0}'")]
    UnknownModel(String),

    /// SQL text rejected by the statement-shape validator
    #[error("Invalid SQL: {0}")]
    InvalidSql(String),

    /// Error surfaced by the executor (the executor has already rolled back)
    #[error("Driver error: {0}")]
    Driver(#[source] DriverError),

    /// Connection unavailable (closed or poisoned)
    #[error("Connection error: {0}")]
    Connection(String),

    /// Row decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl OrmError {
    /// Wrap a driver error.
    pub fn driver(err: impl Into<DriverError>) -> Self {
        Self::Driver(err.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    pub(crate) fn invalid_default(column: &str, message: impl Into<String>) -> Self {
        Self::InvalidDefault {
            column: column.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn sequence(method: &'static str, required: &'static str) -> Self {
        Self::Sequence { method, required }
    }

    /// Check if this is a schema declaration error
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidType(_)
                | Self::InvalidDefault { .. }
                | Self::InvalidCheck { .. }
                | Self::InvalidForeignKey { .. }
        )
    }

    /// Check if this is a query-sequence error
    pub fn is_sequence_error(&self) -> bool {
        matches!(self, Self::Sequence { .. })
    }

    /// Check if this error came from the driver
    pub fn is_driver_error(&self) -> bool {
        matches!(self, Self::Driver(_))
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for OrmError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Driver(Box::new(err))
    }
}
