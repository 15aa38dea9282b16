/// Whether statements are shape-checked before they reach the executor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckMode {
    /// No checking (default).
    #[default]
    Disabled,
    /// Log a warning for unrecognized statements but run them anyway.
    WarnOnly,
    /// Refuse unrecognized statements with `OrmError::InvalidSql`.
    Strict,
}

/// How [`upsert`](crate::write::upsert) decides between INSERT and UPDATE.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpsertStrategy {
    /// Requires an autoincrementing primary key and looks up existing rows by
    /// the second declared column (or the primary key when the model has a
    /// single column). The UPDATE is still keyed on the primary-key value, so
    /// a match with an unset key updates nothing.
    #[default]
    SecondColumn,
    /// Looks up existing rows by primary key. An unset autoincrementing key
    /// always inserts.
    PrimaryKey,
}

/// Configuration for [`Database`](crate::Database) and [`Query`](crate::Query).
#[derive(Debug, Clone, Copy)]
pub struct DatabaseConfig {
    /// SQL check mode.
    pub check_mode: CheckMode,
    /// Write path strategy.
    pub upsert_strategy: UpsertStrategy,
    /// Maximum SQL length in log events (`None` logs the full text).
    pub max_sql_length: Option<usize>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            check_mode: CheckMode::Disabled,
            upsert_strategy: UpsertStrategy::SecondColumn,
            max_sql_length: Some(200),
        }
    }
}

impl DatabaseConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set SQL check mode.
    pub fn check_mode(mut self, mode: CheckMode) -> Self {
        self.check_mode = mode;
        self
    }

    /// Refuse statements the validator does not recognize.
    pub fn strict(mut self) -> Self {
        self.check_mode = CheckMode::Strict;
        self
    }

    /// Disable SQL checking.
    pub fn no_check(mut self) -> Self {
        self.check_mode = CheckMode::Disabled;
        self
    }

    pub fn upsert_strategy(mut self, strategy: UpsertStrategy) -> Self {
        self.upsert_strategy = strategy;
        self
    }

    /// Truncate logged SQL to `max` bytes.
    pub fn max_sql_length(mut self, max: usize) -> Self {
        self.max_sql_length = Some(max);
        self
    }

    /// Log full SQL text.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }
}
