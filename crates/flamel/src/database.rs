//! The database context: a registry, an optional executor and configuration.

use crate::config::DatabaseConfig;
use crate::error::{OrmError, OrmResult};
use crate::executor::{self, Executor};
use crate::query::Query;
use crate::schema::{Instance, Model, ModelDef, Registry};
use crate::write::{self, UpsertOutcome};
use std::fmt;
use std::sync::Arc;

/// Owns the model registry and the executor every operation runs through.
///
/// ```ignore
/// let mut db = Database::with_declared_models()?;
/// db.set_engine(SqliteExecutor::open("company.db")?);
/// db.create_tables()?;
///
/// let mut q = db.query_for::<Worker>();
/// q.select(&[]).filter(&Filters::new().and_eq("name", "John Doe"))?;
/// let rows = q.execute()?;
/// ```
pub struct Database {
    registry: Registry,
    engine: Option<Box<dyn Executor>>,
    config: DatabaseConfig,
}

impl Database {
    /// An empty context without an executor.
    pub fn new() -> Self {
        Self::with_config(DatabaseConfig::default())
    }

    pub fn with_config(config: DatabaseConfig) -> Self {
        Self {
            registry: Registry::new(),
            engine: None,
            config,
        }
    }

    /// A context whose registry holds every `#[derive(Model)]` type linked
    /// into the binary.
    pub fn with_declared_models() -> OrmResult<Self> {
        let mut db = Self::new();
        db.registry = Registry::with_declared_models()?;
        Ok(db)
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: DatabaseConfig) {
        self.config = config;
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    /// Register a model definition (first registration of a name wins).
    pub fn register(&mut self, model: impl Into<Arc<ModelDef>>) {
        self.registry.register(model);
    }

    pub fn register_model<M: Model>(&mut self) -> OrmResult<()> {
        self.registry.register_model::<M>()
    }

    /// Install the executor, replacing any previous one without closing it.
    pub fn set_engine(&mut self, engine: impl Executor + 'static) {
        self.engine = Some(Box::new(engine));
    }

    /// Open a SQLite database file and use it as the executor.
    #[cfg(feature = "sqlite")]
    pub fn connect(&mut self, path: impl AsRef<std::path::Path>) -> OrmResult<()> {
        self.set_engine(crate::sqlite::SqliteExecutor::open(path)?);
        Ok(())
    }

    pub fn has_engine(&self) -> bool {
        self.engine.is_some()
    }

    pub fn engine(&self) -> Option<&dyn Executor> {
        self.engine.as_deref()
    }

    /// Close and drop the executor. A no-op when none is set.
    pub fn close_engine(&mut self) -> OrmResult<()> {
        match self.engine.take() {
            Some(engine) => engine.close(),
            None => Ok(()),
        }
    }

    /// Send one `CREATE TABLE IF NOT EXISTS` statement per registered model,
    /// in registration order.
    pub fn create_tables(&self) -> OrmResult<()> {
        let engine = executor::require(self.engine(), "creating tables")?;
        for model in self.registry.iter() {
            executor::run(engine, &self.config, &model.create_table_sql(), &[])?;
        }
        Ok(())
    }

    /// Start a query on `table`.
    pub fn query(&self, table: &str) -> Query<'_> {
        let query = Query::new(table).with_config(self.config);
        match self.engine() {
            Some(engine) => query.with_executor(engine),
            None => query,
        }
    }

    /// Start a query on the table of `M`.
    pub fn query_for<M: Model>(&self) -> Query<'_> {
        self.query(M::MODEL_NAME)
    }

    /// An empty instance of a registered model.
    pub fn instance(&self, model_name: &str) -> OrmResult<Instance> {
        self.registry
            .get_model(model_name)
            .map(Instance::new)
            .ok_or_else(|| OrmError::UnknownModel(model_name.to_string()))
    }

    /// Insert or update `instance`; see [`write::upsert`].
    pub fn insert(&self, instance: &Instance) -> OrmResult<UpsertOutcome> {
        let engine = executor::require(self.engine(), "inserting")?;
        write::upsert(engine, &self.config, instance)
    }

    /// Insert or update a model value, using its registered definition when
    /// there is one.
    pub fn save<M: Model>(&self, model: &M) -> OrmResult<UpsertOutcome> {
        let def = match self.registry.get_model(M::MODEL_NAME) {
            Some(def) => def,
            None => Arc::new(M::declare()?),
        };
        let instance = Instance::from_values(def, model.values())?;
        self.insert(&instance)
    }
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Database")
            .field("models", &self.registry.len())
            .field("has_engine", &self.has_engine())
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Filters;
    use crate::schema::{Column, ColumnType};
    use crate::testing::RecordingExecutor;
    use crate::value::Value;

    fn parent() -> ModelDef {
        ModelDef::builder("ParentClass")
            .column(Column::new("id", ColumnType::Integer).primary_key().autoincrement())
            .column(Column::new("name", ColumnType::String).not_null().unique())
            .build()
            .unwrap()
    }

    fn child() -> ModelDef {
        ModelDef::builder("ChildClass")
            .column(Column::new("id", ColumnType::Integer).primary_key().autoincrement())
            .column(Column::new("parent_id", ColumnType::Integer).references("ParentClass", "id"))
            .build()
            .unwrap()
    }

    #[test]
    fn test_create_tables_in_registration_order() {
        let exec = Arc::new(RecordingExecutor::new());
        let mut db = Database::new();
        db.register(parent());
        db.register(child());
        db.set_engine(Arc::clone(&exec));

        db.create_tables().unwrap();
        assert_eq!(
            exec.statements(),
            vec![
                "CREATE TABLE IF NOT EXISTS ParentClass (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL UNIQUE);".to_string(),
                "CREATE TABLE IF NOT EXISTS ChildClass (id INTEGER PRIMARY KEY AUTOINCREMENT, parent_id INTEGER, FOREIGN KEY (parent_id) REFERENCES ParentClass(id));".to_string(),
            ]
        );
    }

    #[test]
    fn test_create_tables_passes_strict_check() {
        let exec = Arc::new(RecordingExecutor::new());
        let mut db = Database::with_config(DatabaseConfig::new().strict());
        db.register(parent());
        db.set_engine(Arc::clone(&exec));
        db.create_tables().unwrap();
        assert_eq!(exec.statements().len(), 1);
    }

    #[test]
    fn test_engine_not_set() {
        let mut db = Database::new();
        db.register(parent());

        let err = db.create_tables().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Database engine is not set. Please set the engine before creating tables."
        );

        let instance = db.instance("ParentClass").unwrap();
        assert!(matches!(db.insert(&instance).unwrap_err(), OrmError::EngineNotSet(_)));

        let mut q = db.query("ParentClass");
        q.select(&[]);
        assert!(matches!(q.execute().unwrap_err(), OrmError::EngineNotSet(_)));
    }

    #[test]
    fn test_query_uses_engine() {
        let exec = Arc::new(RecordingExecutor::new());
        let mut db = Database::new();
        db.set_engine(Arc::clone(&exec));

        let mut q = db.query("ParentClass");
        q.select(&["id"]).filter(&Filters::new().and_eq("name", "p")).unwrap();
        q.execute().unwrap();
        assert_eq!(
            exec.calls(),
            vec![(
                "SELECT id FROM ParentClass WHERE name = ?".to_string(),
                vec![Value::from("p")]
            )]
        );
    }

    #[test]
    fn test_instance_for_unknown_model() {
        let db = Database::new();
        let err = db.instance("Nope").unwrap_err();
        assert!(matches!(err, OrmError::UnknownModel(ref name) if name == "Nope"));
    }

    #[test]
    fn test_insert_through_database() {
        let exec = Arc::new(RecordingExecutor::new());
        let mut db = Database::new();
        db.register(parent());
        db.set_engine(Arc::clone(&exec));

        let instance = db.instance("ParentClass").unwrap().with("name", "p").unwrap();
        assert_eq!(db.insert(&instance).unwrap(), UpsertOutcome::Inserted);
        assert_eq!(
            exec.statements()[1],
            "INSERT INTO ParentClass (id, name) VALUES (?, ?)"
        );
    }

    #[test]
    fn test_close_engine() {
        let mut db = Database::new();
        db.set_engine(RecordingExecutor::new());
        assert!(db.has_engine());
        db.close_engine().unwrap();
        assert!(!db.has_engine());
        db.close_engine().unwrap();
    }
}
