use super::model::{Model, ModelDef};
use crate::error::OrmResult;
use std::collections::HashMap;
use std::sync::Arc;

/// Registration entry for the declared-model catalogue.
///
/// `#[derive(Model)]` submits one of these per model; see
/// [`Registry::with_declared_models`].
pub struct ModelRegistration {
    /// Builds the model definition.
    pub declare: fn() -> OrmResult<ModelDef>,
}

inventory::collect!(ModelRegistration);

/// Model name to model definition.
///
/// The first registration of a name wins and later ones are ignored.
/// Iteration follows registration order.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    models: Vec<Arc<ModelDef>>,
    index: HashMap<String, usize>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every model declared with `#[derive(Model)]` in the
    /// linked binary, registered in model-name order.
    pub fn with_declared_models() -> OrmResult<Self> {
        let mut models = inventory::iter::<ModelRegistration>
            .into_iter()
            .map(|reg| (reg.declare)())
            .collect::<OrmResult<Vec<_>>>()?;
        models.sort_by(|a, b| a.name().cmp(b.name()));

        let mut registry = Self::new();
        for model in models {
            registry.register(model);
        }
        Ok(registry)
    }

    /// Register a model definition unless its name is already taken.
    pub fn register(&mut self, model: impl Into<Arc<ModelDef>>) {
        let model = model.into();
        if self.index.contains_key(model.name()) {
            tracing::debug!(
                target: "flamel.schema",
                model = model.name(),
                "model already registered; keeping the first definition"
            );
            return;
        }
        self.index.insert(model.name().to_string(), self.models.len());
        self.models.push(model);
    }

    /// Declare and register a model type.
    pub fn register_model<M: Model>(&mut self) -> OrmResult<()> {
        if !self.contains(M::MODEL_NAME) {
            self.register(M::declare()?);
        }
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get_model(&self, name: &str) -> Option<Arc<ModelDef>> {
        self.index.get(name).map(|&i| Arc::clone(&self.models[i]))
    }

    /// Snapshot of all registered models in registration order.
    pub fn all_models(&self) -> Vec<Arc<ModelDef>> {
        self.models.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelDef> {
        self.models.iter().map(Arc::as_ref)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Drop every registration.
    pub fn clear(&mut self) {
        self.models.clear();
        self.index.clear();
    }

    /// One `CREATE TABLE IF NOT EXISTS` statement per model, in registry order.
    pub fn create_table_statements(&self) -> Vec<String> {
        self.iter().map(ModelDef::create_table_sql).collect()
    }

    /// JSON snapshot of every model definition.
    pub fn to_json(&self) -> OrmResult<String> {
        let models: Vec<&ModelDef> = self.iter().collect();
        Ok(serde_json::to_string_pretty(&models)?)
    }
}
