//! Explicit model and entity registry.
//!
//! Models and the entity shapes rows map into are declared up front and
//! looked up by name at runtime — there is no reflection-style type
//! discovery. The entity for a model follows the fixed `{Model}Entity`
//! naming convention; a model whose entity shape was never registered
//! fails at fetch time.

use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::error::{WeftError, WeftResult};

/// One registered model: a name bound to its table.
#[derive(Debug, Clone)]
pub struct ModelDef {
    pub name: String,
    pub table: String,
}

/// Registry of model definitions and known entity shapes.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    models: IndexMap<String, ModelDef>,
    entities: BTreeSet<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model under its name.
    pub fn model(mut self, name: &str, table: &str) -> Self {
        self.models.insert(
            name.to_string(),
            ModelDef {
                name: name.to_string(),
                table: table.to_string(),
            },
        );
        self
    }

    /// Register an entity shape.
    pub fn entity(mut self, name: &str) -> Self {
        self.entities.insert(name.to_string());
        self
    }

    /// Look up a model definition.
    pub fn get(&self, name: &str) -> WeftResult<&ModelDef> {
        self.models
            .get(name)
            .ok_or_else(|| WeftError::MissingModel(name.to_string()))
    }

    /// Resolve the entity shape for a model by the `{Model}Entity`
    /// convention, failing if no such shape is registered.
    pub fn entity_for(&self, model: &ModelDef) -> WeftResult<String> {
        let entity = format!("{}Entity", model.name);
        if self.entities.contains(&entity) {
            Ok(entity)
        } else {
            Err(WeftError::MissingEntity(entity))
        }
    }

    /// All registered model names, in registration order.
    pub fn model_names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }
}
