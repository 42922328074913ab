//! Type registry: string implementation keys mapped to factories
//!
//! Replaces runtime reflection over type names with an explicit mapping,
//! populated at startup. A failed lookup is a typed error, not a panic.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::application::builder::DependencySpec;
use crate::application::error::{ApplicationError, ApplicationResult};

/// Factory producing a runtime object from its dependency spec.
pub type FactoryFn = Box<dyn Fn(&DependencySpec) -> Arc<dyn Any + Send + Sync> + Send + Sync>;

/// Maps stable implementation keys (the `type` attribute values) to factories.
#[derive(Default)]
pub struct TypeRegistry {
    factories: HashMap<String, FactoryFn>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under an implementation key. Re-registering a key
    /// replaces the previous factory.
    pub fn register<F>(&mut self, key: impl Into<String>, factory: F)
    where
        F: Fn(&DependencySpec) -> Arc<dyn Any + Send + Sync> + Send + Sync + 'static,
    {
        let key = key.into();
        debug!("register: {}", key);
        self.factories.insert(key, Box::new(factory));
    }

    pub fn contains(&self, key: &str) -> bool {
        self.factories.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Invoke the factory for the spec's implementation key.
    pub fn create(&self, spec: &DependencySpec) -> ApplicationResult<Arc<dyn Any + Send + Sync>> {
        let factory = self.factories.get(&spec.type_key).ok_or_else(|| {
            ApplicationError::UnknownImplementationKey {
                key: spec.type_key.clone(),
                dependency: spec.name.clone(),
            }
        })?;
        Ok(factory(spec))
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("keys", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}
