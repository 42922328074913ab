//! Container builder: merged definitions to resolvable containers

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::registry::TypeRegistry;
use crate::domain::{ContainerDefinition, XmlElement, TYPE_ATTRIBUTE};

/// Reserved attribute: cache and reuse the first instance of a dependency.
pub const SINGLE_INSTANCE_ATTRIBUTE: &str = "singleInstance";

/// Attribute value coerced once at the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl AttributeValue {
    /// Coercion order: boolean (case-insensitive), integer, then string.
    pub fn coerce(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("true") {
            return Self::Bool(true);
        }
        if raw.eq_ignore_ascii_case("false") {
            return Self::Bool(false);
        }
        if let Ok(integer) = raw.parse::<i64>() {
            return Self::Int(integer);
        }
        Self::Str(raw.to_string())
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) => Some(value),
            _ => None,
        }
    }
}

/// Typed configuration record for one dependency element of a merged
/// definition. Unmapped attributes (everything except `type` and
/// `singleInstance`) become constructor parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencySpec {
    /// Tag name of the dependency element
    pub name: String,
    /// Implementation key from the `type` attribute
    pub type_key: String,
    pub single_instance: bool,
    /// Coerced unmapped attributes, by attribute name
    pub attributes: std::collections::BTreeMap<String, AttributeValue>,
}

impl DependencySpec {
    /// Extract a spec from a dependency element. The `type` attribute is
    /// required; everything else is coerced and passed through.
    pub fn from_element(element: &XmlElement) -> ApplicationResult<Self> {
        let type_key = element
            .attribute(TYPE_ATTRIBUTE)
            .ok_or_else(|| ApplicationError::MissingTypeAttribute {
                dependency: element.tag.clone(),
            })?
            .to_string();

        let single_instance = element
            .attribute(SINGLE_INSTANCE_ATTRIBUTE)
            .is_some_and(|value| value.eq_ignore_ascii_case("true"));

        let attributes = element
            .attributes()
            .filter(|(name, _)| *name != TYPE_ATTRIBUTE && *name != SINGLE_INSTANCE_ATTRIBUTE)
            .map(|(name, value)| (name.to_string(), AttributeValue::coerce(value)))
            .collect();

        Ok(Self {
            name: element.tag.clone(),
            type_key,
            single_instance,
            attributes,
        })
    }
}

/// A built container: the dependency specs of one concrete definition,
/// resolvable against the registry.
pub struct Container {
    pub name: String,
    pub extends: Option<String>,
    entries: Vec<DependencySpec>,
    registry: Arc<TypeRegistry>,
    singletons: Mutex<HashMap<String, Arc<dyn Any + Send + Sync>>>,
}

impl Container {
    /// Dependency specs in document order.
    pub fn dependencies(&self) -> impl Iterator<Item = &DependencySpec> {
        self.entries.iter()
    }

    pub fn dependency(&self, name: &str) -> Option<&DependencySpec> {
        self.entries.iter().find(|spec| spec.name == name)
    }

    /// Instantiate a dependency by element name. `singleInstance` entries are
    /// created once and the same handle returned thereafter.
    pub fn resolve(&self, name: &str) -> ApplicationResult<Arc<dyn Any + Send + Sync>> {
        let spec = self
            .dependency(name)
            .ok_or_else(|| ApplicationError::UnknownDependency(name.to_string()))?;

        if !spec.single_instance {
            return self.registry.create(spec);
        }

        let mut singletons = self.singletons.lock().unwrap();
        if let Some(existing) = singletons.get(name) {
            return Ok(existing.clone());
        }
        let instance = self.registry.create(spec)?;
        singletons.insert(name.to_string(), instance.clone());
        Ok(instance)
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("name", &self.name)
            .field("extends", &self.extends)
            .field("entries", &self.entries)
            .finish()
    }
}

/// Builds containers from merged definitions, validating every
/// implementation key against the registry up front.
pub struct ContainerBuilder {
    registry: Arc<TypeRegistry>,
}

impl ContainerBuilder {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self { registry }
    }

    /// Build all non-abstract definitions.
    pub fn build_containers(
        &self,
        definitions: impl IntoIterator<Item = ContainerDefinition>,
    ) -> ApplicationResult<Vec<Container>> {
        definitions
            .into_iter()
            .filter(|definition| !definition.is_abstract)
            .map(|definition| self.build_container(&definition))
            .collect()
    }

    /// Build one container from a merged definition.
    pub fn build_container(
        &self,
        definition: &ContainerDefinition,
    ) -> ApplicationResult<Container> {
        debug!("build_container: {}", definition.name);

        let mut entries = Vec::new();
        for element in definition.element.child_elements() {
            let spec = DependencySpec::from_element(element)?;
            if !self.registry.contains(&spec.type_key) {
                return Err(ApplicationError::UnknownImplementationKey {
                    key: spec.type_key,
                    dependency: spec.name,
                });
            }
            entries.push(spec);
        }

        Ok(Container {
            name: definition.name.clone(),
            extends: definition.extends.clone(),
            entries,
            registry: self.registry.clone(),
            singletons: Mutex::new(HashMap::new()),
        })
    }
}
