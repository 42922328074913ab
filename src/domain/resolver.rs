//! Chain resolver: orders named layers for pairwise merging

use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use crate::domain::definition::ContainerDefinition;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::inheritance::InheritanceEngine;
use crate::domain::node::XmlElement;

/// Holds all known definitions plus an optional anonymous defaults layer and
/// computes the merge order for a requested name.
#[derive(Debug, Default)]
pub struct ChainResolver {
    definitions: BTreeMap<String, ContainerDefinition>,
    defaults: Option<XmlElement>,
}

impl ChainResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_defaults(&mut self, defaults: XmlElement) {
        self.defaults = Some(defaults);
    }

    pub fn defaults(&self) -> Option<&XmlElement> {
        self.defaults.as_ref()
    }

    /// Register a definition. Names must be unique.
    pub fn insert(&mut self, definition: ContainerDefinition) -> DomainResult<()> {
        if self.definitions.contains_key(&definition.name) {
            return Err(DomainError::DuplicateDefinition(definition.name));
        }
        self.definitions.insert(definition.name.clone(), definition);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ContainerDefinition> {
        self.definitions.get(name)
    }

    /// All definitions, ordered by name.
    pub fn definitions(&self) -> impl Iterator<Item = &ContainerDefinition> {
        self.definitions.values()
    }

    /// Definitions that extend `name`, ordered by name.
    pub fn derived_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ContainerDefinition> {
        self.definitions
            .values()
            .filter(move |definition| definition.extends.as_deref() == Some(name))
    }

    /// Definitions that extend nothing, ordered by name.
    pub fn roots(&self) -> impl Iterator<Item = &ContainerDefinition> {
        self.definitions
            .values()
            .filter(|definition| definition.extends.is_none())
    }

    /// The inheritance chain for `name`, base-first.
    ///
    /// Walks `extends` links up from the requested definition. Unknown names
    /// and cycles are detected here, before any merging happens.
    pub fn chain(&self, name: &str) -> DomainResult<Vec<&ContainerDefinition>> {
        let mut chain = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();

        let mut current = self
            .definitions
            .get(name)
            .ok_or_else(|| DomainError::UnknownDefinition(name.to_string()))?;

        loop {
            if !visited.insert(current.name.as_str()) {
                return Err(DomainError::InheritanceCycle(current.name.clone()));
            }
            chain.push(current);

            match current.extends.as_deref() {
                Some(base) => {
                    current = self.definitions.get(base).ok_or_else(|| {
                        DomainError::UnknownBase {
                            name: current.name.clone(),
                            extends: base.to_string(),
                        }
                    })?;
                }
                None => break,
            }
        }

        chain.reverse();
        debug!(
            "chain: {} -> [{}]",
            name,
            chain
                .iter()
                .map(|definition| definition.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(chain)
    }

    /// Fold the merge engine over defaults and the chain for `name`,
    /// producing the fully merged definition.
    pub fn merged(
        &self,
        engine: &InheritanceEngine,
        name: &str,
    ) -> DomainResult<ContainerDefinition> {
        let chain = self.chain(name)?;

        let mut layers = chain.iter().map(|definition| &definition.element);
        let mut accumulated = match &self.defaults {
            Some(defaults) => defaults.clone(),
            // Chain is never empty: `chain` errors on unknown names
            None => layers
                .next()
                .ok_or_else(|| DomainError::UnknownDefinition(name.to_string()))?
                .clone(),
        };
        for layer in layers {
            accumulated = engine.process(&accumulated, layer);
        }

        ContainerDefinition::from_element(accumulated)
    }
}
