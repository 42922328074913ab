//! Domain layer: node model and inheritance logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod definition;
pub mod error;
pub mod inheritance;
pub mod node;
pub mod parser;
pub mod resolver;
pub mod variables;

pub use definition::{
    ContainerDefinition, ABSTRACT_ATTRIBUTE, EXTENDS_ATTRIBUTE, NAME_ATTRIBUTE,
};
pub use error::{DomainError, DomainResult, ParseError};
pub use inheritance::{InheritanceEngine, TYPE_ATTRIBUTE};
pub use node::{XmlContent, XmlDocument, XmlElement};
pub use resolver::ChainResolver;
pub use variables::{TokenVariablesReplacer, VariablesReplacer};
