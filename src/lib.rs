//! Hierarchical XML configuration: inheritance merge, chain resolution,
//! variable substitution, and container building.
//!
//! Layered architecture:
//! - `domain`: XML tree model, parser, inheritance engine, chain resolver
//! - `application`: configuration service, type registry, container builder
//! - `infrastructure`: filesystem boundary and dependency wiring
//! - `cli`: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use application::{Container, ContainerBuilder, DependencySpec, TypeRegistry};
pub use domain::{InheritanceEngine, XmlDocument, XmlElement};
