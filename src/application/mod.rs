//! Application layer: services and use cases
//!
//! This layer orchestrates domain logic and depends on I/O boundary traits.

pub mod builder;
pub mod error;
pub mod error_ext;
pub mod registry;
pub mod services;

pub use builder::{AttributeValue, Container, ContainerBuilder, DependencySpec};
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use registry::TypeRegistry;
pub use services::ConfigurationService;
