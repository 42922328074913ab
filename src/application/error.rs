//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("missing 'type' attribute for dependency '{dependency}'")]
    MissingTypeAttribute { dependency: String },

    #[error("unknown implementation key '{key}' for dependency '{dependency}'")]
    UnknownImplementationKey { key: String, dependency: String },

    #[error("unknown dependency: {0}")]
    UnknownDependency(String),

    #[error("definition '{0}' is abstract and cannot be built")]
    AbstractDefinition(String),

    #[error("multiple defaults layers: {} and {}", first.display(), second.display())]
    MultipleDefaults { first: PathBuf, second: PathBuf },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
