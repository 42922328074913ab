//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Infra(InfraError::Application(app)) => match app {
                ApplicationError::Domain(DomainError::Parse(_)) => crate::exitcode::DATAERR,
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                _ => crate::exitcode::SOFTWARE,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ParseError;

    #[test]
    fn test_exit_code_mapping() {
        let usage = CliError::Usage("bad".into());
        assert_eq!(usage.exit_code(), crate::exitcode::USAGE);

        let parse: CliError = InfraError::Application(ApplicationError::Domain(
            DomainError::Parse(ParseError::MissingRoot),
        ))
        .into();
        assert_eq!(parse.exit_code(), crate::exitcode::DATAERR);

        let config: CliError = InfraError::Application(ApplicationError::Config {
            message: "bad".into(),
        })
        .into();
        assert_eq!(config.exit_code(), crate::exitcode::CONFIG);
    }
}
