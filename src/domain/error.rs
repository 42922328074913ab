//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Errors from parsing XML text into a document tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected end of input while parsing {expected}")]
    UnexpectedEof { expected: String },

    #[error("unexpected character '{found}' at {line}:{column}, expected {expected}")]
    UnexpectedChar {
        found: char,
        expected: String,
        line: usize,
        column: usize,
    },

    #[error("mismatched closing tag at {line}:{column}: expected </{expected}>, found </{found}>")]
    MismatchedTag {
        expected: String,
        found: String,
        line: usize,
        column: usize,
    },

    #[error("duplicate attribute '{name}' at {line}:{column}")]
    DuplicateAttribute {
        name: String,
        line: usize,
        column: usize,
    },

    #[error("invalid character reference '&{reference};' at {line}:{column}")]
    InvalidCharacterReference {
        reference: String,
        line: usize,
        column: usize,
    },

    #[error("document has no root element")]
    MissingRoot,

    #[error("content after root element at {line}:{column}")]
    TrailingContent { line: usize, column: usize },
}

/// Domain errors represent business logic violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("definition root <{tag}> has no 'name' attribute")]
    MissingNameAttribute { tag: String },

    #[error("duplicate definition name: {0}")]
    DuplicateDefinition(String),

    #[error("unknown definition: {0}")]
    UnknownDefinition(String),

    #[error("definition '{name}' extends unknown base: {extends}")]
    UnknownBase { name: String, extends: String },

    #[error("inheritance cycle detected at definition: {0}")]
    InheritanceCycle(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
