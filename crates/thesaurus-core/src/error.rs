//! Error types for the thesaurus service.

use thiserror::Error;

/// Result type alias using the thesaurus Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for vocabulary operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Concept not found
    #[error("Concept not found: {0}")]
    ConceptNotFound(uuid::Uuid),

    /// Label not found
    #[error("Label not found: {0}")]
    LabelNotFound(uuid::Uuid),

    /// RDF object term is not a quoted string literal.
    #[error("{kind}#build_from_rdf: Object ({value}) must be a string literal")]
    MalformedLiteral { value: String, kind: String },

    /// A line of triple text could not be split into subject, predicate, object.
    #[error("Malformed triple on line {line}: {reason}")]
    MalformedTriple { line: usize, reason: String },

    /// No labeling kind registered under the given name or predicate.
    #[error("Unknown labeling kind: {0}")]
    UnknownLabelingKind(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
