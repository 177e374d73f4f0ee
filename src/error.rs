//! Error types for Weft.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeftError {
    /// Pagination was requested on a clause set with no per-page limit.
    #[error("To paginate, set a limit on the query first")]
    MissingLimit,

    /// No model registered under the given name.
    #[error("Model {0} does not exist")]
    MissingModel(String),

    /// No entity registered for the model's `{Model}Entity` convention.
    #[error("Entity {0} does not exist")]
    MissingEntity(String),

    /// A statement references a placeholder with no bound value.
    #[error("No value bound for placeholder :{0}")]
    UnboundPlaceholder(String),

    /// Relationship kind outside the closed belongs-to / has-many set.
    #[error("Relation kind '{0}' is not supported")]
    UnknownRelation(String),

    /// A textual relationship descriptor with the wrong number of parts.
    #[error("To make relations, give exactly 3 parts as model:kind:property (got {0})")]
    RelationArity(usize),

    /// Failed to parse a filter expression.
    #[error("Parse error at position {position}: {message}")]
    Parse { position: usize, message: String },

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Execution error: {0}")]
    Execution(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WeftError {
    /// Create a parse error at the given position.
    pub fn parse(position: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

/// Result type alias for Weft operations.
pub type WeftResult<T> = Result<T, WeftError>;
