//! Graph expander error types.

use thiserror::Error;

pub type GraphResult<T> = Result<T, GraphError>;

/// Errors surfaced by a [`crate::GraphExpander`]. The engine treats
/// both as non-fatal (increments `errors`, does not record a vertex).
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("transient failure expanding {id}: {message}")]
    Transient { id: String, message: String },

    #[error("permanent failure expanding {id}: {message}")]
    Permanent { id: String, message: String },
}

impl GraphError {
    pub fn transient(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transient {
            id: id.into(),
            message: message.into(),
        }
    }

    pub fn permanent(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Permanent {
            id: id.into(),
            message: message.into(),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            GraphError::Transient { id, .. } | GraphError::Permanent { id, .. } => id,
        }
    }
}
