//! Engine error types.

use thiserror::Error;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A worker observed a broken claim-before-record invariant (the same
    /// vertex recorded twice). `try_claim` is supposed to make this
    /// unreachable; if it happens anyway the run aborts rather than
    /// silently producing a store that violated its own contract.
    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl EngineError {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant(msg.into())
    }
}
