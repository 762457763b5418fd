//! Store error types.

use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// `record()` called twice for the same ID. The engine treats this as
    /// a programming-invariant violation, not a retryable condition.
    #[error("vertex {0} was already recorded")]
    AlreadyRecorded(String),

    /// `record()` would push `discovered` past `max_videos`. Not an
    /// invariant violation — the worker that hits this simply stops,
    /// the same as the coarser cap check at the top of the loop.
    #[error("recording {0} would exceed the configured video cap")]
    CapExceeded(String),

    #[error("checkpoint write failed: {0}")]
    CheckpointWrite(#[source] std::io::Error),

    #[error("checkpoint read failed: {0}")]
    CheckpointRead(#[source] std::io::Error),

    #[error("checkpoint document malformed: {0}")]
    CheckpointDecode(#[from] serde_json::Error),
}
