//! The `DownloadSink` trait.

use async_trait::async_trait;
use vcrawl_models::Vertex;

/// Outcome of a single `acquire` call, used only to update stats counters
/// — the engine never branches on it beyond that (acquisition is
/// best-effort and never affects discovery state or checkpointing).
#[derive(Debug, Clone, Default)]
pub struct DownloadOutcome {
    pub downloaded: bool,
    pub bytes: u64,
    pub error: Option<String>,
}

impl DownloadOutcome {
    pub fn success(bytes: u64) -> Self {
        Self {
            downloaded: true,
            bytes,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            downloaded: false,
            bytes: 0,
            error: Some(message.into()),
        }
    }

    pub fn skipped() -> Self {
        Self::default()
    }
}

/// Invoked at most once per discovered vertex when download mode is
/// enabled. Implementations are free to write locally, upload to remote
/// object storage, or no-op; the engine treats every outcome as
/// best-effort.
#[async_trait]
pub trait DownloadSink: Send + Sync {
    async fn acquire(&self, vertex: &Vertex) -> DownloadOutcome;
}
