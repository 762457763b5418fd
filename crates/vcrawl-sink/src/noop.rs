//! No-op sink used when `download = false`.

use async_trait::async_trait;
use vcrawl_models::Vertex;

use crate::sink::{DownloadOutcome, DownloadSink};

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDownloadSink;

#[async_trait]
impl DownloadSink for NoopDownloadSink {
    async fn acquire(&self, _vertex: &Vertex) -> DownloadOutcome {
        DownloadOutcome::skipped()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn always_reports_skipped() {
        let sink = NoopDownloadSink;
        let outcome = sink.acquire(&Vertex::new("A", vec![])).await;
        assert!(!outcome.downloaded);
        assert_eq!(outcome.bytes, 0);
        assert!(outcome.error.is_none());
    }
}
