//! Structured per-worker logging, grounded on
//! `vclip-worker/src/logging.rs`'s `JobLogger`.

use tracing::{debug, error, info, warn};

/// Attaches a consistent `worker_id` field to every log line emitted by a
/// single crawl worker, so a reader can `grep worker_id=3` across an
/// interleaved multi-worker log stream.
#[derive(Debug, Clone)]
pub struct CrawlLogger {
    worker_id: usize,
}

impl CrawlLogger {
    pub fn new(worker_id: usize) -> Self {
        Self { worker_id }
    }

    pub fn log_claim(&self, video_id: &str, depth: u32) {
        debug!(worker_id = self.worker_id, video_id, depth, "claimed vertex");
    }

    pub fn log_duplicate(&self, video_id: &str) {
        debug!(worker_id = self.worker_id, video_id, "skipped duplicate");
    }

    pub fn log_depth_exceeded(&self, video_id: &str, depth: u32) {
        debug!(
            worker_id = self.worker_id,
            video_id, depth, "dropped item exceeding max_depth"
        );
    }

    pub fn log_recorded(&self, video_id: &str, edges: usize) {
        info!(
            worker_id = self.worker_id,
            video_id, edges, "recorded vertex"
        );
    }

    pub fn log_expand_error(&self, video_id: &str, message: &str) {
        warn!(
            worker_id = self.worker_id,
            video_id, error = message, "expansion failed"
        );
    }

    pub fn log_download_error(&self, video_id: &str, message: &str) {
        warn!(
            worker_id = self.worker_id,
            video_id, error = message, "download failed"
        );
    }

    pub fn log_quiescence_exit(&self) {
        info!(worker_id = self.worker_id, "exiting: frontier quiesced");
    }

    pub fn log_cap_exit(&self) {
        info!(worker_id = self.worker_id, "exiting: max_videos reached");
    }

    pub fn log_stop_signal_exit(&self) {
        info!(worker_id = self.worker_id, "exiting: stop signal received");
    }

    pub fn log_checkpoint_error(&self, message: &str) {
        error!(worker_id = self.worker_id, error = message, "checkpoint save failed");
    }
}
