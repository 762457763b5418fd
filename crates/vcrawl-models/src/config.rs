//! Crawl configuration.

use std::time::Duration;

/// Tunables for a single crawl run.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Maximum number of unique videos to discover.
    pub max_videos: usize,
    /// Maximum walk depth from any seed.
    pub max_depth: u32,
    /// Number of parallel crawl workers.
    pub num_workers: usize,
    /// Whether to invoke the download sink for each discovered vertex.
    pub download: bool,
    /// Local directory for sink output and checkpoints.
    pub output_dir: String,
    /// Path to the checkpoint file. `None` disables checkpointing.
    pub checkpoint_file: Option<String>,
    /// Processed-vertex interval between checkpoint saves.
    pub checkpoint_interval: u64,
    /// Probability the scheduler samples a small random subset of edges
    /// rather than enqueueing all of them.
    pub random_walk_prob: f64,
    /// Requests per second, per worker, enforced by that worker's `RateGate`.
    pub rate_limit_per_worker: f64,
    /// Cap on the number of related IDs kept per expanded vertex, treated
    /// as a configurable resource guard rather than a platform truth.
    pub related_id_cap: usize,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_videos: 1000,
            max_depth: 50,
            num_workers: 8,
            download: false,
            output_dir: "./crawl_output".to_string(),
            checkpoint_file: None,
            checkpoint_interval: 100,
            random_walk_prob: 0.8,
            rate_limit_per_worker: 1.0,
            related_id_cap: 25,
        }
    }
}

impl CrawlConfig {
    /// Build a config from environment variables, layered over the
    /// defaults above.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_videos: std::env::var("CRAWL_MAX_VIDEOS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_videos),
            max_depth: std::env::var("CRAWL_MAX_DEPTH")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_depth),
            num_workers: std::env::var("CRAWL_NUM_WORKERS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.num_workers),
            download: std::env::var("CRAWL_DOWNLOAD")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.download),
            output_dir: std::env::var("CRAWL_OUTPUT_DIR").unwrap_or(defaults.output_dir),
            checkpoint_file: std::env::var("CRAWL_CHECKPOINT_FILE").ok(),
            checkpoint_interval: std::env::var("CRAWL_CHECKPOINT_INTERVAL")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.checkpoint_interval),
            random_walk_prob: std::env::var("CRAWL_RANDOM_WALK_PROB")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.random_walk_prob),
            rate_limit_per_worker: std::env::var("CRAWL_RATE_LIMIT_PER_WORKER")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.rate_limit_per_worker),
            related_id_cap: std::env::var("CRAWL_RELATED_ID_CAP")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.related_id_cap),
        }
    }

    pub fn checkpoint_interval_reached(&self, videos_processed: u64) -> bool {
        self.checkpoint_interval > 0 && videos_processed % self.checkpoint_interval == 0
    }

    pub fn frontier_pop_timeout(&self) -> Duration {
        Duration::from_secs(5)
    }

    pub fn quiesce_recheck_delay(&self) -> Duration {
        Duration::from_secs(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec_table() {
        let c = CrawlConfig::default();
        assert_eq!(c.max_videos, 1000);
        assert_eq!(c.max_depth, 50);
        assert_eq!(c.num_workers, 8);
        assert!(!c.download);
        assert_eq!(c.checkpoint_interval, 100);
        assert_eq!(c.random_walk_prob, 0.8);
        assert_eq!(c.rate_limit_per_worker, 1.0);
        assert_eq!(c.related_id_cap, 25);
    }

    #[test]
    fn checkpoint_interval_zero_never_triggers() {
        let mut c = CrawlConfig::default();
        c.checkpoint_interval = 0;
        assert!(!c.checkpoint_interval_reached(0));
        assert!(!c.checkpoint_interval_reached(100));
    }
}
