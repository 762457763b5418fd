//! Atomic crawl counters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use vcrawl_models::StatsSnapshot;

/// Lock-free counters readable concurrently without coordination; every
/// write is a single atomic add. `start_time` is process-local (an
/// `Instant`) and deliberately excluded from [`StatsSnapshot`] — resuming
/// from a checkpoint restarts the elapsed-time clock rather than trying to
/// reconstruct wall-clock history.
#[derive(Debug)]
pub struct Stats {
    videos_discovered: AtomicU64,
    videos_processed: AtomicU64,
    videos_downloaded: AtomicU64,
    bytes_downloaded: AtomicU64,
    errors: AtomicU64,
    start_time: Instant,
}

/// A point-in-time read of every counter plus derived rates.
#[derive(Debug, Clone, Copy)]
pub struct StatsReport {
    pub videos_discovered: u64,
    pub videos_processed: u64,
    pub videos_downloaded: u64,
    pub bytes_downloaded: u64,
    pub errors: u64,
    pub elapsed_seconds: f64,
    pub videos_per_second: f64,
}

impl Stats {
    pub fn new() -> Self {
        Self {
            videos_discovered: AtomicU64::new(0),
            videos_processed: AtomicU64::new(0),
            videos_downloaded: AtomicU64::new(0),
            bytes_downloaded: AtomicU64::new(0),
            errors: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn incr_discovered(&self) {
        self.videos_discovered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn incr_processed(&self) {
        self.videos_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn incr_downloaded(&self, bytes: u64) {
        self.videos_downloaded.fetch_add(1, Ordering::Relaxed);
        self.bytes_downloaded.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn incr_errors(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn processed(&self) -> u64 {
        self.videos_processed.load(Ordering::Relaxed)
    }

    pub fn discovered(&self) -> u64 {
        self.videos_discovered.load(Ordering::Relaxed)
    }

    pub fn report(&self) -> StatsReport {
        let elapsed_seconds = self.start_time.elapsed().as_secs_f64();
        let processed = self.videos_processed.load(Ordering::Relaxed);
        let videos_per_second = if elapsed_seconds > 0.0 {
            processed as f64 / elapsed_seconds
        } else {
            0.0
        };
        StatsReport {
            videos_discovered: self.videos_discovered.load(Ordering::Relaxed),
            videos_processed: processed,
            videos_downloaded: self.videos_downloaded.load(Ordering::Relaxed),
            bytes_downloaded: self.bytes_downloaded.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            elapsed_seconds,
            videos_per_second,
        }
    }

    /// The serializable subset written to checkpoints.
    pub fn to_snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            videos_discovered: self.videos_discovered.load(Ordering::Relaxed),
            videos_processed: self.videos_processed.load(Ordering::Relaxed),
            videos_downloaded: self.videos_downloaded.load(Ordering::Relaxed),
            bytes_downloaded: self.bytes_downloaded.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }

    pub fn restore_from_snapshot(&self, snapshot: &StatsSnapshot) {
        self.videos_discovered
            .store(snapshot.videos_discovered, Ordering::Relaxed);
        self.videos_processed
            .store(snapshot.videos_processed, Ordering::Relaxed);
        self.videos_downloaded
            .store(snapshot.videos_downloaded, Ordering::Relaxed);
        self.bytes_downloaded
            .store(snapshot.bytes_downloaded, Ordering::Relaxed);
        self.errors.store(snapshot.errors, Ordering::Relaxed);
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate_across_increments() {
        let stats = Stats::new();
        stats.incr_discovered();
        stats.incr_discovered();
        stats.incr_processed();
        stats.incr_downloaded(1024);
        stats.incr_errors();

        let report = stats.report();
        assert_eq!(report.videos_discovered, 2);
        assert_eq!(report.videos_processed, 1);
        assert_eq!(report.videos_downloaded, 1);
        assert_eq!(report.bytes_downloaded, 1024);
        assert_eq!(report.errors, 1);
    }

    #[test]
    fn snapshot_round_trips_through_restore() {
        let stats = Stats::new();
        stats.incr_discovered();
        stats.incr_processed();
        let snapshot = stats.to_snapshot();

        let fresh = Stats::new();
        fresh.restore_from_snapshot(&snapshot);
        assert_eq!(fresh.discovered(), 1);
        assert_eq!(fresh.processed(), 1);
    }
}
