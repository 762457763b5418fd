//! The crawl engine lifecycle and worker state machine.

use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tokio::sync::watch;
use tracing::{error, info, warn};

use vcrawl_graph::GraphExpander;
use vcrawl_models::CrawlConfig;
use vcrawl_sink::DownloadSink;
use vcrawl_store::{Checkpointer, Frontier, PopResult, StoreError, VertexStore};

use crate::error::{EngineError, EngineResult};
use crate::logging::CrawlLogger;
use crate::rate_gate::RateGate;
use crate::scheduler::Scheduler;
use crate::seed_source::SeedSource;
use crate::stats::{Stats, StatsReport};

/// Owns the full crawl lifecycle: checkpoint restore, worker pool
/// spawn/join, and final checkpoint.
pub struct CrawlEngine {
    config: CrawlConfig,
    store: VertexStore,
    frontier: Frontier,
    stats: Stats,
    checkpointer: Option<Checkpointer>,
    expander: Arc<dyn GraphExpander>,
    sink: Arc<dyn DownloadSink>,
    stop_tx: watch::Sender<bool>,
}

impl CrawlEngine {
    pub fn new(
        config: CrawlConfig,
        expander: Arc<dyn GraphExpander>,
        sink: Arc<dyn DownloadSink>,
    ) -> EngineResult<Self> {
        if config.num_workers == 0 {
            return Err(EngineError::configuration("num_workers must be at least 1"));
        }

        let checkpointer = config
            .checkpoint_file
            .as_ref()
            .map(|path| Checkpointer::new(path.clone()));

        let (stop_tx, _) = watch::channel(false);

        Ok(Self {
            config,
            store: VertexStore::new(),
            frontier: Frontier::new(),
            stats: Stats::new(),
            checkpointer,
            expander,
            sink,
            stop_tx,
        })
    }

    /// Seed-management handle, used before `run()` to enqueue starting
    /// points.
    pub fn seeds(&self) -> SeedSource<'_> {
        SeedSource::new(&self.store, &self.frontier)
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// A consistent snapshot of every recorded vertex, for export.
    pub fn snapshot_discovered(&self) -> std::collections::HashMap<String, vcrawl_models::Vertex> {
        self.store.snapshot().discovered
    }

    /// Signals every worker to exit at its next `WAITING_FOR_WORK`
    /// transition.
    pub fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }

    /// Restore from checkpoint, verify non-empty frontier, spawn workers,
    /// join, write a final checkpoint, and return the stats snapshot.
    pub async fn run(self: Arc<Self>) -> EngineResult<StatsReport> {
        self.restore_checkpoint().await;

        if self.frontier.is_empty() && self.store.size_discovered() == 0 {
            warn!("frontier empty at startup, nothing to crawl");
            return Ok(self.stats.report());
        }

        let mut handles = Vec::with_capacity(self.config.num_workers);
        for worker_id in 0..self.config.num_workers {
            let engine = Arc::clone(&self);
            let mut stop_rx = self.stop_tx.subscribe();
            handles.push(tokio::spawn(async move {
                engine.worker_loop(worker_id, &mut stop_rx).await
            }));
        }

        let mut first_err = None;
        for handle in handles {
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    if first_err.is_none() {
                        first_err = Some(err);
                    }
                }
                Err(join_err) => {
                    error!(error = %join_err, "worker task panicked");
                }
            }
        }

        self.save_checkpoint().await;

        if let Some(err) = first_err {
            error!(error = %err, "crawl aborted");
            return Err(err);
        }

        info!("crawl finished");
        Ok(self.stats.report())
    }

    async fn restore_checkpoint(&self) {
        let Some(checkpointer) = &self.checkpointer else {
            return;
        };
        if let Some(document) = checkpointer.load().await {
            self.store.restore_from_checkpoint(&document);
            self.stats.restore_from_snapshot(&document.stats);
            info!(
                visited = document.visited.len(),
                discovered = document.discovered.len(),
                "restored checkpoint"
            );
        }
    }

    async fn save_checkpoint(&self) {
        let Some(checkpointer) = &self.checkpointer else {
            return;
        };
        let document = self.store.to_checkpoint_document(self.stats.to_snapshot());
        if let Err(err) = checkpointer.save(&document).await {
            warn!(error = %err, "failed to save checkpoint");
        }
    }

    async fn worker_loop(
        &self,
        worker_id: usize,
        stop_rx: &mut watch::Receiver<bool>,
    ) -> EngineResult<()> {
        let logger = CrawlLogger::new(worker_id);
        let rate_gate = RateGate::new(self.config.rate_limit_per_worker);
        let scheduler = Scheduler::new(self.config.random_walk_prob, self.config.max_depth);
        let mut rng = SmallRng::from_entropy();

        loop {
            if *stop_rx.borrow() {
                logger.log_stop_signal_exit();
                return Ok(());
            }
            if self.store.size_discovered() >= self.config.max_videos {
                logger.log_cap_exit();
                return Ok(());
            }

            let item = match self.frontier.pop(self.config.frontier_pop_timeout()).await {
                PopResult::Item(item) => item,
                PopResult::TimedOut => {
                    tokio::time::sleep(self.config.quiesce_recheck_delay()).await;
                    if self.frontier.is_empty() {
                        logger.log_quiescence_exit();
                        return Ok(());
                    }
                    continue;
                }
            };

            // CLAIM
            if item.depth > self.config.max_depth {
                logger.log_depth_exceeded(&item.id, item.depth);
                continue;
            }
            if !self.store.try_claim(&item.id) {
                logger.log_duplicate(&item.id);
                continue;
            }
            logger.log_claim(&item.id, item.depth);

            // PACE
            rate_gate.wait().await;

            // EXPAND
            let vertex = match self.expander.expand(&item.id).await {
                Ok(vertex) => vertex,
                Err(err) => {
                    logger.log_expand_error(&item.id, &err.to_string());
                    self.stats.incr_errors();
                    continue;
                }
            };

            // RECORD
            let vertex = vertex.with_position(item.depth, item.parent_id.clone());
            let related_count = vertex.related_ids.len();
            match self.store.record(vertex.clone(), self.config.max_videos) {
                Ok(()) => {}
                Err(StoreError::CapExceeded(_)) => {
                    logger.log_cap_exit();
                    return Ok(());
                }
                Err(err) => {
                    error!(video_id = %item.id, error = %err, "record invariant violated, aborting crawl");
                    let _ = self.stop_tx.send(true);
                    return Err(EngineError::invariant(err.to_string()));
                }
            }
            self.stats.incr_discovered();
            self.stats.incr_processed();
            logger.log_recorded(&item.id, related_count);

            if self.config.download {
                let outcome = self.sink.acquire(&vertex).await;
                if let Some(error) = &outcome.error {
                    logger.log_download_error(&item.id, error);
                    self.stats.incr_errors();
                } else if outcome.downloaded {
                    self.stats.incr_downloaded(outcome.bytes);
                }
            }

            for child in scheduler.select_edges(&vertex, &mut rng) {
                self.frontier.push(child);
            }

            if self
                .config
                .checkpoint_interval_reached(self.stats.processed())
            {
                self.save_checkpoint().await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vcrawl_graph::StubExpander;
    use vcrawl_sink::NoopDownloadSink;

    fn small_config() -> CrawlConfig {
        CrawlConfig {
            max_videos: 20,
            max_depth: 5,
            num_workers: 2,
            download: false,
            checkpoint_file: None,
            rate_limit_per_worker: 1000.0,
            ..CrawlConfig::default()
        }
    }

    #[tokio::test]
    async fn engine_rejects_zero_workers() {
        let config = CrawlConfig {
            num_workers: 0,
            ..CrawlConfig::default()
        };
        let expander = Arc::new(StubExpander::new());
        let sink = Arc::new(NoopDownloadSink);
        let result = CrawlEngine::new(config, expander, sink);
        assert!(matches!(result, Err(EngineError::Configuration(_))));
    }

    #[tokio::test]
    async fn crawl_discovers_reachable_graph_and_terminates() {
        let expander = Arc::new(
            StubExpander::new()
                .with_edges("A", vec!["B", "C"])
                .with_edges("B", vec!["D"])
                .with_edges("C", vec!["D"])
                .with_edges("D", vec![]),
        );
        let sink = Arc::new(NoopDownloadSink);
        let engine = Arc::new(CrawlEngine::new(small_config(), expander, sink).unwrap());
        engine.store.try_claim("A");
        engine.frontier.push(vcrawl_models::WorkItem::seed("A"));

        let report = Arc::clone(&engine).run().await.unwrap();
        assert!(report.videos_processed >= 1);
    }

    #[tokio::test]
    async fn engine_stops_at_max_videos_cap() {
        let names: Vec<String> = (0..31).map(|i| format!("v{i}")).collect();
        let mut chain_expander = StubExpander::new();
        for i in 0..30 {
            chain_expander = chain_expander.with_edges(names[i].clone(), vec![names[i + 1].as_str()]);
        }
        let expander = Arc::new(chain_expander);
        let sink = Arc::new(NoopDownloadSink);
        let config = CrawlConfig {
            max_videos: 5,
            num_workers: 1,
            rate_limit_per_worker: 1000.0,
            random_walk_prob: 0.0,
            ..CrawlConfig::default()
        };
        let engine = Arc::new(CrawlEngine::new(config, expander, sink).unwrap());
        engine.store.try_claim("v0");
        engine.frontier.push(vcrawl_models::WorkItem::seed("v0"));

        let report = Arc::clone(&engine).run().await.unwrap();
        assert_eq!(report.videos_processed, 5);
    }

    #[tokio::test]
    async fn engine_aborts_run_on_broken_claim_invariant() {
        let expander = Arc::new(StubExpander::new().with_edges("A", vec![]));
        let sink = Arc::new(NoopDownloadSink);
        let engine = Arc::new(CrawlEngine::new(small_config(), expander, sink).unwrap());

        // Bypass `try_claim` to simulate the invariant it's supposed to
        // prevent: the same ID reaching RECORD twice.
        engine
            .store
            .record(vcrawl_models::Vertex::new("A", vec![]), usize::MAX)
            .unwrap();
        engine.frontier.push(vcrawl_models::WorkItem::seed("A"));

        let result = Arc::clone(&engine).run().await;
        assert!(matches!(result, Err(EngineError::Invariant(_))));
    }
}
