//! The `vcrawl` binary: wires config, the crawl engine, and export
//! together, grounded on `vclip-worker/src/main.rs`'s startup sequence.

mod export;

use std::path::PathBuf;
use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vcrawl_engine::CrawlEngine;
use vcrawl_graph::PageScrapeExpander;
use vcrawl_models::CrawlConfig;
use vcrawl_sink::{DownloadSink, LocalDownloadSink, NoopDownloadSink, R2Config, R2UploadSink};

use crate::export::ExportFormat;

#[tokio::main]
async fn main() {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("failed to install rustls crypto provider");

    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(EnvFilter::from_default_env().add_directive("vcrawl=info".parse().unwrap()))
        .init();

    info!("starting vcrawl");

    let config = CrawlConfig::from_env();
    info!(?config, "crawl config");

    let expander = match PageScrapeExpander::new(config.related_id_cap) {
        Ok(expander) => Arc::new(expander),
        Err(err) => {
            error!(error = %err, "failed to build page-scrape expander");
            std::process::exit(1);
        }
    };

    let sink: Arc<dyn DownloadSink> = if !config.download {
        Arc::new(NoopDownloadSink)
    } else if let Some(r2_config) = R2Config::from_env() {
        Arc::new(R2UploadSink::new(r2_config, PathBuf::from(&config.output_dir)))
    } else {
        Arc::new(LocalDownloadSink::new(&config.output_dir))
    };

    let engine = match CrawlEngine::new(config.clone(), expander, sink) {
        Ok(engine) => Arc::new(engine),
        Err(err) => {
            error!(error = %err, "failed to construct crawl engine");
            std::process::exit(1);
        }
    };

    seed_from_env(&engine).await;

    let shutdown_handle = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move {
            tokio::signal::ctrl_c().await.ok();
            info!("received shutdown signal");
            engine.stop();
        })
    };

    let report = match Arc::clone(&engine).run().await {
        Ok(report) => report,
        Err(err) => {
            error!(error = %err, "crawl engine error");
            std::process::exit(1);
        }
    };

    shutdown_handle.abort();

    info!(
        videos_discovered = report.videos_discovered,
        videos_processed = report.videos_processed,
        videos_downloaded = report.videos_downloaded,
        errors = report.errors,
        elapsed_seconds = report.elapsed_seconds,
        videos_per_second = report.videos_per_second,
        "crawl complete"
    );

    export_if_configured(&engine);
}

async fn seed_from_env(engine: &CrawlEngine) {
    let seeds = engine.seeds();

    if let Ok(raw) = std::env::var("CRAWL_SEED_URLS") {
        let urls: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        let added = seeds.add_seeds(&urls);
        info!(added, "seeded from CRAWL_SEED_URLS");
    }

    if let Some(count) = std::env::var("CRAWL_RANDOM_SEEDS")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
    {
        let mut rng = SmallRng::from_entropy();
        let added = seeds.add_random_seeds(count, &mut rng).await;
        info!(added, "seeded from random search queries");
    }
}

fn export_if_configured(engine: &CrawlEngine) {
    let Ok(path) = std::env::var("CRAWL_EXPORT_PATH") else {
        return;
    };
    let path = PathBuf::from(path);
    let format = std::env::var("CRAWL_EXPORT_FORMAT")
        .ok()
        .and_then(|f| match f.as_str() {
            "json" => Some(ExportFormat::Json),
            "jsonl" => Some(ExportFormat::Jsonl),
            "csv" => Some(ExportFormat::Csv),
            _ => None,
        })
        .unwrap_or_else(|| ExportFormat::from_path(&path));

    let snapshot = engine.stats().report();
    let discovered = engine_discovered(engine);
    match export::export(&discovered, &path, format) {
        Ok(()) => info!(
            path = %path.display(),
            videos = discovered.len(),
            processed = snapshot.videos_processed,
            "exported discovered videos"
        ),
        Err(err) => error!(error = %err, "export failed"),
    }
}

fn engine_discovered(engine: &CrawlEngine) -> std::collections::HashMap<String, vcrawl_models::Vertex> {
    engine.snapshot_discovered()
}
