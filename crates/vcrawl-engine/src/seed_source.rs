//! Seed bootstrapping, grounded on
//! `original_source/python/videoscraper/crawler.py`'s `add_seed`/
//! `add_seeds`/`add_random_seeds`.

use std::process::Stdio;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, info};

use vcrawl_models::{extract_video_id, WorkItem};
use vcrawl_store::{Frontier, VertexStore};

/// Fixed list of popular search queries used to bootstrap a crawl with no
/// explicit seeds, mirroring the original crawler's query list verbatim.
const RANDOM_SEED_QUERIES: &[&str] = &[
    "music video 2024",
    "funny videos",
    "cooking tutorial",
    "tech review",
    "travel vlog",
    "gaming",
    "science documentary",
    "sports highlights",
    "news today",
    "educational",
    "nature documentary",
    "movie trailer",
    "podcast",
    "interview",
    "tutorial",
];

#[derive(Debug, Deserialize)]
struct SearchEntry {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResults {
    #[serde(default)]
    entries: Vec<SearchEntry>,
}

/// Pushes seed work items onto a [`Frontier`], deduplicating against the
/// [`VertexStore`]'s visited set so a seed already claimed (e.g. by a
/// restored checkpoint) is not re-enqueued.
pub struct SeedSource<'a> {
    store: &'a VertexStore,
    frontier: &'a Frontier,
}

impl<'a> SeedSource<'a> {
    pub fn new(store: &'a VertexStore, frontier: &'a Frontier) -> Self {
        Self { store, frontier }
    }

    /// Add a single seed from a YouTube URL. Returns `true` if it was
    /// newly claimed and enqueued.
    pub fn add_seed(&self, url: &str) -> bool {
        let Some(id) = extract_video_id(url) else {
            return false;
        };
        if !self.store.try_claim(&id) {
            return false;
        }
        self.frontier.push(WorkItem::seed(id.clone()));
        info!(video_id = %id, "added seed");
        true
    }

    /// Seed from an already-known video ID, skipping URL extraction.
    /// Useful for callers that already hold resolved IDs (e.g. a resumed
    /// checkpoint's unexplored frontier, or tests driving a fixture
    /// expander whose IDs aren't real YouTube IDs).
    pub fn seed_id(&self, id: &str) -> bool {
        if !self.store.try_claim(id) {
            return false;
        }
        self.frontier.push(WorkItem::seed(id.to_string()));
        true
    }

    /// Add multiple seed URLs; returns the number actually enqueued.
    pub fn add_seeds(&self, urls: &[String]) -> usize {
        let count = urls.iter().filter(|url| self.add_seed(url)).count();
        info!(count, "added seeds");
        count
    }

    /// Bootstrap from a fixed list of search queries resolved through
    /// yt-dlp's search extractor (`ytsearchN:<query>`), shuffled so
    /// repeated runs don't always hit the same queries first.
    pub async fn add_random_seeds<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> usize {
        let mut queries: Vec<&str> = RANDOM_SEED_QUERIES.to_vec();
        queries.shuffle(rng);

        let mut added = 0;
        for query in queries {
            if added >= count {
                break;
            }
            for id in search_video_ids(query).await {
                let url = format!("https://youtube.com/watch?v={id}");
                if self.add_seed(&url) {
                    added += 1;
                    if added >= count {
                        break;
                    }
                }
            }
        }
        added
    }
}

async fn search_video_ids(query: &str) -> Vec<String> {
    if which::which("yt-dlp").is_err() {
        return Vec::new();
    }

    let output = Command::new("yt-dlp")
        .args([
            "--quiet",
            "--flat-playlist",
            "--dump-single-json",
            "--playlist-items",
            "1-3",
        ])
        .arg(format!("ytsearch3:{query}"))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await;

    let output = match output {
        Ok(output) => output,
        Err(err) => {
            debug!(query, error = %err, "failed to spawn yt-dlp search");
            return Vec::new();
        }
    };
    if !output.status.success() {
        debug!(query, "yt-dlp search returned non-zero status");
        return Vec::new();
    }

    match serde_json::from_slice::<SearchResults>(&output.stdout) {
        Ok(results) => results.entries.into_iter().filter_map(|e| e.id).collect(),
        Err(err) => {
            debug!(query, error = %err, "failed to parse yt-dlp search output");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn add_seed_extracts_id_and_claims() {
        let store = VertexStore::new();
        let frontier = Frontier::new();
        let source = SeedSource::new(&store, &frontier);

        assert!(source.add_seed("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(store.is_visited("dQw4w9WgXcQ"));
    }

    #[test]
    fn add_seed_rejects_invalid_urls() {
        let store = VertexStore::new();
        let frontier = Frontier::new();
        let source = SeedSource::new(&store, &frontier);
        assert!(!source.add_seed("https://example.com/not-a-video"));
    }

    #[test]
    fn add_seed_is_idempotent_against_already_visited() {
        let store = VertexStore::new();
        let frontier = Frontier::new();
        let source = SeedSource::new(&store, &frontier);
        assert!(source.add_seed("https://youtu.be/dQw4w9WgXcQ"));
        assert!(!source.add_seed("https://youtu.be/dQw4w9WgXcQ"));
    }

    #[test]
    fn add_seeds_counts_only_successful_additions() {
        let store = VertexStore::new();
        let frontier = Frontier::new();
        let source = SeedSource::new(&store, &frontier);
        let urls = vec![
            "https://youtu.be/dQw4w9WgXcQ".to_string(),
            "https://example.com/nope".to_string(),
            "https://youtu.be/aaaaaaaaaaa".to_string(),
        ];
        assert_eq!(source.add_seeds(&urls), 2);
    }

    #[tokio::test]
    async fn add_random_seeds_returns_zero_without_yt_dlp_available() {
        let store = VertexStore::new();
        let frontier = Frontier::new();
        let source = SeedSource::new(&store, &frontier);
        let mut rng = SmallRng::seed_from_u64(1);

        // In this sandboxed test environment yt-dlp is not expected to be
        // resolvable on PATH, so this should gracefully add nothing rather
        // than error.
        if which::which("yt-dlp").is_err() {
            assert_eq!(source.add_random_seeds(5, &mut rng).await, 0);
        }
    }
}
