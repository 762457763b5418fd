//! Default [`GraphExpander`]: scrape the watch page for related IDs and
//! shell out to yt-dlp for metadata.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};
use vcrawl_models::{canonical_url, Vertex};

use crate::error::{GraphError, GraphResult};
use crate::expander::GraphExpander;
use crate::extract::extract_related_ids;
use crate::metadata::resolve_metadata;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const DEFAULT_BASE_URL: &str = "https://www.youtube.com";

/// Scrapes `https://www.youtube.com/watch?v=<id>` for the embedded
/// `ytInitialData` blob to discover related-video edges, then resolves
/// title/channel/duration/view-count metadata via yt-dlp.
///
/// A non-2xx response or request-level failure (timeout, DNS, connection
/// reset) is `Transient`; the page loading but containing no recognizable
/// related-video structure still yields `Ok(Vertex)` with an empty edge
/// list, since that's a property of the video, not a fetch failure.
pub struct PageScrapeExpander {
    client: Client,
    related_id_cap: usize,
    base_url: String,
}

impl PageScrapeExpander {
    pub fn new(related_id_cap: usize) -> GraphResult<Self> {
        let client = Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .timeout(DEFAULT_REQUEST_TIMEOUT)
            .build()
            .map_err(|err| GraphError::permanent("<client>", err.to_string()))?;
        Ok(Self {
            client,
            related_id_cap,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    pub fn with_client(client: Client, related_id_cap: usize) -> Self {
        Self {
            client,
            related_id_cap,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the watch-page base URL (used by tests to point at a mock
    /// server instead of youtube.com).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl GraphExpander for PageScrapeExpander {
    async fn expand(&self, id: &str) -> GraphResult<Vertex> {
        let url = if self.base_url == DEFAULT_BASE_URL {
            canonical_url(id)
        } else {
            format!("{}/watch?v={}", self.base_url, id)
        };

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| GraphError::transient(id, format!("request failed: {err}")))?;

        if response.status().is_server_error() || response.status() == 429 {
            return Err(GraphError::transient(
                id,
                format!("server returned {}", response.status()),
            ));
        }
        if !response.status().is_success() {
            return Err(GraphError::permanent(
                id,
                format!("server returned {}", response.status()),
            ));
        }

        let html = response
            .text()
            .await
            .map_err(|err| GraphError::transient(id, format!("failed reading body: {err}")))?;

        let related_ids = extract_related_ids(&html, id, self.related_id_cap);
        if related_ids.is_empty() {
            debug!(video_id = id, "no related ids found on watch page");
        }

        let metadata = resolve_metadata(&url).await;
        if metadata.title.is_none() {
            warn!(video_id = id, "proceeding with partial metadata");
        }

        Ok(Vertex::new(id.to_string(), related_ids).with_metadata(
            metadata.title,
            metadata.channel,
            metadata.duration_seconds,
            metadata.view_count,
        ))
    }
}
