//! The crawl's core record type: a single discovered video.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::youtube::canonical_url;

/// An immutable record of a discovered video.
///
/// Constructed once by the worker that expanded `id` and never mutated
/// afterward; `depth`/`parent_id` are filled in from the claiming
/// [`crate::WorkItem`] before the vertex is handed to the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vertex {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub duration_seconds: Option<u64>,
    #[serde(default)]
    pub view_count: Option<u64>,
    /// Outgoing edges at the moment of expansion, first-appearance order,
    /// capped at the configured `related_id_cap`. Self-ID never included.
    #[serde(default)]
    pub related_ids: Vec<String>,
    pub discovered_at: DateTime<Utc>,
    pub depth: u32,
    #[serde(default)]
    pub parent_id: Option<String>,
}

impl Vertex {
    /// Build a vertex from expander output; `depth`/`parent_id` are set
    /// separately once the claiming work item is known.
    pub fn new(id: impl Into<String>, related_ids: Vec<String>) -> Self {
        let id = id.into();
        Self {
            url: canonical_url(&id),
            id,
            title: None,
            channel: None,
            duration_seconds: None,
            view_count: None,
            related_ids,
            discovered_at: Utc::now(),
            depth: 0,
            parent_id: None,
        }
    }

    pub fn with_metadata(
        mut self,
        title: Option<String>,
        channel: Option<String>,
        duration_seconds: Option<u64>,
        view_count: Option<u64>,
    ) -> Self {
        self.title = title;
        self.channel = channel;
        self.duration_seconds = duration_seconds;
        self.view_count = view_count;
        self
    }

    pub fn with_position(mut self, depth: u32, parent_id: Option<String>) -> Self {
        self.depth = depth;
        self.parent_id = parent_id;
        self
    }
}
