//! The on-disk checkpoint document schema.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Vertex;

/// Serializable counters, a subset of the engine's live `Stats` (no
/// `start_time`, since resuming restarts the elapsed-time clock).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsSnapshot {
    #[serde(default)]
    pub videos_discovered: u64,
    #[serde(default)]
    pub videos_processed: u64,
    #[serde(default)]
    pub videos_downloaded: u64,
    #[serde(default)]
    pub bytes_downloaded: u64,
    #[serde(default)]
    pub errors: u64,
}

/// The full checkpoint document written by the `Checkpointer`.
///
/// Forward/backward compatible: unknown fields are ignored by serde and
/// every field here defaults on read, so checkpoints from an older or
/// newer build of the crawler still load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointDocument {
    #[serde(default)]
    pub visited: Vec<String>,
    #[serde(default)]
    pub discovered: HashMap<String, Vertex>,
    #[serde(default)]
    pub stats: StatsSnapshot,
    pub timestamp: DateTime<Utc>,
}

impl CheckpointDocument {
    pub fn new(
        visited: Vec<String>,
        discovered: HashMap<String, Vertex>,
        stats: StatsSnapshot,
    ) -> Self {
        Self {
            visited,
            discovered,
            stats,
            timestamp: Utc::now(),
        }
    }
}
