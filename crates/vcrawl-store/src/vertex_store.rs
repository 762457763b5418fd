//! The thread-safe facade over `visited`/`discovered`.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, RwLock};

use vcrawl_models::{CheckpointDocument, StatsSnapshot, Vertex};

use crate::error::{StoreError, StoreResult};

/// A consistent point-in-time view of the store, suitable for
/// checkpointing. Produced by [`VertexStore::snapshot`].
pub struct StoreSnapshot {
    pub visited: Vec<String>,
    pub discovered: HashMap<String, Vertex>,
}

/// Holds every video ID the engine has claimed (`visited`) and every
/// vertex that has been fully recorded (`discovered`). Two locks rather
/// than one: `try_claim` is on the hot path of every worker iteration and
/// must not block on the (larger, less frequently touched) discovered map.
#[derive(Default)]
pub struct VertexStore {
    visited: Mutex<HashSet<String>>,
    discovered: RwLock<HashMap<String, Vertex>>,
}

impl VertexStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically inserts `id` into `visited` if absent. Returns `true`
    /// iff the caller now owns expansion of this vertex — the sole
    /// contention point the claim-before-record invariant depends on.
    pub fn try_claim(&self, id: &str) -> bool {
        let mut visited = self.visited.lock().expect("visited mutex poisoned");
        visited.insert(id.to_string())
    }

    /// Record a fully-expanded vertex. Must be called at most once per ID,
    /// and only by the worker that `try_claim`-ed it. `max_videos` is
    /// enforced here, under the same write-lock acquisition that performs
    /// the insert, so concurrent workers can never push `discovered` past
    /// the cap no matter how many of them pass the coarser check at the
    /// top of the worker loop at once.
    pub fn record(&self, vertex: Vertex, max_videos: usize) -> StoreResult<()> {
        let mut discovered = self.discovered.write().expect("discovered lock poisoned");
        if discovered.contains_key(&vertex.id) {
            return Err(StoreError::AlreadyRecorded(vertex.id));
        }
        if discovered.len() >= max_videos {
            return Err(StoreError::CapExceeded(vertex.id));
        }
        discovered.insert(vertex.id.clone(), vertex);
        Ok(())
    }

    pub fn size_discovered(&self) -> usize {
        self.discovered
            .read()
            .expect("discovered lock poisoned")
            .len()
    }

    pub fn is_visited(&self, id: &str) -> bool {
        self.visited.lock().expect("visited mutex poisoned").contains(id)
    }

    /// A consistent snapshot of both tables, for checkpointing. Not
    /// linearized against concurrent `try_claim`/`record` calls beyond
    /// each lock's own acquisition — acceptable since checkpoints are a
    /// best-effort periodic artifact, not a consistency boundary.
    pub fn snapshot(&self) -> StoreSnapshot {
        let visited = self
            .visited
            .lock()
            .expect("visited mutex poisoned")
            .iter()
            .cloned()
            .collect();
        let discovered = self
            .discovered
            .read()
            .expect("discovered lock poisoned")
            .clone();
        StoreSnapshot { visited, discovered }
    }

    /// Replace current contents wholesale. Only valid before the engine
    /// starts spawning workers.
    pub fn restore(&self, visited: Vec<String>, discovered: HashMap<String, Vertex>) {
        *self.visited.lock().expect("visited mutex poisoned") = visited.into_iter().collect();
        *self.discovered.write().expect("discovered lock poisoned") = discovered;
    }

    pub fn restore_from_checkpoint(&self, doc: &CheckpointDocument) {
        self.restore(doc.visited.clone(), doc.discovered.clone());
    }

    pub fn to_checkpoint_document(&self, stats: StatsSnapshot) -> CheckpointDocument {
        let snapshot = self.snapshot();
        CheckpointDocument::new(snapshot.visited, snapshot.discovered, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_claim_is_true_only_once() {
        let store = VertexStore::new();
        assert!(store.try_claim("A"));
        assert!(!store.try_claim("A"));
        assert!(store.try_claim("B"));
    }

    #[test]
    fn record_twice_fails_with_already_recorded() {
        let store = VertexStore::new();
        store.record(Vertex::new("A", vec![]), usize::MAX).unwrap();
        let err = store.record(Vertex::new("A", vec![]), usize::MAX).unwrap_err();
        assert!(matches!(err, StoreError::AlreadyRecorded(id) if id == "A"));
    }

    #[test]
    fn record_rejects_inserts_past_the_cap() {
        let store = VertexStore::new();
        store.record(Vertex::new("A", vec![]), 1).unwrap();
        let err = store.record(Vertex::new("B", vec![]), 1).unwrap_err();
        assert!(matches!(err, StoreError::CapExceeded(id) if id == "B"));
        assert_eq!(store.size_discovered(), 1);
    }

    #[test]
    fn size_discovered_tracks_successful_records() {
        let store = VertexStore::new();
        assert_eq!(store.size_discovered(), 0);
        store.record(Vertex::new("A", vec![]), usize::MAX).unwrap();
        store.record(Vertex::new("B", vec![]), usize::MAX).unwrap();
        assert_eq!(store.size_discovered(), 2);
    }

    #[test]
    fn snapshot_and_restore_round_trip() {
        let store = VertexStore::new();
        store.try_claim("A");
        store.try_claim("B");
        store
            .record(Vertex::new("A", vec!["B".to_string()]), usize::MAX)
            .unwrap();

        let snapshot = store.snapshot();
        assert_eq!(snapshot.visited.len(), 2);
        assert_eq!(snapshot.discovered.len(), 1);

        let fresh = VertexStore::new();
        fresh.restore(snapshot.visited, snapshot.discovered);
        assert!(fresh.is_visited("A"));
        assert!(fresh.is_visited("B"));
        assert_eq!(fresh.size_discovered(), 1);
    }

    #[test]
    fn concurrent_try_claim_admits_exactly_one_winner() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(VertexStore::new());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.try_claim("contended"))
            })
            .collect();

        let wins = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&won| won)
            .count();
        assert_eq!(wins, 1);
    }
}
