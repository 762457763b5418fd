//! The pluggable vertex-resolution interface.

use async_trait::async_trait;
use vcrawl_models::Vertex;

use crate::error::GraphResult;

/// Resolves a claimed video ID to its metadata and outgoing related-video
/// edges. The crawl engine is independent of the extraction technique:
/// implementations may scrape the watch page, call an internal API, shell
/// out to a metadata resolver, or (in tests) look up a fixed adjacency map.
///
/// A `GraphError::Transient`/`Permanent` return means the caller does not
/// record a vertex for this ID; everything else should be
/// returned as `Ok(Vertex)`, even with metadata fields left `None`
/// (`PartialMetadata` is not an error).
#[async_trait]
pub trait GraphExpander: Send + Sync {
    async fn expand(&self, id: &str) -> GraphResult<Vertex>;
}
