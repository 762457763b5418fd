//! Deterministic test double for [`GraphExpander`].

use std::collections::HashMap;

use async_trait::async_trait;
use vcrawl_models::Vertex;

use crate::error::{GraphError, GraphResult};
use crate::expander::GraphExpander;

/// A fixed adjacency map handed out at construction; `expand` looks the ID
/// up and returns its configured edges, or a configured error. Used by
/// `vcrawl-engine`'s integration tests to drive the crawl deterministically
/// without making network calls.
#[derive(Debug, Default, Clone)]
pub struct StubExpander {
    adjacency: HashMap<String, Vec<String>>,
    failures: HashMap<String, GraphErrorKind>,
}

#[derive(Debug, Clone, Copy)]
enum GraphErrorKind {
    Transient,
    Permanent,
}

impl StubExpander {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_edges(mut self, id: impl Into<String>, related: Vec<&str>) -> Self {
        self.adjacency.insert(
            id.into(),
            related.into_iter().map(str::to_string).collect(),
        );
        self
    }

    pub fn with_transient_failure(mut self, id: impl Into<String>) -> Self {
        self.failures.insert(id.into(), GraphErrorKind::Transient);
        self
    }

    pub fn with_permanent_failure(mut self, id: impl Into<String>) -> Self {
        self.failures.insert(id.into(), GraphErrorKind::Permanent);
        self
    }
}

#[async_trait]
impl GraphExpander for StubExpander {
    async fn expand(&self, id: &str) -> GraphResult<Vertex> {
        if let Some(kind) = self.failures.get(id) {
            return match kind {
                GraphErrorKind::Transient => {
                    Err(GraphError::transient(id, "stubbed transient failure"))
                }
                GraphErrorKind::Permanent => {
                    Err(GraphError::permanent(id, "stubbed permanent failure"))
                }
            };
        }

        let related = self.adjacency.get(id).cloned().unwrap_or_default();
        Ok(Vertex::new(id.to_string(), related).with_metadata(
            Some(format!("stub title for {id}")),
            Some("stub channel".to_string()),
            Some(120),
            Some(1000),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn returns_configured_edges() {
        let expander = StubExpander::new().with_edges("A", vec!["B", "C"]);
        let vertex = expander.expand("A").await.unwrap();
        assert_eq!(vertex.related_ids, vec!["B", "C"]);
    }

    #[tokio::test]
    async fn unconfigured_id_has_no_edges_but_succeeds() {
        let expander = StubExpander::new();
        let vertex = expander.expand("Z").await.unwrap();
        assert!(vertex.related_ids.is_empty());
    }

    #[tokio::test]
    async fn configured_failures_propagate() {
        let expander = StubExpander::new()
            .with_transient_failure("T")
            .with_permanent_failure("P");
        assert!(matches!(
            expander.expand("T").await.unwrap_err(),
            GraphError::Transient { .. }
        ));
        assert!(matches!(
            expander.expand("P").await.unwrap_err(),
            GraphError::Permanent { .. }
        ));
    }
}
