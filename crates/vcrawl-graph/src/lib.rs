//! Graph expansion: turns a claimed video ID into a [`vcrawl_models::Vertex`]
//! with its outgoing related-video edges.

pub mod error;
pub mod expander;
pub mod extract;
pub mod metadata;
pub mod page_scrape;
pub mod stub;

pub use error::{GraphError, GraphResult};
pub use expander::GraphExpander;
pub use page_scrape::PageScrapeExpander;
pub use stub::StubExpander;
