//! Storage layer for the crawl engine: the claim/record table, the work
//! queue, and checkpoint persistence.

pub mod checkpoint;
pub mod error;
pub mod fs_utils;
pub mod frontier;
pub mod vertex_store;

pub use checkpoint::Checkpointer;
pub use error::{StoreError, StoreResult};
pub use frontier::{Frontier, PopResult};
pub use vertex_store::{StoreSnapshot, VertexStore};
