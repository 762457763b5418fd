//! Shared data model for the vcrawl related-video graph crawler.
//!
//! This crate provides:
//! - The `Vertex`/`WorkItem` record types
//! - YouTube URL/ID parsing
//! - Crawl configuration
//! - The checkpoint document schema

pub mod checkpoint;
pub mod config;
pub mod vertex;
pub mod work_item;
pub mod youtube;

pub use checkpoint::{CheckpointDocument, StatsSnapshot};
pub use config::CrawlConfig;
pub use vertex::Vertex;
pub use work_item::WorkItem;
pub use youtube::{canonical_url, extract_video_id, is_valid_video_id};
