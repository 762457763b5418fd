//! Optional download/upload collaborator invoked at most once per
//! discovered vertex.

pub mod error;
pub mod local;
pub mod noop;
pub mod r2;
pub mod sink;

pub use error::{SinkError, SinkResult};
pub use local::LocalDownloadSink;
pub use noop::NoopDownloadSink;
pub use r2::{R2Config, R2UploadSink};
pub use sink::{DownloadOutcome, DownloadSink};
