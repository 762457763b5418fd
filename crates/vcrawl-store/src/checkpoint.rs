//! Periodic and shutdown-time persistence of crawl state.

use std::path::{Path, PathBuf};

use tracing::warn;
use vcrawl_models::CheckpointDocument;

use crate::error::{StoreError, StoreResult};
use crate::fs_utils::move_file;

/// Writes/reads [`CheckpointDocument`]s to a single configured path,
/// atomically (write-to-temp then rename) so a reader never observes a
/// partial file.
pub struct Checkpointer {
    path: PathBuf,
}

impl Checkpointer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn save(&self, document: &CheckpointDocument) -> StoreResult<()> {
        let body = serde_json::to_vec_pretty(document)?;
        let tmp_path = self.path.with_extension("tmp");

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(StoreError::CheckpointWrite)?;
            }
        }

        tokio::fs::write(&tmp_path, body)
            .await
            .map_err(StoreError::CheckpointWrite)?;
        move_file(&tmp_path, &self.path).await?;
        Ok(())
    }

    /// Load a checkpoint if one exists at the configured path. A missing
    /// file is not an error (first run); a malformed file logs a warning
    /// and returns `None` so the engine starts fresh rather than failing.
    pub async fn load(&self) -> Option<CheckpointDocument> {
        if !self.path.exists() {
            return None;
        }
        let body = match tokio::fs::read(&self.path).await {
            Ok(body) => body,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "failed to read checkpoint, starting fresh");
                return None;
            }
        };
        match serde_json::from_slice::<CheckpointDocument>(&body) {
            Ok(document) => Some(document),
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "failed to decode checkpoint, starting fresh");
                None
            }
        }
    }
}
