//! Filesystem utilities for cross-device file operations.
//!
//! This module provides utilities for moving files that may be on
//! different filesystems, handling the EXDEV error gracefully.

use std::path::Path;
use tokio::fs;

use crate::error::StoreError;

/// Move a file from `src` to `dst`, handling cross-device moves.
///
/// First attempts a fast rename. If that fails with EXDEV (cross-device
/// link error), falls back to copy-and-delete, copying to a temp file in
/// the destination directory first so the final rename is still atomic on
/// the destination filesystem.
pub async fn move_file(src: impl AsRef<Path>, dst: impl AsRef<Path>) -> Result<(), StoreError> {
    let src = src.as_ref();
    let dst = dst.as_ref();

    if let Some(parent) = dst.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)
                .await
                .map_err(StoreError::CheckpointWrite)?;
        }
    }

    match fs::rename(src, dst).await {
        Ok(()) => Ok(()),
        Err(e) if is_cross_device_error(&e) => {
            tracing::debug!(
                "cross-device rename detected, falling back to copy+delete: {} -> {}",
                src.display(),
                dst.display()
            );
            copy_and_delete(src, dst).await
        }
        Err(e) => Err(StoreError::CheckpointWrite(e)),
    }
}

fn is_cross_device_error(e: &std::io::Error) -> bool {
    e.raw_os_error() == Some(18)
}

async fn copy_and_delete(src: &Path, dst: &Path) -> Result<(), StoreError> {
    let tmp_dst = dst.with_extension("tmp");

    fs::copy(src, &tmp_dst)
        .await
        .map_err(StoreError::CheckpointWrite)?;

    if let Err(e) = fs::rename(&tmp_dst, dst).await {
        let _ = fs::remove_file(&tmp_dst).await;
        return Err(StoreError::CheckpointWrite(e));
    }

    if let Err(e) = fs::remove_file(src).await {
        tracing::warn!(
            "failed to remove source file after cross-device move: {}: {}",
            src.display(),
            e
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn moves_file_on_same_filesystem() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("source.txt");
        let dst = dir.path().join("dest.txt");
        fs::write(&src, b"test content").await.unwrap();

        move_file(&src, &dst).await.unwrap();

        assert!(!src.exists());
        assert_eq!(fs::read_to_string(&dst).await.unwrap(), "test content");
    }

    #[tokio::test]
    async fn creates_missing_destination_directory() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("source.txt");
        let dst = dir.path().join("nested").join("dest.txt");
        fs::write(&src, b"data").await.unwrap();

        move_file(&src, &dst).await.unwrap();

        assert!(dst.exists());
    }

    #[test]
    fn exdev_detection_matches_errno_18() {
        let exdev = std::io::Error::from_raw_os_error(18);
        assert!(is_cross_device_error(&exdev));
        let not_found = std::io::Error::from_raw_os_error(2);
        assert!(!is_cross_device_error(&not_found));
    }
}
