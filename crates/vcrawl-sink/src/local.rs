//! Local filesystem download sink, grounded on
//! `vclip-media/src/download.rs::download_video`.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};
use vcrawl_models::Vertex;

use crate::error::{SinkError, SinkResult};
use crate::sink::{DownloadOutcome, DownloadSink};

/// Below this size a completed download is treated as truncated/corrupt
/// and re-attempted on the next run.
const MIN_VIDEO_FILE_SIZE: u64 = 1024 * 1024;

pub struct LocalDownloadSink {
    videos_dir: PathBuf,
}

impl LocalDownloadSink {
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            videos_dir: output_dir.as_ref().join("videos"),
        }
    }

    fn output_path(&self, vertex: &Vertex) -> PathBuf {
        self.videos_dir.join(format!("{}.mp4", vertex.id))
    }

    /// Public accessor used by `R2UploadSink` to locate the file it staged
    /// locally before uploading.
    pub fn output_path_for(&self, vertex: &Vertex) -> PathBuf {
        self.output_path(vertex)
    }

    async fn download(&self, vertex: &Vertex) -> SinkResult<u64> {
        let output_path = self.output_path(vertex);

        if let Ok(metadata) = tokio::fs::metadata(&output_path).await {
            if metadata.len() > MIN_VIDEO_FILE_SIZE {
                info!(video_id = %vertex.id, "using existing video file");
                return Ok(metadata.len());
            }
        }

        which::which("yt-dlp").map_err(|_| SinkError::YtDlpNotFound)?;

        if let Some(parent) = output_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let output = Command::new("yt-dlp")
            .args([
                "-f",
                "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best",
                "-o",
            ])
            .arg(&output_path)
            .arg(&vertex.url)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("yt-dlp stderr: {}", stderr);
            return Err(SinkError::download_failed(format!(
                "yt-dlp failed: {}",
                stderr.lines().last().unwrap_or("unknown error")
            )));
        }

        let metadata = tokio::fs::metadata(&output_path)
            .await
            .map_err(|_| SinkError::download_failed("output file not created"))?;
        info!(
            video_id = %vertex.id,
            bytes = metadata.len(),
            "downloaded video"
        );
        Ok(metadata.len())
    }
}

#[async_trait]
impl DownloadSink for LocalDownloadSink {
    async fn acquire(&self, vertex: &Vertex) -> DownloadOutcome {
        match self.download(vertex).await {
            Ok(bytes) => DownloadOutcome::success(bytes),
            Err(err) => {
                warn!(video_id = %vertex.id, error = %err, "download failed");
                DownloadOutcome::failure(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn output_path_uses_video_id() {
        let dir = TempDir::new().unwrap();
        let sink = LocalDownloadSink::new(dir.path());
        let vertex = Vertex::new("dQw4w9WgXcQ", vec![]);
        assert_eq!(
            sink.output_path(&vertex),
            dir.path().join("videos").join("dQw4w9WgXcQ.mp4")
        );
    }

    #[tokio::test]
    async fn reuses_existing_sufficiently_large_file() {
        let dir = TempDir::new().unwrap();
        let sink = LocalDownloadSink::new(dir.path());
        let vertex = Vertex::new("existingvid", vec![]);
        let path = sink.output_path(&vertex);
        tokio::fs::create_dir_all(path.parent().unwrap())
            .await
            .unwrap();
        tokio::fs::write(&path, vec![0u8; (MIN_VIDEO_FILE_SIZE + 1) as usize])
            .await
            .unwrap();

        let outcome = sink.acquire(&vertex).await;
        assert!(outcome.downloaded);
        assert_eq!(outcome.bytes, MIN_VIDEO_FILE_SIZE + 1);
    }
}
