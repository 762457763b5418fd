//! yt-dlp-backed metadata resolution.
//!
//! Grounded on `vclip-media/src/download.rs`'s `which::which` + subprocess
//! pattern, but invoked with `--dump-json --skip-download` to pull title,
//! channel, duration, and view count without touching the network for a
//! full download.

use std::process::Stdio;

use serde::Deserialize;
use tokio::process::Command;
use tracing::{debug, warn};

/// Partial metadata pulled from yt-dlp. Every field is optional: any piece
/// yt-dlp doesn't return (or that we fail to parse) is left `None` rather
/// than failing the whole resolution.
#[derive(Debug, Default, Clone)]
pub struct VideoMetadata {
    pub title: Option<String>,
    pub channel: Option<String>,
    pub duration_seconds: Option<u64>,
    pub view_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct YtDlpInfo {
    title: Option<String>,
    #[serde(alias = "uploader")]
    channel: Option<String>,
    duration: Option<f64>,
    view_count: Option<u64>,
}

/// Resolve metadata for `url` by shelling out to yt-dlp. Never returns an
/// error: if the binary is missing, the process fails, or the output can't
/// be parsed, this logs a warning and returns a default (all-`None`)
/// [`VideoMetadata`] so the caller can still record a vertex with edges.
pub async fn resolve_metadata(url: &str) -> VideoMetadata {
    if which::which("yt-dlp").is_err() {
        warn!("yt-dlp not found on PATH, skipping metadata resolution");
        return VideoMetadata::default();
    }

    let output = match Command::new("yt-dlp")
        .args(["--dump-json", "--skip-download", "--no-warnings"])
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
    {
        Ok(output) => output,
        Err(err) => {
            warn!(error = %err, "failed to spawn yt-dlp");
            return VideoMetadata::default();
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!("yt-dlp metadata stderr: {}", stderr);
        return VideoMetadata::default();
    }

    match serde_json::from_slice::<YtDlpInfo>(&output.stdout) {
        Ok(info) => VideoMetadata {
            title: info.title,
            channel: info.channel,
            duration_seconds: info.duration.map(|d| d.round() as u64),
            view_count: info.view_count,
        },
        Err(err) => {
            warn!(error = %err, "failed to parse yt-dlp metadata JSON");
            VideoMetadata::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_yt_dlp_json_shape() {
        let raw = r#"{"title":"Some Video","uploader":"Some Channel","duration":125.6,"view_count":9001}"#;
        let info: YtDlpInfo = serde_json::from_str(raw).unwrap();
        assert_eq!(info.title.as_deref(), Some("Some Video"));
        assert_eq!(info.channel.as_deref(), Some("Some Channel"));
        assert_eq!(info.duration, Some(125.6));
        assert_eq!(info.view_count, Some(9001));
    }

    #[test]
    fn default_metadata_is_all_none() {
        let meta = VideoMetadata::default();
        assert!(meta.title.is_none());
        assert!(meta.channel.is_none());
        assert!(meta.duration_seconds.is_none());
        assert!(meta.view_count.is_none());
    }
}
