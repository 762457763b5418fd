//! R2-compatible object storage upload sink, grounded on
//! `vclip-storage/src/client.rs`'s `R2Client`.

use std::path::PathBuf;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::{Builder, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tracing::{debug, info, warn};
use vcrawl_models::Vertex;

use crate::error::{SinkError, SinkResult};
use crate::local::LocalDownloadSink;
use crate::sink::{DownloadOutcome, DownloadSink};

#[derive(Debug, Clone)]
pub struct R2Config {
    pub endpoint_url: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket_name: String,
    pub region: String,
}

impl R2Config {
    pub fn from_env() -> Option<Self> {
        Some(Self {
            endpoint_url: std::env::var("R2_ENDPOINT_URL").ok()?,
            access_key_id: std::env::var("R2_ACCESS_KEY_ID").ok()?,
            secret_access_key: std::env::var("R2_SECRET_ACCESS_KEY").ok()?,
            bucket_name: std::env::var("R2_BUCKET_NAME").ok()?,
            region: std::env::var("R2_REGION").unwrap_or_else(|_| "auto".to_string()),
        })
    }
}

/// Downloads locally via [`LocalDownloadSink`], uploads the result to an
/// R2-compatible bucket, then removes the local copy. Presented to the
/// engine as a single `DownloadSink` so remote-object-storage upload is
/// just one more optional collaborator.
pub struct R2UploadSink {
    local: LocalDownloadSink,
    client: Client,
    bucket: String,
}

impl R2UploadSink {
    pub fn new(config: R2Config, local_output_dir: PathBuf) -> Self {
        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "r2",
        );
        let sdk_config = Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .endpoint_url(&config.endpoint_url)
            .region(Region::new(config.region))
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        Self {
            local: LocalDownloadSink::new(local_output_dir),
            client: Client::from_conf(sdk_config),
            bucket: config.bucket_name,
        }
    }

    async fn upload(&self, path: &std::path::Path, key: &str) -> SinkResult<()> {
        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| SinkError::upload_failed(e.to_string()))?;
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(body)
            .content_type("video/mp4")
            .send()
            .await
            .map_err(|e| SinkError::upload_failed(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl DownloadSink for R2UploadSink {
    async fn acquire(&self, vertex: &Vertex) -> DownloadOutcome {
        let local_outcome = self.local.acquire(vertex).await;
        if !local_outcome.downloaded {
            return local_outcome;
        }

        let key = format!("videos/{}.mp4", vertex.id);
        let local_path = self.local.output_path_for(vertex);

        debug!(video_id = %vertex.id, key = %key, "uploading to r2");
        if let Err(err) = self.upload(&local_path, &key).await {
            warn!(video_id = %vertex.id, error = %err, "r2 upload failed");
            return DownloadOutcome::failure(err.to_string());
        }

        if let Err(err) = tokio::fs::remove_file(&local_path).await {
            warn!(video_id = %vertex.id, error = %err, "failed to remove local copy after upload");
        }

        info!(video_id = %vertex.id, key = %key, "uploaded to r2");
        DownloadOutcome::success(local_outcome.bytes)
    }
}
