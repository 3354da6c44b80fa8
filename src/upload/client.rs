use reqwest::multipart::{Form, Part};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use super::messages::{ContentId, UploadResponse};
use crate::config::UploadConfig;
use crate::recorder::Blob;

/// Multipart field the storage service reads the file from
pub const FILE_FIELD: &str = "file";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("upload rejected with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("upload request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("malformed upload response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Client for the content-storage upload endpoint
///
/// One POST per call, no retries.
pub struct UploadClient {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl UploadClient {
    pub fn new(config: &UploadConfig) -> Result<Self, UploadError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        info!("Upload client configured for {}", config.endpoint);

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            token: config.token.clone(),
        })
    }

    /// Upload `blob` as `filename` and return the content identifier
    pub async fn upload(&self, blob: &Blob, filename: &str) -> Result<ContentId, UploadError> {
        let part = Part::stream_with_length(blob.bytes.clone(), blob.len() as u64)
            .file_name(filename.to_string())
            .mime_str(&blob.media_type)?;
        let form = Form::new().part(FILE_FIELD, part);

        info!(
            "Uploading {} ({} bytes, {}) to {}",
            filename,
            blob.len(),
            blob.media_type,
            self.endpoint
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let preview = String::from_utf8_lossy(&body).chars().take(512).collect();
            return Err(UploadError::Status {
                status: status.as_u16(),
                body: preview,
            });
        }

        let parsed: UploadResponse = serde_json::from_slice(&body)?;

        info!("Upload of {} accepted: cid={}", filename, parsed.value.cid);

        Ok(parsed.value.cid)
    }
}
