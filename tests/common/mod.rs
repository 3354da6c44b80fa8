// Shared fixtures: an in-process storage endpoint and scripted media parts.
#![allow(dead_code)]

use anyhow::Result;
use axum::{
    extract::{Multipart, State},
    http::{
        header::{AUTHORIZATION, CONTENT_LENGTH},
        HeaderMap, StatusCode,
    },
    routing::post,
    Router,
};
use bytes::Bytes;
use custos_recorder::config::UploadConfig;
use custos_recorder::media::{
    CaptureError, MediaDevice, MediaEncoder, MediaStream, StreamConstraints, SyntheticCamera,
    SyntheticCameraConfig,
};
use custos_recorder::session::{MediaSession, MemoryNotifier, SessionConfig, SubmissionHandler};
use custos_recorder::{CameraFacing, CaptureController, ContentId, LocalStore, UploadClient, UploadKind};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// One request received by the mock storage endpoint
#[derive(Debug, Clone)]
pub struct CapturedUpload {
    pub authorization: Option<String>,
    pub content_length: Option<u64>,
    pub field: String,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    body: String,
    uploads: Arc<Mutex<Vec<CapturedUpload>>>,
}

pub struct MockStorage {
    pub endpoint: String,
    uploads: Arc<Mutex<Vec<CapturedUpload>>>,
}

impl MockStorage {
    pub fn uploads(&self) -> Vec<CapturedUpload> {
        self.uploads.lock().unwrap().clone()
    }
}

async fn handle_upload(
    State(state): State<MockState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> (StatusCode, String) {
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let content_length = headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok());

    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.unwrap().to_vec();

        state.uploads.lock().unwrap().push(CapturedUpload {
            authorization: authorization.clone(),
            content_length,
            field: name,
            filename,
            content_type,
            bytes,
        });
    }

    (state.status, state.body.clone())
}

/// Start a storage endpoint that answers every upload with `status` and `body`
pub async fn spawn_mock_storage(status: StatusCode, body: &str) -> MockStorage {
    let uploads = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        status,
        body: body.to_string(),
        uploads: Arc::clone(&uploads),
    };

    let app = Router::new()
        .route("/upload", post(handle_upload))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockStorage {
        endpoint: format!("http://{}/upload", addr),
        uploads,
    }
}

pub fn upload_config(endpoint: &str) -> UploadConfig {
    UploadConfig {
        endpoint: endpoint.to_string(),
        token: "test-token".to_string(),
        timeout_secs: 5,
    }
}

/// Encoder that delivers a fixed list of chunks, then closes on stop
pub struct ScriptedEncoder {
    chunks: Vec<Bytes>,
    tx: Option<mpsc::Sender<Bytes>>,
}

impl ScriptedEncoder {
    pub fn new(chunks: &[&str]) -> Self {
        Self {
            chunks: chunks
                .iter()
                .map(|c| Bytes::copy_from_slice(c.as_bytes()))
                .collect(),
            tx: None,
        }
    }
}

#[async_trait::async_trait]
impl MediaEncoder for ScriptedEncoder {
    async fn start(&mut self, _stream: &MediaStream) -> Result<mpsc::Receiver<Bytes>> {
        let (tx, rx) = mpsc::channel(16);
        for chunk in &self.chunks {
            tx.send(chunk.clone()).await?;
        }
        self.tx = Some(tx);
        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        self.tx.take();
        Ok(())
    }

    fn is_encoding(&self) -> bool {
        self.tx.is_some()
    }

    fn name(&self) -> &str {
        "scripted encoder"
    }
}

/// Device that always refuses access
pub struct DeniedDevice;

#[async_trait::async_trait]
impl MediaDevice for DeniedDevice {
    async fn get_user_media(
        &mut self,
        _constraints: StreamConstraints,
    ) -> Result<MediaStream, CaptureError> {
        Err(CaptureError::PermissionDenied("NotAllowedError".to_string()))
    }

    fn name(&self) -> &str {
        "denied"
    }
}

pub fn small_camera() -> SyntheticCamera {
    SyntheticCamera::new(SyntheticCameraConfig {
        width: 64,
        height: 48,
        fps: 30,
    })
}

pub fn build_session(
    endpoint: &str,
    dir: &Path,
    device: Box<dyn MediaDevice>,
    encoder: Box<dyn MediaEncoder>,
    notifier: Arc<MemoryNotifier>,
) -> Result<MediaSession> {
    let capture = CaptureController::new(device, CameraFacing::User);
    let uploader = UploadClient::new(&upload_config(endpoint))?;
    let store = LocalStore::open(dir.join("store.json"))?;
    let config = SessionConfig {
        downloads_dir: Some(dir.join("downloads")),
        ..SessionConfig::default()
    };

    Ok(MediaSession::new(config, capture, encoder, uploader, store).with_notifier(notifier))
}

/// Submission handler that remembers every hand-off
#[derive(Default)]
pub struct RecordingSubmission {
    submitted: Mutex<Vec<(UploadKind, ContentId)>>,
}

impl RecordingSubmission {
    pub fn submitted(&self) -> Vec<(UploadKind, ContentId)> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl SubmissionHandler for RecordingSubmission {
    async fn submit(&self, kind: UploadKind, content_id: &ContentId) -> Result<()> {
        self.submitted.lock().unwrap().push((kind, content_id.clone()));
        Ok(())
    }
}

/// Submission handler whose submit always fails
pub struct FailingSubmission;

#[async_trait::async_trait]
impl SubmissionHandler for FailingSubmission {
    async fn submit(&self, _kind: UploadKind, _content_id: &ContentId) -> Result<()> {
        anyhow::bail!("submission form rejected")
    }
}
