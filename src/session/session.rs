use super::config::SessionConfig;
use super::hooks::{LogNotifier, LogSubmission, Notifier, SubmissionHandler};
use super::status::SessionStatus;
use crate::capture::CaptureController;
use crate::media::{CaptureError, MediaEncoder, MediaMode};
use crate::recorder::{Blob, Recorder, RecorderError};
use crate::snapshot::{self, Snapshot, SnapshotError};
use crate::store::{LocalStore, IMAGE_URI_KEY, VIDEO_URI_KEY};
use crate::upload::{ContentId, UploadClient, UploadKind};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Recorder(#[from] RecorderError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error("encoder failure: {0:#}")]
    Encoder(anyhow::Error),
    #[error("not allowed while recording")]
    Busy,
}

/// Result of a stopped recording
#[derive(Debug, Clone)]
pub struct RecordingOutcome {
    pub blob_size: usize,
    pub chunks_count: usize,
    pub download_path: Option<PathBuf>,
    /// `None` when the upload failed
    pub content_id: Option<ContentId>,
}

/// Result of a snapshot
#[derive(Debug, Clone)]
pub struct SnapshotOutcome {
    pub snapshot: Snapshot,
    pub download_path: Option<PathBuf>,
    /// `None` when the upload failed
    pub content_id: Option<ContentId>,
}

/// One capture-to-upload attempt
///
/// Owns the capture controller, the recorder and the encoder feeding it.
/// `reset()` drops everything held in memory; only the local store survives.
pub struct MediaSession {
    /// Session configuration
    config: SessionConfig,

    /// Selected capture mode
    mode: MediaMode,

    /// Live stream owner
    capture: CaptureController,

    /// Encoder producing chunks for the recorder
    encoder: Box<dyn MediaEncoder>,

    /// Chunk accumulator, shared with the collector task
    recorder: Arc<Mutex<Recorder>>,

    /// Task forwarding encoder chunks into the recorder
    collector: Option<JoinHandle<usize>>,

    uploader: UploadClient,

    store: LocalStore,

    submission: Arc<dyn SubmissionHandler>,

    notifier: Arc<dyn Notifier>,

    /// When the current stream was acquired
    capture_started_at: Option<DateTime<Utc>>,

    image_path: Option<PathBuf>,

    last_content_id: Option<ContentId>,

    last_acknowledgment: Option<String>,

    /// Set once a recording has been stopped and uploaded
    recording_finished: bool,
}

impl MediaSession {
    pub fn new(
        config: SessionConfig,
        capture: CaptureController,
        encoder: Box<dyn MediaEncoder>,
        uploader: UploadClient,
        store: LocalStore,
    ) -> Self {
        info!("Creating media session: {}", config.session_id);

        Self {
            mode: config.initial_mode,
            config,
            capture,
            encoder,
            recorder: Arc::new(Mutex::new(Recorder::new())),
            collector: None,
            uploader,
            store,
            submission: Arc::new(LogSubmission),
            notifier: Arc::new(LogNotifier),
            capture_started_at: None,
            image_path: None,
            last_content_id: None,
            last_acknowledgment: None,
            recording_finished: false,
        }
    }

    pub fn with_submission(mut self, submission: Arc<dyn SubmissionHandler>) -> Self {
        self.submission = submission;
        self
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn mode(&self) -> MediaMode {
        self.mode
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub fn capture(&self) -> &CaptureController {
        &self.capture
    }

    pub async fn is_recording(&self) -> bool {
        self.recorder.lock().await.is_recording()
    }

    pub async fn select_mode(&mut self, mode: MediaMode) -> Result<(), SessionError> {
        if self.is_recording().await {
            return Err(SessionError::Busy);
        }

        info!("Media mode selected: {:?}", mode);
        self.mode = mode;
        Ok(())
    }

    /// Acquire the live stream for the selected mode
    ///
    /// Rejected while recording: a new stream would stop the recorded tracks.
    pub async fn start_capture(&mut self) -> Result<(), SessionError> {
        if self.is_recording().await {
            return Err(SessionError::Busy);
        }

        let stream = self.capture.start(self.mode).await?;
        info!(
            "Session {} bound stream {} to preview",
            self.config.session_id,
            stream.id()
        );
        self.capture_started_at = Some(Utc::now());
        self.recording_finished = false;
        Ok(())
    }

    /// Start recording, acquiring a stream first if none is held
    pub async fn start_recording(&mut self) -> Result<(), SessionError> {
        // Acquire a stream first, like the Start button does
        if self.capture.stream().is_none() {
            self.start_capture().await?;
        }

        // Fails unless the recorder is idle
        self.recorder.lock().await.start()?;

        let Some(stream) = self.capture.stream() else {
            self.recorder.lock().await.reset();
            return Err(CaptureError::DeviceUnavailable("stream released".to_string()).into());
        };

        let mut chunk_rx = match self.encoder.start(stream).await {
            Ok(rx) => rx,
            Err(e) => {
                error!("Failed to start {}: {:#}", self.encoder.name(), e);
                self.recorder.lock().await.reset();
                return Err(SessionError::Encoder(e));
            }
        };

        // Spawn collector task: chunks reach the recorder in arrival order
        let recorder = Arc::clone(&self.recorder);
        self.collector = Some(tokio::spawn(async move {
            let mut delivered = 0usize;
            while let Some(chunk) = chunk_rx.recv().await {
                recorder.lock().await.on_data_available(chunk);
                delivered += 1;
            }
            delivered
        }));

        info!(
            "Recording started for session {} ({})",
            self.config.session_id,
            self.encoder.name()
        );

        Ok(())
    }

    /// Stop recording, upload the result and reset the session
    ///
    /// A no-op returning `None` when not recording. The reset happens only
    /// after the upload has resolved.
    pub async fn stop_recording(&mut self) -> Result<Option<RecordingOutcome>, SessionError> {
        if !self.is_recording().await {
            return Ok(None);
        }

        info!("Stopping recording for session {}", self.config.session_id);

        // Flush the encoder and wait for the final chunk
        let chunks_count = self.drain_encoder().await;

        // Assemble the blob
        let Some(blob) = self.recorder.lock().await.stop() else {
            return Ok(None);
        };

        // Local copy, then upload; both must finish before the reset
        let download_path = self.save_download(UploadKind::Video, &blob).await;
        let content_id = self.upload_and_persist(UploadKind::Video, &blob).await;

        let outcome = RecordingOutcome {
            blob_size: blob.len(),
            chunks_count,
            download_path,
            content_id,
        };

        self.reset().await;
        self.recording_finished = true;

        Ok(Some(outcome))
    }

    /// Capture the current preview frame as PNG and upload it
    pub async fn take_snapshot(&mut self) -> Result<SnapshotOutcome, SessionError> {
        let frame = self.capture.current_frame().ok_or(SnapshotError::NoFrame)?;
        let snapshot = snapshot::take_snapshot(&frame)?;

        let download_path = self.save_download(UploadKind::Image, &snapshot.blob).await;
        if download_path.is_some() {
            self.image_path = download_path.clone();
        }

        let content_id = self.upload_and_persist(UploadKind::Image, &snapshot.blob).await;

        Ok(SnapshotOutcome {
            snapshot,
            download_path,
            content_id,
        })
    }

    /// Flip the camera and release the stream; an active recording is discarded
    pub async fn toggle_camera(&mut self) {
        if self.is_recording().await {
            warn!("Camera toggled while recording; discarding recording");
            self.drain_encoder().await;
            self.recorder.lock().await.reset();
        }

        self.capture.toggle_facing();
        self.capture_started_at = None;
    }

    /// Drop all in-memory state, stopping every track
    pub async fn reset(&mut self) {
        if self.encoder.is_encoding() {
            if let Err(e) = self.encoder.stop().await {
                error!("Failed to stop encoder: {:#}", e);
            }
        }
        if let Some(collector) = self.collector.take() {
            collector.abort();
        }

        self.capture.stop_all();
        self.recorder.lock().await.reset();
        self.capture_started_at = None;
        self.image_path = None;
        self.last_content_id = None;
        self.last_acknowledgment = None;
        self.recording_finished = false;

        info!("Session {} reset", self.config.session_id);
    }

    pub async fn status(&self) -> SessionStatus {
        let (recorder_state, chunks_count) = {
            let recorder = self.recorder.lock().await;
            (recorder.state(), recorder.chunk_count())
        };

        let status_message = if self.capture.controls().stop_enabled {
            r#"Click the "Stop" button to stop recording"#
        } else if self.recording_finished {
            r#"Click the "Start" button to start recording"#
        } else {
            r#"Click the "Start" button to start capturing"#
        };

        SessionStatus {
            session_id: self.config.session_id.clone(),
            mode: self.mode,
            facing: self.capture.facing(),
            recorder: recorder_state,
            controls: self.capture.controls(),
            status_message: status_message.to_string(),
            stream_id: self.capture.stream().map(|s| s.id().to_string()),
            capture_started_at: self.capture_started_at,
            chunks_count,
            image_path: self.image_path.clone(),
            last_content_id: self.last_content_id.clone(),
            last_acknowledgment: self.last_acknowledgment.clone(),
            video_uri: self.store.get(VIDEO_URI_KEY).map(str::to_string),
            image_uri: self.store.get(IMAGE_URI_KEY).map(str::to_string),
        }
    }

    /// Stop the encoder and wait until every chunk reached the recorder
    async fn drain_encoder(&mut self) -> usize {
        let stopped = self.encoder.stop().await;
        let Some(collector) = self.collector.take() else {
            return 0;
        };

        if let Err(e) = stopped {
            error!("Failed to stop {}: {:#}", self.encoder.name(), e);
            collector.abort();
            return 0;
        }

        match collector.await {
            Ok(delivered) => delivered,
            Err(e) => {
                error!("Chunk collector panicked: {}", e);
                0
            }
        }
    }

    async fn save_download(&self, kind: UploadKind, blob: &Blob) -> Option<PathBuf> {
        let dir = self.config.downloads_dir.as_ref()?;
        let path = dir.join(kind.filename());

        if let Err(e) = tokio::fs::create_dir_all(dir).await {
            warn!("Failed to create downloads directory {}: {}", dir.display(), e);
            return None;
        }

        match tokio::fs::write(&path, &blob.bytes).await {
            Ok(()) => {
                info!("Saved {} ({} bytes)", path.display(), blob.len());
                Some(path)
            }
            Err(e) => {
                warn!("Failed to save {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Upload, persist, submit, acknowledge; failures are only logged
    async fn upload_and_persist(&mut self, kind: UploadKind, blob: &Blob) -> Option<ContentId> {
        // One attempt, no retry
        let content_id = match self.uploader.upload(blob, kind.filename()).await {
            Ok(cid) => cid,
            Err(e) => {
                error!("Error uploading {}: {}", kind.filename(), e);
                return None;
            }
        };

        // Persist before anything else sees the identifier
        if let Err(e) = self.store.set(kind.storage_key(), content_id.as_str()) {
            error!("Failed to persist {}: {:#}", kind.storage_key(), e);
            return None;
        }
        info!("Stored {} = {}", kind.storage_key(), content_id);
        self.last_content_id = Some(content_id.clone());

        // Hand off to the submission flow; the acknowledgment waits on it
        if let Err(e) = self.submission.submit(kind, &content_id).await {
            error!("Submission of {} failed: {:#}", content_id, e);
            return Some(content_id);
        }

        self.notifier.acknowledge(kind.acknowledgment());
        self.last_acknowledgment = Some(kind.acknowledgment().to_string());

        Some(content_id)
    }
}
