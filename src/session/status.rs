use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::capture::Controls;
use crate::media::{CameraFacing, MediaMode};
use crate::recorder::RecorderState;
use crate::upload::ContentId;

/// Snapshot of a media session for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatus {
    pub session_id: String,

    pub mode: MediaMode,

    pub facing: CameraFacing,

    pub recorder: RecorderState,

    pub controls: Controls,

    /// Instruction line shown next to the controls
    pub status_message: String,

    /// Live stream id, if a stream is held
    pub stream_id: Option<String>,

    /// When the current stream was acquired
    pub capture_started_at: Option<DateTime<Utc>>,

    /// Chunks accumulated by the active recording
    pub chunks_count: usize,

    /// Local copy of the last snapshot
    pub image_path: Option<PathBuf>,

    /// Identifier from the last successful upload in this session
    pub last_content_id: Option<ContentId>,

    /// Last acknowledgment shown to the user
    pub last_acknowledgment: Option<String>,

    /// Persisted `video_uri`
    pub video_uri: Option<String>,

    /// Persisted `image_uri`
    pub image_uri: Option<String>,
}
