use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;

/// Which camera the stream should come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraFacing {
    /// Front camera
    #[default]
    User,
    /// Back camera
    Environment,
}

impl CameraFacing {
    pub fn toggled(self) -> Self {
        match self {
            CameraFacing::User => CameraFacing::Environment,
            CameraFacing::Environment => CameraFacing::User,
        }
    }
}

/// Capture mode selected by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaMode {
    /// Camera and microphone
    #[default]
    Video,
    /// Microphone only
    Audio,
}

/// Constraints passed to a media device when acquiring a stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConstraints {
    /// Requested camera, `None` when no video track is wanted
    pub video: Option<CameraFacing>,
    pub audio: bool,
}

impl StreamConstraints {
    pub fn for_mode(mode: MediaMode, facing: CameraFacing) -> Self {
        match mode {
            MediaMode::Video => Self {
                video: Some(facing),
                audio: true,
            },
            MediaMode::Audio => Self {
                video: None,
                audio: true,
            },
        }
    }
}

/// A single decoded video frame (RGBA8, row-major)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
    /// Milliseconds since the stream started
    pub timestamp_ms: u64,
}

impl VideoFrame {
    pub fn solid(width: u32, height: u32, color: [u8; 4], timestamp_ms: u64) -> Self {
        let rgba = color
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();

        Self {
            width,
            height,
            rgba,
            timestamp_ms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    Audio,
    Video,
}

/// One track of a media stream
///
/// Clones share the same live flag, so a producer holding a clone observes `stop()`.
#[derive(Debug, Clone)]
pub struct MediaTrack {
    kind: TrackKind,
    label: String,
    live: Arc<AtomicBool>,
}

impl MediaTrack {
    pub fn new(kind: TrackKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            live: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn kind(&self) -> TrackKind {
        self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    pub fn stop(&self) {
        if self.live.swap(false, Ordering::SeqCst) {
            info!("Stopped {:?} track: {}", self.kind, self.label);
        }
    }
}

/// Preview surface: always holds the most recently rendered frame
pub type PreviewReceiver = watch::Receiver<Option<VideoFrame>>;

/// A live stream returned by a media device
#[derive(Debug, Clone)]
pub struct MediaStream {
    id: String,
    tracks: Vec<MediaTrack>,
    preview: Option<PreviewReceiver>,
}

impl MediaStream {
    pub fn new(tracks: Vec<MediaTrack>, preview: Option<PreviewReceiver>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            tracks,
            preview,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tracks(&self) -> &[MediaTrack] {
        &self.tracks
    }

    pub fn has_video(&self) -> bool {
        self.tracks.iter().any(|t| t.kind() == TrackKind::Video)
    }

    pub fn preview(&self) -> Option<PreviewReceiver> {
        self.preview.clone()
    }

    /// Latest rendered frame, if the stream carries video and has produced one
    pub fn current_frame(&self) -> Option<VideoFrame> {
        self.preview.as_ref().and_then(|rx| rx.borrow().clone())
    }

    pub fn stop_all_tracks(&self) {
        for track in &self.tracks {
            track.stop();
        }
    }

    pub fn is_active(&self) -> bool {
        self.tracks.iter().any(MediaTrack::is_live)
    }
}
