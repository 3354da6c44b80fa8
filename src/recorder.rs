use bytes::{Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Container type of every assembled recording
pub const RECORDING_MEDIA_TYPE: &str = "video/webm";

/// A finished piece of media ready to download or upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub bytes: Bytes,
    pub media_type: String,
}

impl Blob {
    pub fn new(bytes: impl Into<Bytes>, media_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            media_type: media_type.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecorderState {
    Idle,
    Recording,
    Stopped,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecorderError {
    #[error("recorder cannot {action} while {state:?}")]
    InvalidState {
        action: &'static str,
        state: RecorderState,
    },
}

/// Accumulates encoded chunks for one recording
///
/// `Idle -> Recording -> Stopped`, with `reset()` returning to `Idle`.
#[derive(Debug)]
pub struct Recorder {
    state: RecorderState,
    chunks: Vec<Bytes>,
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}

impl Recorder {
    pub fn new() -> Self {
        Self {
            state: RecorderState::Idle,
            chunks: Vec::new(),
        }
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state == RecorderState::Recording
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn start(&mut self) -> Result<(), RecorderError> {
        if self.state != RecorderState::Idle {
            return Err(RecorderError::InvalidState {
                action: "start",
                state: self.state,
            });
        }

        self.chunks = Vec::new();
        self.state = RecorderState::Recording;
        info!("Recorder started");
        Ok(())
    }

    /// Append one encoded chunk; ignored unless recording
    pub fn on_data_available(&mut self, chunk: Bytes) {
        if self.state != RecorderState::Recording {
            warn!("Dropping {} byte chunk delivered while {:?}", chunk.len(), self.state);
            return;
        }
        self.chunks.push(chunk);
    }

    /// Assemble the recording; a no-op returning `None` unless recording
    pub fn stop(&mut self) -> Option<Blob> {
        if self.state != RecorderState::Recording {
            return None;
        }

        let total: usize = self.chunks.iter().map(Bytes::len).sum();
        let mut assembled = BytesMut::with_capacity(total);
        for chunk in self.chunks.drain(..) {
            assembled.extend_from_slice(&chunk);
        }

        self.state = RecorderState::Stopped;
        info!("Recorder stopped ({} bytes)", total);

        Some(Blob::new(assembled.freeze(), RECORDING_MEDIA_TYPE))
    }

    pub fn reset(&mut self) {
        self.chunks.clear();
        self.state = RecorderState::Idle;
    }
}
