use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::media::{
    CameraFacing, CaptureError, MediaDevice, MediaMode, MediaStream, StreamConstraints, VideoFrame,
};

/// Enabled state of the start/stop recording controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls {
    pub start_enabled: bool,
    pub stop_enabled: bool,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            start_enabled: true,
            stop_enabled: false,
        }
    }
}

/// Owns the live stream and the camera facing preference
pub struct CaptureController {
    device: Box<dyn MediaDevice>,
    facing: CameraFacing,
    stream: Option<MediaStream>,
    controls: Controls,
}

impl CaptureController {
    pub fn new(device: Box<dyn MediaDevice>, facing: CameraFacing) -> Self {
        Self {
            device,
            facing,
            stream: None,
            controls: Controls::default(),
        }
    }

    /// Acquire a stream for `mode` and bind it to the preview surface
    ///
    /// On failure the controls keep their previous state.
    pub async fn start(&mut self, mode: MediaMode) -> Result<&MediaStream, CaptureError> {
        let constraints = StreamConstraints::for_mode(mode, self.facing);
        info!(
            "Requesting {:?} stream from {} (facing={:?})",
            mode,
            self.device.name(),
            self.facing
        );

        let stream = match self.device.get_user_media(constraints).await {
            Ok(stream) => stream,
            Err(e) => {
                error!("Error accessing camera: {}", e);
                return Err(e);
            }
        };

        // A previous stream is never left running behind the new one
        if let Some(previous) = self.stream.take() {
            previous.stop_all_tracks();
        }

        self.controls = Controls {
            start_enabled: false,
            stop_enabled: true,
        };

        Ok(&*self.stream.insert(stream))
    }

    /// Flip front/back camera and release the current stream
    ///
    /// Does not re-acquire; the caller starts a new capture.
    pub fn toggle_facing(&mut self) -> CameraFacing {
        self.facing = self.facing.toggled();

        if let Some(stream) = self.stream.take() {
            stream.stop_all_tracks();
        }

        self.controls = Controls::default();
        info!("Camera facing toggled to {:?}", self.facing);

        self.facing
    }

    /// Stop every track and forget the stream
    pub fn stop_all(&mut self) {
        if let Some(stream) = self.stream.take() {
            stream.stop_all_tracks();
        }
        self.controls = Controls::default();
    }

    pub fn stream(&self) -> Option<&MediaStream> {
        self.stream.as_ref()
    }

    pub fn current_frame(&self) -> Option<VideoFrame> {
        self.stream.as_ref().and_then(MediaStream::current_frame)
    }

    pub fn facing(&self) -> CameraFacing {
        self.facing
    }

    pub fn controls(&self) -> Controls {
        self.controls
    }
}
