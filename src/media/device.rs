use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::watch;
use tracing::info;

use super::stream::{CameraFacing, MediaStream, MediaTrack, StreamConstraints, TrackKind, VideoFrame};

/// Failure to acquire a live stream
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("media access denied: {0}")]
    PermissionDenied(String),
    #[error("capture device unavailable: {0}")]
    DeviceUnavailable(String),
}

/// Camera/microphone capture device trait
///
/// Implementations:
/// - `SyntheticCamera`: generated test pattern (CLI demo, tests)
#[async_trait::async_trait]
pub trait MediaDevice: Send + Sync {
    /// Acquire a live stream satisfying `constraints`
    async fn get_user_media(
        &mut self,
        constraints: StreamConstraints,
    ) -> Result<MediaStream, CaptureError>;

    /// Device name for logging
    fn name(&self) -> &str;
}

/// Configuration for the synthetic test-pattern camera
#[derive(Debug, Clone)]
pub struct SyntheticCameraConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
}

impl Default for SyntheticCameraConfig {
    fn default() -> Self {
        Self {
            width: 160,
            height: 120,
            fps: 10,
        }
    }
}

/// Camera that renders a moving colour bar instead of reading hardware
///
/// The front camera renders magenta bars, the back camera renders cyan bars,
/// which makes a facing toggle visible in snapshots.
pub struct SyntheticCamera {
    config: SyntheticCameraConfig,
}

impl SyntheticCamera {
    pub fn new(config: SyntheticCameraConfig) -> Self {
        Self { config }
    }

    fn render(config: &SyntheticCameraConfig, facing: CameraFacing, index: u64, timestamp_ms: u64) -> VideoFrame {
        let bar = match facing {
            CameraFacing::User => [0xc9, 0x2e, 0xff, 0xff],
            CameraFacing::Environment => [0x2e, 0xc9, 0xff, 0xff],
        };
        let background = [0x09, 0x09, 0x09, 0xff];

        let mut frame = VideoFrame::solid(config.width, config.height, background, timestamp_ms);
        let bar_width = (config.width / 8).max(1);
        let offset = (index as u32).wrapping_mul(2) % config.width.max(1);

        for y in 0..config.height {
            for x in 0..config.width {
                if (x + config.width - offset) % config.width < bar_width {
                    let idx = ((y * config.width + x) * 4) as usize;
                    frame.rgba[idx..idx + 4].copy_from_slice(&bar);
                }
            }
        }

        frame
    }
}

#[async_trait::async_trait]
impl MediaDevice for SyntheticCamera {
    async fn get_user_media(
        &mut self,
        constraints: StreamConstraints,
    ) -> Result<MediaStream, CaptureError> {
        if constraints.video.is_none() && !constraints.audio {
            return Err(CaptureError::DeviceUnavailable(
                "at least one of audio or video must be requested".to_string(),
            ));
        }

        let mut tracks = Vec::new();
        if constraints.audio {
            tracks.push(MediaTrack::new(TrackKind::Audio, "synthetic microphone"));
        }

        let preview = match constraints.video {
            Some(facing) => {
                let track = MediaTrack::new(TrackKind::Video, format!("synthetic camera ({:?})", facing));
                let (tx, rx) = watch::channel(None);
                let config = self.config.clone();
                let producer_track = track.clone();
                let interval = Duration::from_millis((1000 / u64::from(config.fps.max(1))).max(1));

                // Render the first frame synchronously so the preview is never empty
                tx.send_replace(Some(SyntheticCamera::render(&config, facing, 0, 0)));

                tokio::spawn(async move {
                    let started = Instant::now();
                    let mut index = 1u64;
                    let mut ticker = tokio::time::interval(interval);
                    ticker.tick().await;

                    loop {
                        ticker.tick().await;
                        if !producer_track.is_live() {
                            break;
                        }
                        let ts = started.elapsed().as_millis() as u64;
                        if tx.send(Some(SyntheticCamera::render(&config, facing, index, ts))).is_err() {
                            break;
                        }
                        index += 1;
                    }

                    info!("Synthetic camera producer stopped after {} frames", index);
                });

                tracks.push(track);
                Some(rx)
            }
            None => None,
        };

        let stream = MediaStream::new(tracks, preview);
        info!(
            "Synthetic stream {} acquired ({} tracks, {}x{} @ {}fps)",
            stream.id(),
            stream.tracks().len(),
            self.config.width,
            self.config.height,
            self.config.fps
        );

        Ok(stream)
    }

    fn name(&self) -> &str {
        "synthetic camera"
    }
}
