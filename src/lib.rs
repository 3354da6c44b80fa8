pub mod capture;
pub mod config;
pub mod http;
pub mod media;
pub mod recorder;
pub mod session;
pub mod snapshot;
pub mod store;
pub mod upload;

pub use capture::{CaptureController, Controls};
pub use config::Config;
pub use http::{create_router, AppState};
pub use media::{
    CameraFacing, CaptureError, MediaDevice, MediaEncoder, MediaMode, MediaStream, MediaTrack,
    SyntheticCamera, SyntheticEncoder, VideoFrame,
};
pub use recorder::{Blob, Recorder, RecorderError, RecorderState};
pub use session::{MediaSession, SessionConfig, SessionError, SessionStatus};
pub use snapshot::{take_snapshot, Snapshot, SnapshotError};
pub use store::LocalStore;
pub use upload::{ContentId, UploadClient, UploadError, UploadKind};
