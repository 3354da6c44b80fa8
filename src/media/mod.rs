//! Media acquisition and encoding
//!
//! - `MediaDevice`: acquires live camera/microphone streams
//! - `MediaEncoder`: turns a live stream into ordered encoded chunks
//! - `MediaStream` / `MediaTrack`: stream handles with stoppable tracks

pub mod device;
pub mod encoder;
pub mod stream;

pub use device::{CaptureError, MediaDevice, SyntheticCamera, SyntheticCameraConfig};
pub use encoder::{MediaEncoder, SyntheticEncoder};
pub use stream::{
    CameraFacing, MediaMode, MediaStream, MediaTrack, PreviewReceiver, StreamConstraints,
    TrackKind, VideoFrame,
};
