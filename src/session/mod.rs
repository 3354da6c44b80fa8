//! Media session management
//!
//! This module provides the `MediaSession` abstraction that manages:
//! - Stream acquisition and camera toggling
//! - Recording into a single blob, or taking a snapshot
//! - Uploading the result and persisting its content identifier
//! - Submission hand-off and success acknowledgment

mod config;
mod hooks;
mod session;
mod status;

pub use config::SessionConfig;
pub use hooks::{LogNotifier, LogSubmission, MemoryNotifier, Notifier, SubmissionHandler};
pub use session::{MediaSession, RecordingOutcome, SessionError, SnapshotOutcome};
pub use status::SessionStatus;
