use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::media::MediaMode;

/// Configuration for a media session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Session identifier used in logs (e.g., "session-6f1c...")
    pub session_id: String,

    /// Mode selected when the session is created
    pub initial_mode: MediaMode,

    /// Directory that receives `recorded-video.webm` / `captured-image.png`
    /// Default: none (nothing is saved locally)
    pub downloads_dir: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id: format!("session-{}", uuid::Uuid::new_v4()),
            initial_mode: MediaMode::Video,
            downloads_dir: None,
        }
    }
}
