use crate::session::MediaSession;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The single media session; handlers run one at a time like UI events
    pub session: Arc<Mutex<MediaSession>>,
}

impl AppState {
    pub fn new(session: MediaSession) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
        }
    }
}
