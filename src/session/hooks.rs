use anyhow::Result;
use std::sync::Mutex;
use tracing::info;

use crate::upload::{ContentId, UploadKind};

/// Receives the content identifier after a successful upload
#[async_trait::async_trait]
pub trait SubmissionHandler: Send + Sync {
    async fn submit(&self, kind: UploadKind, content_id: &ContentId) -> Result<()>;
}

/// Submission handler that only logs
pub struct LogSubmission;

#[async_trait::async_trait]
impl SubmissionHandler for LogSubmission {
    async fn submit(&self, kind: UploadKind, content_id: &ContentId) -> Result<()> {
        info!("Submitting {:?} evidence: {}", kind, content_id);
        Ok(())
    }
}

/// Surfaces success acknowledgments to the user
pub trait Notifier: Send + Sync {
    fn acknowledge(&self, message: &str);
}

pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn acknowledge(&self, message: &str) {
        info!("{}", message);
    }
}

/// Keeps every acknowledgment in memory
#[derive(Default)]
pub struct MemoryNotifier {
    messages: Mutex<Vec<String>>,
}

impl MemoryNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }
}

impl Notifier for MemoryNotifier {
    fn acknowledge(&self, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
    }
}
