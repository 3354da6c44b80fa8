use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier returned by the storage service for uploaded content
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(pub String);

impl ContentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Success body of the upload endpoint: `{"value": {"cid": "..."}}`
#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub value: UploadValue,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadValue {
    pub cid: ContentId,
}

/// What was uploaded; selects filename, storage key and acknowledgment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadKind {
    Video,
    Image,
}

impl UploadKind {
    pub fn filename(self) -> &'static str {
        match self {
            UploadKind::Video => "recorded-video.webm",
            UploadKind::Image => "captured-image.png",
        }
    }

    pub fn storage_key(self) -> &'static str {
        match self {
            UploadKind::Video => crate::store::VIDEO_URI_KEY,
            UploadKind::Image => crate::store::IMAGE_URI_KEY,
        }
    }

    pub fn acknowledgment(self) -> &'static str {
        match self {
            UploadKind::Video => "File uploaded successfully!",
            UploadKind::Image => "Image uploaded successfully!",
        }
    }
}
