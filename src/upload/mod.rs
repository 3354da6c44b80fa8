pub mod client;
pub mod messages;

pub use client::{UploadClient, UploadError};
pub use messages::{ContentId, UploadKind, UploadResponse, UploadValue};
