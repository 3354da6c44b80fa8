use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const VIDEO_URI_KEY: &str = "video_uri";
pub const IMAGE_URI_KEY: &str = "image_uri";

/// Persistent string key-value store backed by a JSON file
///
/// Every `set` writes through to disk.
#[derive(Debug)]
pub struct LocalStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl LocalStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let entries = if path.exists() {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read store: {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse store: {}", path.display()))?
        } else {
            BTreeMap::new()
        };

        info!("Local store opened: {} ({} entries)", path.display(), entries.len());

        Ok(Self { path, entries })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Write `key` through to disk; the in-memory entry changes only once the file does
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut updated = self.entries.clone();
        updated.insert(key.to_string(), value.to_string());

        self.persist(&updated)?;
        self.entries = updated;

        Ok(())
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("Failed to create store directory")?;
        }

        let tmp = self.path.with_extension("json.tmp");
        let raw = serde_json::to_vec_pretty(entries)?;
        fs::write(&tmp, raw).context("Failed to write store")?;
        fs::rename(&tmp, &self.path).context("Failed to replace store")?;

        Ok(())
    }
}
