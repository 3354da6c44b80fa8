use anyhow::Result;
use serde::Deserialize;

use crate::media::{CameraFacing, SyntheticCameraConfig};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub upload: UploadConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    pub endpoint: String,
    /// Static bearer credential; supply via `CUSTOS__UPLOAD__TOKEN`
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub store_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            store_path: "data/local-store.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub default_facing: CameraFacing,
    /// Where recordings and snapshots are saved locally; disabled when unset
    pub downloads_dir: Option<String>,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub timeslice_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        let camera = SyntheticCameraConfig::default();
        Self {
            default_facing: CameraFacing::User,
            downloads_dir: None,
            width: camera.width,
            height: camera.height,
            fps: camera.fps,
            timeslice_ms: 1000,
        }
    }
}

impl CaptureConfig {
    pub fn camera(&self) -> SyntheticCameraConfig {
        SyntheticCameraConfig {
            width: self.width,
            height: self.height,
            fps: self.fps,
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix("CUSTOS").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
