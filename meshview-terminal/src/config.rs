use log::info;
use meshview_core::{CameraSettings, LightingSettings};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OBJ file to display
    pub mesh: PathBuf,
    /// Collect polygon outlines at load and draw them over the surface
    pub outline: bool,
    pub target_fps: u32,
    /// How long a key counts as held when the terminal cannot report releases
    pub key_hold_ms: u64,
    pub log_file: Option<PathBuf>,
    pub camera: CameraSettings,
    pub lighting: LightingSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mesh: PathBuf::from("teapot.obj"),
            outline: false,
            target_fps: 30,
            key_hold_ms: 500,
            log_file: None,
            camera: CameraSettings::default(),
            lighting: LightingSettings::default(),
        }
    }
}

impl Config {
    pub fn from_toml(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text, path)
    }

    /// Load `path`, or fall back to defaults when it does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                info!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.camera.validate()?;
        self.lighting.validate()?;
        if self.target_fps == 0 {
            return Err(ConfigError::InvalidValue("target_fps must be at least 1"));
        }
        Ok(())
    }

    pub fn frame_time(&self) -> Duration {
        Duration::from_secs(1) / self.target_fps.max(1)
    }

    pub fn key_hold(&self) -> Duration {
        Duration::from_millis(self.key_hold_ms)
    }
}
