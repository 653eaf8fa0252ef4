use meshview_core::{MeshError, SettingsError};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure while writing a frame to the terminal
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to write frame: {0}")]
    Io(#[from] io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("{0}")]
    InvalidValue(&'static str),
}

/// Anything that stops the viewer
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Mesh(#[from] MeshError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("Terminal error: {0}")]
    Terminal(#[from] io::Error),
}
