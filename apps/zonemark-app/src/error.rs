use std::path::PathBuf;

use thiserror::Error;

use zonemark_io::ConfigError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Invalid gesture script: {0}")]
    Script(String),

    /// Carries the loader's user-facing message.
    #[error("{0}")]
    Snapshot(String),

    #[error("Failed to write image {path}: {message}")]
    ImageWrite { path: PathBuf, message: String },
}
