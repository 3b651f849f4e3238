use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use zonemark_core::geometry::VERTEX_HIT_RADIUS;
use zonemark_core::CanvasSize;
use zonemark_renderer::OverlayStyle;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value for '{field}': {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

/// Settings for an annotation host. Every field has a default, so a
/// config file only needs the values it overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnnotatorConfig {
    /// Base URL of the analytics API, e.g. `http://nvr.local:8080`.
    pub api_base_url: String,
    /// Snapshot endpoint path; `{camera}` is replaced by the camera id.
    pub snapshot_path: String,
    /// Read snapshots from this directory instead of the API.
    pub snapshot_dir: Option<PathBuf>,
    pub request_timeout_secs: u64,
    pub canvas: CanvasSize,
    pub vertex_hit_radius: f64,
    pub require_entrance_side: bool,
    pub style: OverlayStyle,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            snapshot_path: "/cameras/{camera}/snapshot".to_string(),
            snapshot_dir: None,
            request_timeout_secs: 30,
            canvas: CanvasSize::default(),
            vertex_hit_radius: VERTEX_HIT_RADIUS,
            require_entrance_side: false,
            style: OverlayStyle::default(),
        }
    }
}

impl AnnotatorConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas.width <= 0.0 || self.canvas.height <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "canvas",
                message: format!(
                    "canvas must have positive size, got {}x{}",
                    self.canvas.width, self.canvas.height
                ),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "requestTimeoutSecs",
                message: "timeout must be at least one second".to_string(),
            });
        }
        if self.vertex_hit_radius <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "vertexHitRadius",
                message: format!("radius must be positive, got {}", self.vertex_hit_radius),
            });
        }
        if !self.snapshot_path.contains("{camera}") {
            return Err(ConfigError::Invalid {
                field: "snapshotPath",
                message: "path must contain a {camera} placeholder".to_string(),
            });
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
