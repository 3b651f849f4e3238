use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use zonemark_core::CameraId;

use super::{Frame, SnapshotError};
use crate::config::AnnotatorConfig;

/// Upper bound on an encoded snapshot body.
pub const MAX_SNAPSHOT_BYTES: u64 = 16 * 1024 * 1024;

/// Source of still frames for a camera. Called from a worker thread.
pub trait FrameProvider: Send + Sync {
    fn fetch(&self, camera: &CameraId) -> Result<Frame, SnapshotError>;
}

/// Directory provider when `snapshot_dir` is set, otherwise the HTTP API.
pub fn provider_from_config(config: &AnnotatorConfig) -> Arc<dyn FrameProvider> {
    match &config.snapshot_dir {
        Some(dir) => {
            log::info!("Reading snapshots from {}", dir.display());
            Arc::new(DirectoryFrameProvider::new(dir))
        }
        None => {
            log::info!("Fetching snapshots from {}", config.api_base_url);
            Arc::new(HttpFrameProvider::from_config(config))
        }
    }
}

/// Fetches `GET {base_url}{snapshot_path}` from the analytics API.
pub struct HttpFrameProvider {
    agent: ureq::Agent,
    base_url: String,
    path_template: String,
    max_bytes: u64,
}

impl HttpFrameProvider {
    /// `timeout` bounds the whole request, connect through body.
    pub fn new(base_url: &str, path_template: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent("zonemark-snapshot")
            .build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            path_template: path_template.to_string(),
            max_bytes: MAX_SNAPSHOT_BYTES,
        }
    }

    /// Reject bodies longer than `limit` bytes.
    pub fn with_max_bytes(mut self, limit: u64) -> Self {
        self.max_bytes = limit;
        self
    }

    pub fn from_config(config: &AnnotatorConfig) -> Self {
        Self::new(
            &config.api_base_url,
            &config.snapshot_path,
            config.request_timeout(),
        )
    }

    pub fn snapshot_url(&self, camera: &CameraId) -> String {
        format!(
            "{}{}",
            self.base_url,
            self.path_template.replace("{camera}", camera.as_str())
        )
    }
}

impl FrameProvider for HttpFrameProvider {
    fn fetch(&self, camera: &CameraId) -> Result<Frame, SnapshotError> {
        let url = self.snapshot_url(camera);
        log::debug!("GET {}", url);

        let response = match self.agent.get(&url).set("Accept", "image/*").call() {
            Ok(resp) => resp,
            Err(ureq::Error::Status(404, _)) => {
                // No decoded frame yet - expected for idle cameras
                return Err(SnapshotError::Unavailable {
                    camera: camera.to_string(),
                });
            }
            Err(ureq::Error::Status(status, _)) => return Err(SnapshotError::Http { status }),
            Err(ureq::Error::Transport(t)) => return Err(SnapshotError::Network(t.to_string())),
        };

        let content_type = Some(response.content_type().to_string());
        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(self.max_bytes + 1)
            .read_to_end(&mut bytes)
            .map_err(|e| SnapshotError::Network(e.to_string()))?;

        if bytes.len() as u64 > self.max_bytes {
            return Err(SnapshotError::TooLarge {
                limit: self.max_bytes,
            });
        }
        if bytes.is_empty() {
            return Err(SnapshotError::Unavailable {
                camera: camera.to_string(),
            });
        }

        Ok(Frame {
            camera: camera.clone(),
            bytes,
            content_type,
        })
    }
}

/// Serves `<root>/<camera>.{jpg,jpeg,png}` for offline annotation.
pub struct DirectoryFrameProvider {
    root: PathBuf,
}

impl DirectoryFrameProvider {
    const EXTENSIONS: [(&'static str, &'static str); 3] = [
        ("jpg", "image/jpeg"),
        ("jpeg", "image/jpeg"),
        ("png", "image/png"),
    ];

    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }
}

impl FrameProvider for DirectoryFrameProvider {
    fn fetch(&self, camera: &CameraId) -> Result<Frame, SnapshotError> {
        let id = camera.as_str();
        if id.is_empty() || id.contains(['/', '\\']) || id.contains("..") {
            return Err(SnapshotError::Io(format!("invalid camera id '{}'", id)));
        }

        for (ext, mime) in Self::EXTENSIONS {
            let path = self.root.join(format!("{}.{}", id, ext));
            match std::fs::read(&path) {
                Ok(bytes) => {
                    log::debug!("Read snapshot {} ({} bytes)", path.display(), bytes.len());
                    return Ok(Frame {
                        camera: camera.clone(),
                        bytes,
                        content_type: Some(mime.to_string()),
                    });
                }
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(SnapshotError::Io(format!("{}: {}", path.display(), e))),
            }
        }

        Err(SnapshotError::Unavailable {
            camera: camera.to_string(),
        })
    }
}
