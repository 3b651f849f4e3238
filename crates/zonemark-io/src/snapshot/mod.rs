//! Camera snapshots used as the annotation backdrop.
//!
//! A [`FrameProvider`] fetches the raw encoded frame, an [`ImageStore`]
//! decodes it into a revocable [`ImageHandle`](zonemark_core::ImageHandle),
//! and the [`SnapshotLoader`] ties the two together with loading/error
//! state, supersession of stale requests, and release-on-teardown.

pub mod loader;
pub mod provider;
pub mod store;

use thiserror::Error;

use zonemark_core::CameraId;

pub use loader::{SnapshotLoader, SnapshotStatus};
pub use provider::{
    provider_from_config, DirectoryFrameProvider, FrameProvider, HttpFrameProvider,
};
pub use store::{DecodedImage, ImageStore, MemoryImageStore, StoredImage};

/// An encoded still frame as returned by a provider.
#[derive(Debug, Clone)]
pub struct Frame {
    pub camera: CameraId,
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SnapshotError {
    /// Expected while a camera has not decoded any frames yet.
    #[error("No snapshot available for camera '{camera}'")]
    Unavailable { camera: String },

    #[error("Snapshot request failed with HTTP status {status}")]
    Http { status: u16 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Snapshot is not a decodable image: {0}")]
    Decode(String),

    #[error("Snapshot exceeds the {limit} byte limit")]
    TooLarge { limit: u64 },
}

impl SnapshotError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, SnapshotError::Unavailable { .. })
    }

    /// Message suitable for showing next to a retry button.
    pub fn user_message(&self) -> String {
        match self {
            SnapshotError::Unavailable { .. } => {
                "No snapshot available yet: the camera must be active and decoding frames."
                    .to_string()
            }
            other => format!("Failed to load snapshot: {}", other),
        }
    }
}
