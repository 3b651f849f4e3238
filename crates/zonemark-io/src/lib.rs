//! # Zonemark I/O
//!
//! Everything that leaves the process: camera snapshots fetched from the
//! analytics API or a local directory, the image store that owns decoded
//! frames, and JSON configuration files.

pub mod config;
pub mod snapshot;

pub use config::{AnnotatorConfig, ConfigError};
pub use snapshot::{
    provider_from_config, DirectoryFrameProvider, Frame, FrameProvider, HttpFrameProvider, ImageStore,
    MemoryImageStore, SnapshotError, SnapshotLoader, SnapshotStatus, StoredImage,
};
