//! # Zonemark App
//!
//! Host layer for the annotation tools: an [`AnnotationSession`] wires a
//! tool, the canvas viewport, the snapshot backdrop and a completion
//! callback together. Also provides gesture-script replay and the helpers
//! behind the `zonemark` binary.

pub mod error;
pub mod replay;
pub mod session;

use std::path::{Path, PathBuf};

use zonemark_check::{check_line, check_zone, GeometryViolation};
use zonemark_core::{CameraId, CanvasSize, LineResult, ZoneGeometry};
use zonemark_io::{provider_from_config, AnnotatorConfig, MemoryImageStore, SnapshotLoader};

pub use error::AppError;
pub use replay::{replay, GestureEvent, GestureScript, ReplayOutput, ToolKind};
pub use session::{AnnotationSession, CompletionCallback};

/// Load the config file if given, then apply command-line overrides.
pub fn load_config(
    path: Option<&Path>,
    snapshot_dir: Option<PathBuf>,
) -> Result<AnnotatorConfig, AppError> {
    let mut config = match path {
        Some(path) => AnnotatorConfig::load(path)?,
        None => AnnotatorConfig::default(),
    };
    if snapshot_dir.is_some() {
        config.snapshot_dir = snapshot_dir;
    }
    Ok(config)
}

/// A loader for `camera` backed by an in-memory image store.
pub fn open_snapshot(config: &AnnotatorConfig, camera: &str) -> SnapshotLoader {
    SnapshotLoader::new(
        CameraId::new(camera),
        provider_from_config(config),
        Box::new(MemoryImageStore::new()),
    )
}

/// Check a serialized result: a zone if it has `points`, otherwise a line.
pub fn check_result_json(
    json: &str,
    canvas: CanvasSize,
    require_entrance: bool,
) -> Result<Vec<GeometryViolation>, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if value.get("points").is_some() {
        let zone: ZoneGeometry = serde_json::from_value(value)?;
        Ok(check_zone(&zone, canvas))
    } else {
        let line: LineResult = serde_json::from_value(value)?;
        Ok(check_line(&line, canvas, require_entrance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zonemark_check::ViolationType;

    #[test]
    fn test_check_detects_kind() {
        let zone = r#"{"type": "rectangle", "points": [[0,0],[10,0],[10,10],[0,10]]}"#;
        assert!(check_result_json(zone, CanvasSize::default(), false).is_err());

        let zone = r#"{"type": "rectangle", "points": [
            {"x": 0, "y": 0}, {"x": 10, "y": 0}, {"x": 10, "y": 10}, {"x": 0, "y": 10}
        ]}"#;
        assert!(check_result_json(zone, CanvasSize::default(), false)
            .unwrap()
            .is_empty());

        let line = r#"{"line": {"x1": 0, "y1": 10, "x2": 100, "y2": 10}}"#;
        let found = check_result_json(line, CanvasSize::default(), true).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].violation_type, ViolationType::MissingEntrance);
    }

    #[test]
    fn test_cli_snapshot_dir_overrides_config() {
        let config = load_config(None, Some(PathBuf::from("/tmp/frames"))).unwrap();
        assert_eq!(config.snapshot_dir, Some(PathBuf::from("/tmp/frames")));
        assert!(load_config(None, None).unwrap().snapshot_dir.is_none());
    }
}
