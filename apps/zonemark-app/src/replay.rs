//! Scripted gesture replay.
//!
//! A script is a JSON document naming the tool and a list of client-space
//! pointer and command events. Replaying drives a real
//! [`AnnotationSession`], so the emitted geometry and rendered frames are
//! exactly what an interactive host would produce.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use zonemark_core::{
    AnnotationTool, CanvasSize, LineTool, LineToolOptions, ZoneShape, ZoneTool, ZoneToolOptions,
};
use zonemark_io::{AnnotatorConfig, SnapshotLoader};
use zonemark_renderer::{DisplayRect, RenderFrame, Scene};

use crate::error::AppError;
use crate::session::AnnotationSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    Line,
    Zone,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GestureEvent {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp { x: f64, y: f64 },
    Confirm,
    Complete,
    Cancel,
    Reset,
    SetShape { shape: ZoneShape },
    Resize { display: DisplayRect },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GestureScript {
    pub tool: ToolKind,
    #[serde(default)]
    pub shape: ZoneShape,
    /// Overrides the configured default when present.
    #[serde(default)]
    pub require_entrance_side: Option<bool>,
    #[serde(default)]
    pub canvas: Option<CanvasSize>,
    #[serde(default)]
    pub display: Option<DisplayRect>,
    pub events: Vec<GestureEvent>,
}

impl GestureScript {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let json = std::fs::read_to_string(path).map_err(|source| AppError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| AppError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayOutput {
    pub tool: ToolKind,
    /// Emitted geometry, `null` if the session never confirmed.
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_error: Option<String>,
    pub redraws: usize,
    #[serde(skip)]
    pub frames: Vec<RenderFrame>,
}

/// Replay `script` through a fresh session, optionally over a snapshot.
pub fn replay(
    script: &GestureScript,
    config: &AnnotatorConfig,
    snapshot: Option<SnapshotLoader>,
    record_frames: bool,
) -> Result<ReplayOutput, AppError> {
    let canvas = script.canvas.unwrap_or(config.canvas);
    log::info!(
        "Replaying {} event(s) with the {:?} tool",
        script.events.len(),
        script.tool
    );

    match script.tool {
        ToolKind::Line => {
            let tool = LineTool::new(LineToolOptions {
                require_entrance_side: script
                    .require_entrance_side
                    .unwrap_or(config.require_entrance_side),
            });
            drive(tool, canvas, script, config, snapshot, record_frames, |_, event| {
                Err(format!("{:?} is not supported by the line tool", event))
            })
        }
        ToolKind::Zone => {
            let tool = ZoneTool::new(ZoneToolOptions {
                shape: script.shape,
                hit_radius: config.vertex_hit_radius,
            });
            drive(tool, canvas, script, config, snapshot, record_frames, |session, event| {
                match event {
                    GestureEvent::SetShape { shape } => {
                        session.update_tool(|t| t.set_shape(*shape));
                        Ok(())
                    }
                    other => Err(format!("{:?} is not supported by the zone tool", other)),
                }
            })
        }
    }
}

fn drive<T>(
    tool: T,
    canvas: CanvasSize,
    script: &GestureScript,
    config: &AnnotatorConfig,
    snapshot: Option<SnapshotLoader>,
    record_frames: bool,
    mut tool_event: impl FnMut(&mut AnnotationSession<T>, &GestureEvent) -> Result<(), String>,
) -> Result<ReplayOutput, AppError>
where
    T: AnnotationTool + Scene + 'static,
    T::Output: Serialize + 'static,
{
    let emitted: Rc<RefCell<Option<T::Output>>> = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&emitted);
    let mut session = AnnotationSession::new(tool, canvas, config.style.clone(), move |out| {
        *sink.borrow_mut() = Some(out);
    });
    if let Some(display) = script.display {
        session.set_display_rect(display);
    }

    let mut snapshot_error = None;
    if let Some(loader) = snapshot {
        session = session.with_snapshot(loader);
        // Allow a little beyond the HTTP timeout for decode
        let budget = config.request_timeout() + Duration::from_secs(1);
        if !session.wait_for_snapshot(budget) {
            snapshot_error = Some("Timed out waiting for snapshot".to_string());
        }
        snapshot_error = snapshot_error.or_else(|| {
            session
                .snapshot()
                .and_then(|loader| loader.error_message().map(str::to_string))
        });
    }

    let mut frames = Vec::new();
    if record_frames {
        frames.push(session.frame().clone());
    }

    for (i, event) in script.events.iter().enumerate() {
        if session.is_closed() {
            log::debug!("Session closed, skipping event {}", i);
            continue;
        }
        match event {
            GestureEvent::PointerDown { x, y } => {
                session.pointer_down(*x, *y);
            }
            GestureEvent::PointerMove { x, y } => {
                session.pointer_move(*x, *y);
            }
            GestureEvent::PointerUp { x, y } => {
                session.pointer_up(*x, *y);
            }
            GestureEvent::Confirm => {
                session.confirm();
            }
            GestureEvent::Complete => {
                session.complete();
            }
            GestureEvent::Cancel => {
                session.cancel();
            }
            GestureEvent::Reset => {
                session.reset();
            }
            GestureEvent::Resize { display } => session.set_display_rect(*display),
            other => tool_event(&mut session, other)
                .map_err(|e| AppError::Script(format!("event {}: {}", i, e)))?,
        }
        if record_frames {
            frames.push(session.frame().clone());
        }
    }

    let result = emitted
        .borrow_mut()
        .take()
        .map(|out| serde_json::to_value(&out))
        .transpose()?;

    Ok(ReplayOutput {
        tool: script.tool,
        result,
        snapshot_error,
        redraws: session.redraw_count(),
        frames,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(json: &str) -> GestureScript {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_events() {
        let s = script(
            r#"{
                "tool": "zone",
                "shape": "pentagon",
                "display": {"left": 10, "top": 20, "width": 320, "height": 240},
                "events": [
                    {"type": "pointerDown", "x": 60, "y": 70},
                    {"type": "setShape", "shape": "hexagon"},
                    {"type": "confirm"}
                ]
            }"#,
        );
        assert_eq!(s.tool, ToolKind::Zone);
        assert_eq!(s.shape, ZoneShape::Pentagon);
        assert_eq!(s.events.len(), 3);
        assert_eq!(
            s.events[1],
            GestureEvent::SetShape {
                shape: ZoneShape::Hexagon
            }
        );
    }

    #[test]
    fn test_replay_hexagon_with_shape_switch() {
        let s = script(
            r#"{
                "tool": "zone",
                "events": [
                    {"type": "pointerDown", "x": 100, "y": 100},
                    {"type": "pointerMove", "x": 200, "y": 200},
                    {"type": "setShape", "shape": "hexagon"},
                    {"type": "pointerUp", "x": 300, "y": 300},
                    {"type": "confirm"},
                    {"type": "reset"}
                ]
            }"#,
        );
        let out = replay(&s, &AnnotatorConfig::default(), None, true).unwrap();
        let result = out.result.unwrap();
        assert_eq!(result["type"], "hexagon");
        assert_eq!(result["points"].as_array().unwrap().len(), 6);
        // Initial frame plus one per event; the reset after confirm is skipped
        assert_eq!(out.frames.len(), 6);
    }

    #[test]
    fn test_replay_line_without_confirm_emits_nothing() {
        let s = script(
            r#"{
                "tool": "line",
                "requireEntranceSide": true,
                "events": [
                    {"type": "pointerDown", "x": 10, "y": 10},
                    {"type": "pointerUp", "x": 200, "y": 10},
                    {"type": "confirm"}
                ]
            }"#,
        );
        let out = replay(&s, &AnnotatorConfig::default(), None, false).unwrap();
        assert!(out.result.is_none());
        assert!(out.frames.is_empty());
    }

    #[test]
    fn test_shape_event_rejected_for_line() {
        let s = script(
            r#"{"tool": "line", "events": [{"type": "setShape", "shape": "pentagon"}]}"#,
        );
        let err = replay(&s, &AnnotatorConfig::default(), None, false).unwrap_err();
        assert!(matches!(err, AppError::Script(_)));
    }
}
