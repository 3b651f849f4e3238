//! # Zonemark Core
//!
//! Annotation geometry for camera analytics regions: directed lines with an
//! optional entrance-side marker, and rectangle/pentagon/hexagon zones.
//! Provides polygon generation, vertex hit-testing over an R-tree of
//! handles, and the pointer-driven state machines of the line and zone
//! tools.
//!
//! Everything here works in canvas-space pixels and is UI-framework agnostic.

pub mod geometry;
pub mod line_tool;
pub mod resource;
pub mod spatial;
pub mod tool;
pub mod zone_tool;

pub use geometry::{
    generate_polygon, BBox, CanvasSize, LineGeometry, LineResult, LineSide, Point, ZoneGeometry,
    ZoneShape,
};
pub use line_tool::{LinePhase, LineTool, LineToolOptions};
pub use resource::{CameraId, ImageHandle};
pub use spatial::HandleIndex;
pub use tool::AnnotationTool;
pub use zone_tool::{ZonePhase, ZoneTool, ZoneToolOptions};
