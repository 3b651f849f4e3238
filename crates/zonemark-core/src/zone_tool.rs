use serde::{Deserialize, Serialize};

use crate::geometry::{Point, ZoneGeometry, ZoneShape, MIN_GESTURE_LENGTH, VERTEX_HIT_RADIUS};
use crate::spatial::HandleIndex;
use crate::tool::AnnotationTool;

/// Phases of a zone annotation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZonePhase {
    Idle,
    Drawing,
    Drawn,
    VertexDragging { index: usize },
    Confirmed,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneToolOptions {
    pub shape: ZoneShape,
    /// Pointer distance (canvas px, inclusive) that grabs a vertex.
    pub hit_radius: f64,
}

impl Default for ZoneToolOptions {
    fn default() -> Self {
        Self {
            shape: ZoneShape::Rectangle,
            hit_radius: VERTEX_HIT_RADIUS,
        }
    }
}

/// Draws a rectangle/pentagon/hexagon zone and lets the user drag its vertices.
#[derive(Debug)]
pub struct ZoneTool {
    shape: ZoneShape,
    hit_radius: f64,
    phase: ZonePhase,
    zone: Option<ZoneGeometry>,
    /// Zone being replaced by an in-progress redraw.
    stashed: Option<ZoneGeometry>,
    drag_start: Option<Point>,
    last_pointer: Option<Point>,
    hovered: Option<usize>,
    handles: HandleIndex,
}

impl ZoneTool {
    pub fn new(options: ZoneToolOptions) -> Self {
        Self {
            shape: options.shape,
            hit_radius: options.hit_radius,
            phase: ZonePhase::Idle,
            zone: None,
            stashed: None,
            drag_start: None,
            last_pointer: None,
            hovered: None,
            handles: HandleIndex::new(),
        }
    }

    pub fn phase(&self) -> ZonePhase {
        self.phase
    }

    /// Shape used for the next (or in-progress) drawing gesture.
    pub fn shape(&self) -> ZoneShape {
        self.shape
    }

    pub fn zone(&self) -> Option<&ZoneGeometry> {
        self.zone.as_ref()
    }

    pub fn hovered_vertex(&self) -> Option<usize> {
        self.hovered
    }

    pub fn dragging_vertex(&self) -> Option<usize> {
        match self.phase {
            ZonePhase::VertexDragging { index } => Some(index),
            _ => None,
        }
    }

    pub fn hit_radius(&self) -> f64 {
        self.hit_radius
    }

    /// Change the shape. An in-progress drawing is regenerated immediately;
    /// a finished zone keeps its shape until the next gesture.
    pub fn set_shape(&mut self, shape: ZoneShape) -> bool {
        if self.phase == ZonePhase::Confirmed || self.shape == shape {
            return false;
        }
        log::debug!("zone tool: shape {} -> {}", self.shape, shape);
        self.shape = shape;
        if self.phase == ZonePhase::Drawing {
            self.regenerate();
        }
        true
    }

    fn transition(&mut self, next: ZonePhase) {
        if self.phase != next {
            log::debug!("zone tool: {:?} -> {:?}", self.phase, next);
            self.phase = next;
        }
    }

    fn begin_shape(&mut self, p: Point) {
        self.stashed = self.zone.take();
        self.drag_start = Some(p);
        self.last_pointer = Some(p);
        self.hovered = None;
        self.handles = HandleIndex::new();
        self.regenerate();
        self.transition(ZonePhase::Drawing);
    }

    fn regenerate(&mut self) {
        if let (Some(start), Some(end)) = (self.drag_start, self.last_pointer) {
            self.zone = Some(ZoneGeometry::generate(self.shape, start, end));
        }
    }

    /// Vertices have settled: rebuild the handle index and hover state.
    fn settle(&mut self, pointer: Point) {
        self.handles = match &self.zone {
            Some(zone) => HandleIndex::build(&zone.points),
            None => HandleIndex::new(),
        };
        self.hovered = self.handles.hit(&pointer, self.hit_radius);
    }
}

impl Default for ZoneTool {
    fn default() -> Self {
        Self::new(ZoneToolOptions::default())
    }
}

impl AnnotationTool for ZoneTool {
    type Output = ZoneGeometry;

    fn pointer_down(&mut self, p: Point) -> bool {
        match self.phase {
            ZonePhase::Idle => {
                self.begin_shape(p);
                true
            }
            ZonePhase::Drawn => {
                match self.handles.hit(&p, self.hit_radius) {
                    Some(index) => {
                        self.hovered = Some(index);
                        self.transition(ZonePhase::VertexDragging { index });
                    }
                    None => self.begin_shape(p),
                }
                true
            }
            ZonePhase::Drawing | ZonePhase::VertexDragging { .. } | ZonePhase::Confirmed => false,
        }
    }

    fn pointer_move(&mut self, p: Point) -> bool {
        match self.phase {
            ZonePhase::Drawing => {
                self.last_pointer = Some(p);
                self.regenerate();
                true
            }
            ZonePhase::VertexDragging { index } => self
                .zone
                .as_mut()
                .map(|zone| zone.move_vertex(index, p))
                .unwrap_or(false),
            ZonePhase::Idle | ZonePhase::Drawn => {
                let hovered = self.handles.hit(&p, self.hit_radius);
                let changed = hovered != self.hovered;
                self.hovered = hovered;
                changed
            }
            ZonePhase::Confirmed => false,
        }
    }

    /// Finalize the gesture. A drag shorter than `MIN_GESTURE_LENGTH` is a
    /// click: it restores the zone that was on the canvas before it, or
    /// returns to `Idle`, so a click never yields a degenerate zone.
    fn pointer_up(&mut self, p: Point) -> bool {
        match self.phase {
            ZonePhase::Drawing => {
                self.last_pointer = Some(p);
                let is_click = self
                    .drag_start
                    .map(|start| start.distance_to(&p) < MIN_GESTURE_LENGTH)
                    .unwrap_or(true);
                if is_click {
                    self.zone = self.stashed.take();
                } else {
                    self.regenerate();
                    self.stashed = None;
                }
                self.drag_start = None;
                let next = if self.zone.is_some() {
                    ZonePhase::Drawn
                } else {
                    ZonePhase::Idle
                };
                self.transition(next);
                self.settle(p);
                true
            }
            ZonePhase::VertexDragging { index } => {
                if let Some(zone) = self.zone.as_mut() {
                    zone.move_vertex(index, p);
                }
                self.transition(ZonePhase::Drawn);
                self.settle(p);
                true
            }
            _ => false,
        }
    }

    fn can_confirm(&self) -> bool {
        self.phase == ZonePhase::Drawn && self.zone.is_some()
    }

    fn confirm(&mut self) -> Option<ZoneGeometry> {
        if !self.can_confirm() {
            return None;
        }
        let zone = self.zone.clone()?;
        self.hovered = None;
        self.transition(ZonePhase::Confirmed);
        Some(zone)
    }

    fn reset(&mut self) -> bool {
        let changed = self.phase != ZonePhase::Idle
            || self.zone.is_some()
            || self.stashed.is_some()
            || self.hovered.is_some();
        self.zone = None;
        self.stashed = None;
        self.drag_start = None;
        self.last_pointer = None;
        self.hovered = None;
        self.handles = HandleIndex::new();
        self.transition(ZonePhase::Idle);
        changed
    }

    fn is_idle(&self) -> bool {
        self.phase == ZonePhase::Idle
    }
}
