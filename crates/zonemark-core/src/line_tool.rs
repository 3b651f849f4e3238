use serde::{Deserialize, Serialize};

use crate::geometry::{LineGeometry, LineResult, Point, MIN_GESTURE_LENGTH};
use crate::tool::AnnotationTool;

/// Phases of a line annotation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinePhase {
    Idle,
    Drawing,
    Drawn,
    /// Confirm was requested but an entrance marker is still required.
    EntrancePending,
    EntranceMarked,
    Confirmed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineToolOptions {
    /// The line is not complete until an entrance side is marked.
    #[serde(default)]
    pub require_entrance_side: bool,
}

/// Draws a single directed line, optionally with an entrance-side marker.
#[derive(Debug, Clone)]
pub struct LineTool {
    options: LineToolOptions,
    phase: LinePhase,
    line: Option<LineGeometry>,
    entrance_side: Option<Point>,
    /// Line being replaced by an in-progress redraw.
    stashed: Option<LineGeometry>,
}

impl LineTool {
    pub fn new(options: LineToolOptions) -> Self {
        Self {
            options,
            phase: LinePhase::Idle,
            line: None,
            entrance_side: None,
            stashed: None,
        }
    }

    pub fn options(&self) -> LineToolOptions {
        self.options
    }

    pub fn phase(&self) -> LinePhase {
        self.phase
    }

    pub fn line(&self) -> Option<LineGeometry> {
        self.line
    }

    pub fn entrance_side(&self) -> Option<Point> {
        self.entrance_side
    }

    pub fn awaiting_entrance(&self) -> bool {
        self.phase == LinePhase::EntrancePending
    }

    /// Line drawn, and marked if a marker is required.
    pub fn is_complete(&self) -> bool {
        match self.phase {
            LinePhase::Drawn => !self.options.require_entrance_side,
            LinePhase::EntranceMarked | LinePhase::Confirmed => true,
            _ => false,
        }
    }

    fn transition(&mut self, next: LinePhase) {
        if self.phase != next {
            log::debug!("line tool: {:?} -> {:?}", self.phase, next);
            self.phase = next;
        }
    }

    fn result(&self) -> Option<LineResult> {
        self.line.map(|line| LineResult {
            line,
            entrance_side: self.entrance_side,
        })
    }
}

impl Default for LineTool {
    fn default() -> Self {
        Self::new(LineToolOptions::default())
    }
}

impl AnnotationTool for LineTool {
    type Output = LineResult;

    fn pointer_down(&mut self, p: Point) -> bool {
        match self.phase {
            LinePhase::Idle => {
                self.line = Some(LineGeometry::new(p, p));
                self.transition(LinePhase::Drawing);
                true
            }
            LinePhase::Drawn => {
                self.stashed = self.line.take();
                self.line = Some(LineGeometry::new(p, p));
                self.transition(LinePhase::Drawing);
                true
            }
            LinePhase::EntrancePending | LinePhase::EntranceMarked => {
                self.entrance_side = Some(p);
                self.transition(LinePhase::EntranceMarked);
                true
            }
            LinePhase::Drawing | LinePhase::Confirmed => false,
        }
    }

    fn pointer_move(&mut self, p: Point) -> bool {
        match (self.phase, self.line.as_mut()) {
            (LinePhase::Drawing, Some(line)) => {
                line.x2 = p.x;
                line.y2 = p.y;
                true
            }
            _ => false,
        }
    }

    fn pointer_up(&mut self, p: Point) -> bool {
        if self.phase != LinePhase::Drawing {
            return false;
        }
        let Some(line) = self.line.as_mut() else {
            return false;
        };
        line.x2 = p.x;
        line.y2 = p.y;

        if line.length() < MIN_GESTURE_LENGTH {
            // A click, not a line: fall back to whatever was there before.
            self.line = self.stashed.take();
            let next = if self.line.is_some() {
                LinePhase::Drawn
            } else {
                LinePhase::Idle
            };
            self.transition(next);
        } else {
            self.stashed = None;
            self.transition(LinePhase::Drawn);
        }
        true
    }

    fn can_confirm(&self) -> bool {
        matches!(self.phase, LinePhase::Drawn | LinePhase::EntranceMarked)
    }

    fn confirm(&mut self) -> Option<LineResult> {
        match self.phase {
            LinePhase::Drawn
                if self.options.require_entrance_side && self.entrance_side.is_none() =>
            {
                self.transition(LinePhase::EntrancePending);
                None
            }
            LinePhase::Drawn | LinePhase::EntranceMarked => {
                let result = self.result()?;
                self.transition(LinePhase::Confirmed);
                Some(result)
            }
            _ => None,
        }
    }

    /// Emit the result from `EntranceMarked`; does nothing elsewhere.
    fn complete(&mut self) -> Option<LineResult> {
        if self.phase == LinePhase::EntranceMarked {
            self.confirm()
        } else {
            None
        }
    }

    fn reset(&mut self) -> bool {
        let changed = self.phase != LinePhase::Idle
            || self.line.is_some()
            || self.entrance_side.is_some()
            || self.stashed.is_some();
        self.line = None;
        self.entrance_side = None;
        self.stashed = None;
        self.transition(LinePhase::Idle);
        changed
    }

    fn is_idle(&self) -> bool {
        self.phase == LinePhase::Idle
    }
}
