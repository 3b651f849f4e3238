use serde::{Deserialize, Serialize};

/// Kind of geometry problem found by a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationType {
    OutOfBounds,
    VertexCount,
    ZeroArea,
    SelfIntersecting,
    DegenerateLine,
    MissingEntrance,
    EntranceOnLine,
}

/// Severity level of a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The geometry is unusable by analytics engines.
    Error,
    Warning,
}

/// A single finding with location and description.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometryViolation {
    pub violation_type: ViolationType,
    pub severity: Severity,
    pub message: String,
    /// Indices of the points involved (vertices, or 0/1/2 for a line's
    /// start, end and entrance marker).
    pub point_indices: Vec<usize>,
    /// Region to highlight: [min_x, min_y, max_x, max_y]
    pub bbox: Option<[f64; 4]>,
}

impl GeometryViolation {
    pub fn new(violation_type: ViolationType, severity: Severity, message: String) -> Self {
        Self {
            violation_type,
            severity,
            message,
            point_indices: Vec::new(),
            bbox: None,
        }
    }

    pub fn with_points(mut self, indices: &[usize]) -> Self {
        self.point_indices = indices.to_vec();
        self
    }

    pub fn with_bbox(mut self, bbox: [f64; 4]) -> Self {
        self.bbox = Some(bbox);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
