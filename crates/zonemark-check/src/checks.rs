use zonemark_core::geometry::MIN_GESTURE_LENGTH;
use zonemark_core::{BBox, CanvasSize, LineResult, LineSide, Point, ZoneGeometry};

use crate::violation::{GeometryViolation, Severity, ViolationType};

/// Markers closer than this to the line (canvas px) cannot pick a side.
pub const ENTRANCE_TOLERANCE: f64 = 0.5;

/// Vertices within this distance (canvas px) of a common line are collinear.
const COLLINEAR_TOLERANCE: f64 = 1e-6;

fn point_bbox(p: &Point) -> [f64; 4] {
    [p.x, p.y, p.x, p.y]
}

fn bbox_array(b: &BBox) -> [f64; 4] {
    [b.min.x, b.min.y, b.max.x, b.max.y]
}

fn out_of_bounds(index: usize, label: &str, p: &Point, canvas: CanvasSize) -> GeometryViolation {
    GeometryViolation::new(
        ViolationType::OutOfBounds,
        Severity::Warning,
        format!(
            "{} ({:.1}, {:.1}) lies outside the {}x{} canvas",
            label, p.x, p.y, canvas.width, canvas.height
        ),
    )
    .with_points(&[index])
    .with_bbox(point_bbox(p))
}

/// Check a confirmed zone polygon.
pub fn check_zone(zone: &ZoneGeometry, canvas: CanvasSize) -> Vec<GeometryViolation> {
    let mut violations = Vec::new();

    let expected = zone.shape.vertex_count();
    if zone.points.len() != expected {
        violations.push(GeometryViolation::new(
            ViolationType::VertexCount,
            Severity::Error,
            format!(
                "{} zone has {} points, expected {}",
                zone.shape,
                zone.points.len(),
                expected
            ),
        ));
    }

    for (i, p) in zone.points.iter().enumerate() {
        if !canvas.contains(p) {
            violations.push(out_of_bounds(i, &format!("vertex {}", i), p, canvas));
        }
    }

    if zone.points.len() >= 3 && is_collinear(&zone.points) {
        let mut v = GeometryViolation::new(
            ViolationType::ZeroArea,
            Severity::Error,
            "zone encloses no area".to_string(),
        );
        if let Some(bbox) = zone.bbox() {
            v = v.with_bbox(bbox_array(&bbox));
        }
        violations.push(v);
    } else {
        violations.extend(self_intersections(zone));
    }

    log::debug!("zone check: {} violation(s)", violations.len());
    violations
}

/// True when every vertex lies on one line, or all of them coincide.
/// A crossed polygon can have zero signed area without being degenerate.
fn is_collinear(pts: &[Point]) -> bool {
    let origin = pts[0];
    let Some(far) = pts
        .iter()
        .copied()
        .find(|p| p.distance_to(&origin) > COLLINEAR_TOLERANCE)
    else {
        return true;
    };
    let base = far.distance_to(&origin);
    pts.iter()
        .all(|&p| (orientation(origin, far, p) / base).abs() <= COLLINEAR_TOLERANCE)
}

/// Report every pair of non-adjacent edges that touch or cross.
fn self_intersections(zone: &ZoneGeometry) -> Vec<GeometryViolation> {
    let pts = &zone.points;
    let n = pts.len();
    let mut found = Vec::new();
    if n < 4 {
        return found;
    }

    for i in 0..n {
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue; // closing edge is adjacent to the first
            }
            let (a1, a2) = (pts[i], pts[(i + 1) % n]);
            let (b1, b2) = (pts[j], pts[(j + 1) % n]);
            if segments_intersect(a1, a2, b1, b2) {
                let bbox = BBox::from_points(&[a1, a2, b1, b2]).map(|b| bbox_array(&b));
                let mut v = GeometryViolation::new(
                    ViolationType::SelfIntersecting,
                    Severity::Warning,
                    format!("edge {}-{} crosses edge {}-{}", i, (i + 1) % n, j, (j + 1) % n),
                )
                .with_points(&[i, (i + 1) % n, j, (j + 1) % n]);
                if let Some(bbox) = bbox {
                    v = v.with_bbox(bbox);
                }
                found.push(v);
            }
        }
    }
    found
}

fn orientation(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn on_segment(a: Point, b: Point, p: Point) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Closed-segment intersection, including touching and collinear overlap.
pub fn segments_intersect(p1: Point, p2: Point, q1: Point, q2: Point) -> bool {
    let d1 = orientation(q1, q2, p1);
    let d2 = orientation(q1, q2, p2);
    let d3 = orientation(p1, p2, q1);
    let d4 = orientation(p1, p2, q2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(q1, q2, p1))
        || (d2 == 0.0 && on_segment(q1, q2, p2))
        || (d3 == 0.0 && on_segment(p1, p2, q1))
        || (d4 == 0.0 && on_segment(p1, p2, q2))
}

/// Check a confirmed line, optionally requiring an entrance marker.
pub fn check_line(
    result: &LineResult,
    canvas: CanvasSize,
    require_entrance: bool,
) -> Vec<GeometryViolation> {
    let mut violations = Vec::new();
    let line = &result.line;

    if line.length() < MIN_GESTURE_LENGTH {
        violations.push(
            GeometryViolation::new(
                ViolationType::DegenerateLine,
                Severity::Error,
                format!("line is only {:.2}px long", line.length()),
            )
            .with_points(&[0, 1]),
        );
    }

    for (i, label, p) in [(0, "line start", line.start()), (1, "line end", line.end())] {
        if !canvas.contains(&p) {
            violations.push(out_of_bounds(i, label, &p, canvas));
        }
    }

    match result.entrance_side {
        None if require_entrance => violations.push(GeometryViolation::new(
            ViolationType::MissingEntrance,
            Severity::Error,
            "entrance side is required but was not marked".to_string(),
        )),
        None => {}
        Some(marker) => {
            if !canvas.contains(&marker) {
                violations.push(out_of_bounds(2, "entrance marker", &marker, canvas));
            }
            if line.length() >= MIN_GESTURE_LENGTH
                && line.side_of(&marker, ENTRANCE_TOLERANCE) == LineSide::On
            {
                violations.push(
                    GeometryViolation::new(
                        ViolationType::EntranceOnLine,
                        Severity::Error,
                        "entrance marker lies on the line and does not pick a side".to_string(),
                    )
                    .with_points(&[2])
                    .with_bbox(point_bbox(&marker)),
                );
            }
        }
    }

    log::debug!("line check: {} violation(s)", violations.len());
    violations
}

pub fn has_errors(violations: &[GeometryViolation]) -> bool {
    violations.iter().any(|v| v.is_error())
}
