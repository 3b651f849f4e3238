use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::spatial::HandleIndex;

/// Default vertex hit radius in canvas pixels.
pub const VERTEX_HIT_RADIUS: f64 = 10.0;

/// Gestures shorter than this (canvas pixels) are treated as clicks.
pub const MIN_GESTURE_LENGTH: f64 = 1.0;

/// A 2D point in canvas pixel coordinates (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn midpoint(&self, other: &Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Fixed intrinsic resolution of the drawing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl CanvasSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, p: &Point) -> bool {
        p.x >= 0.0 && p.x <= self.width && p.y >= 0.0 && p.y <= self.height
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 480.0,
        }
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub min: Point,
    pub max: Point,
}

impl BBox {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// Box spanned by two arbitrary corners of a drag gesture.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let mut bbox = Self::new(*first, *first);
        for p in &points[1..] {
            bbox.min.x = bbox.min.x.min(p.x);
            bbox.min.y = bbox.min.y.min(p.y);
            bbox.max.x = bbox.max.x.max(p.x);
            bbox.max.y = bbox.max.y.max(p.y);
        }
        Some(bbox)
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        self.min.midpoint(&self.max)
    }
}

/// Which side of a directed line a point falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineSide {
    Left,
    Right,
    On,
}

/// A directed segment, start → end in drawing order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineGeometry {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl LineGeometry {
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            x1: start.x,
            y1: start.y,
            x2: end.x,
            y2: end.y,
        }
    }

    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    pub fn length(&self) -> f64 {
        self.start().distance_to(&self.end())
    }

    /// Direction of travel in radians, measured in canvas space (y down).
    pub fn angle(&self) -> f64 {
        (self.y2 - self.y1).atan2(self.x2 - self.x1)
    }

    /// Signed cross product of (end - start) × (p - start).
    pub fn cross(&self, p: &Point) -> f64 {
        (self.x2 - self.x1) * (p.y - self.y1) - (self.y2 - self.y1) * (p.x - self.x1)
    }

    /// Classify `p` against the infinite extension of this line.
    ///
    /// Canvas y grows downwards, so a positive cross product is to the
    /// right of the direction of travel as seen on screen.
    pub fn side_of(&self, p: &Point, tolerance: f64) -> LineSide {
        let length = self.length();
        if length == 0.0 {
            return LineSide::On;
        }
        let distance = self.cross(p) / length;
        if distance.abs() <= tolerance {
            LineSide::On
        } else if distance > 0.0 {
            LineSide::Right
        } else {
            LineSide::Left
        }
    }
}

/// The result emitted by the line tool on confirm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineResult {
    pub line: LineGeometry,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrance_side: Option<Point>,
}

impl LineResult {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Polygon shapes the zone tool can generate from a drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneShape {
    #[default]
    Rectangle,
    Pentagon,
    Hexagon,
}

impl ZoneShape {
    pub fn vertex_count(self) -> usize {
        match self {
            ZoneShape::Rectangle => 4,
            ZoneShape::Pentagon => 5,
            ZoneShape::Hexagon => 6,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ZoneShape::Rectangle => "rectangle",
            ZoneShape::Pentagon => "pentagon",
            ZoneShape::Hexagon => "hexagon",
        }
    }
}

impl fmt::Display for ZoneShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ZoneShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rectangle" => Ok(ZoneShape::Rectangle),
            "pentagon" => Ok(ZoneShape::Pentagon),
            "hexagon" => Ok(ZoneShape::Hexagon),
            other => Err(format!("unknown zone shape '{}'", other)),
        }
    }
}

/// Generate the vertex list for `shape` from a drag gesture.
pub fn generate_polygon(shape: ZoneShape, start: Point, end: Point) -> Vec<Point> {
    match shape {
        ZoneShape::Rectangle => vec![
            start,
            Point::new(end.x, start.y),
            end,
            Point::new(start.x, end.y),
        ],
        ZoneShape::Pentagon => regular_polygon(start, end, 5, -PI / 2.0),
        ZoneShape::Hexagon => regular_polygon(start, end, 6, 0.0),
    }
}

/// Regular `sides`-gon inscribed in the circle fitted to the gesture box.
fn regular_polygon(start: Point, end: Point, sides: usize, start_angle: f64) -> Vec<Point> {
    let bbox = BBox::from_corners(start, end);
    let center = bbox.center();
    let radius = (bbox.width() / 2.0).max(bbox.height() / 2.0);
    let step = 2.0 * PI / sides as f64;

    (0..sides)
        .map(|i| {
            let angle = start_angle + step * i as f64;
            Point::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            )
        })
        .collect()
}

/// A closed zone polygon. The last vertex joins back to the first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneGeometry {
    #[serde(rename = "type")]
    pub shape: ZoneShape,
    pub points: Vec<Point>,
}

impl ZoneGeometry {
    pub fn generate(shape: ZoneShape, start: Point, end: Point) -> Self {
        Self {
            shape,
            points: generate_polygon(shape, start, end),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }

    pub fn bbox(&self) -> Option<BBox> {
        BBox::from_points(&self.points)
    }

    /// Move one vertex. Count and order of vertices never change.
    pub fn move_vertex(&mut self, index: usize, to: Point) -> bool {
        match self.points.get_mut(index) {
            Some(p) => {
                *p = to;
                true
            }
            None => false,
        }
    }

    /// Lowest-index vertex within `radius` of `p`, if any.
    pub fn vertex_at(&self, p: &Point, radius: f64) -> Option<usize> {
        HandleIndex::build(&self.points).hit(p, radius)
    }

    /// Polygon edges as (from, to) pairs, including the closing edge.
    pub fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }

    /// Signed shoelace area; positive when vertices run clockwise on screen.
    pub fn signed_area(&self) -> f64 {
        self.edges()
            .map(|(a, b)| a.x * b.y - b.x * a.y)
            .sum::<f64>()
            / 2.0
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_point(p: &Point, x: f64, y: f64) {
        assert!(
            (p.x - x).abs() < 1e-9 && (p.y - y).abs() < 1e-9,
            "expected ({}, {}), got ({}, {})",
            x,
            y,
            p.x,
            p.y
        );
    }

    #[test]
    fn test_point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_rectangle_generation_order() {
        let pts = generate_polygon(
            ZoneShape::Rectangle,
            Point::new(10.0, 10.0),
            Point::new(110.0, 60.0),
        );
        assert_eq!(pts.len(), 4);
        assert_point(&pts[0], 10.0, 10.0);
        assert_point(&pts[1], 110.0, 10.0);
        assert_point(&pts[2], 110.0, 60.0);
        assert_point(&pts[3], 10.0, 60.0);
    }

    #[test]
    fn test_pentagon_starts_at_top() {
        let pts = generate_polygon(
            ZoneShape::Pentagon,
            Point::new(100.0, 100.0),
            Point::new(200.0, 160.0),
        );
        assert_eq!(pts.len(), 5);
        // center (150, 130), radius max(50, 30) = 50
        assert_point(&pts[0], 150.0, 80.0);
        for p in &pts {
            assert!((p.distance_to(&Point::new(150.0, 130.0)) - 50.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_hexagon_starts_at_zero_angle() {
        let pts = generate_polygon(
            ZoneShape::Hexagon,
            Point::new(0.0, 0.0),
            Point::new(40.0, 100.0),
        );
        assert_eq!(pts.len(), 6);
        // center (20, 50), radius 50
        assert_point(&pts[0], 70.0, 50.0);
        assert_point(&pts[3], -30.0, 50.0);
    }

    #[test]
    fn test_vertex_counts_survive_degenerate_gesture() {
        let p = Point::new(42.0, 17.0);
        for shape in [ZoneShape::Rectangle, ZoneShape::Pentagon, ZoneShape::Hexagon] {
            let pts = generate_polygon(shape, p, p);
            assert_eq!(pts.len(), shape.vertex_count());
            for v in &pts {
                assert_point(v, 42.0, 17.0);
            }
        }
    }

    #[test]
    fn test_vertex_counts_for_arbitrary_gestures() {
        let gestures = [
            (Point::new(0.0, 0.0), Point::new(640.0, 480.0)),
            (Point::new(300.0, 20.0), Point::new(12.5, 400.25)),
            (Point::new(-5.0, 10.0), Point::new(5.0, -10.0)),
        ];
        for (start, end) in gestures {
            assert_eq!(generate_polygon(ZoneShape::Pentagon, start, end).len(), 5);
            assert_eq!(generate_polygon(ZoneShape::Hexagon, start, end).len(), 6);
        }
    }

    #[test]
    fn test_move_vertex_keeps_other_vertices() {
        let mut zone = ZoneGeometry::generate(
            ZoneShape::Hexagon,
            Point::new(100.0, 100.0),
            Point::new(300.0, 300.0),
        );
        let before = zone.points.clone();
        assert!(zone.move_vertex(2, Point::new(5.0, 5.0)));
        assert_eq!(zone.vertex_count(), 6);
        for (i, (old, new)) in before.iter().zip(&zone.points).enumerate() {
            if i == 2 {
                assert_point(new, 5.0, 5.0);
            } else {
                assert_eq!(old, new);
            }
        }
        assert!(!zone.move_vertex(6, Point::new(0.0, 0.0)));
        assert_eq!(zone.vertex_count(), 6);
    }

    #[test]
    fn test_line_side_classification() {
        let line = LineGeometry::new(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        assert_eq!(line.side_of(&Point::new(50.0, 20.0), 0.5), LineSide::Right);
        assert_eq!(line.side_of(&Point::new(50.0, -20.0), 0.5), LineSide::Left);
        assert_eq!(line.side_of(&Point::new(500.0, 0.2), 0.5), LineSide::On);
    }

    #[test]
    fn test_zone_json_uses_type_key() {
        let zone = ZoneGeometry::generate(
            ZoneShape::Rectangle,
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
        );
        let value: serde_json::Value = serde_json::from_str(&zone.to_json().unwrap()).unwrap();
        assert_eq!(value["type"], "rectangle");
        assert_eq!(value["points"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn test_line_result_json_shape() {
        let result = LineResult {
            line: LineGeometry::new(Point::new(1.0, 2.0), Point::new(3.0, 4.0)),
            entrance_side: Some(Point::new(9.0, 9.0)),
        };
        let value: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
        assert_eq!(value["line"]["x1"], 1.0);
        assert_eq!(value["line"]["y2"], 4.0);
        assert_eq!(value["entranceSide"]["x"], 9.0);

        let bare = LineResult {
            entrance_side: None,
            ..result
        };
        let value: serde_json::Value = serde_json::from_str(&bare.to_json().unwrap()).unwrap();
        assert!(value.get("entranceSide").is_none());
    }

    #[test]
    fn test_shape_parse() {
        assert_eq!("Pentagon".parse::<ZoneShape>().unwrap(), ZoneShape::Pentagon);
        assert!("circle".parse::<ZoneShape>().is_err());
    }
}
