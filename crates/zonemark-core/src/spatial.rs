use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::geometry::Point;

/// A vertex handle in the R-tree, referencing a polygon vertex by index.
#[derive(Debug, Clone, Copy)]
pub struct HandleEntry {
    /// Index into the polygon's vertex list.
    pub vertex_index: usize,
    pub position: [f64; 2],
}

impl RTreeObject for HandleEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position)
    }
}

impl PointDistance for HandleEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.position[0] - point[0];
        let dy = self.position[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Spatial index over vertex handles for pointer hit-testing.
pub struct HandleIndex {
    tree: RTree<HandleEntry>,
}

impl HandleIndex {
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Build the index from a polygon's vertices, in order.
    pub fn build(points: &[Point]) -> Self {
        let entries = points
            .iter()
            .enumerate()
            .map(|(vertex_index, p)| HandleEntry {
                vertex_index,
                position: [p.x, p.y],
            })
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// Find the vertex hit by `point`.
    ///
    /// A vertex is hit when its distance is at most `radius` (inclusive).
    /// When several vertices are within range the lowest index wins.
    pub fn hit(&self, point: &Point, radius: f64) -> Option<usize> {
        self.tree
            .locate_within_distance([point.x, point.y], radius * radius)
            .map(|entry| entry.vertex_index)
            .min()
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl std::fmt::Debug for HandleIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandleIndex")
            .field("handles", &self.tree.size())
            .finish()
    }
}

impl Default for HandleIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::VERTEX_HIT_RADIUS;

    #[test]
    fn test_hit_is_inclusive_at_threshold() {
        let index = HandleIndex::build(&[Point::new(100.0, 100.0)]);
        // 6-8-10 triangle: exactly 10px away
        assert_eq!(index.hit(&Point::new(106.0, 108.0), VERTEX_HIT_RADIUS), Some(0));
        assert_eq!(index.hit(&Point::new(110.0, 100.0), VERTEX_HIT_RADIUS), Some(0));
        assert_eq!(index.hit(&Point::new(110.1, 100.0), VERTEX_HIT_RADIUS), None);
    }

    #[test]
    fn test_overlapping_handles_resolve_to_lowest_index() {
        let index = HandleIndex::build(&[
            Point::new(50.0, 50.0),
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(2.0, 0.0),
        ]);
        // Vertex 3 is closest, but 1 is the lowest index in range.
        assert_eq!(index.hit(&Point::new(2.0, 0.0), VERTEX_HIT_RADIUS), Some(1));
    }

    #[test]
    fn test_empty_index() {
        let index = HandleIndex::new();
        assert!(index.is_empty());
        assert_eq!(index.hit(&Point::new(0.0, 0.0), VERTEX_HIT_RADIUS), None);
    }
}
