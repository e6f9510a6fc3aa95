use super::Point;
use itertools::Itertools;

/// Segment between two consecutive, distinct letter centers of a word.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub start: Point,
    pub end: Point,
    dx: f64,
    dy: f64,
    length_sq: f64,
}

impl LineSegment {
    /// Returns `None` for a degenerate segment.
    pub fn new(start: Point, end: Point) -> Option<Self> {
        if start == end {
            return None;
        }
        let dx = (end.x - start.x) as f64;
        let dy = (end.y - start.y) as f64;
        Some(Self {
            start,
            end,
            dx,
            dy,
            length_sq: dx * dx + dy * dy,
        })
    }

    pub fn length(&self) -> f64 {
        self.length_sq.sqrt()
    }

    /// Euclidean distance from `p` to the closest point of the segment.
    pub fn distance_to(&self, p: Point) -> f64 {
        let px = (p.x - self.start.x) as f64;
        let py = (p.y - self.start.y) as f64;
        let t = ((px * self.dx + py * self.dy) / self.length_sq).clamp(0.0, 1.0);
        (px - t * self.dx).hypot(py - t * self.dy)
    }
}

/// Joins consecutive points into segments. Repeated points (doubled letters)
/// are collapsed first so no segment is degenerate.
pub fn points_to_line_sequence(points: &[Point]) -> Vec<LineSegment> {
    points
        .iter()
        .copied()
        .dedup()
        .tuple_windows()
        .filter_map(|(a, b)| LineSegment::new(a, b))
        .collect()
}
