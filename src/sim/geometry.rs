//! Plane geometry helpers for segments, polylines and rectangles
//!
//! Everything works on `glam::Vec2` in canvas pixels (y grows downward).

use glam::Vec2;

/// Closest point to `p` on the segment `a`-`b`
///
/// The projection parameter is clamped to [0, 1]. Returns `None` for a
/// zero-length segment.
pub fn closest_point_on_segment(p: Vec2, a: Vec2, b: Vec2) -> Option<Vec2> {
    let line_vec = b - a;
    let line_len_sq = line_vec.length_squared();
    if line_len_sq == 0.0 {
        return None;
    }

    let t = ((p - a).dot(line_vec) / line_len_sq).clamp(0.0, 1.0);
    Some(a + line_vec * t)
}

/// Distance from `p` to the segment `a`-`b` (a degenerate segment is a point)
pub fn point_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let closest = closest_point_on_segment(p, a, b).unwrap_or(a);
    p.distance(closest)
}

/// Whether segments `p1`-`p2` and `p3`-`p4` cross or touch
///
/// Parallel (including collinear) segments never count as intersecting.
pub fn segments_intersect(p1: Vec2, p2: Vec2, p3: Vec2, p4: Vec2) -> bool {
    let d = (p4.y - p3.y) * (p2.x - p1.x) - (p4.x - p3.x) * (p2.y - p1.y);
    if d == 0.0 {
        return false;
    }
    let t = ((p4.x - p3.x) * (p1.y - p3.y) - (p4.y - p3.y) * (p1.x - p3.x)) / d;
    let u = ((p2.x - p1.x) * (p1.y - p3.y) - (p2.y - p1.y) * (p1.x - p3.x)) / d;
    (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u)
}

/// Total length of a polyline
pub fn polyline_length(points: &[Vec2]) -> f32 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Axis-aligned rectangle (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle of the given size centred on `center`
    pub fn centered(center: Vec2, width: f32, height: f32) -> Self {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    /// Strict interior test (points on the edge are outside)
    pub fn contains(&self, p: Vec2) -> bool {
        p.x > self.x && p.x < self.x + self.width && p.y > self.y && p.y < self.y + self.height
    }

    /// Corners in clockwise order starting top-left
    pub fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.x, self.y),
            Vec2::new(self.x + self.width, self.y),
            Vec2::new(self.x + self.width, self.y + self.height),
            Vec2::new(self.x, self.y + self.height),
        ]
    }

    /// Whether the segment `a`-`b` enters the rectangle
    pub fn intersects_segment(&self, a: Vec2, b: Vec2) -> bool {
        if self.contains(a) || self.contains(b) {
            return true;
        }
        let c = self.corners();
        (0..4).any(|i| segments_intersect(a, b, c[i], c[(i + 1) % 4]))
    }

    /// Whether any segment of the polyline enters the rectangle
    pub fn intersects_polyline(&self, points: &[Vec2]) -> bool {
        points.windows(2).any(|w| self.intersects_segment(w[0], w[1]))
    }
}
