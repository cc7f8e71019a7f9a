//! Collision detection and response for balls against lines and walls
//!
//! Detection is pure: functions here return what was hit and how to resolve
//! it. Applying the resolution to a ball is the caller's job (see
//! `Ball::resolve_contact` and `BoundaryHandler::check_and_resolve_collision`).

use glam::Vec2;

use super::geometry::closest_point_on_segment;

/// What a ball hit during a frame
///
/// A ball resolves at most one contact per frame, so this is a single value
/// rather than a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionKind {
    #[default]
    None,
    /// One of the four canvas edges
    Wall,
    /// A drawn boundary polyline
    Boundary,
}

impl CollisionKind {
    pub fn is_hit(self) -> bool {
        self != CollisionKind::None
    }
}

/// Canvas extents; walls sit at x = 0, x = width, y = 0 and y = height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasBounds {
    pub width: f32,
    pub height: f32,
}

impl CanvasBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(0.0, 0.0),
            Vec2::new(self.width, 0.0),
            Vec2::new(0.0, self.height),
            Vec2::new(self.width, self.height),
        ]
    }
}

/// An overlap between a ball and a line segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Closest point on the segment
    pub point: Vec2,
    /// Unit normal from the segment toward the ball centre
    pub normal: Vec2,
    /// How far the ball has sunk into the segment (radius - distance)
    pub penetration: f32,
}

/// Check a ball against a single segment
///
/// Hits only when the centre is strictly within `radius` of the segment and
/// not exactly on it: a zero distance has no usable normal, so it is left
/// unresolved. Zero-length segments never hit.
pub fn ball_segment_contact(ball_pos: Vec2, ball_radius: f32, a: Vec2, b: Vec2) -> Option<Contact> {
    let closest = closest_point_on_segment(ball_pos, a, b)?;
    let dist_vec = ball_pos - closest;
    let dist_sq = dist_vec.length_squared();

    if dist_sq > 0.0 && dist_sq < ball_radius * ball_radius {
        let distance = dist_sq.sqrt();
        return Some(Contact {
            point: closest,
            normal: dist_vec / distance,
            penetration: ball_radius - distance,
        });
    }

    None
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Check a ball against the canvas edges
///
/// Returns the clamped position and the velocity with the offending
/// components negated, or `None` if the ball is fully inside. Both axes are
/// checked, so a corner hit flips both components at once.
pub fn canvas_wall_collision(
    pos: Vec2,
    vel: Vec2,
    radius: f32,
    bounds: CanvasBounds,
) -> Option<(Vec2, Vec2)> {
    let mut pos = pos;
    let mut vel = vel;
    let mut hit = false;

    if pos.x + radius > bounds.width {
        pos.x = bounds.width - radius;
        vel.x = -vel.x;
        hit = true;
    } else if pos.x - radius < 0.0 {
        pos.x = radius;
        vel.x = -vel.x;
        hit = true;
    }

    if pos.y + radius > bounds.height {
        pos.y = bounds.height - radius;
        vel.y = -vel.y;
        hit = true;
    } else if pos.y - radius < 0.0 {
        pos.y = radius;
        vel.y = -vel.y;
        hit = true;
    }

    hit.then_some((pos, vel))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_contact_normal_points_at_ball() {
        let a = Vec2::new(0.0, 300.0);
        let b = Vec2::new(800.0, 300.0);

        // Ball above the line
        let contact = ball_segment_contact(Vec2::new(400.0, 290.0), 20.0, a, b).unwrap();
        assert_eq!(contact.point, Vec2::new(400.0, 300.0));
        assert!((contact.normal - Vec2::new(0.0, -1.0)).length() < 1e-6);
        assert!((contact.penetration - 10.0).abs() < 1e-5);

        // Ball below the line
        let contact = ball_segment_contact(Vec2::new(400.0, 305.0), 20.0, a, b).unwrap();
        assert!((contact.normal - Vec2::new(0.0, 1.0)).length() < 1e-6);
    }

    #[test]
    fn test_segment_contact_miss() {
        let a = Vec2::new(0.0, 300.0);
        let b = Vec2::new(800.0, 300.0);

        assert!(ball_segment_contact(Vec2::new(400.0, 250.0), 20.0, a, b).is_none());
        // Exactly touching is not overlap
        assert!(ball_segment_contact(Vec2::new(400.0, 280.0), 20.0, a, b).is_none());
        // Past the end cap
        assert!(ball_segment_contact(Vec2::new(830.0, 300.0), 20.0, a, b).is_none());
    }

    #[test]
    fn test_segment_contact_end_cap() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(100.0, 0.0);

        let contact = ball_segment_contact(Vec2::new(110.0, 0.0), 20.0, a, b).unwrap();
        assert_eq!(contact.point, b);
        assert!((contact.normal - Vec2::X).length() < 1e-6);
    }

    #[test]
    fn test_zero_distance_and_degenerate_are_ignored() {
        let a = Vec2::new(0.0, 300.0);
        let b = Vec2::new(800.0, 300.0);
        assert!(ball_segment_contact(Vec2::new(400.0, 300.0), 20.0, a, b).is_none());
        assert!(ball_segment_contact(Vec2::new(0.0, 305.0), 20.0, a, a).is_none());
    }

    #[test]
    fn test_reflect_velocity() {
        // Ball moving right, hits vertical wall (normal pointing left)
        let velocity = Vec2::new(100.0, 0.0);
        let normal = Vec2::new(-1.0, 0.0);

        let reflected = reflect_velocity(velocity, normal);
        assert!((reflected.x - (-100.0)).abs() < 0.001);
        assert!(reflected.y.abs() < 0.001);
    }

    #[test]
    fn test_canvas_wall_collision() {
        let bounds = CanvasBounds::new(800.0, 600.0);

        // Inside - no collision
        assert!(canvas_wall_collision(Vec2::new(400.0, 300.0), Vec2::X, 20.0, bounds).is_none());

        // Right wall
        let (pos, vel) =
            canvas_wall_collision(Vec2::new(790.0, 300.0), Vec2::new(5.0, 1.0), 20.0, bounds)
                .unwrap();
        assert_eq!(pos, Vec2::new(780.0, 300.0));
        assert_eq!(vel, Vec2::new(-5.0, 1.0));

        // Top-left corner flips both components
        let (pos, vel) =
            canvas_wall_collision(Vec2::new(5.0, 5.0), Vec2::new(-3.0, -4.0), 20.0, bounds)
                .unwrap();
        assert_eq!(pos, Vec2::new(20.0, 20.0));
        assert_eq!(vel, Vec2::new(3.0, 4.0));
    }
}
