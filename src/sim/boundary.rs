//! Drawn boundary lines
//!
//! Boundaries are polylines drawn by the player (or by the demo) that balls
//! bounce off. A finished stroke first waits out the level's draw delay as a
//! `PendingBoundary`, then becomes solid in the `BoundaryHandler`.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::collision::{Contact, ball_segment_contact};
use crate::consts::STROKE_POINT_SPACING;

/// Crayon colors lines are drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineColor {
    Pink,
    Yellow,
    Cyan,
    Green,
    Orange,
}

impl LineColor {
    pub const ALL: [LineColor; 5] = [
        LineColor::Pink,
        LineColor::Yellow,
        LineColor::Cyan,
        LineColor::Green,
        LineColor::Orange,
    ];

    pub fn hex(self) -> &'static str {
        match self {
            LineColor::Pink => "#ec4899",
            LineColor::Yellow => "#facc15",
            LineColor::Cyan => "#22d3ee",
            LineColor::Green => "#4ade80",
            LineColor::Orange => "#f97316",
        }
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// A solid polyline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    pub points: Vec<Vec2>,
    pub color: LineColor,
}

impl Boundary {
    pub fn new(points: Vec<Vec2>, color: LineColor) -> Self {
        Self { points, color }
    }

    /// Consecutive point pairs in drawing order
    pub fn segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.points.windows(2).map(|w| (w[0], w[1]))
    }
}

/// All solid boundaries of the current round, in insertion order
#[derive(Debug, Clone, Default)]
pub struct BoundaryHandler {
    boundaries: Vec<Boundary>,
}

impl BoundaryHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a boundary; polylines with fewer than two points are dropped
    pub fn add_boundary(&mut self, boundary: Boundary) -> bool {
        if boundary.points.len() < 2 {
            log::debug!("Ignoring boundary with {} point(s)", boundary.points.len());
            return false;
        }
        self.boundaries.push(boundary);
        true
    }

    pub fn boundaries(&self) -> &[Boundary] {
        &self.boundaries
    }

    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }

    pub fn clear(&mut self) {
        self.boundaries.clear();
    }

    /// First segment (boundaries in insertion order, segments in drawing
    /// order) the circle overlaps
    pub fn find_contact(&self, pos: Vec2, radius: f32) -> Option<Contact> {
        self.boundaries
            .iter()
            .flat_map(Boundary::segments)
            .find_map(|(a, b)| ball_segment_contact(pos, radius, a, b))
    }

    /// Detect and resolve the first boundary contact for `ball`
    ///
    /// Resolution happens inside this call: the ball is pushed out along the
    /// contact normal and its velocity reflected. Later segments are not
    /// examined once one hits. Burst balls never collide.
    pub fn check_and_resolve_collision(&self, ball: &mut Ball) -> bool {
        if ball.is_burst() {
            return false;
        }
        match self.find_contact(ball.pos, ball.radius) {
            Some(contact) => {
                ball.resolve_contact(&contact);
                true
            }
            None => false,
        }
    }
}

/// A finished stroke waiting for the draw delay before it turns solid
#[derive(Debug, Clone, PartialEq)]
pub struct PendingBoundary {
    pub boundary: Boundary,
    /// Frames left until the line is solid
    pub timer: u32,
    /// Delay the line started with
    pub delay: u32,
}

impl PendingBoundary {
    pub fn new(boundary: Boundary, delay: u32) -> Self {
        Self {
            boundary,
            timer: delay,
            delay,
        }
    }

    /// Count down one frame; true once the line should become solid
    pub fn tick(&mut self) -> bool {
        self.timer = self.timer.saturating_sub(1);
        self.timer == 0
    }

    /// 0.0 when just drawn, 1.0 when ready (for fading the line in)
    pub fn progress(&self) -> f32 {
        if self.delay == 0 {
            1.0
        } else {
            1.0 - self.timer as f32 / self.delay as f32
        }
    }
}

/// Outcome of extending a stroke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeStatus {
    /// Point too close to the previous one, ignored
    Skipped,
    /// Point appended
    Extended,
    /// Point appended and the stroke hit its length limit
    Full,
}

/// A line the player is currently drawing
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub points: Vec<Vec2>,
    pub length: f32,
    pub max_length: f32,
    pub color: LineColor,
}

impl Stroke {
    pub fn new(start: Vec2, max_length: f32, color: LineColor) -> Self {
        Self {
            points: vec![start],
            length: 0.0,
            max_length,
            color,
        }
    }

    /// Append a pointer sample if it moved far enough from the last point
    pub fn extend(&mut self, pos: Vec2) -> StrokeStatus {
        let Some(&last) = self.points.last() else {
            self.points.push(pos);
            return StrokeStatus::Extended;
        };

        let segment = last.distance(pos);
        if segment <= STROKE_POINT_SPACING {
            return StrokeStatus::Skipped;
        }

        self.points.push(pos);
        self.length += segment;
        if self.length >= self.max_length {
            StrokeStatus::Full
        } else {
            StrokeStatus::Extended
        }
    }

    pub fn into_boundary(self) -> Boundary {
        Boundary::new(self.points, self.color)
    }
}
