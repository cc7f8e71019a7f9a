//! Procedural lines for the non-interactive demo modes
//!
//! Generators return raw point lists; `validated` retries them until one
//! stays out of the menu safe zone.

use glam::Vec2;
use rand::Rng;

use super::ball::Ball;
use super::collision::CanvasBounds;
use super::geometry::Rect;

/// Attempts before giving up on a line for this cycle
const MAX_ATTEMPTS: u32 = 20;
/// Attempts at finding a second edge point far enough from the first
const MAX_ENDPOINT_ATTEMPTS: u32 = 32;

const MIN_LINE_SPAN: f32 = 400.0;
const MIN_SQUIGGLE_SPAN: f32 = 600.0;
const SQUIGGLE_SEGMENTS: usize = 30;
/// Balls further than this from every corner get no trap line
const TRAP_REACH: f32 = 400.0;

/// Uniformly random point on one of the four canvas edges
pub fn random_edge_point<R: Rng>(bounds: CanvasBounds, rng: &mut R) -> Vec2 {
    match rng.random_range(0..4) {
        0 => Vec2::new(rng.random::<f32>() * bounds.width, 0.0),
        1 => Vec2::new(bounds.width, rng.random::<f32>() * bounds.height),
        2 => Vec2::new(rng.random::<f32>() * bounds.width, bounds.height),
        _ => Vec2::new(0.0, rng.random::<f32>() * bounds.height),
    }
}

/// Two edge points at least `min_span` apart
fn edge_pair<R: Rng>(bounds: CanvasBounds, min_span: f32, rng: &mut R) -> Option<(Vec2, Vec2)> {
    let start = random_edge_point(bounds, rng);
    (0..MAX_ENDPOINT_ATTEMPTS)
        .map(|_| random_edge_point(bounds, rng))
        .find(|end| start.distance(*end) >= min_span)
        .map(|end| (start, end))
}

/// Straight edge-to-edge line
pub fn straight_line<R: Rng>(bounds: CanvasBounds, rng: &mut R) -> Vec<Vec2> {
    match edge_pair(bounds, MIN_LINE_SPAN, rng) {
        Some((a, b)) => vec![a, b],
        None => Vec::new(),
    }
}

/// Edge-to-edge sine wave
pub fn squiggle<R: Rng>(bounds: CanvasBounds, rng: &mut R) -> Vec<Vec2> {
    let Some((start, end)) = edge_pair(bounds, MIN_SQUIGGLE_SPAN, rng) else {
        return Vec::new();
    };

    let amplitude = rng.random::<f32>() * 60.0 + 30.0;
    let frequency = rng.random::<f32>() * 5.0 + 3.0;

    let line_vec = end - start;
    let line_len = line_vec.length();
    if line_len < 1.0 {
        return Vec::new();
    }
    let normal = Vec2::new(-line_vec.y, line_vec.x) / line_len;

    (0..=SQUIGGLE_SEGMENTS)
        .map(|i| {
            let t = i as f32 / SQUIGGLE_SEGMENTS as f32;
            let offset = (t * std::f32::consts::PI * frequency).sin() * amplitude;
            start + line_vec * t + normal * offset
        })
        .collect()
}

/// Diagonal that cuts off the canvas corner nearest to a live ball
///
/// Returns `None` when every live ball is further than 400 px from every
/// corner, or when there are no live balls.
pub fn strategic_trap_line<R: Rng>(
    balls: &[Ball],
    bounds: CanvasBounds,
    rng: &mut R,
) -> Option<Vec<Vec2>> {
    let (corner, dist) = balls
        .iter()
        .filter(|b| !b.is_burst())
        .flat_map(|b| bounds.corners().map(|c| (c, b.pos.distance(c))))
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))?;

    if dist > TRAP_REACH {
        return None;
    }

    let size = 200.0 + rng.random::<f32>() * 150.0;
    let (w, h) = (bounds.width, bounds.height);
    let points = match (corner.x == 0.0, corner.y == 0.0) {
        (true, true) => vec![Vec2::new(size, 0.0), Vec2::new(0.0, size)],
        (false, true) => vec![Vec2::new(w - size, 0.0), Vec2::new(w, size)],
        (true, false) => vec![Vec2::new(size, h), Vec2::new(0.0, h - size)],
        (false, false) => vec![Vec2::new(w - size, h), Vec2::new(w, h - size)],
    };
    Some(points)
}

/// Run `generator` until it yields a usable line that avoids `safe_zone`
///
/// Returns `None` after 20 failed attempts.
pub fn validated<R, F>(safe_zone: Option<Rect>, rng: &mut R, mut generator: F) -> Option<Vec<Vec2>>
where
    R: Rng,
    F: FnMut(&mut R) -> Vec<Vec2>,
{
    for _ in 0..MAX_ATTEMPTS {
        let points = generator(rng);
        if points.len() < 2 {
            continue;
        }
        if safe_zone.is_some_and(|zone| zone.intersects_polyline(&points)) {
            continue;
        }
        return Some(points);
    }
    log::debug!("No valid demo line after {MAX_ATTEMPTS} attempts");
    None
}
