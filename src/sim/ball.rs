//! Ball kinematics, substep integration and the trap heuristics
//!
//! A ball is a circle that bounces off canvas walls and drawn boundaries.
//! It is "trapped" (burst) when it either bounces frantically or grinds
//! against something at low speed for too long.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;

use super::boundary::BoundaryHandler;
use super::collision::{CanvasBounds, CollisionKind, Contact, canvas_wall_collision, reflect_velocity};
use crate::consts::*;
use crate::settings::LevelSettings;

/// A ball entity
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub max_speed: f32,
    pub repel_radius: f32,
    pub repel_strength: f32,
    /// Set by whoever spawns the burst effect so it only happens once
    pub particles_created: bool,
    burst: bool,
    collided_this_frame: bool,
    /// Per-frame collision flags, oldest first
    collision_history: VecDeque<bool>,
    low_speed_frames: u32,
}

impl Ball {
    /// Spawn a ball at `pos` with a random heading and a speed drawn from
    /// the level's speed range
    pub fn new<R: Rng>(id: u32, pos: Vec2, settings: &LevelSettings, rng: &mut R) -> Self {
        let (min_speed, max_speed) = settings.ball_speed_range;
        let speed = min_speed + rng.random::<f32>() * (max_speed - min_speed);
        let angle = rng.random::<f32>() * std::f32::consts::TAU;
        let vel = Vec2::new(angle.cos(), angle.sin()) * speed;
        Self::with_velocity(id, pos, vel, settings)
    }

    /// Spawn a ball with a known velocity
    pub fn with_velocity(id: u32, pos: Vec2, vel: Vec2, settings: &LevelSettings) -> Self {
        Self {
            id,
            pos,
            vel,
            radius: settings.ball_radius,
            max_speed: settings.ball_max_speed,
            repel_radius: settings.cursor_repel_radius,
            repel_strength: settings.cursor_repel_strength,
            particles_created: false,
            burst: false,
            collided_this_frame: false,
            collision_history: VecDeque::with_capacity(TRAP_CHECK_FRAMES),
            low_speed_frames: 0,
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Burst balls are frozen for good: no motion, no collisions, no drawing
    #[inline]
    pub fn is_burst(&self) -> bool {
        self.burst
    }

    #[inline]
    pub fn collided_this_frame(&self) -> bool {
        self.collided_this_frame
    }

    /// Collisions recorded in the current trap window
    pub fn collision_count(&self) -> usize {
        self.collision_history.iter().filter(|&&c| c).count()
    }

    pub fn history_len(&self) -> usize {
        self.collision_history.len()
    }

    pub fn low_speed_frames(&self) -> u32 {
        self.low_speed_frames
    }

    /// Advance one frame
    ///
    /// Motion is split into substeps no longer than half a radius so thin
    /// lines cannot be tunnelled through. The first contact (boundary or
    /// wall) ends the frame's motion: only one collision is resolved per
    /// ball per frame, and the rest of the frame's displacement is dropped.
    pub fn update(
        &mut self,
        bounds: CanvasBounds,
        cursor: Option<Vec2>,
        boundaries: &BoundaryHandler,
    ) -> CollisionKind {
        if self.burst {
            return CollisionKind::None;
        }

        self.collided_this_frame = false;
        if let Some(cursor) = cursor {
            self.apply_repulsion(cursor);
        }

        let mut speed = self.speed();
        if speed > self.max_speed {
            self.vel = self.vel / speed * self.max_speed;
            speed = self.max_speed;
        }

        let substeps = (speed / (self.radius * 0.5)).ceil() as u32 + 1;
        let step = self.vel / substeps as f32;

        for _ in 0..substeps {
            self.pos += step;

            if boundaries.check_and_resolve_collision(self) {
                return CollisionKind::Boundary;
            }

            if let Some((pos, vel)) = canvas_wall_collision(self.pos, self.vel, self.radius, bounds) {
                self.pos = pos;
                self.vel = vel;
                self.collided_this_frame = true;
                return CollisionKind::Wall;
            }
        }

        CollisionKind::None
    }

    /// Push the ball out of a boundary and bounce it
    pub fn resolve_contact(&mut self, contact: &Contact) {
        self.pos += contact.normal * contact.penetration;
        self.vel = reflect_velocity(self.vel, contact.normal);
        self.collided_this_frame = true;
    }

    /// Cursor pushes the ball away with an inverse-square impulse
    ///
    /// Applied straight to velocity once per frame. No force at zero
    /// distance or at/after the repel radius.
    pub fn apply_repulsion(&mut self, cursor: Vec2) {
        let to_cursor = cursor - self.pos;
        let distance = to_cursor.length();
        if distance > 0.0 && distance < self.repel_radius {
            let force = self.repel_strength / (distance * distance);
            let away = -to_cursor / distance;
            self.vel += away * force;
        }
    }

    /// Record this frame's collision and burst the ball if it looks trapped
    ///
    /// Returns true only on the frame the ball bursts.
    pub fn check_if_trapped(&mut self) -> bool {
        if self.burst {
            return false;
        }

        self.collision_history.push_back(self.collided_this_frame);
        if self.collision_history.len() > TRAP_CHECK_FRAMES {
            self.collision_history.pop_front();
        }
        let frantic = self.collision_count() >= TRAP_COLLISION_THRESHOLD;

        if self.speed() < STUCK_SPEED_THRESHOLD && self.collided_this_frame {
            self.low_speed_frames += 1;
        } else {
            self.low_speed_frames = 0;
        }
        let stuck = self.low_speed_frames >= STUCK_FRAMES_THRESHOLD;

        if frantic || stuck {
            self.burst = true;
        }
        self.burst
    }

    #[cfg(test)]
    pub(crate) fn force_burst(&mut self) {
        self.burst = true;
    }
}
