//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed per-frame timestep only
//! - Seeded RNG only
//! - Stable iteration order (balls by id, boundaries by insertion)
//! - No rendering or platform dependencies

pub mod ball;
pub mod boundary;
pub mod collision;
pub mod demo;
pub mod geometry;
pub mod state;
pub mod tick;

pub use ball::Ball;
pub use boundary::{Boundary, BoundaryHandler, LineColor, PendingBoundary, Stroke, StrokeStatus};
pub use collision::{CanvasBounds, CollisionKind, Contact, ball_segment_contact, reflect_velocity};
pub use geometry::Rect;
pub use state::{DemoLine, GameEvent, GameMode, GamePhase, GameState};
pub use tick::{TickInput, tick};
