//! Ball Trap - trap bouncing balls with hand-drawn lines
//!
//! Core modules:
//! - `sim`: Deterministic simulation (ball physics, boundaries, round state)
//! - `settings`: Per-round configuration consumed by the simulation
//! - `web`: wasm-bindgen facade driven by the canvas front end (wasm32 only)

pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use settings::{CustomGamePrefs, LevelSettings};

/// Game configuration constants
pub mod consts {
    /// Simulation frames per second of game time (one `tick` = one frame)
    pub const FRAMES_PER_SECOND: u64 = 60;

    /// Sliding window of per-frame collision flags used by the trap check
    pub const TRAP_CHECK_FRAMES: usize = 120;
    /// Collisions within the window that count as frantic bouncing
    pub const TRAP_COLLISION_THRESHOLD: usize = 60;
    /// Below this speed a colliding ball counts as stuck
    pub const STUCK_SPEED_THRESHOLD: f32 = 1.5;
    /// Consecutive stuck frames before the ball bursts
    pub const STUCK_FRAMES_THRESHOLD: u32 = 30;

    /// Level 1 ball radius
    pub const BALL_RADIUS: f32 = 20.0;
    /// Level 1 maximum stroke length (pixels)
    pub const MAX_LINE_LENGTH: f32 = 1000.0;
    /// Minimum spacing between consecutive stroke points (pixels)
    pub const STROKE_POINT_SPACING: f32 = 10.0;

    /// Menu overlay footprint that demo balls and lines keep clear of
    pub const SAFE_ZONE_WIDTH: f32 = 450.0;
    pub const SAFE_ZONE_HEIGHT: f32 = 350.0;

    /// Frames between demo line spawns
    pub const DEMO_LINE_INTERVAL: u64 = 90;
    /// Frames a demo line spends animating before it becomes solid
    pub const DEMO_LINE_ANIMATION: u64 = 89;
}
