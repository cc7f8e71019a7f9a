//! Round state and the session object passed to `tick`
//!
//! Everything the per-frame driver reads or writes lives in `GameState`;
//! there is no ambient game state anywhere else.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::ball::Ball;
use super::boundary::{Boundary, BoundaryHandler, LineColor, PendingBoundary, Stroke, StrokeStatus};
use super::collision::CanvasBounds;
use super::demo;
use super::geometry::Rect;
use crate::consts::*;
use crate::settings::LevelSettings;

/// Spawn positions thrown away for landing in the safe zone before giving up on it
const MAX_SPAWN_REJECTIONS: u32 = 1000;

/// How the session is driven
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    /// Timed round, cursor repulsion and player drawing
    Play,
    /// Attract mode behind the main menu; keeps clear of the menu panel
    MenuDemo,
    /// Attract mode over the whole canvas; lines are never cleared
    Pollock,
}

impl GameMode {
    pub fn is_demo(self) -> bool {
        self != GameMode::Play
    }
}

/// Round phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Playing,
    /// Every ball burst in time
    Won,
    /// The clock ran out
    Lost,
}

impl GamePhase {
    pub fn is_over(self) -> bool {
        self != GamePhase::Playing
    }

    /// Banner text for the end of a round
    pub fn message(self) -> &'static str {
        match self {
            GamePhase::Playing => "",
            GamePhase::Won => "BAMM! You Win!",
            GamePhase::Lost => "Oh Oh....Time's Up!",
        }
    }
}

/// Things the presentation layer reacts to (sounds, particles, menus)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A ball was trapped; spawn its burst effect at `pos`
    BallBurst { ball_id: u32, pos: Vec2 },
    /// A boundary turned solid at this index in the handler
    BoundaryAdded { index: usize },
    RoundWon,
    RoundLost,
}

/// A demo line being drawn in by the attract mode
#[derive(Debug, Clone, PartialEq)]
pub struct DemoLine {
    pub points: Vec<Vec2>,
    pub color: LineColor,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: u64,
    pub settings: LevelSettings,
    pub mode: GameMode,
    pub bounds: CanvasBounds,
    pub phase: GamePhase,
    /// Active balls (sorted by id for determinism)
    pub balls: Vec<Ball>,
    pub boundaries: BoundaryHandler,
    /// Finished strokes waiting out the draw delay
    pub pending: Vec<PendingBoundary>,
    /// Stroke the player is drawing right now
    pub stroke: Option<Stroke>,
    /// Line the demo is animating in
    pub demo_line: Option<DemoLine>,
    /// Frames simulated this round
    pub frame: u64,
    /// Whole seconds left on the clock
    pub time_remaining: u32,
    /// `None` = unlimited
    pub draws_remaining: Option<u32>,
    pub(crate) rng: Pcg32,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a session and spawn its balls
    pub fn new(settings: LevelSettings, mode: GameMode, bounds: CanvasBounds, seed: u64) -> Self {
        let mut state = Self {
            seed,
            mode,
            bounds,
            phase: GamePhase::Playing,
            balls: Vec::new(),
            boundaries: BoundaryHandler::new(),
            pending: Vec::new(),
            stroke: None,
            demo_line: None,
            frame: 0,
            time_remaining: settings.time_limit,
            draws_remaining: settings.draws_allowed,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            next_id: 1,
            settings,
        };

        state.spawn_balls();
        log::info!(
            "New {:?} session '{}' ({} balls, seed {})",
            mode,
            state.settings.level_name,
            state.balls.len(),
            seed
        );
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Centred panel the menu demo keeps clear of; `None` outside the menu
    pub fn safe_zone(&self) -> Option<Rect> {
        (self.mode == GameMode::MenuDemo)
            .then(|| Rect::centered(self.bounds.center(), SAFE_ZONE_WIDTH, SAFE_ZONE_HEIGHT))
    }

    /// Replace all balls with a fresh random set
    pub fn spawn_balls(&mut self) {
        self.balls.clear();
        let safe_zone = self.safe_zone();
        let mut rejected = 0;

        while self.balls.len() < self.settings.num_balls as usize {
            let pos = Vec2::new(
                self.rng.random::<f32>() * self.bounds.width,
                self.rng.random::<f32>() * self.bounds.height,
            );
            // A canvas smaller than the menu panel has nowhere else to go
            if rejected < MAX_SPAWN_REJECTIONS && safe_zone.is_some_and(|zone| zone.contains(pos)) {
                rejected += 1;
                continue;
            }
            let id = self.next_entity_id();
            let ball = Ball::new(id, pos, &self.settings, &mut self.rng);
            self.balls.push(ball);
        }
    }

    /// Canvas resized; balls outside get pushed back by the wall check
    pub fn resize(&mut self, bounds: CanvasBounds) {
        self.bounds = bounds;
    }

    pub fn all_burst(&self) -> bool {
        self.balls.iter().all(Ball::is_burst)
    }

    pub fn live_balls(&self) -> usize {
        self.balls.iter().filter(|b| !b.is_burst()).count()
    }

    /// Spend one draw; unlimited draws (and demos) always succeed
    pub fn use_draw(&mut self) -> bool {
        if self.mode.is_demo() {
            return true;
        }
        match self.draws_remaining {
            None => true,
            Some(0) => false,
            Some(n) => {
                self.draws_remaining = Some(n - 1);
                true
            }
        }
    }

    pub fn has_draws(&self) -> bool {
        self.draws_remaining.is_none_or(|n| n > 0)
    }

    /// Start a player stroke at `pos`
    ///
    /// Only in a running play round with draws left.
    pub fn begin_stroke(&mut self, pos: Vec2) -> bool {
        if self.mode != GameMode::Play || self.phase.is_over() || !self.has_draws() {
            return false;
        }
        let color = LineColor::random(&mut self.rng);
        self.stroke = Some(Stroke::new(pos, self.settings.max_line_length, color));
        true
    }

    /// Feed a pointer sample to the active stroke
    pub fn extend_stroke(&mut self, pos: Vec2) {
        let Some(stroke) = self.stroke.as_mut() else {
            return;
        };
        if stroke.extend(pos) == StrokeStatus::Full {
            self.end_stroke();
        }
    }

    /// Finish the active stroke and queue it behind the draw delay
    pub fn end_stroke(&mut self) -> bool {
        let Some(stroke) = self.stroke.take() else {
            return false;
        };
        if stroke.points.len() < 2 || !self.use_draw() {
            return false;
        }
        let delay = self.settings.draw_delay;
        log::debug!(
            "Stroke of {} points queued ({:.0}px, delay {} frames)",
            stroke.points.len(),
            stroke.length,
            delay
        );
        self.pending.push(PendingBoundary::new(stroke.into_boundary(), delay));
        true
    }

    /// Make a boundary solid right away
    pub fn add_boundary(&mut self, boundary: Boundary) -> bool {
        if !self.boundaries.add_boundary(boundary) {
            return false;
        }
        let index = self.boundaries.len() - 1;
        self.push_event(GameEvent::BoundaryAdded { index });
        true
    }

    /// Corner-cutting line aimed at the live ball closest to a canvas corner
    ///
    /// Lines crossing the menu safe zone are rejected like every other demo line.
    pub fn suggest_trap_line(&mut self) -> Option<Vec<Vec2>> {
        let points = demo::strategic_trap_line(&self.balls, self.bounds, &mut self.rng)?;
        if self.safe_zone().is_some_and(|zone| zone.intersects_polyline(&points)) {
            return None;
        }
        Some(points)
    }

    /// How far the in-flight demo line has been drawn in, 0.0..=1.0
    pub fn demo_line_progress(&self) -> f32 {
        if self.demo_line.is_none() {
            return 0.0;
        }
        let elapsed = self.frame % DEMO_LINE_INTERVAL;
        (elapsed as f32 / DEMO_LINE_ANIMATION as f32).min(1.0)
    }

    /// Start the round over with the same settings and a new seed
    pub fn restart(&mut self, seed: u64) {
        *self = Self::new(self.settings.clone(), self.mode, self.bounds, seed);
    }

    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
