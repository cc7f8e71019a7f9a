//! wasm-bindgen facade for the canvas front end
//!
//! The JavaScript layer owns rendering, menus and input devices. Once per
//! animation frame it feeds the pointer in, calls `advance` (or `tick`), and
//! reads back flat `Float32Array` snapshots to draw.

use glam::Vec2;
use js_sys::Float32Array;
use wasm_bindgen::prelude::*;

use crate::settings::{CustomGamePrefs, LevelSettings};
use crate::sim::{CanvasBounds, GameEvent, GameMode, GamePhase, GameState, TickInput, tick};

/// Simulation frame length in seconds
const FRAME_DT: f64 = 1.0 / 60.0;
/// Frames `advance` may run per call before dropping the backlog
const MAX_FRAMES_PER_ADVANCE: u32 = 8;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // A second init (hot reload) keeps the first logger
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Ball Trap core loaded");
}

fn session_seed() -> u64 {
    js_sys::Date::now() as u64
}

fn flatten(points: &[Vec2]) -> Float32Array {
    let flat: Vec<f32> = points.iter().flat_map(|p| [p.x, p.y]).collect();
    Float32Array::from(flat.as_slice())
}

/// One running session (play round or attract mode)
#[wasm_bindgen]
pub struct WebSession {
    state: GameState,
    input: TickInput,
    accumulator: f64,
    bursts: Vec<Vec2>,
}

impl WebSession {
    fn with_mode(settings: LevelSettings, mode: GameMode, width: f32, height: f32) -> Self {
        let seed = session_seed();
        let state = GameState::new(settings, mode, CanvasBounds::new(width, height), seed);
        Self {
            state,
            input: TickInput::default(),
            accumulator: 0.0,
            bursts: Vec::new(),
        }
    }

    fn collect_events(&mut self) {
        for event in self.state.drain_events() {
            if let GameEvent::BallBurst { pos, .. } = event {
                self.bursts.push(pos);
            }
        }
    }
}

#[wasm_bindgen]
impl WebSession {
    /// Timed round from JSON level settings
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: &str, width: f32, height: f32) -> Result<WebSession, JsValue> {
        let settings = LevelSettings::from_json(settings_json)
            .map_err(|e| JsValue::from_str(&format!("Invalid level settings: {e}")))?;
        Ok(Self::with_mode(settings, GameMode::Play, width, height))
    }

    /// Custom round from the saved custom game preferences
    pub fn custom(width: f32, height: f32) -> WebSession {
        let settings = CustomGamePrefs::load().to_settings();
        Self::with_mode(settings, GameMode::Play, width, height)
    }

    pub fn menu_demo(width: f32, height: f32) -> WebSession {
        Self::with_mode(LevelSettings::menu_demo(), GameMode::MenuDemo, width, height)
    }

    pub fn pollock(width: f32, height: f32) -> WebSession {
        Self::with_mode(LevelSettings::pollock(), GameMode::Pollock, width, height)
    }

    pub fn restart(&mut self) {
        self.state.restart(session_seed());
        self.accumulator = 0.0;
        self.bursts.clear();
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.resize(CanvasBounds::new(width, height));
    }

    pub fn set_cursor(&mut self, x: f32, y: f32) {
        self.input.cursor = Some(Vec2::new(x, y));
    }

    pub fn clear_cursor(&mut self) {
        self.input.cursor = None;
    }

    pub fn begin_stroke(&mut self, x: f32, y: f32) -> bool {
        self.state.begin_stroke(Vec2::new(x, y))
    }

    pub fn extend_stroke(&mut self, x: f32, y: f32) {
        self.state.extend_stroke(Vec2::new(x, y));
    }

    pub fn end_stroke(&mut self) -> bool {
        self.state.end_stroke()
    }

    /// Run exactly one frame and return the phase code
    pub fn tick(&mut self) -> u8 {
        tick(&mut self.state, &self.input);
        self.collect_events();
        self.phase()
    }

    /// Run as many frames as `dt` seconds of wall time cover
    ///
    /// Returns the number of frames simulated.
    pub fn advance(&mut self, dt: f64) -> u32 {
        self.accumulator += dt.min(0.1);

        let mut frames = 0;
        while self.accumulator >= FRAME_DT && frames < MAX_FRAMES_PER_ADVANCE {
            tick(&mut self.state, &self.input);
            self.accumulator -= FRAME_DT;
            frames += 1;
        }
        if frames == MAX_FRAMES_PER_ADVANCE {
            self.accumulator = 0.0;
        }

        self.collect_events();
        frames
    }

    /// 0 = playing, 1 = won, 2 = lost
    pub fn phase(&self) -> u8 {
        match self.state.phase {
            GamePhase::Playing => 0,
            GamePhase::Won => 1,
            GamePhase::Lost => 2,
        }
    }

    pub fn phase_message(&self) -> String {
        self.state.phase.message().to_string()
    }

    pub fn level_name(&self) -> String {
        self.state.settings.level_name.clone()
    }

    pub fn time_remaining(&self) -> u32 {
        self.state.time_remaining
    }

    /// -1 when draws are unlimited
    pub fn draws_remaining(&self) -> i32 {
        self.state.draws_remaining.map_or(-1, |n| n as i32)
    }

    pub fn live_balls(&self) -> usize {
        self.state.live_balls()
    }

    /// `[x, y, radius, burst]` per ball, burst as 0.0 / 1.0
    pub fn balls(&self) -> Float32Array {
        let flat: Vec<f32> = self
            .state
            .balls
            .iter()
            .flat_map(|b| [b.pos.x, b.pos.y, b.radius, if b.is_burst() { 1.0 } else { 0.0 }])
            .collect();
        Float32Array::from(flat.as_slice())
    }

    pub fn boundary_count(&self) -> usize {
        self.state.boundaries.len()
    }

    /// Flat `[x0, y0, x1, y1, ...]`; empty for an out of range index
    pub fn boundary_points(&self, index: usize) -> Float32Array {
        let points = self
            .state
            .boundaries
            .boundaries()
            .get(index)
            .map(|b| b.points.as_slice())
            .unwrap_or_default();
        flatten(points)
    }

    pub fn boundary_color(&self, index: usize) -> String {
        self.state
            .boundaries
            .boundaries()
            .get(index)
            .map(|b| b.color.hex().to_string())
            .unwrap_or_default()
    }

    pub fn pending_count(&self) -> usize {
        self.state.pending.len()
    }

    pub fn pending_points(&self, index: usize) -> Float32Array {
        let points = self
            .state
            .pending
            .get(index)
            .map(|p| p.boundary.points.as_slice())
            .unwrap_or_default();
        flatten(points)
    }

    pub fn pending_color(&self, index: usize) -> String {
        self.state
            .pending
            .get(index)
            .map(|p| p.boundary.color.hex().to_string())
            .unwrap_or_default()
    }

    pub fn pending_progress(&self, index: usize) -> f32 {
        self.state.pending.get(index).map_or(0.0, |p| p.progress())
    }

    /// Points of the stroke being drawn (empty when not drawing)
    pub fn stroke_points(&self) -> Float32Array {
        let points = self
            .state
            .stroke
            .as_ref()
            .map(|s| s.points.as_slice())
            .unwrap_or_default();
        flatten(points)
    }

    pub fn stroke_color(&self) -> String {
        self.state
            .stroke
            .as_ref()
            .map(|s| s.color.hex().to_string())
            .unwrap_or_default()
    }

    pub fn demo_line_points(&self) -> Float32Array {
        let points = self
            .state
            .demo_line
            .as_ref()
            .map(|l| l.points.as_slice())
            .unwrap_or_default();
        flatten(points)
    }

    pub fn demo_line_color(&self) -> String {
        self.state
            .demo_line
            .as_ref()
            .map(|l| l.color.hex().to_string())
            .unwrap_or_default()
    }

    pub fn demo_line_progress(&self) -> f32 {
        self.state.demo_line_progress()
    }

    /// Positions of balls that burst since the last call, flat `[x, y, ...]`
    pub fn take_bursts(&mut self) -> Float32Array {
        let bursts = std::mem::take(&mut self.bursts);
        flatten(&bursts)
    }

    /// Hint line cutting off the corner nearest a free ball (may be empty)
    pub fn suggest_trap_line(&mut self) -> Float32Array {
        let points = self.state.suggest_trap_line().unwrap_or_default();
        flatten(&points)
    }
}

/// Saved custom game preferences as JSON
#[wasm_bindgen]
pub fn load_custom_prefs() -> Result<String, JsValue> {
    serde_json::to_string(&CustomGamePrefs::load()).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub fn save_custom_prefs(time_limit: u32, num_balls: u32) {
    CustomGamePrefs {
        time_limit,
        num_balls,
    }
    .save();
}
