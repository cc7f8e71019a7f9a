//! Round configuration and persisted custom-game preferences
//!
//! `LevelSettings` is everything the simulation needs to know about a round.
//! Values are trusted as given: the front end validates sliders and level
//! tables before handing them over.

use serde::{Deserialize, Serialize};

use crate::consts::{BALL_RADIUS, MAX_LINE_LENGTH};

/// Per-round tuning consumed by the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LevelSettings {
    /// Shown in the HUD
    pub level_name: String,
    /// Round length in seconds
    pub time_limit: u32,
    pub num_balls: u32,
    /// Strokes the player may commit (`None` = unlimited)
    pub draws_allowed: Option<u32>,
    /// Initial ball speed range in pixels per frame (min, max)
    pub ball_speed_range: (f32, f32),
    /// Speed cap in pixels per frame
    pub ball_max_speed: f32,
    /// Cursor repulsion reach in pixels
    pub cursor_repel_radius: f32,
    pub cursor_repel_strength: f32,
    /// Frames a finished stroke waits before it turns solid
    pub draw_delay: u32,
    pub ball_radius: f32,
    /// Maximum stroke length in pixels
    pub max_line_length: f32,
}

impl Default for LevelSettings {
    /// Level 1
    fn default() -> Self {
        Self {
            level_name: "Level 1".to_string(),
            time_limit: 60,
            num_balls: 1,
            draws_allowed: Some(15),
            ball_speed_range: (4.0, 7.0),
            ball_max_speed: 15.0,
            cursor_repel_radius: 120.0,
            cursor_repel_strength: 100.0,
            draw_delay: 0,
            ball_radius: BALL_RADIUS,
            max_line_length: MAX_LINE_LENGTH,
        }
    }
}

impl LevelSettings {
    /// Player-built round from the custom game menu
    pub fn custom(time_limit: u32, num_balls: u32) -> Self {
        Self {
            level_name: "Custom".to_string(),
            time_limit,
            num_balls,
            draws_allowed: None,
            ball_speed_range: (6.0, 7.0),
            ball_max_speed: 20.0,
            cursor_repel_radius: 150.0,
            cursor_repel_strength: 150.0,
            ..Self::default()
        }
    }

    /// Attract-mode round that plays behind the main menu
    pub fn menu_demo() -> Self {
        Self {
            level_name: "Level 3".to_string(),
            time_limit: 54,
            num_balls: 2,
            draws_allowed: Some(14),
            ball_speed_range: (5.14, 8.14),
            ball_max_speed: 18.55,
            cursor_repel_radius: 145.6,
            cursor_repel_strength: 171.1,
            ..Self::default()
        }
    }

    /// Lots of balls, no cursor, lines pile up into a painting
    pub fn pollock() -> Self {
        Self {
            level_name: "Pollock".to_string(),
            time_limit: 0,
            num_balls: 15,
            draws_allowed: None,
            ball_speed_range: (5.0, 12.0),
            ball_max_speed: 25.0,
            cursor_repel_radius: 0.0,
            cursor_repel_strength: 0.0,
            ball_radius: 15.0,
            ..Self::default()
        }
    }

    /// Parse settings handed over by the front end; missing fields fall
    /// back to level 1 values
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Last values picked in the custom game menu
///
/// Persisted separately from anything else in LocalStorage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CustomGamePrefs {
    pub time_limit: u32,
    pub num_balls: u32,
}

impl Default for CustomGamePrefs {
    fn default() -> Self {
        Self {
            time_limit: 60,
            num_balls: 5,
        }
    }
}

impl CustomGamePrefs {
    pub fn to_settings(self) -> LevelSettings {
        LevelSettings::custom(self.time_limit, self.num_balls)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "ball_trap_custom_game";

    /// Load preferences from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(prefs) = serde_json::from_str(&json) {
                    log::info!("Loaded custom game preferences");
                    return prefs;
                }
            }
        }

        log::info!("Using default custom game preferences");
        Self::default()
    }

    /// Save preferences to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Custom game preferences saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
