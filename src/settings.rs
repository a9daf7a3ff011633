//! Game settings
//!
//! Read as JSON from LocalStorage on the web; native builds run on
//! defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Tunable knobs shared by all games
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Tick intervals ===
    /// Snake tick interval (ms)
    pub snake_tick_ms: u32,
    /// Bricks tick interval (ms)
    pub bricks_tick_ms: u32,

    // === Bricks ===
    /// Paddle travel per tick (px)
    pub paddle_speed: f32,
    /// Horizontal speed added by a paddle edge hit
    pub paddle_deflection: f32,

    // === Hangman ===
    /// Wrong guesses allowed before the round is lost
    pub hangman_max_wrong: u8,

    /// Fixed RNG seed for reproducible runs (None = seeded from the clock)
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            snake_tick_ms: SNAKE_TICK_MS,
            bricks_tick_ms: BRICKS_TICK_MS,
            paddle_speed: PADDLE_SPEED,
            paddle_deflection: PADDLE_DEFLECTION,
            hangman_max_wrong: HANGMAN_MAX_WRONG,
            seed: None,
        }
    }
}

impl Settings {
    pub fn snake_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.snake_tick_ms))
    }

    pub fn bricks_interval(&self) -> Duration {
        Duration::from_millis(u64::from(self.bricks_tick_ms))
    }

    /// Parse settings JSON; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Settings>(json).map(Settings::sanitized)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Replace values the games cannot run with
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.snake_tick_ms == 0 {
            log::warn!("snake_tick_ms must be positive, using {}", defaults.snake_tick_ms);
            self.snake_tick_ms = defaults.snake_tick_ms;
        }
        if self.bricks_tick_ms == 0 {
            log::warn!("bricks_tick_ms must be positive, using {}", defaults.bricks_tick_ms);
            self.bricks_tick_ms = defaults.bricks_tick_ms;
        }
        if !(self.paddle_speed.is_finite() && self.paddle_speed > 0.0) {
            log::warn!("paddle_speed must be positive, using {}", defaults.paddle_speed);
            self.paddle_speed = defaults.paddle_speed;
        }
        if !self.paddle_deflection.is_finite() {
            self.paddle_deflection = defaults.paddle_deflection;
        }
        if self.hangman_max_wrong == 0 {
            self.hangman_max_wrong = defaults.hangman_max_wrong;
        }
        self
    }

    /// LocalStorage key, written by the page that hosts the games
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "arcade_trio_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {e}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native builds run on defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
