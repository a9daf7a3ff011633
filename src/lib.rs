//! Arcade Trio - three browser mini-games on one page
//!
//! Core modules:
//! - `sim`: Deterministic game rules (grid movement, bounce physics, word guessing)
//! - `input`: Key events and the per-game input trackers
//! - `session`: Fixed-tick session lifecycle (start, restart, destroy)
//! - `router`: Keeps exactly one game open at a time
//! - `render`: Draws game snapshots onto a host surface
//! - `platform`: Host abstraction (timers, keyboard, notifier, container)
//! - `settings`: Tick intervals and gameplay knobs

pub mod input;
pub mod platform;
pub mod render;
pub mod router;
pub mod session;
pub mod settings;
pub mod sim;

pub use router::ViewRouter;
pub use session::{Controller, Session, WordSession};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Snake cell size in pixels
    pub const SNAKE_CELL_PX: i32 = 20;
    /// Snake board in cells (480x480 px)
    pub const SNAKE_COLS: i32 = 24;
    pub const SNAKE_ROWS: i32 = 24;
    /// Spawn cell of a fresh snake
    pub const SNAKE_START: (i32, i32) = (12, 12);
    /// Snake tick interval (ms)
    pub const SNAKE_TICK_MS: u32 = 120;

    /// Bricks board in pixels
    pub const BRICKS_WIDTH: f32 = 560.0;
    pub const BRICKS_HEIGHT: f32 = 360.0;
    /// Bricks tick interval (ms, ~60 Hz)
    pub const BRICKS_TICK_MS: u32 = 16;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    /// Spawn height above the bottom edge
    pub const BALL_START_LIFT: f32 = 30.0;
    /// Velocity per tick at spawn
    pub const BALL_START_VEL: (f32, f32) = (3.0, -3.0);

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 90.0;
    pub const PADDLE_HEIGHT: f32 = 12.0;
    /// Gap between paddle and bottom edge
    pub const PADDLE_BOTTOM_GAP: f32 = 6.0;
    /// Travel per tick while a key is held
    pub const PADDLE_SPEED: f32 = 6.0;
    /// Horizontal speed added by an edge hit
    pub const PADDLE_DEFLECTION: f32 = 1.0;

    /// Brick wall layout
    pub const BRICK_ROWS: usize = 4;
    pub const BRICK_COLS: usize = 7;
    pub const BRICK_WIDTH: f32 = 70.0;
    pub const BRICK_HEIGHT: f32 = 18.0;
    pub const BRICK_PADDING: f32 = 10.0;
    pub const BRICK_OFFSET_TOP: f32 = 40.0;
    pub const BRICK_OFFSET_LEFT: f32 = 15.0;

    /// Hangman board in pixels
    pub const HANGMAN_WIDTH: u32 = 560;
    pub const HANGMAN_HEIGHT: u32 = 280;
    pub const HANGMAN_MAX_WRONG: u8 = 6;
}
