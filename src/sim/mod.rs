//! Deterministic game rules
//!
//! Everything that decides what happens in a game lives here:
//! - Fixed per-tick steps only, no wall-clock time
//! - Randomness only through a caller-supplied RNG
//! - Stable iteration order (bricks column-major, snake head first)
//! - No rendering or platform dependencies

pub mod bricks;
pub mod collision;
pub mod grid;
pub mod snake;
pub mod state;
pub mod word;

pub use bricks::{Ball, BounceTuning, Brick, BricksState, Paddle, PaddleKeys};
pub use collision::{
    PaddleContact, Rect, cells_equal, circle_rect_overlap, first_overlap, paddle_contact,
    wall_bounce,
};
pub use grid::{Cell, Direction};
pub use snake::SnakeState;
pub use state::{GameKind, GameStatus, Outcome, OutcomeReport};
pub use word::{Guess, HangmanState, WORDS, WordEntry};
