//! Physics-bounce entity store (Bricks Breaker)
//!
//! Fixed per-tick velocities, no delta time. Each tick resolves collisions in
//! a fixed order: walls, paddle movement, paddle, bricks (first hit only),
//! then integrates the ball position.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{PaddleContact, Rect, first_overlap, paddle_contact, wall_bounce};
use super::state::Outcome;
use crate::consts::*;

/// Knobs the bounce rules read every tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BounceTuning {
    /// Paddle travel per tick while a key is held (px)
    pub paddle_speed: f32,
    /// Horizontal speed added at the paddle edge
    pub deflection: f32,
}

impl Default for BounceTuning {
    fn default() -> Self {
        Self {
            paddle_speed: PADDLE_SPEED,
            deflection: PADDLE_DEFLECTION,
        }
    }
}

/// Held-key signals for the paddle
///
/// Left and right are independent; both may be held at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PaddleKeys {
    pub left: bool,
    pub right: bool,
}

/// The ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

/// The player's paddle; only `x` moves
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub x: f32,
    pub width: f32,
    pub height: f32,
}

impl Paddle {
    /// Paddle rectangle on a board of the given height
    pub fn rect(&self, board_height: f32) -> Rect {
        Rect::new(
            self.x,
            board_height - self.height - PADDLE_BOTTOM_GAP,
            self.width,
            self.height,
        )
    }

    /// Move by the held keys, staying on the board
    pub fn steer(&mut self, keys: &PaddleKeys, speed: f32, board_width: f32) {
        let max_x = board_width - self.width;
        if keys.right && self.x < max_x {
            self.x += speed;
        }
        if keys.left && self.x > 0.0 {
            self.x -= speed;
        }
        self.x = self.x.clamp(0.0, max_x);
    }
}

/// A single brick; its rectangle is laid out once at construction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub col: usize,
    pub row: usize,
    pub rect: Rect,
    pub alive: bool,
}

/// Complete bricks board state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BricksState {
    pub ball: Ball,
    pub paddle: Paddle,
    /// Column-major: index = col * rows + row
    pub bricks: Vec<Brick>,
    pub rows: usize,
    pub cols: usize,
    /// Bricks destroyed so far
    pub score: u32,
    pub width: f32,
    pub height: f32,
}

impl Default for BricksState {
    fn default() -> Self {
        Self::new()
    }
}

impl BricksState {
    /// Canonical start: ball above the paddle heading up-right, full wall
    pub fn new() -> Self {
        Self::with_layout(BRICK_ROWS, BRICK_COLS)
    }

    pub fn with_layout(rows: usize, cols: usize) -> Self {
        let width = BRICKS_WIDTH;
        let height = BRICKS_HEIGHT;

        let mut bricks = Vec::with_capacity(rows * cols);
        for col in 0..cols {
            for row in 0..rows {
                let x = col as f32 * (BRICK_WIDTH + BRICK_PADDING) + BRICK_OFFSET_LEFT;
                let y = row as f32 * (BRICK_HEIGHT + BRICK_PADDING) + BRICK_OFFSET_TOP;
                bricks.push(Brick {
                    col,
                    row,
                    rect: Rect::new(x, y, BRICK_WIDTH, BRICK_HEIGHT),
                    alive: true,
                });
            }
        }

        Self {
            ball: Ball {
                pos: Vec2::new(width / 2.0, height - BALL_START_LIFT),
                vel: Vec2::new(BALL_START_VEL.0, BALL_START_VEL.1),
                radius: BALL_RADIUS,
            },
            paddle: Paddle {
                x: (width - PADDLE_WIDTH) / 2.0,
                width: PADDLE_WIDTH,
                height: PADDLE_HEIGHT,
            },
            bricks,
            rows,
            cols,
            score: 0,
            width,
            height,
        }
    }

    pub fn brick(&self, col: usize, row: usize) -> &Brick {
        &self.bricks[col * self.rows + row]
    }

    pub fn total_bricks(&self) -> u32 {
        (self.rows * self.cols) as u32
    }

    pub fn alive_count(&self) -> usize {
        self.bricks.iter().filter(|b| b.alive).count()
    }

    /// Advance one tick
    pub fn advance(&mut self, keys: &PaddleKeys, tuning: &BounceTuning) -> Option<Outcome> {
        let radius = self.ball.radius;

        self.ball.vel = wall_bounce(self.ball.pos, self.ball.vel, radius, self.width);

        self.paddle.steer(keys, tuning.paddle_speed, self.width);

        let paddle = self.paddle.rect(self.height);
        match paddle_contact(
            self.ball.pos,
            self.ball.vel,
            radius,
            &paddle,
            self.height,
            tuning.deflection,
        ) {
            PaddleContact::Deflect(vel) => self.ball.vel = vel,
            PaddleContact::Miss => {
                log::debug!("ball missed the paddle at x={:.1}", self.ball.pos.x);
                return Some(Outcome::Lost);
            }
            PaddleContact::Clear | PaddleContact::Passing => {}
        }

        let alive = self
            .bricks
            .iter()
            .enumerate()
            .filter(|(_, b)| b.alive)
            .map(|(i, b)| (i, b.rect));
        if let Some(index) = first_overlap(self.ball.pos, radius, alive) {
            self.ball.vel.y = -self.ball.vel.y;
            let brick = &mut self.bricks[index];
            brick.alive = false;
            self.score += 1;
            log::debug!(
                "brick ({}, {}) destroyed, score {}",
                brick.col,
                brick.row,
                self.score
            );
            if self.score == self.total_bricks() {
                return Some(Outcome::Won);
            }
        }

        self.ball.pos += self.ball.vel;
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const IDLE: PaddleKeys = PaddleKeys {
        left: false,
        right: false,
    };

    #[test]
    fn test_new_layout() {
        let state = BricksState::new();
        assert_eq!(state.bricks.len(), 28);
        assert_eq!(state.total_bricks(), 28);
        assert_eq!(state.score, 0);
        assert_eq!(state.ball.pos, Vec2::new(280.0, 330.0));
        assert_eq!(state.ball.vel, Vec2::new(3.0, -3.0));
        assert_eq!(state.paddle.x, 235.0);

        let first = state.brick(0, 0);
        assert_eq!(first.rect, Rect::new(15.0, 40.0, 70.0, 18.0));
        let last = state.brick(6, 3);
        assert_eq!(last.rect, Rect::new(495.0, 124.0, 70.0, 18.0));
    }

    #[test]
    fn test_brick_hit_flips_and_scores_once() {
        let mut state = BricksState::new();
        // Just under brick (0,0), heading up
        state.ball.pos = Vec2::new(50.0, 62.0);
        state.ball.vel = Vec2::new(3.0, -3.0);

        assert_eq!(state.advance(&IDLE, &BounceTuning::default()), None);

        assert_eq!(state.ball.vel, Vec2::new(3.0, 3.0));
        assert!(!state.brick(0, 0).alive);
        assert_eq!(state.score, 1);
        assert_eq!(state.alive_count(), 27);
        assert_eq!(state.ball.pos, Vec2::new(53.0, 65.0));
    }

    #[test]
    fn test_only_first_brick_resolves_per_tick() {
        let mut state = BricksState::new();
        // Between rows 0 and 1 of column 0: overlaps both grown rectangles
        state.ball.pos = Vec2::new(50.0, 63.0);
        state.ball.vel = Vec2::new(0.0, -3.0);
        assert!(state.brick(0, 0).rect.bottom() + 8.0 > 63.0);
        assert!(state.brick(0, 1).rect.y - 8.0 < 63.0);

        state.advance(&IDLE, &BounceTuning::default());

        assert_eq!(state.score, 1);
        assert!(!state.brick(0, 0).alive);
        assert!(state.brick(0, 1).alive);
    }

    #[test]
    fn test_last_brick_wins_without_moving() {
        let mut state = BricksState::new();
        for brick in state.bricks.iter_mut().skip(1) {
            brick.alive = false;
        }
        state.score = state.total_bricks() - 1;
        state.ball.pos = Vec2::new(50.0, 62.0);

        let outcome = state.advance(&IDLE, &BounceTuning::default());

        assert_eq!(outcome, Some(Outcome::Won));
        assert_eq!(state.score, 28);
        assert_eq!(state.ball.pos, Vec2::new(50.0, 62.0));
    }

    #[test]
    fn test_wall_and_brick_on_same_tick() {
        let mut state = BricksState::new();
        // Against the left wall, inside the grown rects of bricks (0,0) and (0,1)
        state.ball.pos = Vec2::new(10.0, 62.0);
        state.ball.vel = Vec2::new(-3.0, -3.0);

        assert_eq!(state.advance(&IDLE, &BounceTuning::default()), None);

        // Wall flips x, then the first brick flips y
        assert_eq!(state.ball.vel, Vec2::new(3.0, 3.0));
        assert_eq!(state.score, 1);
        assert!(!state.brick(0, 0).alive);
        assert!(state.brick(0, 1).alive);
        assert_eq!(state.alive_count(), 27);
        assert_eq!(state.ball.pos, Vec2::new(13.0, 65.0));
    }

    #[test]
    fn test_miss_is_lost() {
        let mut state = BricksState::new();
        state.ball.pos = Vec2::new(30.0, 350.0);
        state.ball.vel = Vec2::new(0.0, 3.0);
        assert_eq!(state.advance(&IDLE, &BounceTuning::default()), Some(Outcome::Lost));
    }

    #[test]
    fn test_paddle_return() {
        let mut state = BricksState::new();
        state.ball.pos = Vec2::new(280.0, 332.0);
        state.ball.vel = Vec2::new(0.0, 3.0);

        assert_eq!(state.advance(&IDLE, &BounceTuning::default()), None);
        assert_eq!(state.ball.vel, Vec2::new(0.0, -3.0));
    }

    #[test]
    fn test_paddle_clamped_to_board() {
        let mut state = BricksState::new();
        let right = PaddleKeys {
            left: false,
            right: true,
        };
        // Keep the ball out of the way
        state.ball.pos = Vec2::new(280.0, 200.0);
        state.ball.vel = Vec2::ZERO;
        for _ in 0..200 {
            state.advance(&right, &BounceTuning::default());
        }
        assert_eq!(state.paddle.x, state.width - state.paddle.width);

        let left = PaddleKeys {
            left: true,
            right: false,
        };
        for _ in 0..200 {
            state.advance(&left, &BounceTuning::default());
        }
        assert_eq!(state.paddle.x, 0.0);
    }

    proptest! {
        #[test]
        fn prop_score_matches_dead_bricks(
            x in 20.0f32..540.0,
            y in 40.0f32..300.0,
            vx in -4.0f32..4.0,
            vy in -4.0f32..4.0,
            steps in 1usize..400,
        ) {
            let mut state = BricksState::new();
            state.ball.pos = Vec2::new(x, y);
            state.ball.vel = Vec2::new(vx, vy);
            let tuning = BounceTuning::default();

            for _ in 0..steps {
                let before = state.score;
                let outcome = state.advance(&IDLE, &tuning);
                prop_assert!(state.score == before || state.score == before + 1);
                prop_assert_eq!(state.score as usize, 28 - state.alive_count());
                prop_assert_eq!(outcome == Some(Outcome::Won), state.score == state.total_bricks());
                if outcome.is_some() {
                    break;
                }
            }
        }
    }
}
