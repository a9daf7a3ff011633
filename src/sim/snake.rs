//! Grid-movement entity store (Snake)
//!
//! One tick moves the head one cell. Eating grows the body by keeping the
//! tail; otherwise the tail is dropped so the length stays constant.

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::cells_equal;
use super::grid::{Cell, Direction};
use super::state::Outcome;
use crate::consts::{SNAKE_COLS, SNAKE_ROWS, SNAKE_START};

/// Complete snake board state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnakeState {
    /// Body cells, head first
    pub segments: VecDeque<Cell>,
    /// Heading used on the last tick
    pub direction: Direction,
    pub food: Cell,
    pub cols: i32,
    pub rows: i32,
}

impl SnakeState {
    /// Canonical start: a single segment at the start cell heading right
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::with_board(SNAKE_COLS, SNAKE_ROWS, Cell::new(SNAKE_START.0, SNAKE_START.1), rng)
    }

    pub fn with_board<R: Rng + ?Sized>(cols: i32, rows: i32, start: Cell, rng: &mut R) -> Self {
        let mut state = Self {
            segments: VecDeque::from([start]),
            direction: Direction::default(),
            food: start,
            cols,
            rows,
        };
        state.food = state.random_cell(rng);
        state
    }

    #[inline]
    pub fn head(&self) -> Cell {
        self.segments[0]
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.cols && cell.y < self.rows
    }

    /// Uniform cell anywhere on the board. May land on the body.
    pub fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Cell {
        Cell::new(rng.random_range(0..self.cols), rng.random_range(0..self.rows))
    }

    /// Whether `cell` is on the body that stays put this tick.
    ///
    /// Without food the tail leaves as the head arrives, so its cell is free.
    pub fn blocks(&self, cell: Cell, eating: bool) -> bool {
        let staying = if eating { self.len() } else { self.len().saturating_sub(1) };
        self.segments
            .iter()
            .take(staying)
            .any(|s| cells_equal(*s, cell))
    }

    /// Advance one tick heading `dir`.
    ///
    /// Terminal checks run before anything moves, so a losing tick leaves
    /// the body untouched.
    pub fn advance<R: Rng + ?Sized>(&mut self, dir: Direction, rng: &mut R) -> Option<Outcome> {
        self.direction = dir;
        let head = self.head().step(dir);
        let eating = cells_equal(head, self.food);

        if !self.in_bounds(head) {
            log::debug!("snake hit the wall at ({}, {})", head.x, head.y);
            return Some(Outcome::Lost);
        }
        if self.blocks(head, eating) {
            log::debug!("snake bit itself at ({}, {})", head.x, head.y);
            return Some(Outcome::Lost);
        }

        if eating {
            self.food = self.random_cell(rng);
            log::debug!(
                "food eaten, length {} -> {}, respawned at ({}, {})",
                self.len(),
                self.len() + 1,
                self.food.x,
                self.food.y
            );
        } else {
            self.segments.pop_back();
        }

        self.segments.push_front(head);
        None
    }
}
