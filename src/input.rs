//! Keyboard input
//!
//! Key events are turned into small per-game signal sets. Listeners only
//! write these signals; the tick reads them.

use serde::{Deserialize, Serialize};

pub use crate::sim::PaddleKeys;
use crate::sim::Direction;

/// Keys the games react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    /// An ASCII letter, always uppercase
    Letter(char),
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` name. Unknown keys yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ArrowUp" => Some(Key::ArrowUp),
            "ArrowDown" => Some(Key::ArrowDown),
            "ArrowLeft" => Some(Key::ArrowLeft),
            "ArrowRight" => Some(Key::ArrowRight),
            _ => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_alphabetic() => {
                        Some(Key::Letter(c.to_ascii_uppercase()))
                    }
                    _ => None,
                }
            }
        }
    }

    /// Direction an arrow key points, if it is one
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Key::ArrowUp => Some(Direction::Up),
            Key::ArrowDown => Some(Direction::Down),
            Key::ArrowLeft => Some(Direction::Left),
            Key::ArrowRight => Some(Direction::Right),
            Key::Letter(_) => None,
        }
    }
}

/// A press or release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEvent {
    Down(Key),
    Up(Key),
}

/// Signal state fed by key events
pub trait InputTracker: Default {
    fn handle(&mut self, event: KeyEvent);
}

/// Heading signal for grid movement
///
/// Requests are checked against the heading applied on the last tick, so
/// two quick presses between ticks cannot fold the snake back onto itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirectionTracker {
    current: Direction,
    pending: Direction,
}

impl DirectionTracker {
    pub fn new(initial: Direction) -> Self {
        Self {
            current: initial,
            pending: initial,
        }
    }

    /// Request a new heading. Reversals are dropped silently.
    pub fn set_direction(&mut self, requested: Direction) -> bool {
        if requested == self.current.opposite() {
            log::trace!("ignored reversal {:?} -> {:?}", self.current, requested);
            return false;
        }
        self.pending = requested;
        true
    }

    /// Apply the pending heading at a tick boundary
    pub fn commit(&mut self) -> Direction {
        self.current = self.pending;
        self.current
    }

    pub fn current(&self) -> Direction {
        self.current
    }

    pub fn pending(&self) -> Direction {
        self.pending
    }
}

impl InputTracker for DirectionTracker {
    fn handle(&mut self, event: KeyEvent) {
        if let KeyEvent::Down(key) = event {
            if let Some(dir) = key.direction() {
                self.set_direction(dir);
            }
        }
    }
}

impl InputTracker for PaddleKeys {
    fn handle(&mut self, event: KeyEvent) {
        match event {
            KeyEvent::Down(Key::ArrowLeft) => self.left = true,
            KeyEvent::Up(Key::ArrowLeft) => self.left = false,
            KeyEvent::Down(Key::ArrowRight) => self.right = true,
            KeyEvent::Up(Key::ArrowRight) => self.right = false,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_key_names() {
        assert_eq!(Key::from_name("ArrowLeft"), Some(Key::ArrowLeft));
        assert_eq!(Key::from_name("q"), Some(Key::Letter('Q')));
        assert_eq!(Key::from_name("Q"), Some(Key::Letter('Q')));
        assert_eq!(Key::from_name("Enter"), None);
        assert_eq!(Key::from_name("1"), None);
        assert_eq!(Key::from_name(""), None);
    }

    #[test]
    fn test_reversal_rejected() {
        let mut tracker = DirectionTracker::new(Direction::Right);
        assert!(!tracker.set_direction(Direction::Left));
        assert_eq!(tracker.pending(), Direction::Right);
        assert_eq!(tracker.commit(), Direction::Right);
    }

    #[test]
    fn test_double_press_cannot_reverse_within_a_tick() {
        let mut tracker = DirectionTracker::new(Direction::Right);
        tracker.handle(KeyEvent::Down(Key::ArrowUp));
        tracker.handle(KeyEvent::Down(Key::ArrowLeft));
        // Left is checked against the applied heading (Right), not the pending Up
        assert_eq!(tracker.commit(), Direction::Up);
        tracker.handle(KeyEvent::Down(Key::ArrowLeft));
        assert_eq!(tracker.commit(), Direction::Left);
    }

    #[test]
    fn test_paddle_keys_press_release() {
        let mut keys = PaddleKeys::default();
        keys.handle(KeyEvent::Down(Key::ArrowLeft));
        keys.handle(KeyEvent::Down(Key::ArrowRight));
        assert!(keys.left && keys.right);
        keys.handle(KeyEvent::Up(Key::ArrowLeft));
        assert!(!keys.left && keys.right);
        keys.handle(KeyEvent::Up(Key::ArrowRight));
        assert_eq!(keys, PaddleKeys::default());
    }

    proptest! {
        #[test]
        fn prop_opposite_never_changes_heading(start in 0usize..4, presses in prop::collection::vec(0usize..4, 0..20)) {
            let mut tracker = DirectionTracker::new(Direction::ALL[start]);
            for p in presses {
                let requested = Direction::ALL[p];
                let before = tracker.pending();
                let current = tracker.current();
                let accepted = tracker.set_direction(requested);
                if requested == current.opposite() {
                    prop_assert!(!accepted);
                    prop_assert_eq!(tracker.pending(), before);
                }
                let applied = tracker.commit();
                prop_assert_ne!(applied, current.opposite());
            }
        }
    }
}
