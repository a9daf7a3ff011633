//! Platform abstraction layer
//!
//! The session engine only talks to the host through these traits:
//! - Time: a repeating tick scheduler
//! - Input: a key-down/key-up event source
//! - Output: an outcome notifier and a container that hands out surfaces
//!
//! `headless` implements them in memory (tests, native demo); `web` binds
//! them to the browser on wasm32.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use crate::input::KeyEvent;
use crate::render::Surface;
use crate::sim::OutcomeReport;

pub mod headless;
#[cfg(target_arch = "wasm32")]
pub mod web;

/// Handle of a repeating timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Handle of a keyboard subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Shared flag checked at the top of every timer and key callback.
///
/// Once cancelled, a callback that was already queued by the host returns
/// without touching the session.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Repeating fixed-interval timer
pub trait TickScheduler {
    /// Arm a timer that calls `on_tick` every `interval` until cancelled
    fn schedule(&self, interval: Duration, on_tick: Box<dyn FnMut()>) -> TimerId;
    /// Stop a timer. Unknown or already-cancelled ids are ignored.
    fn cancel(&self, id: TimerId);
}

/// Key-down/key-up event source
pub trait KeyboardSource {
    fn subscribe(&self, listener: Rc<dyn Fn(KeyEvent)>) -> ListenerId;
    /// Remove a listener. Unknown ids are ignored.
    fn unsubscribe(&self, id: ListenerId);
}

/// Announces a finished round to the player
pub trait OutcomeNotifier {
    fn announce(&self, report: &OutcomeReport);
}

/// Mount point for game surfaces
pub trait HostContainer {
    /// Populate the mount point with a fresh surface of the given size
    fn mount(&self, width: u32, height: u32) -> Box<dyn Surface>;
    /// Empty the mount point
    fn clear(&self);
}

/// Everything a session needs from its host
#[derive(Clone)]
pub struct Host {
    pub scheduler: Rc<dyn TickScheduler>,
    pub keyboard: Rc<dyn KeyboardSource>,
    pub notifier: Rc<dyn OutcomeNotifier>,
    pub container: Rc<dyn HostContainer>,
}
