//! View router
//!
//! Owns the single active game controller. Opening a game always destroys
//! the previous one first, so at most one session ever ticks or listens.

use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;

use crate::platform::Host;
use crate::session::{Controller, Session, WordSession};
use crate::settings::Settings;
use crate::sim::{BricksState, GameKind, GameStatus, SnakeState};

pub struct ViewRouter {
    host: Host,
    settings: Settings,
    /// Seeds handed to each new session
    seeds: Pcg32,
    active: Option<Box<dyn Controller>>,
}

impl ViewRouter {
    pub fn new(host: Host, settings: Settings, seed: u64) -> Self {
        Self {
            host,
            settings,
            seeds: Pcg32::seed_from_u64(seed),
            active: None,
        }
    }

    /// Destroy whatever is open, then build and start `kind`
    pub fn open(&mut self, kind: GameKind) {
        self.close_active();

        let seed = self.seeds.next_u64();
        let host = self.host.clone();
        let settings = self.settings.clone();
        let controller: Box<dyn Controller> = match kind {
            GameKind::Snake => Box::new(Session::<SnakeState>::new(host, settings, seed)),
            GameKind::Bricks => Box::new(Session::<BricksState>::new(host, settings, seed)),
            GameKind::Hangman => Box::new(WordSession::new(host, settings, seed)),
        };
        controller.start();
        log::info!("opened {}", kind.title());
        self.active = Some(controller);
    }

    /// Open a game by its card name (`snake`, `bricks`, `hangman`)
    pub fn open_named(&mut self, name: &str) -> Option<GameKind> {
        let Some(kind) = GameKind::from_name(name) else {
            log::warn!("unknown game {name:?}");
            return None;
        };
        self.open(kind);
        Some(kind)
    }

    /// Back to home: destroy the active game and empty the stage
    pub fn back(&mut self) {
        self.close_active();
        self.host.container.clear();
    }

    /// Forward to the active controller; no-op on the home view
    pub fn restart(&self) {
        match &self.active {
            Some(controller) => controller.restart(),
            None => log::debug!("restart ignored: no game open"),
        }
    }

    pub fn active_kind(&self) -> Option<GameKind> {
        self.active.as_ref().map(|c| c.kind())
    }

    /// Title shown above the stage
    pub fn title(&self) -> Option<&'static str> {
        self.active_kind().map(|k| k.title())
    }

    pub fn active_status(&self) -> Option<GameStatus> {
        self.active.as_ref().map(|c| c.status())
    }

    pub fn active(&self) -> Option<&dyn Controller> {
        self.active.as_deref()
    }

    fn close_active(&mut self) {
        if let Some(previous) = self.active.take() {
            previous.destroy();
        }
    }
}

impl Drop for ViewRouter {
    fn drop(&mut self) {
        self.close_active();
    }
}
