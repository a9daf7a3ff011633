//! Session lifecycle
//!
//! A session owns one game's entity store, its input tracker, its surface
//! and at most one repeating timer. Timer and key callbacks hold only weak
//! or signal-level references and check a [`CancelToken`] first, so nothing
//! fires into a session after it stops ticking.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::input::InputTracker;
use crate::platform::{CancelToken, Host, ListenerId, TimerId};
use crate::render::Surface;
use crate::settings::Settings;
use crate::sim::{GameKind, GameStatus, Outcome, OutcomeReport};

mod games;
mod word;

pub use word::WordSession;

/// Object-safe handle the view router drives
pub trait Controller {
    fn kind(&self) -> GameKind;
    fn status(&self) -> GameStatus;
    /// Start from scratch; tears down anything already running first
    fn start(&self);
    /// Fresh round from any state. No-op once destroyed.
    fn restart(&self);
    /// Stop ticking and remove listeners. Idempotent.
    fn destroy(&self);
}

/// A real-time game driven by a fixed-interval tick
pub trait Game: Sized + 'static {
    /// Signals the key listener writes and the tick reads
    type Input: InputTracker + 'static;

    const KIND: GameKind;

    /// Canonical initial entity state
    fn create(rng: &mut Pcg32, settings: &Settings) -> Self;

    fn interval(settings: &Settings) -> Duration;

    /// Surface size in pixels
    fn surface_size() -> (u32, u32);

    /// Advance one tick; `Some` on terminal entry
    fn step(
        &mut self,
        input: &mut Self::Input,
        rng: &mut Pcg32,
        settings: &Settings,
    ) -> Option<Outcome>;

    fn render(&self, surface: &mut dyn Surface);

    fn report(&self, outcome: Outcome) -> OutcomeReport;
}

struct ActiveTimer {
    id: TimerId,
    token: CancelToken,
}

struct ActiveListener {
    id: ListenerId,
    token: CancelToken,
}

struct SessionCore<G: Game> {
    host: Host,
    settings: Settings,
    rng: Pcg32,
    status: GameStatus,
    /// Entity store; `None` until first start
    game: Option<G>,
    input: Rc<RefCell<G::Input>>,
    surface: Option<Box<dyn Surface>>,
    timer: Option<ActiveTimer>,
    listener: Option<ActiveListener>,
    destroyed: bool,
}

impl<G: Game> SessionCore<G> {
    fn reset_entities(&mut self) {
        self.status = GameStatus::Idle;
        self.game = Some(G::create(&mut self.rng, &self.settings));
        *self.input.borrow_mut() = G::Input::default();
    }

    fn subscribe(&mut self) {
        let token = CancelToken::new();
        let guard = token.clone();
        let input = Rc::clone(&self.input);
        let id = self.host.keyboard.subscribe(Rc::new(move |event| {
            if guard.is_cancelled() {
                return;
            }
            if let Ok(mut input) = input.try_borrow_mut() {
                input.handle(event);
            }
        }));
        self.listener = Some(ActiveListener { id, token });
    }

    fn stop_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.token.cancel();
            self.host.scheduler.cancel(timer.id);
        }
    }

    fn teardown(&mut self) {
        self.stop_timer();
        if let Some(listener) = self.listener.take() {
            listener.token.cancel();
            self.host.keyboard.unsubscribe(listener.id);
        }
        if self.surface.take().is_some() {
            self.host.container.clear();
        }
    }

    fn render(&mut self) {
        if let (Some(game), Some(surface)) = (self.game.as_ref(), self.surface.as_mut()) {
            game.render(surface.as_mut());
        }
    }
}

impl<G: Game> Drop for SessionCore<G> {
    fn drop(&mut self) {
        if !self.destroyed {
            self.teardown();
        }
    }
}

/// Session controller for a real-time game
pub struct Session<G: Game> {
    core: Rc<RefCell<SessionCore<G>>>,
}

impl<G: Game> Clone for Session<G> {
    fn clone(&self) -> Self {
        Self {
            core: Rc::clone(&self.core),
        }
    }
}

impl<G: Game> Session<G> {
    /// Build an idle session; nothing is mounted or scheduled yet
    pub fn new(host: Host, settings: Settings, seed: u64) -> Self {
        let core = SessionCore {
            host,
            settings,
            rng: Pcg32::seed_from_u64(seed),
            status: GameStatus::Idle,
            game: None,
            input: Rc::new(RefCell::new(G::Input::default())),
            surface: None,
            timer: None,
            listener: None,
            destroyed: false,
        };
        Self {
            core: Rc::new(RefCell::new(core)),
        }
    }

    pub fn start(&self) {
        let mut core = self.core.borrow_mut();
        core.teardown();

        let (width, height) = G::surface_size();
        let surface = core.host.container.mount(width, height);
        core.surface = Some(surface);
        core.destroyed = false;
        core.reset_entities();
        core.subscribe();
        self.arm(&mut core);
        core.render();

        log::info!("{} started", G::KIND.title());
    }

    pub fn restart(&self) {
        let mut core = self.core.borrow_mut();
        if core.destroyed {
            log::debug!("{} restart ignored: session destroyed", G::KIND.title());
            return;
        }
        if core.surface.is_none() {
            drop(core);
            self.start();
            return;
        }

        core.stop_timer();
        core.reset_entities();
        self.arm(&mut core);
        core.render();

        log::info!("{} restarted", G::KIND.title());
    }

    pub fn destroy(&self) {
        let mut core = self.core.borrow_mut();
        if core.destroyed {
            return;
        }
        core.teardown();
        core.destroyed = true;
        log::info!("{} destroyed", G::KIND.title());
    }

    /// One update + render pass. No-op unless running.
    pub fn tick(&self) {
        let Ok(mut guard) = self.core.try_borrow_mut() else {
            log::warn!("{} tick skipped: session busy", G::KIND.title());
            return;
        };
        let core = &mut *guard;
        if core.destroyed || core.status != GameStatus::Running {
            return;
        }
        let Some(game) = core.game.as_mut() else {
            return;
        };

        let outcome = {
            let mut input = core.input.borrow_mut();
            game.step(&mut input, &mut core.rng, &core.settings)
        };
        if let Some(surface) = core.surface.as_mut() {
            game.render(surface.as_mut());
        }

        let Some(outcome) = outcome else {
            return;
        };
        let report = game.report(outcome);
        core.status = outcome.into();
        core.stop_timer();
        let notifier = Rc::clone(&core.host.notifier);
        drop(guard);

        log::info!("{} finished: {:?}", G::KIND.title(), outcome);
        notifier.announce(&report);
    }

    pub fn status(&self) -> GameStatus {
        self.core.borrow().status
    }

    /// Whether a timer is currently armed
    pub fn is_ticking(&self) -> bool {
        self.core.borrow().timer.is_some()
    }

    pub fn is_destroyed(&self) -> bool {
        self.core.borrow().destroyed
    }

    pub fn timer_id(&self) -> Option<TimerId> {
        self.core.borrow().timer.as_ref().map(|t| t.id)
    }

    /// Read the entity store
    pub fn with_game<R>(&self, f: impl FnOnce(&G) -> R) -> Option<R> {
        self.core.borrow().game.as_ref().map(f)
    }

    /// Edit the entity store between ticks
    pub fn with_game_mut<R>(&self, f: impl FnOnce(&mut G) -> R) -> Option<R> {
        self.core.borrow_mut().game.as_mut().map(f)
    }

    fn arm(&self, core: &mut SessionCore<G>) {
        let token = CancelToken::new();
        let guard = token.clone();
        let weak: Weak<RefCell<SessionCore<G>>> = Rc::downgrade(&self.core);
        let interval = G::interval(&core.settings);

        let id = core.host.scheduler.schedule(
            interval,
            Box::new(move || {
                if guard.is_cancelled() {
                    return;
                }
                if let Some(core) = weak.upgrade() {
                    Session { core }.tick();
                }
            }),
        );

        core.timer = Some(ActiveTimer { id, token });
        core.status = GameStatus::Running;
    }
}

impl<G: Game> Controller for Session<G> {
    fn kind(&self) -> GameKind {
        G::KIND
    }

    fn status(&self) -> GameStatus {
        Session::status(self)
    }

    fn start(&self) {
        Session::start(self)
    }

    fn restart(&self) {
        Session::restart(self)
    }

    fn destroy(&self) {
        Session::destroy(self)
    }
}
