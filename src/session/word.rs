//! Turn-based session for the word-guessing game
//!
//! No timer: each key-down letter is one move. The round is redrawn after
//! every move and announced once when it ends.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::{ActiveListener, Controller};
use crate::consts::{HANGMAN_HEIGHT, HANGMAN_WIDTH};
use crate::input::{Key, KeyEvent};
use crate::platform::{CancelToken, Host};
use crate::render::{self, Surface};
use crate::settings::Settings;
use crate::sim::{GameKind, GameStatus, Guess, HangmanState, OutcomeReport};

struct WordCore {
    host: Host,
    settings: Settings,
    rng: Pcg32,
    status: GameStatus,
    round: Option<HangmanState>,
    surface: Option<Box<dyn Surface>>,
    listener: Option<ActiveListener>,
    destroyed: bool,
}

impl WordCore {
    fn new_round(&mut self) {
        let round = HangmanState::new(&mut self.rng, self.settings.hangman_max_wrong);
        log::debug!("new word, {} letters", round.word().len());
        self.round = Some(round);
        self.status = GameStatus::Running;
    }

    fn teardown(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.token.cancel();
            self.host.keyboard.unsubscribe(listener.id);
        }
        if self.surface.take().is_some() {
            self.host.container.clear();
        }
    }

    fn render(&mut self) {
        if let (Some(round), Some(surface)) = (self.round.as_ref(), self.surface.as_mut()) {
            render::draw_hangman(round, surface.as_mut());
        }
    }
}

impl Drop for WordCore {
    fn drop(&mut self) {
        if !self.destroyed {
            self.teardown();
        }
    }
}

/// Session controller for hangman
#[derive(Clone)]
pub struct WordSession {
    core: Rc<RefCell<WordCore>>,
}

impl WordSession {
    pub fn new(host: Host, settings: Settings, seed: u64) -> Self {
        let core = WordCore {
            host,
            settings,
            rng: Pcg32::seed_from_u64(seed),
            status: GameStatus::Idle,
            round: None,
            surface: None,
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

        let surface = core.host.container.mount(HANGMAN_WIDTH, HANGMAN_HEIGHT);
        core.surface = Some(surface);
        core.destroyed = false;
        core.new_round();
        self.subscribe(&mut core);
        core.render();

        log::info!("{} started", GameKind::Hangman.title());
    }

    pub fn restart(&self) {
        let mut core = self.core.borrow_mut();
        if core.destroyed {
            log::debug!("Hangman restart ignored: session destroyed");
            return;
        }
        if core.surface.is_none() {
            drop(core);
            self.start();
            return;
        }

        core.new_round();
        core.render();
        log::info!("{} restarted", GameKind::Hangman.title());
    }

    pub fn destroy(&self) {
        let mut core = self.core.borrow_mut();
        if core.destroyed {
            return;
        }
        core.teardown();
        core.destroyed = true;
        log::info!("{} destroyed", GameKind::Hangman.title());
    }

    /// Play one letter. Anything but a running round answers `Finished`.
    pub fn guess(&self, letter: char) -> Guess {
        let Ok(mut guard) = self.core.try_borrow_mut() else {
            return Guess::Finished;
        };
        let core = &mut *guard;
        if core.destroyed || core.status != GameStatus::Running {
            return Guess::Finished;
        }
        let Some(round) = core.round.as_mut() else {
            return Guess::Finished;
        };

        let result = round.guess(letter);
        log::debug!("guess {letter:?}: {result:?}");
        if matches!(result, Guess::Invalid | Guess::Repeated) {
            return result;
        }

        let outcome = round.outcome();
        let word = round.word().to_string();
        core.render();

        let Some(outcome) = outcome else {
            return result;
        };
        core.status = outcome.into();
        let report = OutcomeReport::new(GameKind::Hangman, outcome).with_word(word);
        let notifier = Rc::clone(&core.host.notifier);
        drop(guard);

        log::info!("Hangman finished: {outcome:?}");
        notifier.announce(&report);
        result
    }

    pub fn status(&self) -> GameStatus {
        self.core.borrow().status
    }

    pub fn is_destroyed(&self) -> bool {
        self.core.borrow().destroyed
    }

    /// Read the current round
    pub fn with_round<R>(&self, f: impl FnOnce(&HangmanState) -> R) -> Option<R> {
        self.core.borrow().round.as_ref().map(f)
    }

    fn subscribe(&self, core: &mut WordCore) {
        let token = CancelToken::new();
        let guard = token.clone();
        let weak: Weak<RefCell<WordCore>> = Rc::downgrade(&self.core);

        let id = core.host.keyboard.subscribe(Rc::new(move |event| {
            if guard.is_cancelled() {
                return;
            }
            let KeyEvent::Down(Key::Letter(letter)) = event else {
                return;
            };
            if let Some(core) = weak.upgrade() {
                WordSession { core }.guess(letter);
            }
        }));
        core.listener = Some(ActiveListener { id, token });
    }
}

impl Controller for WordSession {
    fn kind(&self) -> GameKind {
        GameKind::Hangman
    }

    fn status(&self) -> GameStatus {
        WordSession::status(self)
    }

    fn start(&self) {
        WordSession::start(self)
    }

    fn restart(&self) {
        WordSession::restart(self)
    }

    fn destroy(&self) {
        WordSession::destroy(self)
    }
}
