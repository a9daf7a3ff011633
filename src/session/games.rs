//! Real-time games plugged into the session engine

use std::time::Duration;

use rand_pcg::Pcg32;

use super::Game;
use crate::consts::*;
use crate::input::{DirectionTracker, PaddleKeys};
use crate::render::{self, Surface};
use crate::settings::Settings;
use crate::sim::{BounceTuning, BricksState, GameKind, Outcome, OutcomeReport, SnakeState};

impl From<&Settings> for BounceTuning {
    fn from(settings: &Settings) -> Self {
        Self {
            paddle_speed: settings.paddle_speed,
            deflection: settings.paddle_deflection,
        }
    }
}

impl Game for SnakeState {
    type Input = DirectionTracker;

    const KIND: GameKind = GameKind::Snake;

    fn create(rng: &mut Pcg32, _settings: &Settings) -> Self {
        SnakeState::new(rng)
    }

    fn interval(settings: &Settings) -> Duration {
        settings.snake_interval()
    }

    fn surface_size() -> (u32, u32) {
        (
            (SNAKE_COLS * SNAKE_CELL_PX) as u32,
            (SNAKE_ROWS * SNAKE_CELL_PX) as u32,
        )
    }

    fn step(
        &mut self,
        input: &mut DirectionTracker,
        rng: &mut Pcg32,
        _settings: &Settings,
    ) -> Option<Outcome> {
        let dir = input.commit();
        self.advance(dir, rng)
    }

    fn render(&self, surface: &mut dyn Surface) {
        render::draw_snake(self, surface);
    }

    fn report(&self, outcome: Outcome) -> OutcomeReport {
        // Every food eaten adds one segment
        let eaten = self.len().saturating_sub(1) as u32;
        OutcomeReport::new(GameKind::Snake, outcome).with_score(eaten)
    }
}

impl Game for BricksState {
    type Input = PaddleKeys;

    const KIND: GameKind = GameKind::Bricks;

    fn create(_rng: &mut Pcg32, _settings: &Settings) -> Self {
        BricksState::new()
    }

    fn interval(settings: &Settings) -> Duration {
        settings.bricks_interval()
    }

    fn surface_size() -> (u32, u32) {
        (BRICKS_WIDTH as u32, BRICKS_HEIGHT as u32)
    }

    fn step(
        &mut self,
        input: &mut PaddleKeys,
        _rng: &mut Pcg32,
        settings: &Settings,
    ) -> Option<Outcome> {
        self.advance(input, &BounceTuning::from(settings))
    }

    fn render(&self, surface: &mut dyn Surface) {
        render::draw_bricks(self, surface);
    }

    fn report(&self, outcome: Outcome) -> OutcomeReport {
        OutcomeReport::new(GameKind::Bricks, outcome).with_score(self.score)
    }
}
