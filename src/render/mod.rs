//! 2-D drawing of game snapshots
//!
//! The host supplies a [`Surface`] with a handful of fill primitives; the
//! draw functions here are pure functions of the game state.

use crate::consts::*;
use crate::sim::{BricksState, HangmanState, SnakeState};

/// Pixel-addressed drawing target. Colors are CSS color strings.
pub trait Surface {
    /// Wipe the whole surface
    fn clear(&mut self);
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: &str);
    fn fill_circle(&mut self, x: f32, y: f32, r: f32, color: &str);
    fn fill_text(&mut self, text: &str, x: f32, y: f32, color: &str);
}

/// Surface that draws nothing
#[derive(Debug, Default)]
pub struct NullSurface;

impl Surface for NullSurface {
    fn clear(&mut self) {}
    fn fill_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32, _color: &str) {}
    fn fill_circle(&mut self, _x: f32, _y: f32, _r: f32, _color: &str) {}
    fn fill_text(&mut self, _text: &str, _x: f32, _y: f32, _color: &str) {}
}

pub mod palette {
    pub const SNAKE_BG: &str = "#030617";
    pub const FOOD: &str = "#ff4757";
    pub const SNAKE_HEAD: &str = "#22d3ee";
    pub const SNAKE_BODY: &str = "#94a3b8";

    pub const BRICKS_BG: &str = "#020617";
    pub const PADDLE: &str = "#7c3aed";
    pub const BALL: &str = "#00e5ff";
    pub const TEXT: &str = "#eaf2ff";

    pub const GALLOWS_BG: &str = "#0b1020";
    pub const GALLOWS: &str = "#eaf2ff";
}

/// Brick fill, hue stepped by row and column
pub fn brick_color(col: usize, row: usize) -> String {
    format!("hsl({} 90% 60%)", (row * 80 + col * 15) % 360)
}

pub fn draw_snake(state: &SnakeState, surface: &mut dyn Surface) {
    let cell = SNAKE_CELL_PX as f32;
    let width = state.cols as f32 * cell;
    let height = state.rows as f32 * cell;

    surface.clear();
    surface.fill_rect(0.0, 0.0, width, height, palette::SNAKE_BG);
    surface.fill_rect(
        state.food.x as f32 * cell,
        state.food.y as f32 * cell,
        cell,
        cell,
        palette::FOOD,
    );

    for (i, seg) in state.segments.iter().enumerate() {
        let color = if i == 0 {
            palette::SNAKE_HEAD
        } else {
            palette::SNAKE_BODY
        };
        surface.fill_rect(
            seg.x as f32 * cell,
            seg.y as f32 * cell,
            cell - 1.0,
            cell - 1.0,
            color,
        );
    }
}

pub fn draw_bricks(state: &BricksState, surface: &mut dyn Surface) {
    surface.clear();
    surface.fill_rect(0.0, 0.0, state.width, state.height, palette::BRICKS_BG);

    let paddle = state.paddle.rect(state.height);
    surface.fill_rect(paddle.x, paddle.y, paddle.w, paddle.h, palette::PADDLE);

    for brick in state.bricks.iter().filter(|b| b.alive) {
        let r = brick.rect;
        surface.fill_rect(r.x, r.y, r.w, r.h, &brick_color(brick.col, brick.row));
    }

    surface.fill_circle(
        state.ball.pos.x,
        state.ball.pos.y,
        state.ball.radius,
        palette::BALL,
    );
    surface.fill_text(&format!("Score: {}", state.score), 10.0, 18.0, palette::TEXT);
}

/// Gallows parts in drawing order, one per wrong guess
const BODY_PARTS: [(f32, f32, f32, f32); 5] = [
    (168.0, 98.0, 4.0, 62.0),  // body
    (142.0, 115.0, 28.0, 3.0), // left arm
    (170.0, 115.0, 28.0, 3.0), // right arm
    (152.0, 160.0, 3.0, 38.0), // left leg
    (185.0, 160.0, 3.0, 38.0), // right leg
];

pub fn draw_hangman(state: &HangmanState, surface: &mut dyn Surface) {
    surface.clear();
    surface.fill_rect(
        0.0,
        0.0,
        HANGMAN_WIDTH as f32,
        HANGMAN_HEIGHT as f32,
        palette::GALLOWS_BG,
    );

    // Base, pole, beam, rope
    surface.fill_rect(20.0, 258.0, 180.0, 4.0, palette::GALLOWS);
    surface.fill_rect(58.0, 30.0, 4.0, 230.0, palette::GALLOWS);
    surface.fill_rect(58.0, 28.0, 114.0, 4.0, palette::GALLOWS);
    surface.fill_rect(168.0, 30.0, 4.0, 32.0, palette::GALLOWS);

    if state.wrong() >= 1 {
        surface.fill_circle(170.0, 80.0, 18.0, palette::GALLOWS);
    }
    for part in BODY_PARTS.iter().take(state.wrong().saturating_sub(1) as usize) {
        surface.fill_rect(part.0, part.1, part.2, part.3, palette::GALLOWS);
    }

    surface.fill_text(&state.masked(), 240.0, 90.0, palette::TEXT);
    surface.fill_text(&format!("Hint: {}", state.hint()), 240.0, 130.0, palette::TEXT);
    surface.fill_text(
        &format!("Incorrect guesses: {} / {}", state.wrong(), state.max_wrong()),
        240.0,
        170.0,
        palette::TEXT,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Cell, HangmanState};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Records every primitive as a short tag
    #[derive(Default)]
    struct Recorder {
        ops: Vec<String>,
    }

    impl Surface for Recorder {
        fn clear(&mut self) {
            self.ops.push("clear".into());
        }
        fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: &str) {
            self.ops.push(format!("rect {x} {y} {w} {h} {color}"));
        }
        fn fill_circle(&mut self, x: f32, y: f32, r: f32, color: &str) {
            self.ops.push(format!("circle {x} {y} {r} {color}"));
        }
        fn fill_text(&mut self, text: &str, _x: f32, _y: f32, _color: &str) {
            self.ops.push(format!("text {text}"));
        }
    }

    #[test]
    fn test_snake_frame() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut state = SnakeState::new(&mut rng);
        state.food = Cell::new(0, 1);
        state.segments.push_back(Cell::new(11, 12));

        let mut rec = Recorder::default();
        draw_snake(&state, &mut rec);

        assert_eq!(rec.ops[0], "clear");
        assert_eq!(rec.ops[1], format!("rect 0 0 480 480 {}", palette::SNAKE_BG));
        assert_eq!(rec.ops[2], format!("rect 0 20 20 20 {}", palette::FOOD));
        assert_eq!(rec.ops[3], format!("rect 240 240 19 19 {}", palette::SNAKE_HEAD));
        assert_eq!(rec.ops[4], format!("rect 220 240 19 19 {}", palette::SNAKE_BODY));
        assert_eq!(rec.ops.len(), 5);
    }

    #[test]
    fn test_bricks_frame_skips_dead_bricks() {
        let mut state = BricksState::new();
        state.bricks[0].alive = false;
        state.score = 1;

        let mut rec = Recorder::default();
        draw_bricks(&state, &mut rec);

        let rects = rec.ops.iter().filter(|op| op.starts_with("rect")).count();
        // background + paddle + 27 bricks
        assert_eq!(rects, 29);
        assert!(rec.ops.iter().any(|op| op.starts_with("circle 280 330 8")));
        assert_eq!(rec.ops.last().map(String::as_str), Some("text Score: 1"));
    }

    #[test]
    fn test_brick_colors() {
        assert_eq!(brick_color(0, 0), "hsl(0 90% 60%)");
        assert_eq!(brick_color(6, 3), "hsl(330 90% 60%)");
        assert_eq!(brick_color(2, 4), "hsl(350 90% 60%)");
    }

    #[test]
    fn test_hangman_parts_follow_misses() {
        let mut state = HangmanState::with_word("GUITAR", "Stringed instrument.", 6);
        let mut rec = Recorder::default();
        draw_hangman(&state, &mut rec);
        assert!(!rec.ops.iter().any(|op| op.starts_with("circle")));

        state.guess('B');
        state.guess('C');
        state.guess('D');
        let mut rec = Recorder::default();
        draw_hangman(&state, &mut rec);
        assert_eq!(rec.ops.iter().filter(|op| op.starts_with("circle")).count(), 1);
        // background + 4 gallows pieces + body + left arm
        assert_eq!(rec.ops.iter().filter(|op| op.starts_with("rect")).count(), 7);
        assert!(rec.ops.contains(&"text Incorrect guesses: 3 / 6".to_string()));
    }
}
