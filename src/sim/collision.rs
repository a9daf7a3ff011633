//! Collision detection and response
//!
//! Pure functions only: every input is passed in, nothing is cached between
//! calls. The bounce game composes these in a fixed order each tick
//! (walls, then paddle, then bricks) and resolves at most one brick per tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grid::Cell;

/// Axis-aligned rectangle in board pixels (origin top-left, y grows down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }
}

/// Exact cell equality (self-collision and food tests)
#[inline]
pub fn cells_equal(a: Cell, b: Cell) -> bool {
    a.x == b.x && a.y == b.y
}

/// Ball/rectangle overlap: the rectangle grown by `radius` on every side must
/// strictly contain the circle centre.
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    center.x > rect.x - radius
        && center.x < rect.right() + radius
        && center.y > rect.y - radius
        && center.y < rect.bottom() + radius
}

/// Reflect velocity off the side walls and the ceiling.
///
/// Tested against the *next* position. The floor is not a wall; falling past
/// it is handled by [`paddle_contact`].
pub fn wall_bounce(pos: Vec2, vel: Vec2, radius: f32, board_width: f32) -> Vec2 {
    let next = pos + vel;
    let mut out = vel;
    if next.x > board_width - radius || next.x < radius {
        out.x = -out.x;
    }
    if next.y < radius {
        out.y = -out.y;
    }
    out
}

/// Result of testing the ball against the paddle line
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaddleContact {
    /// Ball is not yet at the paddle line
    Clear,
    /// Ball struck the paddle; carries the new velocity
    Deflect(Vec2),
    /// Ball is inside the paddle band but outside its span, not yet lost
    Passing,
    /// Ball crossed the floor without touching the paddle
    Miss,
}

/// Test the ball against the paddle and the floor.
///
/// A hit always sends the ball upward and adds horizontal english
/// proportional to the contact offset from the paddle centre, normalized to
/// [-1, 1] and scaled by `deflection`.
pub fn paddle_contact(
    pos: Vec2,
    vel: Vec2,
    radius: f32,
    paddle: &Rect,
    board_height: f32,
    deflection: f32,
) -> PaddleContact {
    let next_y = pos.y + vel.y;
    if next_y <= paddle.y - radius {
        return PaddleContact::Clear;
    }

    if pos.x > paddle.x && pos.x < paddle.right() {
        let half = paddle.w / 2.0;
        let offset = ((pos.x - paddle.center_x()) / half).clamp(-1.0, 1.0);
        return PaddleContact::Deflect(Vec2::new(vel.x + offset * deflection, -vel.y.abs()));
    }

    if next_y > board_height - radius {
        PaddleContact::Miss
    } else {
        PaddleContact::Passing
    }
}

/// First candidate (in iteration order) the ball overlaps.
///
/// Candidates are `(key, rect)` pairs; the caller decides the order and
/// filters out dead entities. Only the first overlap is reported.
pub fn first_overlap<K, I>(center: Vec2, radius: f32, candidates: I) -> Option<K>
where
    I: IntoIterator<Item = (K, Rect)>,
{
    candidates
        .into_iter()
        .find(|(_, rect)| circle_rect_overlap(center, radius, rect))
        .map(|(key, _)| key)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BRICK: Rect = Rect::new(15.0, 40.0, 70.0, 18.0);

    #[test]
    fn test_cells_equal() {
        assert!(cells_equal(Cell::new(3, 4), Cell::new(3, 4)));
        assert!(!cells_equal(Cell::new(3, 4), Cell::new(4, 3)));
    }

    #[test]
    fn test_overlap_includes_radius_margin() {
        // Centre 5px left of the brick, radius 8: inside the grown box
        assert!(circle_rect_overlap(Vec2::new(10.0, 50.0), 8.0, &BRICK));
        // Exactly on the grown edge is not an overlap
        assert!(!circle_rect_overlap(Vec2::new(7.0, 50.0), 8.0, &BRICK));
        // Well below
        assert!(!circle_rect_overlap(Vec2::new(50.0, 80.0), 8.0, &BRICK));
    }

    #[test]
    fn test_wall_bounce_sides_and_ceiling() {
        let vel = Vec2::new(3.0, -3.0);

        // Heading into the right wall
        let out = wall_bounce(Vec2::new(550.0, 100.0), vel, 8.0, 560.0);
        assert_eq!(out, Vec2::new(-3.0, -3.0));

        // Heading into the ceiling
        let out = wall_bounce(Vec2::new(100.0, 10.0), vel, 8.0, 560.0);
        assert_eq!(out, Vec2::new(3.0, 3.0));

        // Open field
        let out = wall_bounce(Vec2::new(100.0, 100.0), vel, 8.0, 560.0);
        assert_eq!(out, vel);
    }

    #[test]
    fn test_paddle_centre_hit_goes_straight_up() {
        let paddle = Rect::new(235.0, 342.0, 90.0, 12.0);
        let contact = paddle_contact(
            Vec2::new(280.0, 332.0),
            Vec2::new(0.0, 3.0),
            8.0,
            &paddle,
            360.0,
            1.0,
        );
        assert_eq!(contact, PaddleContact::Deflect(Vec2::new(0.0, -3.0)));
    }

    #[test]
    fn test_paddle_edge_hit_adds_english() {
        let paddle = Rect::new(235.0, 342.0, 90.0, 12.0);
        // 45px right of centre is the edge, so 22.5px is half deflection
        let contact = paddle_contact(
            Vec2::new(302.5, 332.0),
            Vec2::new(1.0, 3.0),
            8.0,
            &paddle,
            360.0,
            1.0,
        );
        match contact {
            PaddleContact::Deflect(v) => {
                assert!((v.x - 1.5).abs() < 1e-5);
                assert_eq!(v.y, -3.0);
            }
            other => panic!("expected deflect, got {other:?}"),
        }
    }

    #[test]
    fn test_paddle_miss_only_past_floor() {
        let paddle = Rect::new(235.0, 342.0, 90.0, 12.0);
        let vel = Vec2::new(0.0, 3.0);

        // In the paddle band, outside the span, still above the floor
        let contact = paddle_contact(Vec2::new(50.0, 332.0), vel, 8.0, &paddle, 360.0, 1.0);
        assert_eq!(contact, PaddleContact::Passing);

        // About to cross the floor
        let contact = paddle_contact(Vec2::new(50.0, 350.0), vel, 8.0, &paddle, 360.0, 1.0);
        assert_eq!(contact, PaddleContact::Miss);

        // High above the paddle
        let contact = paddle_contact(Vec2::new(50.0, 100.0), vel, 8.0, &paddle, 360.0, 1.0);
        assert_eq!(contact, PaddleContact::Clear);
    }

    #[test]
    fn test_first_overlap_respects_order() {
        let a = Rect::new(0.0, 0.0, 20.0, 20.0);
        let b = Rect::new(10.0, 0.0, 20.0, 20.0);
        let hit = first_overlap(Vec2::new(15.0, 10.0), 2.0, [(7, a), (9, b)]);
        assert_eq!(hit, Some(7));
        let hit = first_overlap(Vec2::new(15.0, 10.0), 2.0, [(9, b), (7, a)]);
        assert_eq!(hit, Some(9));
        let hit = first_overlap(Vec2::new(100.0, 100.0), 2.0, [(7, a), (9, b)]);
        assert_eq!(hit, None);
    }
}
