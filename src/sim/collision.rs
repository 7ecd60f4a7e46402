//! Axis-aligned collision detection and movement resolution
//!
//! Everything in the arena is an axis-aligned box described by its center
//! and full size. Movement is resolved one axis at a time so an entity
//! pressed diagonally against an obstacle slides along its face.

use glam::Vec2;

use super::state::Obstacle;
use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH, WALL_THICKNESS};

/// Center-based axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half: size * 0.5,
        }
    }

    /// Strict overlap: boxes that only share an edge do not overlap
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let d = (self.center - other.center).abs();
        let reach = self.half + other.half;
        d.x < reach.x && d.y < reach.y
    }
}

/// Overlap test between two boxes given by center and size
#[inline]
pub fn overlaps(a_pos: Vec2, a_size: Vec2, b_pos: Vec2, b_size: Vec2) -> bool {
    Aabb::new(a_pos, a_size).overlaps(&Aabb::new(b_pos, b_size))
}

/// Clamp a center so the full box stays inside the walls
pub fn clamp_to_arena(pos: Vec2, size: Vec2) -> Vec2 {
    let half = size * 0.5;
    let min = Vec2::splat(WALL_THICKNESS) + half;
    let max = Vec2::new(ARENA_WIDTH - WALL_THICKNESS, ARENA_HEIGHT - WALL_THICKNESS) - half;
    // Boxes wider than the interior pin to its middle instead of inverting
    Vec2::new(
        if min.x <= max.x { pos.x.clamp(min.x, max.x) } else { ARENA_WIDTH / 2.0 },
        if min.y <= max.y { pos.y.clamp(min.y, max.y) } else { ARENA_HEIGHT / 2.0 },
    )
}

/// Bounds check for projectiles: true once the center leaves the interior
pub fn outside_arena(pos: Vec2) -> bool {
    pos.x < WALL_THICKNESS
        || pos.x > ARENA_WIDTH - WALL_THICKNESS
        || pos.y < WALL_THICKNESS
        || pos.y > ARENA_HEIGHT - WALL_THICKNESS
}

fn blocked(pos: Vec2, size: Vec2, obstacles: &[Obstacle]) -> bool {
    let probe = Aabb::new(pos, size);
    obstacles.iter().any(|o| probe.overlaps(&o.body.aabb()))
}

/// Move a box by `delta`, clamped to the arena, then resolved against each
/// obstacle: the X-only move is tried first and reverted if blocked, then
/// the Y-only move from the resulting position.
pub fn move_with_obstacles(pos: Vec2, size: Vec2, delta: Vec2, obstacles: &[Obstacle]) -> Vec2 {
    let target = clamp_to_arena(pos + delta, size);

    let mut resolved = pos;
    let try_x = Vec2::new(target.x, resolved.y);
    if !blocked(try_x, size, obstacles) {
        resolved = try_x;
    }
    let try_y = Vec2::new(resolved.x, target.y);
    if !blocked(try_y, size, obstacles) {
        resolved = try_y;
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Body;
    use proptest::prelude::*;

    fn pillar(pos: Vec2, size: Vec2) -> Obstacle {
        Obstacle {
            body: Body::new(99, pos, size),
        }
    }

    #[test]
    fn test_overlap_basic() {
        let a = Aabb::new(Vec2::new(0.0, 0.0), Vec2::splat(10.0));
        let b = Aabb::new(Vec2::new(8.0, 3.0), Vec2::splat(10.0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_edge_touch_is_not_overlap() {
        let a = Aabb::new(Vec2::new(0.0, 0.0), Vec2::splat(10.0));
        let b = Aabb::new(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        assert!(!a.overlaps(&b));
        let c = Aabb::new(Vec2::new(0.0, 10.0), Vec2::splat(10.0));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_clamp_to_arena_keeps_box_inside() {
        let size = Vec2::splat(30.0);
        let p = clamp_to_arena(Vec2::new(-500.0, 5000.0), size);
        assert_eq!(p.x, WALL_THICKNESS + 15.0);
        assert_eq!(p.y, ARENA_HEIGHT - WALL_THICKNESS - 15.0);
    }

    #[test]
    fn test_outside_arena() {
        assert!(!outside_arena(Vec2::new(640.0, 360.0)));
        assert!(outside_arena(Vec2::new(WALL_THICKNESS - 1.0, 360.0)));
        assert!(outside_arena(Vec2::new(640.0, ARENA_HEIGHT)));
    }

    #[test]
    fn test_blocked_move_reverts() {
        let obstacles = vec![pillar(Vec2::new(200.0, 200.0), Vec2::splat(60.0))];
        let size = Vec2::splat(20.0);
        // Left face of the pillar is at x=170; box half-width 10
        let start = Vec2::new(155.0, 200.0);
        let end = move_with_obstacles(start, size, Vec2::new(10.0, 0.0), &obstacles);
        assert_eq!(end, start);
    }

    #[test]
    fn test_diagonal_slides_along_face() {
        let obstacles = vec![pillar(Vec2::new(200.0, 200.0), Vec2::splat(60.0))];
        let size = Vec2::splat(20.0);
        let start = Vec2::new(155.0, 200.0);
        let end = move_with_obstacles(start, size, Vec2::new(10.0, 10.0), &obstacles);
        assert_eq!(end.x, start.x);
        assert_eq!(end.y, 210.0);
    }

    #[test]
    fn test_free_move_is_unchanged() {
        let end = move_with_obstacles(Vec2::new(400.0, 400.0), Vec2::splat(20.0), Vec2::new(5.0, -3.0), &[]);
        assert_eq!(end, Vec2::new(405.0, 397.0));
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(
            ax in -100.0f32..100.0, ay in -100.0f32..100.0,
            bx in -100.0f32..100.0, by in -100.0f32..100.0,
            aw in 1.0f32..50.0, ah in 1.0f32..50.0,
            bw in 1.0f32..50.0, bh in 1.0f32..50.0,
        ) {
            let a = Vec2::new(ax, ay);
            let b = Vec2::new(bx, by);
            let sa = Vec2::new(aw, ah);
            let sb = Vec2::new(bw, bh);
            prop_assert_eq!(overlaps(a, sa, b, sb), overlaps(b, sb, a, sa));
        }

        #[test]
        fn prop_moves_stay_inside_arena(
            x in 0.0f32..ARENA_WIDTH, y in 0.0f32..ARENA_HEIGHT,
            dx in -2000.0f32..2000.0, dy in -2000.0f32..2000.0,
        ) {
            let size = Vec2::splat(30.0);
            let start = clamp_to_arena(Vec2::new(x, y), size);
            let end = move_with_obstacles(start, size, Vec2::new(dx, dy), &[]);
            prop_assert!(end.x - 15.0 >= WALL_THICKNESS - 1e-3);
            prop_assert!(end.x + 15.0 <= ARENA_WIDTH - WALL_THICKNESS + 1e-3);
            prop_assert!(end.y - 15.0 >= WALL_THICKNESS - 1e-3);
            prop_assert!(end.y + 15.0 <= ARENA_HEIGHT - WALL_THICKNESS + 1e-3);
        }
    }
}
