//! Wave director
//!
//! Decides how many enemies a wave has, which types they are and where on
//! the arena edge each one appears.

use glam::Vec2;

use super::collision::Aabb;
use super::rng::RandomSource;
use super::state::{Enemy, EnemyKind};
use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH, WALL_THICKNESS};
use crate::tuning::{Tuning, WaveTuning};

/// Enemies in a wave (non-decreasing in `wave`, which is 1-based)
pub fn wave_size(wave: u32, waves: &WaveTuning) -> u32 {
    waves.base_count + waves.per_wave * wave.saturating_sub(1)
}

/// Type mix: chasers only in wave 1, chasers and shooters at even odds in
/// wave 2, tanks at `tank_chance` from wave 3 with the rest split evenly.
pub fn pick_kind(wave: u32, waves: &WaveTuning, rng: &mut impl RandomSource) -> EnemyKind {
    match wave {
        0 | 1 => EnemyKind::Chaser,
        2 => {
            if rng.next_f32() < 0.5 {
                EnemyKind::Chaser
            } else {
                EnemyKind::Shooter
            }
        }
        _ => {
            let roll = rng.next_f32();
            let split = waves.tank_chance + (1.0 - waves.tank_chance) / 2.0;
            if roll < waves.tank_chance {
                EnemyKind::Tank
            } else if roll < split {
                EnemyKind::Chaser
            } else {
                EnemyKind::Shooter
            }
        }
    }
}

/// Random point along a uniformly chosen edge, `padding` inside the walls
pub fn spawn_point(padding: f32, rng: &mut impl RandomSource) -> Vec2 {
    let inset = WALL_THICKNESS + padding;
    let min = Vec2::splat(inset);
    let max = Vec2::new(ARENA_WIDTH - inset, ARENA_HEIGHT - inset);

    let edge = rng.index(4);
    let t = rng.next_f32();
    match edge {
        0 => Vec2::new(min.x + (max.x - min.x) * t, min.y), // top
        1 => Vec2::new(max.x, min.y + (max.y - min.y) * t), // right
        2 => Vec2::new(min.x + (max.x - min.x) * t, max.y), // bottom
        _ => Vec2::new(min.x, min.y + (max.y - min.y) * t), // left
    }
}

/// Spawn rolls tried before falling back to the opposite edge
pub const SPAWN_ATTEMPTS: u32 = 8;

/// Edge spawn point for a body of `size` that stays clear of `avoid`.
///
/// Rerolls up to `SPAWN_ATTEMPTS` times, then mirrors the last roll through
/// the arena center onto the opposite edge.
pub fn clear_spawn_point(
    padding: f32,
    size: Vec2,
    avoid: Option<&Aabb>,
    rng: &mut impl RandomSource,
) -> Vec2 {
    let mut pos = spawn_point(padding, rng);
    let Some(avoid) = avoid else {
        return pos;
    };

    for _ in 1..SPAWN_ATTEMPTS {
        if !Aabb::new(pos, size).overlaps(avoid) {
            return pos;
        }
        pos = spawn_point(padding, rng);
    }
    if Aabb::new(pos, size).overlaps(avoid) {
        pos = Vec2::new(ARENA_WIDTH, ARENA_HEIGHT) - pos;
        log::debug!("Spawn blocked by player, using opposite edge {:?}", pos);
    }
    pos
}

/// Build the enemies for `wave`, keeping every spawn off `avoid` (the
/// player's box). `next_id` allocates entity IDs.
pub fn generate_wave(
    wave: u32,
    tuning: &Tuning,
    avoid: Option<&Aabb>,
    rng: &mut impl RandomSource,
    mut next_id: impl FnMut() -> u32,
) -> Vec<Enemy> {
    let count = wave_size(wave, &tuning.waves);
    let mut enemies = Vec::with_capacity(count as usize);

    for _ in 0..count {
        let kind = pick_kind(wave, &tuning.waves, rng);
        let size = Vec2::splat(tuning.enemy(kind).size);
        let pos = clear_spawn_point(tuning.waves.spawn_padding, size, avoid, rng);
        enemies.push(Enemy::new(next_id(), kind, pos, tuning));
    }

    log::info!("Wave {}: spawning {} enemies", wave, count);
    enemies
}
