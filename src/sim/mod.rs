//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering
//! and platform code:
//! - Time arrives as a `dt` argument, never read from a clock
//! - Randomness only through an injected `RandomSource`
//! - Stable iteration order (by entity ID)

pub mod collision;
pub mod input;
pub mod rng;
pub mod state;
pub mod tick;
pub mod wave;

pub use collision::{Aabb, clamp_to_arena, move_with_obstacles, outside_arena, overlaps};
pub use input::{Control, InputState, TickInput};
pub use rng::{RandomSource, ScriptedRandom, SimRng};
pub use state::{
    Body, Bullet, Enemy, EnemyKind, Obstacle, Player, RangedAttack, RunEvent, RunState,
};
pub use tick::{GameLogic, Snapshot};
pub use wave::{clear_spawn_point, generate_wave, pick_kind, spawn_point, wave_size};
