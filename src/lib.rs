//! Wave Arena - a walled arena shooter with escalating enemy waves
//!
//! Core modules:
//! - `sim`: Simulation engine (movement, collisions, enemy AI, waves)
//! - `upgrades`: Static catalog of player stat mutators
//! - `tuning`: Data-driven game balance
//! - `autopilot`: Demo input provider that plays the game

pub mod autopilot;
pub mod sim;
pub mod tuning;
pub mod upgrades;

pub use tuning::{Difficulty, Tuning};
pub use upgrades::{Rarity, Upgrade};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed host timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Arena dimensions (entity coordinates, origin at top-left corner)
    pub const ARENA_WIDTH: f32 = 1280.0;
    pub const ARENA_HEIGHT: f32 = 720.0;
    /// Wall thickness on every side of the arena
    pub const WALL_THICKNESS: f32 = 20.0;

    /// Upgrades offered per selection screen
    pub const UPGRADE_CHOICES: usize = 3;
}

/// Angle (radians) of the vector pointing from `from` to `to`
#[inline]
pub fn angle_to(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Unit vector for an angle in radians
#[inline]
pub fn unit_from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

/// Center of the arena
#[inline]
pub fn arena_center() -> Vec2 {
    Vec2::new(consts::ARENA_WIDTH / 2.0, consts::ARENA_HEIGHT / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_angle_to_axes() {
        let origin = Vec2::new(10.0, 10.0);
        assert!(angle_to(origin, Vec2::new(20.0, 10.0)).abs() < 1e-6);
        assert!((angle_to(origin, Vec2::new(10.0, 30.0)) - FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_unit_from_angle_is_unit() {
        for i in 0..16 {
            let v = unit_from_angle(i as f32 * 0.4);
            assert!((v.length() - 1.0).abs() < 1e-5);
        }
    }
}
