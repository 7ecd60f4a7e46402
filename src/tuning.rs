//! Data-driven game balance
//!
//! Every number the simulation uses lives here so a run can be rebalanced
//! from a JSON file without touching code.

use std::path::Path;

use anyhow::{Context, Result, bail};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH};
use crate::sim::EnemyKind;

/// Difficulty preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "norm" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Multiplier for enemy hit points
    pub fn enemy_hp_scale(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.75,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.3,
        }
    }

    /// Multiplier for enemy contact and bullet damage
    pub fn enemy_damage_scale(&self) -> f32 {
        match self {
            Difficulty::Easy => 0.75,
            Difficulty::Normal => 1.0,
            Difficulty::Hard => 1.25,
        }
    }

    /// Enemies added per wave
    pub fn enemies_per_wave(&self) -> u32 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Normal => 2,
            Difficulty::Hard => 3,
        }
    }
}

/// Player base stats, restored on every reset
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub size: f32,
    pub max_hp: f32,
    /// Movement speed (units/sec)
    pub speed: f32,
    pub damage: f32,
    /// Shots per second
    pub fire_rate: f32,
    pub bullet_speed: f32,
    /// Total width of the random firing cone (radians)
    pub bullet_spread: f32,
    pub bullet_size: f32,
    pub dash_speed: f32,
    /// Seconds a dash lasts (and stays invulnerable)
    pub dash_duration: f32,
    /// Seconds before the next dash is available
    pub dash_cooldown: f32,
    /// Post-hit grace period (seconds)
    pub hit_grace: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            size: 30.0,
            max_hp: 100.0,
            speed: 250.0,
            damage: 10.0,
            fire_rate: 3.0,
            bullet_speed: 600.0,
            bullet_spread: 0.1,
            bullet_size: 8.0,
            dash_speed: 700.0,
            dash_duration: 0.2,
            dash_cooldown: 1.0,
            hit_grace: 0.5,
        }
    }
}

/// Body stats for one enemy type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyTuning {
    pub size: f32,
    pub hp: f32,
    pub speed: f32,
    /// Contact damage (and bullet damage for shooters)
    pub damage: f32,
}

/// Ranged behavior for shooters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShooterTuning {
    /// Preferred stand-off distance from the player
    pub attack_range: f32,
    /// Dead zone around `attack_range` where the shooter holds position
    pub range_buffer: f32,
    pub fire_rate: f32,
    pub bullet_speed: f32,
    pub bullet_size: f32,
}

impl Default for ShooterTuning {
    fn default() -> Self {
        Self {
            attack_range: 300.0,
            range_buffer: 50.0,
            fire_rate: 0.8,
            bullet_speed: 300.0,
            bullet_size: 10.0,
        }
    }
}

/// Wave pacing and composition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveTuning {
    /// Seconds the arena must stay empty before the next wave
    pub inter_wave_delay: f32,
    /// Enemies in wave 1
    pub base_count: u32,
    /// Enemies added per wave after the first
    pub per_wave: u32,
    /// Chance of a tank from wave 3 on
    pub tank_chance: f32,
    /// Distance spawns are pushed inward from the walls
    pub spawn_padding: f32,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            inter_wave_delay: 2.0,
            base_count: 3,
            per_wave: 2,
            tank_chance: 0.15,
            spawn_padding: 60.0,
        }
    }
}

/// A static obstacle placed on reset
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ObstaclePlacement {
    pub pos: Vec2,
    pub size: Vec2,
}

/// Complete balance sheet
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub difficulty: Difficulty,
    pub player: PlayerTuning,
    pub chaser: EnemyTuning,
    pub shooter_body: EnemyTuning,
    pub tank: EnemyTuning,
    pub shooter: ShooterTuning,
    pub waves: WaveTuning,
    /// Fixed push applied per tick to overlapping enemies
    pub separation_push: f32,
    /// Seconds an enemy flashes after being hit
    pub hit_flash: f32,
    pub obstacles: Vec<ObstaclePlacement>,
}

impl Default for Tuning {
    fn default() -> Self {
        let pillar = Vec2::splat(60.0);
        let quarter = |fx: f32, fy: f32| ObstaclePlacement {
            pos: Vec2::new(ARENA_WIDTH * fx, ARENA_HEIGHT * fy),
            size: pillar,
        };

        Self {
            difficulty: Difficulty::Normal,
            player: PlayerTuning::default(),
            chaser: EnemyTuning {
                size: 28.0,
                hp: 30.0,
                speed: 120.0,
                damage: 10.0,
            },
            shooter_body: EnemyTuning {
                size: 28.0,
                hp: 20.0,
                speed: 90.0,
                damage: 8.0,
            },
            tank: EnemyTuning {
                size: 44.0,
                hp: 80.0,
                speed: 60.0,
                damage: 20.0,
            },
            shooter: ShooterTuning::default(),
            waves: WaveTuning::default(),
            separation_push: 1.5,
            hit_flash: 0.1,
            obstacles: vec![
                quarter(0.25, 0.25),
                quarter(0.75, 0.25),
                quarter(0.25, 0.75),
                quarter(0.75, 0.75),
            ],
        }
    }
}

impl Tuning {
    /// Create tuning from a difficulty preset (scales enemies and wave growth)
    pub fn from_preset(preset: Difficulty) -> Self {
        let mut tuning = Self::default();
        tuning.difficulty = preset;

        let hp = preset.enemy_hp_scale();
        let dmg = preset.enemy_damage_scale();
        for body in [&mut tuning.chaser, &mut tuning.shooter_body, &mut tuning.tank] {
            body.hp *= hp;
            body.damage *= dmg;
        }
        tuning.waves.per_wave = preset.enemies_per_wave();
        if preset == Difficulty::Hard {
            tuning.waves.tank_chance = 0.25;
        }
        tuning
    }

    /// Body stats for an enemy type
    pub fn enemy(&self, kind: EnemyKind) -> &EnemyTuning {
        match kind {
            EnemyKind::Chaser => &self.chaser,
            EnemyKind::Shooter => &self.shooter_body,
            EnemyKind::Tank => &self.tank,
        }
    }

    /// Parse and validate a JSON balance sheet. Missing fields at any depth
    /// keep their shipped value, so `{"tank": {"hp": 120}}` only retunes tank hp.
    pub fn from_json(json: &str) -> Result<Self> {
        let patch: Value = serde_json::from_str(json).context("failed to parse tuning json")?;
        let mut merged =
            serde_json::to_value(Self::default()).context("failed to encode default tuning")?;
        merge_json(&mut merged, patch);

        let tuning: Tuning = serde_json::from_value(merged).context("failed to parse tuning json")?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load a balance sheet from disk
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed reading {}", path.display()))?;
        let tuning = Self::from_json(&json)
            .with_context(|| format!("invalid tuning file {}", path.display()))?;
        log::info!("Loaded tuning from {} ({})", path.display(), tuning.difficulty.as_str());
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<()> {
        let p = &self.player;
        if p.size <= 0.0 || p.max_hp <= 0.0 || p.bullet_size <= 0.0 {
            bail!("player size, max_hp and bullet_size must be positive");
        }
        if p.speed <= 0.0 || p.dash_speed <= 0.0 || p.bullet_speed <= 0.0 {
            bail!("player speeds must be positive");
        }
        if p.fire_rate <= 0.0 {
            bail!("player fire_rate must be positive (got {})", p.fire_rate);
        }
        for (name, body) in [
            ("chaser", &self.chaser),
            ("shooter_body", &self.shooter_body),
            ("tank", &self.tank),
        ] {
            if body.size <= 0.0 || body.hp <= 0.0 {
                bail!("{name} size and hp must be positive");
            }
        }
        if self.shooter.fire_rate <= 0.0 || self.shooter.bullet_size <= 0.0 {
            bail!("shooter fire_rate and bullet_size must be positive");
        }
        if self.waves.inter_wave_delay < 0.0 {
            bail!("inter_wave_delay must not be negative");
        }
        if !(0.0..=1.0).contains(&self.waves.tank_chance) {
            bail!("tank_chance must be within [0, 1]");
        }
        if self.obstacles.iter().any(|o| o.size.x <= 0.0 || o.size.y <= 0.0) {
            bail!("obstacle sizes must be positive");
        }
        Ok(())
    }
}

/// Overlay `patch` onto `base`; objects merge key by key, anything else replaces
fn merge_json(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                merge_json(base.entry(key).or_insert(Value::Null), value);
            }
        }
        (base, patch) => *base = patch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(Tuning::default().validate().is_ok());
    }

    #[test]
    fn test_difficulty_round_trip_names() {
        for d in [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard] {
            assert_eq!(Difficulty::from_str(d.as_str()), Some(d));
        }
        assert_eq!(Difficulty::from_str("nightmare"), None);
    }

    #[test]
    fn test_hard_preset_scales_enemies() {
        let normal = Tuning::default();
        let hard = Tuning::from_preset(Difficulty::Hard);
        assert!(hard.tank.hp > normal.tank.hp);
        assert!(hard.chaser.damage > normal.chaser.damage);
        assert!(hard.waves.per_wave > normal.waves.per_wave);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json(r#"{ "player": { "max_hp": 150.0 } }"#).unwrap();
        assert_eq!(tuning.player.max_hp, 150.0);
        assert_eq!(tuning.player.fire_rate, 3.0);
        assert_eq!(tuning.obstacles.len(), 4);
    }

    #[test]
    fn test_invalid_fire_rate_rejected() {
        let err = Tuning::from_json(r#"{ "player": { "fire_rate": 0.0 } }"#).unwrap_err();
        assert!(format!("{err:#}").contains("fire_rate"));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(Tuning::from_json("{ not json").is_err());
    }

    #[test]
    fn test_partial_enemy_block_keeps_kind_defaults() {
        let tuning = Tuning::from_json(r#"{ "tank": { "hp": 120.0 } }"#).unwrap();
        let shipped = Tuning::default();
        assert_eq!(tuning.tank.hp, 120.0);
        assert_eq!(tuning.tank.size, shipped.tank.size);
        assert_eq!(tuning.tank.speed, shipped.tank.speed);
        assert_eq!(tuning.tank.damage, shipped.tank.damage);
        assert_eq!(tuning.chaser.hp, shipped.chaser.hp);
    }

    #[test]
    fn test_obstacle_list_replaced_wholesale() {
        let tuning = Tuning::from_json(
            r#"{ "obstacles": [ { "pos": [400.0, 300.0], "size": [80.0, 40.0] } ] }"#,
        )
        .unwrap();
        assert_eq!(tuning.obstacles.len(), 1);
        assert_eq!(tuning.obstacles[0].size, Vec2::new(80.0, 40.0));
    }

    #[test]
    fn test_zero_player_speed_rejected() {
        let err = Tuning::from_json(r#"{ "player": { "speed": 0.0 } }"#).unwrap_err();
        assert!(format!("{err:#}").contains("speeds must be positive"));
    }
}
