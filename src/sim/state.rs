//! Entity model and run-state machine
//!
//! Entities are plain value records owned by the engine's collections.
//! Nothing holds a reference back to another entity.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::tuning::{PlayerTuning, Tuning};

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    /// Title screen, no run in progress
    MainMenu,
    /// Active gameplay (the only state that simulates)
    Playing,
    /// Choosing one of the offered upgrades
    UpgradeSelect,
    /// Run suspended
    Paused,
    /// Player HP reached zero
    GameOver,
    /// Meta-upgrade shop
    MetaMenu,
    /// Settings screen
    Settings,
}

/// Inputs that drive run-state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEvent {
    StartRun,
    Pause,
    Resume,
    OpenSettings,
    OpenMetaMenu,
    BackToMenu,
    OfferUpgrades,
    UpgradeChosen,
    PlayerDefeated,
}

impl RunState {
    /// Next state for `event`, or `None` if the event is not legal here
    pub fn next(self, event: RunEvent) -> Option<RunState> {
        use RunEvent::*;
        use RunState::*;

        match (self, event) {
            (MainMenu | GameOver, StartRun) => Some(Playing),
            (Playing, Pause) => Some(Paused),
            (Paused, Resume) => Some(Playing),
            (MainMenu, OpenSettings) => Some(Settings),
            (MainMenu, OpenMetaMenu) => Some(MetaMenu),
            (Settings | MetaMenu | Paused | GameOver, BackToMenu) => Some(MainMenu),
            (Playing, OfferUpgrades) => Some(UpgradeSelect),
            (UpgradeSelect, UpgradeChosen) => Some(Playing),
            (Playing, PlayerDefeated) => Some(GameOver),
            _ => None,
        }
    }
}

/// Shared shape of every entity: center position and axis-aligned size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub id: u32,
    /// Center position
    pub pos: Vec2,
    /// Full width/height
    pub size: Vec2,
    /// Set to remove the entity at the end of the current tick
    #[serde(skip)]
    pub marked_for_removal: bool,
}

impl Body {
    pub fn new(id: u32, pos: Vec2, size: Vec2) -> Self {
        Self {
            id,
            pos,
            size,
            marked_for_removal: false,
        }
    }

    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// The player-controlled entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub hp: f32,
    pub max_hp: f32,
    pub speed: f32,
    /// Reserved; movement is displacement-based
    pub vel: Vec2,

    // Dash
    /// Seconds until the dash is available again (ready at <= 0)
    pub dash_cooldown: f32,
    /// Seconds left in the active dash (dashing while > 0)
    pub dash_timer: f32,
    /// Velocity frozen for the active dash
    pub dash_vel: Vec2,
    pub dash_speed: f32,
    pub dash_duration: f32,
    /// Cooldown started by each dash
    pub dash_cooldown_time: f32,
    /// True exactly while dashing
    pub is_invulnerable: bool,
    /// Post-hit grace timer
    pub invulnerability_timer: f32,
    pub hit_grace: f32,

    /// Aim direction (radians), recomputed every tick from the pointer
    pub aim_angle: f32,

    // Weapon
    pub damage: f32,
    /// Shots per second
    pub fire_rate: f32,
    /// Seconds since the last shot
    pub last_fired: f32,
    pub bullet_speed: f32,
    pub bullet_spread: f32,
    pub bullet_size: f32,

    // Ability flags granted by upgrades
    pub double_shot: bool,
    pub life_steal: bool,
}

impl Player {
    pub fn new(id: u32, pos: Vec2, t: &PlayerTuning) -> Self {
        Self {
            body: Body::new(id, pos, Vec2::splat(t.size)),
            hp: t.max_hp,
            max_hp: t.max_hp,
            speed: t.speed,
            vel: Vec2::ZERO,
            dash_cooldown: 0.0,
            dash_timer: 0.0,
            dash_vel: Vec2::ZERO,
            dash_speed: t.dash_speed,
            dash_duration: t.dash_duration,
            dash_cooldown_time: t.dash_cooldown,
            is_invulnerable: false,
            invulnerability_timer: 0.0,
            hit_grace: t.hit_grace,
            aim_angle: 0.0,
            damage: t.damage,
            fire_rate: t.fire_rate,
            last_fired: 0.0,
            bullet_speed: t.bullet_speed,
            bullet_spread: t.bullet_spread,
            bullet_size: t.bullet_size,
            double_shot: false,
            life_steal: false,
        }
    }

    #[inline]
    pub fn is_dashing(&self) -> bool {
        self.dash_timer > 0.0
    }

    /// True while dashing or inside the post-hit grace window
    #[inline]
    pub fn is_protected(&self) -> bool {
        self.is_invulnerable || self.invulnerability_timer > 0.0
    }

    #[inline]
    pub fn is_defeated(&self) -> bool {
        self.hp <= 0.0
    }

    /// Apply a hit unless protected or already defeated. Returns whether
    /// the hit landed.
    pub fn take_hit(&mut self, damage: f32) -> bool {
        if self.is_protected() || self.is_defeated() {
            return false;
        }
        self.hp = (self.hp - damage.max(0.0)).clamp(0.0, self.max_hp);
        self.invulnerability_timer = self.hit_grace;
        true
    }

    /// Restore HP, capped at `max_hp`
    pub fn heal(&mut self, amount: f32) {
        if self.is_defeated() {
            return;
        }
        self.hp = (self.hp + amount.max(0.0)).min(self.max_hp);
    }
}

/// Enemy behavior selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Runs straight at the player
    Chaser,
    /// Keeps its distance and fires aimed shots
    Shooter,
    /// Slow, heavy chaser
    Tank,
}

/// Ranged attack state carried only by shooters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RangedAttack {
    pub attack_range: f32,
    pub range_buffer: f32,
    pub fire_rate: f32,
    pub last_fired: f32,
    pub bullet_speed: f32,
    pub bullet_size: f32,
}

/// An adversary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub body: Body,
    pub kind: EnemyKind,
    pub hp: f32,
    pub max_hp: f32,
    pub speed: f32,
    pub vel: Vec2,
    pub damage: f32,
    /// Hit-flash timer (cosmetic)
    pub hit_timer: f32,
    pub ranged: Option<RangedAttack>,
}

impl Enemy {
    pub fn new(id: u32, kind: EnemyKind, pos: Vec2, tuning: &Tuning) -> Self {
        let stats = tuning.enemy(kind);
        let ranged = (kind == EnemyKind::Shooter).then(|| RangedAttack {
            attack_range: tuning.shooter.attack_range,
            range_buffer: tuning.shooter.range_buffer,
            fire_rate: tuning.shooter.fire_rate,
            last_fired: 0.0,
            bullet_speed: tuning.shooter.bullet_speed,
            bullet_size: tuning.shooter.bullet_size,
        });

        Self {
            body: Body::new(id, pos, Vec2::splat(stats.size)),
            kind,
            hp: stats.hp,
            max_hp: stats.hp,
            speed: stats.speed,
            vel: Vec2::ZERO,
            damage: stats.damage,
            hit_timer: 0.0,
            ranged,
        }
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }
}

/// A projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub body: Body,
    pub vel: Vec2,
    pub damage: f32,
    /// Fired by an enemy (harms the player) rather than the player
    pub is_enemy: bool,
}

/// Static impassable block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub body: Body,
}
