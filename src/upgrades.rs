//! Upgrade catalog
//!
//! A static list of named stat mutators. Multiplicative entries compound
//! when picked again; flag entries are no-ops once set.

use serde::{Deserialize, Serialize};

use crate::sim::{Player, RandomSource};

/// Rarity tier shown on the upgrade card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
        }
    }
}

/// A named player stat mutator
#[derive(Debug, Clone, Copy)]
pub struct Upgrade {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub rarity: Rarity,
    apply: fn(&mut Player),
}

impl Upgrade {
    /// Mutate the player in place
    pub fn apply(&self, player: &mut Player) {
        (self.apply)(player);
        log::debug!("Applied upgrade {} ({})", self.id, self.rarity.as_str());
    }
}

/// HP restored per kill with life steal
pub const LIFE_STEAL_HEAL: f32 = 2.0;

static CATALOG: [Upgrade; 10] = [
    Upgrade {
        id: "vitality",
        name: "Vitality",
        description: "+20 max HP",
        rarity: Rarity::Common,
        apply: |p| {
            p.max_hp += 20.0;
            p.heal(20.0);
        },
    },
    Upgrade {
        id: "field_medic",
        name: "Field Medic",
        description: "Restore 30 HP",
        rarity: Rarity::Common,
        apply: |p| p.heal(30.0),
    },
    Upgrade {
        id: "trigger_finger",
        name: "Trigger Finger",
        description: "+15% fire rate",
        rarity: Rarity::Common,
        apply: |p| p.fire_rate *= 1.15,
    },
    Upgrade {
        id: "heavy_rounds",
        name: "Heavy Rounds",
        description: "+5 bullet damage",
        rarity: Rarity::Common,
        apply: |p| p.damage += 5.0,
    },
    Upgrade {
        id: "velocity_rounds",
        name: "Velocity Rounds",
        description: "+20% bullet speed",
        rarity: Rarity::Common,
        apply: |p| p.bullet_speed *= 1.2,
    },
    Upgrade {
        id: "steady_aim",
        name: "Steady Aim",
        description: "-30% bullet spread",
        rarity: Rarity::Rare,
        apply: |p| p.bullet_spread *= 0.7,
    },
    Upgrade {
        id: "fleet_foot",
        name: "Fleet Foot",
        description: "+10% movement speed",
        rarity: Rarity::Rare,
        apply: |p| p.speed *= 1.1,
    },
    Upgrade {
        id: "quick_recovery",
        name: "Quick Recovery",
        description: "-20% dash cooldown",
        rarity: Rarity::Rare,
        apply: |p| p.dash_cooldown_time *= 0.8,
    },
    Upgrade {
        id: "double_shot",
        name: "Double Shot",
        description: "Every shot fires a second bullet",
        rarity: Rarity::Epic,
        apply: |p| p.double_shot = true,
    },
    Upgrade {
        id: "life_steal",
        name: "Life Steal",
        description: "Kills restore 2 HP",
        rarity: Rarity::Legendary,
        apply: |p| p.life_steal = true,
    },
];

/// The full catalog
pub fn catalog() -> &'static [Upgrade] {
    &CATALOG
}

/// Look up an upgrade by id
pub fn find(id: &str) -> Option<&'static Upgrade> {
    CATALOG.iter().find(|u| u.id == id)
}

/// Apply an upgrade by id; returns false for unknown ids
pub fn apply_by_id(id: &str, player: &mut Player) -> bool {
    match find(id) {
        Some(upgrade) => {
            upgrade.apply(player);
            true
        }
        None => {
            log::warn!("Unknown upgrade id: {id}");
            false
        }
    }
}

/// Sample `count` distinct upgrades uniformly (partial Fisher-Yates)
pub fn offer(rng: &mut impl RandomSource, count: usize) -> Vec<&'static Upgrade> {
    let mut pool: Vec<&'static Upgrade> = CATALOG.iter().collect();
    let count = count.min(pool.len());
    for i in 0..count {
        let j = i + rng.index(pool.len() - i);
        pool.swap(i, j);
    }
    pool.truncate(count);
    pool
}
