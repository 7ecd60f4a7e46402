//! Simulation engine
//!
//! `GameLogic` owns all mutable world state and advances it one host frame
//! at a time. The order of operations inside `update` is fixed; it decides
//! who wins when several interactions happen in the same tick.

use glam::Vec2;
use serde::Serialize;

use super::collision::{Aabb, move_with_obstacles, outside_arena};
use super::input::{Control, InputState};
use super::rng::{RandomSource, SimRng};
use super::state::{Body, Bullet, Enemy, EnemyKind, Obstacle, Player, RunEvent, RunState};
use super::wave::generate_wave;
use crate::consts::UPGRADE_CHOICES;
use crate::tuning::Tuning;
use crate::upgrades::{self, LIFE_STEAL_HEAL, Upgrade};
use crate::{angle_to, arena_center, unit_from_angle};

/// Read-only view of the world for renderers and HUDs
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub run_state: RunState,
    pub current_wave: u32,
    pub wave_timer: f32,
    pub kills: u32,
    pub elapsed: f32,
    pub player: Option<&'a Player>,
    pub enemies: &'a [Enemy],
    pub bullets: &'a [Bullet],
    pub obstacles: &'a [Obstacle],
    pub offered_upgrades: Vec<&'static str>,
}

/// Shot requested by an enemy during its update
struct PendingShot {
    pos: Vec2,
    vel: Vec2,
    damage: f32,
    size: f32,
}

/// The simulation engine
#[derive(Debug)]
pub struct GameLogic<R: RandomSource = SimRng> {
    pub tuning: Tuning,
    pub run_state: RunState,
    /// `None` until the first reset
    pub player: Option<Player>,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub obstacles: Vec<Obstacle>,
    /// 1-based wave number
    pub current_wave: u32,
    /// Seconds the arena has been empty
    pub wave_timer: f32,
    pub kills: u32,
    /// Seconds of active play this run
    pub elapsed: f32,
    /// Upgrades on offer while in `UpgradeSelect`
    pub offered: Vec<&'static Upgrade>,
    rng: R,
    next_id: u32,
}

impl GameLogic<SimRng> {
    /// Engine with default tuning and a seeded generator
    pub fn new(seed: u64) -> Self {
        Self::with_rng(Tuning::default(), SimRng::new(seed))
    }
}

impl<R: RandomSource> GameLogic<R> {
    /// Engine sitting in the main menu; nothing exists until `reset`
    pub fn with_rng(tuning: Tuning, rng: R) -> Self {
        Self {
            tuning,
            run_state: RunState::MainMenu,
            player: None,
            enemies: Vec::new(),
            bullets: Vec::new(),
            obstacles: Vec::new(),
            current_wave: 1,
            wave_timer: 0.0,
            kills: 0,
            elapsed: 0.0,
            offered: Vec::new(),
            rng,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn current_wave(&self) -> u32 {
        self.current_wave
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            run_state: self.run_state,
            current_wave: self.current_wave,
            wave_timer: self.wave_timer,
            kills: self.kills,
            elapsed: self.elapsed,
            player: self.player.as_ref(),
            enemies: &self.enemies,
            bullets: &self.bullets,
            obstacles: &self.obstacles,
            offered_upgrades: self.offered.iter().map(|u| u.id).collect(),
        }
    }

    /// Fresh run: full-stat player at the center, obstacles from tuning,
    /// wave 1 spawned immediately.
    pub fn reset(&mut self) {
        self.next_id = 1;
        let player_id = self.next_entity_id();
        self.player = Some(Player::new(player_id, arena_center(), &self.tuning.player));

        self.bullets.clear();
        self.enemies.clear();
        self.obstacles.clear();
        for placement in self.tuning.obstacles.clone() {
            let id = self.next_entity_id();
            self.obstacles.push(Obstacle {
                body: Body::new(id, placement.pos, placement.size),
            });
        }

        self.current_wave = 1;
        self.wave_timer = 0.0;
        self.kills = 0;
        self.elapsed = 0.0;
        self.offered.clear();

        self.spawn_wave();
    }

    fn spawn_wave(&mut self) {
        let player_box = self.player.as_ref().map(|p| p.body.aabb());
        let next_id = &mut self.next_id;
        let spawned = generate_wave(
            self.current_wave,
            &self.tuning,
            player_box.as_ref(),
            &mut self.rng,
            || {
                let id = *next_id;
                *next_id += 1;
                id
            },
        );
        self.enemies.extend(spawned);
    }

    /// Feed an event to the run-state machine. Illegal events are ignored.
    pub fn apply_event(&mut self, event: RunEvent) -> bool {
        match self.run_state.next(event) {
            Some(next) => {
                log::debug!("Run state {:?} -> {:?} on {:?}", self.run_state, next, event);
                self.run_state = next;
                true
            }
            None => {
                log::warn!("Ignoring {:?} while in {:?}", event, self.run_state);
                false
            }
        }
    }

    /// Leave the menu (or game over screen) and begin a fresh run
    pub fn start_run(&mut self) -> bool {
        if !self.apply_event(RunEvent::StartRun) {
            return false;
        }
        self.reset();
        log::info!(
            "Run started ({}, {} obstacles)",
            self.tuning.difficulty.as_str(),
            self.obstacles.len()
        );
        true
    }

    /// Pause toggle
    pub fn toggle_pause(&mut self) -> bool {
        match self.run_state {
            RunState::Paused => self.apply_event(RunEvent::Resume),
            _ => self.apply_event(RunEvent::Pause),
        }
    }

    /// Suspend play and sample upgrades to choose from
    pub fn offer_upgrades(&mut self) -> bool {
        if self.player.is_none() || !self.apply_event(RunEvent::OfferUpgrades) {
            return false;
        }
        self.offered = upgrades::offer(&mut self.rng, UPGRADE_CHOICES);
        true
    }

    /// Apply the offered upgrade at `index` and resume play
    pub fn choose_upgrade(&mut self, index: usize) -> bool {
        if self.run_state != RunState::UpgradeSelect {
            log::warn!("No upgrade selection in progress");
            return false;
        }
        let (Some(upgrade), Some(player)) = (self.offered.get(index).copied(), self.player.as_mut())
        else {
            log::warn!("Upgrade choice {} out of range", index);
            return false;
        };
        upgrade.apply(player);
        self.offered.clear();
        self.apply_event(RunEvent::UpgradeChosen)
    }

    /// Advance the world by `dt` seconds. Only simulates while playing.
    pub fn update(&mut self, dt: f32, input: &impl InputState, pointer_x: f32, pointer_y: f32) {
        if self.run_state != RunState::Playing {
            return;
        }
        let Some(mut player) = self.player.take() else {
            return;
        };
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        self.elapsed += dt;

        // 1. Aim
        let pointer = Vec2::new(pointer_x, pointer_y);
        if pointer.is_finite() {
            player.aim_angle = angle_to(player.body.pos, pointer);
        }

        // 2. Timers
        player.dash_cooldown = (player.dash_cooldown - dt).max(0.0);
        player.invulnerability_timer = (player.invulnerability_timer - dt).max(0.0);

        // 3. Movement
        self.move_player(&mut player, input, dt);

        // 4. Waves
        self.advance_waves(dt);

        // 5. Enemies
        self.update_enemies(&mut player, dt);

        // 6. Fire control
        player.last_fired += dt;
        if input.wants_fire() && player.last_fired >= 1.0 / player.fire_rate {
            self.fire_player(&player);
            player.last_fired = 0.0;
        }

        // 7. Bullets
        self.update_bullets(&mut player, dt);

        // 8. Remove the dead
        self.enemies.retain(|e| !e.body.marked_for_removal);
        self.normalize_order();

        let defeated = player.is_defeated();
        self.player = Some(player);
        if defeated {
            log::info!(
                "Game over on wave {} after {:.1}s ({} kills)",
                self.current_wave,
                self.elapsed,
                self.kills
            );
            self.apply_event(RunEvent::PlayerDefeated);
        }
    }

    fn move_player(&self, player: &mut Player, input: &impl InputState, dt: f32) {
        let delta = if player.is_dashing() {
            let delta = player.dash_vel * dt;
            player.dash_timer -= dt;
            if player.dash_timer <= 0.0 {
                player.dash_timer = 0.0;
                player.is_invulnerable = false;
            }
            delta
        } else {
            let intent = input.move_intent().normalize_or_zero();
            let wants_dash = input.is_active(Control::Dash) && intent != Vec2::ZERO;
            if wants_dash && player.dash_cooldown <= 0.0 && player.dash_duration > 0.0 {
                player.dash_timer = player.dash_duration;
                player.dash_cooldown = player.dash_cooldown_time;
                player.dash_vel = intent * player.dash_speed;
                player.is_invulnerable = true;
                log::debug!("Dash toward ({:.2}, {:.2})", intent.x, intent.y);
                Vec2::ZERO
            } else {
                intent * player.speed * dt
            }
        };

        player.body.pos =
            move_with_obstacles(player.body.pos, player.body.size, delta, &self.obstacles);
    }

    fn advance_waves(&mut self, dt: f32) {
        if !self.enemies.is_empty() {
            return;
        }
        self.wave_timer += dt;
        if self.wave_timer >= self.tuning.waves.inter_wave_delay {
            self.current_wave += 1;
            self.spawn_wave();
            self.wave_timer = 0.0;
        }
    }

    fn update_enemies(&mut self, player: &mut Player, dt: f32) {
        let player_box = player.body.aabb();
        let mut shots: Vec<PendingShot> = Vec::new();

        for i in 0..self.enemies.len() {
            // Contact damage
            let enemy = &self.enemies[i];
            if enemy.body.aabb().overlaps(&player_box) && player.take_hit(enemy.damage) {
                log::debug!("Player hit by {:?} contact, hp {}", enemy.kind, player.hp);
            }

            // Steering and movement
            let enemy = &mut self.enemies[i];
            let (vel, shot) = steer(enemy, player.body.pos, dt);
            enemy.vel = vel;
            enemy.body.pos =
                move_with_obstacles(enemy.body.pos, enemy.body.size, vel * dt, &self.obstacles);
            shots.extend(shot);

            // Separation
            let push = separation(i, &self.enemies, self.tuning.separation_push);
            let enemy = &mut self.enemies[i];
            if push != Vec2::ZERO {
                enemy.body.pos =
                    move_with_obstacles(enemy.body.pos, enemy.body.size, push, &self.obstacles);
            }

            enemy.hit_timer = (enemy.hit_timer - dt).max(0.0);
        }

        for shot in shots {
            let id = self.next_entity_id();
            self.bullets.push(Bullet {
                body: Body::new(id, shot.pos, Vec2::splat(shot.size)),
                vel: shot.vel,
                damage: shot.damage,
                is_enemy: true,
            });
        }
    }

    /// Spawn the player's shot(s) along the aim angle with random spread
    fn fire_player(&mut self, player: &Player) {
        let shots = if player.double_shot { 2 } else { 1 };
        let half = player.bullet_spread / 2.0;
        for _ in 0..shots {
            let angle = player.aim_angle + self.rng.range(-half, half);
            let id = self.next_entity_id();
            self.bullets.push(Bullet {
                body: Body::new(id, player.body.pos, Vec2::splat(player.bullet_size)),
                vel: unit_from_angle(angle) * player.bullet_speed,
                damage: player.damage,
                is_enemy: false,
            });
        }
    }

    fn update_bullets(&mut self, player: &mut Player, dt: f32) {
        let player_box = player.body.aabb();

        for bullet in &mut self.bullets {
            bullet.body.pos += bullet.vel * dt;

            if outside_arena(bullet.body.pos) {
                bullet.body.marked_for_removal = true;
                continue;
            }
            let bullet_box = bullet.body.aabb();
            if self.obstacles.iter().any(|o| o.body.aabb().overlaps(&bullet_box)) {
                bullet.body.marked_for_removal = true;
                continue;
            }

            if bullet.is_enemy {
                if bullet_box.overlaps(&player_box) && player.take_hit(bullet.damage) {
                    bullet.body.marked_for_removal = true;
                    log::debug!("Player shot, hp {}", player.hp);
                }
                continue;
            }

            let Some(enemy) = self
                .enemies
                .iter_mut()
                .find(|e| !e.body.marked_for_removal && e.body.aabb().overlaps(&bullet_box))
            else {
                continue;
            };
            bullet.body.marked_for_removal = true;
            enemy.hp = (enemy.hp - bullet.damage).max(0.0);
            enemy.hit_timer = self.tuning.hit_flash;
            if enemy.is_dead() {
                enemy.body.marked_for_removal = true;
                self.kills += 1;
                if player.life_steal {
                    player.heal(LIFE_STEAL_HEAL);
                }
                log::debug!("{:?} #{} destroyed", enemy.kind, enemy.body.id);
            }
        }

        self.bullets.retain(|b| !b.body.marked_for_removal);
    }

    /// Keep entities sorted by id for deterministic iteration
    fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.body.id);
        self.bullets.sort_by_key(|b| b.body.id);
    }
}

/// Desired velocity for an enemy plus an optional shot this tick
fn steer(enemy: &mut Enemy, target: Vec2, dt: f32) -> (Vec2, Option<PendingShot>) {
    let to_target = target - enemy.body.pos;
    let dist = to_target.length();
    let dir = to_target.normalize_or_zero();

    match enemy.kind {
        EnemyKind::Chaser | EnemyKind::Tank => (dir * enemy.speed, None),
        EnemyKind::Shooter => {
            let Some(ranged) = enemy.ranged.as_mut() else {
                return (dir * enemy.speed, None);
            };

            let vel = if dist > ranged.attack_range + ranged.range_buffer {
                dir * enemy.speed
            } else if dist < ranged.attack_range - ranged.range_buffer {
                -dir * enemy.speed
            } else {
                Vec2::ZERO
            };

            ranged.last_fired += dt;
            let mut shot = None;
            if dir != Vec2::ZERO && ranged.last_fired >= 1.0 / ranged.fire_rate {
                ranged.last_fired = 0.0;
                shot = Some(PendingShot {
                    pos: enemy.body.pos,
                    vel: dir * ranged.bullet_speed,
                    damage: enemy.damage,
                    size: ranged.bullet_size,
                });
            }
            (vel, shot)
        }
    }
}

/// Sum of fixed-size nudges away from every other overlapping enemy
fn separation(i: usize, enemies: &[Enemy], push: f32) -> Vec2 {
    let me = &enemies[i];
    let my_box: Aabb = me.body.aabb();
    let mut total = Vec2::ZERO;

    for (j, other) in enemies.iter().enumerate() {
        if j == i || !my_box.overlaps(&other.body.aabb()) {
            continue;
        }
        let away = (me.body.pos - other.body.pos).normalize_or_zero();
        let away = if away == Vec2::ZERO {
            // Perfectly stacked: split by id so the pair moves apart
            if me.body.id > other.body.id { Vec2::X } else { -Vec2::X }
        } else {
            away
        };
        total += away * push;
    }
    total
}
