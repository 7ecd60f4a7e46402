//! Demo mode - an input provider that plays the game
//!
//! Aims at the nearest enemy, keeps the trigger held, backs away from
//! anything inside its comfort radius and dashes when something is about
//! to touch it.

use glam::Vec2;

use crate::arena_center;
use crate::sim::{GameLogic, RandomSource, TickInput};

/// Enemies closer than this push the autopilot away
const COMFORT_RADIUS: f32 = 180.0;
/// Enemies closer than this trigger a dash
const PANIC_RADIUS: f32 = 60.0;

/// Input and pointer position for the next tick
pub fn drive<R: RandomSource>(game: &GameLogic<R>) -> (TickInput, Vec2) {
    let Some(player) = game.player() else {
        return (TickInput::default(), arena_center());
    };
    let pos = player.body.pos;

    let nearest = game
        .enemies()
        .iter()
        .min_by(|a, b| {
            a.body
                .pos
                .distance_squared(pos)
                .partial_cmp(&b.body.pos.distance_squared(pos))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    let Some(target) = nearest else {
        // Arena clear: drift back to the middle and wait
        let input = TickInput::toward((arena_center() - pos).normalize_or_zero());
        return (input, arena_center());
    };

    // Flee the average position of crowding enemies, orbit otherwise
    let mut away = Vec2::ZERO;
    for enemy in game.enemies() {
        let offset = pos - enemy.body.pos;
        let dist = offset.length();
        if dist < COMFORT_RADIUS && dist > 0.0 {
            away += offset / dist * (1.0 - dist / COMFORT_RADIUS);
        }
    }
    let to_target = (target.body.pos - pos).normalize_or_zero();
    let dir = if away != Vec2::ZERO {
        away.normalize_or_zero()
    } else {
        Vec2::new(-to_target.y, to_target.x)
    };
    // Pull toward the center so walls do not pin the player
    let dir = (dir + (arena_center() - pos) * 0.002).normalize_or_zero();

    let mut input = TickInput::toward(dir);
    input.fire = true;
    input.dash = target.body.pos.distance(pos) < PANIC_RADIUS;
    (input, target.body.pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Control, InputState, RunState};

    #[test]
    fn test_idle_when_no_run() {
        let game = GameLogic::new(1);
        let (input, pointer) = drive(&game);
        assert!(!input.wants_fire());
        assert_eq!(pointer, arena_center());
    }

    #[test]
    fn test_aims_at_nearest_enemy() {
        let mut game = GameLogic::new(3);
        assert!(game.start_run());
        let nearest = game
            .enemies()
            .iter()
            .min_by(|a, b| {
                let p = arena_center();
                a.body
                    .pos
                    .distance(p)
                    .partial_cmp(&b.body.pos.distance(p))
                    .unwrap()
            })
            .unwrap()
            .body
            .pos;
        let (input, pointer) = drive(&game);
        assert!(input.fire);
        assert_eq!(pointer, nearest);
    }

    #[test]
    fn test_dashes_when_crowded() {
        let mut game = GameLogic::new(5);
        assert!(game.start_run());
        game.enemies.truncate(1);
        let pos = game.player().unwrap().body.pos;
        game.enemies[0].body.pos = pos + Vec2::new(30.0, 0.0);
        let (input, _) = drive(&game);
        assert!(input.is_active(Control::Dash));
        assert!(input.is_active(Control::Left));
    }

    #[test]
    fn test_scores_kills_in_opening_wave() {
        let mut game = GameLogic::new(77);
        assert!(game.start_run());
        for _ in 0..(10 * 120) {
            if game.run_state() != RunState::Playing {
                break;
            }
            let (input, pointer) = drive(&game);
            game.update(crate::consts::SIM_DT, &input, pointer.x, pointer.y);
        }
        assert!(game.kills > 0);
        let player = game.player().unwrap();
        assert!(player.hp >= 0.0 && player.hp <= player.max_hp);
    }
}
