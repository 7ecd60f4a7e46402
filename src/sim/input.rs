//! Input abstraction
//!
//! The engine only asks whether a control is active; key bindings and
//! device handling belong to the host.

use glam::Vec2;

/// Digital controls the engine reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Up,
    Down,
    Left,
    Right,
    Dash,
}

/// Input provider contract
pub trait InputState {
    fn is_active(&self, control: Control) -> bool;
    /// Fire control held (keyboard binding)
    fn fire_held(&self) -> bool;
    /// Primary pointer button held
    fn pointer_held(&self) -> bool;

    /// 4-directional movement intent (not normalized; +y is down)
    fn move_intent(&self) -> Vec2 {
        let axis = |neg: Control, pos: Control| {
            (self.is_active(pos) as i32 - self.is_active(neg) as i32) as f32
        };
        Vec2::new(axis(Control::Left, Control::Right), axis(Control::Up, Control::Down))
    }

    /// Either trigger fires
    fn wants_fire(&self) -> bool {
        self.fire_held() || self.pointer_held()
    }
}

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub dash: bool,
    pub fire: bool,
    pub pointer_down: bool,
}

impl TickInput {
    /// Movement toward a unit-ish direction, snapped to the 4 digital axes
    pub fn toward(dir: Vec2) -> Self {
        const DEAD_ZONE: f32 = 0.3;
        Self {
            up: dir.y < -DEAD_ZONE,
            down: dir.y > DEAD_ZONE,
            left: dir.x < -DEAD_ZONE,
            right: dir.x > DEAD_ZONE,
            ..Default::default()
        }
    }
}

impl InputState for TickInput {
    fn is_active(&self, control: Control) -> bool {
        match control {
            Control::Up => self.up,
            Control::Down => self.down,
            Control::Left => self.left,
            Control::Right => self.right,
            Control::Dash => self.dash,
        }
    }

    fn fire_held(&self) -> bool {
        self.fire
    }

    fn pointer_held(&self) -> bool {
        self.pointer_down
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposing_controls_cancel() {
        let input = TickInput {
            left: true,
            right: true,
            down: true,
            ..Default::default()
        };
        assert_eq!(input.move_intent(), Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_toward_snaps_diagonal() {
        let input = TickInput::toward(Vec2::new(0.7, -0.7));
        assert!(input.right && input.up);
        assert!(!input.left && !input.down);
    }

    #[test]
    fn test_pointer_counts_as_fire() {
        let input = TickInput {
            pointer_down: true,
            ..Default::default()
        };
        assert!(input.wants_fire());
        assert!(!TickInput::default().wants_fire());
    }
}
