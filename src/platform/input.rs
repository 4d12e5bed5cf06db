//! Keyboard and touch input
//!
//! Browser events are folded into an [`InputState`], which produces one
//! [`TickInput`] per simulation step. Pointer positions arrive already mapped
//! to game coordinates (800x600).

use glam::Vec2;

use crate::consts::{
    ARROW_BUTTON_SIZE, JUMP_BUTTON_RADIUS, JUMP_BUTTON_X, LEFT_BUTTON_X, RIGHT_BUTTON_X,
    TOUCH_BUTTON_Y,
};
use crate::sim::TickInput;

/// Game keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Jump,
}

impl Key {
    /// Map a `KeyboardEvent.code`
    pub fn from_code(code: &str) -> Option<Key> {
        match code {
            "ArrowLeft" => Some(Key::Left),
            "ArrowRight" => Some(Key::Right),
            "Space" => Some(Key::Jump),
            _ => None,
        }
    }
}

/// On-screen controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchButton {
    Jump,
    Left,
    Right,
}

impl TouchButton {
    pub const ALL: [TouchButton; 3] = [TouchButton::Jump, TouchButton::Left, TouchButton::Right];

    pub fn center(self) -> Vec2 {
        let x = match self {
            TouchButton::Jump => JUMP_BUTTON_X,
            TouchButton::Left => LEFT_BUTTON_X,
            TouchButton::Right => RIGHT_BUTTON_X,
        };
        Vec2::new(x, TOUCH_BUTTON_Y)
    }

    /// Hit test in game coordinates (jump is round, arrows are square)
    pub fn contains(self, point: Vec2) -> bool {
        let d = point - self.center();
        match self {
            TouchButton::Jump => d.length_squared() <= JUMP_BUTTON_RADIUS * JUMP_BUTTON_RADIUS,
            TouchButton::Left | TouchButton::Right => {
                let half = ARROW_BUTTON_SIZE / 2.0;
                d.x.abs() <= half && d.y.abs() <= half
            }
        }
    }
}

/// Button under a point, if any
pub fn button_at(point: Vec2) -> Option<TouchButton> {
    TouchButton::ALL.into_iter().find(|b| b.contains(point))
}

/// Accumulated input between simulation steps
#[derive(Debug, Clone, Default)]
pub struct InputState {
    key_left: bool,
    key_right: bool,
    key_jump: bool,
    /// Buttons held, by pointer id (multi-touch)
    pointers: Vec<(i32, TouchButton)>,
    /// Jump button tapped since the last step
    jump_pressed: bool,
}

impl InputState {
    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::Left => self.key_left = true,
            Key::Right => self.key_right = true,
            Key::Jump => self.key_jump = true,
        }
    }

    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Left => self.key_left = false,
            Key::Right => self.key_right = false,
            Key::Jump => self.key_jump = false,
        }
    }

    /// Press whatever button is under the pointer; returns true if one was hit
    pub fn pointer_down(&mut self, pointer_id: i32, point: Vec2) -> bool {
        let Some(button) = button_at(point) else {
            return false;
        };
        self.pointers.retain(|(id, _)| *id != pointer_id);
        self.pointers.push((pointer_id, button));
        if button == TouchButton::Jump {
            self.jump_pressed = true;
        }
        true
    }

    /// Release when the pointer slides off its button
    pub fn pointer_move(&mut self, pointer_id: i32, point: Vec2) {
        self.pointers
            .retain(|(id, button)| *id != pointer_id || button.contains(point));
    }

    /// Pointer lifted or cancelled
    pub fn pointer_up(&mut self, pointer_id: i32) {
        self.pointers.retain(|(id, _)| *id != pointer_id);
    }

    pub fn is_held(&self, button: TouchButton) -> bool {
        self.pointers.iter().any(|(_, b)| *b == button)
    }

    pub fn to_tick_input(&self) -> TickInput {
        TickInput {
            left: self.key_left || self.is_held(TouchButton::Left),
            right: self.key_right || self.is_held(TouchButton::Right),
            jump: self.key_jump,
            jump_pressed: self.jump_pressed,
        }
    }

    /// Clear one-shot inputs after a step consumed them
    pub fn consume_one_shots(&mut self) {
        self.jump_pressed = false;
    }

    /// Drop everything held (window lost focus)
    pub fn release_all(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_codes() {
        assert_eq!(Key::from_code("ArrowLeft"), Some(Key::Left));
        assert_eq!(Key::from_code("Space"), Some(Key::Jump));
        assert_eq!(Key::from_code("KeyW"), None);
    }

    #[test]
    fn test_button_hit_areas() {
        assert_eq!(button_at(Vec2::new(580.0, 530.0)), Some(TouchButton::Jump));
        assert_eq!(button_at(Vec2::new(580.0, 564.0)), Some(TouchButton::Jump));
        assert_eq!(button_at(Vec2::new(605.0, 555.0)), None);
        assert_eq!(button_at(Vec2::new(684.0, 506.0)), Some(TouchButton::Left));
        assert_eq!(button_at(Vec2::new(740.0, 530.0)), Some(TouchButton::Right));
        assert_eq!(button_at(Vec2::new(100.0, 100.0)), None);
    }

    #[test]
    fn test_arrow_hold_and_release() {
        let mut input = InputState::default();
        assert!(input.pointer_down(1, Vec2::new(660.0, 530.0)));
        assert!(input.to_tick_input().left);

        input.pointer_up(1);
        assert!(!input.to_tick_input().left);
    }

    #[test]
    fn test_sliding_off_button_releases() {
        let mut input = InputState::default();
        input.pointer_down(3, Vec2::new(740.0, 530.0));
        input.pointer_move(3, Vec2::new(745.0, 540.0));
        assert!(input.to_tick_input().right);

        input.pointer_move(3, Vec2::new(600.0, 300.0));
        assert!(!input.to_tick_input().right);
        // Sliding back does not press again
        input.pointer_move(3, Vec2::new(740.0, 530.0));
        assert!(!input.to_tick_input().right);
    }

    #[test]
    fn test_multi_touch_run_and_jump() {
        let mut input = InputState::default();
        input.pointer_down(1, Vec2::new(740.0, 530.0));
        input.pointer_down(2, Vec2::new(580.0, 530.0));

        let tick = input.to_tick_input();
        assert!(tick.right && tick.jump_pressed && !tick.jump);

        input.consume_one_shots();
        let tick = input.to_tick_input();
        assert!(tick.right && !tick.jump_pressed);
    }

    #[test]
    fn test_keyboard_jump_is_held() {
        let mut input = InputState::default();
        input.key_down(Key::Jump);
        input.consume_one_shots();
        assert!(input.to_tick_input().jump);
        input.key_up(Key::Jump);
        assert!(!input.to_tick_input().jump);
    }
}
