//! Abstract per-tick input
//!
//! The simulation never sees a keyboard. The host maps devices to this
//! struct, keeping held buttons and fresh presses apart.

use serde::{Deserialize, Serialize};

/// Input commands for a single step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputState {
    pub move_left: bool,
    pub move_right: bool,
    /// Aim up (held)
    pub aim_up: bool,
    /// Aim down / go prone (held)
    pub aim_down: bool,
    /// Jump button is down this step
    pub jump: bool,
    /// Jump button went down this step
    pub jump_pressed: bool,
    /// Fire button is down; only automatic weapons shoot on this alone
    pub fire: bool,
    /// Fire button went down this step
    pub fire_pressed: bool,
    pub prev_weapon_pressed: bool,
    pub next_weapon_pressed: bool,
    /// Jump straight to an inventory slot (clamped)
    pub select_weapon: Option<usize>,
}

impl InputState {
    /// -1 left, 0 none (or both), +1 right
    pub fn horizontal(&self) -> i8 {
        self.move_right as i8 - self.move_left as i8
    }

    /// -1 up, 0 none (or both), +1 down
    pub fn vertical(&self) -> i8 {
        self.aim_down as i8 - self.aim_up as i8
    }

    /// Everything released
    pub fn idle() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposing_directions_cancel() {
        let input = InputState { move_left: true, move_right: true, aim_up: true, aim_down: true, ..Default::default() };
        assert_eq!(input.horizontal(), 0);
        assert_eq!(input.vertical(), 0);
    }

    #[test]
    fn test_intents() {
        let input = InputState { move_left: true, aim_up: true, ..Default::default() };
        assert_eq!(input.horizontal(), -1);
        assert_eq!(input.vertical(), -1);
    }

    #[test]
    fn test_partial_json() {
        let input: InputState = serde_json::from_str(r#"{ "fire": true, "select_weapon": 2 }"#).unwrap();
        assert!(input.fire);
        assert!(!input.fire_pressed);
        assert_eq!(input.select_weapon, Some(2));
        assert!(!input.jump);
    }
}
