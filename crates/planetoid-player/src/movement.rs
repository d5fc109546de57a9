//! Keyboard-to-movement mapping.

use planetoid_input::KeyboardState;
use winit::keyboard::KeyCode;

/// Movement intent for one simulation step, each axis in [-1, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveInput {
    /// W is positive.
    pub forward: f32,
    /// D is positive.
    pub strafe: f32,
    pub sprint: bool,
}

impl MoveInput {
    /// Read WASD plus shift from held keys.
    pub fn from_keyboard(keyboard: &KeyboardState) -> Self {
        Self {
            forward: keyboard.axis(KeyCode::KeyS, KeyCode::KeyW),
            strafe: keyboard.axis(KeyCode::KeyA, KeyCode::KeyD),
            sprint: keyboard.shift(),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.forward == 0.0 && self.strafe == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planetoid_input::RawKeyEvent;
    use winit::event::ElementState;

    fn held(keys: &[KeyCode]) -> KeyboardState {
        let mut kb = KeyboardState::new();
        for &key in keys {
            kb.process_raw(RawKeyEvent {
                key,
                state: ElementState::Pressed,
                repeat: false,
            });
        }
        kb
    }

    #[test]
    fn test_no_keys_is_idle() {
        assert!(MoveInput::from_keyboard(&KeyboardState::new()).is_idle());
    }

    #[test]
    fn test_wasd_axes() {
        let input = MoveInput::from_keyboard(&held(&[KeyCode::KeyW, KeyCode::KeyA]));
        assert_eq!(input.forward, 1.0);
        assert_eq!(input.strafe, -1.0);
        assert!(!input.sprint);

        let input = MoveInput::from_keyboard(&held(&[KeyCode::KeyS, KeyCode::KeyD, KeyCode::ShiftLeft]));
        assert_eq!(input.forward, -1.0);
        assert_eq!(input.strafe, 1.0);
        assert!(input.sprint);
    }
}
