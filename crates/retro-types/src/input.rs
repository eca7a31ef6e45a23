//! Platform-agnostic input event types.
//!
//! Every backend maps its native input to these enums. The core framework
//! never sees raw platform input.

use serde::{Deserialize, Serialize};

/// A platform-agnostic input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A console button pressed.
    ButtonPress(Button),
    /// Character typed on the physical keyboard.
    TextInput(char),
    /// Backspace / delete-left.
    Backspace,
    /// Pointer click at absolute position (mouse or touch).
    PointerClick { x: i32, y: i32 },
    /// User requested quit (window close, etc.).
    Quit,
}

/// Buttons that map across all platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    Confirm,
    Cancel,
    /// Background music toggle.
    Music,
    VolumeUp,
    VolumeDown,
    /// Front-panel power switch.
    Power,
}

impl Button {
    /// Whether this is one of the four d-pad directions.
    pub fn is_direction(self) -> bool {
        matches!(self, Self::Up | Self::Down | Self::Left | Self::Right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn button_press_differs_by_button() {
        let a = InputEvent::ButtonPress(Button::Confirm);
        let b = InputEvent::ButtonPress(Button::Cancel);
        assert_ne!(a, b);
        assert_eq!(a, InputEvent::ButtonPress(Button::Confirm));
    }

    #[test]
    fn text_input_unicode() {
        let e = InputEvent::TextInput('\u{00E9}');
        if let InputEvent::TextInput(ch) = e {
            assert_eq!(ch, '\u{00E9}');
        } else {
            panic!("wrong variant");
        }
    }

    #[test]
    fn pointer_click_event() {
        let e = InputEvent::PointerClick { x: 320, y: 240 };
        if let InputEvent::PointerClick { x, y } = e {
            assert_eq!(x, 320);
            assert_eq!(y, 240);
        }
    }

    #[test]
    fn directions() {
        assert!(Button::Up.is_direction());
        assert!(Button::Right.is_direction());
        assert!(!Button::Confirm.is_direction());
        assert!(!Button::Music.is_direction());
    }

    #[test]
    fn button_hash_distinct() {
        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(Button::Up);
        set.insert(Button::Down);
        set.insert(Button::Up);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn button_serde_roundtrip() {
        let json = serde_json::to_string(&Button::Power).unwrap();
        let b: Button = serde_json::from_str(&json).unwrap();
        assert_eq!(b, Button::Power);
    }
}
