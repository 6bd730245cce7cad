//! Host-independent input events.

use boardkit_core::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    /// Ctrl on most platforms, Cmd on macOS.
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseButton {
    #[default]
    Left,
    Middle,
    Right,
}

/// Bit flags of buttons held during a pointer event.
pub mod buttons {
    pub const PRIMARY: u16 = 1;
    pub const SECONDARY: u16 = 2;
    pub const AUXILIARY: u16 = 4;
}

/// Pointer event as delivered by the host, in CSS pixels relative to the
/// viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawPointerEvent {
    pub client_x: f64,
    pub client_y: f64,
    pub button: MouseButton,
    pub buttons: u16,
    pub modifiers: Modifiers,
}

impl RawPointerEvent {
    pub fn at(client_x: f64, client_y: f64) -> Self {
        Self {
            client_x,
            client_y,
            ..Self::default()
        }
    }

    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = button;
        self.buttons = match button {
            MouseButton::Left => buttons::PRIMARY,
            MouseButton::Right => buttons::SECONDARY,
            MouseButton::Middle => buttons::AUXILIARY,
        };
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RawWheelEvent {
    pub client_x: f64,
    pub client_y: f64,
    pub delta_y: f64,
    pub modifiers: Modifiers,
}

/// Placement of the canvas element in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CanvasRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl CanvasRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// Pointer event normalized to canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerEvent {
    pub position: Position,
    pub button: MouseButton,
    pub buttons: u16,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn at(position: Position) -> Self {
        Self {
            position,
            buttons: buttons::PRIMARY,
            ..Self::default()
        }
    }
}

/// Keyboard event. `key` follows DOM `KeyboardEvent.key` naming
/// (`"a"`, `"Enter"`, `"ArrowLeft"`, ...).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KeyEvent {
    pub key: String,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::NONE,
        }
    }

    pub fn ctrl(mut self) -> Self {
        self.modifiers.ctrl = true;
        self
    }

    pub fn shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }

    pub fn alt(mut self) -> Self {
        self.modifiers.alt = true;
        self
    }

    pub fn meta(mut self) -> Self {
        self.modifiers.meta = true;
        self
    }

    /// The typed character, for keys that produce one.
    pub fn printable(&self) -> Option<char> {
        if self.modifiers.command() {
            return None;
        }
        let mut chars = self.key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if !c.is_control() => Some(c),
            _ => None,
        }
    }
}

/// Keyboard shortcut. Keys compare case-insensitively, modifiers exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub key: String,
    pub modifiers: Modifiers,
}

impl KeyCombo {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: Modifiers::NONE,
        }
    }

    pub fn ctrl(key: impl Into<String>) -> Self {
        let mut combo = Self::new(key);
        combo.modifiers.ctrl = true;
        combo
    }

    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.key.eq_ignore_ascii_case(&event.key) && self.modifiers == event.modifiers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combo_matching() {
        let combo = KeyCombo::ctrl("b");
        assert!(combo.matches(&KeyEvent::new("B").ctrl()));
        assert!(!combo.matches(&KeyEvent::new("b")));
        assert!(!combo.matches(&KeyEvent::new("b").ctrl().shift()));
    }

    #[test]
    fn test_printable() {
        assert_eq!(KeyEvent::new("x").printable(), Some('x'));
        assert_eq!(KeyEvent::new("X").shift().printable(), Some('X'));
        assert_eq!(KeyEvent::new("x").ctrl().printable(), None);
        assert_eq!(KeyEvent::new("Enter").printable(), None);
    }
}
