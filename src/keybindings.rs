//! Customizable canvas keybindings.
//!
//! Hosts translate their native key events into [`Key`] before handing them
//! to the canvas, so the bindings stay serializable and toolkit-independent.

use serde::{Deserialize, Serialize};

/// Keys the canvas can react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Key0,
    Key1,
    Key2,
    Key3,
    Key4,
    Key5,
    Key6,
    Key7,
    Key8,
    Key9,
    Space,
    Escape,
    Delete,
    Backspace,
    Enter,
    Tab,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
}

impl Key {
    /// Display string for settings UIs.
    pub fn label(self) -> &'static str {
        match self {
            Key::A => "A",
            Key::B => "B",
            Key::C => "C",
            Key::D => "D",
            Key::E => "E",
            Key::F => "F",
            Key::G => "G",
            Key::H => "H",
            Key::I => "I",
            Key::J => "J",
            Key::K => "K",
            Key::L => "L",
            Key::M => "M",
            Key::N => "N",
            Key::O => "O",
            Key::P => "P",
            Key::Q => "Q",
            Key::R => "R",
            Key::S => "S",
            Key::T => "T",
            Key::U => "U",
            Key::V => "V",
            Key::W => "W",
            Key::X => "X",
            Key::Y => "Y",
            Key::Z => "Z",
            Key::Key0 => "0",
            Key::Key1 => "1",
            Key::Key2 => "2",
            Key::Key3 => "3",
            Key::Key4 => "4",
            Key::Key5 => "5",
            Key::Key6 => "6",
            Key::Key7 => "7",
            Key::Key8 => "8",
            Key::Key9 => "9",
            Key::Space => "Space",
            Key::Escape => "Esc",
            Key::Delete => "Del",
            Key::Backspace => "Backspace",
            Key::Enter => "Enter",
            Key::Tab => "Tab",
            Key::ArrowLeft => "←",
            Key::ArrowRight => "→",
            Key::ArrowUp => "↑",
            Key::ArrowDown => "↓",
        }
    }
}

/// Maximum number of classes reachable through hotkeys (digits 1-9).
pub const MAX_CLASS_HOTKEYS: usize = 9;

/// What a key press means to the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    DrawMode,
    SelectMode,
    DeleteSelected,
    PanHold,
    /// Select the class at this 0-based position in the class list.
    SelectClass(usize),
}

/// Keybinding configuration for the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub draw_mode: Key,
    /// Clears the selection and returns to select mode.
    pub select_mode: Key,
    pub delete: Vec<Key>,
    /// Held for temporary pan mode.
    pub pan_hold: Key,
    /// Slot `i` selects the class at list position `i` (shown as `i + 1`).
    pub class_hotkeys: Vec<Option<Key>>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            draw_mode: Key::N,
            select_mode: Key::Escape,
            delete: vec![Key::Delete, Key::Backspace],
            pan_hold: Key::Space,
            class_hotkeys: vec![
                Some(Key::Key1),
                Some(Key::Key2),
                Some(Key::Key3),
                Some(Key::Key4),
                Some(Key::Key5),
                Some(Key::Key6),
                Some(Key::Key7),
                Some(Key::Key8),
                Some(Key::Key9),
            ],
        }
    }
}

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a key press to a canvas action, if any.
    pub fn action_for_key(&self, key: Key) -> Option<KeyAction> {
        if key == self.draw_mode {
            Some(KeyAction::DrawMode)
        } else if key == self.select_mode {
            Some(KeyAction::SelectMode)
        } else if self.delete.contains(&key) {
            Some(KeyAction::DeleteSelected)
        } else if key == self.pan_hold {
            Some(KeyAction::PanHold)
        } else {
            self.class_index_for_key(key).map(KeyAction::SelectClass)
        }
    }

    /// Class list position (0-based) bound to a key.
    pub fn class_index_for_key(&self, key: Key) -> Option<usize> {
        self.class_hotkeys
            .iter()
            .take(MAX_CLASS_HOTKEYS)
            .position(|hotkey| *hotkey == Some(key))
    }

    pub fn key_for_class_index(&self, index: usize) -> Option<Key> {
        self.class_hotkeys.get(index).copied().flatten()
    }

    /// Set the hotkey for a class slot. Slots past the limit are ignored.
    pub fn set_class_key(&mut self, index: usize, key: Option<Key>) {
        if index >= MAX_CLASS_HOTKEYS {
            return;
        }
        if self.class_hotkeys.len() <= index {
            self.class_hotkeys.resize(index + 1, None);
        }
        self.class_hotkeys[index] = key;
    }

    /// Describe what a key is already used for, if anything.
    pub fn key_conflict(&self, key: Key) -> Option<String> {
        match self.action_for_key(key)? {
            KeyAction::DrawMode => Some("Draw mode".to_string()),
            KeyAction::SelectMode => Some("Select mode".to_string()),
            KeyAction::DeleteSelected => Some("Delete box".to_string()),
            KeyAction::PanHold => Some("Pan (hold)".to_string()),
            KeyAction::SelectClass(i) => Some(format!("Class {}", i + 1)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_actions() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.action_for_key(Key::N), Some(KeyAction::DrawMode));
        assert_eq!(bindings.action_for_key(Key::Escape), Some(KeyAction::SelectMode));
        assert_eq!(bindings.action_for_key(Key::Backspace), Some(KeyAction::DeleteSelected));
        assert_eq!(bindings.action_for_key(Key::Space), Some(KeyAction::PanHold));
        assert_eq!(bindings.action_for_key(Key::Key1), Some(KeyAction::SelectClass(0)));
        assert_eq!(bindings.action_for_key(Key::Key9), Some(KeyAction::SelectClass(8)));
        assert_eq!(bindings.action_for_key(Key::Key0), None);
        assert_eq!(bindings.action_for_key(Key::ArrowLeft), None);
    }

    #[test]
    fn test_set_class_key() {
        let mut bindings = KeyBindings {
            class_hotkeys: Vec::new(),
            ..KeyBindings::default()
        };
        bindings.set_class_key(2, Some(Key::Q));
        bindings.set_class_key(20, Some(Key::W));
        assert_eq!(bindings.class_index_for_key(Key::Q), Some(2));
        assert_eq!(bindings.key_for_class_index(0), None);
        assert_eq!(bindings.class_index_for_key(Key::W), None);
    }

    #[test]
    fn test_key_conflict() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.key_conflict(Key::Key3).as_deref(), Some("Class 3"));
        assert_eq!(bindings.key_conflict(Key::Z), None);
    }

    #[test]
    fn test_key_labels() {
        assert_eq!(Key::Key7.label(), "7");
        assert_eq!(Key::Escape.label(), "Esc");
        assert_eq!(KeyBindings::default().draw_mode.label(), "N");
    }
}
