//! Keyboard and mouse state
//!
//! Host event handlers write into [`InputState`]. Scenarios only ever see an
//! [`InputSnapshot`] taken at the start of a step, through [`InputQuery`].

use glam::Vec2;

use crate::consts::MAX_KEYS;

/// Browser `keyCode` value
pub type KeyCode = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

impl MouseButton {
    /// From DOM `MouseEvent.button`
    pub fn from_dom(button: i16) -> Option<Self> {
        match button {
            0 => Some(MouseButton::Left),
            1 => Some(MouseButton::Middle),
            2 => Some(MouseButton::Right),
            _ => None,
        }
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Read-only view of input
pub trait InputQuery {
    fn is_pressed(&self, key: KeyCode) -> bool;
    fn is_mouse_button_pressed(&self, button: MouseButton) -> bool;
    /// Last known pointer position in viewport pixels
    fn mouse_position(&self) -> Vec2;

    /// +1 when only `positive` is held, -1 when only `negative`, else 0
    fn axis(&self, negative: KeyCode, positive: KeyCode) -> f32 {
        match (self.is_pressed(negative), self.is_pressed(positive)) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Live input, mutated by host event handlers only
#[derive(Debug, Clone)]
pub struct InputState {
    keys: [bool; MAX_KEYS],
    mouse: Vec2,
    buttons: [bool; 3],
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            keys: [false; MAX_KEYS],
            mouse: Vec2::ZERO,
            buttons: [false; 3],
        }
    }
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Out-of-range codes are ignored
    pub fn key_down(&mut self, key: KeyCode) {
        self.set_key(key, true);
    }

    pub fn key_up(&mut self, key: KeyCode) {
        self.set_key(key, false);
    }

    fn set_key(&mut self, key: KeyCode, pressed: bool) {
        match self.keys.get_mut(key as usize) {
            Some(slot) => *slot = pressed,
            None => log::trace!("ignoring key code {key}"),
        }
    }

    pub fn mouse_moved(&mut self, position: Vec2) {
        self.mouse = position;
    }

    pub fn mouse_down(&mut self, button: MouseButton) {
        self.buttons[button.index()] = true;
    }

    pub fn mouse_up(&mut self, button: MouseButton) {
        self.buttons[button.index()] = false;
    }

    /// Release everything (e.g. on focus loss)
    pub fn clear(&mut self) {
        self.keys = [false; MAX_KEYS];
        self.buttons = [false; 3];
    }

    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot(self.clone())
    }
}

impl InputQuery for InputState {
    #[inline]
    fn is_pressed(&self, key: KeyCode) -> bool {
        self.keys.get(key as usize).copied().unwrap_or(false)
    }

    #[inline]
    fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons[button.index()]
    }

    #[inline]
    fn mouse_position(&self) -> Vec2 {
        self.mouse
    }
}

/// Frozen copy of the input for one simulation step
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot(InputState);

impl InputQuery for InputSnapshot {
    fn is_pressed(&self, key: KeyCode) -> bool {
        self.0.is_pressed(key)
    }

    fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.0.is_mouse_button_pressed(button)
    }

    fn mouse_position(&self) -> Vec2 {
        self.0.mouse_position()
    }
}

/// Browser key codes
pub mod keys {
    use super::KeyCode;

    pub const A: KeyCode = 65;
    pub const B: KeyCode = 66;
    pub const C: KeyCode = 67;
    pub const D: KeyCode = 68;
    pub const E: KeyCode = 69;
    pub const F: KeyCode = 70;
    pub const G: KeyCode = 71;
    pub const H: KeyCode = 72;
    pub const I: KeyCode = 73;
    pub const J: KeyCode = 74;
    pub const K: KeyCode = 75;
    pub const L: KeyCode = 76;
    pub const M: KeyCode = 77;
    pub const N: KeyCode = 78;
    pub const O: KeyCode = 79;
    pub const P: KeyCode = 80;
    pub const Q: KeyCode = 81;
    pub const R: KeyCode = 82;
    pub const S: KeyCode = 83;
    pub const T: KeyCode = 84;
    pub const U: KeyCode = 85;
    pub const V: KeyCode = 86;
    pub const W: KeyCode = 87;
    pub const X: KeyCode = 88;
    pub const Y: KeyCode = 89;
    pub const Z: KeyCode = 90;

    /// `0`..`9` on the main row
    pub const fn digit(n: u8) -> KeyCode {
        48 + n as KeyCode
    }

    /// `0`..`9` on the numpad
    pub const fn numpad(n: u8) -> KeyCode {
        96 + n as KeyCode
    }

    /// `F1`..`F15`
    pub const fn function(n: u8) -> KeyCode {
        111 + n as KeyCode
    }

    pub const NUMPAD_MULTIPLY: KeyCode = 106;
    pub const NUMPAD_ADD: KeyCode = 107;
    pub const NUMPAD_ENTER: KeyCode = 108;
    pub const NUMPAD_SUBTRACT: KeyCode = 109;
    pub const NUMPAD_DECIMAL: KeyCode = 110;
    pub const NUMPAD_DIVIDE: KeyCode = 111;

    pub const COLON: KeyCode = 186;
    pub const EQUALS: KeyCode = 187;
    pub const UNDERSCORE: KeyCode = 189;
    pub const QUESTION_MARK: KeyCode = 191;
    pub const TILDE: KeyCode = 192;
    pub const OPEN_BRACKET: KeyCode = 219;
    pub const BACKWARD_SLASH: KeyCode = 220;
    pub const CLOSED_BRACKET: KeyCode = 221;
    pub const QUOTES: KeyCode = 222;

    pub const BACKSPACE: KeyCode = 8;
    pub const TAB: KeyCode = 9;
    pub const CLEAR: KeyCode = 12;
    pub const ENTER: KeyCode = 13;
    pub const SHIFT: KeyCode = 16;
    pub const CONTROL: KeyCode = 17;
    pub const ALT: KeyCode = 18;
    pub const CAPS_LOCK: KeyCode = 20;
    pub const ESC: KeyCode = 27;
    pub const SPACEBAR: KeyCode = 32;
    pub const PAGE_UP: KeyCode = 33;
    pub const PAGE_DOWN: KeyCode = 34;
    pub const END: KeyCode = 35;
    pub const HOME: KeyCode = 36;
    pub const LEFT: KeyCode = 37;
    pub const UP: KeyCode = 38;
    pub const RIGHT: KeyCode = 39;
    pub const DOWN: KeyCode = 40;
    pub const INSERT: KeyCode = 45;
    pub const DELETE: KeyCode = 46;
    pub const HELP: KeyCode = 47;
    pub const NUM_LOCK: KeyCode = 144;
}
