//! Input event values.
//!
//! Key events carry a logical key plus modifier booleans; shift is folded
//! into uppercase `Char` values the way the terminal itself reports shifted
//! letters. The `Display` form uses `^`/`!` prefixes and `<name>` notation.

use std::fmt;

use crate::error::DecodeError;

/// Logical key values: a printable character or one of a closed set of
/// symbolic keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    Insert,
    Delete,
    PageUp,
    PageDown,
    F(u8),
}

impl Key {
    fn write_name(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{c}"),
            Key::Enter => write!(f, "<enter>"),
            Key::Tab => write!(f, "<tab>"),
            Key::Backspace => write!(f, "<backspace>"),
            Key::Up => write!(f, "<up>"),
            Key::Down => write!(f, "<down>"),
            Key::Left => write!(f, "<left>"),
            Key::Right => write!(f, "<right>"),
            Key::Home => write!(f, "<home>"),
            Key::End => write!(f, "<end>"),
            Key::Insert => write!(f, "<insert>"),
            Key::Delete => write!(f, "<delete>"),
            Key::PageUp => write!(f, "<pageup>"),
            Key::PageDown => write!(f, "<pagedown>"),
            Key::F(n) => write!(f, "<f{n}>"),
        }
    }
}

/// A decoded keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
}

impl KeyEvent {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            shift: false,
            alt: false,
            ctrl: false,
        }
    }

    pub fn ctrl(key: Key) -> Self {
        Self {
            ctrl: true,
            ..Self::plain(key)
        }
    }

    pub fn shift(key: Key) -> Self {
        Self {
            shift: true,
            ..Self::plain(key)
        }
    }

    pub fn alt(key: Key) -> Self {
        Self {
            alt: true,
            ..Self::plain(key)
        }
    }

    /// The printable character this event inserts, if any: an unmodified
    /// (except shift) `Char`.
    pub fn text(&self) -> Option<char> {
        match self.key {
            Key::Char(c) if !self.ctrl && !self.alt => Some(c),
            _ => None,
        }
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ctrl {
            write!(f, "^")?;
        }
        if self.alt {
            write!(f, "!")?;
        }
        self.key.write_name(f)
    }
}

// =============================================================================
// Mouse
// =============================================================================

/// X10 mouse button index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    Released,
}

impl MouseButton {
    fn from_index(i: u8) -> Self {
        match i & 0x03 {
            0 => MouseButton::Left,
            1 => MouseButton::Middle,
            2 => MouseButton::Right,
            _ => MouseButton::Released,
        }
    }
}

/// A decoded mouse report, 0-based screen coordinates.
///
/// Coordinates are signed so that translation into a child's local space can
/// go negative before the containment check rejects the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub x: i32,
    pub y: i32,
    pub button: MouseButton,
    pub drag: bool,
}

impl MouseEvent {
    /// Decode a raw 6-byte X10 report `ESC [ M b x y`.
    pub fn from_report(report: &[u8]) -> Result<Self, DecodeError> {
        if report.len() != 6 || &report[0..3] != b"\x1b[M" {
            return Err(DecodeError::MalformedMouse(report.len()));
        }
        let code = report[3];
        // Coordinates are offset by 32 and 1-based; terminals wider than the
        // protocol's byte range wrap around.
        let coord = |b: u8| {
            let v = b as i32 - 32 - 1;
            if v < 0 { v + 255 } else { v }
        };
        Ok(Self {
            x: coord(report[4]),
            y: coord(report[5]),
            button: MouseButton::from_index(code),
            drag: code & 0x40 != 0,
        })
    }

    pub fn released(&self) -> bool {
        self.button == MouseButton::Released
    }

    pub fn dragging(&self) -> bool {
        self.drag
    }

    pub fn pressed(&self) -> bool {
        !self.released() && !self.drag
    }

    /// The same event with coordinates shifted into a child's local space.
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x - dx,
            y: self.y - dy,
            ..*self
        }
    }
}

/// Any decoded input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
}

// =============================================================================
// Tests
// =============================================================================
