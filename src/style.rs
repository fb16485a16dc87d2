//! Cell styling: attribute flags, RGB colors with 256-palette quantization,
//! and the `Cell` unit the whole renderer traffics in.
//!
//! Colors are RGB triples. Terminals are driven with 256-color SGR codes, so
//! every color lazily resolves to its nearest palette entry (Euclidean
//! distance in RGB space, first match wins on ties) and caches the result.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use unicode_width::UnicodeWidthChar;

bitflags::bitflags! {
    /// Text attribute flags, one per SGR rendition code.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Attr: u8 {
        const BOLD       = 1 << 0;
        const FAINT      = 1 << 1;
        const ITALIC     = 1 << 2;
        const UNDERLINE  = 1 << 3;
        const BLINK      = 1 << 4;
        const BLINK_FAST = 1 << 5;
        const REVERSE    = 1 << 6;
    }
}

impl Attr {
    /// SGR parameter codes for each flag, in flag order.
    pub fn sgr_codes(self) -> impl Iterator<Item = u8> {
        const TABLE: [(Attr, u8); 7] = [
            (Attr::BOLD, 1),
            (Attr::FAINT, 2),
            (Attr::ITALIC, 3),
            (Attr::UNDERLINE, 4),
            (Attr::BLINK, 5),
            (Attr::BLINK_FAST, 6),
            (Attr::REVERSE, 7),
        ];
        TABLE
            .into_iter()
            .filter_map(move |(flag, code)| self.contains(flag).then_some(code))
    }
}

// =============================================================================
// Color
// =============================================================================

/// An RGB color with a lazily computed, cached index into the fixed
/// 256-entry terminal palette.
///
/// Equality and hashing consider only the RGB components.
#[derive(Clone)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    index: OnceLock<u8>,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r,
            g,
            b,
            index: OnceLock::new(),
        }
    }

    /// Parse a `#rrggbb` string. Panics on malformed input; color literals
    /// are programmer-supplied.
    pub fn hex(s: &str) -> Self {
        let hex = s.strip_prefix('#').unwrap_or(s);
        assert!(hex.len() == 6, "malformed color literal {s:?}");
        let byte = |at: usize| u8::from_str_radix(&hex[at..at + 2], 16)
            .unwrap_or_else(|_| panic!("malformed color literal {s:?}"));
        Self::rgb(byte(0), byte(2), byte(4))
    }

    /// Squared Euclidean distance to another color.
    fn distance2(&self, (r, g, b): (u8, u8, u8)) -> u32 {
        let d = |a: u8, b: u8| {
            let d = a as i32 - b as i32;
            (d * d) as u32
        };
        d(self.r, r) + d(self.g, g) + d(self.b, b)
    }

    /// Nearest entry in the 256-color palette. Computed once per color
    /// value and cached; ties resolve to the lowest palette index.
    pub fn ansi256(&self) -> u8 {
        *self.index.get_or_init(|| {
            let mut best = 0u8;
            let mut best_d = u32::MAX;
            for i in 0..=255u8 {
                let d = self.distance2(palette(i));
                if d < best_d {
                    best_d = d;
                    best = i;
                }
            }
            best
        })
    }

    pub fn invert(&self) -> Self {
        Self::rgb(255 - self.r, 255 - self.g, 255 - self.b)
    }
}

impl PartialEq for Color {
    fn eq(&self, other: &Self) -> bool {
        (self.r, self.g, self.b) == (other.r, other.g, other.b)
    }
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.r, self.g, self.b).hash(state);
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// RGB value of the i-th entry of the standard xterm 256-color palette:
/// 16 base colors, a 6x6x6 color cube, and a 24-step grayscale ramp.
pub fn palette(i: u8) -> (u8, u8, u8) {
    const BASE: [(u8, u8, u8); 16] = [
        (0x00, 0x00, 0x00),
        (0x80, 0x00, 0x00),
        (0x00, 0x80, 0x00),
        (0x80, 0x80, 0x00),
        (0x00, 0x00, 0x80),
        (0x80, 0x00, 0x80),
        (0x00, 0x80, 0x80),
        (0xc0, 0xc0, 0xc0),
        (0x80, 0x80, 0x80),
        (0xff, 0x00, 0x00),
        (0x00, 0xff, 0x00),
        (0xff, 0xff, 0x00),
        (0x00, 0x00, 0xff),
        (0xff, 0x00, 0xff),
        (0x00, 0xff, 0xff),
        (0xff, 0xff, 0xff),
    ];
    const CUBE: [u8; 6] = [0x00, 0x5f, 0x87, 0xaf, 0xd7, 0xff];
    match i {
        0..=15 => BASE[i as usize],
        16..=231 => {
            let n = i - 16;
            (
                CUBE[(n / 36) as usize],
                CUBE[(n / 6 % 6) as usize],
                CUBE[(n % 6) as usize],
            )
        }
        _ => {
            let v = 8 + 10 * (i - 232);
            (v, v, v)
        }
    }
}

// Base-16 palette names.
pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
pub const DARKRED: Color = Color::rgb(0x80, 0x00, 0x00);
pub const DARKGREEN: Color = Color::rgb(0x00, 0x80, 0x00);
pub const DARKYELLOW: Color = Color::rgb(0x80, 0x80, 0x00);
pub const DARKBLUE: Color = Color::rgb(0x00, 0x00, 0x80);
pub const DARKPURPLE: Color = Color::rgb(0x80, 0x00, 0x80);
pub const DARKCYAN: Color = Color::rgb(0x00, 0x80, 0x80);
pub const LIGHTGRAY: Color = Color::rgb(0xc0, 0xc0, 0xc0);
pub const GRAY: Color = Color::rgb(0x80, 0x80, 0x80);
pub const RED: Color = Color::rgb(0xff, 0x00, 0x00);
pub const GREEN: Color = Color::rgb(0x00, 0xff, 0x00);
pub const YELLOW: Color = Color::rgb(0xff, 0xff, 0x00);
pub const BLUE: Color = Color::rgb(0x00, 0x00, 0xff);
pub const PURPLE: Color = Color::rgb(0xff, 0x00, 0xff);
pub const CYAN: Color = Color::rgb(0x00, 0xff, 0xff);
pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);

// =============================================================================
// Cell
// =============================================================================

/// One character position: glyph, colors, attributes.
///
/// Glyphs are restricted to single display-width code points; that is an
/// invariant of the grid, not a recoverable condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    pub fg: Color,
    pub bg: Color,
    pub attrs: Attr,
}

impl Cell {
    pub fn new(glyph: char, fg: Color, bg: Color, attrs: Attr) -> Self {
        assert_eq!(
            UnicodeWidthChar::width(glyph),
            Some(1),
            "glyph {glyph:?} is not a single-width code point"
        );
        Self {
            glyph,
            fg,
            bg,
            attrs,
        }
    }

    /// A plain glyph in the default white-on-black style.
    pub fn glyph(glyph: char) -> Self {
        Self::new(glyph, WHITE, BLACK, Attr::empty())
    }

    pub fn blank() -> Self {
        Self::glyph(' ')
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::blank()
    }
}

// =============================================================================
// Tests
// =============================================================================
