//! ANSI escape sequences for terminal control.
//!
//! Only the sequences the engine actually emits: cursor positioning and
//! visibility, 256-color SGR, attribute codes, screen clear, and mouse
//! reporting mode.

use crate::style::Attr;
use std::io::{self, Write};

/// Control Sequence Introducer.
pub const CSI: &str = "\x1b[";

/// Move cursor to absolute position (0-indexed input, 1-indexed wire form).
#[inline]
pub fn cursor_to<W: Write>(w: &mut W, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", y + 1, x + 1)
}

/// Hide cursor.
#[inline]
pub fn cursor_hide<W: Write>(w: &mut W) -> io::Result<()> {
    write!(w, "\x1b[?25l")
}

/// Show cursor.
#[inline]
pub fn cursor_show<W: Write>(w: &mut W) -> io::Result<()> {
    write!(w, "\x1b[?25h")
}

/// Clear the whole screen.
#[inline]
pub fn clear_screen<W: Write>(w: &mut W) -> io::Result<()> {
    write!(w, "\x1b[2J")
}

/// Reset all graphic rendition parameters.
#[inline]
pub fn reset<W: Write>(w: &mut W) -> io::Result<()> {
    write!(w, "\x1b[0m")
}

/// 256-color foreground.
#[inline]
pub fn fg_256<W: Write>(w: &mut W, n: u8) -> io::Result<()> {
    write!(w, "\x1b[38;5;{n}m")
}

/// 256-color background.
#[inline]
pub fn bg_256<W: Write>(w: &mut W, n: u8) -> io::Result<()> {
    write!(w, "\x1b[48;5;{n}m")
}

/// Emit one SGR code per set attribute flag.
#[inline]
pub fn attrs<W: Write>(w: &mut W, a: Attr) -> io::Result<()> {
    for code in a.sgr_codes() {
        write!(w, "\x1b[{code}m")?;
    }
    Ok(())
}

/// Enable cell-motion mouse reporting.
#[inline]
pub fn mouse_on<W: Write>(w: &mut W) -> io::Result<()> {
    write!(w, "\x1b[?1002h")
}

/// Disable cell-motion mouse reporting.
#[inline]
pub fn mouse_off<W: Write>(w: &mut W) -> io::Result<()> {
    write!(w, "\x1b[?1002l")
}
