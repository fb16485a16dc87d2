//! Escape sequence decoder for terminal input.
//!
//! Turns raw stdin bytes into structured events:
//! - CSI cursor keys (arrows, Home, End, F1-F4 finals)
//! - CSI numeric keys `ESC [ n ~` (Insert, Delete, PageUp/Down, F5-F12)
//! - CSI modifier parameters `ESC [ n ; m <final>`
//! - X10 mouse reports `ESC [ M b x y`
//! - Alt+key (ESC + byte)
//! - Control keys (0x01-0x1a remapped to ctrl+letter)
//! - UTF-8 multibyte characters
//!
//! The decoder keeps unconsumed bytes across calls, so a sequence split
//! between two reads resumes cleanly on the next feed. A malformed sequence
//! is logged and discarded; decoding continues with the following byte.

use tracing::warn;

use crate::error::DecodeError;

use super::events::{InputEvent, Key, KeyEvent, MouseEvent};

enum Step {
    /// Decoded an event, consumed `usize` bytes.
    Event(InputEvent, usize),
    /// Need more bytes before anything can be decoded.
    Incomplete,
    /// Malformed prefix of `usize` bytes; discard it and resume.
    Discard(usize, DecodeError),
}

/// Stateful byte-stream decoder.
pub struct InputDecoder {
    buf: Vec<u8>,
}

impl Default for InputDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl InputDecoder {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(64),
        }
    }

    /// Feed raw bytes, returning every event that became complete.
    pub fn feed(&mut self, data: &[u8]) -> Vec<InputEvent> {
        self.buf.extend_from_slice(data);
        let mut events = Vec::new();
        loop {
            match self.step() {
                Step::Event(ev, n) => {
                    self.buf.drain(..n);
                    events.push(ev);
                }
                Step::Incomplete => break,
                Step::Discard(n, err) => {
                    warn!(discarded = n, error = %err, "dropping malformed input sequence");
                    self.buf.drain(..n);
                }
            }
        }
        events
    }

    /// Bytes buffered awaiting the rest of a sequence.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    fn step(&self) -> Step {
        let buf = &self.buf;
        match buf.first() {
            None => Step::Incomplete,
            Some(0x1b) => self.step_escape(),
            Some(&b) => decode_plain(buf, b),
        }
    }

    fn step_escape(&self) -> Step {
        let buf = &self.buf;
        let Some(&b1) = buf.get(1) else {
            // A lone ESC is the start of a sequence until proven otherwise.
            return Step::Incomplete;
        };
        if b1 == b'[' || b1 == b'O' {
            if b1 == b'[' && buf.get(2) == Some(&b'M') {
                return decode_mouse(buf);
            }
            decode_csi(buf)
        } else {
            // ESC + key: the following byte(s) decode as a key with alt set.
            match decode_plain(&buf[1..], b1) {
                Step::Event(InputEvent::Key(mut ev), n) => {
                    ev.alt = true;
                    Step::Event(InputEvent::Key(ev), n + 1)
                }
                Step::Event(ev, n) => Step::Event(ev, n + 1),
                Step::Incomplete => Step::Incomplete,
                Step::Discard(n, err) => Step::Discard(n + 1, err),
            }
        }
    }
}

// =============================================================================
// Sequence decoding
// =============================================================================

fn decode_mouse(buf: &[u8]) -> Step {
    if buf.len() < 6 {
        return Step::Incomplete;
    }
    match MouseEvent::from_report(&buf[..6]) {
        Ok(ev) => Step::Event(InputEvent::Mouse(ev), 6),
        Err(err) => Step::Discard(6, err),
    }
}

/// Decode `ESC [ params final` (or `ESC O final`). `params` is a run of
/// digits and semicolons; the final byte selects the key.
fn decode_csi(buf: &[u8]) -> Step {
    let mut i = 2;
    while let Some(&b) = buf.get(i) {
        if b.is_ascii_digit() || b == b';' {
            i += 1;
        } else {
            break;
        }
    }
    let Some(&fin) = buf.get(i) else {
        return Step::Incomplete;
    };
    let consumed = i + 1;
    let params = &buf[2..i];

    let (mut shift, mut alt, mut ctrl) = (false, false, false);
    let mut csinum: u32 = 1;
    if let Some(sep) = params.iter().position(|&b| b == b';') {
        let (Some(num), Some(modifier)) = (
            parse_decimal(&params[..sep]),
            parse_decimal(&params[sep + 1..]),
        ) else {
            return Step::Discard(consumed, DecodeError::UnrecognizedCsi(fin));
        };
        csinum = num;
        let mod_bits = modifier.saturating_sub(1);
        shift = mod_bits & 0x1 != 0;
        alt = mod_bits & 0x2 != 0;
        ctrl = mod_bits & 0x4 != 0;
    } else if fin == b'~' {
        let Some(num) = parse_decimal(params) else {
            return Step::Discard(consumed, DecodeError::UnrecognizedCsi(fin));
        };
        csinum = num;
    }

    let key = if csinum != 1 {
        match numeric_key(csinum) {
            Some(key) => key,
            None => return Step::Discard(consumed, DecodeError::UnknownKeycode(csinum)),
        }
    } else if let Some(key) = cursor_key(fin) {
        key
    } else if fin == b'Z' {
        shift = true;
        Key::Tab
    } else {
        return Step::Discard(consumed, DecodeError::UnrecognizedCsi(fin));
    };

    let mut ev = KeyEvent {
        key,
        shift,
        alt,
        ctrl,
    };
    apply_shift(&mut ev);
    Step::Event(InputEvent::Key(ev), consumed)
}

/// Keys selected by the CSI final byte.
fn cursor_key(fin: u8) -> Option<Key> {
    Some(match fin {
        b'A' => Key::Up,
        b'B' => Key::Down,
        b'C' => Key::Right,
        b'D' => Key::Left,
        b'H' => Key::Home,
        b'F' => Key::End,
        b'P' => Key::F(1),
        b'Q' => Key::F(2),
        b'R' => Key::F(3),
        b'S' => Key::F(4),
        _ => return None,
    })
}

/// Keys selected by the numeric parameter of `ESC [ n ~`.
fn numeric_key(n: u32) -> Option<Key> {
    Some(match n {
        2 => Key::Insert,
        3 => Key::Delete,
        5 => Key::PageUp,
        6 => Key::PageDown,
        15 => Key::F(5),
        17 => Key::F(6),
        18 => Key::F(7),
        19 => Key::F(8),
        20 => Key::F(9),
        21 => Key::F(10),
        23 => Key::F(11),
        24 => Key::F(12),
        _ => return None,
    })
}

fn parse_decimal(bytes: &[u8]) -> Option<u32> {
    if bytes.is_empty() || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let mut n: u32 = 0;
    for &b in bytes {
        n = n.checked_mul(10)?.checked_add((b - b'0') as u32)?;
    }
    Some(n)
}

// =============================================================================
// Plain bytes
// =============================================================================

/// Decode a key from bytes beginning with a non-ESC byte `b`.
fn decode_plain(buf: &[u8], b: u8) -> Step {
    match b {
        b'\r' | b'\n' => Step::Event(key(Key::Enter), 1),
        b'\t' => Step::Event(key(Key::Tab), 1),
        0x7f => Step::Event(key(Key::Backspace), 1),
        // Remaining C0 controls are ctrl+letter.
        0x01..=0x1a => {
            let ev = KeyEvent::ctrl(Key::Char((b + 0x60) as char));
            Step::Event(InputEvent::Key(ev), 1)
        }
        0x00 | 0x1b..=0x1f => Step::Discard(1, DecodeError::UnknownKeycode(b as u32)),
        0x20..=0x7e => Step::Event(key(Key::Char(b as char)), 1),
        _ => decode_utf8(buf, b),
    }
}

fn decode_utf8(buf: &[u8], lead: u8) -> Step {
    let len = match lead {
        0xc2..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf4 => 4,
        _ => return Step::Discard(1, DecodeError::UnknownKeycode(lead as u32)),
    };
    if buf.len() < len {
        return Step::Incomplete;
    }
    match std::str::from_utf8(&buf[..len]) {
        Ok(s) => match s.chars().next() {
            Some(c) => Step::Event(key(Key::Char(c)), len),
            None => Step::Discard(len, DecodeError::UnknownKeycode(lead as u32)),
        },
        Err(_) => Step::Discard(len, DecodeError::UnknownKeycode(lead as u32)),
    }
}

fn key(k: Key) -> InputEvent {
    InputEvent::Key(KeyEvent::plain(k))
}

/// Shift folds into the character for printable keys.
fn apply_shift(ev: &mut KeyEvent) {
    if ev.shift
        && let Key::Char(c) = ev.key
    {
        ev.key = Key::Char(c.to_ascii_uppercase());
    }
}

// =============================================================================
// Tests
// =============================================================================
