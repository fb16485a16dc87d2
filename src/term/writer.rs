//! Output buffering and the state-caching terminal surface.
//!
//! [`TermScreen`] is the [`Surface`] backed by the real terminal. It batches
//! escape sequences into an [`OutputBuffer`] (one syscall per frame) and
//! tracks the terminal's cursor position, current colors and attributes so
//! that consecutive writes sharing state emit no redundant control codes.

use std::io::{self, Write};

use crate::style::{Attr, Cell, Color};
use crate::surface::{Surface, check_bounds};

use super::ansi;

// =============================================================================
// OutputBuffer
// =============================================================================

/// Accumulates terminal output for batched writing.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    data: Vec<u8>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self {
            data: Vec::with_capacity(16 * 1024),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Write accumulated bytes to `w` and clear the buffer.
    pub fn flush_to<W: Write>(&mut self, w: &mut W) -> io::Result<()> {
        if self.data.is_empty() {
            return Ok(());
        }
        w.write_all(&self.data)?;
        w.flush()?;
        self.data.clear();
        Ok(())
    }
}

impl Write for OutputBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// =============================================================================
// TermScreen
// =============================================================================

/// The terminal as a surface.
///
/// Tracks cursor position (including the terminal's own advance-and-wrap
/// after each glyph), last foreground, last background and last attributes;
/// a cell write emits only the control codes whose state actually changed.
/// An attribute change resets all rendition parameters first, which forces
/// the colors to be re-emitted.
pub struct TermScreen<W: Write> {
    out: W,
    buf: OutputBuffer,
    width: u16,
    height: u16,
    cursor: Option<(u16, u16)>,
    fg: Option<Color>,
    bg: Option<Color>,
    attrs: Option<Attr>,
}

impl<W: Write> TermScreen<W> {
    pub fn new(out: W, width: u16, height: u16) -> Self {
        Self {
            out,
            buf: OutputBuffer::new(),
            width,
            height,
            cursor: None,
            fg: None,
            bg: None,
            attrs: None,
        }
    }

    /// Forget all cached terminal state. Required after anything that may
    /// have moved the cursor or reset colors behind our back.
    pub fn invalidate_caches(&mut self) {
        self.cursor = None;
        self.fg = None;
        self.bg = None;
        self.attrs = None;
    }

    /// Adopt a new terminal size, dropping cached state.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.invalidate_caches();
    }

    /// Push the batched frame out to the underlying writer.
    pub fn flush_frame(&mut self) -> io::Result<()> {
        self.buf.flush_to(&mut self.out)
    }

    pub(crate) fn queue(&mut self, f: impl FnOnce(&mut OutputBuffer) -> io::Result<()>) {
        // Writing into a Vec cannot fail.
        let _ = f(&mut self.buf);
    }

    fn move_to(&mut self, x: u16, y: u16) {
        if self.cursor == Some((x, y)) {
            return;
        }
        self.queue(|b| ansi::cursor_to(b, x, y));
        self.cursor = Some((x, y));
    }

    fn apply_style(&mut self, cell: &Cell) {
        if self.attrs != Some(cell.attrs) {
            self.queue(ansi::reset);
            self.queue(|b| ansi::attrs(b, cell.attrs));
            self.attrs = Some(cell.attrs);
            // Reset dropped the colors along with everything else.
            self.fg = None;
            self.bg = None;
        }
        if self.fg.as_ref() != Some(&cell.fg) {
            let n = cell.fg.ansi256();
            self.queue(|b| ansi::fg_256(b, n));
            self.fg = Some(cell.fg.clone());
        }
        if self.bg.as_ref() != Some(&cell.bg) {
            let n = cell.bg.ansi256();
            self.queue(|b| ansi::bg_256(b, n));
            self.bg = Some(cell.bg.clone());
        }
    }
}

impl<W: Write> Surface for TermScreen<W> {
    fn width(&self) -> u16 {
        self.width
    }

    fn height(&self) -> u16 {
        self.height
    }

    fn set(&mut self, x: u16, y: u16, cell: &Cell) {
        check_bounds(x, y, self.width, self.height);
        self.move_to(x, y);
        self.apply_style(cell);
        let mut utf8 = [0u8; 4];
        let encoded = cell.glyph.encode_utf8(&mut utf8).as_bytes().to_vec();
        self.queue(move |b| b.write_all(&encoded));
        // The terminal advances the cursor, wrapping at the right edge.
        let (mut cx, mut cy) = (x + 1, y);
        if cx >= self.width {
            cx = 0;
            cy += 1;
        }
        self.cursor = (cy < self.height).then_some((cx, cy));
    }

    fn clear(&mut self) {
        self.queue(ansi::clear_screen);
        self.invalidate_caches();
    }
}

// =============================================================================
// Tests
// =============================================================================
