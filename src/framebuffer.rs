//! Double-buffered cell grid with minimal-diff flushing.
//!
//! Widgets draw into the intended grid; [`FrameBuffer::flush`] compares it
//! against the shadow of what was last written to the terminal and forwards
//! only the cells that differ. A whole-buffer invalidation (resize, explicit
//! clear) forces the next flush to clear the target and rewrite everything.
//!
//! Storage is a flat row-major `Vec<Cell>`.

use crate::style::Cell;
use crate::surface::{Surface, check_bounds};

pub struct FrameBuffer {
    width: u16,
    height: u16,
    /// What the next flush should show.
    cells: Vec<Cell>,
    /// What the terminal currently shows.
    shadow: Vec<Cell>,
    /// Treat every cell as changed on the next flush and clear the target
    /// first. Set on creation, resize and explicit invalidation.
    invalidated: bool,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::blank(); size],
            shadow: vec![Cell::blank(); size],
            invalidated: true,
        }
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn cell(&self, x: u16, y: u16) -> &Cell {
        check_bounds(x, y, self.width, self.height);
        &self.cells[self.index(x, y)]
    }

    /// Force the next flush to clear the target and rewrite every cell.
    pub fn invalidate(&mut self) {
        self.invalidated = true;
    }

    /// Write every differing cell to `out` and absorb the intended grid
    /// into the shadow. Returns the number of cells written.
    pub fn flush(&mut self, out: &mut dyn Surface) -> usize {
        let mut written = 0;
        if self.invalidated {
            out.clear();
        }
        for y in 0..self.height {
            for x in 0..self.width {
                let i = self.index(x, y);
                if self.invalidated || self.cells[i] != self.shadow[i] {
                    out.set(x, y, &self.cells[i]);
                    self.shadow[i] = self.cells[i].clone();
                    written += 1;
                }
            }
        }
        self.invalidated = false;
        written
    }
}

impl Surface for FrameBuffer {
    fn width(&self) -> u16 {
        self.width
    }

    fn height(&self) -> u16 {
        self.height
    }

    /// Writes touch the intended grid only; no terminal I/O happens here.
    fn set(&mut self, x: u16, y: u16, cell: &Cell) {
        check_bounds(x, y, self.width, self.height);
        let i = self.index(x, y);
        self.cells[i] = cell.clone();
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Cell;

    /// Flush target that records which cells were written.
    struct Recorder {
        width: u16,
        height: u16,
        writes: Vec<(u16, u16, char)>,
        cleared: usize,
    }

    impl Recorder {
        fn new(width: u16, height: u16) -> Self {
            Self {
                width,
                height,
                writes: Vec::new(),
                cleared: 0,
            }
        }
    }

    impl Surface for Recorder {
        fn width(&self) -> u16 {
            self.width
        }
        fn height(&self) -> u16 {
            self.height
        }
        fn set(&mut self, x: u16, y: u16, cell: &Cell) {
            check_bounds(x, y, self.width, self.height);
            self.writes.push((x, y, cell.glyph));
        }
        fn clear(&mut self) {
            self.cleared += 1;
        }
    }

    #[test]
    fn first_flush_writes_everything() {
        let mut fb = FrameBuffer::new(3, 2);
        let mut out = Recorder::new(3, 2);
        assert_eq!(fb.flush(&mut out), 6);
        assert_eq!(out.cleared, 1);
    }

    #[test]
    fn flush_emits_exactly_the_changed_cells() {
        let mut fb = FrameBuffer::new(4, 3);
        let mut out = Recorder::new(4, 3);
        fb.flush(&mut out);
        out.writes.clear();

        fb.set(1, 1, &Cell::glyph('a'));
        fb.set(3, 2, &Cell::glyph('b'));
        fb.set(0, 0, &Cell::blank()); // unchanged value, no diff
        assert_eq!(fb.flush(&mut out), 2);
        assert_eq!(out.writes, vec![(1, 1, 'a'), (3, 2, 'b')]);
    }

    #[test]
    fn second_flush_with_no_writes_emits_nothing() {
        let mut fb = FrameBuffer::new(5, 5);
        let mut out = Recorder::new(5, 5);
        fb.set(2, 2, &Cell::glyph('x'));
        fb.flush(&mut out);
        out.writes.clear();
        assert_eq!(fb.flush(&mut out), 0);
        assert!(out.writes.is_empty());
    }

    #[test]
    fn rewriting_same_value_produces_no_diff() {
        let mut fb = FrameBuffer::new(2, 1);
        let mut out = Recorder::new(2, 1);
        fb.set(0, 0, &Cell::glyph('q'));
        fb.flush(&mut out);
        out.writes.clear();
        fb.set(0, 0, &Cell::glyph('q'));
        assert_eq!(fb.flush(&mut out), 0);
    }

    #[test]
    fn invalidation_forces_full_rewrite_and_clear() {
        let mut fb = FrameBuffer::new(2, 2);
        let mut out = Recorder::new(2, 2);
        fb.flush(&mut out);
        out.writes.clear();
        fb.invalidate();
        assert_eq!(fb.flush(&mut out), 4);
        assert_eq!(out.cleared, 2);
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn out_of_bounds_set_panics() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.set(2, 0, &Cell::blank());
    }
}
