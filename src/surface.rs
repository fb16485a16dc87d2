//! Addressable character grids.
//!
//! A [`Surface`] is anything cells can be written into: the real terminal,
//! the double-buffered [`FrameBuffer`](crate::framebuffer::FrameBuffer), or
//! a [`SubSurface`] view of either. Sub-surfaces translate local coordinates
//! by their origin and forward to the parent, so nested layouts compose
//! coordinate transforms without ever seeing global coordinates.
//!
//! Writing outside a surface's bounds is a programming error and panics.

use crate::style::{Attr, Cell, Color};

/// A rectangle in a parent surface's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Containment check in local coordinates (signed, for translated
    /// mouse positions that may have gone negative).
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as u32) < self.width as u32 && (y as u32) < self.height as u32
    }
}

// =============================================================================
// Surface
// =============================================================================

/// An addressable rectangular cell grid.
pub trait Surface {
    fn width(&self) -> u16;
    fn height(&self) -> u16;

    /// Write one cell. `x`/`y` must satisfy `x < width, y < height`;
    /// implementations panic otherwise.
    fn set(&mut self, x: u16, y: u16, cell: &Cell);

    /// Fill the whole surface with blanks.
    fn clear(&mut self) {
        let blank = Cell::blank();
        for y in 0..self.height() {
            for x in 0..self.width() {
                self.set(x, y, &blank);
            }
        }
    }
}

/// Bounds check shared by surface implementations.
#[inline]
pub fn check_bounds(x: u16, y: u16, width: u16, height: u16) {
    assert!(
        x < width && y < height,
        "write at ({x}, {y}) outside {width}x{height} surface"
    );
}

// =============================================================================
// Drawing helpers
// =============================================================================

/// Write a string left-to-right starting at (x, y).
pub fn text(s: &mut dyn Surface, x: u16, y: u16, t: &str, fg: Color, bg: Color, attrs: Attr) {
    for (i, ch) in t.chars().enumerate() {
        s.set(x + i as u16, y, &Cell::new(ch, fg.clone(), bg.clone(), attrs));
    }
}

/// Horizontal line of `length` cells.
pub fn hline(s: &mut dyn Surface, x: u16, y: u16, length: u16, fg: Color, bg: Color) {
    for xi in x..x + length {
        s.set(xi, y, &Cell::new('─', fg.clone(), bg.clone(), Attr::empty()));
    }
}

/// Vertical line of `length` cells.
pub fn vline(s: &mut dyn Surface, x: u16, y: u16, length: u16, fg: Color, bg: Color) {
    for yi in y..y + length {
        s.set(x, yi, &Cell::new('│', fg.clone(), bg.clone(), Attr::empty()));
    }
}

/// Rectangular border with corner glyphs; `width`/`height` are the full
/// outer size (minimum 2x2).
pub fn frame(s: &mut dyn Surface, x: u16, y: u16, width: u16, height: u16, fg: Color, bg: Color) {
    assert!(width >= 2 && height >= 2, "frame needs at least 2x2 cells");
    let (x2, y2) = (x + width - 1, y + height - 1);
    hline(s, x + 1, y, width - 2, fg.clone(), bg.clone());
    hline(s, x + 1, y2, width - 2, fg.clone(), bg.clone());
    vline(s, x, y + 1, height - 2, fg.clone(), bg.clone());
    vline(s, x2, y + 1, height - 2, fg.clone(), bg.clone());
    let corner = |g| Cell::new(g, fg.clone(), bg.clone(), Attr::empty());
    s.set(x, y, &corner('┌'));
    s.set(x2, y, &corner('┐'));
    s.set(x, y2, &corner('└'));
    s.set(x2, y2, &corner('┘'));
}

// =============================================================================
// SubSurface
// =============================================================================

/// A rectangular view into a parent surface, offset by an origin.
pub struct SubSurface<'a> {
    parent: &'a mut dyn Surface,
    origin_x: u16,
    origin_y: u16,
    width: u16,
    height: u16,
}

impl<'a> SubSurface<'a> {
    pub fn new(parent: &'a mut dyn Surface, rect: Rect) -> Self {
        Self {
            parent,
            origin_x: rect.x,
            origin_y: rect.y,
            width: rect.width,
            height: rect.height,
        }
    }
}

impl Surface for SubSurface<'_> {
    fn width(&self) -> u16 {
        self.width
    }

    fn height(&self) -> u16 {
        self.height
    }

    fn set(&mut self, x: u16, y: u16, cell: &Cell) {
        check_bounds(x, y, self.width, self.height);
        self.parent.set(self.origin_x + x, self.origin_y + y, cell);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style;

    /// In-memory surface recording every write.
    pub(crate) struct Grid {
        width: u16,
        height: u16,
        pub cells: Vec<Cell>,
    }

    impl Grid {
        pub fn new(width: u16, height: u16) -> Self {
            Self {
                width,
                height,
                cells: vec![Cell::blank(); width as usize * height as usize],
            }
        }

        pub fn at(&self, x: u16, y: u16) -> &Cell {
            &self.cells[y as usize * self.width as usize + x as usize]
        }
    }

    impl Surface for Grid {
        fn width(&self) -> u16 {
            self.width
        }
        fn height(&self) -> u16 {
            self.height
        }
        fn set(&mut self, x: u16, y: u16, cell: &Cell) {
            check_bounds(x, y, self.width, self.height);
            let idx = y as usize * self.width as usize + x as usize;
            self.cells[idx] = cell.clone();
        }
    }

    #[test]
    fn subsurface_translates_writes() {
        let mut grid = Grid::new(10, 10);
        let mut sub = SubSurface::new(&mut grid, Rect::new(3, 2, 4, 4));
        sub.set(0, 0, &Cell::glyph('a'));
        sub.set(3, 3, &Cell::glyph('b'));
        assert_eq!(grid.at(3, 2).glyph, 'a');
        assert_eq!(grid.at(6, 5).glyph, 'b');
    }

    #[test]
    fn nested_subsurfaces_compose_offsets() {
        let mut grid = Grid::new(12, 12);
        let mut outer = SubSurface::new(&mut grid, Rect::new(2, 2, 8, 8));
        let mut inner = SubSurface::new(&mut outer, Rect::new(3, 1, 4, 4));
        inner.set(1, 1, &Cell::glyph('x'));
        assert_eq!(grid.at(6, 4).glyph, 'x');
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn out_of_bounds_write_panics() {
        let mut grid = Grid::new(4, 4);
        let mut sub = SubSurface::new(&mut grid, Rect::new(0, 0, 2, 2));
        sub.set(2, 0, &Cell::blank());
    }

    #[test]
    fn frame_draws_corners_and_edges() {
        let mut grid = Grid::new(6, 4);
        frame(&mut grid, 0, 0, 6, 4, style::WHITE, style::BLACK);
        assert_eq!(grid.at(0, 0).glyph, '┌');
        assert_eq!(grid.at(5, 0).glyph, '┐');
        assert_eq!(grid.at(0, 3).glyph, '└');
        assert_eq!(grid.at(5, 3).glyph, '┘');
        assert_eq!(grid.at(2, 0).glyph, '─');
        assert_eq!(grid.at(0, 1).glyph, '│');
    }

    #[test]
    fn rect_contains_is_signed() {
        let r = Rect::new(0, 0, 3, 3);
        assert!(r.contains(0, 0));
        assert!(r.contains(2, 2));
        assert!(!r.contains(-1, 0));
        assert!(!r.contains(3, 0));
    }
}
