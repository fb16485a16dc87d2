//! Container layout strategies.
//!
//! Each container carries a [`LayoutKind`] that turns child intrinsic sizes
//! into assigned parent-relative rectangles. Sizing is bottom-up (a
//! container's intrinsic size derives from its children), assignment is
//! top-down from the root surface.

use crate::style::Color;
use crate::surface::Rect;

use super::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Mid,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Mid,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Vertical,
    Horizontal,
}

/// Layout strategy of a container node.
pub enum LayoutKind {
    /// Children share the container's whole area.
    Group,
    /// Children share one sub-rect of their collective intrinsic size,
    /// positioned inside the container.
    Align { h: HAlign, v: VAlign },
    /// Border and optional title around the children, inset (2, 1).
    Frame { title: Option<String>, bg: Color },
    /// Children in a row or column, each at its intrinsic extent.
    Stack(Axis),
    /// Fixed rows x cols with spans.
    Grid(GridModel),
}

impl LayoutKind {
    /// Intrinsic size given the children's intrinsic sizes (in child order).
    pub fn measure(&self, children: &[(NodeId, (u16, u16))]) -> (u16, u16) {
        match self {
            LayoutKind::Group | LayoutKind::Align { .. } => bounding(children),
            LayoutKind::Frame { title, .. } => {
                let (mut w, h) = bounding(children);
                w += 4;
                if let Some(t) = title {
                    w = w.max(t.chars().count() as u16 + 4);
                }
                (w, h + 2)
            }
            LayoutKind::Stack(axis) => stack_measure(*axis, children),
            LayoutKind::Grid(grid) => grid.measure(children),
        }
    }

    /// Assign a parent-relative rect to each child, or `None` for children
    /// that do not fit. Children keep their given order.
    pub fn arrange(
        &self,
        avail: (u16, u16),
        children: &[(NodeId, (u16, u16))],
    ) -> Vec<(NodeId, Option<Rect>)> {
        match self {
            LayoutKind::Group => children
                .iter()
                .map(|&(id, _)| (id, Some(Rect::new(0, 0, avail.0, avail.1))))
                .collect(),
            LayoutKind::Align { h, v } => {
                let content = bounding(children);
                let w = content.0.min(avail.0);
                let hh = content.1.min(avail.1);
                let x = match h {
                    HAlign::Left => 0,
                    HAlign::Mid => avail.0 / 2 - w.min(avail.0) / 2,
                    HAlign::Right => avail.0 - w,
                };
                let y = match v {
                    VAlign::Top => 0,
                    VAlign::Mid => avail.1 / 2 - hh.min(avail.1) / 2,
                    VAlign::Bottom => avail.1 - hh,
                };
                let rect = (w > 0 && hh > 0).then_some(Rect::new(x, y, w, hh));
                children.iter().map(|&(id, _)| (id, rect)).collect()
            }
            LayoutKind::Frame { .. } => {
                let inner_w = avail.0.saturating_sub(4);
                let inner_h = avail.1.saturating_sub(2);
                let rect = (inner_w > 0 && inner_h > 0)
                    .then_some(Rect::new(2, 1, inner_w, inner_h));
                children.iter().map(|&(id, _)| (id, rect)).collect()
            }
            LayoutKind::Stack(axis) => stack_arrange(*axis, avail, children),
            LayoutKind::Grid(grid) => grid.arrange(children),
        }
    }
}

/// Smallest rect covering all children at a shared origin.
fn bounding(children: &[(NodeId, (u16, u16))]) -> (u16, u16) {
    children.iter().fold((0, 0), |(w, h), &(_, (cw, ch))| {
        (w.max(cw), h.max(ch))
    })
}

// =============================================================================
// Stack
// =============================================================================

fn stack_measure(axis: Axis, children: &[(NodeId, (u16, u16))]) -> (u16, u16) {
    if children.is_empty() {
        return (0, 0);
    }
    match axis {
        Axis::Vertical => (
            children.iter().map(|&(_, (w, _))| w).max().unwrap_or(0),
            children.iter().map(|&(_, (_, h))| h.max(1)).sum(),
        ),
        Axis::Horizontal => (
            children.iter().map(|&(_, (w, _))| w.max(1)).sum(),
            children.iter().map(|&(_, (_, h))| h).max().unwrap_or(0),
        ),
    }
}

/// Walk children in order, each taking its intrinsic extent along the axis
/// (floored at one cell) and the full cross extent. The first child that no
/// longer fits stops allocation; the remainder stay unplaced.
fn stack_arrange(
    axis: Axis,
    avail: (u16, u16),
    children: &[(NodeId, (u16, u16))],
) -> Vec<(NodeId, Option<Rect>)> {
    let total = match axis {
        Axis::Vertical => avail.1,
        Axis::Horizontal => avail.0,
    };
    let mut offset = 0u16;
    let mut out = Vec::with_capacity(children.len());
    let mut open = true;
    for &(id, (w, h)) in children {
        let extent = match axis {
            Axis::Vertical => h.max(1),
            Axis::Horizontal => w.max(1),
        };
        if !open || extent > total - offset {
            open = false;
            out.push((id, None));
            continue;
        }
        let rect = match axis {
            Axis::Vertical => Rect::new(0, offset, avail.0, extent),
            Axis::Horizontal => Rect::new(offset, 0, extent, avail.1),
        };
        out.push((id, Some(rect)));
        offset += extent;
    }
    out
}

// =============================================================================
// Grid
// =============================================================================

/// Cell occupancy model of a grid container.
pub struct GridModel {
    cols: usize,
    rows: usize,
    slots: Vec<GridSlot>,
}

#[derive(Debug, Clone, Copy)]
struct GridSlot {
    col: usize,
    row: usize,
    colspan: usize,
    rowspan: usize,
    node: NodeId,
}

impl GridModel {
    pub fn new(cols: usize, rows: usize) -> Self {
        assert!(cols > 0 && rows > 0, "grid needs at least one row and column");
        Self {
            cols,
            rows,
            slots: Vec::new(),
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Place a node at (col, row). Returns the node previously at that
    /// origin, which the caller must remove from the tree.
    pub fn place(
        &mut self,
        col: usize,
        row: usize,
        node: NodeId,
        colspan: usize,
        rowspan: usize,
    ) -> Option<NodeId> {
        assert!(
            col < self.cols && row < self.rows,
            "grid placement at ({col}, {row}) outside {}x{} grid",
            self.cols,
            self.rows
        );
        assert!(
            col + colspan <= self.cols && row + rowspan <= self.rows,
            "grid span at ({col}, {row}) exceeds {}x{} grid",
            self.cols,
            self.rows
        );
        let evicted = self
            .slots
            .iter()
            .position(|s| s.col == col && s.row == row)
            .map(|i| self.slots.remove(i).node);
        self.slots.push(GridSlot {
            col,
            row,
            colspan,
            rowspan,
            node,
        });
        evicted
    }

    /// Drop the slot holding `node`, if any.
    pub fn evict(&mut self, node: NodeId) {
        self.slots.retain(|s| s.node != node);
    }

    /// Nodes in row-major order, the order focus walks the grid.
    pub fn focus_order(&self) -> Vec<NodeId> {
        let mut slots: Vec<&GridSlot> = self.slots.iter().collect();
        slots.sort_by_key(|s| (s.row, s.col));
        slots.iter().map(|s| s.node).collect()
    }

    /// Intrinsic size: the sums of the same per-track extents `arrange`
    /// assigns, so measurement and assignment can never disagree.
    fn measure(&self, children: &[(NodeId, (u16, u16))]) -> (u16, u16) {
        let size_of = |node: NodeId| {
            children
                .iter()
                .find(|&&(id, _)| id == node)
                .map(|&(_, s)| s)
                .unwrap_or((0, 0))
        };
        (
            self.track_extents(self.cols, true, &size_of).iter().sum(),
            self.track_extents(self.rows, false, &size_of).iter().sum(),
        )
    }

    fn arrange(&self, children: &[(NodeId, (u16, u16))]) -> Vec<(NodeId, Option<Rect>)> {
        let size_of = |node: NodeId| {
            children
                .iter()
                .find(|&&(id, _)| id == node)
                .map(|&(_, s)| s)
                .unwrap_or((0, 0))
        };
        let col_w = self.track_extents(self.cols, true, &size_of);
        let row_h = self.track_extents(self.rows, false, &size_of);

        let offsets = |extents: &[u16]| {
            let mut at = 0u16;
            extents
                .iter()
                .map(|&e| {
                    let o = at;
                    at += e;
                    o
                })
                .collect::<Vec<_>>()
        };
        let col_x = offsets(&col_w);
        let row_y = offsets(&row_h);

        children
            .iter()
            .map(|&(id, _)| {
                let rect = self.slots.iter().find(|s| s.node == id).map(|s| {
                    let w: u16 = col_w[s.col..s.col + s.colspan].iter().sum();
                    let h: u16 = row_h[s.row..s.row + s.rowspan].iter().sum();
                    Rect::new(col_x[s.col], row_y[s.row], w, h)
                });
                (id, rect)
            })
            .collect()
    }

    /// Per-track minimum extents, one cell floor per track. A spanning cell
    /// carries its requirement across the covered tracks, contributing
    /// `ceil(remaining / tracks_left)` to each so the covered sum meets the
    /// cell's minimum.
    fn track_extents(
        &self,
        count: usize,
        columns: bool,
        size_of: &impl Fn(NodeId) -> (u16, u16),
    ) -> Vec<u16> {
        let mut extents = vec![1u16; count];
        // carry[perpendicular track] = (remaining extent, remaining tracks)
        let perp = if columns { self.rows } else { self.cols };
        let mut carry: Vec<Option<(u16, usize)>> = vec![None; perp];

        for track in 0..count {
            for lane in 0..perp {
                let need = if let Some((rem, left)) = carry[lane] {
                    let share = div_ceil_u16(rem, left);
                    carry[lane] = (left > 1).then(|| (rem.saturating_sub(share), left - 1));
                    Some(share)
                } else {
                    self.slots
                        .iter()
                        .find(|s| {
                            if columns {
                                s.col == track && s.row == lane
                            } else {
                                s.row == track && s.col == lane
                            }
                        })
                        .map(|s| {
                            let size = size_of(s.node);
                            let (min, span) = if columns {
                                (size.0.max(1), s.colspan)
                            } else {
                                (size.1.max(1), s.rowspan)
                            };
                            if span == 1 {
                                min
                            } else {
                                let share = div_ceil(min, span);
                                carry[lane] = Some((min - share, span - 1));
                                share
                            }
                        })
                };
                if let Some(n) = need {
                    extents[track] = extents[track].max(n);
                }
            }
        }
        extents
    }
}

#[inline]
fn div_ceil(extent: u16, span: usize) -> u16 {
    (extent as usize).div_ceil(span.max(1)) as u16
}

#[inline]
fn div_ceil_u16(extent: u16, tracks: usize) -> u16 {
    (extent as usize).div_ceil(tracks.max(1)) as u16
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: usize) -> NodeId {
        NodeId(n)
    }

    #[test]
    fn group_gives_every_child_the_full_area() {
        let out = LayoutKind::Group.arrange((8, 4), &[(id(0), (3, 1)), (id(1), (5, 2))]);
        for (_, rect) in out {
            assert_eq!(rect, Some(Rect::new(0, 0, 8, 4)));
        }
    }

    #[test]
    fn align_mid_truncates_toward_top_left() {
        let kind = LayoutKind::Align {
            h: HAlign::Mid,
            v: VAlign::Mid,
        };
        let out = kind.arrange((10, 5), &[(id(0), (5, 2))]);
        assert_eq!(out[0].1, Some(Rect::new(3, 1, 5, 2)));
    }

    #[test]
    fn align_right_bottom() {
        let kind = LayoutKind::Align {
            h: HAlign::Right,
            v: VAlign::Bottom,
        };
        let out = kind.arrange((10, 5), &[(id(0), (4, 1))]);
        assert_eq!(out[0].1, Some(Rect::new(6, 4, 4, 1)));
    }

    #[test]
    fn frame_measure_adds_border_and_title_width() {
        let kind = LayoutKind::Frame {
            title: Some("Login".into()),
            bg: crate::style::BLACK,
        };
        // 10x1 content inside a titled frame reports (14, 3).
        assert_eq!(kind.measure(&[(id(0), (10, 1))]), (14, 3));
        // A long title widens past the content requirement.
        let kind = LayoutKind::Frame {
            title: Some("A very long title".into()),
            bg: crate::style::BLACK,
        };
        assert_eq!(kind.measure(&[(id(0), (3, 1))]), (21, 3));
    }

    #[test]
    fn frame_insets_children() {
        let kind = LayoutKind::Frame {
            title: None,
            bg: crate::style::BLACK,
        };
        let out = kind.arrange((14, 3), &[(id(0), (10, 1))]);
        assert_eq!(out[0].1, Some(Rect::new(2, 1, 10, 1)));
    }

    #[test]
    fn vertical_stack_allocates_in_order() {
        let kind = LayoutKind::Stack(Axis::Vertical);
        let out = kind.arrange((6, 4), &[(id(0), (4, 1)), (id(1), (6, 2))]);
        assert_eq!(out[0].1, Some(Rect::new(0, 0, 6, 1)));
        assert_eq!(out[1].1, Some(Rect::new(0, 1, 6, 2)));
    }

    #[test]
    fn stack_stops_at_first_overflow() {
        // Two 1-row children in a 1-row area: only the first is placed.
        let kind = LayoutKind::Stack(Axis::Vertical);
        let out = kind.arrange((6, 1), &[(id(0), (4, 1)), (id(1), (4, 1))]);
        assert_eq!(out[0].1, Some(Rect::new(0, 0, 6, 1)));
        assert_eq!(out[1].1, None);
        // Allocation does not resume for later, smaller children.
        let out = kind.arrange(
            (6, 2),
            &[(id(0), (4, 1)), (id(1), (4, 5)), (id(2), (4, 1))],
        );
        assert_eq!(out[1].1, None);
        assert_eq!(out[2].1, None);
    }

    #[test]
    fn zero_extent_children_get_one_cell() {
        let kind = LayoutKind::Stack(Axis::Horizontal);
        let out = kind.arrange((5, 2), &[(id(0), (0, 1))]);
        assert_eq!(out[0].1, Some(Rect::new(0, 0, 1, 2)));
    }

    #[test]
    fn grid_tracks_fit_the_largest_cell() {
        let mut grid = GridModel::new(2, 2);
        grid.place(0, 0, id(0), 1, 1);
        grid.place(1, 0, id(1), 1, 1);
        grid.place(0, 1, id(2), 1, 1);
        let children = [(id(0), (8, 1)), (id(1), (4, 1)), (id(2), (2, 3))];
        let kind = LayoutKind::Grid(grid);
        assert_eq!(kind.measure(&children), (12, 4));
        let out = kind.arrange((12, 4), &children);
        assert_eq!(out[0].1, Some(Rect::new(0, 0, 8, 1)));
        assert_eq!(out[1].1, Some(Rect::new(8, 0, 4, 1)));
        // A cell's rect is the full extent of its tracks, not its own size.
        assert_eq!(out[2].1, Some(Rect::new(0, 1, 8, 3)));
    }

    #[test]
    fn grid_measure_matches_arranged_track_sums() {
        // A 3-column span whose carried share exceeds the other content of
        // a covered column; arranged rects must stay inside the measured
        // size.
        let mut grid = GridModel::new(3, 2);
        grid.place(0, 0, id(0), 1, 1);
        grid.place(1, 0, id(1), 1, 1);
        grid.place(2, 0, id(2), 1, 1);
        grid.place(0, 1, id(3), 3, 1);
        let children = [
            (id(0), (8, 1)),
            (id(1), (2, 1)),
            (id(2), (13, 1)),
            (id(3), (15, 1)),
        ];
        let kind = LayoutKind::Grid(grid);
        let (w, h) = kind.measure(&children);
        for (_, rect) in kind.arrange((w, h), &children) {
            let r = rect.unwrap();
            assert!(r.x + r.width <= w, "rect {r:?} overflows width {w}");
            assert!(r.y + r.height <= h, "rect {r:?} overflows height {h}");
        }
    }

    #[test]
    fn grid_span_covers_cell_minimum() {
        // A 7-wide cell spanning 3 columns: the covered sum must be >= 7.
        let mut grid = GridModel::new(3, 2);
        grid.place(0, 0, id(0), 3, 1);
        grid.place(0, 1, id(1), 1, 1);
        let children = [(id(0), (7, 1)), (id(1), (1, 1))];
        let kind = LayoutKind::Grid(grid);
        let out = kind.arrange((10, 2), &children);
        let span = out[0].1.unwrap();
        assert!(span.width >= 7, "span width {} < 7", span.width);
    }

    #[test]
    fn grid_rowspan_distributes_height() {
        let mut grid = GridModel::new(2, 3);
        grid.place(0, 0, id(0), 1, 3);
        grid.place(1, 0, id(1), 1, 1);
        let children = [(id(0), (2, 5)), (id(1), (3, 1))];
        let kind = LayoutKind::Grid(grid);
        let out = kind.arrange((5, 6), &children);
        let tall = out[0].1.unwrap();
        assert!(tall.height >= 5);
    }

    #[test]
    fn grid_place_reports_eviction() {
        let mut grid = GridModel::new(2, 2);
        assert_eq!(grid.place(0, 0, id(0), 1, 1), None);
        assert_eq!(grid.place(0, 0, id(1), 1, 1), Some(id(0)));
    }

    #[test]
    fn grid_focus_order_is_row_major() {
        let mut grid = GridModel::new(2, 2);
        grid.place(1, 1, id(3), 1, 1);
        grid.place(0, 0, id(0), 1, 1);
        grid.place(1, 0, id(1), 1, 1);
        grid.place(0, 1, id(2), 1, 1);
        assert_eq!(grid.focus_order(), vec![id(0), id(1), id(2), id(3)]);
    }

    #[test]
    #[should_panic(expected = "exceeds")]
    fn grid_span_outside_bounds_panics() {
        let mut grid = GridModel::new(2, 2);
        grid.place(1, 0, id(0), 2, 1);
    }
}
