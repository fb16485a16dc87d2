//! Fluent tree construction.
//!
//! Containers nest through closures, so the code shape mirrors the view
//! hierarchy:
//!
//! ```no_run
//! use weft::view::{builder, ViewTree};
//! use weft::view::widgets::TextInput;
//!
//! let mut tree = ViewTree::new();
//! builder::build(&mut tree, |b| {
//!     b.center(|b| {
//!         b.frame(Some("Login"), |b| {
//!             b.grid(2, 2, |g| {
//!                 g.label("Username");
//!                 g.put(TextInput::new(12));
//!                 g.label("Password");
//!                 g.put(TextInput::password(12));
//!             });
//!         });
//!     });
//! });
//! ```

use crate::style::BLACK;

use super::layout::{Axis, GridModel, HAlign, LayoutKind, VAlign};
use super::widgets::{Label, Rule, Spacer, Widget};
use super::{NodeId, ViewTree};

/// Build under the tree's root.
pub fn build(tree: &mut ViewTree, f: impl FnOnce(&mut TreeBuilder)) {
    let root = tree.root();
    let mut b = TreeBuilder { tree, parent: root };
    f(&mut b);
}

/// Cursor into one container of a [`ViewTree`].
pub struct TreeBuilder<'a> {
    tree: &'a mut ViewTree,
    parent: NodeId,
}

impl TreeBuilder<'_> {
    fn nest(
        &mut self,
        kind: LayoutKind,
        f: impl FnOnce(&mut TreeBuilder),
    ) -> NodeId {
        let id = self.tree.add_container(self.parent, kind);
        let mut inner = TreeBuilder {
            tree: self.tree,
            parent: id,
        };
        f(&mut inner);
        id
    }

    pub fn group(&mut self, f: impl FnOnce(&mut TreeBuilder)) -> NodeId {
        self.nest(LayoutKind::Group, f)
    }

    pub fn align(
        &mut self,
        h: HAlign,
        v: VAlign,
        f: impl FnOnce(&mut TreeBuilder),
    ) -> NodeId {
        self.nest(LayoutKind::Align { h, v }, f)
    }

    /// Centered both ways; the most common alignment.
    pub fn center(&mut self, f: impl FnOnce(&mut TreeBuilder)) -> NodeId {
        self.align(HAlign::Mid, VAlign::Mid, f)
    }

    pub fn frame(&mut self, title: Option<&str>, f: impl FnOnce(&mut TreeBuilder)) -> NodeId {
        self.nest(
            LayoutKind::Frame {
                title: title.map(str::to_owned),
                bg: BLACK,
            },
            f,
        )
    }

    pub fn vertical(&mut self, f: impl FnOnce(&mut TreeBuilder)) -> NodeId {
        self.nest(LayoutKind::Stack(Axis::Vertical), f)
    }

    pub fn horizontal(&mut self, f: impl FnOnce(&mut TreeBuilder)) -> NodeId {
        self.nest(LayoutKind::Stack(Axis::Horizontal), f)
    }

    pub fn grid(
        &mut self,
        cols: usize,
        rows: usize,
        f: impl FnOnce(&mut GridBuilder),
    ) -> NodeId {
        let id = self
            .tree
            .add_container(self.parent, LayoutKind::Grid(GridModel::new(cols, rows)));
        let mut g = GridBuilder {
            tree: self.tree,
            grid: id,
            cols,
            col: 0,
            row: 0,
        };
        f(&mut g);
        id
    }

    pub fn label(&mut self, text: &str) -> NodeId {
        self.widget(Label::new(text))
    }

    pub fn spacer(&mut self, width: u16, height: u16) -> NodeId {
        self.widget(Spacer::new(width, height))
    }

    pub fn rule(&mut self, title: Option<&str>) -> NodeId {
        self.widget(match title {
            Some(t) => Rule::titled(t),
            None => Rule::new(),
        })
    }

    pub fn widget(&mut self, widget: impl Widget) -> NodeId {
        self.tree.add_widget(self.parent, widget)
    }

    pub fn tree(&mut self) -> &mut ViewTree {
        self.tree
    }
}

/// Cursor-based grid filling: every placement advances one column, wrapping
/// to the next row at the grid's width.
pub struct GridBuilder<'a> {
    tree: &'a mut ViewTree,
    grid: NodeId,
    cols: usize,
    col: usize,
    row: usize,
}

impl GridBuilder<'_> {
    /// Place a widget at the cursor and advance.
    pub fn put(&mut self, widget: impl Widget) -> NodeId {
        self.put_span(widget, 1, 1)
    }

    /// Place a widget with spans at the cursor; the cursor still advances by
    /// a single column.
    pub fn put_span(&mut self, widget: impl Widget, colspan: usize, rowspan: usize) -> NodeId {
        let id = self.tree.add_widget(self.grid, widget);
        self.tree
            .grid_place(self.grid, self.col, self.row, id, colspan, rowspan);
        self.advance();
        id
    }

    pub fn label(&mut self, text: &str) -> NodeId {
        self.put(Label::new(text))
    }

    /// Leave the cursor's cell empty.
    pub fn skip(&mut self) {
        self.advance();
    }

    fn advance(&mut self) {
        self.col += 1;
        if self.col >= self.cols {
            self.col = 0;
            self.row += 1;
        }
    }
}

// =============================================================================
// Popup
// =============================================================================

/// Overlay mounted above the whole tree.
///
/// Opening remembers the focused leaf, mounts a z=1 child of the root and
/// moves focus into it; closing removes the overlay and hands focus back.
pub struct Popup {
    node: NodeId,
    saved: Option<NodeId>,
}

impl Popup {
    pub fn open(tree: &mut ViewTree, f: impl FnOnce(&mut TreeBuilder)) -> Self {
        let saved = tree.focused_leaf();
        let root = tree.root();
        let node = tree.add_container(root, LayoutKind::Group);
        tree.set_z(node, 1);
        let mut b = TreeBuilder { tree, parent: node };
        f(&mut b);
        if tree.focusable(node) {
            tree.focus(node);
        }
        Self { node, saved }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Tear the overlay down and restore the saved focus.
    pub fn close(self, tree: &mut ViewTree) {
        tree.remove(self.node);
        if let Some(saved) = self.saved
            && tree.contains(saved)
            && tree.focusable(saved)
        {
            tree.focus(saved);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
