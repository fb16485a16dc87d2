//! The view tree: containers, widgets, focus and event routing.
//!
//! Nodes live in an arena and are addressed by [`NodeId`] handles; parent and
//! child links are ids, never references. A node is either a leaf
//! [`Widget`] or a container with a [`LayoutKind`] strategy. Layout runs
//! top-down after a bottom-up measure pass, rendering walks placed children
//! in z order, and input routing follows the focus path (keys) or the
//! top-z containment chain (mouse).
//!
//! Focus invariant: at most one child of any container is focused, so the
//! focused nodes always form a single path from the root to one leaf.

use std::any::Any;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::trace;

use crate::input::{Key, KeyEvent, MouseEvent};
use crate::style::WHITE;
use crate::surface::{self, Rect, SubSurface, Surface};

pub mod builder;
pub mod layout;
pub mod widgets;

pub use layout::{Axis, GridModel, HAlign, LayoutKind, VAlign};
pub use widgets::Widget;

/// Handle to a node in a [`ViewTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

enum NodeKind {
    Widget(Box<dyn Widget>),
    Container(LayoutKind),
}

/// Key handler attached to a node; returns true when it consumed the key.
type KeyHandler = Box<dyn FnMut(&KeyEvent) -> bool>;

struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    z: i32,
    rect: Option<Rect>,
    focused: bool,
    handlers: Vec<KeyHandler>,
    kind: NodeKind,
}

/// Cloneable redraw-request handle backed by the tree's dirty flag.
#[derive(Clone)]
pub struct RedrawHandle(Arc<AtomicBool>);

impl RedrawHandle {
    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// A handle connected to nothing; requests go nowhere.
    pub fn disconnected() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }
}

// =============================================================================
// ViewTree
// =============================================================================

/// Arena of view nodes rooted in a plain group container.
pub struct ViewTree {
    nodes: Vec<Option<Node>>,
    root: NodeId,
    dirty: Arc<AtomicBool>,
}

impl Default for ViewTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewTree {
    pub fn new() -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            z: 0,
            rect: None,
            focused: false,
            handlers: Vec::new(),
            kind: NodeKind::Container(LayoutKind::Group),
        };
        Self {
            nodes: vec![Some(root)],
            root: NodeId(0),
            dirty: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Whether the id still refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.get(id.0).is_some_and(Option::is_some)
    }

    fn node(&self, id: NodeId) -> &Node {
        match self.nodes.get(id.0).and_then(Option::as_ref) {
            Some(n) => n,
            None => panic!("node {id:?} is no longer in the tree"),
        }
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        match self.nodes.get_mut(id.0).and_then(Option::as_mut) {
            Some(n) => n,
            None => panic!("node {id:?} is no longer in the tree"),
        }
    }

    // ===== Construction =====

    pub fn add_container(&mut self, parent: NodeId, kind: LayoutKind) -> NodeId {
        self.attach(parent, NodeKind::Container(kind))
    }

    pub fn add_widget(&mut self, parent: NodeId, widget: impl Widget) -> NodeId {
        self.attach(parent, NodeKind::Widget(Box::new(widget)))
    }

    fn attach(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        assert!(
            matches!(self.node(parent).kind, NodeKind::Container(_)),
            "cannot attach children to a widget node"
        );
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Node {
            parent: Some(parent),
            children: Vec::new(),
            z: 0,
            rect: None,
            focused: false,
            handlers: Vec::new(),
            kind,
        }));
        self.node_mut(parent).children.push(id);
        self.mark_dirty();
        id
    }

    /// Register `child` at a grid position. `grid` must be a grid container
    /// and `child` one of its children. A node already at that origin is
    /// evicted and removed from the tree.
    pub fn grid_place(
        &mut self,
        grid: NodeId,
        col: usize,
        row: usize,
        child: NodeId,
        colspan: usize,
        rowspan: usize,
    ) {
        assert!(
            self.node(grid).children.contains(&child),
            "grid placement of a node that is not a child of the grid"
        );
        let evicted = match &mut self.node_mut(grid).kind {
            NodeKind::Container(LayoutKind::Grid(model)) => {
                model.place(col, row, child, colspan, rowspan)
            }
            _ => panic!("grid placement on a non-grid container"),
        };
        if let Some(old) = evicted {
            self.remove(old);
        }
        self.mark_dirty();
    }

    pub fn set_z(&mut self, id: NodeId, z: i32) {
        self.node_mut(id).z = z;
        self.mark_dirty();
    }

    /// Remove a subtree. If it held the focus, the parent's first focusable
    /// child takes it.
    pub fn remove(&mut self, id: NodeId) {
        assert!(id != self.root, "cannot remove the root");
        let had_focus = self.node(id).focused;
        let parent = self.node(id).parent;
        if let Some(p) = parent {
            self.node_mut(p).children.retain(|&c| c != id);
            if let NodeKind::Container(LayoutKind::Grid(model)) = &mut self.node_mut(p).kind {
                model.evict(id);
            }
        }
        self.drop_subtree(id);
        if had_focus && let Some(p) = parent {
            if let Some(next) = self.first_focusable_child(p) {
                self.focus_descend(next);
            }
        }
        self.mark_dirty();
    }

    fn drop_subtree(&mut self, id: NodeId) {
        let children = match self.nodes[id.0].take() {
            Some(node) => node.children,
            None => return,
        };
        for child in children {
            self.drop_subtree(child);
        }
    }

    // ===== Widget access =====

    pub fn widget<W: Widget>(&self, id: NodeId) -> Option<&W> {
        match &self.node(id).kind {
            NodeKind::Widget(w) => (w.as_ref() as &dyn Any).downcast_ref::<W>(),
            NodeKind::Container(_) => None,
        }
    }

    /// Mutable widget access. Marks the tree dirty, since the caller is
    /// presumably about to change something visible.
    pub fn widget_mut<W: Widget>(&mut self, id: NodeId) -> Option<&mut W> {
        self.mark_dirty();
        match &mut self.node_mut(id).kind {
            NodeKind::Widget(w) => (w.as_mut() as &mut dyn Any).downcast_mut::<W>(),
            NodeKind::Container(_) => None,
        }
    }

    /// Attach a key handler to a node. Handlers run during the focus-path
    /// walk, after the node's own widget handling; the first one to return
    /// true consumes the key. This is how containers (the root included)
    /// get application-level bindings such as a quit key.
    pub fn on_key(&mut self, id: NodeId, handler: impl FnMut(&KeyEvent) -> bool + 'static) {
        self.node_mut(id).handlers.push(Box::new(handler));
    }

    // ===== Dirty signal =====

    pub fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Check-and-clear the redraw request.
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::SeqCst)
    }

    pub fn redraw_handle(&self) -> RedrawHandle {
        RedrawHandle(self.dirty.clone())
    }

    // ===== Focus =====

    /// Whether a node can take focus: widgets decide for themselves,
    /// containers are focusable when any child is.
    pub fn focusable(&self, id: NodeId) -> bool {
        match &self.node(id).kind {
            NodeKind::Widget(w) => w.focusable(),
            NodeKind::Container(_) => self
                .node(id)
                .children
                .iter()
                .any(|&c| self.focusable(c)),
        }
    }

    pub fn is_focused(&self, id: NodeId) -> bool {
        self.node(id).focused
    }

    /// Give a node the focus. Focusing a container descends to its first
    /// focusable child; ancestors take focus and competing branches lose it.
    ///
    /// Panics when the node is not focusable.
    pub fn focus(&mut self, id: NodeId) {
        assert!(self.focusable(id), "focus on a non-focusable node");
        self.focus_descend(id);
        self.bubble_focus(id);
        self.mark_dirty();
    }

    fn focus_descend(&mut self, id: NodeId) {
        self.node_mut(id).focused = true;
        if let Some(child) = self.first_focusable_child(id)
            && !self.focus_order(id).iter().any(|&c| self.node(c).focused)
        {
            self.focus_descend(child);
        }
    }

    fn bubble_focus(&mut self, id: NodeId) {
        let Some(parent) = self.node(id).parent else {
            return;
        };
        let siblings = self.node(parent).children.clone();
        for sib in siblings {
            if sib != id && self.node(sib).focused {
                self.unfocus_subtree(sib);
            }
        }
        self.node_mut(parent).focused = true;
        self.bubble_focus(parent);
    }

    /// Drop focus from a node and its whole subtree.
    pub fn unfocus(&mut self, id: NodeId) {
        self.unfocus_subtree(id);
        self.mark_dirty();
    }

    fn unfocus_subtree(&mut self, id: NodeId) {
        self.node_mut(id).focused = false;
        let children = self.node(id).children.clone();
        for child in children {
            if self.node(child).focused {
                self.unfocus_subtree(child);
            }
        }
    }

    /// Children in the order focus traverses them: row-major for grids,
    /// declaration order otherwise.
    fn focus_order(&self, id: NodeId) -> Vec<NodeId> {
        match &self.node(id).kind {
            NodeKind::Container(LayoutKind::Grid(model)) => model.focus_order(),
            _ => self.node(id).children.clone(),
        }
    }

    fn first_focusable_child(&self, id: NodeId) -> Option<NodeId> {
        self.focus_order(id)
            .into_iter()
            .find(|&c| self.focusable(c))
    }

    /// The deepest focused node, or `None` when nothing is focused.
    pub fn focused_leaf(&self) -> Option<NodeId> {
        if !self.node(self.root).focused {
            return None;
        }
        let mut at = self.root;
        while let Some(&next) = self
            .node(at)
            .children
            .iter()
            .find(|&&c| self.node(c).focused)
        {
            at = next;
        }
        Some(at)
    }

    fn focus_path(&self) -> Vec<NodeId> {
        let mut path = vec![self.root];
        if !self.node(self.root).focused {
            return path;
        }
        let mut at = self.root;
        while let Some(&next) = self
            .node(at)
            .children
            .iter()
            .find(|&&c| self.node(c).focused)
        {
            path.push(next);
            at = next;
        }
        path
    }

    /// Move focus to the next focusable sibling inside `container`, scanning
    /// forward from the focused child without wrapping. Only siblings on the
    /// focused child's z level are considered.
    pub fn focus_next(&mut self, container: NodeId) -> bool {
        self.focus_step(container, 1)
    }

    /// Backward counterpart of [`focus_next`](Self::focus_next).
    pub fn focus_prev(&mut self, container: NodeId) -> bool {
        self.focus_step(container, -1)
    }

    fn focus_step(&mut self, container: NodeId, step: isize) -> bool {
        let order = self.focus_order(container);
        if order.is_empty() {
            return false;
        }
        let current = order.iter().position(|&c| self.node(c).focused);
        let current_z = current.map(|i| self.node(order[i]).z);
        let mut i = current.map(|i| i as isize).unwrap_or(0) + step;
        while (0..order.len() as isize).contains(&i) {
            let candidate = order[i as usize];
            if self.focusable(candidate)
                && current_z.is_none_or(|z| self.node(candidate).z == z)
            {
                self.focus(candidate);
                return true;
            }
            i += step;
        }
        false
    }

    // ===== Key routing =====

    /// Route a key event: the focused leaf gets it first, then each ancestor
    /// up the focus path (widget handling, then the node's attached
    /// handlers), then focus navigation (Tab/Down forward, Shift-Tab/Up
    /// backward) tried from the deepest container outward.
    pub fn dispatch_key(&mut self, ev: &KeyEvent) -> bool {
        let path = self.focus_path();
        for &id in path.iter().rev() {
            let node = self.node_mut(id);
            let mut consumed = match &mut node.kind {
                NodeKind::Widget(w) => w.handle_key(ev),
                NodeKind::Container(_) => false,
            };
            if !consumed {
                consumed = node.handlers.iter_mut().any(|h| h(ev));
            }
            if consumed {
                self.mark_dirty();
                return true;
            }
        }

        if ev.ctrl || ev.alt {
            return false;
        }
        let backward = ev.key == Key::Up || (ev.key == Key::Tab && ev.shift);
        let forward = !backward && (ev.key == Key::Down || ev.key == Key::Tab);
        if !forward && !backward {
            return false;
        }
        for &id in path.iter().rev() {
            if !matches!(self.node(id).kind, NodeKind::Container(_)) {
                continue;
            }
            let moved = if forward {
                self.focus_next(id)
            } else {
                self.focus_prev(id)
            };
            if moved {
                trace!(?id, forward, "focus moved");
                self.mark_dirty();
                return true;
            }
        }
        false
    }

    // ===== Mouse routing =====

    /// Route a mouse event from the root. Only children on the highest
    /// present z level receive it, translated into their local coordinates
    /// and containment-checked. A press focuses the widget it lands on.
    pub fn dispatch_mouse(&mut self, ev: &MouseEvent) {
        self.deliver_mouse(self.root, *ev);
    }

    fn deliver_mouse(&mut self, id: NodeId, ev: MouseEvent) {
        if let NodeKind::Widget(_) = self.node(id).kind {
            if ev.pressed() && self.focusable(id) {
                self.focus(id);
            }
            let consumed = match &mut self.node_mut(id).kind {
                NodeKind::Widget(w) => w.handle_mouse(&ev),
                NodeKind::Container(_) => false,
            };
            if consumed {
                self.mark_dirty();
            }
            return;
        }

        // Placed children in z order; the layout pass sorted them.
        let placed: Vec<(NodeId, Rect, i32)> = self
            .node(id)
            .children
            .iter()
            .filter_map(|&c| self.node(c).rect.map(|r| (c, r, self.node(c).z)))
            .collect();
        let Some(&(_, _, top_z)) = placed.last() else {
            return;
        };
        for &(child, rect, z) in placed.iter().rev() {
            if z != top_z {
                break;
            }
            let local = ev.translated(rect.x as i32, rect.y as i32);
            if rect.contains(local.x, local.y) {
                self.deliver_mouse(child, local);
            }
        }
    }

    // ===== Layout =====

    /// Intrinsic size of a node.
    pub fn measure(&self, id: NodeId) -> (u16, u16) {
        match &self.node(id).kind {
            NodeKind::Widget(w) => w.measure(),
            NodeKind::Container(kind) => {
                let sizes: Vec<(NodeId, (u16, u16))> = self
                    .node(id)
                    .children
                    .iter()
                    .map(|&c| (c, self.measure(c)))
                    .collect();
                kind.measure(&sizes)
            }
        }
    }

    /// Assign rects for a root area of the given size.
    pub fn layout(&mut self, width: u16, height: u16) {
        let root = self.root;
        self.node_mut(root).rect = Some(Rect::new(0, 0, width, height));
        self.arrange(root);
    }

    fn arrange(&mut self, id: NodeId) {
        let avail = match self.node(id).rect {
            Some(r) => (r.width, r.height),
            None => return,
        };
        if matches!(self.node(id).kind, NodeKind::Widget(_)) {
            return;
        }

        // Stable z sort keeps declaration order within a level.
        let mut children = self.node(id).children.clone();
        children.sort_by_key(|&c| self.node(c).z);
        self.node_mut(id).children = children.clone();

        let sizes: Vec<(NodeId, (u16, u16))> = children
            .iter()
            .map(|&c| (c, self.measure(c)))
            .collect();
        let rects = match &self.node(id).kind {
            NodeKind::Container(kind) => kind.arrange(avail, &sizes),
            NodeKind::Widget(_) => unreachable!(),
        };
        for (child, rect) in rects {
            self.node_mut(child).rect = rect;
            if rect.is_some() {
                self.arrange(child);
            }
        }
    }

    // ===== Render =====

    /// Paint the tree into a surface. [`layout`](Self::layout) must have run
    /// for the same size. The surface is blanked first so removed nodes
    /// leave no residue; against a diffing framebuffer this costs nothing.
    pub fn render(&self, surface: &mut dyn Surface) {
        surface.clear();
        self.render_node(self.root, surface);
    }

    fn render_node(&self, id: NodeId, surface: &mut dyn Surface) {
        let node = self.node(id);
        match &node.kind {
            NodeKind::Widget(w) => w.render(surface, node.focused),
            NodeKind::Container(kind) => {
                if matches!(kind, LayoutKind::Frame { .. }) {
                    surface.clear();
                }
                for &child in &node.children {
                    if let Some(rect) = self.node(child).rect {
                        let mut sub = SubSurface::new(&mut *surface, rect);
                        self.render_node(child, &mut sub);
                    }
                }
                if let LayoutKind::Frame { title, bg } = kind {
                    let (w, h) = (surface.width(), surface.height());
                    if w >= 2 && h >= 2 {
                        surface::frame(surface, 0, 0, w, h, WHITE, bg.clone());
                        if let Some(t) = title {
                            let label = format!(" {t} ");
                            surface::text(
                                surface,
                                1,
                                0,
                                &label,
                                WHITE,
                                bg.clone(),
                                crate::style::Attr::empty(),
                            );
                        }
                    }
                }
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::widgets::{Button, Label, Spacer, TextInput};
    use super::*;
    use crate::style::{Cell, BLACK};
    use crate::surface::check_bounds;
    use std::cell::Cell as StdCell;
    use std::rc::Rc;

    struct Canvas {
        width: u16,
        height: u16,
        cells: Vec<Cell>,
    }

    impl Canvas {
        fn new(width: u16, height: u16) -> Self {
            Self {
                width,
                height,
                cells: vec![Cell::blank(); width as usize * height as usize],
            }
        }

        fn row(&self, y: u16) -> String {
            (0..self.width)
                .map(|x| self.cells[y as usize * self.width as usize + x as usize].glyph)
                .collect()
        }
    }

    impl Surface for Canvas {
        fn width(&self) -> u16 {
            self.width
        }
        fn height(&self) -> u16 {
            self.height
        }
        fn set(&mut self, x: u16, y: u16, cell: &Cell) {
            check_bounds(x, y, self.width, self.height);
            self.cells[y as usize * self.width as usize + x as usize] = cell.clone();
        }
    }

    fn stack_of_inputs(n: usize) -> (ViewTree, Vec<NodeId>) {
        let mut tree = ViewTree::new();
        let stack = tree.add_container(tree.root(), LayoutKind::Stack(Axis::Vertical));
        let inputs = (0..n)
            .map(|_| tree.add_widget(stack, TextInput::new(4)))
            .collect();
        (tree, inputs)
    }

    #[test]
    fn focus_descends_and_bubbles() {
        let (mut tree, inputs) = stack_of_inputs(2);
        let root = tree.root();
        tree.focus(root);
        assert!(tree.is_focused(inputs[0]));
        assert!(!tree.is_focused(inputs[1]));
        assert_eq!(tree.focused_leaf(), Some(inputs[0]));
    }

    #[test]
    fn at_most_one_focused_child_per_container() {
        let (mut tree, inputs) = stack_of_inputs(3);
        tree.focus(inputs[0]);
        tree.focus(inputs[2]);
        assert!(!tree.is_focused(inputs[0]));
        assert!(!tree.is_focused(inputs[1]));
        assert!(tree.is_focused(inputs[2]));
        assert_eq!(tree.focused_leaf(), Some(inputs[2]));
    }

    #[test]
    #[should_panic(expected = "non-focusable")]
    fn focusing_a_label_panics() {
        let mut tree = ViewTree::new();
        let label = tree.add_widget(tree.root(), Label::new("static"));
        tree.focus(label);
    }

    #[test]
    fn focus_does_not_wrap() {
        let (mut tree, inputs) = stack_of_inputs(2);
        let stack = tree.node(inputs[0]).parent.unwrap();
        tree.focus(inputs[1]);
        assert!(!tree.focus_next(stack));
        assert!(tree.is_focused(inputs[1]));
        tree.focus(inputs[0]);
        assert!(!tree.focus_prev(stack));
        assert!(tree.is_focused(inputs[0]));
    }

    #[test]
    fn focus_skips_non_focusable_siblings() {
        let mut tree = ViewTree::new();
        let stack = tree.add_container(tree.root(), LayoutKind::Stack(Axis::Vertical));
        let first = tree.add_widget(stack, TextInput::new(4));
        tree.add_widget(stack, Label::new("middle"));
        tree.add_widget(stack, Spacer::new(1, 1));
        let last = tree.add_widget(stack, TextInput::new(4));
        tree.focus(first);
        assert!(tree.focus_next(stack));
        assert_eq!(tree.focused_leaf(), Some(last));
    }

    #[test]
    fn tab_moves_focus_and_stops_at_the_end() {
        let (mut tree, inputs) = stack_of_inputs(2);
        tree.focus(inputs[0]);

        assert!(tree.dispatch_key(&KeyEvent::plain(Key::Tab)));
        assert_eq!(tree.focused_leaf(), Some(inputs[1]));

        assert!(!tree.dispatch_key(&KeyEvent::plain(Key::Tab)));
        assert_eq!(tree.focused_leaf(), Some(inputs[1]));

        assert!(tree.dispatch_key(&KeyEvent::shift(Key::Tab)));
        assert_eq!(tree.focused_leaf(), Some(inputs[0]));
    }

    #[test]
    fn focused_leaf_gets_keys_before_navigation() {
        let (mut tree, inputs) = stack_of_inputs(2);
        tree.focus(inputs[0]);
        tree.dispatch_key(&KeyEvent::plain(Key::Char('h')));
        tree.dispatch_key(&KeyEvent::plain(Key::Char('i')));
        // Left is consumed by the input's own cursor movement, not nav.
        tree.dispatch_key(&KeyEvent::plain(Key::Left));
        assert_eq!(tree.focused_leaf(), Some(inputs[0]));
        assert_eq!(tree.widget::<TextInput>(inputs[0]).unwrap().value(), "hi");
    }

    #[test]
    fn container_key_bindings_catch_unconsumed_keys() {
        let (mut tree, inputs) = stack_of_inputs(1);
        let root = tree.root();
        let submits = Rc::new(StdCell::new(0));
        let s = submits.clone();
        tree.on_key(root, move |ev| {
            if ev.key == Key::Enter {
                s.set(s.get() + 1);
                true
            } else {
                false
            }
        });
        tree.focus(inputs[0]);

        // The input does not consume Enter, so it bubbles to the root.
        assert!(tree.dispatch_key(&KeyEvent::plain(Key::Enter)));
        assert_eq!(submits.get(), 1);

        // Printable keys still land in the focused leaf first.
        assert!(tree.dispatch_key(&KeyEvent::plain(Key::Char('q'))));
        assert_eq!(tree.widget::<TextInput>(inputs[0]).unwrap().value(), "q");
        assert_eq!(submits.get(), 1);
    }

    #[test]
    fn removing_the_focused_child_refocuses_a_sibling() {
        let (mut tree, inputs) = stack_of_inputs(2);
        tree.focus(inputs[1]);
        tree.remove(inputs[1]);
        assert_eq!(tree.focused_leaf(), Some(inputs[0]));
    }

    #[test]
    fn grid_focus_walks_rows_first() {
        let mut tree = ViewTree::new();
        let grid = tree.add_container(tree.root(), LayoutKind::Grid(GridModel::new(2, 2)));
        let a = tree.add_widget(grid, TextInput::new(2));
        let b = tree.add_widget(grid, TextInput::new(2));
        tree.grid_place(grid, 1, 0, a, 1, 1);
        tree.grid_place(grid, 0, 0, b, 1, 1);
        tree.focus(grid);
        assert_eq!(tree.focused_leaf(), Some(b));
        assert!(tree.focus_next(grid));
        assert_eq!(tree.focused_leaf(), Some(a));
    }

    #[test]
    fn grid_place_evicts_previous_occupant() {
        let mut tree = ViewTree::new();
        let grid = tree.add_container(tree.root(), LayoutKind::Grid(GridModel::new(1, 1)));
        let a = tree.add_widget(grid, Label::new("a"));
        tree.grid_place(grid, 0, 0, a, 1, 1);
        let b = tree.add_widget(grid, Label::new("b"));
        tree.grid_place(grid, 0, 0, b, 1, 1);
        assert_eq!(tree.node(grid).children, vec![b]);
    }

    #[test]
    fn render_draws_frame_and_title() {
        let mut tree = ViewTree::new();
        let frame = tree.add_container(
            tree.root(),
            LayoutKind::Frame {
                title: Some("Login".into()),
                bg: BLACK,
            },
        );
        tree.add_widget(frame, Label::new("0123456789"));
        assert_eq!(tree.measure(frame), (14, 3));

        tree.layout(14, 3);
        let mut canvas = Canvas::new(14, 3);
        tree.render(&mut canvas);
        assert_eq!(canvas.row(0), "┌ Login ─────┐");
        assert_eq!(canvas.row(1), "│ 0123456789 │");
        assert_eq!(canvas.row(2), "└────────────┘");
    }

    #[test]
    fn stack_overflow_children_are_not_rendered() {
        let mut tree = ViewTree::new();
        let stack = tree.add_container(tree.root(), LayoutKind::Stack(Axis::Vertical));
        tree.add_widget(stack, Label::new("one"));
        tree.add_widget(stack, Label::new("two"));
        tree.layout(3, 1);
        let mut canvas = Canvas::new(3, 1);
        tree.render(&mut canvas);
        assert_eq!(canvas.row(0), "one");
    }

    #[test]
    fn mouse_goes_only_to_the_top_z_layer() {
        let mut tree = ViewTree::new();
        let base = tree.add_container(tree.root(), LayoutKind::Group);
        let covered = tree.add_widget(base, Button::new("under"));
        let overlay = tree.add_container(tree.root(), LayoutKind::Group);
        tree.set_z(overlay, 1);
        let top = tree.add_widget(overlay, Button::new("over"));

        let under_clicks = Rc::new(StdCell::new(0));
        let c = under_clicks.clone();
        tree.widget_mut::<Button>(covered)
            .unwrap()
            .on_click(move || c.set(c.get() + 1));
        let over_clicks = Rc::new(StdCell::new(0));
        let c = over_clicks.clone();
        tree.widget_mut::<Button>(top)
            .unwrap()
            .on_click(move || c.set(c.get() + 1));

        tree.layout(20, 3);
        let press = MouseEvent::from_report(b"\x1b[M\x20\x25\x21").unwrap();
        tree.dispatch_mouse(&press);
        assert_eq!(over_clicks.get(), 1);
        assert_eq!(under_clicks.get(), 0);
    }

    #[test]
    fn mouse_outside_a_child_is_not_delivered() {
        let mut tree = ViewTree::new();
        let stack = tree.add_container(tree.root(), LayoutKind::Stack(Axis::Vertical));
        let button = tree.add_widget(stack, Button::new("hit"));
        let clicks = Rc::new(StdCell::new(0));
        let c = clicks.clone();
        tree.widget_mut::<Button>(button)
            .unwrap()
            .on_click(move || c.set(c.get() + 1));

        tree.layout(10, 3);
        // Row 2 is below the button's single-row rect.
        let miss = MouseEvent::from_report(b"\x1b[M\x20\x22\x23").unwrap();
        tree.dispatch_mouse(&miss);
        assert_eq!(clicks.get(), 0);
    }

    #[test]
    fn widget_downcast_roundtrip() {
        let mut tree = ViewTree::new();
        let id = tree.add_widget(tree.root(), Label::new("x"));
        assert!(tree.widget::<Label>(id).is_some());
        assert!(tree.widget::<Button>(id).is_none());
        tree.widget_mut::<Label>(id).unwrap().set_text("y");
        assert_eq!(tree.widget::<Label>(id).unwrap().text(), "y");
    }
}
