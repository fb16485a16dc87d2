//! End-to-end scenarios: raw bytes in, terminal cell writes out.

use std::cell::Cell as StdCell;
use std::rc::Rc;

use weft::input::{InputDecoder, InputEvent};
use weft::style::Cell;
use weft::surface::{check_bounds, Surface};
use weft::view::widgets::{Button, Checkbox, Label, Spacer, TextInput};
use weft::view::{builder, ViewTree};
use weft::FrameBuffer;

/// Flush target recording which cells were written.
struct Recorder {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
    writes: usize,
}

impl Recorder {
    fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::blank(); width as usize * height as usize],
            writes: 0,
        }
    }

    fn row(&self, y: u16) -> String {
        (0..self.width)
            .map(|x| self.cells[y as usize * self.width as usize + x as usize].glyph)
            .collect()
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
        self.cells[y as usize * self.width as usize + x as usize] = cell.clone();
        self.writes += 1;
    }
}

fn feed(tree: &mut ViewTree, decoder: &mut InputDecoder, bytes: &[u8]) {
    for event in decoder.feed(bytes) {
        match event {
            InputEvent::Key(k) => {
                tree.dispatch_key(&k);
            }
            InputEvent::Mouse(m) => tree.dispatch_mouse(&m),
        }
    }
}

#[test]
fn typing_rewrites_only_the_cells_that_changed() {
    let mut tree = ViewTree::new();
    builder::build(&mut tree, |b| {
        b.center(|b| {
            b.frame(Some("Login"), |b| {
                b.widget(TextInput::new(12));
            });
        });
    });
    tree.focus(tree.root());

    let mut fb = FrameBuffer::new(40, 10);
    let mut out = Recorder::new(40, 10);
    tree.layout(40, 10);
    tree.render(&mut fb);
    fb.flush(&mut out);
    out.writes = 0;

    let mut decoder = InputDecoder::new();
    feed(&mut tree, &mut decoder, b"x");
    tree.layout(40, 10);
    tree.render(&mut fb);
    let written = fb.flush(&mut out);
    // The typed glyph plus the moved cursor cell; nothing else repaints.
    assert_eq!(written, 2);
    assert_eq!(out.writes, 2);
}

#[test]
fn second_flush_without_changes_writes_nothing() {
    let mut tree = ViewTree::new();
    builder::build(&mut tree, |b| {
        b.center(|b| {
            b.frame(Some("Static"), |b| {
                b.label("unchanged");
            });
        });
    });

    let mut fb = FrameBuffer::new(30, 6);
    let mut out = Recorder::new(30, 6);
    tree.layout(30, 6);
    tree.render(&mut fb);
    assert!(fb.flush(&mut out) > 0);

    tree.render(&mut fb);
    assert_eq!(fb.flush(&mut out), 0);
}

#[test]
fn arrow_byte_sequence_moves_focus() {
    let mut tree = ViewTree::new();
    let mut inputs = Vec::new();
    builder::build(&mut tree, |b| {
        b.vertical(|b| {
            inputs.push(b.widget(TextInput::new(4)));
            inputs.push(b.widget(TextInput::new(4)));
        });
    });
    tree.focus(tree.root());
    assert_eq!(tree.focused_leaf(), Some(inputs[0]));

    let mut decoder = InputDecoder::new();
    // ESC [ B = Down.
    feed(&mut tree, &mut decoder, b"\x1b[B");
    assert_eq!(tree.focused_leaf(), Some(inputs[1]));

    // No wrap at the end.
    feed(&mut tree, &mut decoder, b"\x1b[B");
    assert_eq!(tree.focused_leaf(), Some(inputs[1]));

    feed(&mut tree, &mut decoder, b"\x1b[A");
    assert_eq!(tree.focused_leaf(), Some(inputs[0]));
}

#[test]
fn keystrokes_land_in_the_focused_field() {
    let mut tree = ViewTree::new();
    let mut inputs = Vec::new();
    builder::build(&mut tree, |b| {
        b.vertical(|b| {
            inputs.push(b.widget(TextInput::new(8)));
            inputs.push(b.widget(TextInput::new(8)));
        });
    });
    tree.focus(tree.root());

    let mut decoder = InputDecoder::new();
    feed(&mut tree, &mut decoder, b"user\x09pw");
    assert_eq!(tree.widget::<TextInput>(inputs[0]).unwrap().value(), "user");
    assert_eq!(tree.widget::<TextInput>(inputs[1]).unwrap().value(), "pw");
}

#[test]
fn mouse_report_clicks_a_button() {
    let mut tree = ViewTree::new();
    let mut button = None;
    builder::build(&mut tree, |b| {
        button = Some(b.widget(Button::new("Ok")));
    });
    let button = button.unwrap();
    let clicks = Rc::new(StdCell::new(0));
    let c = clicks.clone();
    tree.widget_mut::<Button>(button)
        .unwrap()
        .on_click(move || c.set(c.get() + 1));

    tree.layout(10, 3);
    let mut decoder = InputDecoder::new();
    // Left press at (0, 0).
    feed(&mut tree, &mut decoder, b"\x1b[M\x20\x21\x21");
    assert_eq!(clicks.get(), 1);
    assert!(tree.is_focused(button));
}

#[test]
fn login_form_renders_inside_its_measured_frame() {
    let mut tree = ViewTree::new();
    let mut user = None;
    builder::build(&mut tree, |b| {
        b.frame(Some("Login"), |b| {
            b.grid(3, 4, |g| {
                g.label("Username");
                g.put(Spacer::new(2, 0));
                user = Some(g.put(TextInput::new(12)));
                g.label("Password");
                g.skip();
                g.put(TextInput::password(12));
                g.put_span(Checkbox::new("Remember me"), 3, 1);
                g.skip();
                g.skip();
                g.put_span(Button::new("Ok"), 3, 1);
            });
        });
    });
    tree.widget_mut::<TextInput>(user.unwrap())
        .unwrap()
        .set_value("oceanography");

    // Every grid cell must land inside the frame the tree measured for
    // itself, including the columns widened by the spanning rows.
    let (w, h) = tree.measure(tree.root());
    tree.layout(w, h);
    let mut fb = FrameBuffer::new(w, h);
    tree.render(&mut fb);
    let mut out = Recorder::new(w, h);
    fb.flush(&mut out);
    assert!(out.rows_contain("Username"));
    assert!(out.rows_contain("Remember me"));
    assert!(out.row(0).contains(" Login "));
}

#[test]
fn popup_paints_over_base_content() {
    let mut tree = ViewTree::new();
    builder::build(&mut tree, |b| {
        b.center(|b| {
            b.widget(Label::new("BASE"));
        });
    });

    let mut fb = FrameBuffer::new(20, 7);
    let mut out = Recorder::new(20, 7);
    tree.layout(20, 7);
    tree.render(&mut fb);
    fb.flush(&mut out);
    assert!(out.row(3).contains("BASE"));

    let popup = builder::Popup::open(&mut tree, |b| {
        b.center(|b| {
            b.frame(Some("Over"), |b| {
                b.widget(Button::new("Ok"));
            });
        });
    });
    tree.layout(20, 7);
    tree.render(&mut fb);
    fb.flush(&mut out);
    assert!(!out.row(3).contains("BASE"), "overlay must cover the base");
    assert!(out.rows_contain("Over"));

    popup.close(&mut tree);
    tree.layout(20, 7);
    tree.render(&mut fb);
    fb.flush(&mut out);
    assert!(out.row(3).contains("BASE"));
}

impl Recorder {
    fn rows_contain(&self, needle: &str) -> bool {
        (0..self.height).any(|y| self.row(y).contains(needle))
    }
}
