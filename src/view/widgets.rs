//! Leaf widgets and their key bindings.
//!
//! A widget is a leaf node: it reports an intrinsic size, paints itself into
//! the surface it was assigned, and handles the input routed to it. Key
//! handling is table-driven: each widget type declares a `const` table of
//! [`KeyBinding`]s scanned in declaration order, with free-form fallthrough
//! (printable insertion in [`TextInput`]) after the table.
//!
//! Interactive widgets own an [`Emitter`] and fire `"click"` / `"change"`
//! signals through it.

use std::any::Any;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use unicode_width::UnicodeWidthStr;

use crate::event::{Emitter, Signal, Value};
use crate::input::{Key, KeyEvent, MouseButton, MouseEvent};
use crate::style::{Attr, Cell, Color, BLACK, WHITE};
use crate::surface::{self, Surface};

use super::RedrawHandle;

// =============================================================================
// Widget trait
// =============================================================================

/// A leaf node of the view tree.
pub trait Widget: Any {
    /// Intrinsic size in cells.
    fn measure(&self) -> (u16, u16);

    /// Paint into the assigned surface.
    fn render(&self, surface: &mut dyn Surface, focused: bool);

    fn focusable(&self) -> bool {
        true
    }

    /// Handle a key routed to this widget; true when consumed.
    fn handle_key(&mut self, _ev: &KeyEvent) -> bool {
        false
    }

    /// Handle a mouse event in local coordinates; true when consumed.
    fn handle_mouse(&mut self, _ev: &MouseEvent) -> bool {
        false
    }
}

// =============================================================================
// Key tables
// =============================================================================

/// What a binding matches. Modified keys (ctrl/alt) never match a table
/// entry; they are left for navigation and application bindings.
pub enum KeyMatch {
    Exact(Key),
    OneOf(&'static [Key]),
}

impl KeyMatch {
    pub fn matches(&self, ev: &KeyEvent) -> bool {
        if ev.ctrl || ev.alt {
            return false;
        }
        match self {
            KeyMatch::Exact(k) => ev.key == *k,
            KeyMatch::OneOf(ks) => ks.contains(&ev.key),
        }
    }
}

/// One entry of a widget's key table.
pub struct KeyBinding<W: ?Sized> {
    pub keys: KeyMatch,
    pub run: fn(&mut W, &KeyEvent),
}

/// Scan a table in declaration order; the first match runs and consumes.
pub fn run_table<W: ?Sized>(table: &[KeyBinding<W>], widget: &mut W, ev: &KeyEvent) -> bool {
    for binding in table {
        if binding.keys.matches(ev) {
            (binding.run)(widget, ev);
            return true;
        }
    }
    false
}

// =============================================================================
// Label
// =============================================================================

/// Static single-line text.
pub struct Label {
    text: String,
    pub fg: Color,
    pub bg: Color,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fg: WHITE,
            bg: BLACK,
        }
    }

    pub fn colored(text: impl Into<String>, fg: Color) -> Self {
        Self {
            fg,
            ..Self::new(text)
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

impl Widget for Label {
    fn measure(&self) -> (u16, u16) {
        (self.text.width() as u16, 1)
    }

    fn render(&self, surface: &mut dyn Surface, _focused: bool) {
        surface::text(
            surface,
            0,
            0,
            &self.text,
            self.fg.clone(),
            self.bg.clone(),
            Attr::empty(),
        );
    }

    fn focusable(&self) -> bool {
        false
    }
}

// =============================================================================
// Spacer
// =============================================================================

/// Fixed-size empty area.
pub struct Spacer {
    pub width: u16,
    pub height: u16,
}

impl Spacer {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

impl Widget for Spacer {
    fn measure(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    fn render(&self, _surface: &mut dyn Surface, _focused: bool) {}

    fn focusable(&self) -> bool {
        false
    }
}

// =============================================================================
// Rule
// =============================================================================

/// Horizontal separator line with an optional leading title.
pub struct Rule {
    title: Option<String>,
}

impl Rule {
    pub fn new() -> Self {
        Self { title: None }
    }

    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
        }
    }
}

impl Default for Rule {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for Rule {
    fn measure(&self) -> (u16, u16) {
        (
            self.title.as_deref().map_or(0, |t| t.width() as u16),
            1,
        )
    }

    fn render(&self, surface: &mut dyn Surface, _focused: bool) {
        let width = surface.width();
        surface::hline(surface, 0, 0, width, WHITE, BLACK);
        if let Some(title) = &self.title {
            let label = format!("{title} ");
            surface::text(surface, 0, 0, &label, WHITE, BLACK, Attr::empty());
        }
    }

    fn focusable(&self) -> bool {
        false
    }
}

// =============================================================================
// Button
// =============================================================================

/// Push button; fires `"click"` on Enter or a left press.
pub struct Button {
    label: String,
    emitter: Emitter,
}

const BUTTON_KEYS: &[KeyBinding<Button>] = &[KeyBinding {
    keys: KeyMatch::Exact(Key::Enter),
    run: |b, _| b.click(),
}];

impl Button {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            emitter: Emitter::new(),
        }
    }

    pub fn on_click(&mut self, mut cb: impl FnMut() + 'static) {
        self.emitter.bind("click", move |_| cb());
    }

    pub fn emitter_mut(&mut self) -> &mut Emitter {
        &mut self.emitter
    }

    pub fn click(&mut self) {
        self.emitter.fire(&Signal::plain("click"));
    }
}

impl Widget for Button {
    fn measure(&self) -> (u16, u16) {
        (self.label.width() as u16 + 4, 1)
    }

    fn render(&self, surface: &mut dyn Surface, focused: bool) {
        let text = if focused {
            format!("> {} <", self.label)
        } else {
            format!("  {}  ", self.label)
        };
        let x = surface.width() / 2 - (text.width() as u16).min(surface.width()) / 2;
        let attrs = if focused { Attr::REVERSE } else { Attr::empty() };
        surface::text(surface, x, 0, &text, WHITE, BLACK, attrs);
    }

    fn handle_key(&mut self, ev: &KeyEvent) -> bool {
        run_table(BUTTON_KEYS, self, ev)
    }

    fn handle_mouse(&mut self, ev: &MouseEvent) -> bool {
        if ev.pressed() && ev.button == MouseButton::Left {
            self.click();
            return true;
        }
        false
    }
}

// =============================================================================
// Checkbox
// =============================================================================

/// Toggle; fires `"change"` with the new boolean state.
pub struct Checkbox {
    label: String,
    checked: bool,
    emitter: Emitter,
}

const CHECKBOX_KEYS: &[KeyBinding<Checkbox>] = &[KeyBinding {
    keys: KeyMatch::Exact(Key::Char(' ')),
    run: |c, _| c.toggle(),
}];

impl Checkbox {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            checked: false,
            emitter: Emitter::new(),
        }
    }

    pub fn checked(&self) -> bool {
        self.checked
    }

    pub fn set_checked(&mut self, checked: bool) {
        if self.checked != checked {
            self.checked = checked;
            self.emitter
                .fire(&Signal::new("change", Value::Bool(checked)));
        }
    }

    pub fn toggle(&mut self) {
        self.set_checked(!self.checked);
    }

    pub fn on_change(&mut self, mut cb: impl FnMut(bool) + 'static) {
        self.emitter.bind("change", move |s| {
            if let Some(b) = s.value.as_bool() {
                cb(b);
            }
        });
    }

    pub fn emitter_mut(&mut self) -> &mut Emitter {
        &mut self.emitter
    }
}

impl Widget for Checkbox {
    fn measure(&self) -> (u16, u16) {
        let label = if self.label.is_empty() {
            0
        } else {
            self.label.width() as u16 + 1
        };
        (3 + label, 1)
    }

    fn render(&self, surface: &mut dyn Surface, focused: bool) {
        let mut text = String::from(if self.checked { "[✓]" } else { "[ ]" });
        if !self.label.is_empty() {
            text.push(' ');
            text.push_str(&self.label);
        }
        let x = surface.width() / 2 - (text.width() as u16).min(surface.width()) / 2;
        let attrs = if focused { Attr::REVERSE } else { Attr::empty() };
        surface::text(surface, x, 0, &text, WHITE, BLACK, attrs);
    }

    fn handle_key(&mut self, ev: &KeyEvent) -> bool {
        run_table(CHECKBOX_KEYS, self, ev)
    }

    fn handle_mouse(&mut self, ev: &MouseEvent) -> bool {
        if ev.pressed() && ev.button == MouseButton::Left {
            self.toggle();
            return true;
        }
        false
    }
}

// =============================================================================
// TextInput
// =============================================================================

/// Single-line editable field with a fixed capacity and optional masking.
/// Fires `"change"` with the full value on every edit.
pub struct TextInput {
    value: Vec<char>,
    length: u16,
    cursor: usize,
    password: bool,
    emitter: Emitter,
}

const TEXT_INPUT_KEYS: &[KeyBinding<TextInput>] = &[
    KeyBinding {
        keys: KeyMatch::Exact(Key::Backspace),
        run: |t, _| t.backspace(),
    },
    KeyBinding {
        keys: KeyMatch::Exact(Key::Left),
        run: |t, _| t.cursor_left(),
    },
    KeyBinding {
        keys: KeyMatch::Exact(Key::Right),
        run: |t, _| t.cursor_right(),
    },
];

impl TextInput {
    pub fn new(length: u16) -> Self {
        Self {
            value: Vec::new(),
            length,
            cursor: 0,
            password: false,
            emitter: Emitter::new(),
        }
    }

    pub fn password(length: u16) -> Self {
        Self {
            password: true,
            ..Self::new(length)
        }
    }

    pub fn value(&self) -> String {
        self.value.iter().collect()
    }

    pub fn set_value(&mut self, value: &str) {
        self.value = value.chars().take(self.length as usize).collect();
        self.cursor = self.value.len();
        self.changed();
    }

    pub fn on_change(&mut self, mut cb: impl FnMut(&str) + 'static) {
        self.emitter.bind("change", move |s| {
            if let Some(v) = s.value.as_str() {
                cb(v);
            }
        });
    }

    pub fn emitter_mut(&mut self) -> &mut Emitter {
        &mut self.emitter
    }

    fn changed(&mut self) {
        let value = self.value();
        self.emitter.fire(&Signal::new("change", Value::Str(value)));
    }

    fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.value.remove(self.cursor);
            self.changed();
        }
    }

    fn cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    fn cursor_right(&mut self) {
        if self.cursor < self.value.len() {
            self.cursor += 1;
        }
    }

    fn insert(&mut self, ch: char) {
        if self.value.len() < self.length as usize {
            self.value.insert(self.cursor, ch);
            self.cursor += 1;
            self.changed();
        }
    }
}

impl Widget for TextInput {
    fn measure(&self) -> (u16, u16) {
        (self.length + 1, 1)
    }

    fn render(&self, surface: &mut dyn Surface, focused: bool) {
        surface.clear();
        let base = if focused { Attr::BOLD } else { Attr::FAINT };
        for i in 0..=self.value.len() {
            let glyph = match self.value.get(i) {
                Some(_) if self.password => '*',
                Some(&c) => c,
                None => ' ',
            };
            let mut attrs = base;
            if i == self.cursor {
                attrs |= Attr::UNDERLINE;
            }
            surface.set(i as u16, 0, &Cell::new(glyph, WHITE, BLACK, attrs));
        }
    }

    fn handle_key(&mut self, ev: &KeyEvent) -> bool {
        if run_table(TEXT_INPUT_KEYS, self, ev) {
            return true;
        }
        if let Some(ch) = ev.text() {
            self.insert(ch);
            return true;
        }
        false
    }
}

// =============================================================================
// Decade
// =============================================================================

/// Fixed-width decimal spinner. The cursor selects a digit position; `+`/`-`
/// step the value by that digit's magnitude. Fires `"change"` with the value.
pub struct Decade {
    digits: u32,
    decimals: u32,
    value: f64,
    cursor: u32,
    min: f64,
    max: f64,
    emitter: Emitter,
}

const DECADE_KEYS: &[KeyBinding<Decade>] = &[
    KeyBinding {
        keys: KeyMatch::Exact(Key::Right),
        run: |d, _| d.cursor = d.cursor.saturating_sub(1),
    },
    KeyBinding {
        keys: KeyMatch::Exact(Key::Left),
        run: |d, _| {
            if d.cursor + 1 < d.digits {
                d.cursor += 1;
            }
        },
    },
    KeyBinding {
        keys: KeyMatch::Exact(Key::Char('+')),
        run: |d, _| d.step(1.0),
    },
    KeyBinding {
        keys: KeyMatch::Exact(Key::Char('-')),
        run: |d, _| d.step(-1.0),
    },
];

impl Decade {
    pub fn new(digits: u32, decimals: u32, min: f64, max: f64) -> Self {
        assert!(decimals < digits, "decade needs an integer digit");
        assert!(min <= max, "decade range is empty");
        Self {
            digits,
            decimals,
            value: min.max(0.0).min(max),
            cursor: 0,
            min,
            max,
            emitter: Emitter::new(),
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn set_value(&mut self, value: f64) {
        self.value = value.clamp(self.min, self.max);
        self.emitter
            .fire(&Signal::new("change", Value::Float(self.value)));
    }

    pub fn on_change(&mut self, mut cb: impl FnMut(f64) + 'static) {
        self.emitter.bind("change", move |s| {
            if let Some(v) = s.value.as_float() {
                cb(v);
            }
        });
    }

    pub fn emitter_mut(&mut self) -> &mut Emitter {
        &mut self.emitter
    }

    fn delta(&self) -> f64 {
        10f64.powi(self.cursor as i32 - self.decimals as i32)
    }

    fn step(&mut self, direction: f64) {
        let next = self.value + direction * self.delta();
        if (self.min..=self.max).contains(&next) {
            self.set_value(next);
        }
    }

    fn signed(&self) -> bool {
        self.min < 0.0
    }
}

impl Widget for Decade {
    fn measure(&self) -> (u16, u16) {
        let dot = u16::from(self.decimals > 0);
        let sign = u16::from(self.signed());
        (self.digits as u16 + dot + sign, 1)
    }

    fn render(&self, surface: &mut dyn Surface, focused: bool) {
        surface.clear();
        let (w, _) = self.measure();
        let mut x = surface.width() / 2 - w.min(surface.width()) / 2;
        let base = if focused { Attr::BOLD } else { Attr::empty() };
        if self.signed() {
            let sign = if self.value < 0.0 { '-' } else { ' ' };
            surface.set(x, 0, &Cell::new(sign, WHITE, BLACK, base));
            x += 1;
        }
        let scaled = (self.value.abs() * 10f64.powi(self.decimals as i32)).round() as u64;
        for i in 0..self.digits {
            if self.decimals > 0 && i == self.digits - self.decimals {
                surface.set(x, 0, &Cell::new('.', WHITE, BLACK, base));
                x += 1;
            }
            let mut attrs = base;
            if i == self.digits - self.cursor - 1 {
                attrs = Attr::REVERSE;
            }
            let digit = (scaled / 10u64.pow(self.digits - i - 1)) % 10;
            let glyph = char::from(b'0' + digit as u8);
            surface.set(x, 0, &Cell::new(glyph, WHITE, BLACK, attrs));
            x += 1;
        }
    }

    fn handle_key(&mut self, ev: &KeyEvent) -> bool {
        run_table(DECADE_KEYS, self, ev)
    }
}

// =============================================================================
// Console
// =============================================================================

/// Scrolling line log. Lines arrive through a [`ConsoleSink`] handle, which
/// can be cloned into other threads; pushing a line requests a redraw.
pub struct Console {
    lines: Arc<Mutex<VecDeque<String>>>,
    min_height: u16,
    history: usize,
}

/// Producer handle for a [`Console`].
#[derive(Clone)]
pub struct ConsoleSink {
    lines: Arc<Mutex<VecDeque<String>>>,
    history: usize,
    redraw: RedrawHandle,
}

impl Console {
    pub fn new(min_height: u16, history: usize) -> Self {
        Self {
            lines: Arc::new(Mutex::new(VecDeque::new())),
            min_height,
            history,
        }
    }

    /// Create a producer handle tied to the tree's redraw signal.
    pub fn sink(&self, redraw: RedrawHandle) -> ConsoleSink {
        ConsoleSink {
            lines: self.lines.clone(),
            history: self.history,
            redraw,
        }
    }
}

impl ConsoleSink {
    /// Append a line (newest at the bottom of the console) and request a
    /// redraw.
    pub fn push(&self, line: impl Into<String>) {
        let mut lines = self.lines.lock().unwrap_or_else(|e| e.into_inner());
        lines.push_front(line.into());
        lines.truncate(self.history);
        drop(lines);
        self.redraw.request();
    }
}

impl Widget for Console {
    fn measure(&self) -> (u16, u16) {
        (0, self.min_height)
    }

    fn render(&self, surface: &mut dyn Surface, _focused: bool) {
        surface.clear();
        let width = surface.width() as usize;
        let height = surface.height();
        if width == 0 || height == 0 {
            return;
        }
        let lines = self.lines.lock().unwrap_or_else(|e| e.into_inner());
        // Newest line at the bottom, older lines wrapping upward.
        let mut y = height as i32;
        'fill: for line in lines.iter() {
            let chars: Vec<char> = line.chars().collect();
            let rows = chars.chunks(width).count().max(1);
            for row in (0..rows).rev() {
                y -= 1;
                if y < 0 {
                    break 'fill;
                }
                let chunk: String = chars
                    .chunks(width)
                    .nth(row)
                    .map(|c| c.iter().collect())
                    .unwrap_or_default();
                surface::text(surface, 0, y as u16, &chunk, WHITE, BLACK, Attr::empty());
            }
        }
    }

    fn focusable(&self) -> bool {
        false
    }
}

// =============================================================================
// Tests
// =============================================================================
