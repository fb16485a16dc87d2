//! Dynamic signal bindings.
//!
//! Widgets own an [`Emitter`] and fire named [`Signal`]s ("change", "click")
//! through it; application code binds callbacks at runtime. A binding can
//! carry a matcher predicate (optionally inverted) and can be registered as
//! rejectable, in which case the callback's return value decides whether the
//! signal counts as delivered.

use std::fmt;

// =============================================================================
// Signals
// =============================================================================

/// Payload carried by a signal.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => write!(f, ""),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s}"),
        }
    }
}

/// A named event with a payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub name: &'static str,
    pub value: Value,
}

impl Signal {
    pub fn new(name: &'static str, value: Value) -> Self {
        Self { name, value }
    }

    pub fn plain(name: &'static str) -> Self {
        Self::new(name, Value::None)
    }
}

// =============================================================================
// Emitter
// =============================================================================

/// Handle returned by [`Emitter::bind`], used to unbind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token(u64);

type Matcher = Box<dyn Fn(&Signal) -> bool>;
type Callback = Box<dyn FnMut(&Signal) -> bool>;

struct Binding {
    token: Token,
    name: &'static str,
    matcher: Option<Matcher>,
    invert: bool,
    can_reject: bool,
    callback: Callback,
}

/// Registry of dynamic signal bindings.
///
/// `fire` runs every binding whose name matches and whose matcher (after
/// inversion) accepts the signal, in bind order, and reports whether at
/// least one callback ran and accepted it.
#[derive(Default)]
pub struct Emitter {
    bindings: Vec<Binding>,
    next_token: u64,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a callback to every signal with `name`.
    pub fn bind(&mut self, name: &'static str, callback: impl FnMut(&Signal) + 'static) -> Token {
        let mut callback = callback;
        self.push(name, None, false, false, Box::new(move |s| {
            callback(s);
            true
        }))
    }

    /// Bind with a matcher predicate. `invert` flips the matcher's verdict;
    /// `can_reject` makes the callback's return value decide delivery.
    pub fn bind_where(
        &mut self,
        name: &'static str,
        matcher: impl Fn(&Signal) -> bool + 'static,
        invert: bool,
        can_reject: bool,
        callback: impl FnMut(&Signal) -> bool + 'static,
    ) -> Token {
        self.push(name, Some(Box::new(matcher)), invert, can_reject, Box::new(callback))
    }

    fn push(
        &mut self,
        name: &'static str,
        matcher: Option<Matcher>,
        invert: bool,
        can_reject: bool,
        callback: Callback,
    ) -> Token {
        let token = Token(self.next_token);
        self.next_token += 1;
        self.bindings.push(Binding {
            token,
            name,
            matcher,
            invert,
            can_reject,
            callback,
        });
        token
    }

    /// Remove a binding. Unknown tokens are a no-op.
    pub fn unbind(&mut self, token: Token) {
        self.bindings.retain(|b| b.token != token);
    }

    /// Fire a signal; true when at least one binding accepted it.
    pub fn fire(&mut self, signal: &Signal) -> bool {
        let mut delivered = false;
        for b in &mut self.bindings {
            if b.name != signal.name {
                continue;
            }
            let matched = b.matcher.as_ref().is_none_or(|m| m(signal));
            if b.invert ^ matched {
                let accepted = (b.callback)(signal);
                delivered |= !b.can_reject || accepted;
            }
        }
        delivered
    }
}

// =============================================================================
// Tests
// =============================================================================
