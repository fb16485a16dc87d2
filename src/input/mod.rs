//! Terminal input: event types, the byte-stream decoder, and the blocking
//! stdin reader thread.
//!
//! ```text
//! stdin bytes → InputDecoder → KeyEvent / MouseEvent → ViewTree dispatch
//! ```
//!
//! The decoder is a state machine over a byte buffer, so escape sequences
//! split across reads resume cleanly on the next feed.

pub mod decoder;
pub mod events;
pub mod reader;

pub use decoder::InputDecoder;
pub use events::{InputEvent, Key, KeyEvent, MouseButton, MouseEvent};
pub use reader::{StdinMessage, StdinReader};
