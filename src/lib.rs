//! weft - a small terminal UI engine.
//!
//! Cell-based rendering with minimal terminal traffic, a focus-aware widget
//! tree, and a byte-stream input decoder, tied together by a fixed-cadence
//! engine loop.
//!
//! # Architecture
//!
//! ```text
//! stdin bytes ──► InputDecoder ──► KeyEvent / MouseEvent
//!                                        │
//!                                        ▼ dispatch (focus path / top-z)
//!                                    ViewTree
//!                                        │ layout + render
//!                                        ▼
//!                                  FrameBuffer ──diff──► TermScreen ──► terminal
//! ```
//!
//! Widgets draw into a [`FrameBuffer`]; flushing forwards only the cells
//! that changed since the previous frame to the state-caching terminal
//! writer, so a keystroke that toggles one checkbox costs a handful of
//! bytes, not a repaint. [`pipeline::run`] drives the whole thing: a
//! dedicated stdin reader thread feeds the loop, redraw requests coalesce
//! into one dirty flag, and the terminal is restored on every exit path.

pub mod error;
pub mod event;
pub mod framebuffer;
pub mod input;
pub mod pipeline;
pub mod style;
pub mod surface;
pub mod term;
pub mod view;

pub use error::{DecodeError, EngineError};
pub use framebuffer::FrameBuffer;
pub use pipeline::{run, Config, ExitHandle};
pub use style::{Attr, Cell, Color};
pub use surface::{Rect, SubSurface, Surface};
pub use view::{builder, NodeId, RedrawHandle, ViewTree};
