//! Error taxonomy.
//!
//! Only terminal input can produce recoverable errors; everything else in
//! the engine (out-of-bounds writes, focusing a non-focusable node, layout
//! invariant breakage) is a programming error in widget composition and
//! panics at the violation site.

use thiserror::Error;

/// Failure to decode a byte sequence arriving from the terminal.
///
/// These originate from untrusted input, not program logic: the decoder
/// recovers by discarding the offending prefix and resuming.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// A CSI sequence ended in a byte the decoder has no mapping for.
    #[error("unrecognized CSI terminator 0x{0:02x}")]
    UnrecognizedCsi(u8),

    /// A CSI `~` sequence carried a keycode outside the known set.
    #[error("unknown CSI keycode {0}")]
    UnknownKeycode(u32),

    /// A mouse report with the wrong prefix or a length other than 6.
    #[error("malformed mouse report ({0} bytes)")]
    MalformedMouse(usize),
}

/// Errors surfaced by the scheduler while driving the terminal.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("terminal i/o failed")]
    Io(#[from] std::io::Error),
}
