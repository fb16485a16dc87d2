//! Terminal driving: escape-sequence helpers, the state-caching terminal
//! surface, and raw-mode setup/teardown.

pub mod ansi;
pub mod driver;
pub mod writer;

pub use driver::TermDriver;
pub use writer::{OutputBuffer, TermScreen};
