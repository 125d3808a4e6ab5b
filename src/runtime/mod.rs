//! Scanner relay runtime and its events.

/// Scanner events.
pub mod events;
/// Single-writer scanner loop handle.
pub mod handle;
