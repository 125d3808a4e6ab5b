//! In-memory session state, undo logs, and the match store.

/// Capture session aggregate and its stage machine.
pub mod session;
/// Authoritative match-record store.
pub mod store;
/// Per-phase undo log.
pub mod undo;
