//! Sheet projection and scan-session duplicate detection.

/// Scan-session duplicate detection.
pub mod dedup;
/// Record to sheet-row projection and header-aware writer.
pub mod projector;
/// Sheet sink trait and cell model.
pub mod traits;
