//! Scanner event stream payloads.

use crate::engine::dedup::DedupKey;

/// Events emitted from the scanner loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// A payload with an unseen key was accepted.
    Accepted {
        /// Submission key.
        key: DedupKey,
    },
    /// A payload repeated an earlier key and was dropped.
    Duplicate {
        /// Submission key.
        key: DedupKey,
    },
    /// A payload failed to decode and was skipped.
    Malformed {
        /// Decoder message.
        reason: String,
    },
    /// The record's row reached the sheet.
    Appended {
        /// Submission key.
        key: DedupKey,
    },
    /// The sheet refused the row.
    AppendFailed {
        /// Submission key.
        key: DedupKey,
        /// Sink message.
        reason: String,
    },
}
