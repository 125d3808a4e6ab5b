//! Reversible session actions recorded in the undo log.

use serde::{Deserialize, Serialize};

use crate::types::YesNo;

/// One logged mutation with the value it replaced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UndoEntry {
    /// A counter was incremented or decremented.
    Counter {
        /// Counter key.
        key: String,
        /// Count before the change.
        previous: i64,
    },
    /// The moved-state toggle was flipped.
    Toggle {
        /// State before the flip.
        previous: YesNo,
    },
    /// The broken-state toggle was flipped.
    Broken {
        /// State before the flip.
        previous: YesNo,
    },
}
