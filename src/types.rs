//! Shared primitive IDs and scouting enums.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Counter keys tracked in both phases, in sheet column order.
pub const COUNTER_KEYS: [&str; 7] = [
    "L1",
    "L2",
    "L3",
    "L4",
    "Algae Removed",
    "Algae Processed",
    "Algae Netted",
];

/// Maximum comment length, in characters, kept when a record is materialized.
pub const COMMENT_MAX_CHARS: usize = 100;

/// Match label such as `"Match 5"`; the key of the persistence store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct MatchId(String);

impl MatchId {
    /// Wraps a label.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Returns the label text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MatchId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for MatchId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Serialize for MatchId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for MatchId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Older payloads carried bare integers.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Int(i64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Self(s),
            Raw::Int(n) => Self(n.to_string()),
        })
    }
}

/// Returns the configured match labels `"Match 1"` through `"Match {count}"`.
pub fn match_ids(count: usize) -> Vec<MatchId> {
    (1..=count).map(|i| MatchId(format!("Match {i}"))).collect()
}

/// Alliance colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alliance {
    /// Red alliance.
    Red,
    /// Blue alliance.
    Blue,
}

impl Alliance {
    /// Wire label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Red => "Red",
            Self::Blue => "Blue",
        }
    }
}

/// Two-state flag used for moved and broken toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum YesNo {
    /// Affirmative.
    #[serde(alias = "YES")]
    Yes,
    /// Negative.
    #[default]
    #[serde(alias = "NO")]
    No,
}

impl YesNo {
    /// Returns the other state.
    pub fn flipped(self) -> Self {
        match self {
            Self::Yes => Self::No,
            Self::No => Self::Yes,
        }
    }

    /// Wire label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }
}

/// End-of-match climb result.
///
/// Stored records written by earlier form layouts used other label sets;
/// [`ClimbState::from_label`] folds them onto these four values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClimbState {
    /// Robot did not reach the barge.
    #[default]
    NoBarge,
    /// Robot parked in the barge zone.
    Barge,
    /// Shallow cage climb.
    ShallowClimb,
    /// Deep cage climb.
    DeepClimb,
}

impl ClimbState {
    /// Every canonical value, in selector order.
    pub const ALL: [ClimbState; 4] = [
        Self::NoBarge,
        Self::Barge,
        Self::ShallowClimb,
        Self::DeepClimb,
    ];

    /// Wire label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoBarge => "No barge",
            Self::Barge => "Barge",
            Self::ShallowClimb => "Shallow climb",
            Self::DeepClimb => "Deep climb",
        }
    }

    /// Parses a canonical or legacy label.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "No barge" | "NONE" | "None" | "No" => Some(Self::NoBarge),
            "Barge" | "PARK" | "Yes" => Some(Self::Barge),
            "Shallow climb" | "SHALLOW" => Some(Self::ShallowClimb),
            "Deep climb" | "DEEP" => Some(Self::DeepClimb),
            _ => None,
        }
    }
}

impl Serialize for ClimbState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ClimbState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Self::from_label(&label)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown climb state: {label:?}")))
    }
}

/// Capture phase that owns a counter set and an undo log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Autonomous period.
    Auto,
    /// Driver-controlled period.
    Teleop,
}
