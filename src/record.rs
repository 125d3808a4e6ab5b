//! Match observation record, phase sections, counters, and coordinates.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{Alliance, COMMENT_MAX_CHARS, COUNTER_KEYS, ClimbState, MatchId, YesNo};

/// Signed scoring counters keyed by action name.
///
/// Counts may go below zero; the form never enforces a floor. Decoding
/// zero-fills every key in [`COUNTER_KEYS`] and keeps any extra keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Counters(BTreeMap<String, i64>);

impl Counters {
    /// Counters with every key in [`COUNTER_KEYS`] set to zero.
    pub fn zeroed() -> Self {
        Self(COUNTER_KEYS.iter().map(|k| ((*k).to_string(), 0)).collect())
    }

    /// Current count for `key`, or `None` when the key is not tracked.
    pub fn get(&self, key: &str) -> Option<i64> {
        self.0.get(key).copied()
    }

    /// Current count for `key`, treating absent keys as zero.
    pub fn get_or_zero(&self, key: &str) -> i64 {
        self.get(key).unwrap_or(0)
    }

    /// True when `key` is tracked.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Overwrites a tracked key and returns the previous count.
    pub(crate) fn set(&mut self, key: &str, value: i64) -> Option<i64> {
        let slot = self.0.get_mut(key)?;
        Some(std::mem::replace(slot, value))
    }

    /// Iterates keys and counts in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<'de> Deserialize<'de> for Counters {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let decoded = BTreeMap::<String, i64>::deserialize(deserializer)?;
        let mut out = Self::zeroed();
        out.0.extend(decoded);
        Ok(out)
    }
}

impl Default for Counters {
    fn default() -> Self {
        Self::zeroed()
    }
}

impl<const N: usize> From<[(&str, i64); N]> for Counters {
    /// Zeroed counters with the listed keys overwritten (or added).
    fn from(values: [(&str, i64); N]) -> Self {
        let mut out = Self::zeroed();
        for (k, v) in values {
            out.0.insert(k.to_string(), v);
        }
        out
    }
}

/// Bounding box `[x1, y1, x2, y2]` of the starting-position marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct RobotCoords {
    /// Left edge.
    pub x1: f64,
    /// Top edge.
    pub y1: f64,
    /// Right edge.
    pub x2: f64,
    /// Bottom edge.
    pub y2: f64,
}

impl RobotCoords {
    /// Builds a box from its corners.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Box width.
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    /// Box height.
    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Translates the box by `(dx, dy)`, reducing the step on each axis so the
    /// box stays inside `[0, width] x [0, height]`.
    pub fn translate_clamped(&self, dx: f64, dy: f64, width: f64, height: f64) -> Self {
        let dx = if self.x1 + dx < 0.0 {
            -self.x1
        } else if self.x2 + dx > width {
            width - self.x2
        } else {
            dx
        };
        let dy = if self.y1 + dy < 0.0 {
            -self.y1
        } else if self.y2 + dy > height {
            height - self.y2
        } else {
            dy
        };
        Self::new(self.x1 + dx, self.y1 + dy, self.x2 + dx, self.y2 + dy)
    }

    /// Shifts the box the least distance needed to lie inside
    /// `[0, width] x [0, height]`; a box larger than the field keeps its top-left at 0.
    pub fn clamped_into(&self, width: f64, height: f64) -> Self {
        let dx = if self.x1 < 0.0 {
            -self.x1
        } else if self.x2 > width {
            (width - self.x2).max(-self.x1)
        } else {
            0.0
        };
        let dy = if self.y1 < 0.0 {
            -self.y1
        } else if self.y2 > height {
            (height - self.y2).max(-self.y1)
        } else {
            0.0
        };
        Self::new(self.x1 + dx, self.y1 + dy, self.x2 + dx, self.y2 + dy)
    }

    /// Comma-joined corners, e.g. `"50,50,90,90"`.
    pub fn joined(&self) -> String {
        [self.x1, self.y1, self.x2, self.y2]
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl From<[f64; 4]> for RobotCoords {
    fn from(v: [f64; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

impl From<RobotCoords> for [f64; 4] {
    fn from(c: RobotCoords) -> Self {
        [c.x1, c.y1, c.x2, c.y2]
    }
}

/// Autonomous-period observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoSection {
    /// Scoring counters.
    pub counters: Counters,
    /// Whether the robot left its starting zone.
    pub moved_state: YesNo,
    /// Last marker position on the starting field image.
    pub robot_coords: Option<RobotCoords>,
    /// Free-text note.
    pub comment: String,
}

impl Default for AutoSection {
    fn default() -> Self {
        Self {
            counters: Counters::zeroed(),
            moved_state: YesNo::No,
            robot_coords: None,
            comment: String::new(),
        }
    }
}

/// Driver-controlled-period observations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeleopSection {
    /// Scoring counters.
    pub counters: Counters,
    /// Climb result.
    pub climb_state: ClimbState,
    /// Whether the robot broke down.
    pub teleop_broken_state: YesNo,
    /// Free-text note.
    pub comment: String,
}

impl Default for TeleopSection {
    fn default() -> Self {
        Self {
            counters: Counters::zeroed(),
            climb_state: ClimbState::NoBarge,
            teleop_broken_state: YesNo::No,
            comment: String::new(),
        }
    }
}

/// One match observation as stored, encoded, and projected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Record {
    /// Match label; unique key in the store.
    pub match_number: MatchId,
    /// Scouted team.
    pub team_number: String,
    /// Alliance colour, `null` when never chosen.
    #[serde(rename = "selected_color")]
    pub alliance: Option<Alliance>,
    /// Observer name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scouter_name: Option<String>,
    /// Autonomous section.
    pub auto: AutoSection,
    /// Teleop section.
    pub teleop: TeleopSection,
}

impl Record {
    /// Multi-line summary shown for a saved match.
    pub fn summary(&self) -> String {
        SavedSummary(self).to_string()
    }
}

struct SavedSummary<'a>(&'a Record);

impl fmt::Display for SavedSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.0;
        writeln!(f, "Saved Data:")?;
        writeln!(f, "Match: {}", r.match_number)?;
        writeln!(f, "Team: {}", r.team_number)?;
        writeln!(f, "Alliance: {}", r.alliance.map(Alliance::as_str).unwrap_or(""))?;
        if let Some(name) = &r.scouter_name {
            writeln!(f, "Scout: {name}")?;
        }
        write!(f, "Auto:")?;
        for (k, v) in r.auto.counters.iter() {
            write!(f, " {k}={v}")?;
        }
        writeln!(f, " moved={}", r.auto.moved_state.as_str())?;
        write!(f, "TeleOp:")?;
        for (k, v) in r.teleop.counters.iter() {
            write!(f, " {k}={v}")?;
        }
        write!(
            f,
            " climb={} broken={}",
            r.teleop.climb_state.as_str(),
            r.teleop.teleop_broken_state.as_str()
        )
    }
}

/// Keeps the first [`COMMENT_MAX_CHARS`] characters of `text`.
pub fn truncate_comment(text: &str) -> String {
    text.chars().take(COMMENT_MAX_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_clamps_each_axis_to_field() {
        let c = RobotCoords::new(10.0, 10.0, 50.0, 50.0);
        let moved = c.translate_clamped(-30.0, 500.0, 600.0, 259.0);
        assert_eq!(moved, RobotCoords::new(0.0, 219.0, 40.0, 259.0));
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let text = "é".repeat(120);
        assert_eq!(truncate_comment(&text).chars().count(), COMMENT_MAX_CHARS);
    }

    #[test]
    fn joined_coords_use_shortest_number_form() {
        assert_eq!(RobotCoords::new(50.0, 50.0, 90.5, 90.0).joined(), "50,50,90.5,90");
    }
}
