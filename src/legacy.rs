//! Line log written by the click-to-score prototype.
//!
//! One entry per line: `MATCH 12 | Red | 254 | 3 | Coordinates: (120, 88)`.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use tracing::warn;

const SEPARATOR: &str = " | ";

#[derive(Debug, thiserror::Error)]
pub enum LegacyError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// One scored click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyEntry {
    /// Text after `MATCH `.
    pub match_number: String,
    pub alliance: String,
    pub team_number: String,
    pub score: String,
    /// Trailing field, normally `Coordinates: (x, y)` optionally followed by notes.
    pub detail: String,
}

impl LegacyEntry {
    /// Click position parsed from the detail field.
    pub fn coordinates(&self) -> Option<(i64, i64)> {
        let rest = self.detail.split_once("Coordinates:")?.1;
        let inner = rest.trim_start().strip_prefix('(')?;
        let (inner, _) = inner.split_once(')')?;
        let (x, y) = inner.split_once(',')?;
        Some((x.trim().parse().ok()?, y.trim().parse().ok()?))
    }

    /// Notes appended after the coordinates, if any.
    pub fn notes(&self) -> Option<&str> {
        self.detail
            .split_once("Notes:")
            .map(|(_, n)| n.trim())
            .filter(|n| !n.is_empty())
    }

    pub fn to_line(&self) -> String {
        format!(
            "MATCH {}{SEPARATOR}{}{SEPARATOR}{}{SEPARATOR}{}{SEPARATOR}{}",
            self.match_number, self.alliance, self.team_number, self.score, self.detail
        )
    }

    fn parse_line(line: &str) -> Option<Self> {
        let parts: Vec<&str> = line.split(SEPARATOR).collect();
        let [m, alliance, team, score, detail] = parts.as_slice() else {
            return None;
        };
        let match_number = m.strip_prefix("MATCH").map(str::trim).unwrap_or(*m);
        Some(Self {
            match_number: match_number.to_string(),
            alliance: alliance.to_string(),
            team_number: team.to_string(),
            score: score.to_string(),
            detail: detail.to_string(),
        })
    }
}

/// Parses a whole log; blank lines are ignored and malformed lines skipped.
pub fn parse_log(text: &str) -> Vec<LegacyEntry> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let entry = LegacyEntry::parse_line(line);
            if entry.is_none() {
                warn!(line, "skipping malformed log line");
            }
            entry
        })
        .collect()
}

/// Reads a log file; a missing file has no entries.
pub fn read_log(path: &Path) -> Result<Vec<LegacyEntry>, LegacyError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(parse_log(&text)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(err) => Err(err.into()),
    }
}

/// Appends entries to `path`, creating the file and its folder when needed.
pub fn append_entries(path: &Path, entries: &[LegacyEntry]) -> Result<(), LegacyError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    for entry in entries {
        writeln!(file, "{}", entry.to_line())?;
    }
    Ok(())
}
