//! Canonical payload placed in QR codes, the clipboard, and exported files.
//!
//! The payload is compact JSON of a [`Record`]. Counters serialize as a sorted
//! map, so equal records always produce identical strings.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::record::Record;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("malformed payload: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("export failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Compact payload string.
pub fn encode(record: &Record) -> Result<String, TransportError> {
    Ok(serde_json::to_string(record)?)
}

/// Indented payload, used for exported files.
pub fn encode_pretty(record: &Record) -> Result<String, TransportError> {
    Ok(serde_json::to_string_pretty(record)?)
}

/// Parses a payload produced by [`encode`] or by older form layouts.
pub fn decode(payload: &str) -> Result<Record, TransportError> {
    Ok(serde_json::from_str(payload.trim())?)
}

/// `{team_number}_{match_number}.json`
pub fn export_file_name(record: &Record) -> String {
    format!("{}_{}.json", record.team_number, record.match_number)
}

/// Writes the pretty payload into `dir`.
///
/// No folder chosen is not an error: returns `Ok(None)` and writes nothing.
pub fn export_to_dir(
    dir: Option<&Path>,
    record: &Record,
) -> Result<Option<PathBuf>, TransportError> {
    let Some(dir) = dir else {
        return Ok(None);
    };
    let path = dir.join(export_file_name(record));
    fs::write(&path, encode_pretty(record)?)?;
    info!(path = %path.display(), "record exported");
    Ok(Some(path))
}
