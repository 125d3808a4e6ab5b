use std::fmt;

use hashbrown::HashSet;
use tracing::{debug, warn};

use crate::{record::Record, transport, types::MatchId};

/// Composite identity of a scanned submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub scouter_name: String,
    pub match_number: MatchId,
    pub team_number: String,
}

impl DedupKey {
    pub fn of(record: &Record) -> Self {
        Self {
            scouter_name: record.scouter_name.clone().unwrap_or_default(),
            match_number: record.match_number.clone(),
            team_number: record.team_number.clone(),
        }
    }
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:?}, {:?}, {:?})",
            self.scouter_name,
            self.match_number.as_str(),
            self.team_number
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// First sighting of this key in the session.
    Accepted(Record),
    /// Key already seen; the payload is dropped.
    Duplicate(DedupKey),
    /// Payload did not decode.
    Malformed(String),
}

/// Keys seen during one scanning run. Memory only; a new run starts empty.
#[derive(Debug, Default)]
pub struct ScanSession {
    seen: HashSet<DedupKey>,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes one payload and checks it against the keys seen so far.
    pub fn ingest(&mut self, payload: &str) -> ScanOutcome {
        let record = match transport::decode(payload) {
            Ok(r) => r,
            Err(err) => {
                warn!(%err, "dropping undecodable payload");
                return ScanOutcome::Malformed(err.to_string());
            }
        };
        self.ingest_record(record)
    }

    pub fn ingest_record(&mut self, record: Record) -> ScanOutcome {
        let key = DedupKey::of(&record);
        if !self.seen.insert(key.clone()) {
            debug!(%key, "duplicate submission ignored");
            return ScanOutcome::Duplicate(key);
        }
        debug!(%key, "new submission");
        ScanOutcome::Accepted(record)
    }

    pub fn seen_len(&self) -> usize {
        self.seen.len()
    }
}
