use hashbrown::HashMap;
use serde_json::{Map, Value};
use tracing::warn;

use crate::{record::Record, types::MatchId};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("record key {key} does not match its match_number {inner}")]
    KeyMismatch { key: MatchId, inner: MatchId },
}

/// Match id to record mapping; at most one record per match, insertion order kept.
#[derive(Debug, Default, Clone)]
pub struct MatchStore {
    records: HashMap<MatchId, Record>,
    order: Vec<MatchId>,
}

impl MatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites the record for `record.match_number`.
    ///
    /// Returns the record it replaced.
    pub fn upsert(&mut self, record: Record) -> Option<Record> {
        let id = record.match_number.clone();
        let prev = self.records.insert(id.clone(), record);
        if prev.is_none() {
            self.order.push(id);
        }
        prev
    }

    pub fn get(&self, id: &MatchId) -> Option<&Record> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &MatchId) -> bool {
        self.records.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn ordered_ids(&self) -> &[MatchId] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    /// JSON object keyed by match label, in insertion order.
    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        let mut map = Map::with_capacity(self.order.len());
        for rec in self.iter() {
            map.insert(rec.match_number.to_string(), serde_json::to_value(rec)?);
        }
        Ok(Value::Object(map))
    }

    /// Rebuilds a store from a parsed store file.
    ///
    /// A non-object document yields an empty store. Entries that do not decode
    /// are skipped. An entry whose body omits `match_number` takes its key.
    pub fn from_json(value: Value) -> Self {
        let mut store = Self::new();
        let Value::Object(map) = value else {
            warn!("store document is not an object; starting empty");
            return store;
        };

        for (key, body) in map {
            match serde_json::from_value::<Record>(body) {
                Ok(mut rec) => {
                    if rec.match_number.as_str().is_empty() {
                        rec.match_number = MatchId::new(key.as_str());
                    }
                    if let Err(err) = check_key(&key, &rec) {
                        warn!(%err, "skipping stored record");
                        continue;
                    }
                    store.upsert(rec);
                }
                Err(err) => warn!(match_id = %key, %err, "skipping undecodable stored record"),
            }
        }
        store
    }
}

fn check_key(key: &str, rec: &Record) -> Result<(), StoreError> {
    if rec.match_number.as_str() != key {
        return Err(StoreError::KeyMismatch {
            key: MatchId::new(key),
            inner: rec.match_number.clone(),
        });
    }
    Ok(())
}
