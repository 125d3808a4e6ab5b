pub mod json_file;
pub mod sqlite;

use crate::core::store::MatchStore;

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("{0}")]
    Message(String),
}

pub type PersistResult<T> = Result<T, PersistError>;

/// Durable home of the match store.
///
/// Every commit hands over the full store; implementations rewrite it whole.
pub trait StoreSink {
    fn load(&self) -> PersistResult<MatchStore>;
    fn write_all(&mut self, store: &MatchStore) -> PersistResult<()>;
}

/// Sink that keeps nothing; used when a session runs without a store file.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullStoreSink;

impl StoreSink for NullStoreSink {
    fn load(&self) -> PersistResult<MatchStore> {
        Ok(MatchStore::new())
    }

    fn write_all(&mut self, _store: &MatchStore) -> PersistResult<()> {
        Ok(())
    }
}
