//! Pretty-printed JSON store file, rewritten whole on every commit.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::core::store::MatchStore;

use super::{PersistResult, StoreSink};

/// JSON file implementation of [`crate::persist::StoreSink`].
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Uses `path` as the store file; nothing is touched until load or write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl StoreSink for JsonFileStore {
    /// Reads the store file.
    ///
    /// A missing, empty, or unparseable file is an empty store, never an error.
    fn load(&self) -> PersistResult<MatchStore> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no store file yet");
                return Ok(MatchStore::new());
            }
            Err(err) => return Err(err.into()),
        };

        if text.trim().is_empty() {
            return Ok(MatchStore::new());
        }

        match serde_json::from_str::<Value>(&text) {
            Ok(value) => Ok(MatchStore::from_json(value)),
            Err(err) => {
                warn!(path = %self.path.display(), %err, "store file is malformed; starting empty");
                Ok(MatchStore::new())
            }
        }
    }

    /// Rewrites the whole file through a sibling temp file and a rename.
    fn write_all(&mut self, store: &MatchStore) -> PersistResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(&store.to_json()?)?;
        let tmp = self.temp_path();
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.path)?;
        info!(path = %self.path.display(), records = store.len(), "store written");
        Ok(())
    }
}
