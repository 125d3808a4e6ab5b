//! Layered configuration: built-in defaults, an optional file, then `SCOUT_*` variables.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    core::session::{SessionConfig, ValidationPolicy},
    runtime::handle::{RelayMode, ScannerConfig},
    types::{MatchId, match_ids},
};

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("configuration error: {0}")]
    Load(#[from] ::config::ConfigError),
}

/// Destination sheet for scanned records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetSettings {
    pub database: PathBuf,
    pub section: String,
}

impl Default for SheetSettings {
    fn default() -> Self {
        Self {
            database: PathBuf::from("scout_sheet.db"),
            section: "Raw".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoutSettings {
    pub event_names: Vec<String>,
    pub match_count: usize,
    pub field_width: f64,
    pub field_height: f64,
    pub validation: ValidationPolicy,
    pub data_file: PathBuf,
    pub export_dir: Option<PathBuf>,
    pub relay_mode: RelayMode,
    pub sheet: SheetSettings,
}

impl Default for ScoutSettings {
    fn default() -> Self {
        let session = SessionConfig::default();
        Self {
            event_names: vec!["Newmarket".to_string(), "Durham College".to_string()],
            match_count: 58,
            field_width: session.field_width,
            field_height: session.field_height,
            validation: session.validation,
            data_file: PathBuf::from("match_data.json"),
            export_dir: None,
            relay_mode: RelayMode::default(),
            sheet: SheetSettings::default(),
        }
    }
}

impl ScoutSettings {
    /// Loads settings; `file` must exist when given.
    ///
    /// Environment variables use the `SCOUT_` prefix and `__` for nesting,
    /// e.g. `SCOUT_SHEET__SECTION=Raw`.
    pub fn load(file: Option<&Path>) -> Result<Self, SettingsError> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(::config::File::from(path).required(true));
        }
        let settings = builder
            .add_source(
                ::config::Environment::with_prefix("SCOUT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            validation: self.validation,
            field_width: self.field_width,
            field_height: self.field_height,
        }
    }

    pub fn scanner_config(&self) -> ScannerConfig {
        ScannerConfig {
            relay_mode: self.relay_mode,
            ..ScannerConfig::default()
        }
    }

    pub fn match_ids(&self) -> Vec<MatchId> {
        match_ids(self.match_count)
    }
}
