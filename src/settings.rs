//! Explorer settings.
//!
//! Every field has a default from [`crate::constants`], so a settings file only
//! needs the values it overrides:
//!
//! ```json
//! { "resource_path": "data/words.csv", "timing": { "resize_debounce_ms": 100 } }
//! ```

use crate::constants::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors loading a settings file
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Header names of the columns the pipeline reads
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub english_word: String,
    pub spanish_word: String,
    pub relationship_type: String,
    pub cultural_domain: String,
    pub similarity: String,
    pub complexity: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            english_word: COLUMN_ENGLISH_WORD.to_string(),
            spanish_word: COLUMN_SPANISH_WORD.to_string(),
            relationship_type: COLUMN_RELATIONSHIP_TYPE.to_string(),
            cultural_domain: COLUMN_CULTURAL_DOMAIN.to_string(),
            similarity: COLUMN_SIMILARITY.to_string(),
            complexity: COLUMN_COMPLEXITY.to_string(),
        }
    }
}

/// Delays driving the pipeline's timers
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    pub poll_interval_ms: u64,
    pub max_container_polls: u32,
    pub settle_delay_ms: u64,
    pub resize_debounce_ms: u64,
    pub orientation_delay_ms: u64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: CONTAINER_POLL_INTERVAL_MS,
            max_container_polls: MAX_CONTAINER_POLLS,
            settle_delay_ms: SETTLE_DELAY_MS,
            resize_debounce_ms: RESIZE_DEBOUNCE_MS,
            orientation_delay_ms: ORIENTATION_DELAY_MS,
        }
    }
}

impl TimingSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    pub fn orientation_delay(&self) -> Duration {
        Duration::from_millis(self.orientation_delay_ms)
    }
}

/// Settings for one explorer pipeline
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerSettings {
    pub resource_path: String,
    pub container_id: String,
    pub canvas_id: String,
    pub container_padding: f32,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub columns: ColumnNames,
    pub timing: TimingSettings,
}

impl Default for ExplorerSettings {
    fn default() -> Self {
        Self {
            resource_path: RESOURCE_PATH.to_string(),
            container_id: CONTAINER_ID.to_string(),
            canvas_id: CANVAS_ID.to_string(),
            container_padding: CONTAINER_PADDING,
            x_axis_title: X_AXIS_TITLE.to_string(),
            y_axis_title: Y_AXIS_TITLE.to_string(),
            columns: ColumnNames::default(),
            timing: TimingSettings::default(),
        }
    }
}

impl ExplorerSettings {
    /// Load settings from a JSON file.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| SettingsError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from an explicit path, else the user settings file, else defaults.
    ///
    /// An explicit path must exist; a missing user settings file is not an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, SettingsError> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        match default_settings_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }
}

/// `<config dir>/lexiscatter/settings.json`
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("lexiscatter").join("settings.json"))
}
