use crate::error::Result;
use crate::models::OutputMode;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment prefix overriding saved preferences, e.g. `UTM_CONVERTER_MODE=in-place`
pub const ENV_PREFIX: &str = "UTM_CONVERTER";

/// Last-used batch settings, remembered between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub source_dir: Option<PathBuf>,
    pub destination_dir: Option<PathBuf>,
    /// Column letters of the easting
    pub x_column: Option<String>,
    /// Column letters of the northing
    pub y_column: Option<String>,
    pub mode: Option<OutputMode>,
}

impl Preferences {
    /// Load from a JSON file (missing file means empty preferences), then
    /// apply `UTM_CONVERTER_*` environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Json).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;

        let preferences: Preferences = settings.try_deserialize()?;
        debug!("Loaded preferences from {}: {:?}", path.display(), preferences);
        Ok(preferences)
    }

    /// Like `load`, but falls back to empty preferences on any error.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(preferences) => preferences,
            Err(e) => {
                debug!("Ignoring preferences at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        debug!("Saved preferences to {}", path.display());
        Ok(())
    }
}
