//! Serializable grabber configuration.
//!
//! The environment is read in exactly one place, [`GrabberConfig::from_env`];
//! retrieval code only ever sees an explicit config value.

use crate::data::http::DEFAULT_BASE_URL;
use crate::data::DataError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming the default data directory.
pub const DATA_DIR_ENV: &str = "OGLEDATADIR";

/// Configuration for a [`crate::data::FileGrabber`].
///
/// The two switches pick the cost/durability tradeoff:
/// - `data_dir` set, remote disabled: local only
/// - `data_dir` unset, remote enabled: fetch without caching
/// - both: local first, then fetch; `save` persists
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GrabberConfig {
    /// Local data directory holding saved events.
    pub data_dir: Option<PathBuf>,

    /// Whether the remote archive may be contacted.
    pub remote_enabled: bool,

    /// Archive root used by the HTTP source.
    pub base_url: String,

    /// Connect/read timeout for remote fetches.
    pub timeout_secs: u64,
}

impl Default for GrabberConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            remote_enabled: false,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl GrabberConfig {
    /// Default configuration with `data_dir` taken from `OGLEDATADIR`, if set.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with an explicit variable lookup.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = lookup(DATA_DIR_ENV)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        Self {
            data_dir,
            ..Self::default()
        }
    }

    /// Offline configuration from the environment; fails when no data
    /// directory is configured, since nothing could ever be retrieved.
    pub fn offline_from_env() -> Result<Self, DataError> {
        Self::offline_from_vars(|key| std::env::var(key).ok())
    }

    pub fn offline_from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DataError> {
        let config = Self::from_vars(lookup);
        if config.data_dir.is_none() {
            return Err(DataError::Configuration(format!(
                "no data directory given and {DATA_DIR_ENV} is not set"
            )));
        }
        Ok(config)
    }

    /// Parse a TOML document; missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, DataError> {
        toml::from_str(text).map_err(|e| DataError::Configuration(format!("invalid config: {e}")))
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, DataError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| DataError::io(path.display().to_string(), e))?;
        Self::from_toml_str(&text)
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    pub fn with_remote(mut self, enabled: bool) -> Self {
        self.remote_enabled = enabled;
        self
    }
}
