//! Local store: event files under a data directory.
//!
//! Layout: `{data_dir}/{year}/{field}-{NNNN}/{params,phot}.dat`
//!
//! Features:
//! - Presence check that never touches the network
//! - Atomic writes (write to .tmp, rename into place)
//! - Metadata sidecar per event (`meta.json`: sizes, blake3 hashes, source)

use super::error::DataError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Sidecar name inside each event directory.
pub const META_FILE: &str = "meta.json";

/// Metadata sidecar written by `save`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMeta {
    pub event: String,
    pub source: String,
    pub files: Vec<FileMeta>,
    pub saved_at: chrono::NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMeta {
    pub name: String,
    pub bytes: usize,
    pub blake3: String,
}

impl FileMeta {
    pub fn describe(name: &str, contents: &[u8]) -> Self {
        Self {
            name: name.to_string(),
            bytes: contents.len(),
            blake3: blake3::hash(contents).to_hex().to_string(),
        }
    }
}

/// Files under one root directory, addressed by relative path.
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of a relative path.
    pub fn full_path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Whether a regular file exists at `relative`. Absence is not an error.
    pub fn exists(&self, relative: &str) -> bool {
        self.full_path(relative).is_file()
    }

    pub fn read(&self, relative: &str) -> Result<Vec<u8>, DataError> {
        fs::read(self.full_path(relative)).map_err(|e| DataError::io(relative, e))
    }

    /// Write `contents` at `relative`, creating intermediate directories.
    ///
    /// Writes go to a `.tmp` sibling first and are renamed into place, so a
    /// failed write never leaves a truncated file at the final path.
    pub fn write(&self, relative: &str, contents: &[u8]) -> Result<(), DataError> {
        let path = self.full_path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| DataError::io(relative, e))?;
        }

        let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = path.with_file_name(tmp_name);

        fs::write(&tmp_path, contents).map_err(|e| {
            remove_quietly(&tmp_path);
            DataError::io(relative, e)
        })?;

        // Atomic rename
        fs::rename(&tmp_path, &path).map_err(|e| {
            remove_quietly(&tmp_path);
            DataError::io(relative, e)
        })
    }

    /// Remove the file at `relative`, logging rather than failing.
    pub fn remove_quietly(&self, relative: &str) {
        remove_quietly(&self.full_path(relative));
    }

    /// Write the metadata sidecar for an event directory.
    pub fn write_meta(&self, event_dir: &str, meta: &EventMeta) -> Result<(), DataError> {
        let relative = format!("{event_dir}/{META_FILE}");
        let json = serde_json::to_vec_pretty(meta).map_err(|e| {
            DataError::io(&relative, std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })?;
        self.write(&relative, &json)
    }

    /// Read the metadata sidecar, if one was written and is readable.
    pub fn get_meta(&self, event_dir: &str) -> Option<EventMeta> {
        let content = fs::read(self.full_path(&format!("{event_dir}/{META_FILE}"))).ok()?;
        serde_json::from_slice(&content).ok()
    }
}

fn remove_quietly(path: &Path) {
    if path.exists() {
        if let Err(e) = fs::remove_file(path) {
            warn!(path = %path.display(), error = %e, "failed to remove file");
        }
    }
}
