//! File grabber: resolves an event file to bytes.
//!
//! Load policy, in order:
//! 1. data directory set and the file is saved there: read it, no network
//! 2. remote enabled: fetch and return the bytes without persisting them
//! 3. otherwise: `Unavailable`
//!
//! `save` is the only operation that writes to the data directory.

use super::error::DataError;
use super::http::HttpSource;
use super::paths::{relative_path, DataKind, EventId};
use super::source::{RemoteError, RemoteSource};
use super::store::{EventMeta, FileMeta, LocalStore};
use crate::config::GrabberConfig;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// Data-access layer over an optional local store and an optional remote.
///
/// Holds no lock; concurrent use must be serialized by the caller.
pub struct FileGrabber {
    config: GrabberConfig,
    store: Option<LocalStore>,
    remote: Option<Box<dyn RemoteSource>>,
}

impl FileGrabber {
    /// Grabber using the HTTP archive when `remote_enabled` is set.
    pub fn new(config: GrabberConfig) -> Result<Self, DataError> {
        let remote: Option<Box<dyn RemoteSource>> = if config.remote_enabled {
            let source =
                HttpSource::new(&config.base_url, Duration::from_secs(config.timeout_secs))
                    .map_err(|e| DataError::Configuration(e.to_string()))?;
            Some(Box::new(source))
        } else {
            None
        };
        Self::build(config, remote)
    }

    /// Grabber with a caller-supplied remote source.
    ///
    /// The source is only consulted when `config.remote_enabled` is set.
    pub fn with_remote(
        config: GrabberConfig,
        source: Box<dyn RemoteSource>,
    ) -> Result<Self, DataError> {
        let remote = config.remote_enabled.then_some(source);
        Self::build(config, remote)
    }

    /// Offline grabber over the directory named by `OGLEDATADIR`.
    pub fn offline_from_env() -> Result<Self, DataError> {
        Self::new(GrabberConfig::offline_from_env()?)
    }

    fn build(
        config: GrabberConfig,
        remote: Option<Box<dyn RemoteSource>>,
    ) -> Result<Self, DataError> {
        if let Some(dir) = &config.data_dir {
            if dir.exists() && !dir.is_dir() {
                return Err(DataError::Configuration(format!(
                    "data directory {} is not a directory",
                    dir.display()
                )));
            }
        }
        if config.data_dir.is_none() && remote.is_none() {
            return Err(DataError::Configuration(
                "neither a data directory nor remote access is configured".into(),
            ));
        }

        let store = config.data_dir.as_ref().map(LocalStore::new);
        Ok(Self {
            config,
            store,
            remote,
        })
    }

    pub fn config(&self) -> &GrabberConfig {
        &self.config
    }

    pub fn store(&self) -> Option<&LocalStore> {
        self.store.as_ref()
    }

    pub fn remote_enabled(&self) -> bool {
        self.remote.is_some()
    }

    /// Whether `kind` is saved locally for `id`. Never touches the network.
    pub fn is_saved(&self, id: &EventId, kind: DataKind) -> bool {
        self.store
            .as_ref()
            .is_some_and(|store| store.exists(&relative_path(id, kind)))
    }

    /// Resolve one data product to bytes; see the module docs for the policy.
    pub fn load(&self, id: &EventId, kind: DataKind) -> Result<Vec<u8>, DataError> {
        let path = relative_path(id, kind);

        if let Some(store) = &self.store {
            if store.exists(&path) {
                debug!(event = %id, %path, "loading saved file");
                return store.read(&path).map_err(|e| e.for_event(id));
            }
        }

        match &self.remote {
            Some(remote) => {
                debug!(event = %id, %path, source = remote.name(), "not saved, downloading");
                fetch(remote.as_ref(), id, &path)
            }
            None => Err(DataError::Unavailable {
                event: id.to_string(),
                path,
            }),
        }
    }

    /// Download both data products and write them into the data directory,
    /// overwriting earlier copies.
    ///
    /// Both files are fetched before anything is written, so a missing
    /// photometry file writes nothing. If a local write fails, files already
    /// written by this call are removed again; an earlier copy of them is lost.
    pub fn save(&self, id: &EventId) -> Result<SaveSummary, DataError> {
        let remote = self.remote.as_ref().ok_or_else(|| {
            DataError::Configuration(format!("cannot save {id}: remote access is disabled"))
        })?;
        let store = self.store.as_ref().ok_or_else(|| {
            DataError::Configuration(format!("cannot save {id}: no data directory configured"))
        })?;

        let params_path = relative_path(id, DataKind::Params);
        let params = fetch(remote.as_ref(), id, &params_path)?;

        let phot_path = relative_path(id, DataKind::Photometry);
        let phot = match fetch(remote.as_ref(), id, &phot_path) {
            Err(DataError::NotFound { event, path }) => {
                return Err(DataError::IncompleteEvent { event, path })
            }
            other => other?,
        };

        let mut files: Vec<SavedFile> = Vec::with_capacity(2);
        let mut meta_files = Vec::with_capacity(2);
        for (kind, path, contents) in [
            (DataKind::Params, params_path, params),
            (DataKind::Photometry, phot_path, phot),
        ] {
            if let Err(e) = store.write(&path, &contents) {
                for written in &files {
                    store.remove_quietly(&relative_path(id, written.kind));
                }
                return Err(e.for_event(id));
            }
            info!(event = %id, %path, bytes = contents.len(), "saved");
            meta_files.push(FileMeta::describe(kind.file_name(), &contents));
            files.push(SavedFile {
                kind,
                path: store.full_path(&path),
                bytes: contents.len(),
            });
        }

        let meta = EventMeta {
            event: id.to_string(),
            source: remote.name().to_string(),
            files: meta_files,
            saved_at: chrono::Local::now().naive_local(),
        };
        store
            .write_meta(&id.dir(), &meta)
            .map_err(|e| e.for_event(id))?;

        Ok(SaveSummary {
            event: id.clone(),
            files,
        })
    }
}

/// Single remote fetch with event/path context attached to failures.
fn fetch(remote: &dyn RemoteSource, id: &EventId, path: &str) -> Result<Vec<u8>, DataError> {
    remote.fetch(path).map_err(|e| match e {
        RemoteError::NotFound => DataError::NotFound {
            event: id.to_string(),
            path: path.to_string(),
        },
        RemoteError::Unavailable(reason) => DataError::RemoteUnavailable {
            event: id.to_string(),
            path: path.to_string(),
            reason,
        },
    })
}

/// What a successful `save` wrote.
#[derive(Debug, Clone)]
pub struct SaveSummary {
    pub event: EventId,
    pub files: Vec<SavedFile>,
}

#[derive(Debug, Clone)]
pub struct SavedFile {
    pub kind: DataKind,
    pub path: PathBuf,
    pub bytes: usize,
}
