//! Shared fixtures for integration tests.

#![allow(dead_code)]

use ews_core::data::{RemoteError, RemoteSource};
use ews_core::{EventId, FileGrabber, GrabberConfig};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

pub fn fixture(name: &str) -> Vec<u8> {
    std::fs::read(fixture_dir().join(name)).unwrap()
}

/// In-memory remote that counts fetches.
pub struct FakeRemote {
    files: HashMap<String, Vec<u8>>,
    calls: Arc<AtomicUsize>,
    offline: bool,
}

/// Handle for inspecting a [`FakeRemote`] after it has been boxed.
#[derive(Clone)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl FakeRemote {
    pub fn new() -> Self {
        Self {
            files: HashMap::new(),
            calls: Arc::new(AtomicUsize::new(0)),
            offline: false,
        }
    }

    /// Every fetch fails as a transport error.
    pub fn unreachable() -> Self {
        Self {
            offline: true,
            ..Self::new()
        }
    }

    pub fn with_file(mut self, path: &str, contents: &[u8]) -> Self {
        self.files.insert(path.to_string(), contents.to_vec());
        self
    }

    /// Both fixture files for `id`.
    pub fn with_event(self, id: &EventId) -> Self {
        let dir = id.dir();
        self.with_file(&format!("{dir}/params.dat"), &fixture("params.dat"))
            .with_file(&format!("{dir}/phot.dat"), &fixture("phot.dat"))
    }

    pub fn counter(&self) -> CallCounter {
        CallCounter(Arc::clone(&self.calls))
    }
}

impl RemoteSource for FakeRemote {
    fn name(&self) -> &str {
        "fake"
    }

    fn fetch(&self, relative_path: &str) -> Result<Vec<u8>, RemoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline {
            return Err(RemoteError::Unavailable("connection refused".into()));
        }
        self.files
            .get(relative_path)
            .cloned()
            .ok_or(RemoteError::NotFound)
    }
}

pub fn grabber(data_dir: Option<&Path>, remote: FakeRemote, remote_enabled: bool) -> FileGrabber {
    let mut config = GrabberConfig::default().with_remote(remote_enabled);
    config.data_dir = data_dir.map(Path::to_path_buf);
    FileGrabber::with_remote(config, Box::new(remote)).unwrap()
}

pub fn bulge(year: i32, number: u32) -> EventId {
    EventId::bulge(year, number).unwrap()
}
