//! Remote source trait and transport error types.
//!
//! The RemoteSource trait abstracts over where event files come from (the
//! survey's HTTP archive, a fake in tests) so the grabber can be exercised
//! without network access. Sources know nothing about the local data
//! directory.

use thiserror::Error;

/// Failure reported by a remote source for a single fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// The remote has no file at the requested path.
    #[error("no such file on remote")]
    NotFound,

    /// Transport failure: connection refused, timeout, server error.
    #[error("remote unavailable: {0}")]
    Unavailable(String),
}

/// Trait for remote sources of event files.
///
/// A fetch is a single blocking attempt; retries are the caller's business.
pub trait RemoteSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Fetch the raw bytes stored at `relative_path`.
    fn fetch(&self, relative_path: &str) -> Result<Vec<u8>, RemoteError>;
}
