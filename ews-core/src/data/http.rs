//! HTTP remote source for the survey's public early-warning archive.
//!
//! Maps a relative path `{year}/{field}-{NNNN}/{kind}.dat` onto
//! `{base_url}/ogle{phase}/ews/{relative}`. One attempt per fetch, bounded by
//! the client timeout; retrying is left to the caller.

use super::paths::{year_of, SurveyPhase};
use super::source::{RemoteError, RemoteSource};
use std::time::Duration;
use tracing::debug;

/// Default archive root.
pub const DEFAULT_BASE_URL: &str = "https://www.astrouw.edu.pl/ogle";

/// Blocking HTTP source.
pub struct HttpSource {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpSource {
    /// Build a source with the given archive root and connect/read timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RemoteError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(concat!("ews-core/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RemoteError::Unavailable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Full URL for a relative path, or `None` when no survey phase covers
    /// the path's year.
    pub fn url_for(&self, relative_path: &str) -> Option<String> {
        let phase = year_of(relative_path).and_then(SurveyPhase::for_year)?;
        Some(format!(
            "{}/ogle{}/ews/{}",
            self.base_url,
            phase.number(),
            relative_path.trim_start_matches('/')
        ))
    }
}

impl RemoteSource for HttpSource {
    fn name(&self) -> &str {
        "ogle_ews_http"
    }

    fn fetch(&self, relative_path: &str) -> Result<Vec<u8>, RemoteError> {
        // No archive for this year: nothing can exist there.
        let url = self.url_for(relative_path).ok_or(RemoteError::NotFound)?;
        debug!(%url, "fetching");

        let resp = self.client.get(&url).send().map_err(|e| {
            if e.is_timeout() {
                RemoteError::Unavailable(format!("timed out: {e}"))
            } else {
                RemoteError::Unavailable(e.to_string())
            }
        })?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RemoteError::NotFound);
        }
        if !status.is_success() {
            return Err(RemoteError::Unavailable(format!("HTTP {status} for {url}")));
        }

        let bytes = resp
            .bytes()
            .map_err(|e| RemoteError::Unavailable(format!("reading body of {url}: {e}")))?;
        Ok(bytes.to_vec())
    }
}
