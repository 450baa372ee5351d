//! Structured error types for data access and parsing.
//!
//! Every variant that concerns a file names the event and the relative path
//! that was attempted, so a failure reads differently for a corrupt cache
//! file, an upstream outage and a misconfiguration.

use crate::stats::StatsError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    /// The requested operation is impossible with the current configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The event does not exist upstream.
    #[error("{event}: not found on remote ({path})")]
    NotFound { event: String, path: String },

    /// Transport failure talking to the remote.
    #[error("{event}: remote unavailable while fetching {path}: {reason}")]
    RemoteUnavailable {
        event: String,
        path: String,
        reason: String,
    },

    /// No local copy and no network access.
    #[error("{event}: {path} is not saved locally and remote access is disabled")]
    Unavailable { event: String, path: String },

    /// The event exists upstream but one of its files is missing.
    #[error("{event}: incomplete upstream dataset, {path} is missing")]
    IncompleteEvent { event: String, path: String },

    /// File content does not match the expected layout.
    #[error("{event}: malformed {path} at line {line}: {reason}")]
    Parse {
        event: String,
        path: String,
        line: usize,
        reason: String,
    },

    /// Local filesystem failure outside any event (config files).
    #[error("local I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Local filesystem failure reading or writing an event's files.
    #[error("{event}: local I/O error on {path}: {source}")]
    EventIo {
        event: String,
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("{event}: {source}")]
    Statistics {
        event: String,
        #[source]
        source: StatsError,
    },
}

impl DataError {
    pub(crate) fn io(path: impl Into<String>, source: io::Error) -> Self {
        DataError::Io {
            path: path.into(),
            source,
        }
    }

    /// Attach the event label to a bare [`DataError::Io`].
    pub(crate) fn for_event(self, event: &impl ToString) -> Self {
        match self {
            DataError::Io { path, source } => DataError::EventIo {
                event: event.to_string(),
                path,
                source,
            },
            other => other,
        }
    }

    /// Whether a retry could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, DataError::RemoteUnavailable { .. })
    }
}
