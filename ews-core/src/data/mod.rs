//! Data access: path convention, local store, remote sources, file grabber.

pub mod error;
pub mod grabber;
pub mod http;
pub mod paths;
pub mod source;
pub mod store;

pub use error::DataError;
pub use grabber::{FileGrabber, SaveSummary, SavedFile};
pub use http::HttpSource;
pub use paths::{relative_path, DataKind, EventId, SurveyPhase, DEFAULT_FIELD};
pub use source::{RemoteError, RemoteSource};
pub use store::{EventMeta, FileMeta, LocalStore};
