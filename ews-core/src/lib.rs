//! EWS Core — retrieval, caching and analysis of early-warning microlensing
//! event data.
//!
//! - Path convention shared by the local data directory and the archive
//! - File grabber with a local-first, remote-fallback load policy
//! - Parsers for the parameter and photometry files
//! - Light-curve statistics (reduced chi-square, point-lens model, periodogram)

pub mod config;
pub mod data;
pub mod event;
pub mod stats;

pub use config::GrabberConfig;
pub use data::{DataError, DataKind, EventId, FileGrabber};
pub use event::{Event, EventParameters, LightCurve};
