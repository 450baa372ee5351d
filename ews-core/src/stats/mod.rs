//! Light-curve statistics — pure functions over parsed event data.
//!
//! No dependencies on the grabber or the file formats.

pub mod chi_square;
pub mod model;
pub mod periodogram;

pub use chi_square::{reduced_chi_square, reduced_chi_square_flat, weighted_mean};
pub use model::PaczynskiModel;
pub use periodogram::{lomb_scargle, Periodogram, PeriodogramSummary};

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// Degrees of freedom would be zero or negative.
    #[error("{observations} observations leave no degrees of freedom after fitting {fitted}")]
    InsufficientData { observations: usize, fitted: usize },

    #[error("uncertainty at row {index} is {value}; must be positive and finite")]
    InvalidUncertainty { index: usize, value: f64 },

    #[error("time or magnitude at row {index} is not finite")]
    NonFiniteObservation { index: usize },

    #[error("sampling span of {days} days exceeds {max} days")]
    SpanTooWide { days: f64, max: f64 },

    #[error("parameter '{0}' is missing")]
    MissingParameter(String),
}
