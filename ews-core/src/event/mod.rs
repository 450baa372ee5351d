//! Event model: one alert's identity, its parsed data products, and the
//! statistics derived from them.
//!
//! Parameters are parsed once and cached on the event; photometry is re-read
//! on every call so externally refreshed files are picked up.

pub mod params;
pub mod photometry;

pub use params::{EventHeader, EventParameters, Measurement, ParseError};
pub use photometry::{DataOptions, LightCurve};

use crate::data::{relative_path, DataError, DataKind, EventId, FileGrabber};
use crate::stats::{self, PaczynskiModel, Periodogram, StatsError};
use std::sync::{Arc, OnceLock};

/// Parameters fitted by the point-lens model (I_bl, umin, tau, Tmax, fbl).
pub const MODEL_DOF: usize = 5;

pub struct Event {
    id: EventId,
    grabber: Arc<FileGrabber>,
    options: DataOptions,
    /// Per-event cache; never shared and never invalidated.
    params: OnceLock<EventParameters>,
}

impl Event {
    /// Event backed by a shared grabber.
    pub fn new(id: EventId, grabber: Arc<FileGrabber>) -> Self {
        Self {
            id,
            grabber,
            options: DataOptions::default(),
            params: OnceLock::new(),
        }
    }

    /// Event backed by an offline grabber over `OGLEDATADIR`.
    pub fn from_env(id: EventId) -> Result<Self, DataError> {
        Ok(Self::new(id, Arc::new(FileGrabber::offline_from_env()?)))
    }

    /// Photometry post-processing used by the statistics methods.
    pub fn with_options(mut self, options: DataOptions) -> Self {
        self.options = options;
        self
    }

    pub fn id(&self) -> &EventId {
        &self.id
    }

    /// Survey label, e.g. `OGLE-2019-BLG-0001`.
    pub fn title(&self) -> String {
        self.id.to_string()
    }

    pub fn grabber(&self) -> &FileGrabber {
        &self.grabber
    }

    pub fn options(&self) -> DataOptions {
        self.options
    }

    /// Parsed parameter file; loaded on first access and cached afterwards.
    pub fn params(&self) -> Result<&EventParameters, DataError> {
        if let Some(params) = self.params.get() {
            return Ok(params);
        }
        let (path, text) = self.load_text(DataKind::Params)?;
        let parsed = EventParameters::parse(&text).map_err(|e| self.parse_error(path, e))?;
        Ok(self.params.get_or_init(|| parsed))
    }

    /// Whether [`params`](Self::params) has been loaded yet.
    pub fn params_loaded(&self) -> bool {
        self.params.get().is_some()
    }

    /// Photometry exactly as stored. Re-read on every call.
    pub fn data(&self) -> Result<LightCurve, DataError> {
        let (path, text) = self.load_text(DataKind::Photometry)?;
        LightCurve::parse(&text).map_err(|e| self.parse_error(path, e))
    }

    pub fn data_with(&self, options: DataOptions) -> Result<LightCurve, DataError> {
        Ok(self.data()?.apply(options))
    }

    /// Reduced chi-square against a constant weighted-mean magnitude.
    ///
    /// Raises `InsufficientData` for one or zero observations.
    pub fn rcs(&self) -> Result<f64, DataError> {
        self.rcs_of(&self.data_with(self.options)?)
    }

    /// [`rcs`](Self::rcs) over an already loaded curve.
    pub fn rcs_of(&self, curve: &LightCurve) -> Result<f64, DataError> {
        stats::reduced_chi_square_flat(curve).map_err(|e| self.stats_error(e))
    }

    /// Point-lens model from the fitted parameters.
    pub fn model(&self) -> Result<PaczynskiModel, DataError> {
        PaczynskiModel::from_params(self.params()?).map_err(|e| self.stats_error(e))
    }

    /// Reduced chi-square against the point-lens model with `fitted`
    /// parameters (usually [`MODEL_DOF`]).
    pub fn model_rcs(&self, fitted: usize) -> Result<f64, DataError> {
        let model = self.model()?;
        let curve = self.data_with(self.options)?;
        self.model_rcs_with(&model, &curve, fitted)
    }

    /// [`model_rcs`](Self::model_rcs) over an already loaded curve.
    pub fn model_rcs_of(&self, curve: &LightCurve, fitted: usize) -> Result<f64, DataError> {
        let model = self.model()?;
        self.model_rcs_with(&model, curve, fitted)
    }

    pub fn periodogram(&self) -> Result<Periodogram, DataError> {
        self.periodogram_of(&self.data_with(self.options)?)
    }

    pub fn periodogram_of(&self, curve: &LightCurve) -> Result<Periodogram, DataError> {
        Periodogram::of(curve).map_err(|e| self.stats_error(e))
    }

    fn model_rcs_with(
        &self,
        model: &PaczynskiModel,
        curve: &LightCurve,
        fitted: usize,
    ) -> Result<f64, DataError> {
        stats::reduced_chi_square(curve, |t| model.magnitude(t), fitted)
            .map_err(|e| self.stats_error(e))
    }

    fn load_text(&self, kind: DataKind) -> Result<(String, String), DataError> {
        let path = relative_path(&self.id, kind);
        let bytes = self.grabber.load(&self.id, kind)?;
        match String::from_utf8(bytes) {
            Ok(text) => Ok((path, text)),
            Err(e) => {
                let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
                let line = valid.iter().filter(|b| **b == b'\n').count() + 1;
                Err(self.parse_error(path, ParseError::new(line, "invalid UTF-8")))
            }
        }
    }

    fn parse_error(&self, path: String, e: ParseError) -> DataError {
        DataError::Parse {
            event: self.id.to_string(),
            path,
            line: e.line,
            reason: e.reason,
        }
    }

    fn stats_error(&self, source: StatsError) -> DataError {
        DataError::Statistics {
            event: self.id.to_string(),
            source,
        }
    }
}
