//! Parser for `phot.dat` and the light-curve type.
//!
//! One observation per line, whitespace-separated numeric columns
//! `time magnitude error [...]`; columns past the third are ignored.

use super::params::ParseError;
use serde::Serialize;

/// Magnitudes at or above this are survey placeholders, not measurements.
pub const PLACEHOLDER_MAG: f64 = 25.0;

/// Time series of I-band magnitudes in file row order.
///
/// The three columns always have equal length; index `i` across them is one
/// observation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LightCurve {
    t: Vec<f64>,
    #[serde(rename = "I")]
    mag: Vec<f64>,
    #[serde(rename = "Ierr")]
    mag_err: Vec<f64>,
}

/// Options for post-processing photometry before statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DataOptions {
    /// Drop placeholder rows (`I >= 25`) and apply the `sigma_min` correction.
    pub cleanse: bool,
    /// Systematic floor added in quadrature to every uncertainty.
    pub sigma_min: f64,
}

impl Default for DataOptions {
    fn default() -> Self {
        Self::raw()
    }
}

impl DataOptions {
    /// File contents as-is.
    pub fn raw() -> Self {
        Self {
            cleanse: false,
            sigma_min: 0.0,
        }
    }

    pub fn cleansed(sigma_min: f64) -> Self {
        Self {
            cleanse: true,
            sigma_min,
        }
    }
}

impl LightCurve {
    /// `None` unless all three columns have the same length.
    pub fn new(t: Vec<f64>, mag: Vec<f64>, mag_err: Vec<f64>) -> Option<Self> {
        (t.len() == mag.len() && mag.len() == mag_err.len()).then_some(Self { t, mag, mag_err })
    }

    pub fn push(&mut self, t: f64, mag: f64, mag_err: f64) {
        self.t.push(t);
        self.mag.push(mag);
        self.mag_err.push(mag_err);
    }

    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    pub fn t(&self) -> &[f64] {
        &self.t
    }

    /// I-band magnitudes.
    pub fn mag(&self) -> &[f64] {
        &self.mag
    }

    pub fn mag_err(&self) -> &[f64] {
        &self.mag_err
    }

    /// `(t, I, Ierr)` per observation.
    pub fn observations(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.t
            .iter()
            .zip(&self.mag)
            .zip(&self.mag_err)
            .map(|((&t, &m), &e)| (t, m, e))
    }

    /// Earliest and latest observation time.
    pub fn time_span(&self) -> Option<(f64, f64)> {
        let min = self.t.iter().copied().reduce(f64::min)?;
        let max = self.t.iter().copied().reduce(f64::max)?;
        Some((min, max))
    }

    /// Drop placeholder rows and add `sigma_min` to each error in quadrature.
    pub fn cleansed(&self, sigma_min: f64) -> Self {
        let mut out = Self::default();
        for (t, m, e) in self.observations().filter(|(_, m, _)| *m < PLACEHOLDER_MAG) {
            out.push(t, m, e.hypot(sigma_min));
        }
        out
    }

    pub fn apply(&self, options: DataOptions) -> Self {
        if options.cleanse {
            self.cleansed(options.sigma_min)
        } else {
            self.clone()
        }
    }

    /// Parse the contents of a `phot.dat` file.
    ///
    /// Blank lines and `#` comments are skipped.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut curve = Self::default();

        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let line_no = i + 1;

            let mut cols = line.split_whitespace();
            let mut next = |name: &str| -> Result<f64, ParseError> {
                let token = cols.next().ok_or_else(|| {
                    ParseError::new(line_no, format!("missing {name} column"))
                })?;
                match token.parse::<f64>() {
                    Ok(v) if v.is_finite() => Ok(v),
                    _ => Err(ParseError::new(
                        line_no,
                        format!("{name} '{token}' is not a finite number"),
                    )),
                }
            };
            let t = next("time")?;
            let mag = next("magnitude")?;
            let err = next("error")?;
            curve.push(t, mag, err);
        }

        Ok(curve)
    }
}
