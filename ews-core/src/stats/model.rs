//! Point-source point-lens (Paczyński) light-curve model with blending.

use super::StatsError;
use crate::event::EventParameters;
use serde::Serialize;

/// Model grid spacing: one hour, in days.
const SAMPLE_STEP_DAYS: f64 = 1.0 / 24.0;

/// Widest span `sample` will grid, in days (about 55 years).
pub const MAX_SAMPLE_SPAN_DAYS: f64 = 20_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PaczynskiModel {
    /// Baseline I-band magnitude.
    pub i_bl: f64,
    /// Impact parameter in Einstein radii.
    pub umin: f64,
    /// Einstein timescale (days).
    pub t_e: f64,
    /// Time of maximum magnification (HJD).
    pub t0: f64,
    /// Blending fraction, clamped to [0, 1].
    pub fbl: f64,
}

impl PaczynskiModel {
    pub fn new(i_bl: f64, umin: f64, t_e: f64, t0: f64, fbl: f64) -> Self {
        Self {
            i_bl,
            umin,
            t_e,
            t0,
            fbl: fbl.clamp(0.0, 1.0),
        }
    }

    /// Build from the `I_bl`, `umin`, `tau`, `Tmax` and `fbl` parameters.
    pub fn from_params(params: &EventParameters) -> Result<Self, StatsError> {
        let get = |name: &str| {
            params
                .get(name)
                .ok_or_else(|| StatsError::MissingParameter(name.to_string()))
        };
        Ok(Self::new(
            get("I_bl")?,
            get("umin")?,
            get("tau")?,
            get("Tmax")?,
            get("fbl")?,
        ))
    }

    /// Blended magnification at time `t`.
    pub fn magnification(&self, t: f64) -> f64 {
        let tau = (t - self.t0) / self.t_e;
        let u2 = self.umin * self.umin + tau * tau;
        let a = (u2 + 2.0) / (u2.sqrt() * (u2 + 4.0).sqrt());
        (a - 1.0) * self.fbl + 1.0
    }

    /// I-band magnitude at time `t`.
    pub fn magnitude(&self, t: f64) -> f64 {
        -2.5 * self.magnification(t).log10() + self.i_bl
    }

    /// Model on an hourly grid from the day of `t_min` through the day of `t_max`.
    ///
    /// Spans wider than [`MAX_SAMPLE_SPAN_DAYS`] are rejected.
    pub fn sample(&self, t_min: f64, t_max: f64) -> Result<(Vec<f64>, Vec<f64>), StatsError> {
        let first = t_min.floor();
        let last = t_max.floor();
        if !(first.is_finite() && last.is_finite()) || last < first {
            return Ok((Vec::new(), Vec::new()));
        }
        let days = last + 1.0 - first;
        if days > MAX_SAMPLE_SPAN_DAYS {
            return Err(StatsError::SpanTooWide {
                days,
                max: MAX_SAMPLE_SPAN_DAYS,
            });
        }
        let steps = ((last + 1.0 - first) * 24.0).round() as usize;
        let t: Vec<f64> = (0..steps)
            .map(|k| first + k as f64 * SAMPLE_STEP_DAYS)
            .collect();
        let mag = t.iter().map(|&x| self.magnitude(x)).collect();
        Ok((t, mag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_far_from_peak() {
        let m = PaczynskiModel::new(18.0, 0.1, 20.0, 2_458_000.0, 1.0);
        assert!((m.magnitude(2_458_000.0 + 10_000.0) - 18.0).abs() < 1e-6);
    }

    #[test]
    fn peak_is_brightest() {
        let m = PaczynskiModel::new(18.0, 0.1, 20.0, 2_458_000.0, 1.0);
        let peak = m.magnitude(2_458_000.0);
        assert!(peak < m.magnitude(2_458_005.0));
        assert!(peak < m.magnitude(2_457_995.0));
        // A(u=0.1) ≈ 10.04
        assert!((m.magnification(2_458_000.0) - 10.037).abs() < 1e-3);
    }

    #[test]
    fn fully_blended_source_is_flat() {
        let m = PaczynskiModel::new(18.0, 0.1, 20.0, 0.0, -0.5);
        assert_eq!(m.fbl, 0.0);
        assert_eq!(m.magnitude(0.0), 18.0);
    }

    #[test]
    fn blending_fraction_is_clamped_above() {
        assert_eq!(PaczynskiModel::new(18.0, 0.1, 20.0, 0.0, 1.7).fbl, 1.0);
    }

    #[test]
    fn hourly_sampling_covers_whole_days() {
        let m = PaczynskiModel::new(18.0, 0.1, 20.0, 10.0, 1.0);
        let (t, mag) = m.sample(10.3, 11.9).unwrap();
        assert_eq!(t.len(), 48);
        assert_eq!(mag.len(), 48);
        assert_eq!(t[0], 10.0);
        assert!((t[47] - (12.0 - 1.0 / 24.0)).abs() < 1e-9);
    }

    #[test]
    fn oversized_span_is_rejected() {
        let m = PaczynskiModel::new(18.0, 0.1, 20.0, 10.0, 1.0);
        assert!(matches!(
            m.sample(0.0, 1.0e12),
            Err(StatsError::SpanTooWide { .. })
        ));
        let (t, _) = m.sample(5.0, 4.0).unwrap();
        assert!(t.is_empty());
    }
}
