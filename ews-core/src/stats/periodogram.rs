//! Lomb–Scargle periodogram of a light curve.
//!
//! Used to spot periodic variables and the yearly parallax signature among
//! microlensing candidates. Power is normalized by 2/Σy² and the input is not
//! mean-subtracted.

use super::StatsError;
use crate::event::LightCurve;
use serde::Serialize;
use std::f64::consts::PI;

/// Times are shifted by this before computing phases.
pub const TIME_OFFSET: f64 = 2_450_000.0;

const FREQ_MIN: f64 = 0.0001;
const FREQ_MAX: f64 = 0.03;
const FREQ_STEPS: usize = 10_000;

/// Peaks are searched above this angular frequency.
const PEAK_FREQ_FLOOR: f64 = 0.01;

/// Angular frequency of a one-year period, and the window around it.
const YEARLY_FREQ: f64 = 0.017;
const YEARLY_WINDOW: f64 = 0.00001;

/// Normalized Lomb–Scargle power of `y(x)` at each angular frequency.
pub fn lomb_scargle(x: &[f64], y: &[f64], freqs: &[f64]) -> Vec<f64> {
    let norm = 2.0 / y.iter().map(|v| v * v).sum::<f64>();

    freqs
        .iter()
        .map(|&w| {
            let (mut xc, mut xs, mut cc, mut ss, mut cs) = (0.0, 0.0, 0.0, 0.0, 0.0);
            for (&xj, &yj) in x.iter().zip(y) {
                let (s, c) = (w * xj).sin_cos();
                xc += yj * c;
                xs += yj * s;
                cc += c * c;
                ss += s * s;
                cs += c * s;
            }

            let tau = (2.0 * cs).atan2(cc - ss) / (2.0 * w);
            let (s_tau, c_tau) = (w * tau).sin_cos();
            let c2 = c_tau * c_tau;
            let s2 = s_tau * s_tau;
            let cs_tau = 2.0 * c_tau * s_tau;

            let p = 0.5
                * ((c_tau * xc + s_tau * xs).powi(2) / (c2 * cc + cs_tau * cs + s2 * ss)
                    + (c_tau * xs - s_tau * xc).powi(2) / (c2 * ss - cs_tau * cs + s2 * cc));
            p * norm
        })
        .collect()
}

/// Periodogram over the fixed angular-frequency grid.
#[derive(Debug, Clone, Serialize)]
pub struct Periodogram {
    pub freq: Vec<f64>,
    pub power: Vec<f64>,
}

/// Scalar features of a periodogram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodogramSummary {
    /// Highest power above the peak-search floor.
    pub max_power: f64,
    /// Angular frequency of the global maximum.
    pub freq_at_max: f64,
    /// 2π / `freq_at_max`, in days.
    pub parallax_period: f64,
    /// Mean power in a narrow window around the yearly frequency.
    pub yearly_power: f64,
    /// `yearly_power / max_power`.
    pub yearly_power_norm: f64,
    /// Full width at half maximum of the main peak; 0 when a side is open.
    pub fwhm: f64,
}

impl Periodogram {
    /// Compute the periodogram of a light curve's magnitudes.
    pub fn of(curve: &LightCurve) -> Result<Self, StatsError> {
        if curve.len() < 2 {
            return Err(StatsError::InsufficientData {
                observations: curve.len(),
                fitted: 1,
            });
        }
        let t: Vec<f64> = curve.t().iter().map(|t| t - TIME_OFFSET).collect();
        let step = (FREQ_MAX - FREQ_MIN) / (FREQ_STEPS - 1) as f64;
        let freq: Vec<f64> = (0..FREQ_STEPS).map(|k| FREQ_MIN + k as f64 * step).collect();
        let power = lomb_scargle(&t, curve.mag(), &freq);
        Ok(Self { freq, power })
    }

    pub fn summary(&self) -> PeriodogramSummary {
        let max_power = self
            .freq
            .iter()
            .zip(&self.power)
            .filter(|(f, _)| **f > PEAK_FREQ_FLOOR)
            .map(|(_, p)| *p)
            .fold(f64::NAN, f64::max);

        let global_max = self.power.iter().copied().fold(f64::NAN, f64::max);
        let freq_at_max = self
            .power
            .iter()
            .position(|p| *p == global_max)
            .map_or(f64::NAN, |i| self.freq[i]);

        let yearly: Vec<f64> = self
            .freq
            .iter()
            .zip(&self.power)
            .filter(|(f, _)| (**f - YEARLY_FREQ).abs() < YEARLY_WINDOW)
            .map(|(_, p)| *p)
            .collect();
        let yearly_power = if yearly.is_empty() {
            f64::NAN
        } else {
            yearly.iter().sum::<f64>() / yearly.len() as f64
        };

        PeriodogramSummary {
            max_power,
            freq_at_max,
            parallax_period: 2.0 * PI / freq_at_max,
            yearly_power,
            yearly_power_norm: yearly_power / max_power,
            fwhm: self.fwhm(max_power),
        }
    }

    /// Width between the half-maximum crossings on either side of `peak`.
    fn fwhm(&self, peak: f64) -> f64 {
        let Some(i) = self.power.iter().position(|p| *p == peak) else {
            return 0.0;
        };
        let half = peak / 2.0;
        let p = &self.power;

        let lower = (1..=i)
            .rev()
            .find(|&j| p[j] >= half && p[j - 1] < half)
            .map(|j| self.freq[j - 1]);
        let higher = (i..p.len() - 1)
            .find(|&j| p[j] >= half && p[j + 1] < half)
            .map(|j| self.freq[j + 1]);

        match (lower, higher) {
            (Some(lo), Some(hi)) => hi - lo,
            _ => 0.0,
        }
    }
}
