//! Reduced chi-square of a light curve against a model.
//!
//! Degenerate inputs raise rather than return NaN: a curve with no degrees of
//! freedom left is `InsufficientData`, a non-positive or non-finite
//! uncertainty is `InvalidUncertainty`, a non-finite time or magnitude is
//! `NonFiniteObservation`.

use super::StatsError;
use crate::event::LightCurve;

fn check_observations(curve: &LightCurve) -> Result<(), StatsError> {
    match curve
        .observations()
        .enumerate()
        .find(|(_, (t, mag, _))| !(t.is_finite() && mag.is_finite()))
    {
        Some((index, _)) => Err(StatsError::NonFiniteObservation { index }),
        None => check_uncertainties(curve.mag_err()),
    }
}

fn check_uncertainties(errors: &[f64]) -> Result<(), StatsError> {
    match errors
        .iter()
        .enumerate()
        .find(|(_, e)| !(e.is_finite() && **e > 0.0))
    {
        Some((index, &value)) => Err(StatsError::InvalidUncertainty { index, value }),
        None => Ok(()),
    }
}

/// Inverse-variance weighted mean: Σ(xᵢ/σᵢ²) / Σ(1/σᵢ²).
pub fn weighted_mean(values: &[f64], errors: &[f64]) -> Result<f64, StatsError> {
    if values.is_empty() {
        return Err(StatsError::InsufficientData {
            observations: 0,
            fitted: 0,
        });
    }
    check_uncertainties(errors)?;

    // Accumulate offsets from the first value so a constant series yields
    // exactly that constant.
    let origin = values[0];
    let (num, den) = values
        .iter()
        .zip(errors)
        .fold((0.0, 0.0), |(num, den), (x, e)| {
            let w = 1.0 / (e * e);
            (num + w * (x - origin), den + w)
        });
    Ok(origin + num / den)
}

/// Reduced chi-square against a flat model at the weighted mean magnitude.
///
/// χ² = Σ((Iᵢ − μ)/σᵢ)², divided by N − 1.
pub fn reduced_chi_square_flat(curve: &LightCurve) -> Result<f64, StatsError> {
    let n = curve.len();
    if n <= 1 {
        return Err(StatsError::InsufficientData {
            observations: n,
            fitted: 1,
        });
    }
    check_observations(curve)?;
    let mu = weighted_mean(curve.mag(), curve.mag_err())?;
    reduced_chi_square(curve, |_| mu, 1)
}

/// Reduced chi-square against `model(t)`, divided by N − `fitted`.
pub fn reduced_chi_square(
    curve: &LightCurve,
    model: impl Fn(f64) -> f64,
    fitted: usize,
) -> Result<f64, StatsError> {
    let n = curve.len();
    if n <= fitted {
        return Err(StatsError::InsufficientData {
            observations: n,
            fitted,
        });
    }
    check_observations(curve)?;

    let chi2: f64 = curve
        .observations()
        .map(|(t, mag, err)| {
            let r = (mag - model(t)) / err;
            r * r
        })
        .sum();
    Ok(chi2 / (n - fitted) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve(mag: &[f64], err: &[f64]) -> LightCurve {
        let t = (0..mag.len()).map(|i| i as f64).collect();
        LightCurve::new(t, mag.to_vec(), err.to_vec()).unwrap()
    }

    #[test]
    fn constant_curve_has_zero_rcs() {
        let c = curve(&[17.2; 5], &[0.01; 5]);
        assert_eq!(reduced_chi_square_flat(&c).unwrap(), 0.0);
    }

    #[test]
    fn known_scatter() {
        // mean 1.0, residuals ±1 with sigma 1 → χ² = 2, N − 1 = 1
        let c = curve(&[0.0, 2.0], &[1.0, 1.0]);
        assert!((reduced_chi_square_flat(&c).unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn weighted_mean_favours_precise_points() {
        let mu = weighted_mean(&[10.0, 20.0], &[1.0, 2.0]).unwrap();
        // weights 1 and 1/4
        assert!((mu - 12.0).abs() < 1e-12);
    }

    #[test]
    fn single_observation_raises() {
        let c = curve(&[17.0], &[0.1]);
        assert_eq!(
            reduced_chi_square_flat(&c),
            Err(StatsError::InsufficientData {
                observations: 1,
                fitted: 1
            })
        );
    }

    #[test]
    fn empty_curve_raises() {
        let c = curve(&[], &[]);
        assert!(matches!(
            reduced_chi_square_flat(&c),
            Err(StatsError::InsufficientData { observations: 0, .. })
        ));
    }

    #[test]
    fn zero_uncertainty_raises() {
        let c = curve(&[17.0, 17.1, 17.2], &[0.1, 0.0, 0.1]);
        assert_eq!(
            reduced_chi_square_flat(&c),
            Err(StatsError::InvalidUncertainty {
                index: 1,
                value: 0.0
            })
        );
    }

    #[test]
    fn non_finite_magnitude_raises() {
        let c = curve(&[f64::NAN, 17.0, 17.1], &[0.1; 3]);
        assert_eq!(
            reduced_chi_square_flat(&c),
            Err(StatsError::NonFiniteObservation { index: 0 })
        );
        let c = curve(&[17.0, f64::INFINITY, 17.1], &[0.1; 3]);
        assert_eq!(
            reduced_chi_square(&c, |_| 17.0, 1),
            Err(StatsError::NonFiniteObservation { index: 1 })
        );
    }

    #[test]
    fn model_dof_is_subtracted() {
        let c = curve(&[1.0, 1.0, 1.0, 3.0], &[1.0; 4]);
        // model ≡ 1 → χ² = 4, N − 2 = 2
        let rcs = reduced_chi_square(&c, |_| 1.0, 2).unwrap();
        assert!((rcs - 2.0).abs() < 1e-12);
        assert!(reduced_chi_square(&c, |_| 1.0, 4).is_err());
    }
}
