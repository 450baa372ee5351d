//! Property tests for path resolution and light-curve statistics.
//!
//! Uses proptest to verify:
//! 1. Path resolution is deterministic and injective in the event number
//! 2. Reduced chi-square is non-negative and zero for a constant curve
//! 3. The weighted mean lies within the range of the data

use ews_core::data::{relative_path, DataKind, EventId};
use ews_core::event::LightCurve;
use ews_core::stats::{reduced_chi_square_flat, weighted_mean};
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_year() -> impl Strategy<Value = i32> {
    prop_oneof![1998..=2000, 2002..=2009, 2011..=2025, 1990..=1997]
}

fn arb_field() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["blg", "lmc", "smc", "BLG", "Lmc"]).prop_map(str::to_string)
}

fn arb_kind() -> impl Strategy<Value = DataKind> {
    prop::sample::select(DataKind::ALL.to_vec())
}

fn arb_curve() -> impl Strategy<Value = LightCurve> {
    prop::collection::vec((12.0..21.0_f64, 0.001..0.5_f64), 2..60).prop_map(|rows| {
        let t = (0..rows.len()).map(|i| 2_458_000.0 + i as f64).collect();
        let (mag, err) = rows.into_iter().unzip();
        LightCurve::new(t, mag, err).unwrap()
    })
}

// ── 1. Path resolution ───────────────────────────────────────────────

proptest! {
    #[test]
    fn path_is_deterministic(
        year in arb_year(),
        field in arb_field(),
        n in 1u32..100_000,
        kind in arb_kind(),
    ) {
        let a = EventId::new(year, &field, n).unwrap();
        let b = EventId::new(year, &field, n).unwrap();
        prop_assert_eq!(relative_path(&a, kind), relative_path(&b, kind));
    }

    #[test]
    fn path_is_injective_in_number(
        year in arb_year(),
        field in arb_field(),
        n in 1u32..100_000,
        m in 1u32..100_000,
        kind in arb_kind(),
    ) {
        prop_assume!(n != m);
        let a = EventId::new(year, &field, n).unwrap();
        let b = EventId::new(year, &field, m).unwrap();
        prop_assert_ne!(relative_path(&a, kind), relative_path(&b, kind));
    }

    #[test]
    fn path_starts_with_year(year in arb_year(), n in 1u32..10_000) {
        let id = EventId::bulge(year, n).unwrap();
        let path = relative_path(&id, DataKind::Params);
        let prefix = format!("{year}/blg-");
        prop_assert!(path.starts_with(&prefix));
    }
}

// ── 2. Reduced chi-square ────────────────────────────────────────────

proptest! {
    #[test]
    fn rcs_is_non_negative(curve in arb_curve()) {
        let rcs = reduced_chi_square_flat(&curve).unwrap();
        prop_assert!(rcs >= 0.0);
        prop_assert!(rcs.is_finite());
    }

    #[test]
    fn constant_curve_rcs_is_zero(
        mag in 12.0..21.0_f64,
        err in 0.001..0.5_f64,
        n in 2usize..50,
    ) {
        let t = (0..n).map(|i| i as f64).collect();
        let curve = LightCurve::new(t, vec![mag; n], vec![err; n]).unwrap();
        prop_assert_eq!(reduced_chi_square_flat(&curve).unwrap(), 0.0);
    }

    // ── 3. Weighted mean ─────────────────────────────────────────────

    #[test]
    fn weighted_mean_is_bounded(curve in arb_curve()) {
        let mu = weighted_mean(curve.mag(), curve.mag_err()).unwrap();
        let lo = curve.mag().iter().copied().fold(f64::INFINITY, f64::min);
        let hi = curve.mag().iter().copied().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(mu >= lo - 1e-9 && mu <= hi + 1e-9);
    }
}
