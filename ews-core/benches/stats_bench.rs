//! Benchmarks for light-curve statistics.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ews_core::event::LightCurve;
use ews_core::stats::{reduced_chi_square_flat, Periodogram};

fn synthetic_curve(n: usize) -> LightCurve {
    let mut curve = LightCurve::default();
    for i in 0..n {
        let t = 2_456_000.0 + i as f64 * 0.7;
        let mag = 17.5 + 0.3 * (0.02 * (t - 2_450_000.0)).sin();
        curve.push(t, mag, 0.01 + 0.001 * (i % 5) as f64);
    }
    curve
}

fn bench_rcs(c: &mut Criterion) {
    let curve = synthetic_curve(5_000);
    c.bench_function("rcs_flat_5000", |b| {
        b.iter(|| reduced_chi_square_flat(black_box(&curve)))
    });
}

fn bench_periodogram(c: &mut Criterion) {
    let curve = synthetic_curve(500);
    c.bench_function("periodogram_500", |b| {
        b.iter(|| Periodogram::of(black_box(&curve)).map(|p| p.summary()))
    });
}

criterion_group!(benches, bench_rcs, bench_periodogram);
criterion_main!(benches);
