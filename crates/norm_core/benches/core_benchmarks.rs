//! Criterion benchmarks for norm_core interpolation methods.
//!
//! Measures curve fits on forward-curve sized inputs and the scattered
//! interpolants on volatility-surface sized clouds, evaluated over the
//! canonical grids.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use norm_core::market_data::{forward_grid, volatility_grid};
use norm_core::math::interpolators::{
    Extrapolation, Interpolator, LeastSquaresSpline, LinearInterpolator, MonotonicInterpolator,
};
use norm_core::math::triangulation::{
    CloughTocherInterpolator, LinearTriInterpolator, ScatteredInterpolator, Triangulation,
};

/// Forward-curve-like data: n maturities out to 12 years.
fn generate_curve(n: usize) -> (Vec<f64>, Vec<f64>) {
    let ts: Vec<f64> = (0..n).map(|i| 0.25 + 12.0 * i as f64 / (n - 1) as f64).collect();
    let fs: Vec<f64> = ts.iter().map(|&t| 100.0 * (0.02 * t).exp()).collect();
    (ts, fs)
}

/// Volatility cloud on a jittered tenor x strike lattice.
fn generate_cloud(nt: usize, nk: usize) -> (Vec<[f64; 2]>, Vec<f64>) {
    let mut points = Vec::with_capacity(nt * nk);
    let mut vols = Vec::with_capacity(nt * nk);
    for i in 0..nt {
        for j in 0..nk {
            let t = 0.5 + 11.0 * i as f64 / (nt - 1) as f64 + 0.01 * (j % 3) as f64;
            let k = 30.0 + 140.0 * j as f64 / (nk - 1) as f64 + 0.1 * (i % 2) as f64;
            points.push([t, k]);
            vols.push(0.2 + 0.05 * (-(t / 4.0)).exp() + 0.00002 * (k - 100.0).powi(2));
        }
    }
    (points, vols)
}

/// Benchmark the forward chain stages over the 1..10 year grid.
fn bench_forward_methods(c: &mut Criterion) {
    let mut group = c.benchmark_group("forward_methods");
    let grid = forward_grid();

    for size in [5, 20, 100] {
        let (ts, fs) = generate_curve(size);

        group.bench_with_input(BenchmarkId::new("spline", size), &(&ts, &fs), |b, (ts, fs)| {
            b.iter(|| {
                let spline = LeastSquaresSpline::with_default_knots(black_box(ts), black_box(fs))
                    .unwrap()
                    .with_extrapolation(Extrapolation::Extend);
                grid.iter().map(|&t| spline.interpolate(t).unwrap()).sum::<f64>()
            });
        });

        group.bench_with_input(BenchmarkId::new("monotone", size), &(&ts, &fs), |b, (ts, fs)| {
            b.iter(|| {
                let pchip = MonotonicInterpolator::new(black_box(ts), black_box(fs))
                    .unwrap()
                    .with_extrapolation(Extrapolation::Extend);
                grid.iter().map(|&t| pchip.interpolate(t).unwrap()).sum::<f64>()
            });
        });

        group.bench_with_input(BenchmarkId::new("linear", size), &(&ts, &fs), |b, (ts, fs)| {
            b.iter(|| {
                let linear = LinearInterpolator::new(black_box(ts), black_box(fs))
                    .unwrap()
                    .with_extrapolation(Extrapolation::Extend);
                grid.iter().map(|&t| linear.interpolate(t).unwrap()).sum::<f64>()
            });
        });
    }

    group.finish();
}

/// Benchmark triangulation and scattered evaluation over the volatility grid.
fn bench_surface_methods(c: &mut Criterion) {
    let mut group = c.benchmark_group("surface_methods");
    let cells = volatility_grid();

    for (nt, nk) in [(4, 5), (8, 10), (16, 20)] {
        let (points, vols) = generate_cloud(nt, nk);
        let label = nt * nk;

        group.bench_with_input(BenchmarkId::new("delaunay", label), &points, |b, points| {
            b.iter(|| Triangulation::new(black_box(points)).unwrap());
        });

        group.bench_with_input(
            BenchmarkId::new("clough_tocher", label),
            &(&points, &vols),
            |b, (points, vols)| {
                b.iter(|| {
                    let ct = CloughTocherInterpolator::new(black_box(points), black_box(vols)).unwrap();
                    cells
                        .iter()
                        .filter_map(|c| {
                            let [t, k] = c.coordinates();
                            ct.interpolate(t, k).ok()
                        })
                        .count()
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("linear_tri", label),
            &(&points, &vols),
            |b, (points, vols)| {
                b.iter(|| {
                    let lin = LinearTriInterpolator::new(black_box(points), black_box(vols)).unwrap();
                    cells
                        .iter()
                        .filter_map(|c| {
                            let [t, k] = c.coordinates();
                            lin.interpolate(t, k).ok()
                        })
                        .count()
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_forward_methods, bench_surface_methods);
criterion_main!(benches);
