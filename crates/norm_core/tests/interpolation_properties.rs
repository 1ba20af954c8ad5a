//! Property-based tests for interpolator invariants.

use norm_core::math::interpolators::{Interpolator, LinearInterpolator, MonotonicInterpolator};
use norm_core::math::triangulation::{LinearTriInterpolator, ScatteredInterpolator};
use proptest::prelude::*;

/// Strictly increasing abscissae with non-decreasing ordinates.
fn increasing_data() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    prop::collection::vec((0.05..3.0f64, 0.0..5.0f64), 2..12).prop_map(|steps| {
        let mut x = 0.1;
        let mut y = 100.0;
        let mut xs = Vec::with_capacity(steps.len());
        let mut ys = Vec::with_capacity(steps.len());
        for (dx, dy) in steps {
            xs.push(x);
            ys.push(y);
            x += dx;
            y += dy;
        }
        (xs, ys)
    })
}

fn arbitrary_data() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    prop::collection::vec((0.05..3.0f64, -50.0..50.0f64), 2..12).prop_map(|steps| {
        let mut x = 0.0;
        let mut xs = Vec::with_capacity(steps.len());
        let mut ys = Vec::with_capacity(steps.len());
        for (dx, y) in steps {
            x += dx;
            xs.push(x);
            ys.push(y);
        }
        (xs, ys)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn test_monotone_data_gives_monotone_interpolant((xs, ys) in increasing_data()) {
        let pchip = MonotonicInterpolator::new(&xs, &ys).unwrap();
        let (lo, hi) = pchip.domain();
        let mut prev = pchip.interpolate(lo).unwrap();
        for i in 1..=400 {
            let x = lo + (hi - lo) * i as f64 / 400.0;
            let y = pchip.interpolate(x.min(hi)).unwrap();
            prop_assert!(y >= prev - 1e-9, "decrease at x={}: {} -> {}", x, prev, y);
            prev = y;
        }
    }

    #[test]
    fn test_monotone_stays_within_neighbouring_nodes((xs, ys) in arbitrary_data()) {
        let pchip = MonotonicInterpolator::new(&xs, &ys).unwrap();
        for k in 0..xs.len() - 1 {
            let (lo, hi) = (ys[k].min(ys[k + 1]), ys[k].max(ys[k + 1]));
            for s in 1..10 {
                let x = xs[k] + (xs[k + 1] - xs[k]) * s as f64 / 10.0;
                let y = pchip.interpolate(x).unwrap();
                prop_assert!(y >= lo - 1e-9 && y <= hi + 1e-9, "overshoot {} outside [{}, {}]", y, lo, hi);
            }
        }
    }

    #[test]
    fn test_interpolators_reproduce_nodes((xs, ys) in arbitrary_data()) {
        let linear = LinearInterpolator::new(&xs, &ys).unwrap();
        let pchip = MonotonicInterpolator::new(&xs, &ys).unwrap();
        for (x, y) in xs.iter().zip(ys.iter()) {
            prop_assert!((linear.interpolate(*x).unwrap() - y).abs() < 1e-9);
            prop_assert!((pchip.interpolate(*x).unwrap() - y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_linear_triangulation_is_convex_combination(
        cloud in prop::collection::vec((1.0..10.0f64, 40.0..160.0f64, 0.05..0.8f64), 4..15),
        queries in prop::collection::vec((1.0..10.0f64, 40.0..160.0f64), 1..20),
    ) {
        let points: Vec<[f64; 2]> = cloud.iter().map(|&(t, k, _)| [t, k]).collect();
        let values: Vec<f64> = cloud.iter().map(|&(_, _, v)| v).collect();
        let interp = LinearTriInterpolator::new(&points, &values);
        prop_assume!(interp.is_ok());
        let interp = interp.unwrap();

        let lo = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let hi = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        for (x, y) in queries {
            if let Ok(v) = interp.interpolate(x, y) {
                prop_assert!(v >= lo - 1e-9 && v <= hi + 1e-9, "{} outside [{}, {}]", v, lo, hi);
            }
        }
    }
}
