//! Scattered 2D interpolation over Delaunay triangulations.
//!
//! ## Available Interpolators
//!
//! - [`LinearTriInterpolator`]: Barycentric interpolation, C0
//! - [`CloughTocherInterpolator`]: Piecewise cubic Clough-Tocher, C1
//!
//! Both are defined only inside the convex hull of the data; queries outside
//! return [`InterpolationError::OutsideHull`] so callers can omit the cell.

mod clough_tocher;
mod delaunay;
mod linear;

pub use clough_tocher::CloughTocherInterpolator;
pub use delaunay::Triangulation;
pub use linear::LinearTriInterpolator;

use crate::types::InterpolationError;
use std::collections::BTreeMap;

/// Interpolation of a function of two variables from scattered samples.
pub trait ScatteredInterpolator {
    /// Interpolated value at `(x, y)`.
    fn interpolate(&self, x: f64, y: f64) -> Result<f64, InterpolationError>;
}

/// Collapse coincident points into one, averaging their values.
///
/// Output is ordered by `(x, y)`. Coordinates are compared exactly.
pub fn merge_duplicates(points: &[[f64; 2]], values: &[f64]) -> (Vec<[f64; 2]>, Vec<f64>) {
    let mut groups: BTreeMap<(u64, u64), ([f64; 2], f64, usize)> = BTreeMap::new();
    for (p, v) in points.iter().zip(values.iter()) {
        let key = (ordered_bits(p[0]), ordered_bits(p[1]));
        let entry = groups.entry(key).or_insert((*p, 0.0, 0));
        entry.1 += v;
        entry.2 += 1;
    }
    groups
        .into_values()
        .map(|(p, sum, n)| (p, sum / n as f64))
        .unzip()
}

/// Total-order key for a float so `BTreeMap` sorts numerically.
fn ordered_bits(v: f64) -> u64 {
    // -0.0 and 0.0 are the same coordinate
    let v = if v == 0.0 { 0.0 } else { v };
    let bits = v.to_bits();
    if bits >> 63 == 1 {
        !bits
    } else {
        bits | (1 << 63)
    }
}
