//! Piecewise linear interpolation over a Delaunay triangulation.

use super::delaunay::Triangulation;
use super::ScatteredInterpolator;
use crate::types::InterpolationError;

/// Barycentric interpolation of the triangle containing the query.
///
/// Continuous, not differentiable across edges. Queries outside the convex
/// hull of the data fail with [`InterpolationError::OutsideHull`].
#[derive(Debug, Clone)]
pub struct LinearTriInterpolator {
    tri: Triangulation,
    values: Vec<f64>,
}

impl LinearTriInterpolator {
    /// Build from scattered points and their values.
    ///
    /// Duplicate points are rejected here; use
    /// [`merge_duplicates`](super::merge_duplicates) first to average them.
    pub fn new(points: &[[f64; 2]], values: &[f64]) -> Result<Self, InterpolationError> {
        if points.len() != values.len() {
            return Err(InterpolationError::InvalidInput(format!(
                "points and values length mismatch: {} vs {}",
                points.len(),
                values.len()
            )));
        }
        if let Some(i) = values.iter().position(|v| !v.is_finite()) {
            return Err(InterpolationError::InvalidInput(format!(
                "non-finite value at index {}",
                i
            )));
        }
        let tri = Triangulation::new(points)?;
        Ok(Self {
            tri,
            values: values.to_vec(),
        })
    }

    /// Underlying triangulation.
    pub fn triangulation(&self) -> &Triangulation {
        &self.tri
    }
}

impl ScatteredInterpolator for LinearTriInterpolator {
    fn interpolate(&self, x: f64, y: f64) -> Result<f64, InterpolationError> {
        let (t, l) = self
            .tri
            .locate(x, y)
            .ok_or(InterpolationError::OutsideHull { x, y })?;
        let v = self.tri.triangles()[t];
        Ok(l[0] * self.values[v[0]] + l[1] * self.values[v[1]] + l[2] * self.values[v[2]])
    }
}
