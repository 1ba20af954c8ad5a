//! Clough-Tocher C1 cubic interpolation over a Delaunay triangulation.

use super::delaunay::Triangulation;
use super::ScatteredInterpolator;
use crate::math::solvers::solve_2x2;
use crate::types::InterpolationError;

/// Bernstein control net of one macro triangle, split at its centroid.
///
/// Indices refer to the macro vertices 0, 1, 2. Sub-triangle `i` is
/// `(P_i, P_{i+1}, C)`.
#[derive(Debug, Clone)]
struct Patch {
    /// Data values at the vertices
    f: [f64; 3],
    /// `e[i][j]`: edge point next to vertex `i` towards vertex `j`
    e: [[f64; 3]; 3],
    /// Point next to vertex `i` towards the centroid
    a: [f64; 3],
    /// Interior point of edge `i -> i+1`, fixed by the normal derivative
    m: [f64; 3],
    /// Inner ring point on the segment from vertex `i` to the centroid
    s: [f64; 3],
    centre: f64,
}

/// Piecewise cubic, globally C1 interpolant of scattered data.
///
/// Each Delaunay triangle is split into three cubic Bezier patches meeting
/// at its centroid. Vertex gradients are estimated from the data by
/// inverse-distance weighted least squares over neighbouring vertices, and
/// normal derivatives vary linearly along every edge so that adjacent
/// triangles join smoothly. Linear data is reproduced exactly.
///
/// # Example
///
/// ```
/// use norm_core::math::triangulation::{CloughTocherInterpolator, ScatteredInterpolator};
///
/// let points = [[1.0, 80.0], [5.0, 80.0], [1.0, 120.0], [5.0, 120.0], [3.0, 100.0]];
/// let values = [0.25, 0.22, 0.21, 0.19, 0.215];
/// let ct = CloughTocherInterpolator::new(&points, &values).unwrap();
///
/// let v = ct.interpolate(3.0, 100.0).unwrap();
/// assert!((v - 0.215).abs() < 1e-12);
/// assert!(ct.interpolate(6.0, 100.0).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct CloughTocherInterpolator {
    tri: Triangulation,
    gradients: Vec<[f64; 2]>,
    patches: Vec<Patch>,
}

impl CloughTocherInterpolator {
    /// Build from scattered points and their values.
    ///
    /// # Returns
    ///
    /// * `Err(InterpolationError::InsufficientData)` - Fewer than 3 points
    /// * `Err(InterpolationError::InvalidInput)` - Length mismatch or non-finite data
    /// * `Err(InterpolationError::Degenerate)` - Duplicate or collinear points
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
        let gradients = estimate_gradients(&tri, values);
        let patches = tri
            .triangles()
            .iter()
            .map(|t| build_patch(&tri, values, &gradients, *t))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            tri,
            gradients,
            patches,
        })
    }

    /// Estimated gradient at each vertex, in the triangulation's local frame.
    pub fn gradients(&self) -> &[[f64; 2]] {
        &self.gradients
    }

    /// Underlying triangulation.
    pub fn triangulation(&self) -> &Triangulation {
        &self.tri
    }
}

impl ScatteredInterpolator for CloughTocherInterpolator {
    fn interpolate(&self, x: f64, y: f64) -> Result<f64, InterpolationError> {
        let (t, lambda) = self
            .tri
            .locate(x, y)
            .ok_or(InterpolationError::OutsideHull { x, y })?;
        Ok(evaluate_patch(&self.patches[t], lambda))
    }
}

fn sub(p: [f64; 2], q: [f64; 2]) -> [f64; 2] {
    [p[0] - q[0], p[1] - q[1]]
}

fn dot(g: [f64; 2], d: [f64; 2]) -> f64 {
    g[0] * d[0] + g[1] * d[1]
}

/// Gradient of the plane through a triangle, `None` if it is flat.
fn plane_gradient(p: [[f64; 2]; 3], f: [f64; 3]) -> Option<[f64; 2]> {
    let d1 = sub(p[1], p[0]);
    let d2 = sub(p[2], p[0]);
    solve_2x2([d1, d2], [f[1] - f[0], f[2] - f[0]])
}

fn estimate_gradients(tri: &Triangulation, values: &[f64]) -> Vec<[f64; 2]> {
    let pts = tri.points();
    let neighbours = tri.vertex_neighbours();

    neighbours
        .iter()
        .enumerate()
        .map(|(i, nb)| {
            // Weighted least squares: min sum w_j (f_j - f_i - g . d_j)^2, w_j = 1/|d_j|^2
            let mut m = [[0.0; 2]; 2];
            let mut rhs = [0.0; 2];
            for &j in nb {
                let d = sub(pts[j], pts[i]);
                let w = 1.0 / dot(d, d);
                let df = values[j] - values[i];
                m[0][0] += w * d[0] * d[0];
                m[0][1] += w * d[0] * d[1];
                m[1][1] += w * d[1] * d[1];
                rhs[0] += w * d[0] * df;
                rhs[1] += w * d[1] * df;
            }
            m[1][0] = m[0][1];
            solve_2x2(m, rhs).unwrap_or_else(|| incident_plane_average(tri, values, i))
        })
        .collect()
}

fn incident_plane_average(tri: &Triangulation, values: &[f64], vertex: usize) -> [f64; 2] {
    let pts = tri.points();
    let (sum, count) = tri
        .triangles()
        .iter()
        .filter(|t| t.contains(&vertex))
        .filter_map(|t| {
            plane_gradient(
                [pts[t[0]], pts[t[1]], pts[t[2]]],
                [values[t[0]], values[t[1]], values[t[2]]],
            )
        })
        .fold(([0.0, 0.0], 0usize), |(acc, n), g| {
            ([acc[0] + g[0], acc[1] + g[1]], n + 1)
        });
    if count == 0 {
        [0.0, 0.0]
    } else {
        [sum[0] / count as f64, sum[1] / count as f64]
    }
}

fn build_patch(
    tri: &Triangulation,
    values: &[f64],
    gradients: &[[f64; 2]],
    t: [usize; 3],
) -> Result<Patch, InterpolationError> {
    let pts = tri.points();
    let p = [pts[t[0]], pts[t[1]], pts[t[2]]];
    let g = [gradients[t[0]], gradients[t[1]], gradients[t[2]]];
    let f = [values[t[0]], values[t[1]], values[t[2]]];
    let c = [
        (p[0][0] + p[1][0] + p[2][0]) / 3.0,
        (p[0][1] + p[1][1] + p[2][1]) / 3.0,
    ];

    let mut e = [[0.0; 3]; 3];
    let mut a = [0.0; 3];
    for i in 0..3 {
        for j in 0..3 {
            if i != j {
                e[i][j] = f[i] + dot(g[i], sub(p[j], p[i])) / 3.0;
            }
        }
        a[i] = f[i] + dot(g[i], sub(c, p[i])) / 3.0;
    }

    // Edge interior points: make the cross-edge derivative along the edge
    // normal the linear blend of the vertex values.
    let mut m = [0.0; 3];
    for i in 0..3 {
        let j = (i + 1) % 3;
        let edge = sub(p[j], p[i]);
        let normal = [-edge[1], edge[0]];
        let [beta, gamma] = solve_2x2(
            [[edge[0], sub(c, p[i])[0]], [edge[1], sub(c, p[i])[1]]],
            normal,
        )
        .ok_or_else(|| InterpolationError::degenerate("flat triangle in Clough-Tocher split"))?;
        let alpha = -beta - gamma;
        let q0 = alpha * f[i] + beta * e[i][j] + gamma * a[i];
        let q2 = alpha * e[j][i] + beta * f[j] + gamma * a[j];
        m[i] = (0.5 * (q0 + q2) - alpha * e[i][j] - beta * e[j][i]) / gamma;
    }

    let mut s = [0.0; 3];
    for i in 0..3 {
        let k = (i + 2) % 3;
        s[i] = (a[i] + m[i] + m[k]) / 3.0;
    }
    let centre = (s[0] + s[1] + s[2]) / 3.0;

    Ok(Patch {
        f,
        e,
        a,
        m,
        s,
        centre,
    })
}

fn evaluate_patch(patch: &Patch, lambda: [f64; 3]) -> f64 {
    // The smallest macro coordinate names the vertex opposite the sub-triangle
    let k = (0..3)
        .min_by(|&u, &v| {
            lambda[u]
                .partial_cmp(&lambda[v])
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap_or(0);
    let i = (k + 1) % 3;
    let j = (k + 2) % 3;

    let al = lambda[i] - lambda[k];
    let be = lambda[j] - lambda[k];
    let ga = 3.0 * lambda[k];

    patch.f[i] * al.powi(3)
        + patch.f[j] * be.powi(3)
        + patch.centre * ga.powi(3)
        + 3.0 * patch.e[i][j] * al * al * be
        + 3.0 * patch.e[j][i] * al * be * be
        + 3.0 * patch.a[i] * al * al * ga
        + 3.0 * patch.a[j] * be * be * ga
        + 3.0 * patch.s[i] * al * ga * ga
        + 3.0 * patch.s[j] * be * ga * ga
        + 6.0 * patch.m[i] * al * be * ga
}
