//! Least-squares cubic B-spline.

use super::traits::{check_domain, validate_strictly_increasing, Extrapolation, Interpolator};
use crate::math::solvers::solve_cholesky;
use crate::types::InterpolationError;

const DEGREE: usize = 3;

/// Cubic B-spline fitted by least squares on a fixed interior knot set.
///
/// The knot vector is clamped: the first and last data abscissae are
/// repeated `DEGREE + 1` times around the interior knots. Coefficients
/// minimise `Σ (s(x_i) - y_i)²`; the normal equations are solved by
/// Cholesky factorisation. Knots that violate the Schoenberg-Whitney
/// condition, or a singular system, are reported as
/// [`InterpolationError::Degenerate`].
///
/// With [`Extrapolation::Extend`] the polynomial pieces of the first and
/// last knot spans are continued beyond the data.
///
/// # Example
///
/// ```
/// use norm_core::math::interpolators::{Interpolator, LeastSquaresSpline};
///
/// let xs = [0.5, 1.0, 2.0, 3.0, 5.0, 7.0];
/// let ys: Vec<f64> = xs.iter().map(|x| 100.0 + 2.0 * x).collect();
///
/// let spline = LeastSquaresSpline::with_default_knots(&xs, &ys).unwrap();
/// assert_eq!(spline.interior_knots().len(), 2);
/// assert!((spline.interpolate(4.0).unwrap() - 108.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct LeastSquaresSpline {
    /// Full clamped knot vector
    knots: Vec<f64>,
    coefficients: Vec<f64>,
    extrapolation: Extrapolation,
}

impl LeastSquaresSpline {
    /// Minimum number of data points for a cubic fit.
    pub const MIN_POINTS: usize = DEGREE + 1;

    /// Interior knots used by [`with_default_knots`](Self::with_default_knots).
    ///
    /// `n - 4` knots spread evenly over `[xs[1], xs[n - 2]]`, endpoints
    /// included; a single knot sits at the midpoint. This gives as many
    /// coefficients as data points while keeping every knot span supported
    /// by data.
    pub fn default_interior_knots(xs: &[f64]) -> Vec<f64> {
        let n = xs.len();
        if n <= Self::MIN_POINTS {
            return Vec::new();
        }
        let m = n - Self::MIN_POINTS;
        let (lo, hi) = (xs[1], xs[n - 2]);
        if m == 1 {
            return vec![0.5 * (lo + hi)];
        }
        (0..m)
            .map(|j| lo + (hi - lo) * j as f64 / (m - 1) as f64)
            .collect()
    }

    /// Fit with [`default_interior_knots`](Self::default_interior_knots).
    pub fn with_default_knots(xs: &[f64], ys: &[f64]) -> Result<Self, InterpolationError> {
        validate_strictly_increasing(xs, ys, Self::MIN_POINTS)?;
        Self::fit(xs, ys, &Self::default_interior_knots(xs))
    }

    /// Fit the spline to strictly increasing `xs` with the given interior knots.
    pub fn fit(xs: &[f64], ys: &[f64], interior: &[f64]) -> Result<Self, InterpolationError> {
        validate_strictly_increasing(xs, ys, Self::MIN_POINTS)?;
        let n = xs.len();
        let (x_min, x_max) = (xs[0], xs[n - 1]);

        if interior.windows(2).any(|w| w[1] <= w[0]) {
            return Err(InterpolationError::InvalidInput(
                "interior knots must be strictly increasing".to_string(),
            ));
        }
        if interior.iter().any(|&t| !(t > x_min && t < x_max)) {
            return Err(InterpolationError::InvalidInput(format!(
                "interior knots must lie strictly inside ({}, {})",
                x_min, x_max
            )));
        }

        let mut knots = Vec::with_capacity(interior.len() + 2 * (DEGREE + 1));
        knots.extend(std::iter::repeat(x_min).take(DEGREE + 1));
        knots.extend_from_slice(interior);
        knots.extend(std::iter::repeat(x_max).take(DEGREE + 1));

        let n_coef = interior.len() + DEGREE + 1;
        if n_coef > n {
            return Err(InterpolationError::InsufficientData {
                got: n,
                need: n_coef,
            });
        }
        if !schoenberg_whitney(xs, &knots, n_coef) {
            return Err(InterpolationError::degenerate(
                "knots violate the Schoenberg-Whitney condition",
            ));
        }

        // Normal equations B^T B c = B^T y
        let mut btb = vec![vec![0.0; n_coef]; n_coef];
        let mut bty = vec![0.0; n_coef];
        for (&x, &y) in xs.iter().zip(ys) {
            let span = find_span(&knots, n_coef, x);
            let basis = basis_functions(&knots, span, x);
            for r in 0..=DEGREE {
                let i = span - DEGREE + r;
                bty[i] += basis[r] * y;
                for s in 0..=DEGREE {
                    btb[i][span - DEGREE + s] += basis[r] * basis[s];
                }
            }
        }

        let coefficients = solve_cholesky(&btb, &bty)
            .ok_or_else(|| InterpolationError::degenerate("singular B-spline normal equations"))?;

        Ok(Self {
            knots,
            coefficients,
            extrapolation: Extrapolation::Error,
        })
    }

    /// Set the behaviour outside the data domain.
    pub fn with_extrapolation(mut self, extrapolation: Extrapolation) -> Self {
        self.extrapolation = extrapolation;
        self
    }

    /// Interior knots of the fitted spline.
    pub fn interior_knots(&self) -> &[f64] {
        &self.knots[DEGREE + 1..self.knots.len() - DEGREE - 1]
    }

    /// B-spline coefficients.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }
}

impl Interpolator<f64> for LeastSquaresSpline {
    fn interpolate(&self, x: f64) -> Result<f64, InterpolationError> {
        check_domain(x, self.domain(), self.extrapolation)?;
        let n_coef = self.coefficients.len();
        let span = find_span(&self.knots, n_coef, x);
        let basis = basis_functions(&self.knots, span, x);
        Ok((0..=DEGREE)
            .map(|r| basis[r] * self.coefficients[span - DEGREE + r])
            .sum())
    }

    fn domain(&self) -> (f64, f64) {
        (self.knots[0], self.knots[self.knots.len() - 1])
    }
}

/// Knot span index `l` in `[DEGREE, n_coef - 1]` with `t[l] <= x < t[l + 1]`.
///
/// Queries outside the knot range are clamped to the boundary spans.
fn find_span(knots: &[f64], n_coef: usize, x: f64) -> usize {
    knots
        .partition_point(|&t| t <= x)
        .saturating_sub(1)
        .clamp(DEGREE, n_coef - 1)
}

/// Non-zero cubic basis functions on `span` at `x` (Cox-de Boor triangle).
///
/// Entry `r` is the value of basis function `span - DEGREE + r`. For `x`
/// outside the span the result is the polynomial continuation of that span.
fn basis_functions(knots: &[f64], span: usize, x: f64) -> [f64; DEGREE + 1] {
    let mut n = [0.0; DEGREE + 1];
    let mut left = [0.0; DEGREE + 1];
    let mut right = [0.0; DEGREE + 1];
    n[0] = 1.0;
    for j in 1..=DEGREE {
        left[j] = x - knots[span + 1 - j];
        right[j] = knots[span + j] - x;
        let mut saved = 0.0;
        for r in 0..j {
            let temp = n[r] / (right[r + 1] + left[j - r]);
            n[r] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        n[j] = saved;
    }
    n
}

/// Greedy check that each basis function can be matched to a distinct data
/// point inside its support.
fn schoenberg_whitney(xs: &[f64], knots: &[f64], n_coef: usize) -> bool {
    let (first, last) = (knots[0], knots[knots.len() - 1]);
    let mut i = 0;
    for j in 0..n_coef {
        let (lo, hi) = (knots[j], knots[j + DEGREE + 1]);
        while i < xs.len() && !(xs[i] > lo || (lo == first && xs[i] >= lo)) {
            i += 1;
        }
        if i == xs.len() {
            return false;
        }
        if !(xs[i] < hi || (hi == last && xs[i] <= hi)) {
            return false;
        }
        i += 1;
    }
    true
}
