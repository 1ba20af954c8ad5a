//! Monotone piecewise cubic Hermite interpolation (PCHIP).

use super::traits::{check_domain, validate_strictly_increasing, Extrapolation, Interpolator};
use crate::types::InterpolationError;
use num_traits::Float;

/// Fritsch-Carlson monotonicity-preserving cubic interpolator.
///
/// Node slopes are weighted harmonic means of the adjacent secant slopes,
/// set to zero at local extrema, so the interpolant never overshoots the
/// data between nodes. End slopes use the one-sided three-point formula
/// with the usual sign and magnitude limiter. With two points both slopes
/// equal the chord and the interpolant is a straight line.
///
/// With [`Extrapolation::Extend`] the boundary cubics are evaluated beyond
/// the data, so shape preservation only holds inside the domain.
///
/// # Example
///
/// ```
/// use norm_core::math::interpolators::{Interpolator, MonotonicInterpolator};
///
/// let xs: [f64; 4] = [1.0, 2.0, 3.0, 5.0];
/// let ys = [100.0, 101.0, 101.0, 104.0];
/// let pchip = MonotonicInterpolator::new(&xs, &ys).unwrap();
///
/// // Flat section stays flat: no overshoot between equal neighbours
/// let y = pchip.interpolate(2.5).unwrap();
/// assert!((y - 101.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct MonotonicInterpolator<T: Float> {
    xs: Vec<T>,
    ys: Vec<T>,
    /// Derivative at each node
    slopes: Vec<T>,
    extrapolation: Extrapolation,
}

impl<T: Float> MonotonicInterpolator<T> {
    /// Construct from strictly increasing abscissae.
    ///
    /// # Returns
    ///
    /// * `Err(InterpolationError::InsufficientData)` - Fewer than 2 points
    /// * `Err(InterpolationError::NonMonotonicData)` - Abscissae not strictly increasing
    /// * `Err(InterpolationError::InvalidInput)` - Length mismatch or non-finite values
    pub fn new(xs: &[T], ys: &[T]) -> Result<Self, InterpolationError> {
        validate_strictly_increasing(xs, ys, 2)?;
        let slopes = pchip_slopes(xs, ys);
        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            slopes,
            extrapolation: Extrapolation::Error,
        })
    }

    /// Set the behaviour outside the data domain.
    pub fn with_extrapolation(mut self, extrapolation: Extrapolation) -> Self {
        self.extrapolation = extrapolation;
        self
    }

    /// Node derivatives chosen by the Fritsch-Carlson rule.
    pub fn slopes(&self) -> &[T] {
        &self.slopes
    }

    #[inline]
    fn find_segment(&self, x: T) -> usize {
        let pos = self.xs.partition_point(|&xi| xi <= x);
        pos.saturating_sub(1).min(self.xs.len() - 2)
    }
}

impl<T: Float> Interpolator<T> for MonotonicInterpolator<T> {
    fn interpolate(&self, x: T) -> Result<T, InterpolationError> {
        check_domain(x, self.domain(), self.extrapolation)?;
        let i = self.find_segment(x);
        Ok(hermite(
            self.xs[i],
            self.xs[i + 1],
            self.ys[i],
            self.ys[i + 1],
            self.slopes[i],
            self.slopes[i + 1],
            x,
        ))
    }

    #[inline]
    fn domain(&self) -> (T, T) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }
}

/// Three-valued sign: zero maps to zero, unlike `Float::signum`.
#[inline]
fn sign<T: Float>(v: T) -> T {
    if v > T::zero() {
        T::one()
    } else if v < T::zero() {
        -T::one()
    } else {
        T::zero()
    }
}

fn pchip_slopes<T: Float>(x: &[T], y: &[T]) -> Vec<T> {
    let n = x.len();
    let two = T::one() + T::one();
    let three = two + T::one();

    if n == 2 {
        let m = (y[1] - y[0]) / (x[1] - x[0]);
        return vec![m, m];
    }

    let h: Vec<T> = x.windows(2).map(|w| w[1] - w[0]).collect();
    let delta: Vec<T> = (0..n - 1).map(|i| (y[i + 1] - y[i]) / h[i]).collect();

    let mut d = vec![T::zero(); n];
    for k in 1..n - 1 {
        if delta[k - 1] * delta[k] <= T::zero() {
            continue;
        }
        let w1 = two * h[k] + h[k - 1];
        let w2 = h[k] + two * h[k - 1];
        d[k] = (w1 + w2) / (w1 / delta[k - 1] + w2 / delta[k]);
    }

    let edge = |h0: T, h1: T, m0: T, m1: T| -> T {
        let d = ((two * h0 + h1) * m0 - h0 * m1) / (h0 + h1);
        if sign(d) != sign(m0) {
            T::zero()
        } else if sign(m0) != sign(m1) && d.abs() > three * m0.abs() {
            three * m0
        } else {
            d
        }
    };
    d[0] = edge(h[0], h[1], delta[0], delta[1]);
    d[n - 1] = edge(h[n - 2], h[n - 3], delta[n - 2], delta[n - 3]);
    d
}

#[inline]
fn hermite<T: Float>(x0: T, x1: T, y0: T, y1: T, m0: T, m1: T, xq: T) -> T {
    let two = T::one() + T::one();
    let three = two + T::one();
    let h = x1 - x0;
    let s = (xq - x0) / h;
    let s2 = s * s;
    let s3 = s2 * s;

    let h00 = two * s3 - three * s2 + T::one();
    let h10 = s3 - two * s2 + s;
    let h01 = three * s2 - two * s3;
    let h11 = s3 - s2;

    h00 * y0 + h10 * h * m0 + h01 * y1 + h11 * h * m1
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // ========================================
    // Construction Tests
    // ========================================

    #[test]
    fn test_requires_two_points() {
        let result = MonotonicInterpolator::new(&[1.0], &[1.0]);
        assert!(matches!(
            result,
            Err(InterpolationError::InsufficientData { got: 1, need: 2 })
        ));
    }

    #[test]
    fn test_rejects_unsorted_abscissae() {
        let result = MonotonicInterpolator::new(&[1.0, 3.0, 2.0], &[1.0, 2.0, 3.0]);
        assert!(matches!(
            result,
            Err(InterpolationError::NonMonotonicData { index: 2 })
        ));
    }

    // ========================================
    // Slope Tests
    // ========================================

    #[test]
    fn test_two_points_is_the_chord() {
        let pchip = MonotonicInterpolator::new(&[1.0, 3.0], &[10.0, 14.0]).unwrap();
        assert_eq!(pchip.slopes(), &[2.0, 2.0]);
        assert_relative_eq!(pchip.interpolate(2.0).unwrap(), 12.0, epsilon = 1e-12);
    }

    #[test]
    fn test_local_extremum_gets_zero_slope() {
        let pchip = MonotonicInterpolator::new(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0]).unwrap();
        assert_eq!(pchip.slopes()[1], 0.0);
    }

    #[test]
    fn test_linear_data_reproduced_exactly() {
        let xs = [1.0, 2.0, 4.0, 7.0];
        let ys: Vec<f64> = xs.iter().map(|x| 3.0 * x + 1.0).collect();
        let pchip = MonotonicInterpolator::new(&xs, &ys).unwrap();
        for s in pchip.slopes() {
            assert_relative_eq!(*s, 3.0, epsilon = 1e-12);
        }
        assert_relative_eq!(pchip.interpolate(5.5).unwrap(), 17.5, epsilon = 1e-12);
    }

    #[test]
    fn test_end_slope_limited_to_zero_on_sign_change() {
        // Steep rise then decline: one-sided estimate at the right end flips sign
        let pchip = MonotonicInterpolator::new(&[0.0, 1.0, 2.0], &[0.0, 10.0, 9.0]).unwrap();
        let d = pchip.slopes();
        // ((2*1 + 1) * -1 - 1 * 10) / 2 = -6.5, sign agrees with -1 but |d| > 3 -> clipped
        assert_relative_eq!(d[2], -3.0, epsilon = 1e-12);
    }

    // ========================================
    // Evaluation Tests
    // ========================================

    #[test]
    fn test_passes_through_nodes() {
        let xs = [0.5, 1.0, 2.0, 5.0, 10.0];
        let ys = [100.0, 100.8, 102.1, 105.0, 111.0];
        let pchip = MonotonicInterpolator::new(&xs, &ys).unwrap();
        for (x, y) in xs.iter().zip(ys.iter()) {
            assert_relative_eq!(pchip.interpolate(*x).unwrap(), *y, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_no_overshoot_on_step_data() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [0.0, 0.0, 1.0, 1.0];
        let pchip = MonotonicInterpolator::new(&xs, &ys).unwrap();
        for i in 0..=300 {
            let y = pchip.interpolate(i as f64 / 100.0).unwrap();
            assert!((-1e-12..=1.0 + 1e-12).contains(&y), "overshoot {}", y);
        }
    }

    #[test]
    fn test_out_of_bounds_without_extrapolation() {
        let pchip = MonotonicInterpolator::new(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]).unwrap();
        assert!(matches!(
            pchip.interpolate(3.5),
            Err(InterpolationError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_extrapolation_uses_boundary_cubic() {
        let xs = [1.0, 2.0, 3.0];
        let ys = [1.0, 4.0, 9.0];
        let pchip = MonotonicInterpolator::new(&xs, &ys)
            .unwrap()
            .with_extrapolation(Extrapolation::Extend);
        let d = pchip.slopes().to_vec();
        let expected = hermite(2.0, 3.0, 4.0, 9.0, d[1], d[2], 4.0);
        assert_relative_eq!(pchip.interpolate(4.0).unwrap(), expected, epsilon = 1e-12);
    }
}
