//! Core interpolation trait and extrapolation policy.

use crate::types::InterpolationError;
use num_traits::Float;

/// Behaviour of an interpolator for queries outside its data domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Extrapolation {
    /// Reject the query with [`InterpolationError::OutOfBounds`].
    #[default]
    Error,
    /// Continue the boundary piece (segment, cubic or polynomial span) beyond the domain.
    Extend,
}

/// Common interface for 1D interpolators.
///
/// # Example
///
/// ```
/// use norm_core::math::interpolators::{Interpolator, LinearInterpolator};
///
/// let interp = LinearInterpolator::new(&[0.0, 1.0], &[0.0, 2.0]).unwrap();
/// assert_eq!(interp.domain(), (0.0, 1.0));
/// assert!(interp.interpolate(2.0).is_err());
/// ```
pub trait Interpolator<T: Float> {
    /// Interpolate the value at `x`.
    fn interpolate(&self, x: T) -> Result<T, InterpolationError>;

    /// Return the `(min, max)` range covered by the data.
    fn domain(&self) -> (T, T);
}

/// Returns `OutOfBounds` when `x` falls outside `[min, max]` and extrapolation is off.
pub(crate) fn check_domain<T: Float>(
    x: T,
    (min, max): (T, T),
    mode: Extrapolation,
) -> Result<(), InterpolationError> {
    if mode == Extrapolation::Error && (x < min || x > max) {
        return Err(InterpolationError::OutOfBounds {
            x: x.to_f64().unwrap_or(f64::NAN),
            min: min.to_f64().unwrap_or(f64::NAN),
            max: max.to_f64().unwrap_or(f64::NAN),
        });
    }
    Ok(())
}

/// Validates paired abscissae/ordinates: equal lengths, enough points, all
/// finite, strictly increasing abscissae.
pub(crate) fn validate_strictly_increasing<T: Float>(
    xs: &[T],
    ys: &[T],
    need: usize,
) -> Result<(), InterpolationError> {
    if xs.len() != ys.len() {
        return Err(InterpolationError::InvalidInput(format!(
            "xs and ys must have same length: got {} and {}",
            xs.len(),
            ys.len()
        )));
    }
    if xs.len() < need {
        return Err(InterpolationError::InsufficientData {
            got: xs.len(),
            need,
        });
    }
    if let Some(i) = xs
        .iter()
        .zip(ys)
        .position(|(x, y)| !x.is_finite() || !y.is_finite())
    {
        return Err(InterpolationError::InvalidInput(format!(
            "non-finite data point at index {}",
            i
        )));
    }
    if let Some(i) = xs.windows(2).position(|w| w[1] <= w[0]) {
        return Err(InterpolationError::NonMonotonicData { index: i + 1 });
    }
    Ok(())
}
