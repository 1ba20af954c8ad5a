//! Interpolation methods for curve normalisation.
//!
//! ## Available Interpolators
//!
//! - [`LinearInterpolator`]: Piecewise linear interpolation between data points
//! - [`MonotonicInterpolator`]: Fritsch-Carlson monotonicity-preserving cubic (PCHIP)
//! - [`LeastSquaresSpline`]: Cubic B-spline fitted by least squares on fixed knots
//!
//! ## Core Trait
//!
//! All interpolators implement the [`Interpolator`] trait, which defines:
//! - `interpolate(x: T) -> Result<T, InterpolationError>`: Compute interpolated value
//! - `domain() -> (T, T)`: Return the range covered by the data
//!
//! Queries outside the domain fail unless the interpolator was built with
//! [`Extrapolation::Extend`].
//!
//! ## Example
//!
//! ```
//! use norm_core::math::interpolators::{Extrapolation, Interpolator, LinearInterpolator};
//!
//! let xs: [f64; 3] = [1.0, 2.0, 5.0];
//! let ys = [100.0, 102.0, 104.0];
//!
//! let interp = LinearInterpolator::new(&xs, &ys).unwrap();
//! assert!((interp.interpolate(3.5).unwrap() - 103.0).abs() < 1e-10);
//! assert!(interp.interpolate(10.0).is_err());
//!
//! let extended = interp.with_extrapolation(Extrapolation::Extend);
//! assert!(extended.interpolate(10.0).is_ok());
//! ```

mod bspline;
mod linear;
mod monotonic;
mod traits;

// Re-export public types at module level
pub use bspline::LeastSquaresSpline;
pub use linear::LinearInterpolator;
pub use monotonic::MonotonicInterpolator;
pub use traits::{Extrapolation, Interpolator};
