//! Least-squares solvers and small dense linear algebra.
//!
//! ## Available Solvers
//!
//! - [`LevenbergMarquardtSolver`]: Nonlinear least squares, used for parametric curve fits
//! - [`solve_cholesky`]: Symmetric positive definite systems (normal equations)
//! - [`solve_2x2`]: Closed-form 2x2 systems (gradient estimation, barycentric geometry)
//!
//! ## Example
//!
//! ```
//! use norm_core::math::solvers::{LevenbergMarquardtSolver, LMConfig};
//!
//! // Minimise (p[0] - 2)² + (p[1] - 3)²
//! let residuals = |params: &[f64]| -> Vec<f64> {
//!     vec![params[0] - 2.0, params[1] - 3.0]
//! };
//!
//! let solver = LevenbergMarquardtSolver::new(LMConfig::default());
//! let result = solver.solve(residuals, vec![0.0, 0.0]).unwrap();
//! assert!(result.converged);
//! ```

mod levenberg_marquardt;
mod linear_algebra;

pub use levenberg_marquardt::{LMConfig, LMResult, LevenbergMarquardtSolver};
pub use linear_algebra::{solve_2x2, solve_cholesky};
