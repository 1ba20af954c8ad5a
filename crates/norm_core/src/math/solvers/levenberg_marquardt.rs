//! Levenberg-Marquardt nonlinear least-squares solver.
//!
//! # Algorithm
//!
//! Each iteration solves the damped normal equations
//!
//! ```text
//! (J^T J + λI) δ = -J^T r
//! p_{n+1} = p_n + δ
//! ```
//!
//! with a forward-difference Jacobian `J`. Steps that reduce the residual sum
//! of squares are accepted and shrink `λ`; rejected steps grow it. Steps whose
//! residuals are not finite are always rejected, so a model that overflows in
//! some region of parameter space simply pushes the solver back.
//!
//! # Example
//!
//! ```
//! use norm_core::math::solvers::{LevenbergMarquardtSolver, LMConfig};
//!
//! // Fit F(T) = a * exp(b * T) to a forward curve
//! let ts = [1.0, 2.0, 3.0, 5.0];
//! let fs: Vec<f64> = ts.iter().map(|t: &f64| 100.0 * (0.03 * t).exp()).collect();
//!
//! let residuals = |p: &[f64]| -> Vec<f64> {
//!     ts.iter().zip(&fs).map(|(t, f)| p[0] * (p[1] * t).exp() - f).collect()
//! };
//!
//! let solver = LevenbergMarquardtSolver::new(LMConfig::default());
//! let result = solver.solve(residuals, vec![90.0, 0.0]).unwrap();
//! assert!(result.converged);
//! assert!((result.params[1] - 0.03).abs() < 1e-6);
//! ```

use super::linear_algebra::solve_cholesky;
use crate::types::SolverError;

/// Configuration for Levenberg-Marquardt solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LMConfig {
    /// Convergence tolerance on the residual norm and on its relative decrease.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: usize,
    /// Initial damping factor.
    pub initial_lambda: f64,
    /// Factor to increase lambda on rejected step.
    pub lambda_up: f64,
    /// Factor to decrease lambda on accepted step.
    pub lambda_down: f64,
    /// Minimum damping factor.
    pub min_lambda: f64,
    /// Maximum damping factor. Reaching it ends the search.
    pub max_lambda: f64,
    /// Tolerance for relative parameter change convergence.
    pub param_tolerance: f64,
}

impl Default for LMConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-12,
            max_iterations: 200,
            initial_lambda: 1e-3,
            lambda_up: 10.0,
            lambda_down: 0.1,
            min_lambda: 1e-12,
            max_lambda: 1e12,
            param_tolerance: 1e-12,
        }
    }
}

impl LMConfig {
    /// Create a configuration with the given tolerance and iteration cap.
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
            ..Default::default()
        }
    }
}

/// Result of Levenberg-Marquardt optimisation.
#[derive(Debug, Clone, PartialEq)]
pub struct LMResult {
    /// Final optimised parameters.
    pub params: Vec<f64>,
    /// Final residual sum of squares.
    pub residual_ss: f64,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether convergence was achieved.
    pub converged: bool,
}

impl LMResult {
    /// Root mean square error over `n_observations` residuals.
    pub fn rmse(&self, n_observations: usize) -> f64 {
        if n_observations == 0 {
            return 0.0;
        }
        (self.residual_ss / n_observations as f64).sqrt()
    }
}

/// Levenberg-Marquardt nonlinear least-squares solver.
///
/// Solves `min_p ||r(p)||²` for a residual function `r`. Works in `f64`.
#[derive(Debug, Clone, Default)]
pub struct LevenbergMarquardtSolver {
    config: LMConfig,
}

impl LevenbergMarquardtSolver {
    /// Create a new LM solver with the given configuration.
    pub fn new(config: LMConfig) -> Self {
        Self { config }
    }

    /// Get the solver configuration.
    pub fn config(&self) -> &LMConfig {
        &self.config
    }

    /// Solve the nonlinear least-squares problem.
    ///
    /// # Returns
    ///
    /// * `Ok(LMResult)` - Final parameters; check `converged` before trusting them
    /// * `Err(SolverError::NumericalInstability)` - Empty input or non-finite start
    pub fn solve<F>(&self, residuals: F, initial_params: Vec<f64>) -> Result<LMResult, SolverError>
    where
        F: Fn(&[f64]) -> Vec<f64>,
    {
        let n_params = initial_params.len();
        if n_params == 0 {
            return Err(SolverError::NumericalInstability(
                "Empty parameter vector".to_string(),
            ));
        }

        let mut params = initial_params;
        let mut lambda = self.config.initial_lambda;

        let mut r = residuals(&params);
        if r.is_empty() {
            return Err(SolverError::NumericalInstability(
                "Empty residual vector".to_string(),
            ));
        }
        let mut ss = sum_of_squares(&r);
        if !ss.is_finite() {
            return Err(SolverError::NumericalInstability(
                "Non-finite residuals at initial parameters".to_string(),
            ));
        }

        let done = |params: Vec<f64>, ss: f64, iterations: usize, converged: bool| LMResult {
            params,
            residual_ss: ss,
            iterations,
            converged,
        };

        for iteration in 0..self.config.max_iterations {
            if ss.sqrt() < self.config.tolerance {
                return Ok(done(params, ss, iteration, true));
            }

            let jacobian = compute_jacobian(&residuals, &params, &r);
            let delta = match solve_normal_equations(&jacobian, &r, lambda, n_params) {
                Some(d) => d,
                None => {
                    lambda *= self.config.lambda_up;
                    if lambda > self.config.max_lambda {
                        return Ok(done(params, ss, iteration, false));
                    }
                    continue;
                }
            };

            let step = delta.iter().map(|d| d * d).sum::<f64>().sqrt();
            let scale = params.iter().map(|p| p * p).sum::<f64>().sqrt().max(1.0);
            if step / scale < self.config.param_tolerance {
                return Ok(done(params, ss, iteration, true));
            }

            let trial: Vec<f64> = params.iter().zip(&delta).map(|(p, d)| p + d).collect();
            let trial_r = residuals(&trial);
            let trial_ss = sum_of_squares(&trial_r);

            if trial_ss.is_finite() && trial_ss < ss {
                let improvement = (ss - trial_ss) / ss.max(f64::MIN_POSITIVE);
                params = trial;
                r = trial_r;
                ss = trial_ss;
                lambda = (lambda * self.config.lambda_down).max(self.config.min_lambda);
                if improvement < self.config.tolerance {
                    return Ok(done(params, ss, iteration + 1, true));
                }
            } else {
                lambda *= self.config.lambda_up;
                if lambda > self.config.max_lambda {
                    // No downhill step exists at any damping: stationary point
                    return Ok(done(params, ss, iteration + 1, true));
                }
            }
        }

        Ok(done(params, ss, self.config.max_iterations, false))
    }
}

/// Solve the damped normal equations `(J^T J + λ diag) δ = -J^T r`.
fn solve_normal_equations(
    jacobian: &[Vec<f64>],
    residuals: &[f64],
    lambda: f64,
    n_params: usize,
) -> Option<Vec<f64>> {
    let mut jtj = vec![vec![0.0; n_params]; n_params];
    let mut jtr = vec![0.0; n_params];
    for (row, r) in jacobian.iter().zip(residuals) {
        for i in 0..n_params {
            jtr[i] -= row[i] * r;
            for j in 0..n_params {
                jtj[i][j] += row[i] * row[j];
            }
        }
    }
    for (i, row) in jtj.iter_mut().enumerate() {
        // Marquardt scaling keeps the step invariant to parameter units
        row[i] += lambda * row[i].max(1e-12);
    }
    solve_cholesky(&jtj, &jtr)
}

/// Forward-difference Jacobian; rows are residuals, columns parameters.
fn compute_jacobian<F>(residuals: &F, params: &[f64], r0: &[f64]) -> Vec<Vec<f64>>
where
    F: Fn(&[f64]) -> Vec<f64>,
{
    let eps = 1e-8;
    let mut jacobian = vec![vec![0.0; params.len()]; r0.len()];
    let mut shifted = params.to_vec();
    for j in 0..params.len() {
        let h = eps * params[j].abs().max(1.0);
        shifted[j] = params[j] + h;
        let r_plus = residuals(&shifted);
        shifted[j] = params[j];
        for (i, row) in jacobian.iter_mut().enumerate() {
            row[j] = (r_plus[i] - r0[i]) / h;
        }
    }
    jacobian
}

#[inline]
fn sum_of_squares(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum()
}
