//! Exponential least-squares forward fit.
//!
//! Fits `F(T) = a * exp(b * T)` to the whole curve by Levenberg-Marquardt,
//! starting from the ordinary least-squares line through `(T, ln F)`.

use super::forward::CurveModel;
use super::{FitMethod, FittedModel};
use norm_core::market_data::ForwardCurve;
use norm_core::math::interpolators::Interpolator;
use norm_core::math::solvers::{LMConfig, LevenbergMarquardtSolver};
use norm_core::types::InterpolationError;

/// Fitted `a * exp(b * T)`, defined for every `T`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialCurve {
    /// Level
    pub a: f64,
    /// Continuous growth rate
    pub b: f64,
    t_min: f64,
    t_max: f64,
}

impl Interpolator<f64> for ExponentialCurve {
    fn interpolate(&self, x: f64) -> Result<f64, InterpolationError> {
        Ok(self.a * (self.b * x).exp())
    }

    fn domain(&self) -> (f64, f64) {
        (self.t_min, self.t_max)
    }
}

/// Exponential fit stage. Needs at least 3 maturities and positive prices.
#[derive(Debug, Clone, Default)]
pub struct ParametricMethod {
    config: LMConfig,
}

impl ParametricMethod {
    /// Minimum number of maturities.
    pub const MIN_POINTS: usize = 3;

    /// Method with a custom solver configuration.
    pub fn with_config(config: LMConfig) -> Self {
        Self { config }
    }

    /// Fit the exponential to `curve`.
    pub fn fit_curve(&self, curve: &ForwardCurve) -> Result<ExponentialCurve, InterpolationError> {
        if curve.len() < Self::MIN_POINTS {
            return Err(InterpolationError::InsufficientData {
                got: curve.len(),
                need: Self::MIN_POINTS,
            });
        }
        let ts = curve.maturities();
        let fs = curve.prices();
        let initial = log_linear_guess(ts, fs)?;

        let residuals = |p: &[f64]| -> Vec<f64> {
            ts.iter()
                .zip(fs)
                .map(|(t, f)| p[0] * (p[1] * t).exp() - f)
                .collect()
        };
        let result = LevenbergMarquardtSolver::new(self.config)
            .solve(residuals, initial.to_vec())
            .map_err(|e| InterpolationError::degenerate(e.to_string()))?;

        if !result.converged {
            return Err(InterpolationError::degenerate(format!(
                "exponential fit did not converge after {} iterations",
                result.iterations
            )));
        }
        let (a, b) = (result.params[0], result.params[1]);
        if !a.is_finite() || !b.is_finite() {
            return Err(InterpolationError::degenerate("non-finite exponential parameters"));
        }
        Ok(ExponentialCurve {
            a,
            b,
            t_min: ts[0],
            t_max: ts[ts.len() - 1],
        })
    }
}

impl FitMethod<ForwardCurve, f64> for ParametricMethod {
    fn name(&self) -> &'static str {
        "parametric"
    }

    fn fit(&self, curve: &ForwardCurve) -> Result<Box<dyn FittedModel<f64> + '_>, InterpolationError> {
        Ok(Box::new(CurveModel(self.fit_curve(curve)?)))
    }
}

/// `[a, b]` from the least-squares line `ln F = ln a + b T`.
fn log_linear_guess(ts: &[f64], fs: &[f64]) -> Result<[f64; 2], InterpolationError> {
    if fs.iter().any(|&f| f <= 0.0) {
        return Err(InterpolationError::degenerate(
            "exponential fit needs positive prices",
        ));
    }
    let n = ts.len() as f64;
    let logs: Vec<f64> = fs.iter().map(|f| f.ln()).collect();
    let t_mean = ts.iter().sum::<f64>() / n;
    let l_mean = logs.iter().sum::<f64>() / n;

    let sxx: f64 = ts.iter().map(|t| (t - t_mean).powi(2)).sum();
    let sxy: f64 = ts
        .iter()
        .zip(&logs)
        .map(|(t, l)| (t - t_mean) * (l - l_mean))
        .sum();
    // Distinct maturities make sxx positive
    let b = sxy / sxx;
    let a = (l_mean - b * t_mean).exp();
    Ok([a, b])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use norm_core::market_data::CurvePoint;

    fn curve(points: &[(f64, f64)]) -> ForwardCurve {
        ForwardCurve::from_points(points.iter().map(|&(t, p)| CurvePoint::new(t, p))).unwrap()
    }

    #[test]
    fn test_recovers_exact_exponential() {
        let points: Vec<(f64, f64)> = [0.5_f64, 1.0, 2.0, 3.0, 5.0]
            .iter()
            .map(|&t| (t, 100.0 * (0.03 * t).exp()))
            .collect();
        let fit = ParametricMethod::default().fit_curve(&curve(&points)).unwrap();

        assert_relative_eq!(fit.a, 100.0, epsilon = 1e-6);
        assert_relative_eq!(fit.b, 0.03, epsilon = 1e-8);
        assert_relative_eq!(
            fit.interpolate(10.0).unwrap(),
            100.0 * 0.3f64.exp(),
            epsilon = 1e-4
        );
    }

    #[test]
    fn test_noisy_curve_is_smoothed() {
        let c = curve(&[(1.0, 101.0), (2.0, 103.5), (3.0, 104.8), (4.0, 107.9)]);
        let fit = ParametricMethod::default().fit_curve(&c).unwrap();
        assert!(fit.b > 0.0);
        assert!(fit.a > 95.0 && fit.a < 102.0);
    }

    #[test]
    fn test_rejects_non_positive_prices() {
        let c = curve(&[(1.0, 10.0), (2.0, 0.0), (3.0, 5.0)]);
        assert!(matches!(
            ParametricMethod::default().fit_curve(&c),
            Err(InterpolationError::Degenerate(_))
        ));
    }

    #[test]
    fn test_needs_three_points() {
        let c = curve(&[(1.0, 100.0), (2.0, 101.0)]);
        assert!(matches!(
            ParametricMethod::default().fit_curve(&c),
            Err(InterpolationError::InsufficientData { got: 2, need: 3 })
        ));
    }

    #[test]
    fn test_log_linear_guess_is_exact_for_exponential_data() {
        let ts: [f64; 3] = [1.0, 2.0, 4.0];
        let fs: Vec<f64> = ts.iter().map(|t| 50.0 * (-0.1 * t).exp()).collect();
        let [a, b] = log_linear_guess(&ts, &fs).unwrap();
        assert_relative_eq!(a, 50.0, epsilon = 1e-9);
        assert_relative_eq!(b, -0.1, epsilon = 1e-12);
    }
}
