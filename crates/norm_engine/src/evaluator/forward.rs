//! Forward-curve methods.

use super::parametric::ParametricMethod;
use super::{FitMethod, FittedModel};
use infra_config::ForwardMethod;
use norm_core::market_data::ForwardCurve;
use norm_core::math::interpolators::{
    Extrapolation, Interpolator, LeastSquaresSpline, LinearInterpolator, MonotonicInterpolator,
};
use norm_core::types::InterpolationError;

/// 1D interpolator adapted to grid evaluation.
pub(super) struct CurveModel<M>(pub(super) M);

impl<M: Interpolator<f64>> FittedModel<f64> for CurveModel<M> {
    fn evaluate(&self, at: &f64) -> Result<f64, InterpolationError> {
        self.0.interpolate(*at)
    }
}

/// Least-squares cubic spline with interior knots between the second and
/// second-to-last maturities. Needs at least 4 maturities.
#[derive(Debug, Clone, Copy, Default)]
pub struct SplineMethod;

impl FitMethod<ForwardCurve, f64> for SplineMethod {
    fn name(&self) -> &'static str {
        "spline"
    }

    fn fit(&self, curve: &ForwardCurve) -> Result<Box<dyn FittedModel<f64> + '_>, InterpolationError> {
        let spline = LeastSquaresSpline::with_default_knots(curve.maturities(), curve.prices())?
            .with_extrapolation(Extrapolation::Extend);
        Ok(Box::new(CurveModel(spline)))
    }
}

/// Monotone cubic Hermite (PCHIP) with extended end pieces.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotoneMethod;

impl MonotoneMethod {
    /// Two points are left to the linear stage, where they give the same line.
    pub const MIN_POINTS: usize = 3;
}

impl FitMethod<ForwardCurve, f64> for MonotoneMethod {
    fn name(&self) -> &'static str {
        "monotone"
    }

    fn fit(&self, curve: &ForwardCurve) -> Result<Box<dyn FittedModel<f64> + '_>, InterpolationError> {
        if curve.len() < Self::MIN_POINTS {
            return Err(InterpolationError::InsufficientData {
                got: curve.len(),
                need: Self::MIN_POINTS,
            });
        }
        let pchip = MonotonicInterpolator::new(curve.maturities(), curve.prices())?
            .with_extrapolation(Extrapolation::Extend);
        Ok(Box::new(CurveModel(pchip)))
    }
}

/// Piecewise linear with extended end segments.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearMethod;

impl FitMethod<ForwardCurve, f64> for LinearMethod {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn fit(&self, curve: &ForwardCurve) -> Result<Box<dyn FittedModel<f64> + '_>, InterpolationError> {
        let linear = LinearInterpolator::new(curve.maturities(), curve.prices())?
            .with_extrapolation(Extrapolation::Extend);
        Ok(Box::new(CurveModel(linear)))
    }
}

/// Method chain for a configured forward method.
pub fn forward_chain(method: ForwardMethod) -> Vec<Box<dyn FitMethod<ForwardCurve, f64>>> {
    match method {
        ForwardMethod::Spline => vec![
            Box::new(SplineMethod),
            Box::new(MonotoneMethod),
            Box::new(LinearMethod),
        ],
        ForwardMethod::Monotone => vec![Box::new(MonotoneMethod), Box::new(LinearMethod)],
        ForwardMethod::Linear => vec![Box::new(LinearMethod)],
        ForwardMethod::Parametric => vec![
            Box::new(ParametricMethod::default()),
            Box::new(MonotoneMethod),
            Box::new(LinearMethod),
        ],
    }
}
