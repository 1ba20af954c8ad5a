//! Volatility-surface methods over (tenor, strike).

use super::{FitMethod, FittedModel};
use infra_config::VolatilityMethod;
use norm_core::market_data::VolatilitySurface;
use norm_core::math::triangulation::{
    merge_duplicates, CloughTocherInterpolator, LinearTriInterpolator, ScatteredInterpolator,
};
use norm_core::types::InterpolationError;

struct SurfaceModel<M>(M);

impl<M: ScatteredInterpolator> FittedModel<[f64; 2]> for SurfaceModel<M> {
    fn evaluate(&self, at: &[f64; 2]) -> Result<f64, InterpolationError> {
        self.0.interpolate(at[0], at[1])
    }
}

/// Piecewise cubic C1 interpolant. Fails on coincident or collinear points.
#[derive(Debug, Clone, Copy, Default)]
pub struct CloughTocherMethod;

impl FitMethod<VolatilitySurface, [f64; 2]> for CloughTocherMethod {
    fn name(&self) -> &'static str {
        "clough-tocher"
    }

    fn fit(
        &self,
        surface: &VolatilitySurface,
    ) -> Result<Box<dyn FittedModel<[f64; 2]> + '_>, InterpolationError> {
        let ct = CloughTocherInterpolator::new(&surface.coordinates(), &surface.values())?;
        Ok(Box::new(SurfaceModel(ct)))
    }
}

/// Barycentric interpolant over the Delaunay triangulation, coincident
/// points averaged first. Fails on collinear points.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearTriMethod;

impl FitMethod<VolatilitySurface, [f64; 2]> for LinearTriMethod {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn fit(
        &self,
        surface: &VolatilitySurface,
    ) -> Result<Box<dyn FittedModel<[f64; 2]> + '_>, InterpolationError> {
        let (points, values) = merge_duplicates(&surface.coordinates(), &surface.values());
        let linear = LinearTriInterpolator::new(&points, &values)?;
        Ok(Box::new(SurfaceModel(linear)))
    }
}

/// Method chain for a configured volatility method.
pub fn volatility_chain(method: VolatilityMethod) -> Vec<Box<dyn FitMethod<VolatilitySurface, [f64; 2]>>> {
    match method {
        VolatilityMethod::CloughTocher => vec![Box::new(CloughTocherMethod), Box::new(LinearTriMethod)],
        VolatilityMethod::Linear => vec![Box::new(LinearTriMethod)],
    }
}
