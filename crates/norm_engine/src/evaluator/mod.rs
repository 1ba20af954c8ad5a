//! Projection of curves and surfaces onto canonical grids.
//!
//! A [`GridEvaluator`] holds an ordered chain of [`FitMethod`]s. Methods are
//! tried in order; a method that fails to fit (or, on an axis with strict
//! stages, whose output is not acceptable everywhere on the grid) hands over
//! to the next one. The first accepted method produces the grid values, and
//! cells it cannot produce are omitted rather than filled by a later method.
//!
//! # Axes
//!
//! | Axis | Input | Grid | Strict stages | Emitted cells |
//! |------|-------|------|---------------|---------------|
//! | Forward | [`ForwardCurve`] | years 1..10 | every value > 0 | finite, >= 0 |
//! | Volatility | [`VolatilitySurface`] | tenor × strike | none | finite, > 0 |

mod forward;
mod parametric;
mod volatility;

pub use forward::{forward_chain, LinearMethod, MonotoneMethod, SplineMethod};
pub use parametric::{ExponentialCurve, ParametricMethod};
pub use volatility::{volatility_chain, CloughTocherMethod, LinearTriMethod};

use infra_config::{ForwardMethod, VolatilityMethod};
use norm_core::market_data::{round_decimals, ForwardCurve, VolatilitySurface, OUTPUT_DECIMALS};
use norm_core::types::InterpolationError;
use tracing::debug;

/// A fitted model evaluable at grid coordinates of type `C`.
pub trait FittedModel<C> {
    /// Value at `at`.
    fn evaluate(&self, at: &C) -> Result<f64, InterpolationError>;
}

/// One interpolation method: fits a model to an input of type `I`.
pub trait FitMethod<I, C>: Send + Sync {
    /// Method name, for logs and reports.
    fn name(&self) -> &'static str;

    /// Fit a model to `input`.
    fn fit(&self, input: &I) -> Result<Box<dyn FittedModel<C> + '_>, InterpolationError>;
}

/// Lower bound a grid value must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellBound {
    /// `value >= 0`
    NonNegative,
    /// `value > 0`
    Positive,
}

impl CellBound {
    /// Whether a finite `value` satisfies the bound.
    #[inline]
    pub fn admits(&self, value: f64) -> bool {
        match self {
            CellBound::NonNegative => value >= 0.0,
            CellBound::Positive => value > 0.0,
        }
    }
}

/// Acceptance rules of one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisPolicy {
    /// When set, a non-final method is accepted only if every grid value is
    /// finite and satisfies this bound
    pub strict_stages: Option<CellBound>,
    /// Bound on emitted cells
    pub emit: CellBound,
}

impl AxisPolicy {
    /// Forward prices: smoother stages must be positive everywhere, output may touch zero.
    pub const FORWARD: AxisPolicy = AxisPolicy {
        strict_stages: Some(CellBound::Positive),
        emit: CellBound::NonNegative,
    };

    /// Volatilities: stages fall through on fit failure only, output strictly positive.
    pub const VOLATILITY: AxisPolicy = AxisPolicy {
        strict_stages: None,
        emit: CellBound::Positive,
    };
}

/// Grid values produced for one curve or surface.
#[derive(Debug, Clone, PartialEq)]
pub struct GridOutcome {
    /// Accepted method, `None` when every method failed
    pub method: Option<&'static str>,
    /// One entry per grid coordinate; `None` where the cell is omitted
    pub values: Vec<Option<f64>>,
}

impl GridOutcome {
    fn empty(len: usize) -> Self {
        Self {
            method: None,
            values: vec![None; len],
        }
    }

    /// Number of emitted cells.
    pub fn emitted(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}

/// Ordered method chain with its axis policy.
pub struct GridEvaluator<I, C> {
    chain: Vec<Box<dyn FitMethod<I, C>>>,
    policy: AxisPolicy,
}

/// Evaluator for forward curves on whole-year maturities.
pub type ForwardEvaluator = GridEvaluator<ForwardCurve, f64>;

/// Evaluator for volatility surfaces on (tenor, strike) cells.
pub type VolatilityEvaluator = GridEvaluator<VolatilitySurface, [f64; 2]>;

impl<I, C> GridEvaluator<I, C> {
    /// Evaluator over an explicit chain.
    pub fn new(chain: Vec<Box<dyn FitMethod<I, C>>>, policy: AxisPolicy) -> Self {
        Self { chain, policy }
    }

    /// Method names in chain order.
    pub fn method_names(&self) -> Vec<&'static str> {
        self.chain.iter().map(|m| m.name()).collect()
    }

    /// Acceptance rules in force.
    pub fn policy(&self) -> AxisPolicy {
        self.policy
    }

    /// Project `input` onto `grid`.
    pub fn evaluate(&self, input: &I, grid: &[C]) -> GridOutcome {
        let last = self.chain.len().saturating_sub(1);

        for (stage, method) in self.chain.iter().enumerate() {
            let model = match method.fit(input) {
                Ok(model) => model,
                Err(e) => {
                    debug!(method = method.name(), error = %e, "Fit failed, falling through");
                    continue;
                }
            };
            let raw: Vec<Option<f64>> = grid.iter().map(|c| model.evaluate(c).ok()).collect();

            if stage < last {
                if let Some(bound) = self.policy.strict_stages {
                    let acceptable = raw
                        .iter()
                        .all(|v| v.is_some_and(|v| v.is_finite() && bound.admits(v)));
                    if !acceptable {
                        debug!(method = method.name(), "Output rejected, falling through");
                        continue;
                    }
                }
            }

            let values = raw
                .into_iter()
                .map(|v| v.and_then(|v| self.emit(v)))
                .collect();
            return GridOutcome {
                method: Some(method.name()),
                values,
            };
        }
        GridOutcome::empty(grid.len())
    }

    fn emit(&self, value: f64) -> Option<f64> {
        if !value.is_finite() {
            return None;
        }
        // Adding 0.0 turns a rounded -0.0 into 0.0
        let rounded = round_decimals(value, OUTPUT_DECIMALS) + 0.0;
        self.policy.emit.admits(rounded).then_some(rounded)
    }
}

impl ForwardEvaluator {
    /// Evaluator for a configured forward method chain.
    pub fn forward(method: ForwardMethod) -> Self {
        Self::new(forward_chain(method), AxisPolicy::FORWARD)
    }
}

impl VolatilityEvaluator {
    /// Evaluator for a configured volatility method chain.
    pub fn volatility(method: VolatilityMethod) -> Self {
        Self::new(volatility_chain(method), AxisPolicy::VOLATILITY)
    }
}
