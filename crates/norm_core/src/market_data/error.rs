//! Market data error types.
//!
//! This module provides structured error handling for building forward
//! curves and volatility point clouds from parsed quotes.

use crate::types::InterpolationError;
use thiserror::Error;

/// Market data construction errors.
///
/// # Variants
///
/// - `InvalidMaturity`: Non-positive or non-finite time to maturity
/// - `InvalidStrike`: Non-finite strike
/// - `InvalidValue`: Non-finite price or volatility
/// - `InsufficientData`: Not enough points for construction
/// - `Interpolation`: Wrapped interpolation error
///
/// # Examples
///
/// ```
/// use norm_core::market_data::MarketDataError;
///
/// let err = MarketDataError::InvalidMaturity { t: -1.0 };
/// assert!(format!("{}", err).contains("-1"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    /// Invalid maturity (non-positive time).
    #[error("Invalid maturity: t = {t}")]
    InvalidMaturity {
        /// The invalid maturity value
        t: f64,
    },

    /// Invalid strike (non-finite).
    #[error("Invalid strike: K = {strike}")]
    InvalidStrike {
        /// The invalid strike value
        strike: f64,
    },

    /// Invalid observed value (non-finite).
    #[error("Invalid value: {value}")]
    InvalidValue {
        /// The invalid value
        value: f64,
    },

    /// Insufficient data for construction.
    #[error("Insufficient data: got {got}, need {need}")]
    InsufficientData {
        /// Number of points provided
        got: usize,
        /// Minimum number of points required
        need: usize,
    },

    /// Interpolation error.
    #[error("Interpolation error: {0}")]
    Interpolation(#[from] InterpolationError),
}
