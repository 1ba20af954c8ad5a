//! Market data structures for curve and surface normalisation.
//!
//! # Components
//!
//! - [`curves`]: Curve points and per-(instrument, date) forward curves
//! - [`surfaces`]: Volatility points and scattered volatility surfaces
//! - [`grid`]: Canonical output grids, synthetic identifiers and rounding
//! - [`error`]: Market data error types (MarketDataError)
//!
//! # Example
//!
//! ```
//! use norm_core::market_data::{growth_rate_price, CurvePoint, ForwardCurve};
//!
//! let curve = ForwardCurve::from_points(vec![
//!     CurvePoint::new(2.0, growth_rate_price(100.0, 0.05, 2.0)),
//!     CurvePoint::new(0.5, 101.0),
//! ])
//! .unwrap();
//! assert_eq!(curve.maturities(), &[0.5, 2.0]);
//! ```

pub mod curves;
pub mod error;
pub mod grid;
pub mod surfaces;

// Re-export commonly used types
pub use curves::{growth_rate_price, CurvePoint, ForwardCurve};
pub use error::MarketDataError;
pub use grid::{
    forward_grid, forward_synthetic_id, round_decimals, volatility_grid, volatility_synthetic_id,
    VolGridCell, FORWARD_GRID_YEARS, OUTPUT_DECIMALS, VOLATILITY_GRID_STRIKES,
    VOLATILITY_GRID_TENORS,
};
pub use surfaces::{VolatilityPoint, VolatilitySurface};
