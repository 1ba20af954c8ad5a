//! # norm_core: Numerical Foundation for Market Data Normalisation
//!
//! ## Layer Role
//!
//! norm_core is the bottom layer of the workspace. Every other crate builds on
//! the types and numerical methods defined here:
//! - Dates and the ACT/365 Fixed year fraction (`types::time`)
//! - Error types: `InterpolationError`, `SolverError`, `DateError` (`types::error`)
//! - 1D interpolators: linear, monotone cubic, least-squares B-spline (`math::interpolators`)
//! - Levenberg-Marquardt least squares (`math::solvers`)
//! - Delaunay triangulation with linear and Clough-Tocher interpolants (`math::triangulation`)
//! - Forward curves, volatility point clouds and canonical grids (`market_data`)
//!
//! ## Minimal Dependencies
//!
//! This crate has no dependencies on other workspace crates:
//! - num-traits: Traits for generic numerical computation
//! - chrono: Date arithmetic
//! - thiserror: Error derivation
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use norm_core::math::interpolators::{Extrapolation, Interpolator, MonotonicInterpolator};
//! use norm_core::types::{year_fraction, Date};
//!
//! let obs = Date::from_ymd(2024, 1, 2).unwrap();
//! let maturity = Date::from_ymd(2026, 1, 1).unwrap();
//! let t = year_fraction(obs, maturity);
//! assert!((t - 730.0 / 365.0).abs() < 1e-12);
//!
//! let pchip = MonotonicInterpolator::new(&[1.0, 2.0, 5.0], &[100.0, 102.0, 108.0])
//!     .unwrap()
//!     .with_extrapolation(Extrapolation::Extend);
//! let y = pchip.interpolate(t).unwrap();
//! assert!(y > 100.0 && y < 102.0);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): Enable serialisation for `Date` and market data points

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod market_data;
pub mod math;
pub mod types;
