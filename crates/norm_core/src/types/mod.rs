//! Core time and error types.
//!
//! This module provides:
//! - `time`: `Date` wrapper and the ACT/365 Fixed year fraction used for every tenor
//! - `error`: Structured error types for date, interpolation and solver operations
//!
//! # Re-exports
//!
//! For convenience, commonly used types are re-exported at this module level:
//! - [`Date`], [`year_fraction`], [`DAYS_PER_YEAR`] from `time`
//! - [`DateError`], [`InterpolationError`], [`SolverError`] from `error`

pub mod error;
pub mod time;

// Re-export commonly used types at module level
pub use error::{DateError, InterpolationError, SolverError};
pub use time::{year_fraction, Date, DAYS_PER_YEAR};
