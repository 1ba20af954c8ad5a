//! Grouping of parsed quotes into per-(instrument, date) curves and surfaces.
//!
//! - [`CurveBuilder`]: Forward and growth-rate quotes into [`ForwardCurve`]s
//! - [`SurfaceBuilder`]: Volatility quotes into [`VolatilitySurface`]s
//!
//! Groups are emitted in (instrument, date) order. A group that cannot be
//! built (too few usable points) is discarded whole and counted.
//!
//! [`ForwardCurve`]: norm_core::market_data::ForwardCurve
//! [`VolatilitySurface`]: norm_core::market_data::VolatilitySurface

mod curve;
mod surface;

pub use curve::{CurveBatch, CurveBuilder};
pub(crate) use curve::growth_rate_forward;
pub use surface::{SurfaceBatch, SurfaceBuilder};

use norm_core::types::Date;
use std::fmt;

/// Identity of one curve or surface.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    /// Instrument identifier
    pub instrument: String,
    /// Observation date
    pub date: Date,
}

impl GroupKey {
    /// Create a key.
    pub fn new(instrument: impl Into<String>, date: Date) -> Self {
        Self {
            instrument: instrument.into(),
            date,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.instrument, self.date)
    }
}
