//! Scattered volatility quotes for one (instrument, date).

use super::error::MarketDataError;

/// One implied volatility observation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VolatilityPoint {
    /// Time to maturity in years (ACT/365 Fixed)
    pub tenor: f64,
    /// Strike as percent of spot
    pub strike: f64,
    /// Implied volatility
    pub vol: f64,
}

impl VolatilityPoint {
    /// Create a volatility point.
    #[inline]
    pub fn new(tenor: f64, strike: f64, vol: f64) -> Self {
        Self { tenor, strike, vol }
    }
}

/// Scattered (tenor, strike, vol) cloud for one (instrument, date).
///
/// Points are kept sorted by tenor then strike. Coincident points are kept
/// as quoted; whether they are averaged or rejected is up to the fitting
/// method. Collinearity is likewise detected by the fit, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct VolatilitySurface {
    points: Vec<VolatilityPoint>,
}

impl VolatilitySurface {
    /// Minimum number of points for a triangulation.
    pub const MIN_POINTS: usize = 3;

    /// Build a surface from unordered points.
    ///
    /// # Returns
    ///
    /// * `Err(MarketDataError::InvalidMaturity)` - A tenor is not finite and positive
    /// * `Err(MarketDataError::InvalidStrike)` - A strike is not finite
    /// * `Err(MarketDataError::InvalidValue)` - A volatility is not finite
    /// * `Err(MarketDataError::InsufficientData)` - Fewer than 3 points
    pub fn from_points<I>(points: I) -> Result<Self, MarketDataError>
    where
        I: IntoIterator<Item = VolatilityPoint>,
    {
        let mut points: Vec<VolatilityPoint> = points.into_iter().collect();
        for p in &points {
            if !p.tenor.is_finite() || p.tenor <= 0.0 {
                return Err(MarketDataError::InvalidMaturity { t: p.tenor });
            }
            if !p.strike.is_finite() {
                return Err(MarketDataError::InvalidStrike { strike: p.strike });
            }
            if !p.vol.is_finite() {
                return Err(MarketDataError::InvalidValue { value: p.vol });
            }
        }
        if points.len() < Self::MIN_POINTS {
            return Err(MarketDataError::InsufficientData {
                got: points.len(),
                need: Self::MIN_POINTS,
            });
        }
        points.sort_by(|a, b| {
            a.tenor
                .total_cmp(&b.tenor)
                .then_with(|| a.strike.total_cmp(&b.strike))
        });
        Ok(Self { points })
    }

    /// Points sorted by tenor then strike.
    pub fn points(&self) -> &[VolatilityPoint] {
        &self.points
    }

    /// `(tenor, strike)` coordinates.
    pub fn coordinates(&self) -> Vec<[f64; 2]> {
        self.points.iter().map(|p| [p.tenor, p.strike]).collect()
    }

    /// Volatilities aligned with [`coordinates`](Self::coordinates).
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.vol).collect()
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a constructed surface.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
