//! Forward curves built from quotes for one (instrument, date).

use super::error::MarketDataError;

/// One observed point of a forward curve.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurvePoint {
    /// Time to maturity in years (ACT/365 Fixed)
    pub maturity: f64,
    /// Forward price
    pub price: f64,
}

impl CurvePoint {
    /// Create a curve point.
    #[inline]
    pub fn new(maturity: f64, price: f64) -> Self {
        Self { maturity, price }
    }
}

/// Forward price implied by a continuously compounded growth rate.
///
/// `price = spot * exp(rate * t)`
///
/// # Example
///
/// ```
/// use norm_core::market_data::growth_rate_price;
///
/// let f = growth_rate_price(100.0, 0.05, 2.0);
/// assert!((f - 110.517_091_8).abs() < 1e-6);
/// ```
#[inline]
pub fn growth_rate_price(spot: f64, rate: f64, t: f64) -> f64 {
    spot * (rate * t).exp()
}

/// Forward curve for one (instrument, date): points sorted by maturity.
///
/// Maturities are strictly positive and unique; points quoted at the same
/// maturity are averaged on construction. A usable curve has at least
/// [`ForwardCurve::MIN_POINTS`] points.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardCurve {
    maturities: Vec<f64>,
    prices: Vec<f64>,
}

impl ForwardCurve {
    /// Minimum number of distinct maturities for a usable curve.
    pub const MIN_POINTS: usize = 2;

    /// Build a curve from unordered points.
    ///
    /// # Returns
    ///
    /// * `Err(MarketDataError::InvalidMaturity)` - A maturity is not finite and positive
    /// * `Err(MarketDataError::InvalidValue)` - A price is not finite
    /// * `Err(MarketDataError::InsufficientData)` - Fewer than 2 distinct maturities
    pub fn from_points<I>(points: I) -> Result<Self, MarketDataError>
    where
        I: IntoIterator<Item = CurvePoint>,
    {
        let mut points: Vec<CurvePoint> = points.into_iter().collect();
        for p in &points {
            if !p.maturity.is_finite() || p.maturity <= 0.0 {
                return Err(MarketDataError::InvalidMaturity { t: p.maturity });
            }
            if !p.price.is_finite() {
                return Err(MarketDataError::InvalidValue { value: p.price });
            }
        }
        points.sort_by(|a, b| a.maturity.total_cmp(&b.maturity));

        let mut maturities: Vec<f64> = Vec::with_capacity(points.len());
        let mut prices: Vec<f64> = Vec::with_capacity(points.len());
        let mut counts: Vec<usize> = Vec::with_capacity(points.len());
        for p in points {
            match maturities.last() {
                Some(&last) if last == p.maturity => {
                    let i = prices.len() - 1;
                    prices[i] += p.price;
                    counts[i] += 1;
                }
                _ => {
                    maturities.push(p.maturity);
                    prices.push(p.price);
                    counts.push(1);
                }
            }
        }
        for (price, n) in prices.iter_mut().zip(counts) {
            *price /= n as f64;
        }

        if maturities.len() < Self::MIN_POINTS {
            return Err(MarketDataError::InsufficientData {
                got: maturities.len(),
                need: Self::MIN_POINTS,
            });
        }
        Ok(Self { maturities, prices })
    }

    /// Maturities in ascending order.
    pub fn maturities(&self) -> &[f64] {
        &self.maturities
    }

    /// Prices aligned with [`maturities`](Self::maturities).
    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    /// Number of distinct maturities.
    pub fn len(&self) -> usize {
        self.maturities.len()
    }

    /// Always false for a constructed curve.
    pub fn is_empty(&self) -> bool {
        self.maturities.is_empty()
    }

    /// Iterate over the points in maturity order.
    pub fn points(&self) -> impl Iterator<Item = CurvePoint> + '_ {
        self.maturities
            .iter()
            .zip(self.prices.iter())
            .map(|(&t, &p)| CurvePoint::new(t, p))
    }
}
