//! Canonical output grids and the labels of their cells.

/// Decimal places kept on every normalised output value.
pub const OUTPUT_DECIMALS: i32 = 6;

/// Whole-year maturities of the forward grid.
pub const FORWARD_GRID_YEARS: [u32; 10] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];

/// Whole-year tenors of the volatility grid.
pub const VOLATILITY_GRID_TENORS: [u32; 10] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];

/// Strikes (percent of spot) of the volatility grid: 40 to 160 in steps of 10.
pub const VOLATILITY_GRID_STRIKES: [u32; 13] =
    [40, 50, 60, 70, 80, 90, 100, 110, 120, 130, 140, 150, 160];

/// One cell of the volatility grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VolGridCell {
    /// Tenor in whole years
    pub tenor: u32,
    /// Strike in percent of spot
    pub strike: u32,
}

impl VolGridCell {
    /// `(tenor, strike)` as evaluation coordinates.
    #[inline]
    pub fn coordinates(&self) -> [f64; 2] {
        [self.tenor as f64, self.strike as f64]
    }
}

/// Forward grid maturities as year fractions.
pub fn forward_grid() -> Vec<f64> {
    FORWARD_GRID_YEARS.iter().map(|&y| y as f64).collect()
}

/// Every volatility grid cell, tenor-major.
///
/// # Example
///
/// ```
/// use norm_core::market_data::volatility_grid;
///
/// let cells = volatility_grid();
/// assert_eq!(cells.len(), 130);
/// assert_eq!((cells[0].tenor, cells[0].strike), (1, 40));
/// ```
pub fn volatility_grid() -> Vec<VolGridCell> {
    VOLATILITY_GRID_TENORS
        .iter()
        .flat_map(|&tenor| {
            VOLATILITY_GRID_STRIKES
                .iter()
                .map(move |&strike| VolGridCell { tenor, strike })
        })
        .collect()
}

/// Synthetic id of a forward grid row: `"{instrument} {year}Y"`.
pub fn forward_synthetic_id(instrument: &str, year: u32) -> String {
    format!("{} {}Y", instrument, year)
}

/// Synthetic id of a volatility grid row: `"{instrument} {tenor}Y {strike:.2}%"`.
///
/// # Example
///
/// ```
/// use norm_core::market_data::volatility_synthetic_id;
///
/// assert_eq!(volatility_synthetic_id("FR0000120271", 3, 90), "FR0000120271 3Y 90.00%");
/// ```
pub fn volatility_synthetic_id(instrument: &str, tenor: u32, strike: u32) -> String {
    format!("{} {}Y {:.2}%", instrument, tenor, strike as f64)
}

/// Round half away from zero to `places` decimals.
#[inline]
pub fn round_decimals(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
