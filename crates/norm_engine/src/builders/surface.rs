use super::GroupKey;
use adapter_extract::RawQuote;
use norm_core::market_data::{VolatilityPoint, VolatilitySurface};
use norm_core::types::year_fraction;
use std::collections::BTreeMap;
use tracing::debug;

/// Volatility surfaces built from one document.
#[derive(Debug, Clone, Default)]
pub struct SurfaceBatch {
    /// Usable surfaces in (instrument, date) order
    pub surfaces: Vec<(GroupKey, VolatilitySurface)>,
    /// Points dropped for a non-positive tenor
    pub dropped_points: usize,
    /// Groups with fewer than three usable points
    pub discarded_groups: usize,
}

/// Builds scattered (tenor, strike, vol) clouds from Volatility quotes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SurfaceBuilder;

impl SurfaceBuilder {
    /// Create a builder.
    pub fn new() -> Self {
        Self
    }

    /// Group `quotes` by (instrument, date).
    pub fn build(&self, quotes: &[RawQuote]) -> SurfaceBatch {
        let mut groups: BTreeMap<GroupKey, Vec<VolatilityPoint>> = BTreeMap::new();
        let mut batch = SurfaceBatch::default();

        for quote in quotes {
            let RawQuote::Volatility(q) = quote else {
                continue;
            };
            let points = groups.entry(GroupKey::new(&q.instrument, q.date)).or_default();
            let tenor = year_fraction(q.date, q.maturity);
            if tenor <= 0.0 {
                batch.dropped_points += 1;
                continue;
            }
            points.push(VolatilityPoint::new(tenor, q.strike, q.value));
        }

        for (key, points) in groups {
            match VolatilitySurface::from_points(points) {
                Ok(surface) => batch.surfaces.push((key, surface)),
                Err(e) => {
                    debug!(group = %key, error = %e, "Discarding volatility group");
                    batch.discarded_groups += 1;
                }
            }
        }
        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adapter_extract::VolQuote;
    use norm_core::types::Date;

    fn vol(maturity: &str, strike: f64, value: f64) -> RawQuote {
        RawQuote::Volatility(VolQuote {
            instrument: "FR0000120271".to_string(),
            maturity: Date::parse(maturity).unwrap(),
            strike,
            value,
            date: Date::parse("2024-01-01").unwrap(),
            vendor_adjusted: false,
        })
    }

    #[test]
    fn test_builds_sorted_cloud() {
        let quotes = vec![
            vol("2026-01-01", 100.0, 0.21),
            vol("2025-01-01", 120.0, 0.19),
            vol("2025-01-01", 80.0, 0.25),
        ];
        let batch = SurfaceBuilder::new().build(&quotes);

        assert_eq!(batch.surfaces.len(), 1);
        let points = batch.surfaces[0].1.points();
        assert_eq!(points[0].strike, 80.0);
        assert_eq!(points[1].strike, 120.0);
        assert!(points[2].tenor > points[1].tenor);
    }

    #[test]
    fn test_expired_points_dropped_then_group_discarded() {
        let quotes = vec![
            vol("2023-01-01", 100.0, 0.2),
            vol("2025-01-01", 100.0, 0.2),
            vol("2026-01-01", 100.0, 0.2),
        ];
        let batch = SurfaceBuilder::new().build(&quotes);

        assert_eq!(batch.dropped_points, 1);
        assert!(batch.surfaces.is_empty());
        assert_eq!(batch.discarded_groups, 1);
    }

    #[test]
    fn test_coincident_points_are_kept() {
        let quotes = vec![
            vol("2025-01-01", 100.0, 0.2),
            vol("2025-01-01", 100.0, 0.22),
            vol("2026-01-01", 90.0, 0.21),
        ];
        let batch = SurfaceBuilder::new().build(&quotes);
        assert_eq!(batch.surfaces[0].1.len(), 3);
    }
}
