use super::GroupKey;
use crate::context::ProcessingContext;
use adapter_extract::{RawQuote, TermQuote};
use norm_core::market_data::{growth_rate_price, CurvePoint, ForwardCurve};
use norm_core::types::year_fraction;
use std::collections::BTreeMap;
use tracing::debug;

/// Forward curves built from one document.
#[derive(Debug, Clone, Default)]
pub struct CurveBatch {
    /// Usable curves in (instrument, date) order
    pub curves: Vec<(GroupKey, ForwardCurve)>,
    /// Points dropped: non-positive maturity, missing spot or non-finite price
    pub dropped_points: usize,
    /// Groups with fewer than two usable maturities
    pub discarded_groups: usize,
}

/// Builds forward curves from Forward and ForwardGrowthRate quotes.
///
/// Growth rates are converted with `spot * exp(rate * T)` using the spot of
/// the same instrument and observation date from the [`ProcessingContext`];
/// without one the point is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurveBuilder;

impl CurveBuilder {
    /// Create a builder.
    pub fn new() -> Self {
        Self
    }

    /// Group and convert `quotes`. Spot quotes must already be in `ctx`.
    pub fn build(&self, quotes: &[RawQuote], ctx: &ProcessingContext) -> CurveBatch {
        let mut groups: BTreeMap<GroupKey, Vec<CurvePoint>> = BTreeMap::new();
        let mut batch = CurveBatch::default();

        for quote in quotes {
            let (q, is_rate) = match quote {
                RawQuote::Forward(q) => (q, false),
                RawQuote::ForwardGrowthRate(q) => (q, true),
                _ => continue,
            };
            let points = groups.entry(GroupKey::new(&q.instrument, q.date)).or_default();
            match curve_point(q, is_rate, ctx) {
                Some(point) => points.push(point),
                None => batch.dropped_points += 1,
            }
        }

        for (key, points) in groups {
            match ForwardCurve::from_points(points) {
                Ok(curve) => batch.curves.push((key, curve)),
                Err(e) => {
                    debug!(group = %key, error = %e, "Discarding forward group");
                    batch.discarded_groups += 1;
                }
            }
        }
        batch
    }
}

/// Forward price implied by a growth-rate quote and the same-date spot in `ctx`.
pub(crate) fn growth_rate_forward(q: &TermQuote, ctx: &ProcessingContext) -> Option<f64> {
    let spot = ctx.spot(&q.instrument, q.date)?;
    Some(growth_rate_price(spot, q.value, year_fraction(q.date, q.maturity)))
}

fn curve_point(q: &TermQuote, is_rate: bool, ctx: &ProcessingContext) -> Option<CurvePoint> {
    let t = year_fraction(q.date, q.maturity);
    if t <= 0.0 {
        return None;
    }
    let price = if is_rate {
        growth_rate_forward(q, ctx)?
    } else {
        q.value
    };
    price.is_finite().then(|| CurvePoint::new(t, price))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use infra_config::ConflictPolicy;
    use norm_core::types::Date;

    const ID: &str = "FR0000120271";

    fn d(s: &str) -> Date {
        Date::parse(s).unwrap()
    }

    fn term(maturity: &str, value: f64) -> TermQuote {
        TermQuote {
            instrument: ID.to_string(),
            maturity: d(maturity),
            value,
            date: d("2024-01-01"),
            vendor_adjusted: false,
        }
    }

    fn ctx_with_spot(spot: f64) -> ProcessingContext {
        let mut ctx = ProcessingContext::new(ConflictPolicy::InsertIfAbsent);
        ctx.record_spot(ID, d("2024-01-01"), spot);
        ctx
    }

    // ========================================
    // Growth rate conversion
    // ========================================

    #[test]
    fn test_growth_rate_uses_same_date_spot() {
        // 2024-01-01 + 730 days
        let quotes = vec![
            RawQuote::ForwardGrowthRate(term("2025-12-31", 0.05)),
            RawQuote::Forward(term("2025-01-01", 104.0)),
        ];
        let batch = CurveBuilder::new().build(&quotes, &ctx_with_spot(100.0));

        assert_eq!(batch.curves.len(), 1);
        let curve = &batch.curves[0].1;
        assert_relative_eq!(curve.maturities()[1], 2.0, epsilon = 1e-12);
        assert_relative_eq!(curve.prices()[1], 110.517_091_807_564_76, epsilon = 1e-9);
    }

    #[test]
    fn test_growth_rate_without_spot_is_dropped() {
        let quotes = vec![
            RawQuote::ForwardGrowthRate(term("2026-01-01", 0.05)),
            RawQuote::Forward(term("2025-01-01", 101.0)),
            RawQuote::Forward(term("2027-01-01", 103.0)),
        ];
        let ctx = ProcessingContext::new(ConflictPolicy::InsertIfAbsent);
        let batch = CurveBuilder::new().build(&quotes, &ctx);

        assert_eq!(batch.dropped_points, 1);
        assert_eq!(batch.curves[0].1.len(), 2);
    }

    #[test]
    fn test_non_positive_maturity_is_dropped() {
        let quotes = vec![
            RawQuote::ForwardGrowthRate(term("2024-01-01", 0.05)),
            RawQuote::ForwardGrowthRate(term("2023-06-30", 0.05)),
            RawQuote::Forward(term("2023-12-01", 99.0)),
        ];
        let batch = CurveBuilder::new().build(&quotes, &ctx_with_spot(100.0));

        assert_eq!(batch.dropped_points, 3);
        assert!(batch.curves.is_empty());
        assert_eq!(batch.discarded_groups, 1);
    }

    // ========================================
    // Grouping
    // ========================================

    #[test]
    fn test_single_point_group_is_discarded() {
        let mut other = term("2026-01-01", 50.0);
        other.instrument = "DE0007164600".to_string();
        let quotes = vec![
            RawQuote::Forward(term("2025-01-01", 101.0)),
            RawQuote::Forward(term("2026-01-01", 102.0)),
            RawQuote::Forward(other),
        ];
        let batch = CurveBuilder::new().build(&quotes, &ctx_with_spot(100.0));

        assert_eq!(batch.curves.len(), 1);
        assert_eq!(batch.curves[0].0.instrument, ID);
        assert_eq!(batch.discarded_groups, 1);
    }

    #[test]
    fn test_groups_split_by_observation_date() {
        let mut later = term("2026-01-01", 102.0);
        later.date = d("2024-01-02");
        let quotes = vec![
            RawQuote::Forward(term("2025-01-01", 101.0)),
            RawQuote::Forward(term("2026-01-01", 102.0)),
            RawQuote::Forward(later),
        ];
        let batch = CurveBuilder::new().build(&quotes, &ctx_with_spot(100.0));
        assert_eq!(batch.curves.len(), 1);
        assert_eq!(batch.discarded_groups, 1);
    }

    #[test]
    fn test_ignores_other_kinds() {
        let batch = CurveBuilder::new().build(&[], &ctx_with_spot(100.0));
        assert!(batch.curves.is_empty());
        assert_eq!(batch.discarded_groups, 0);
    }
}
