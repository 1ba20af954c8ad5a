//! Conversion of grid outcomes into output rows.

use crate::builders::{growth_rate_forward, GroupKey};
use crate::context::ProcessingContext;
use crate::evaluator::GridOutcome;
use adapter_extract::RawQuote;
use infra_store::NormalizedRow;
use norm_core::market_data::{
    forward_synthetic_id, round_decimals, volatility_synthetic_id, VolGridCell,
    FORWARD_GRID_YEARS, OUTPUT_DECIMALS,
};

/// Forward rows for the emitted cells of `outcome` over [`FORWARD_GRID_YEARS`].
pub fn forward_rows(key: &GroupKey, outcome: &GridOutcome) -> Vec<NormalizedRow> {
    let date = key.date.to_string();
    FORWARD_GRID_YEARS
        .iter()
        .zip(&outcome.values)
        .filter_map(|(&year, value)| {
            value.map(|v| {
                NormalizedRow::new(
                    &key.instrument,
                    forward_synthetic_id(&key.instrument, year),
                    v,
                    &date,
                )
            })
        })
        .collect()
}

/// Volatility rows for the emitted cells of `outcome` over `cells`.
pub fn volatility_rows(key: &GroupKey, cells: &[VolGridCell], outcome: &GridOutcome) -> Vec<NormalizedRow> {
    let date = key.date.to_string();
    cells
        .iter()
        .zip(&outcome.values)
        .filter_map(|(cell, value)| {
            value.map(|v| {
                NormalizedRow::new(
                    &key.instrument,
                    volatility_synthetic_id(&key.instrument, cell.tenor, cell.strike),
                    v,
                    &date,
                )
            })
        })
        .collect()
}

/// Spot rows in quote order, keyed by instrument.
pub fn spot_rows(quotes: &[RawQuote]) -> Vec<NormalizedRow> {
    quotes
        .iter()
        .filter_map(|q| match q {
            RawQuote::Spot(s) => Some(NormalizedRow::new(
                &s.instrument,
                &s.instrument,
                s.value,
                s.date.to_string(),
            )),
            _ => None,
        })
        .collect()
}

/// Raw forward rows in quote order, one per maturity date.
///
/// Forward quotes are kept as quoted. Growth rates are converted with the
/// same-date spot from `ctx` and rounded; without a spot they are skipped.
/// Maturities are not filtered.
pub fn raw_forward_rows(quotes: &[RawQuote], ctx: &ProcessingContext) -> Vec<NormalizedRow> {
    quotes
        .iter()
        .filter_map(|q| {
            let (term, value) = match q {
                RawQuote::Forward(t) => (t, t.value),
                RawQuote::ForwardGrowthRate(t) => {
                    (t, round_decimals(growth_rate_forward(t, ctx)?, OUTPUT_DECIMALS))
                }
                _ => return None,
            };
            value
                .is_finite()
                .then(|| NormalizedRow::new(&term.instrument, term.label(), value, term.date.to_string()))
        })
        .collect()
}

/// Raw volatility rows in quote order, values rounded.
pub fn raw_volatility_rows(quotes: &[RawQuote]) -> Vec<NormalizedRow> {
    quotes
        .iter()
        .filter_map(|q| match q {
            RawQuote::Volatility(v) => Some(NormalizedRow::new(
                &v.instrument,
                v.label(),
                round_decimals(v.value, OUTPUT_DECIMALS),
                v.date.to_string(),
            )),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use adapter_extract::{SpotQuote, TermQuote, VolQuote};
    use approx::assert_relative_eq;
    use infra_config::ConflictPolicy;
    use norm_core::types::Date;

    fn key() -> GroupKey {
        GroupKey::new("FR0000120271", Date::from_ymd(2024, 3, 15).unwrap())
    }

    #[test]
    fn test_forward_rows_skip_omitted_cells() {
        let mut values = vec![Some(100.0); 10];
        values[9] = None;
        let outcome = GridOutcome {
            method: Some("linear"),
            values,
        };
        let rows = forward_rows(&key(), &outcome);

        assert_eq!(rows.len(), 9);
        assert_eq!(rows[0].synthetic_id, "FR0000120271 1Y");
        assert_eq!(rows[8].synthetic_id, "FR0000120271 9Y");
        assert_eq!(rows[0].observation_date, "2024-03-15");
    }

    #[test]
    fn test_volatility_rows_label_cells() {
        let cells = [
            VolGridCell { tenor: 3, strike: 90 },
            VolGridCell { tenor: 3, strike: 100 },
        ];
        let outcome = GridOutcome {
            method: Some("clough-tocher"),
            values: vec![None, Some(0.21)],
        };
        let rows = volatility_rows(&key(), &cells, &outcome);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].synthetic_id, "FR0000120271 3Y 100.00%");
        assert_eq!(rows[0].value, 0.21);
    }

    #[test]
    fn test_spot_rows_use_instrument_as_id() {
        let quotes = vec![RawQuote::Spot(SpotQuote {
            instrument: "FR0000120271".to_string(),
            value: 98.12,
            date: Date::from_ymd(2024, 3, 15).unwrap(),
        })];
        let rows = spot_rows(&quotes);
        assert_eq!(rows[0].synthetic_id, rows[0].instrument_id);
    }

    // ========================================
    // Raw rows
    // ========================================

    fn term(maturity: &str, value: f64) -> TermQuote {
        TermQuote {
            instrument: "FR0000120271".to_string(),
            maturity: Date::parse(maturity).unwrap(),
            value,
            date: Date::from_ymd(2024, 1, 1).unwrap(),
            vendor_adjusted: false,
        }
    }

    #[test]
    fn test_raw_forward_converts_growth_rates() {
        let mut ctx = ProcessingContext::new(ConflictPolicy::InsertIfAbsent);
        ctx.record_spot("FR0000120271", Date::from_ymd(2024, 1, 1).unwrap(), 100.0);
        let quotes = vec![
            RawQuote::Forward(term("2024-12-31", 101.123_456_7)),
            RawQuote::ForwardGrowthRate(term("2025-12-31", 0.05)),
        ];
        let rows = raw_forward_rows(&quotes, &ctx);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].synthetic_id, "FR0000120271 2024-12-31");
        assert_eq!(rows[0].value, 101.123_456_7);
        assert_eq!(rows[1].synthetic_id, "FR0000120271 2025-12-31");
        assert_relative_eq!(rows[1].value, 110.517092, epsilon = 1e-12);
        assert_eq!(rows[1].observation_date, "2024-01-01");
    }

    #[test]
    fn test_raw_forward_keeps_past_maturities_and_skips_missing_spot() {
        let ctx = ProcessingContext::new(ConflictPolicy::InsertIfAbsent);
        let quotes = vec![
            RawQuote::Forward(term("2023-06-30", 99.0)),
            RawQuote::ForwardGrowthRate(term("2025-12-31", 0.05)),
        ];
        let rows = raw_forward_rows(&quotes, &ctx);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].synthetic_id, "FR0000120271 2023-06-30");
    }

    #[test]
    fn test_raw_volatility_labels_strike() {
        let quotes = vec![RawQuote::Volatility(VolQuote {
            instrument: "FR0000120271".to_string(),
            maturity: Date::from_ymd(2025, 12, 31).unwrap(),
            strike: 87.1235,
            value: 0.213_456_78,
            date: Date::from_ymd(2024, 1, 1).unwrap(),
            vendor_adjusted: true,
        })];
        let rows = raw_volatility_rows(&quotes);

        assert_eq!(rows[0].synthetic_id, "FR0000120271 2025-12-31 87.1235%");
        assert_relative_eq!(rows[0].value, 0.213457, epsilon = 1e-12);
    }
}
