//! Per-run processing state.
//!
//! A [`ProcessingContext`] lives for exactly one run and is passed explicitly
//! to every stage that needs it. Nothing here outlives the run.

use infra_config::ConflictPolicy;
use infra_store::{NormalizedRow, SinkReport, TableKind};
use norm_core::types::Date;
use std::collections::{HashMap, HashSet};

type SeenKey = (TableKind, String, String);

/// Spot lookup and written-key dedup for one run.
#[derive(Debug, Clone, Default)]
pub struct ProcessingContext {
    spots: HashMap<(String, Date), f64>,
    // Only maintained under insert-if-absent
    seen: Option<HashSet<SeenKey>>,
}

impl ProcessingContext {
    /// Fresh context for a run under `policy`.
    pub fn new(policy: ConflictPolicy) -> Self {
        Self {
            spots: HashMap::new(),
            seen: match policy {
                ConflictPolicy::InsertIfAbsent => Some(HashSet::new()),
                ConflictPolicy::UpsertOverwrite => None,
            },
        }
    }

    /// Record a spot quote. A later quote for the same (instrument, date) replaces it.
    pub fn record_spot(&mut self, instrument: &str, date: Date, value: f64) {
        self.spots.insert((instrument.to_string(), date), value);
    }

    /// Spot for (instrument, date), if one was quoted this run.
    pub fn spot(&self, instrument: &str, date: Date) -> Option<f64> {
        self.spots.get(&(instrument.to_string(), date)).copied()
    }

    /// Number of cached spots.
    pub fn spot_count(&self) -> usize {
        self.spots.len()
    }

    /// Drop rows whose key was already written to `table` this run.
    ///
    /// Returns the remaining rows and the number dropped.
    pub fn retain_unwritten(&self, table: TableKind, rows: Vec<NormalizedRow>) -> (Vec<NormalizedRow>, usize) {
        let Some(seen) = &self.seen else {
            return (rows, 0);
        };
        let before = rows.len();
        let kept: Vec<NormalizedRow> = rows
            .into_iter()
            .filter(|row| !seen.contains(&seen_key(table, row)))
            .collect();
        let dropped = before - kept.len();
        (kept, dropped)
    }

    /// Remember the keys of rows from committed chunks of a batch.
    pub fn mark_written(&mut self, table: TableKind, rows: &[NormalizedRow], report: &SinkReport) {
        let Some(seen) = &mut self.seen else {
            return;
        };
        for (index, row) in rows.iter().enumerate() {
            if report.is_committed(index) {
                seen.insert(seen_key(table, row));
            }
        }
    }

    /// Number of remembered keys.
    pub fn written_count(&self) -> usize {
        self.seen.as_ref().map_or(0, HashSet::len)
    }
}

fn seen_key(table: TableKind, row: &NormalizedRow) -> SeenKey {
    (table, row.synthetic_id.clone(), row.observation_date.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use infra_store::ChunkFailure;

    fn date() -> Date {
        Date::from_ymd(2024, 3, 15).unwrap()
    }

    fn rows() -> Vec<NormalizedRow> {
        (1..=4)
            .map(|y| NormalizedRow::new("X", format!("X {}Y", y), 1.0, "2024-03-15"))
            .collect()
    }

    #[test]
    fn test_spot_cache_last_quote_wins() {
        let mut ctx = ProcessingContext::new(ConflictPolicy::InsertIfAbsent);
        ctx.record_spot("FR0000120271", date(), 98.0);
        ctx.record_spot("FR0000120271", date(), 99.0);
        assert_eq!(ctx.spot("FR0000120271", date()), Some(99.0));
        assert_eq!(ctx.spot("FR0000120271", Date::from_ymd(2024, 3, 16).unwrap()), None);
        assert_eq!(ctx.spot_count(), 1);
    }

    #[test]
    fn test_only_committed_rows_are_remembered() {
        let mut ctx = ProcessingContext::new(ConflictPolicy::InsertIfAbsent);
        let batch = rows();
        let report = SinkReport {
            attempted: 4,
            written: 2,
            failed: vec![ChunkFailure {
                start: 2,
                len: 2,
                error: "boom".to_string(),
            }],
        };
        ctx.mark_written(TableKind::Forward, &batch, &report);
        assert_eq!(ctx.written_count(), 2);

        let (kept, dropped) = ctx.retain_unwritten(TableKind::Forward, rows());
        assert_eq!(dropped, 2);
        assert_eq!(kept[0].synthetic_id, "X 3Y");

        // Keys are per table
        let (kept, dropped) = ctx.retain_unwritten(TableKind::Volatility, rows());
        assert_eq!((kept.len(), dropped), (4, 0));
    }

    #[test]
    fn test_upsert_overwrite_keeps_everything() {
        let mut ctx = ProcessingContext::new(ConflictPolicy::UpsertOverwrite);
        let batch = rows();
        let report = SinkReport {
            attempted: 4,
            written: 4,
            failed: Vec::new(),
        };
        ctx.mark_written(TableKind::Forward, &batch, &report);
        let (kept, dropped) = ctx.retain_unwritten(TableKind::Forward, rows());
        assert_eq!((kept.len(), dropped), (4, 0));
        assert_eq!(ctx.written_count(), 0);
    }
}
