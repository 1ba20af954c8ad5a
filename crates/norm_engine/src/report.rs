//! Run and per-document accounting.

use infra_store::{SinkReport, TableKind};
use std::collections::BTreeMap;
use std::fmt;

/// Counters from normalising one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentStats {
    /// Decoded quotes
    pub quotes: usize,
    /// Lines with a known tag that failed to decode
    pub malformed_lines: usize,
    /// Lines with an unknown tag
    pub unrecognised_lines: usize,
    /// Points dropped while building curves and surfaces
    pub dropped_points: usize,
    /// Groups that emitted nothing: too few usable points or no method succeeded
    pub groups_discarded: usize,
    /// Groups for which every method failed, also counted as discarded
    pub groups_unfitted: usize,
    /// Accepted method per group, keyed `axis/method`
    pub methods: BTreeMap<String, usize>,
}

impl DocumentStats {
    /// Count one group resolved by `method` on `axis`.
    ///
    /// A group no method could fit counts as unfitted and discarded.
    pub fn record_method(&mut self, axis: &str, method: Option<&str>) {
        match method {
            Some(name) => *self.methods.entry(format!("{}/{}", axis, name)).or_default() += 1,
            None => {
                self.groups_unfitted += 1;
                self.groups_discarded += 1;
            }
        }
    }
}

/// Write counters for one table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableTally {
    /// Rows produced by normalisation
    pub generated: usize,
    /// Rows dropped before the sink because this run already wrote their key
    pub deduplicated: usize,
    /// Rows inserted or updated
    pub written: usize,
    /// Chunks rolled back
    pub failed_chunks: usize,
    /// Rows in rolled-back chunks
    pub failed_rows: usize,
}

/// Outcome of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    /// Extracts found by discovery
    pub files_discovered: usize,
    /// Extracts skipped by the tracker
    pub files_skipped: usize,
    /// Extracts normalised and marked processed
    pub files_processed: usize,
    /// Extracts that could not be read
    pub files_failed: usize,
    /// Totals over processed documents
    pub documents: DocumentStats,
    /// Per-table write counters
    pub tables: BTreeMap<TableKind, TableTally>,
    /// Wall time
    pub elapsed_ms: u64,
}

impl RunReport {
    /// Add one document's counters.
    pub fn absorb(&mut self, stats: &DocumentStats) {
        let d = &mut self.documents;
        d.quotes += stats.quotes;
        d.malformed_lines += stats.malformed_lines;
        d.unrecognised_lines += stats.unrecognised_lines;
        d.dropped_points += stats.dropped_points;
        d.groups_discarded += stats.groups_discarded;
        d.groups_unfitted += stats.groups_unfitted;
        for (method, n) in &stats.methods {
            *d.methods.entry(method.clone()).or_default() += n;
        }
    }

    /// Add one batch written to `table`.
    pub fn record_batch(&mut self, table: TableKind, generated: usize, deduplicated: usize, sink: &SinkReport) {
        let tally = self.tables.entry(table).or_default();
        tally.generated += generated;
        tally.deduplicated += deduplicated;
        tally.written += sink.written;
        tally.failed_chunks += sink.failed.len();
        tally.failed_rows += sink.failed_rows();
    }

    /// Counters for `table`, zero if nothing was written to it.
    pub fn tally(&self, table: TableKind) -> TableTally {
        self.tables.get(&table).copied().unwrap_or_default()
    }

    /// Rows written across all tables.
    pub fn rows_written(&self) -> usize {
        self.tables.values().map(|t| t.written).sum()
    }

    /// Failed chunks across all tables.
    pub fn failed_chunks(&self) -> usize {
        self.tables.values().map(|t| t.failed_chunks).sum()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Files: {} discovered, {} processed, {} skipped, {} failed",
            self.files_discovered, self.files_processed, self.files_skipped, self.files_failed
        )?;
        let d = &self.documents;
        writeln!(
            f,
            "Lines: {} quotes, {} malformed, {} unrecognised",
            d.quotes, d.malformed_lines, d.unrecognised_lines
        )?;
        writeln!(
            f,
            "Groups: {} discarded, {} unfitted, {} points dropped",
            d.groups_discarded, d.groups_unfitted, d.dropped_points
        )?;
        for (method, n) in &d.methods {
            writeln!(f, "  {:<28} {:>8}", method, n)?;
        }
        for (table, t) in &self.tables {
            writeln!(
                f,
                "{:<30} generated {:>8}  written {:>8}  deduplicated {:>8}  failed chunks {:>4}",
                table.table_name(),
                t.generated,
                t.written,
                t.deduplicated,
                t.failed_chunks
            )?;
        }
        write!(f, "Elapsed: {} ms", self.elapsed_ms)
    }
}

/// Tracker and table sizes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStatus {
    /// Tracked extract files
    pub tracked_files: usize,
    /// Row count per enabled table
    pub tables: Vec<(TableKind, usize)>,
}

impl fmt::Display for StoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tracked files: {}", self.tracked_files)?;
        for (table, rows) in &self.tables {
            write!(f, "\n{:<30} {:>10} rows", table.table_name(), rows)?;
        }
        Ok(())
    }
}
