//! Incremental normalisation pipeline.
//!
//! ```text
//! ExtractSource ─► tracker gate ─► RecordParser ─► CurveBuilder / SurfaceBuilder
//!                                                        │
//!        store ◄─ UpsertSink ◄─ rows ◄─ GridEvaluator ◄──┘
//! ```
//!
//! One file is processed at a time. Its rows are written table by table and
//! the tracker is flushed as soon as the file is done, so an interrupted run
//! leaves at most the in-flight file to be retried.

use crate::builders::{CurveBuilder, SurfaceBuilder};
use crate::context::ProcessingContext;
use crate::error::EngineError;
use crate::evaluator::{ForwardEvaluator, VolatilityEvaluator};
use crate::parallel::FitPool;
use crate::report::{DocumentStats, RunReport, StoreStatus};
use crate::rows::{forward_rows, raw_forward_rows, raw_volatility_rows, spot_rows, volatility_rows};
use adapter_extract::{decode_text, fingerprint, ExtractEntry, ExtractSource, RawQuote, RecordParser};
use infra_config::EngineConfig;
use infra_store::{compact_tables, IncrementalFileTracker, KeyValueStore, NormalizedRow, TableKind, TableStore, UpsertSink};
use norm_core::market_data::{forward_grid, volatility_grid};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Rows and counters produced from one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentOutput {
    /// Normalised forward rows
    pub forward: Vec<NormalizedRow>,
    /// Normalised volatility rows
    pub volatility: Vec<NormalizedRow>,
    /// Spot rows, empty unless the spot table is enabled
    pub spot: Vec<NormalizedRow>,
    /// Raw forward rows, empty unless the raw forward table is enabled
    pub raw_forward: Vec<NormalizedRow>,
    /// Raw volatility rows, empty unless the raw volatility table is enabled
    pub raw_volatility: Vec<NormalizedRow>,
    /// Parse and build counters
    pub stats: DocumentStats,
}

impl DocumentOutput {
    /// Rows bound for `table`.
    pub fn rows(&self, table: TableKind) -> &[NormalizedRow] {
        match table {
            TableKind::Forward => &self.forward,
            TableKind::Volatility => &self.volatility,
            TableKind::Spot => &self.spot,
            TableKind::RawForward => &self.raw_forward,
            TableKind::RawVolatility => &self.raw_volatility,
        }
    }

    fn take(&mut self, table: TableKind) -> Vec<NormalizedRow> {
        match table {
            TableKind::Forward => std::mem::take(&mut self.forward),
            TableKind::Volatility => std::mem::take(&mut self.volatility),
            TableKind::Spot => std::mem::take(&mut self.spot),
            TableKind::RawForward => std::mem::take(&mut self.raw_forward),
            TableKind::RawVolatility => std::mem::take(&mut self.raw_volatility),
        }
    }
}

/// Tables written under `config`, in creation order.
pub fn enabled_tables(config: &EngineConfig) -> Vec<TableKind> {
    TableKind::ALL
        .into_iter()
        .filter(|table| match table {
            TableKind::Forward => config.forward.enabled,
            TableKind::Volatility => config.volatility.enabled,
            TableKind::Spot => config.spot.enabled,
            TableKind::RawForward => config.raw.forward,
            TableKind::RawVolatility => config.raw.volatility,
        })
        .collect()
}

/// Orchestrates extract discovery, normalisation and persistence.
///
/// # Example
///
/// ```
/// use adapter_extract::MemorySource;
/// use infra_config::EngineConfig;
/// use infra_store::{MemoryKvStore, MemoryStore, TableKind};
/// use norm_engine::Pipeline;
///
/// let extract = "\
/// Forward;FR0000120271 2024-12-31;101.5;2024-01-01
/// Forward;FR0000120271 2025-12-31;103.0;2024-01-01
/// ";
/// let source = MemorySource::new().with_file("2024-01-01.md", extract);
///
/// let mut pipeline = Pipeline::open(EngineConfig::default(), MemoryStore::new(), MemoryKvStore::new()).unwrap();
/// let report = pipeline.run(&source, false).unwrap();
///
/// assert_eq!(report.files_processed, 1);
/// assert_eq!(report.tally(TableKind::Forward).written, 10);
/// assert!(pipeline.tracker().is_tracked("2024-01-01.md"));
/// ```
pub struct Pipeline<S: TableStore, K: KeyValueStore> {
    config: EngineConfig,
    store: S,
    tracker: IncrementalFileTracker<K>,
    sink: UpsertSink,
    forward: Option<ForwardEvaluator>,
    volatility: Option<VolatilityEvaluator>,
    pool: FitPool,
    parser: RecordParser,
    tables: Vec<TableKind>,
}

impl<S: TableStore, K: KeyValueStore> Pipeline<S, K> {
    /// Prepare the enabled tables and load the tracker.
    ///
    /// Fails if the store cannot create a table or the tracker cannot be read.
    pub fn open(config: EngineConfig, mut store: S, kv: K) -> Result<Self, EngineError> {
        let tables = enabled_tables(&config);
        for &table in &tables {
            store.ensure_table(table)?;
        }
        let tracker = IncrementalFileTracker::open(kv)?;
        let pool = FitPool::from_config(&config.parallel)?;
        let sink = UpsertSink::from_config(&config.store);

        let forward = config
            .forward
            .enabled
            .then(|| ForwardEvaluator::forward(config.forward.method));
        let volatility = config
            .volatility
            .enabled
            .then(|| VolatilityEvaluator::volatility(config.volatility.method));

        info!(
            tables = tables.len(),
            tracked = tracker.len(),
            policy = %sink.policy(),
            workers = pool.workers(),
            "Pipeline ready"
        );

        Ok(Self {
            config,
            store,
            tracker,
            sink,
            forward,
            volatility,
            pool,
            parser: RecordParser::new(),
            tables,
        })
    }

    /// Configuration in force.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Enabled tables.
    pub fn tables(&self) -> &[TableKind] {
        &self.tables
    }

    /// Destination store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Processed-file tracker.
    pub fn tracker(&self) -> &IncrementalFileTracker<K> {
        &self.tracker
    }

    /// Release the store and the tracker's key-value store.
    pub fn into_parts(self) -> (S, K) {
        (self.store, self.tracker.into_store())
    }

    /// Tracked files and row counts of the enabled tables.
    pub fn status(&self) -> Result<StoreStatus, EngineError> {
        let mut tables = Vec::with_capacity(self.tables.len());
        for &table in &self.tables {
            tables.push((table, self.store.count(table)?));
        }
        Ok(StoreStatus {
            tracked_files: self.tracker.len(),
            tables,
        })
    }

    /// Clear and compact every enabled table, then forget every tracked file.
    pub fn reset(&mut self) -> Result<(), EngineError> {
        for &table in &self.tables {
            let removed = self.store.delete_all(table)?;
            info!(table = %table, rows = removed, "Cleared table");
        }
        compact_tables(&mut self.store, &self.tables);
        self.tracker.reset()?;
        info!("Tracker reset");
        Ok(())
    }

    /// Process every untracked extract of `source`.
    ///
    /// With `reset`, tables and tracker are cleared first and every extract
    /// is processed. Only discovery and reset failures abort the run.
    pub fn run<X: ExtractSource + ?Sized>(&mut self, source: &X, reset: bool) -> Result<RunReport, EngineError> {
        let started = Instant::now();
        if reset {
            self.reset()?;
        }

        let entries = source.discover()?;
        let mut report = RunReport {
            files_discovered: entries.len(),
            ..RunReport::default()
        };
        let mut ctx = ProcessingContext::new(self.sink.policy());
        info!(files = entries.len(), reset, "Starting run");

        for entry in &entries {
            self.visit(source, entry, &mut ctx, &mut report);
        }

        self.sink.finish(&mut self.store, &self.tables);
        report.elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        info!(
            processed = report.files_processed,
            skipped = report.files_skipped,
            failed = report.files_failed,
            rows = report.rows_written(),
            failed_chunks = report.failed_chunks(),
            elapsed_ms = report.elapsed_ms,
            "Run complete"
        );
        Ok(report)
    }

    fn visit<X: ExtractSource + ?Sized>(
        &mut self,
        source: &X,
        entry: &ExtractEntry,
        ctx: &mut ProcessingContext,
        report: &mut RunReport,
    ) {
        let name = entry.name.as_str();
        let tracked = self.tracker.is_tracked(name);
        if tracked && !self.config.tracker.reprocess_changed {
            debug!(file = name, "Already processed");
            report.files_skipped += 1;
            return;
        }

        let bytes = match source.read(entry) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(file = name, error = %e, "Cannot read extract, will retry next run");
                report.files_failed += 1;
                return;
            }
        };

        let digest = fingerprint(&bytes);
        if tracked && !self.tracker.has_changed(name, &digest) {
            debug!(file = name, "Already processed, content unchanged");
            report.files_skipped += 1;
            return;
        }

        let text = decode_text(&bytes);
        let mut output = self.process_document(&text, ctx);
        report.absorb(&output.stats);

        for &table in &self.tables {
            let rows = output.take(table);
            let generated = rows.len();
            let (rows, deduplicated) = ctx.retain_unwritten(table, rows);
            let written = self.sink.write(&mut self.store, table, &rows);
            ctx.mark_written(table, &rows, &written);
            report.record_batch(table, generated, deduplicated, &written);
        }

        if let Err(e) = self.tracker.mark_processed(name, &digest) {
            warn!(file = name, error = %e, "Cannot record processed extract");
        }
        report.files_processed += 1;
        info!(
            file = name,
            quotes = output.stats.quotes,
            malformed = output.stats.malformed_lines,
            "Processed extract"
        );

        self.sink.file_completed(&mut self.store, &self.tables);
    }

    /// Normalise one document.
    ///
    /// Spot quotes are recorded in `ctx` before any curve is built, so a
    /// growth rate can use a spot quoted anywhere in the same document or
    /// earlier in the run.
    pub fn process_document(&self, text: &str, ctx: &mut ProcessingContext) -> DocumentOutput {
        let parsed = self.parser.parse_document(text);
        let mut output = DocumentOutput {
            stats: DocumentStats {
                quotes: parsed.quotes.len(),
                malformed_lines: parsed.malformed,
                unrecognised_lines: parsed.unrecognised,
                ..DocumentStats::default()
            },
            ..DocumentOutput::default()
        };

        for quote in &parsed.quotes {
            if let RawQuote::Spot(spot) = quote {
                ctx.record_spot(&spot.instrument, spot.date, spot.value);
            }
        }

        if let Some(evaluator) = &self.forward {
            let batch = CurveBuilder::new().build(&parsed.quotes, ctx);
            output.stats.dropped_points += batch.dropped_points;
            output.stats.groups_discarded += batch.discarded_groups;

            let grid = forward_grid();
            let outcomes = self
                .pool
                .map(&batch.curves, |(_, curve)| evaluator.evaluate(curve, &grid));

            for ((key, _), outcome) in batch.curves.iter().zip(&outcomes) {
                debug!(group = %key, method = ?outcome.method, cells = outcome.emitted(), "Forward curve");
                output.stats.record_method("forward", outcome.method);
                output.forward.extend(forward_rows(key, outcome));
            }
        }

        if let Some(evaluator) = &self.volatility {
            let batch = SurfaceBuilder::new().build(&parsed.quotes);
            output.stats.dropped_points += batch.dropped_points;
            output.stats.groups_discarded += batch.discarded_groups;

            let cells = volatility_grid();
            let grid: Vec<[f64; 2]> = cells.iter().map(|c| c.coordinates()).collect();
            let outcomes = self
                .pool
                .map(&batch.surfaces, |(_, surface)| evaluator.evaluate(surface, &grid));

            for ((key, _), outcome) in batch.surfaces.iter().zip(&outcomes) {
                debug!(group = %key, method = ?outcome.method, cells = outcome.emitted(), "Volatility surface");
                output.stats.record_method("volatility", outcome.method);
                output.volatility.extend(volatility_rows(key, &cells, outcome));
            }
        }

        if self.config.spot.enabled {
            output.spot = spot_rows(&parsed.quotes);
        }
        if self.config.raw.forward {
            output.raw_forward = raw_forward_rows(&parsed.quotes, ctx);
        }
        if self.config.raw.volatility {
            output.raw_volatility = raw_volatility_rows(&parsed.quotes);
        }
        output
    }
}
