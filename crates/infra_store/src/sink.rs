//! Chunked, policy-driven writes of normalised rows.
//!
//! Each batch (one file × one table) is split into fixed-size chunks and each
//! chunk is committed in its own transaction. A failing chunk is recorded in
//! the [`SinkReport`] and skipped; earlier and later chunks still commit.

use crate::table::{NormalizedRow, TableKind, TableStore};
use infra_config::{ConflictPolicy, StoreConfig};
use tracing::{debug, info, warn};

/// Rows per transaction unless configured otherwise.
pub const DEFAULT_CHUNK_SIZE: usize = 500;

/// A chunk that was not committed.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkFailure {
    /// Index of the first row of the chunk within the batch
    pub start: usize,
    /// Rows in the chunk
    pub len: usize,
    /// Store error message
    pub error: String,
}

/// Outcome of writing one batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SinkReport {
    /// Rows handed to the sink
    pub attempted: usize,
    /// Rows inserted (or updated, under upsert-overwrite)
    pub written: usize,
    /// Chunks that were rolled back
    pub failed: Vec<ChunkFailure>,
}

impl SinkReport {
    /// True when every chunk committed.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    /// Rows lost to failed chunks.
    pub fn failed_rows(&self) -> usize {
        self.failed.iter().map(|f| f.len).sum()
    }

    /// Whether the row at `index` of the batch belongs to a committed chunk.
    pub fn is_committed(&self, index: usize) -> bool {
        index < self.attempted
            && !self
                .failed
                .iter()
                .any(|f| index >= f.start && index < f.start + f.len)
    }
}

/// Batches rows into a [`TableStore`] and schedules maintenance.
#[derive(Debug, Clone)]
pub struct UpsertSink {
    chunk_size: usize,
    policy: ConflictPolicy,
    compact_every: usize,
    compact_at_end: bool,
    files_since_compaction: usize,
}

impl UpsertSink {
    /// Sink with the default chunk size and no scheduled maintenance.
    pub fn new(policy: ConflictPolicy) -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            policy,
            compact_every: 0,
            compact_at_end: false,
            files_since_compaction: 0,
        }
    }

    /// Sink configured from the `[store]` section.
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.conflict_policy)
            .with_chunk_size(config.chunk_size)
            .with_compaction(config.compact_every, config.compact_at_end)
    }

    /// Set rows per transaction (at least 1).
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Compact after every `every` files (0 disables) and optionally at the end of a run.
    pub fn with_compaction(mut self, every: usize, at_end: bool) -> Self {
        self.compact_every = every;
        self.compact_at_end = at_end;
        self
    }

    /// Conflict policy in force.
    pub fn policy(&self) -> ConflictPolicy {
        self.policy
    }

    /// Rows per transaction.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Write one batch to `table`.
    pub fn write<S: TableStore + ?Sized>(
        &self,
        store: &mut S,
        table: TableKind,
        rows: &[NormalizedRow],
    ) -> SinkReport {
        let mut report = SinkReport {
            attempted: rows.len(),
            ..SinkReport::default()
        };

        for (index, chunk) in rows.chunks(self.chunk_size).enumerate() {
            let start = index * self.chunk_size;
            let result = match self.policy {
                ConflictPolicy::InsertIfAbsent => store.insert_ignore(table, chunk),
                ConflictPolicy::UpsertOverwrite => store.upsert(table, chunk),
            };
            match result {
                Ok(n) => report.written += n,
                Err(e) => {
                    warn!(
                        table = %table,
                        start,
                        rows = chunk.len(),
                        error = %e,
                        "Chunk write failed, skipping chunk"
                    );
                    report.failed.push(ChunkFailure {
                        start,
                        len: chunk.len(),
                        error: e.to_string(),
                    });
                }
            }
        }

        debug!(
            table = %table,
            attempted = report.attempted,
            written = report.written,
            failed_chunks = report.failed.len(),
            "Batch written"
        );
        report
    }

    /// Record a completed file; compacts `tables` when the file count reaches
    /// the configured interval. Returns whether compaction ran.
    pub fn file_completed<S: TableStore + ?Sized>(&mut self, store: &mut S, tables: &[TableKind]) -> bool {
        self.files_since_compaction += 1;
        if self.compact_every == 0 || self.files_since_compaction < self.compact_every {
            return false;
        }
        self.files_since_compaction = 0;
        compact_tables(store, tables);
        true
    }

    /// End-of-run maintenance. Returns whether compaction ran.
    pub fn finish<S: TableStore + ?Sized>(&mut self, store: &mut S, tables: &[TableKind]) -> bool {
        self.files_since_compaction = 0;
        if !self.compact_at_end {
            return false;
        }
        compact_tables(store, tables);
        true
    }
}

/// Compact each table, logging failures without propagating them.
pub fn compact_tables<S: TableStore + ?Sized>(store: &mut S, tables: &[TableKind]) {
    for &table in tables {
        match store.compact(table) {
            Ok(()) => info!(table = %table, "Compacted table"),
            Err(e) => warn!(table = %table, error = %e, "Table maintenance failed"),
        }
    }
}
