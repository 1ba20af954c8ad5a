//! # infra_store: Persistence for Normalised Market Data
//!
//! ## Layer Role
//!
//! Infrastructure layer below the normalisation engine:
//! - [`table`]: Destination tables, output rows and the [`TableStore`] trait
//! - [`sqlite`]: SQLite store (bundled SQLite, WAL journal)
//! - [`memory`]: In-memory store with identical constraint semantics
//! - [`sink`]: Chunked writes under a conflict policy, scheduled compaction
//! - [`kv`]: String-keyed JSON stores backing the file tracker
//! - [`tracker`]: Processed-file gate
//!
//! ## Usage Example
//!
//! ```rust
//! use infra_config::ConflictPolicy;
//! use infra_store::{MemoryStore, NormalizedRow, TableKind, TableStore, UpsertSink};
//!
//! let mut store = MemoryStore::new();
//! store.ensure_table(TableKind::Forward).unwrap();
//!
//! let sink = UpsertSink::new(ConflictPolicy::InsertIfAbsent);
//! let rows = vec![NormalizedRow::new("FR0000120271", "FR0000120271 1Y", 101.2, "2024-03-15")];
//!
//! assert_eq!(sink.write(&mut store, TableKind::Forward, &rows).written, 1);
//! assert_eq!(sink.write(&mut store, TableKind::Forward, &rows).written, 0);
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod kv;
pub mod memory;
pub mod sink;
pub mod sqlite;
pub mod table;
pub mod tracker;

pub use error::StoreError;
pub use kv::{JsonFileStore, KeyValueStore, MemoryKvStore};
pub use memory::MemoryStore;
pub use sink::{compact_tables, ChunkFailure, SinkReport, UpsertSink, DEFAULT_CHUNK_SIZE};
pub use sqlite::SqliteStore;
pub use table::{NormalizedRow, TableKind, TableStore};
pub use tracker::{FileMarker, IncrementalFileTracker};
