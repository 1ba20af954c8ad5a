//! # norm_engine: Market Data Normalisation Engine
//!
//! ## Layer Role
//!
//! norm_engine turns parsed extract quotes into rows on canonical grids and
//! drives the incremental run over an extract source:
//! - [`context`]: Run-scoped spot cache and written-key dedup
//! - [`builders`]: Per-(instrument, date) forward curves and volatility clouds
//! - [`evaluator`]: Method chains projecting curves and surfaces onto grids
//! - [`parallel`]: Bounded worker pool for group fitting
//! - [`rows`]: Synthetic-id labelling of grid values
//! - [`pipeline`]: Tracker gate, normalisation, chunked writes, maintenance
//! - [`report`]: Run accounting
//!
//! ## Method chains
//!
//! | Axis | Configured | Chain |
//! |------|------------|-------|
//! | Forward | `spline` | spline, monotone, linear |
//! | Forward | `monotone` | monotone, linear |
//! | Forward | `linear` | linear |
//! | Forward | `parametric` | exponential fit, monotone, linear |
//! | Volatility | `clough-tocher` | Clough-Tocher, linear triangulation |
//! | Volatility | `linear` | linear triangulation |
//!
//! ## Usage Example
//!
//! ```rust
//! use infra_config::{ConflictPolicy, EngineConfig};
//! use infra_store::{MemoryKvStore, MemoryStore};
//! use norm_engine::{Pipeline, ProcessingContext};
//!
//! let pipeline = Pipeline::open(EngineConfig::default(), MemoryStore::new(), MemoryKvStore::new()).unwrap();
//! let mut ctx = ProcessingContext::new(ConflictPolicy::InsertIfAbsent);
//!
//! let output = pipeline.process_document(
//!     "Spot;FR0000120271;100;2024-01-01\n\
//!      ForwardGrowthRate;FR0000120271 2024-12-31;0.05;2024-01-01\n\
//!      ForwardGrowthRate;FR0000120271 2025-12-31;0.05;2024-01-01\n",
//!     &mut ctx,
//! );
//! assert_eq!(output.forward[1].synthetic_id, "FR0000120271 2Y");
//! assert_eq!(output.forward[1].value, 110.517092);
//! ```

#![warn(missing_docs)]

pub mod builders;
pub mod context;
pub mod error;
pub mod evaluator;
pub mod parallel;
pub mod pipeline;
pub mod report;
pub mod rows;

pub use builders::{CurveBatch, CurveBuilder, GroupKey, SurfaceBatch, SurfaceBuilder};
pub use context::ProcessingContext;
pub use error::EngineError;
pub use evaluator::{
    AxisPolicy, CellBound, FitMethod, FittedModel, ForwardEvaluator, GridEvaluator, GridOutcome,
    VolatilityEvaluator,
};
pub use parallel::FitPool;
pub use pipeline::{enabled_tables, DocumentOutput, Pipeline};
pub use report::{DocumentStats, RunReport, StoreStatus, TableTally};
