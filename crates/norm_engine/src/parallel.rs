//! Bounded worker pool for per-group fitting.
//!
//! Groups are independent, so fitting is a plain ordered map. Workers only
//! compute; results come back to the calling thread, which does all writes.

use crate::error::EngineError;
use infra_config::ParallelConfig;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

/// Sequential or rayon-backed map over fitting jobs.
pub struct FitPool {
    pool: Option<ThreadPool>,
}

impl FitPool {
    /// Run every job on the calling thread.
    pub fn sequential() -> Self {
        Self { pool: None }
    }

    /// Dedicated pool of `workers` threads.
    pub fn new(workers: usize) -> Result<Self, EngineError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers.max(1))
            .thread_name(|i| format!("mdnorm-fit-{}", i))
            .build()
            .map_err(|e| EngineError::worker_pool(e.to_string()))?;
        Ok(Self { pool: Some(pool) })
    }

    /// Pool for the `[parallel]` section.
    pub fn from_config(config: &ParallelConfig) -> Result<Self, EngineError> {
        if config.enabled {
            Self::new(config.workers)
        } else {
            Ok(Self::sequential())
        }
    }

    /// Whether jobs run on worker threads.
    pub fn is_parallel(&self) -> bool {
        self.pool.is_some()
    }

    /// Worker threads, 1 when sequential.
    pub fn workers(&self) -> usize {
        self.pool.as_ref().map_or(1, ThreadPool::current_num_threads)
    }

    /// Map `f` over `items`, preserving order.
    pub fn map<T, R, F>(&self, items: &[T], f: F) -> Vec<R>
    where
        T: Sync,
        R: Send,
        F: Fn(&T) -> R + Sync + Send,
    {
        match &self.pool {
            Some(pool) => pool.install(|| items.par_iter().map(f).collect()),
            None => items.iter().map(f).collect(),
        }
    }
}
