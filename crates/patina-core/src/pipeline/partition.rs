//! Static assignment of work items to workers.
//!
//! Item `i` belongs to worker `i % worker_count`. Interleaving keeps runs of
//! large photographs in the manifest from landing on a single worker.

use crate::error::{PatinaError, Result};

/// Deterministic index-modulo partitioner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partitioner {
    worker_count: usize,
}

impl Partitioner {
    /// Validate `worker_count` against `1..=max_workers`.
    pub fn new(worker_count: usize, max_workers: usize) -> Result<Self> {
        if worker_count == 0 || worker_count > max_workers {
            return Err(PatinaError::InvalidWorkerCount {
                requested: i64::try_from(worker_count).unwrap_or(i64::MAX),
                max: max_workers,
            });
        }
        Ok(Self { worker_count })
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// Worker that owns the item at `index`.
    pub fn assign(&self, index: usize) -> usize {
        index % self.worker_count
    }

    /// Indices of a `len`-item list owned by `worker_id`, ascending.
    pub fn indices(&self, worker_id: usize, len: usize) -> impl Iterator<Item = usize> {
        debug_assert!(worker_id < self.worker_count);
        (worker_id..len).step_by(self.worker_count)
    }
}
