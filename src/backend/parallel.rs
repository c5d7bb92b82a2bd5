//! Parallel batch execution on the rayon thread pool.

use super::traits::BatchExecutor;
use rayon::prelude::*;

/// Parallel implementation of `BatchExecutor`.
pub struct ParallelExecutor;

impl Default for ParallelExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl ParallelExecutor {
    pub const fn new() -> Self {
        Self
    }
}

impl BatchExecutor for ParallelExecutor {
    fn name(&self) -> &'static str {
        "parallel"
    }

    fn generate<T, F>(&self, len: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send,
    {
        // indexed collect keeps element order identical to the serial path
        (0..len).into_par_iter().map(f).collect()
    }
}
