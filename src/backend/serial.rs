//! Serial batch execution.

use super::traits::BatchExecutor;

/// Serial implementation of `BatchExecutor`. Always available.
pub struct SerialExecutor;

impl Default for SerialExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl SerialExecutor {
    pub const fn new() -> Self {
        Self
    }
}

impl BatchExecutor for SerialExecutor {
    fn name(&self) -> &'static str {
        "serial"
    }

    fn generate<T, F>(&self, len: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send,
    {
        (0..len).map(f).collect()
    }
}
