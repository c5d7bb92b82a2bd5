//! Traits for batch execution backends.

/// Evaluates a per-element kernel over every index of a batch.
///
/// Implementations must call `f` exactly once per index and place the result
/// at that index; no element may observe another.
pub trait BatchExecutor {
    /// Short, stable name used in logs and configuration.
    fn name(&self) -> &'static str;

    /// Returns `vec![f(0), f(1), .., f(len - 1)]`.
    fn generate<T, F>(&self, len: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send;
}
