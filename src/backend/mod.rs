//! Batch execution backends
//!
//! Every batched operation funnels its per-element kernel through [`execute`],
//! which dispatches to the backend chosen at configuration time. The serial
//! backend is always compiled in; the rayon backend needs the `parallel`
//! feature. Both produce identical results.

pub mod serial;
pub mod traits;

#[cfg(feature = "parallel")]
pub mod parallel;

pub use serial::SerialExecutor;
pub use traits::BatchExecutor;

#[cfg(feature = "parallel")]
pub use parallel::ParallelExecutor;

use crate::errors::HomogError;
use core::str::FromStr;
use std::sync::OnceLock;

/// Execution backends known to this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Serial,
    #[cfg(feature = "parallel")]
    Parallel,
}

impl Backend {
    pub const fn name(self) -> &'static str {
        match self {
            Backend::Serial => "serial",
            #[cfg(feature = "parallel")]
            Backend::Parallel => "parallel",
        }
    }
}

impl Default for Backend {
    fn default() -> Self {
        #[cfg(feature = "parallel")]
        {
            Backend::Parallel
        }
        #[cfg(not(feature = "parallel"))]
        {
            Backend::Serial
        }
    }
}

impl FromStr for Backend {
    type Err = HomogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "serial" => Ok(Backend::Serial),
            #[cfg(feature = "parallel")]
            "parallel" => Ok(Backend::Parallel),
            other => Err(HomogError::BackendUnavailable(other.to_string())),
        }
    }
}

static BACKEND_CELL: OnceLock<Backend> = OnceLock::new();

/// Returns the active backend, selecting it on first use.
///
/// Without an explicit [`set_backend`] call this honours the build-time
/// `HOMOG_BACKEND` env var, then falls back to [`Backend::default`].
pub fn backend() -> Backend {
    *BACKEND_CELL.get_or_init(|| {
        let selected = match option_env!("HOMOG_BACKEND") {
            Some(name) => match Backend::from_str(name) {
                Ok(backend) => backend,
                Err(error) => {
                    tracing::warn!(%error, "ignoring HOMOG_BACKEND");
                    Backend::default()
                },
            },
            None => Backend::default(),
        };
        tracing::info!(backend = selected.name(), "selected batch execution backend");
        selected
    })
}

/// Select the backend once, before the first batched call.
///
/// Returns the backend that is actually active, which differs from `requested`
/// when a backend was already selected.
pub fn set_backend(requested: Backend) -> Backend {
    let active = *BACKEND_CELL.get_or_init(|| {
        tracing::info!(backend = requested.name(), "selected batch execution backend");
        requested
    });
    if active != requested {
        tracing::warn!(
            requested = requested.name(),
            active = active.name(),
            "execution backend already selected"
        );
    }
    active
}

/// Run `f` for every index in `0..len` on the active backend.
pub fn execute<T, F>(len: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    match backend() {
        Backend::Serial => run(&SerialExecutor::new(), len, f),
        #[cfg(feature = "parallel")]
        Backend::Parallel => run(&ParallelExecutor::new(), len, f),
    }
}

fn run<E, T, F>(executor: &E, len: usize, f: F) -> Vec<T>
where
    E: BatchExecutor,
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    tracing::trace!(executor = executor.name(), len, "evaluating batch kernel");
    executor.generate(len, f)
}
