//! Runtime configuration of the engine.
//!
//! The only tunable is the parallelism threshold: sums and products with more terms than the
//! threshold are differentiated and evaluated on the [`rayon`] thread pool. The threshold is read
//! once from the `SYM_PARALLELISM` environment variable, and can be changed at any time with
//! [`set_parallelism`].

use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, warn};

/// The default number of terms above which work is split across threads.
pub const DEFAULT_PARALLELISM: usize = 100;

/// The name of the environment variable the threshold is read from.
pub const PARALLELISM_ENV: &str = "SYM_PARALLELISM";

static PARALLELISM: Lazy<AtomicUsize> = Lazy::new(|| {
    let threshold = match std::env::var(PARALLELISM_ENV) {
        Ok(value) => match value.trim().parse::<usize>() {
            Ok(threshold) => {
                debug!(threshold, "read parallelism threshold from `{}`", PARALLELISM_ENV);
                threshold
            },
            Err(err) => {
                warn!(%value, %err, "invalid value for `{}`, using the default", PARALLELISM_ENV);
                DEFAULT_PARALLELISM
            },
        },
        Err(_) => DEFAULT_PARALLELISM,
    };
    AtomicUsize::new(threshold)
});

/// Returns the number of terms above which work is split across threads.
pub fn parallelism() -> usize {
    PARALLELISM.load(Ordering::Relaxed)
}

/// Sets the number of terms above which work is split across threads.
pub fn set_parallelism(threshold: usize) {
    PARALLELISM.store(threshold, Ordering::Relaxed);
}

/// Holds the parallelism threshold at a fixed value for the duration of a test.
#[cfg(test)]
pub(crate) struct ParallelismGuard {
    _lock: std::sync::MutexGuard<'static, ()>,
}

#[cfg(test)]
impl ParallelismGuard {
    /// Sets the threshold, blocking until no other test holds a guard.
    pub(crate) fn set(threshold: usize) -> Self {
        static LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

        let lock = LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        set_parallelism(threshold);
        Self { _lock: lock }
    }
}

#[cfg(test)]
impl Drop for ParallelismGuard {
    fn drop(&mut self) {
        set_parallelism(DEFAULT_PARALLELISM);
    }
}
