//! Configuration for the sync engine.

use rand::Rng;
use std::path::PathBuf;
use std::time::Duration;

/// Default location of the dataset.
pub const DEFAULT_STORE_PATH: &str = "./output/dataset.csv";

/// Configuration for sync runs.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Path of the CSV store.
    pub store_path: PathBuf,
    /// Retry policy applied by [`crate::SyncEngine::sync_with_retry`].
    pub retry: RetryConfig,
}

impl SyncConfig {
    /// Creates a new sync configuration for the given store path.
    pub fn new(store_path: impl Into<PathBuf>) -> Self {
        Self {
            store_path: store_path.into(),
            retry: RetryConfig::no_retry(),
        }
    }

    /// Sets the retry configuration.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new(DEFAULT_STORE_PATH)
    }
}

/// Policy for repeating failed sync runs.
///
/// Each attempt is a whole run. The wait before retry `n` is
/// `base_delay * 2^(n-1)`, capped at `max_delay`, plus up to a quarter of
/// that as random jitter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total runs allowed, counting the first one.
    pub max_attempts: u32,
    /// Wait before the first retry.
    pub base_delay: Duration,
    /// Upper bound on the doubled wait, before jitter.
    pub max_delay: Duration,
}

impl RetryConfig {
    /// Allows `max_attempts` runs with the default backoff.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
        }
    }

    /// A single run and no retries.
    pub fn no_retry() -> Self {
        Self::new(1)
    }

    /// Sets the wait before the first retry.
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    /// Returns true if a run failing on `attempt` (1-based) may be repeated.
    pub fn allows_retry_after(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Deterministic part of the wait before retry `retry` (1-based).
    pub fn backoff(&self, retry: u32) -> Duration {
        let doublings = retry.saturating_sub(1).min(16);
        self.base_delay
            .saturating_mul(1 << doublings)
            .min(self.max_delay)
    }

    /// Wait before retry `retry` (1-based), including jitter.
    pub fn delay_before_retry(&self, retry: u32) -> Duration {
        let backoff = self.backoff(retry);
        let jitter = rand::thread_rng().gen_range(0.0..0.25);
        backoff + backoff.mul_f64(jitter)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::new(3)
    }
}
