//! Configuration for the remote source.

use std::time::Duration;

/// Configuration for the mempool.space statistics endpoint.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Base URL of the API host.
    pub base_url: String,
    /// Lookback window path segment (e.g. `3y`).
    pub window: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl SourceConfig {
    /// Creates a new source configuration for the given host.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            window: "3y".into(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the lookback window.
    pub fn with_window(mut self, window: impl Into<String>) -> Self {
        self.window = window.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the full URL of the statistics endpoint.
    pub fn stats_url(&self) -> String {
        format!(
            "{}/api/v1/lightning/statistics/{}",
            self.base_url.trim_end_matches('/'),
            self.window
        )
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::new("https://mempool.space")
    }
}
