//! Sync command implementation.

use clap::Args;
use lnstats_source::{MempoolSource, SourceConfig};
use lnstats_sync::{RetryConfig, SyncConfig, SyncEngine};
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Options for the `sync` command.
#[derive(Args, Debug, Clone)]
pub struct SyncArgs {
    /// Base URL of the mempool.space API
    #[arg(long, env = "LNSTATS_BASE_URL", default_value = "https://mempool.space")]
    pub base_url: String,

    /// Lookback window of the statistics series
    #[arg(long, env = "LNSTATS_WINDOW", default_value = "3y")]
    pub window: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Total sync attempts when the source fails transiently
    #[arg(long, default_value_t = 1)]
    pub attempts: u32,
}

impl Default for SyncArgs {
    fn default() -> Self {
        Self {
            base_url: "https://mempool.space".into(),
            window: "3y".into(),
            timeout_secs: 30,
            attempts: 1,
        }
    }
}

impl SyncArgs {
    fn source_config(&self) -> SourceConfig {
        SourceConfig::new(&self.base_url)
            .with_window(&self.window)
            .with_timeout(Duration::from_secs(self.timeout_secs))
    }

    fn retry_config(&self) -> RetryConfig {
        if self.attempts <= 1 {
            RetryConfig::no_retry()
        } else {
            RetryConfig::new(self.attempts)
        }
    }
}

/// Runs the sync command.
pub fn run(store: &Path, args: &SyncArgs) -> Result<(), Box<dyn std::error::Error>> {
    println!("BITCOIN LIGHTNING NETWORK STATS DATASET BUILDER");
    println!();

    let source = MempoolSource::from_config(args.source_config())?;
    let config = SyncConfig::new(store).with_retry(args.retry_config());
    let engine = SyncEngine::initialize(config, source)?;

    let outcome = engine.sync_with_retry()?;
    info!(
        store = %store.display(),
        fetched = outcome.fetched_count,
        appended = outcome.appended_count,
        watermark_before = outcome.watermark_before,
        watermark_after = outcome.watermark_after,
        retries = engine.stats().retries,
        duration_ms = outcome.duration.as_millis() as u64,
        "sync finished"
    );
    if outcome.is_noop() {
        println!("No new records");
    } else {
        println!(
            "Appended {} records (watermark {} -> {})",
            outcome.appended_count, outcome.watermark_before, outcome.watermark_after
        );
    }

    println!();
    println!("The dataset has been synced successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_args_match_source_defaults() {
        let args = SyncArgs::default();
        let config = args.source_config();
        assert_eq!(config.stats_url(), SourceConfig::default().stats_url());
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(args.retry_config().max_attempts, 1);
    }

    #[test]
    fn attempts_enable_retry() {
        let args = SyncArgs {
            attempts: 4,
            ..SyncArgs::default()
        };
        assert_eq!(args.retry_config().max_attempts, 4);
    }
}
