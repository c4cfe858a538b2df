//! Sync engine state machine.

use crate::codec;
use crate::config::SyncConfig;
use crate::delta::compute_delta;
use crate::error::{SyncError, SyncResult};
use lnstats_source::{SourceError, StatsSource};
use lnstats_storage::{FileBackend, StoreBackend};
use parking_lot::{RwLock, RwLockReadGuard};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// The state of the engine within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// No run has loaded the store yet.
    Uninitialized,
    /// The store has been read and its watermark is known.
    Loaded,
    /// Candidates have been fetched from the source.
    Fetched,
    /// The delta against the watermark has been computed.
    Filtered,
    /// The delta was written to the store.
    Persisted,
    /// The run finished without changing the store.
    NoOp,
    /// The run aborted with an error.
    Failed,
}

impl SyncState {
    /// Returns true if a run is in progress.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            SyncState::Loaded | SyncState::Fetched | SyncState::Filtered
        )
    }

    /// Returns true if a run has ended, successfully or not.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SyncState::Persisted | SyncState::NoOp | SyncState::Failed
        )
    }
}

/// Statistics accumulated across runs of one engine.
#[derive(Debug, Clone, Default)]
pub struct SyncStats {
    /// Number of runs that completed successfully.
    pub runs_completed: u64,
    /// Total rows appended across runs.
    pub records_appended: u64,
    /// Number of runs repeated by the retry policy.
    pub retries: u64,
    /// Completion time of the last successful run.
    pub last_sync_time: Option<Instant>,
    /// Message of the last failed run.
    pub last_error: Option<String>,
}

/// Result of one sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Number of rows appended to the store.
    pub appended_count: usize,
    /// Number of records the source returned.
    pub fetched_count: usize,
    /// Watermark before the run.
    pub watermark_before: u64,
    /// Watermark after the run.
    pub watermark_after: u64,
    /// Wall-clock duration of the run.
    pub duration: Duration,
}

impl SyncOutcome {
    fn unchanged(fetched_count: usize, watermark: u64) -> Self {
        Self {
            appended_count: 0,
            fetched_count,
            watermark_before: watermark,
            watermark_after: watermark,
            duration: Duration::ZERO,
        }
    }

    /// Returns true if the run left the store untouched.
    pub fn is_noop(&self) -> bool {
        self.appended_count == 0
    }
}

/// Keeps a local CSV store in sync with a statistics source.
///
/// The engine exclusively owns the store for the duration of a run: one
/// read, at most one fetch and at most one whole-file write, strictly in
/// that order.
pub struct SyncEngine<B: StoreBackend, S: StatsSource> {
    config: SyncConfig,
    store: RwLock<B>,
    source: S,
    state: RwLock<SyncState>,
    stats: RwLock<SyncStats>,
}

impl<S: StatsSource> SyncEngine<FileBackend, S> {
    /// Creates an engine over the file at `config.store_path`, creating the
    /// directory and an empty store file if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Filesystem`] if the bootstrap fails.
    pub fn initialize(config: SyncConfig, source: S) -> SyncResult<Self> {
        let mut store = FileBackend::new(&config.store_path);
        if store.initialize()? {
            info!(path = %config.store_path.display(), "initialized empty dataset");
        }
        Ok(Self::new(config, store, source))
    }
}

impl<B: StoreBackend, S: StatsSource> SyncEngine<B, S> {
    /// Creates an engine without touching the store.
    pub fn new(config: SyncConfig, store: B, source: S) -> Self {
        Self {
            config,
            store: RwLock::new(store),
            source,
            state: RwLock::new(SyncState::Uninitialized),
            stats: RwLock::new(SyncStats::default()),
        }
    }

    /// Gets the current state.
    pub fn state(&self) -> SyncState {
        *self.state.read()
    }

    /// Gets the current stats.
    pub fn stats(&self) -> SyncStats {
        self.stats.read().clone()
    }

    /// Returns the configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Returns the store backend.
    pub fn store(&self) -> RwLockReadGuard<'_, B> {
        self.store.read()
    }

    /// Returns the statistics source.
    pub fn source(&self) -> &S {
        &self.source
    }

    fn set_state(&self, state: SyncState) {
        debug!(?state, "sync state");
        *self.state.write() = state;
    }

    /// Performs one sync run.
    ///
    /// # Errors
    ///
    /// Any failure aborts the run before the store is written, so the last
    /// persisted state survives and a later run resumes from it.
    pub fn sync(&self) -> SyncResult<SyncOutcome> {
        let start = Instant::now();

        let Some(mut store) = self.store.try_write() else {
            return Err(SyncError::InvalidStateTransition {
                from: format!("{:?}", self.state()),
                to: "sync".into(),
            });
        };

        match self.run(&mut *store) {
            Ok(mut outcome) => {
                outcome.duration = start.elapsed();
                let mut stats = self.stats.write();
                stats.runs_completed += 1;
                stats.records_appended += outcome.appended_count as u64;
                stats.last_sync_time = Some(Instant::now());
                stats.last_error = None;
                Ok(outcome)
            }
            Err(e) => {
                self.handle_error(&e);
                Err(e)
            }
        }
    }

    fn run(&self, store: &mut B) -> SyncResult<SyncOutcome> {
        if store.initialize()? {
            info!("initialized empty dataset");
        }

        let raw = store.read_all()?;
        let text = String::from_utf8(raw)
            .map_err(|e| SyncError::corrupt(1, format!("store is not valid UTF-8: {e}")))?;
        let snapshot = codec::parse_store(&text)?;
        self.set_state(SyncState::Loaded);
        info!(
            rows = snapshot.data_rows,
            watermark = snapshot.watermark,
            "loaded dataset"
        );

        let candidates = match self.source.fetch_lightning_stats() {
            Ok(records) => records,
            Err(SourceError::EmptyResult) => {
                warn!("source returned no records, leaving dataset untouched");
                self.set_state(SyncState::NoOp);
                return Ok(SyncOutcome::unchanged(0, snapshot.watermark));
            }
            Err(e) => return Err(e.into()),
        };
        let fetched_count = candidates.len();
        self.set_state(SyncState::Fetched);

        let delta = compute_delta(candidates, snapshot.watermark);
        self.set_state(SyncState::Filtered);

        let Some(last) = delta.last() else {
            info!("no new records");
            self.set_state(SyncState::NoOp);
            return Ok(SyncOutcome::unchanged(fetched_count, snapshot.watermark));
        };
        let watermark_after = last.added_ms;

        let content = codec::append_rows(&text, &snapshot, &delta);
        store.replace(content.as_bytes())?;
        self.set_state(SyncState::Persisted);
        info!(
            appended = delta.len(),
            watermark = watermark_after,
            "dataset updated"
        );

        Ok(SyncOutcome {
            appended_count: delta.len(),
            fetched_count,
            watermark_before: snapshot.watermark,
            watermark_after,
            duration: Duration::ZERO,
        })
    }

    /// Runs [`Self::sync`] until it succeeds, fails with a non-retryable
    /// error, or the configured attempts are exhausted.
    ///
    /// Every attempt is a complete, independent run.
    pub fn sync_with_retry(&self) -> SyncResult<SyncOutcome> {
        let retry = &self.config.retry;
        let mut attempt = 1;
        loop {
            match self.sync() {
                Ok(outcome) => return Ok(outcome),
                Err(e) if e.is_retryable() && retry.allows_retry_after(attempt) => {
                    let delay = retry.delay_before_retry(attempt);
                    warn!(error = %e, attempt, ?delay, "sync attempt failed, retrying");
                    std::thread::sleep(delay);
                    self.stats.write().retries += 1;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn handle_error(&self, error: &SyncError) {
        warn!(error = %error, "sync failed");
        self.set_state(SyncState::Failed);
        self.stats.write().last_error = Some(error.to_string());
    }
}
