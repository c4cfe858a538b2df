//! Source abstraction for statistics fetches.

use crate::error::{SourceError, SourceResult};
use crate::record::StatRecord;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// A source of Lightning Network statistics.
///
/// This trait abstracts the remote API, allowing the sync engine to run
/// against mempool.space in production and a [`MockSource`] in tests.
pub trait StatsSource: Send + Sync {
    /// Fetches every record the source currently offers.
    ///
    /// The returned list is non-empty and in no particular order. Each
    /// record's `added` field is in seconds.
    fn fetch_lightning_stats(&self) -> SourceResult<Vec<StatRecord>>;
}

impl<S: StatsSource + ?Sized> StatsSource for &S {
    fn fetch_lightning_stats(&self) -> SourceResult<Vec<StatRecord>> {
        (**self).fetch_lightning_stats()
    }
}

/// A scripted source for testing.
///
/// Returns the configured records or error on every fetch. An empty record
/// list behaves like the real adapter and yields [`SourceError::EmptyResult`].
#[derive(Debug, Default)]
pub struct MockSource {
    response: Mutex<Option<SourceResult<Vec<StatRecord>>>>,
    fetches: AtomicU64,
}

impl MockSource {
    /// Creates a mock with no response set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mock that returns the given records.
    pub fn with_records(records: Vec<StatRecord>) -> Self {
        let source = Self::new();
        source.set_records(records);
        source
    }

    /// Creates a mock that fails with the given error.
    pub fn with_error(error: SourceError) -> Self {
        let source = Self::new();
        source.set_error(error);
        source
    }

    /// Sets the records returned by subsequent fetches.
    pub fn set_records(&self, records: Vec<StatRecord>) {
        *self.response.lock() = Some(Ok(records));
    }

    /// Sets the error returned by subsequent fetches.
    pub fn set_error(&self, error: SourceError) {
        *self.response.lock() = Some(Err(error));
    }

    /// Returns the number of fetches performed.
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl StatsSource for MockSource {
    fn fetch_lightning_stats(&self) -> SourceResult<Vec<StatRecord>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        match self.response.lock().clone() {
            Some(Ok(records)) if records.is_empty() => Err(SourceError::EmptyResult),
            Some(result) => result,
            None => Err(SourceError::transport_fatal("no mock response set")),
        }
    }
}
