//! Delta computation: normalize, order and filter fetched records.

use lnstats_source::StatRecord;
use tracing::{debug, warn};

/// Conversion factor from wire timestamps to stored timestamps.
pub const MILLIS_PER_SECOND: u64 = 1000;

/// A fetched record with its timestamp converted to milliseconds.
#[derive(Debug, Clone, PartialEq)]
pub struct TimestampedRecord {
    /// Unix timestamp in milliseconds.
    pub added_ms: u64,
    /// The record as received.
    pub stats: StatRecord,
}

impl TimestampedRecord {
    /// Converts a wire record, whose `added` is in seconds.
    pub fn from_wire(stats: StatRecord) -> Self {
        Self {
            added_ms: u64::from(stats.added) * MILLIS_PER_SECOND,
            stats,
        }
    }
}

/// Computes the records to append after `watermark`.
///
/// Candidates are converted to milliseconds, stably sorted ascending and
/// filtered to those strictly newer than `watermark`. If the source repeats
/// a timestamp within one batch, only the first occurrence is kept, so the
/// result is strictly increasing.
pub fn compute_delta(candidates: Vec<StatRecord>, watermark: u64) -> Vec<TimestampedRecord> {
    let mut normalized: Vec<TimestampedRecord> = candidates
        .into_iter()
        .map(TimestampedRecord::from_wire)
        .collect();
    normalized.sort_by_key(|record| record.added_ms);

    let mut delta: Vec<TimestampedRecord> = Vec::with_capacity(normalized.len());
    let mut already_stored = 0usize;
    for record in normalized {
        if record.added_ms <= watermark {
            already_stored += 1;
            continue;
        }
        if delta
            .last()
            .is_some_and(|previous| previous.added_ms == record.added_ms)
        {
            warn!(added_ms = record.added_ms, "duplicate timestamp in fetched batch, skipping");
            continue;
        }
        delta.push(record);
    }

    debug!(
        watermark,
        already_stored,
        new = delta.len(),
        "computed delta"
    );
    delta
}
