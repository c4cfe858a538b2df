//! # lnstats Sync Engine
//!
//! Incremental sync of a local CSV dataset with the remote Lightning Network
//! statistics series.
//!
//! This crate provides:
//! - Store codec (header, row encoding, watermark extraction, verification)
//! - Delta computation (unit conversion, ordering, filtering)
//! - The sync engine state machine
//! - Caller-level retry policy for whole runs
//!
//! ## Run
//!
//! ```text
//! Uninitialized → Loaded → Fetched → Filtered → Persisted | NoOp
//! ```
//!
//! 1. Bootstrap the store if it does not exist
//! 2. Read the watermark (timestamp of the last stored row)
//! 3. Fetch every record the source offers
//! 4. Convert `added` from seconds to milliseconds
//! 5. Sort ascending by `added`
//! 6. Keep only records strictly newer than the watermark
//! 7. Write header (once) and new rows back as a single replacement
//!
//! ## Key Invariants
//!
//! - Stored timestamps are strictly increasing
//! - A run with nothing new leaves the store byte-identical
//! - A failed run leaves the last persisted state intact
//! - An unreadable watermark is an error, never treated as zero

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod codec;
mod config;
mod delta;
mod error;
mod state;

pub use codec::{StoreIssue, StoreReport, StoreSnapshot};
pub use config::{RetryConfig, SyncConfig, DEFAULT_STORE_PATH};
pub use delta::{compute_delta, TimestampedRecord, MILLIS_PER_SECOND};
pub use error::{SyncError, SyncResult};
pub use state::{SyncEngine, SyncOutcome, SyncState, SyncStats};
