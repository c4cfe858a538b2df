//! Error types for the sync engine.

use lnstats_source::SourceError;
use lnstats_storage::StorageError;
use thiserror::Error;

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur during a sync run.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The remote source failed.
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// The store content violates its format invariants.
    #[error("corrupt store at line {line}: {reason}")]
    CorruptStore {
        /// 1-based line number of the offending line.
        line: usize,
        /// What is wrong with it.
        reason: String,
    },

    /// Directory or file creation, read or write failed.
    #[error("filesystem error: {0}")]
    Filesystem(#[from] StorageError),

    /// A run was requested while another run holds the store.
    #[error("invalid state transition from {from} to {to}")]
    InvalidStateTransition {
        /// Current state.
        from: String,
        /// Attempted target state.
        to: String,
    },
}

impl SyncError {
    /// Creates a corrupt store error.
    pub fn corrupt(line: usize, reason: impl Into<String>) -> Self {
        Self::CorruptStore {
            line,
            reason: reason.into(),
        }
    }

    /// Returns true if re-running the sync may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::Source(e) => e.is_retryable(),
            _ => false,
        }
    }
}
