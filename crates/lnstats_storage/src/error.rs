//! Error types for storage operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The store artifact does not exist.
    #[error("store not found: {}", path.display())]
    NotFound {
        /// Location of the missing artifact.
        path: PathBuf,
    },

    /// The store path cannot name a file.
    #[error("invalid store path: {}", path.display())]
    InvalidPath {
        /// The rejected path.
        path: PathBuf,
    },
}
