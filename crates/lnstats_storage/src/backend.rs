//! Store backend trait definition.

use crate::error::StorageResult;

/// A whole-artifact store backend.
///
/// Backends hold the complete dataset as one byte blob. There is no partial
/// read or streaming append: the sync engine reads the whole artifact, builds
/// the new content and hands it back through [`StoreBackend::replace`].
///
/// # Invariants
///
/// - Constructing a backend never touches the underlying medium
/// - `initialize` never modifies an artifact that already exists
/// - After `replace` returns, `read_all` returns exactly the replaced bytes
/// - A failed `replace` leaves the previous content readable
///
/// # Implementors
///
/// - [`super::InMemoryBackend`] - For testing
/// - [`super::FileBackend`] - For persistent storage
pub trait StoreBackend: Send + Sync {
    /// Returns true if the artifact exists.
    ///
    /// # Errors
    ///
    /// Returns an error if existence cannot be determined.
    fn exists(&self) -> StorageResult<bool>;

    /// Ensures the artifact (and anything containing it) exists.
    ///
    /// Creates an empty artifact if it is missing. Returns `true` if the
    /// artifact was created by this call and `false` if it was already there.
    ///
    /// # Errors
    ///
    /// Returns an error if a directory or the artifact cannot be created.
    fn initialize(&mut self) -> StorageResult<bool>;

    /// Reads the complete content of the artifact.
    ///
    /// # Errors
    ///
    /// Returns [`crate::StorageError::NotFound`] if the artifact does not
    /// exist, or an I/O error.
    fn read_all(&self) -> StorageResult<Vec<u8>>;

    /// Replaces the complete content of the artifact in a single step.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails. The previous content is retained.
    fn replace(&mut self, data: &[u8]) -> StorageResult<()>;

    /// Returns the current size of the artifact in bytes, or 0 if it does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be determined.
    fn size(&self) -> StorageResult<u64>;
}
