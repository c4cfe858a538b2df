//! In-memory store backend for testing.

use crate::backend::StoreBackend;
use crate::error::{StorageError, StorageResult};
use parking_lot::RwLock;
use std::path::PathBuf;

/// An in-memory store backend.
///
/// `None` models an artifact that does not exist yet, so the bootstrap path
/// of the sync engine can be exercised without a file system.
///
/// # Example
///
/// ```rust
/// use lnstats_storage::{StoreBackend, InMemoryBackend};
///
/// let backend = InMemoryBackend::with_data(b"added".to_vec());
/// assert!(backend.exists().unwrap());
/// assert_eq!(backend.size().unwrap(), 5);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    data: RwLock<Option<Vec<u8>>>,
}

impl InMemoryBackend {
    /// Creates a backend whose artifact does not exist yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend holding an existing artifact.
    #[must_use]
    pub fn with_data(data: Vec<u8>) -> Self {
        Self {
            data: RwLock::new(Some(data)),
        }
    }

    /// Returns a copy of the artifact, if it exists.
    #[must_use]
    pub fn data(&self) -> Option<Vec<u8>> {
        self.data.read().clone()
    }

    /// Removes the artifact.
    pub fn clear(&mut self) {
        *self.data.write() = None;
    }
}

impl StoreBackend for InMemoryBackend {
    fn exists(&self) -> StorageResult<bool> {
        Ok(self.data.read().is_some())
    }

    fn initialize(&mut self) -> StorageResult<bool> {
        let mut data = self.data.write();
        if data.is_some() {
            return Ok(false);
        }
        *data = Some(Vec::new());
        Ok(true)
    }

    fn read_all(&self) -> StorageResult<Vec<u8>> {
        self.data.read().clone().ok_or_else(|| StorageError::NotFound {
            path: PathBuf::from("<memory>"),
        })
    }

    fn replace(&mut self, new_data: &[u8]) -> StorageResult<()> {
        *self.data.write() = Some(new_data.to_vec());
        Ok(())
    }

    fn size(&self) -> StorageResult<u64> {
        Ok(self.data.read().as_ref().map_or(0, |d| d.len() as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_new_does_not_exist() {
        let backend = InMemoryBackend::new();
        assert!(!backend.exists().unwrap());
        assert_eq!(backend.size().unwrap(), 0);
        assert!(backend.data().is_none());
    }

    #[test]
    fn memory_read_missing_fails() {
        let backend = InMemoryBackend::new();
        assert!(matches!(
            backend.read_all(),
            Err(StorageError::NotFound { .. })
        ));
    }

    #[test]
    fn memory_initialize_is_idempotent() {
        let mut backend = InMemoryBackend::new();
        assert!(backend.initialize().unwrap());
        assert!(!backend.initialize().unwrap());
        assert_eq!(backend.read_all().unwrap(), b"");
    }

    #[test]
    fn memory_initialize_keeps_existing_data() {
        let mut backend = InMemoryBackend::with_data(b"preloaded".to_vec());
        assert!(!backend.initialize().unwrap());
        assert_eq!(backend.read_all().unwrap(), b"preloaded");
    }

    #[test]
    fn memory_replace() {
        let mut backend = InMemoryBackend::new();
        backend.replace(b"hello").unwrap();
        backend.replace(b"hello world").unwrap();

        assert_eq!(backend.read_all().unwrap(), b"hello world");
        assert_eq!(backend.size().unwrap(), 11);
    }

    #[test]
    fn memory_clear() {
        let mut backend = InMemoryBackend::with_data(b"some data".to_vec());
        backend.clear();
        assert!(!backend.exists().unwrap());
    }
}
