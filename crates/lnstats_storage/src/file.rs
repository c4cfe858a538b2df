//! File-based store backend for persistent storage.

use crate::backend::StoreBackend;
use crate::error::{StorageError, StorageResult};
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Suffix appended to the store file name for the staging file.
const TEMP_SUFFIX: &str = ".tmp";

/// A file-based store backend.
///
/// Holds no open handle; every operation goes to the file system, so a
/// replaced file is always re-read from its new inode.
///
/// # Durability
///
/// `replace` uses the write-then-rename pattern:
/// 1. Write the new content to `<name>.tmp` next to the store
/// 2. Sync the temporary file to disk
/// 3. Rename the temporary file over the store
/// 4. Fsync the parent directory so the rename is durable
///
/// A process killed at any point leaves either the old or the new content.
///
/// # Example
///
/// ```no_run
/// use lnstats_storage::{StoreBackend, FileBackend};
///
/// let mut backend = FileBackend::new("output/dataset.csv");
/// backend.initialize().unwrap();
/// backend.replace(b"added,channel_count").unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    /// Creates a backend for the given path without touching the file system.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the store file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the directory holding the store file.
    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    fn temp_path(&self) -> StorageResult<PathBuf> {
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| StorageError::InvalidPath {
                path: self.path.clone(),
            })?;
        let mut temp_name = OsString::from(file_name);
        temp_name.push(TEMP_SUFFIX);
        Ok(self.parent_dir().join(temp_name))
    }

    /// Syncs the parent directory so metadata updates are durable.
    #[cfg(unix)]
    fn sync_directory(&self) -> StorageResult<()> {
        let dir = File::open(self.parent_dir())?;
        dir.sync_all()?;
        Ok(())
    }

    #[cfg(not(unix))]
    fn sync_directory(&self) -> StorageResult<()> {
        // NTFS journals metadata; directory handles cannot be fsynced
        Ok(())
    }
}

impl StoreBackend for FileBackend {
    fn exists(&self) -> StorageResult<bool> {
        Ok(self.path.try_exists()?)
    }

    fn initialize(&mut self) -> StorageResult<bool> {
        if self.path.file_name().is_none() {
            return Err(StorageError::InvalidPath {
                path: self.path.clone(),
            });
        }

        let dir = self.parent_dir();
        if !dir.try_exists()? {
            debug!(dir = %dir.display(), "creating store directory");
            fs::create_dir_all(dir)?;
        }

        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(file) => {
                file.sync_all()?;
                drop(file);
                self.sync_directory()?;
                debug!(path = %self.path.display(), "created empty store");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn read_all(&self) -> StorageResult<Vec<u8>> {
        fs::read(&self.path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StorageError::NotFound {
                path: self.path.clone(),
            },
            _ => StorageError::Io(e),
        })
    }

    fn replace(&mut self, data: &[u8]) -> StorageResult<()> {
        let temp_path = self.temp_path()?;

        let mut file = File::create(&temp_path)?;
        if let Err(e) = file.write_all(data).and_then(|()| file.sync_all()) {
            drop(file);
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
        drop(file);

        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        self.sync_directory()?;
        debug!(path = %self.path.display(), bytes = data.len(), "store replaced");
        Ok(())
    }

    fn size(&self) -> StorageResult<u64> {
        match fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn new_has_no_side_effects() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("dataset.csv");

        let backend = FileBackend::new(&path);
        assert!(!backend.exists().unwrap());
        assert!(!dir.path().join("nested").exists());
    }

    #[test]
    fn initialize_creates_dirs_and_empty_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("path").join("dataset.csv");

        let mut backend = FileBackend::new(&path);
        assert!(backend.initialize().unwrap());
        assert!(path.exists());
        assert_eq!(backend.size().unwrap(), 0);
    }

    #[test]
    fn initialize_leaves_existing_file_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dataset.csv");
        fs::write(&path, b"existing content").unwrap();

        let mut backend = FileBackend::new(&path);
        assert!(!backend.initialize().unwrap());
        assert!(!backend.initialize().unwrap());
        assert_eq!(fs::read(&path).unwrap(), b"existing content");
    }

    #[test]
    fn read_missing_file_fails() {
        let dir = tempdir().unwrap();
        let backend = FileBackend::new(dir.path().join("missing.csv"));

        let result = backend.read_all();
        assert!(matches!(result, Err(StorageError::NotFound { .. })));
    }

    #[test]
    fn replace_and_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dataset.csv");

        let mut backend = FileBackend::new(&path);
        backend.initialize().unwrap();
        backend.replace(b"hello").unwrap();
        assert_eq!(backend.read_all().unwrap(), b"hello");

        backend.replace(b"hello\nworld").unwrap();
        assert_eq!(backend.read_all().unwrap(), b"hello\nworld");
        assert_eq!(backend.size().unwrap(), 11);
    }

    #[test]
    fn replace_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dataset.csv");

        let mut backend = FileBackend::new(&path);
        backend.replace(b"data").unwrap();

        assert!(!dir.path().join("dataset.csv.tmp").exists());
    }

    #[test]
    fn persistence_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dataset.csv");

        {
            let mut backend = FileBackend::new(&path);
            backend.initialize().unwrap();
            backend.replace(b"persistent data").unwrap();
        }

        let backend = FileBackend::new(&path);
        assert_eq!(backend.read_all().unwrap(), b"persistent data");
    }

    #[test]
    fn size_of_missing_file_is_zero() {
        let dir = tempdir().unwrap();
        let backend = FileBackend::new(dir.path().join("missing.csv"));
        assert_eq!(backend.size().unwrap(), 0);
    }

    #[test]
    fn path_without_file_name_is_rejected() {
        let mut backend = FileBackend::new("/");
        assert!(matches!(
            backend.initialize(),
            Err(StorageError::InvalidPath { .. })
        ));
    }

    #[test]
    fn file_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dataset.csv");

        let backend = FileBackend::new(&path);
        assert_eq!(backend.path(), path);
    }
}
