//! # lnstats Storage
//!
//! Store backends for the lnstats dataset.
//!
//! A store is a single artifact that is always read and written as a whole.
//! Backends are **opaque byte stores** - they do not interpret the CSV
//! content they hold. The sync engine owns all format interpretation.
//!
//! ## Design Principles
//!
//! - Whole-artifact operations only (read everything, replace everything)
//! - Construction has no side effects; `initialize` performs the bootstrap
//! - A `replace` is observed either completely or not at all
//!
//! ## Available Backends
//!
//! - [`InMemoryBackend`] - For testing
//! - [`FileBackend`] - For persistent storage using OS file APIs
//!
//! ## Example
//!
//! ```rust
//! use lnstats_storage::{StoreBackend, InMemoryBackend};
//!
//! let mut backend = InMemoryBackend::new();
//! assert!(backend.initialize().unwrap());
//! backend.replace(b"added,channel_count").unwrap();
//! assert_eq!(backend.read_all().unwrap(), b"added,channel_count");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;

pub use backend::StoreBackend;
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
