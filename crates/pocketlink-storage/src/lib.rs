//! Persistence for the PocketLink store document.
//!
//! The whole store is one JSON document kept under a single key of a
//! [`KvBackend`]. [`DocumentRepository`] implements the repository traits
//! from `pocketlink_core` on top of any backend by reading the document,
//! changing it in memory and writing it back in full.

pub mod backend;
pub mod document;
pub mod file;
pub mod memory;

pub use backend::KvBackend;
pub use document::{DocumentRepository, STORAGE_KEY};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
pub use pocketlink_core::repository::{ReadRepository, Repository, Result};
pub use pocketlink_core::StorageError;
