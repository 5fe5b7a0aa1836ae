//! Storage boundary for the folio image store.
//!
//! The persisted collection lives in a single entry of a string key-value
//! store, the way a browser keeps it in `localStorage`. This crate provides
//! that narrow storage interface, its backends, and the collection accessors
//! built on top of it.
//!
//! # Storage Backends
//!
//! All backends implement the [`KeyValueStore`] trait:
//!
//! - [`InMemoryStore`] -- `HashMap`-based store for tests and embedding
//! - [`FileStore`] -- one file per key inside a directory
//!
//! Both can be given a capacity; a write that would exceed it fails with
//! [`StoreError::QuotaExceeded`] and leaves the previous value in place.
//!
//! # Collection
//!
//! [`ImageCollection`] keeps every [`folio_types::ImageRecord`] as one JSON
//! array under a fixed key and exposes `list_all`, `append`, `remove_by_id`
//! and `clear_all`.
//!
//! # Design Rules
//!
//! 1. Values are opaque strings to the backends.
//! 2. Reading a missing or corrupt collection yields an empty list, never an error.
//! 3. Each accessor is a whole read-modify-write of the array; accessors are
//!    not serialized against each other (last write wins).

pub mod collection;
pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use collection::{ImageCollection, DEFAULT_STORAGE_KEY};
pub use error::{StoreError, StoreResult};
pub use file::{validate_key, FileStore};
pub use memory::InMemoryStore;
pub use traits::{KeyValueStore, StorageUsage};
