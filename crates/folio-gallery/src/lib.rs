//! Image ingestion and gallery projection for folio.
//!
//! Sits on top of [`folio_store::ImageCollection`] and provides the two
//! user-facing halves of the image store:
//!
//! - [`Uploader`] -- validates one file, encodes it to a data URI, appends the
//!   record, and tracks the upload widget's state
//! - [`Gallery`] -- a refreshable read-only projection with selection and
//!   confirmed deletion
//!
//! [`ImageStore`] wires both to a backend chosen by [`GalleryConfig`]. This
//! is the main entry point for front ends.

pub mod clock;
pub mod config;
pub mod context;
pub mod error;
pub mod gallery;
pub mod source;
pub mod store;
pub mod upload;

pub use clock::{Clock, FixedClock, RandomTokens, SequenceTokens, SystemClock, TokenSource};
pub use config::{DisplayConfig, GalleryConfig, StorageBackend, StorageConfig};
pub use context::{DisplayContext, Theme};
pub use error::{
    GalleryError, GalleryResult, StorageFailure, UploadError, ValidationError,
};
pub use gallery::{
    format_timestamp, ClearOutcome, Confirm, DeleteOutcome, Gallery, GalleryView, ImageDetail,
    ImageSummary,
};
pub use source::{ImageSource, MemoryFile, PathFile};
pub use store::ImageStore;
pub use upload::{UploadState, Uploader};

// Re-export key types
pub use folio_store::{ImageCollection, KeyValueStore, StorageUsage};
pub use folio_types::{DataUri, ImageId, ImageRecord};
