//! Foundation types for the folio image store.
//!
//! This crate provides the record, identifier, and encoding types shared by
//! every other folio crate. Every other folio crate depends on `folio-types`.
//!
//! # Key Types
//!
//! - [`ImageRecord`]: One stored image with its data URI payload
//! - [`ImageId`]: Record identifier (`img_<millis>_<suffix>`)
//! - [`DataUri`]: Self-describing `data:<mime>;base64,<payload>` text
//! - [`human_size`]: Byte counts rendered as `B` / `KB` / `MB`
//! - [`is_image_mime`] / [`mime_from_path`]: MIME type checks

pub mod data_uri;
pub mod error;
pub mod id;
pub mod mime;
pub mod record;
pub mod size;

pub use data_uri::DataUri;
pub use error::TypeError;
pub use id::ImageId;
pub use mime::{is_image_mime, mime_from_path};
pub use record::ImageRecord;
pub use size::{human_size, KIB, MIB};
