use folio_store::StoreError;
use folio_types::TypeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("config error: {0}")]
    Config(String),

    #[error("image not found: {0}")]
    NotFound(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("decode error: {0}")]
    Decode(#[from] TypeError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GalleryResult<T> = Result<T, GalleryError>;

/// Input rejected before any bytes are read.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("not an image (declared type {mime_type:?})")]
    NotAnImage { mime_type: String },

    #[error("file is {size} bytes, limit is {limit_mb}MB")]
    TooLarge { size: u64, limit_mb: u64 },
}

/// The collection write at the end of an upload failed.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StorageFailure {
    #[error("storage is full")]
    Full,

    #[error("write failed: {0}")]
    WriteFailed(String),
}

impl From<StoreError> for StorageFailure {
    fn from(err: StoreError) -> Self {
        if err.is_quota_exceeded() {
            Self::Full
        } else {
            Self::WriteFailed(err.to_string())
        }
    }
}

/// Terminal failure of one upload attempt. Every variant is recoverable by
/// trying again (storage failures only after space is freed).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("failed to read file: {0}")]
    Encoding(String),

    #[error("failed to save image: {0}")]
    Storage(#[from] StorageFailure),
}

impl UploadError {
    /// Inline message shown next to the drop target.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(ValidationError::NotAnImage { .. }) => {
                "Please select an image file (JPEG, PNG, GIF, etc.)".to_string()
            }
            Self::Validation(ValidationError::TooLarge { limit_mb, .. }) => {
                format!("File size must be less than {limit_mb}MB")
            }
            Self::Encoding(_) => "Failed to read file".to_string(),
            Self::Storage(_) => "Failed to save image. Storage might be full.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_messages() {
        let not_image = UploadError::from(ValidationError::NotAnImage {
            mime_type: "text/plain".into(),
        });
        assert_eq!(
            not_image.user_message(),
            "Please select an image file (JPEG, PNG, GIF, etc.)"
        );

        let too_large = UploadError::from(ValidationError::TooLarge {
            size: 6 * 1024 * 1024,
            limit_mb: 5,
        });
        assert_eq!(too_large.user_message(), "File size must be less than 5MB");

        assert_eq!(
            UploadError::Encoding("eof".into()).user_message(),
            "Failed to read file"
        );
        assert_eq!(
            UploadError::from(StorageFailure::Full).user_message(),
            "Failed to save image. Storage might be full."
        );
    }

    #[test]
    fn quota_maps_to_full() {
        let err = StoreError::QuotaExceeded {
            key: "k".into(),
            requested: 10,
            capacity: 5,
        };
        assert_eq!(StorageFailure::from(err), StorageFailure::Full);
    }

    #[test]
    fn other_store_errors_map_to_write_failed() {
        let err = StoreError::Serialization("boom".into());
        assert!(matches!(StorageFailure::from(err), StorageFailure::WriteFailed(_)));
    }
}
