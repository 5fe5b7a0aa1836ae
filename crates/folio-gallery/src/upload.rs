//! Ingestion: validate, encode, persist.

use std::sync::Arc;

use folio_store::ImageCollection;
use folio_types::{is_image_mime, DataUri, ImageId, ImageRecord, MIB};
use tracing::{debug, info, warn};

use crate::clock::{Clock, RandomTokens, SystemClock, TokenSource};
use crate::error::{StorageFailure, UploadError, ValidationError};
use crate::source::ImageSource;

type UploadHook = Box<dyn FnMut(&ImageRecord) + Send>;

/// Visible state of the upload widget.
///
/// ```text
/// Idle ─drag_enter→ Dragging ─drag_leave→ Idle
/// {Idle, Dragging, Uploaded, Failed} ─submit→ Validating → Uploading → {Uploaded | Failed}
/// Uploaded ─reset→ Idle
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum UploadState {
    #[default]
    Idle,
    Dragging,
    Validating,
    Uploading,
    /// Preview of the record just stored.
    Uploaded(ImageRecord),
    Failed(UploadError),
}

impl UploadState {
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Validating | Self::Uploading)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Dragging => "dragging",
            Self::Validating => "validating",
            Self::Uploading => "uploading",
            Self::Uploaded(_) => "uploaded",
            Self::Failed(_) => "failed",
        }
    }
}

/// Turns one file at a time into a stored [`ImageRecord`].
///
/// Submissions always run to a terminal state; there is no cancel. A read
/// that never completes leaves the uploader in `Uploading`.
pub struct Uploader {
    collection: ImageCollection,
    clock: Arc<dyn Clock>,
    tokens: Arc<dyn TokenSource>,
    max_size_mb: u64,
    state: UploadState,
    on_upload: Option<UploadHook>,
}

impl Uploader {
    pub fn new(collection: ImageCollection, max_size_mb: u64) -> Self {
        Self {
            collection,
            clock: Arc::new(SystemClock),
            tokens: Arc::new(RandomTokens::default()),
            max_size_mb,
            state: UploadState::Idle,
            on_upload: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_tokens(mut self, tokens: Arc<dyn TokenSource>) -> Self {
        self.tokens = tokens;
        self
    }

    /// Register the hook called with each newly stored record.
    pub fn on_upload(mut self, hook: impl FnMut(&ImageRecord) + Send + 'static) -> Self {
        self.on_upload = Some(Box::new(hook));
        self
    }

    pub fn max_size_mb(&self) -> u64 {
        self.max_size_mb
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_mb.saturating_mul(MIB)
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    /// The record shown as "just uploaded", if any.
    pub fn preview(&self) -> Option<&ImageRecord> {
        match &self.state {
            UploadState::Uploaded(record) => Some(record),
            _ => None,
        }
    }

    /// The inline error of the last attempt, if it failed.
    pub fn error(&self) -> Option<&UploadError> {
        match &self.state {
            UploadState::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Hint text under the drop target.
    pub fn hint(&self) -> String {
        format!("Supports: JPEG, PNG, GIF, WebP (Max {}MB)", self.max_size_mb)
    }

    pub fn drag_enter(&mut self) {
        if matches!(self.state, UploadState::Idle | UploadState::Failed(_)) {
            self.state = UploadState::Dragging;
        }
    }

    pub fn drag_leave(&mut self) {
        if self.state == UploadState::Dragging {
            self.state = UploadState::Idle;
        }
    }

    /// Back to the drop target after a successful upload ("Upload Another").
    pub fn reset(&mut self) {
        if matches!(self.state, UploadState::Uploaded(_)) {
            self.state = UploadState::Idle;
        }
    }

    /// Handle a drop or picker selection. Only the first file is processed;
    /// an empty selection does nothing and returns `None`.
    pub async fn drop_files<S: ImageSource>(
        &mut self,
        files: &[S],
    ) -> Option<Result<ImageRecord, UploadError>> {
        if self.state == UploadState::Dragging {
            self.state = UploadState::Idle;
        }
        let first = files.first()?;
        if files.len() > 1 {
            debug!(ignored = files.len() - 1, "multi-file drop; processing the first file only");
        }
        Some(self.submit(first).await)
    }

    /// Validate, encode and store one file.
    ///
    /// On failure the collection is untouched and the state is `Failed`; on
    /// success the record is appended, the state becomes `Uploaded`, and the
    /// upload hook fires.
    pub async fn submit(&mut self, file: &dyn ImageSource) -> Result<ImageRecord, UploadError> {
        self.state = UploadState::Validating;
        if let Err(err) = self.validate(file) {
            return Err(self.fail(err.into(), file.name()));
        }

        self.state = UploadState::Uploading;
        let bytes = match file.read_all().await {
            Ok(bytes) => bytes,
            Err(e) => return Err(self.fail(UploadError::Encoding(e.to_string()), file.name())),
        };
        // The file may have changed since its size was declared.
        let size = bytes.len() as u64;
        if let Err(err) = self.check_size(size) {
            return Err(self.fail(err.into(), file.name()));
        }
        let data = DataUri::encode(file.mime_type(), &bytes);

        let now = self.clock.now();
        let record = ImageRecord {
            id: ImageId::generate(now.timestamp_millis(), &self.tokens.token()),
            name: file.name().to_string(),
            data,
            size,
            mime_type: file.mime_type().to_string(),
            uploaded_at: now,
        };

        if let Err(e) = self.collection.append(record.clone()) {
            return Err(self.fail(StorageFailure::from(e).into(), file.name()));
        }

        info!(id = %record.id, name = %record.name, size = record.size, "image uploaded");
        self.state = UploadState::Uploaded(record.clone());
        if let Some(hook) = self.on_upload.as_mut() {
            hook(&record);
        }
        Ok(record)
    }

    fn validate(&self, file: &dyn ImageSource) -> Result<(), ValidationError> {
        if !is_image_mime(file.mime_type()) {
            return Err(ValidationError::NotAnImage {
                mime_type: file.mime_type().to_string(),
            });
        }
        self.check_size(file.size())
    }

    fn check_size(&self, size: u64) -> Result<(), ValidationError> {
        if size > self.max_size_bytes() {
            return Err(ValidationError::TooLarge {
                size,
                limit_mb: self.max_size_mb,
            });
        }
        Ok(())
    }

    fn fail(&mut self, err: UploadError, name: &str) -> UploadError {
        warn!(name, error = %err, "upload failed");
        self.state = UploadState::Failed(err.clone());
        err
    }
}

impl std::fmt::Debug for Uploader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Uploader")
            .field("collection", &self.collection)
            .field("max_size_mb", &self.max_size_mb)
            .field("state", &self.state.label())
            .finish()
    }
}
