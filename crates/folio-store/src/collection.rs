use std::sync::Arc;

use folio_types::{ImageId, ImageRecord};
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};
use crate::traits::KeyValueStore;

/// Storage key the collection lives under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "portfolio_images";

/// The persisted list of images.
///
/// The whole collection is one JSON array of [`ImageRecord`] stored under a
/// single key. Insertion order is preserved; records are never edited in
/// place.
///
/// # Concurrency
///
/// Every mutating accessor reads the full array, changes it, and writes it
/// back. Two writers working on the same storage area at once (two
/// processes, or two handles on one shared backend) can lose updates: the
/// last full-array write wins. Callers that need isolation must serialize
/// access themselves.
#[derive(Clone)]
pub struct ImageCollection {
    store: Arc<dyn KeyValueStore>,
    key: String,
}

impl ImageCollection {
    /// Collection under [`DEFAULT_STORAGE_KEY`].
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(store, DEFAULT_STORAGE_KEY)
    }

    /// Collection under a custom key.
    pub fn with_key(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// The storage key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The backing store.
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Every stored record, in insertion order.
    ///
    /// A missing entry, an unreadable backend, or text that does not decode
    /// as an array of records all yield an empty list. The cause is logged.
    pub fn list_all(&self) -> Vec<ImageRecord> {
        let text = match self.store.get(&self.key) {
            Ok(Some(text)) => text,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to read image collection; treating as empty");
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<ImageRecord>>(&text) {
            Ok(records) => {
                debug!(key = %self.key, count = records.len(), "read image collection");
                records
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "discarding undecodable image collection");
                Vec::new()
            }
        }
    }

    /// Look up one record by id.
    pub fn get(&self, id: &str) -> Option<ImageRecord> {
        self.list_all().into_iter().find(|r| r.id == id)
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.list_all().len()
    }

    /// Returns `true` if no records are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a record and write the collection back.
    ///
    /// Fails with [`StoreError::QuotaExceeded`] when the grown array does not
    /// fit; the stored collection is then unchanged.
    pub fn append(&self, record: ImageRecord) -> StoreResult<()> {
        let mut records = self.list_all();
        let id = record.id.clone();
        records.push(record);
        self.write(&records)?;
        debug!(key = %self.key, %id, count = records.len(), "appended image record");
        Ok(())
    }

    /// Remove the record with `id`. Returns `true` if one matched.
    ///
    /// An unknown id is a successful no-op and performs no write.
    pub fn remove_by_id(&self, id: &str) -> StoreResult<bool> {
        let mut records = self.list_all();
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            debug!(key = %self.key, id, "remove: no matching record");
            return Ok(false);
        }
        self.write(&records)?;
        info!(key = %self.key, id, remaining = records.len(), "removed image record");
        Ok(true)
    }

    /// Delete the whole stored entry. Returns whether the delete succeeded.
    pub fn clear_all(&self) -> bool {
        match self.store.remove(&self.key) {
            Ok(existed) => {
                info!(key = %self.key, existed, "cleared image collection");
                true
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to clear image collection");
                false
            }
        }
    }

    /// Ids of every stored record, in insertion order.
    pub fn ids(&self) -> Vec<ImageId> {
        self.list_all().into_iter().map(|r| r.id).collect()
    }

    fn write(&self, records: &[ImageRecord]) -> StoreResult<()> {
        let text =
            serde_json::to_string(records).map_err(|e| StoreError::Serialization(e.to_string()))?;
        self.store.set(&self.key, &text).inspect_err(|e| {
            warn!(key = %self.key, error = %e, "failed to write image collection");
        })
    }
}

impl std::fmt::Debug for ImageCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCollection")
            .field("key", &self.key)
            .finish()
    }
}
