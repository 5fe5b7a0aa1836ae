use std::sync::Arc;

use folio_store::{FileStore, ImageCollection, InMemoryStore, KeyValueStore, StorageUsage};
use folio_types::DataUri;
use tracing::debug;

use crate::config::{GalleryConfig, StorageBackend};
use crate::error::{GalleryError, GalleryResult};
use crate::gallery::Gallery;
use crate::upload::Uploader;

/// High-level image store API.
///
/// Owns the configured backend and hands out uploaders and galleries that
/// share one [`ImageCollection`].
pub struct ImageStore {
    config: GalleryConfig,
    collection: ImageCollection,
}

impl ImageStore {
    /// Open the backend named by `config.storage`.
    pub fn open(config: GalleryConfig) -> GalleryResult<Self> {
        config.validate()?;
        let capacity = config.storage.capacity();
        let backend: Arc<dyn KeyValueStore> = match config.storage.backend {
            StorageBackend::Memory => match capacity {
                Some(cap) => Arc::new(InMemoryStore::with_capacity(cap)),
                None => Arc::new(InMemoryStore::new()),
            },
            StorageBackend::File => match capacity {
                Some(cap) => Arc::new(FileStore::with_capacity(&config.storage.dir, cap)?),
                None => Arc::new(FileStore::open(&config.storage.dir)?),
            },
        };
        debug!(backend = ?config.storage.backend, ?capacity, key = %config.storage_key, "opened image store");
        Ok(Self::with_backend(config, backend))
    }

    /// Use an already constructed backend.
    pub fn with_backend(config: GalleryConfig, backend: Arc<dyn KeyValueStore>) -> Self {
        let collection = ImageCollection::with_key(backend, config.storage_key.clone());
        Self { config, collection }
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    pub fn collection(&self) -> &ImageCollection {
        &self.collection
    }

    /// A fresh uploader using the configured size ceiling.
    pub fn uploader(&self) -> Uploader {
        Uploader::new(self.collection.clone(), self.config.max_size_mb)
    }

    /// A gallery loaded from the current collection.
    pub fn gallery(&self) -> GalleryResult<Gallery> {
        Gallery::new(self.collection.clone(), &self.config.display)
    }

    pub fn usage(&self) -> GalleryResult<StorageUsage> {
        Ok(self.collection.store().usage()?)
    }

    /// Decode a stored record back to its original bytes.
    pub fn export(&self, id: &str) -> GalleryResult<DataUri> {
        let record = self
            .collection
            .get(id)
            .ok_or_else(|| GalleryError::NotFound(id.to_string()))?;
        Ok(record.decode()?)
    }
}

impl std::fmt::Debug for ImageStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageStore")
            .field("collection", &self.collection)
            .field("backend", &self.config.storage.backend)
            .finish()
    }
}
