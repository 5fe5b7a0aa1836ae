use std::path::{Path, PathBuf};

use chrono::FixedOffset;
use folio_store::{validate_key, DEFAULT_STORAGE_KEY};
use folio_types::MIB;
use serde::{Deserialize, Serialize};

use crate::context::Theme;
use crate::error::{GalleryError, GalleryResult};

/// Top-level configuration, usually read from `folio.toml`.
///
/// Every field has a default, so an empty file is a valid config.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Key the collection is stored under.
    pub storage_key: String,
    /// Upload size ceiling in MiB.
    pub max_size_mb: u64,
    pub storage: StorageConfig,
    pub display: DisplayConfig,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            max_size_mb: 5,
            storage: StorageConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl GalleryConfig {
    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> GalleryResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Parse TOML text.
    pub fn from_toml_str(text: &str) -> GalleryResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| GalleryError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> GalleryResult<()> {
        if self.storage_key.is_empty() {
            return Err(GalleryError::Config("storage_key must not be empty".into()));
        }
        if self.storage.backend == StorageBackend::File {
            validate_key(&self.storage_key)
                .map_err(|e| GalleryError::Config(format!("storage_key: {e}")))?;
        }
        if self.max_size_mb == 0 {
            return Err(GalleryError::Config("max_size_mb must be at least 1".into()));
        }
        self.display.utc_offset()?;
        Ok(())
    }

    /// Upload ceiling in bytes (`max_size_mb * 1024 * 1024`).
    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_mb.saturating_mul(MIB)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    #[default]
    File,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Directory for the file backend.
    pub dir: PathBuf,
    /// Storage quota in bytes; `0` means unbounded.
    pub capacity_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            dir: PathBuf::from(".folio"),
            capacity_bytes: 5 * MIB,
        }
    }
}

impl StorageConfig {
    pub fn capacity(&self) -> Option<u64> {
        (self.capacity_bytes > 0).then_some(self.capacity_bytes)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Offset applied to upload timestamps in the gallery.
    pub utc_offset_minutes: i32,
    /// Whether the gallery offers delete.
    pub show_delete: bool,
    pub theme: Theme,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            show_delete: true,
            theme: Theme::Light,
        }
    }
}

impl DisplayConfig {
    pub fn utc_offset(&self) -> GalleryResult<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)).ok_or_else(|| {
            GalleryError::Config(format!(
                "utc_offset_minutes out of range: {}",
                self.utc_offset_minutes
            ))
        })
    }
}
