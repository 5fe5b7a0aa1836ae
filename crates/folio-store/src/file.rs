use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::{KeyValueStore, StorageUsage};

/// Directory-backed key-value store.
///
/// Each key is one file named after the key. Writes go to a hidden temporary
/// sibling (`.<key>.tmp`) which is then renamed over the target, so a reader
/// sees either the old value or the new one.
///
/// Keys must be non-empty, use only `[A-Za-z0-9._-]`, and not start with `.`.
pub struct FileStore {
    dir: PathBuf,
    capacity: Option<u64>,
    /// Serializes writers within this process; other processes are not excluded.
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open (or create) an unbounded store rooted at `dir`.
    pub fn open(dir: impl AsRef<Path>) -> StoreResult<Self> {
        Self::open_inner(dir.as_ref(), None)
    }

    /// Open (or create) a store rooted at `dir` holding at most `capacity` bytes.
    pub fn with_capacity(dir: impl AsRef<Path>, capacity: u64) -> StoreResult<Self> {
        Self::open_inner(dir.as_ref(), Some(capacity))
    }

    fn open_inner(dir: &Path, capacity: Option<u64>) -> StoreResult<Self> {
        fs::create_dir_all(dir)?;
        debug!(dir = %dir.display(), ?capacity, "opened file store");
        Ok(Self {
            dir: dir.to_path_buf(),
            capacity,
            write_lock: Mutex::new(()),
        })
    }

    /// The directory holding the entries.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(key))
    }

    /// `(key, size)` for every entry file.
    fn scan(&self) -> StoreResult<Vec<(String, u64)>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let meta = entry.metadata()?;
            if !meta.is_file() {
                continue;
            }
            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(_) => continue,
            };
            if name.starts_with('.') {
                continue;
            }
            entries.push((name, meta.len()));
        }
        Ok(entries)
    }
}

/// Check that `key` can name an entry file: non-empty, `[A-Za-z0-9._-]`
/// only, no leading `.`.
pub fn validate_key(key: &str) -> StoreResult<()> {
    let reason = if key.is_empty() {
        Some("key is empty")
    } else if key.starts_with('.') {
        Some("key starts with '.'")
    } else if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        Some("key may only contain [A-Za-z0-9._-]")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(StoreError::InvalidKey {
            key: key.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;
        let _guard = self.write_lock.lock().expect("write lock poisoned");

        if let Some(capacity) = self.capacity {
            let others: u64 = self
                .scan()?
                .into_iter()
                .filter(|(name, _)| name != key)
                .map(|(name, len)| name.len() as u64 + len)
                .sum();
            let requested = others + (key.len() + value.len()) as u64;
            if requested > capacity {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    requested,
                    capacity,
                });
            }
        }

        let tmp = self.dir.join(format!(".{key}.tmp"));
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
        }
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        debug!(key, len = value.len(), "file store write");
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        let path = self.path_for(key)?;
        let _guard = self.write_lock.lock().expect("write lock poisoned");
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn usage(&self) -> StoreResult<StorageUsage> {
        let entries = self.scan()?;
        Ok(StorageUsage {
            used_bytes: entries
                .iter()
                .map(|(name, len)| name.len() as u64 + len)
                .sum(),
            capacity: self.capacity,
            entries: entries.len(),
        })
    }
}

impl std::fmt::Debug for FileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStore")
            .field("dir", &self.dir)
            .field("capacity", &self.capacity)
            .finish()
    }
}
