use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::traits::{entry_cost, KeyValueStore, StorageUsage};

/// In-memory, HashMap-based key-value store.
///
/// Intended for tests and embedding. Entries are held behind a `RwLock`.
/// Unbounded unless built with [`InMemoryStore::with_capacity`].
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, String>>,
    capacity: Option<u64>,
}

impl InMemoryStore {
    /// Create a new empty, unbounded store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            capacity: None,
        }
    }

    /// Create a new empty store that holds at most `capacity` bytes.
    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            capacity: Some(capacity),
        }
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().expect("lock poisoned").is_empty()
    }

    /// Total bytes across all entries.
    pub fn used_bytes(&self) -> u64 {
        self.entries
            .read()
            .expect("lock poisoned")
            .iter()
            .map(|(k, v)| entry_cost(k, v))
            .sum()
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.entries.write().expect("lock poisoned").clear();
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let map = self.entries.read().expect("lock poisoned");
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut map = self.entries.write().expect("lock poisoned");
        if let Some(capacity) = self.capacity {
            let others: u64 = map
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| entry_cost(k, v))
                .sum();
            let requested = others + entry_cost(key, value);
            if requested > capacity {
                return Err(StoreError::QuotaExceeded {
                    key: key.to_string(),
                    requested,
                    capacity,
                });
            }
        }
        map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<bool> {
        let mut map = self.entries.write().expect("lock poisoned");
        Ok(map.remove(key).is_some())
    }

    fn usage(&self) -> StoreResult<StorageUsage> {
        let map = self.entries.read().expect("lock poisoned");
        Ok(StorageUsage {
            used_bytes: map.iter().map(|(k, v)| entry_cost(k, v)).sum(),
            capacity: self.capacity,
            entries: map.len(),
        })
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStore")
            .field("entries", &self.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}
