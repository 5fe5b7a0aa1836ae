use crate::error::StoreResult;

/// Space accounting for a store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StorageUsage {
    /// Bytes currently held (keys plus values).
    pub used_bytes: u64,
    /// Maximum bytes the store accepts, if bounded.
    pub capacity: Option<u64>,
    /// Number of keys present.
    pub entries: usize,
}

impl StorageUsage {
    /// Bytes still available, if bounded.
    pub fn remaining(&self) -> Option<u64> {
        self.capacity.map(|cap| cap.saturating_sub(self.used_bytes))
    }
}

/// String key-value storage area.
///
/// All implementations must satisfy these invariants:
/// - Values are opaque strings; the store never interprets them.
/// - A failed `set` leaves the previous value (or absence) in place.
/// - Space is accounted as `key.len() + value.len()` per entry.
/// - Each call is atomic on its own; sequences of calls are not.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Create or replace the value under `key`.
    ///
    /// Fails with [`StoreError::QuotaExceeded`](crate::StoreError::QuotaExceeded)
    /// when the new total would exceed the store's capacity.
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Delete `key`. Returns `true` if it existed.
    fn remove(&self, key: &str) -> StoreResult<bool>;

    /// Current space accounting.
    fn usage(&self) -> StoreResult<StorageUsage>;

    /// Check whether `key` is present.
    fn contains(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}

/// Bytes charged for one entry.
pub(crate) fn entry_cost(key: &str, value: &str) -> u64 {
    (key.len() + value.len()) as u64
}
