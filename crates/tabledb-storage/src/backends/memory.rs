//! In-memory store backend.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::store::{prefix_end, KeyValue, ListOptions, Store};

/// An ordered in-memory store backed by a `BTreeMap`.
///
/// Intended for tests and ephemeral tables; contents are lost on drop.
/// Thread-safe via an internal reader-writer lock.
///
/// # Example
///
/// ```
/// use tabledb_storage::{backends::MemoryStore, Store};
///
/// let store = MemoryStore::new();
/// store.write(b"k", b"v")?;
/// assert_eq!(store.read(b"k")?, Some(b"v".to_vec()));
/// # Ok::<(), tabledb_storage::StoreError>(())
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    map: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::LockPoisoned`] if a writer panicked.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.map.read().map_err(poisoned)?.len())
    }

    /// Whether the store holds no keys.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::LockPoisoned`] if a writer panicked.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.map.read().map_err(poisoned)?.is_empty())
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> StoreError {
    StoreError::LockPoisoned("memory store map".to_owned())
}

impl Store for MemoryStore {
    fn write(&self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        self.map.write().map_err(poisoned)?.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn read(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.map.read().map_err(poisoned)?.get(key).cloned())
    }

    fn list(&self, prefix: &[u8], options: ListOptions) -> StoreResult<Vec<KeyValue>> {
        let map = self.map.read().map_err(poisoned)?;
        let end_key = prefix_end(prefix);
        let end: Bound<&[u8]> = match end_key.as_deref() {
            Some(end) => Bound::Excluded(end),
            None => Bound::Unbounded,
        };
        let range = map.range::<[u8], _>((Bound::Included(prefix), end));

        let pairs: Box<dyn Iterator<Item = (&Vec<u8>, &Vec<u8>)>> = if options.reverse {
            Box::new(range.rev())
        } else {
            Box::new(range)
        };

        let limit = if options.limit == 0 { usize::MAX } else { options.limit };
        Ok(pairs
            .skip(options.offset)
            .take(limit)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    fn delete(&self, key: &[u8]) -> StoreResult<()> {
        self.map.write().map_err(poisoned)?.remove(key);
        Ok(())
    }
}
