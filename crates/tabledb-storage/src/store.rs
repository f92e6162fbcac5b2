//! The ordered key-value store interface.
//!
//! This module defines the [`Store`] trait, the only capabilities the
//! indexing layer assumes of its storage: point writes, point reads,
//! ordered prefix scans, and point deletes. There are no transactions and
//! no batch atomicity; each operation is individually atomic and the
//! store handle is shared and thread-safe by contract.

use std::sync::Arc;

use crate::error::StoreResult;

/// A key-value pair returned by scans.
pub type KeyValue = (Vec<u8>, Vec<u8>);

/// Options for a prefix scan.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListOptions {
    /// Maximum number of pairs to return; 0 means unbounded.
    pub limit: usize,
    /// Number of pairs to skip before returning any.
    pub offset: usize,
    /// Iterate in reverse key order.
    pub reverse: bool,
}

/// An ordered byte-key / byte-value store.
///
/// Implementations must be thread-safe (`Send + Sync`); the indexing layer
/// shares one handle across tables.
///
/// # Example
///
/// ```
/// use tabledb_storage::{backends::MemoryStore, ListOptions, Store};
///
/// let store = MemoryStore::new();
/// store.write(b"users/1", b"alice")?;
/// store.write(b"users/2", b"bob")?;
///
/// let pairs = store.list(b"users/", ListOptions::default())?;
/// assert_eq!(pairs.len(), 2);
/// # Ok::<(), tabledb_storage::StoreError>(())
/// ```
pub trait Store: Send + Sync {
    /// Store a value under a key, replacing any existing value.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::StoreError`] if the write fails.
    fn write(&self, key: &[u8], value: &[u8]) -> StoreResult<()>;

    /// Read the value stored under a key.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::StoreError`] if the read fails.
    fn read(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>>;

    /// List the pairs whose keys start with `prefix`, in key order
    /// (reversed when requested), honouring limit and offset.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::StoreError`] if the scan fails.
    fn list(&self, prefix: &[u8], options: ListOptions) -> StoreResult<Vec<KeyValue>>;

    /// Delete a key. Deleting a missing key succeeds silently.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::StoreError`] if the delete fails.
    fn delete(&self, key: &[u8]) -> StoreResult<()>;
}

/// Shared ownership of a store: every `Arc<S>` is itself a store.
impl<S: Store + ?Sized> Store for Arc<S> {
    fn write(&self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        (**self).write(key, value)
    }

    fn read(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        (**self).read(key)
    }

    fn list(&self, prefix: &[u8], options: ListOptions) -> StoreResult<Vec<KeyValue>> {
        (**self).list(prefix, options)
    }

    fn delete(&self, key: &[u8]) -> StoreResult<()> {
        (**self).delete(key)
    }
}

/// The smallest key strictly greater than every key starting with `prefix`,
/// or `None` when no such key exists (the prefix is empty or all `0xFF`).
///
/// Used by backends to turn a prefix into an exclusive range end.
#[must_use]
pub fn prefix_end(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut end = prefix.to_vec();
    while let Some(last) = end.last_mut() {
        if *last < 0xFF {
            *last += 1;
            return Some(end);
        }
        end.pop();
    }
    None
}
