//! Redb store backend.
//!
//! A durable [`Store`] implementation on top of Redb, a pure-Rust embedded
//! database. Every store operation runs in its own short transaction, which
//! matches the store contract: point-level atomicity per operation, no
//! multi-key atomicity.

use std::ops::Bound;
use std::path::Path;

use redb::{Database, TableDefinition, TableError};

use crate::error::{StoreError, StoreResult};
use crate::store::{prefix_end, KeyValue, ListOptions, Store};

const RECORDS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("records");

/// A store backed by a Redb database file.
///
/// # Example
///
/// ```no_run
/// use tabledb_storage::{backends::RedbStore, Store};
///
/// let store = RedbStore::open("tables.redb")?;
/// store.write(b"k", b"v")?;
/// # Ok::<(), tabledb_storage::StoreError>(())
/// ```
pub struct RedbStore {
    db: Database,
}

impl RedbStore {
    /// Open or create a database file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Open`] if the database cannot be opened or
    /// created.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = Database::builder()
            .create(path.as_ref())
            .map_err(|e| StoreError::Open(e.to_string()))?;
        Ok(Self { db })
    }

    /// Create an in-memory database that is lost on drop.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Open`] if the database cannot be created.
    pub fn in_memory() -> StoreResult<Self> {
        let db = Database::builder()
            .create_with_backend(redb::backends::InMemoryBackend::new())
            .map_err(|e| StoreError::Open(e.to_string()))?;
        Ok(Self { db })
    }
}

fn backend(err: impl std::fmt::Display) -> StoreError {
    StoreError::Backend(err.to_string())
}

impl Store for RedbStore {
    fn write(&self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        let tx = self.db.begin_write().map_err(backend)?;
        {
            let mut table = tx.open_table(RECORDS).map_err(backend)?;
            table.insert(key, value).map_err(backend)?;
        }
        tx.commit().map_err(backend)
    }

    fn read(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        let tx = self.db.begin_read().map_err(backend)?;
        let table = match tx.open_table(RECORDS) {
            Ok(table) => table,
            // A fresh database has no table yet; nothing is stored.
            Err(TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(backend(e)),
        };
        Ok(table.get(key).map_err(backend)?.map(|guard| guard.value().to_vec()))
    }

    fn list(&self, prefix: &[u8], options: ListOptions) -> StoreResult<Vec<KeyValue>> {
        let tx = self.db.begin_read().map_err(backend)?;
        let table = match tx.open_table(RECORDS) {
            Ok(table) => table,
            Err(TableError::TableDoesNotExist(_)) => return Ok(Vec::new()),
            Err(e) => return Err(backend(e)),
        };

        let end_key = prefix_end(prefix);
        let end: Bound<&[u8]> = match end_key.as_deref() {
            Some(end) => Bound::Excluded(end),
            None => Bound::Unbounded,
        };
        let range = table
            .range::<&[u8]>((Bound::Included(prefix), end))
            .map_err(backend)?;

        let limit = if options.limit == 0 { usize::MAX } else { options.limit };
        let mut pairs = Vec::new();
        if options.reverse {
            for entry in range.rev().skip(options.offset).take(limit) {
                let (key, value) = entry.map_err(backend)?;
                pairs.push((key.value().to_vec(), value.value().to_vec()));
            }
        } else {
            for entry in range.skip(options.offset).take(limit) {
                let (key, value) = entry.map_err(backend)?;
                pairs.push((key.value().to_vec(), value.value().to_vec()));
            }
        }
        Ok(pairs)
    }

    fn delete(&self, key: &[u8]) -> StoreResult<()> {
        let tx = self.db.begin_write().map_err(backend)?;
        {
            let mut table = tx.open_table(RECORDS).map_err(backend)?;
            table.remove(key).map_err(backend)?;
        }
        tx.commit().map_err(backend)
    }
}
