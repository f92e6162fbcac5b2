//! The table engine.
//!
//! A [`Table`] is a namespaced collection of records stored in an ordered
//! key-value store, kept consistent with a primary index and any number of
//! declared secondary indexes.
//!
//! # Index maintenance
//!
//! `save` performs a read-before-write dance: it reads the existing payload
//! under the primary key, derives the old record's index keys, and deletes
//! exactly the keys the new record no longer occupies before writing the
//! new entries. That delta discipline is what keeps stale index entries
//! from accumulating across in-place updates.
//!
//! There is no locking and no multi-key atomicity: the engine assumes a
//! single logical writer per primary key and relies on the store's per-key
//! atomicity. A crash between the staged deletes and the puts can leave at
//! most dangling secondary entries, which scans skip and the next
//! successful `save` of the same record repairs.

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use tabledb_core::types::{from_payload, to_payload, Fields};
use tabledb_core::{Index, IndexSet, Query};
use tabledb_storage::{KeyValue, ListOptions, Store};

use crate::error::{Error, Result};
use crate::plan::{plan, ScanPlan};

/// Configuration recognized at table construction.
#[derive(Debug, Clone, Default)]
pub struct TableOptions {
    /// Override the primary index. Defaults to an equality index on a field
    /// named `id`, unordered, unique.
    pub id_index: Option<Index>,
    /// Emit diagnostic events for every operation.
    pub debug: bool,
}

impl TableOptions {
    /// Create options with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the primary index.
    #[must_use]
    pub fn id_index(mut self, index: Index) -> Self {
        self.id_index = Some(index);
        self
    }

    /// Enable diagnostic output.
    #[must_use]
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// A record table over an ordered key-value store.
///
/// # Example
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use tabledb::{Index, MemoryStore, Query, Table, TableOptions};
///
/// #[derive(Debug, Serialize, Deserialize, PartialEq)]
/// struct User {
///     id: String,
///     age: i64,
/// }
///
/// let table = Table::new(
///     MemoryStore::new(),
///     "users",
///     vec![Index::by_equality("age")],
///     TableOptions::new(),
/// );
///
/// table.save(&User { id: "1".into(), age: 30 })?;
///
/// let user: User = table.read(&Query::equals("id", "1"))?;
/// assert_eq!(user.age, 30);
///
/// let thirties: Vec<User> = table.list(&Query::equals("age", 30i64))?;
/// assert_eq!(thirties.len(), 1);
/// # Ok::<(), tabledb::Error>(())
/// ```
pub struct Table<S> {
    store: S,
    indexes: IndexSet,
    debug: bool,
}

impl<S: Store> Table<S> {
    /// Create a table over a store.
    ///
    /// The table is implicit in the store: it exists as soon as keys with
    /// its namespace prefix exist, so construction performs no I/O.
    #[must_use]
    pub fn new(
        store: S,
        namespace: impl Into<String>,
        indexes: Vec<Index>,
        options: TableOptions,
    ) -> Self {
        let id_index = options.id_index.unwrap_or_else(IndexSet::default_id_index);
        Self {
            store,
            indexes: IndexSet::new(namespace, id_index, indexes),
            debug: options.debug,
        }
    }

    /// The table's declared indexes.
    #[inline]
    #[must_use]
    pub fn indexes(&self) -> &IndexSet {
        &self.indexes
    }

    /// Insert a record, or update it in place when its primary key already
    /// exists.
    ///
    /// Index entries derived from the old version of the record that the
    /// new version no longer produces are deleted before the new entries
    /// are written.
    ///
    /// # Errors
    ///
    /// - [`Error::MissingId`] if the primary-key field is absent or empty
    /// - [`Error::Duplicate`] if a unique secondary index already holds the
    ///   record's value under a different primary key
    /// - [`Error::Store`] / [`Error::Codec`] on store or encoding failures
    pub fn save<R: Serialize>(&self, record: &R) -> Result<()> {
        let fields = Fields::from_record(record)?;
        let primary = self.indexes.primary_key(&fields)?;
        if primary.is_empty() {
            return Err(Error::MissingId);
        }

        let entries = self.indexes.entries(&fields)?;
        let id_key = self.indexes.id_key(&primary);

        // Read the old version and stage deletion of the keys it occupied
        // that the new version does not.
        let mut stale: Vec<Vec<u8>> = Vec::new();
        if let Some(old_payload) = self.store.read(&id_key)? {
            let old_fields = Fields::from_payload(&old_payload)?;
            let keep: HashSet<&[u8]> =
                entries.iter().map(|entry| entry.key.as_slice()).collect();
            for old_entry in self.indexes.entries(&old_fields)? {
                if !keep.contains(old_entry.key.as_slice()) {
                    stale.push(old_entry.key);
                }
            }
        }

        // Unique enforcement: any entry under the same value prefix that
        // points at a different primary key is a conflict.
        for index in self.indexes.secondary().iter().filter(|index| index.unique) {
            let prefix = self.indexes.value_prefix(index, &fields)?;
            for (_, pointer) in self.store.list(&prefix, ListOptions::default())? {
                if pointer != primary {
                    return Err(Error::Duplicate { index: index.name().to_owned() });
                }
            }
        }

        if self.debug {
            debug!(
                namespace = self.indexes.namespace(),
                primary = %String::from_utf8_lossy(&primary),
                entries = entries.len(),
                stale = stale.len(),
                "saving record"
            );
        }

        // Deletes before puts, so a crash mid-operation never leaves the
        // unique-check window temporarily violated.
        for key in stale {
            self.store.delete(&key)?;
        }
        let payload = to_payload(record)?;
        for entry in &entries {
            if entry.primary {
                self.store.write(&entry.key, &payload)?;
            } else {
                self.store.write(&entry.key, &primary)?;
            }
        }
        Ok(())
    }

    /// Read the single record matching a query.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if no record matches
    /// - [`Error::MultipleRecordsFound`] if more than one record matches
    /// - [`Error::InvalidQuery`] if the field matches no declared index
    pub fn read<R: DeserializeOwned>(&self, query: &Query) -> Result<R> {
        // A point read, but scan one entry further so a second match can be
        // reported instead of silently returning the first.
        let plan = plan(query, &self.indexes, Some(2))?;
        if self.debug {
            debug!(
                namespace = self.indexes.namespace(),
                field = query.field.as_str(),
                "reading record"
            );
        }
        let mut hits = self.scan(&plan)?;
        match hits.len() {
            0 => Err(Error::NotFound),
            1 => {
                let (_, value) = hits.swap_remove(0);
                let payload = self
                    .dereference(plan.primary, value)?
                    .ok_or(Error::NotFound)?;
                Ok(from_payload(&payload)?)
            }
            _ => Err(Error::MultipleRecordsFound),
        }
    }

    /// List the records matching a query, in the order dictated by the
    /// chosen index (or the query's requested direction).
    ///
    /// With a null query value, every record under the index is returned,
    /// ordered by the index's order field.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidQuery`] if the field matches no declared index
    /// - [`Error::Store`] / [`Error::Codec`] on store or decoding failures
    pub fn list<R: DeserializeOwned>(&self, query: &Query) -> Result<Vec<R>> {
        let plan = plan(query, &self.indexes, None)?;
        if self.debug {
            debug!(
                namespace = self.indexes.namespace(),
                field = query.field.as_str(),
                limit = plan.limit,
                offset = plan.offset,
                "listing records"
            );
        }
        let hits = self.scan(&plan)?;
        let mut records = Vec::with_capacity(hits.len());
        for (_, value) in hits {
            if let Some(payload) = self.dereference(plan.primary, value)? {
                records.push(from_payload(&payload)?);
            }
        }
        Ok(records)
    }

    /// Delete the record matching a query, removing every index entry it
    /// occupies. Deleting a record that does not exist succeeds silently.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidQuery`] if the field matches no declared index
    /// - [`Error::Store`] / [`Error::Codec`] on store or decoding failures
    pub fn delete(&self, query: &Query) -> Result<()> {
        let plan = plan(query, &self.indexes, Some(1))?;
        let mut hits = self.scan(&plan)?;
        let Some((key, value)) = hits.pop() else {
            return Ok(());
        };

        let payload = match self.dereference(plan.primary, value)? {
            Some(payload) => payload,
            // Dangling pointer: remove it, there is nothing else to clean.
            None => {
                self.store.delete(&key)?;
                return Ok(());
            }
        };

        let fields = Fields::from_payload(&payload)?;
        let entries = self.indexes.entries(&fields)?;
        if self.debug {
            debug!(
                namespace = self.indexes.namespace(),
                field = query.field.as_str(),
                entries = entries.len(),
                "deleting record"
            );
        }
        for entry in entries {
            self.store.delete(&entry.key)?;
        }
        Ok(())
    }

    /// Run a planned scan, applying the per-hit filter when the plan could
    /// not fold the filter value into its prefix.
    fn scan(&self, plan: &ScanPlan) -> Result<Vec<KeyValue>> {
        let Some(filter) = &plan.filter else {
            return Ok(self.store.list(
                &plan.prefix,
                ListOptions { limit: plan.limit, offset: plan.offset, reverse: plan.reverse },
            )?);
        };

        // The index orders by a different field than it filters on, so
        // every key under the prefix must be checked against the filter
        // component. Limit and offset count matching entries only.
        let all = self.store.list(
            &plan.prefix,
            ListOptions { limit: 0, offset: 0, reverse: plan.reverse },
        )?;
        let mut hits = Vec::new();
        for (key, pointer) in all {
            let mut tail =
                Vec::with_capacity(filter.len() + pointer.len() + 2);
            tail.push(b'/');
            tail.extend_from_slice(filter);
            tail.push(b'/');
            tail.extend_from_slice(&pointer);
            if key.ends_with(&tail) {
                hits.push((key, pointer));
            }
        }
        let limit = if plan.limit == 0 { usize::MAX } else { plan.limit };
        Ok(hits.into_iter().skip(plan.offset).take(limit).collect())
    }

    /// Resolve a scan hit to a record payload. ID-index hits carry the
    /// payload directly; secondary hits carry an encoded primary key that
    /// is dereferenced with a point read.
    fn dereference(&self, primary: bool, value: Vec<u8>) -> Result<Option<Vec<u8>>> {
        if primary {
            return Ok(Some(value));
        }
        let id_key = self.indexes.id_key(&value);
        let payload = self.store.read(&id_key)?;
        if payload.is_none() {
            warn!(
                namespace = self.indexes.namespace(),
                primary = %String::from_utf8_lossy(&value),
                "secondary index entry points at a missing record, skipping"
            );
        }
        Ok(payload)
    }
}
