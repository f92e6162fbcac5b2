//! TableDB Storage
//!
//! This crate provides the ordered key-value store abstraction the TableDB
//! indexing layer is built on, plus backend implementations.
//!
//! # Overview
//!
//! The [`Store`] trait is deliberately minimal: point writes, point reads,
//! ordered prefix scans, and point deletes. There are no transactions and no
//! batch atomicity; the indexing layer is designed around exactly these
//! capabilities.
//!
//! # Backends
//!
//! - [`backends::MemoryStore`]: `BTreeMap`-backed, for tests and ephemeral
//!   data
//! - [`backends::RedbStore`]: durable, backed by the Redb embedded database
//!
//! # Example
//!
//! ```
//! use tabledb_storage::{backends::MemoryStore, ListOptions, Store};
//!
//! let store = MemoryStore::new();
//! store.write(b"posts/1", b"hello")?;
//! store.write(b"posts/2", b"world")?;
//!
//! let pairs = store.list(b"posts/", ListOptions::default())?;
//! assert_eq!(pairs.len(), 2);
//! # Ok::<(), tabledb_storage::StoreError>(())
//! ```

pub mod backends;
pub mod error;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use store::{prefix_end, KeyValue, ListOptions, Store};
