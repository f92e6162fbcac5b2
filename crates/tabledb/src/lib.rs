//! TableDB - A Record-Oriented Indexing Layer
//!
//! TableDB sits on top of an opaque ordered key-value store and provides a
//! record-oriented API with secondary indexes. Callers insert, update, and
//! delete serde-serializable records; the layer maintains a primary index
//! plus any number of declared secondary indexes so that callers can read a
//! single record, list a filtered subset, or list all records in a declared
//! sort order.
//!
//! # Quick Start
//!
//! ```
//! use serde::{Deserialize, Serialize};
//! use tabledb::{Index, MemoryStore, Query, Table, TableOptions, Value};
//!
//! #[derive(Debug, Serialize, Deserialize)]
//! struct Post {
//!     id: String,
//!     slug: String,
//!     created: i64,
//! }
//!
//! // Declare a slug index and a reverse-chronological index.
//! let created = Index::by_equality("created").descending();
//! let slug = Index::by_equality("slug").unique(true);
//!
//! let table = Table::new(
//!     MemoryStore::new(),
//!     "posts",
//!     vec![slug.clone(), created.clone()],
//!     TableOptions::new(),
//! );
//!
//! table.save(&Post { id: "1".into(), slug: "hello".into(), created: 100 })?;
//! table.save(&Post { id: "2".into(), slug: "world".into(), created: 200 })?;
//!
//! // Point read by unique slug.
//! let post: Post = table.read(&slug.to_query("hello"))?;
//! assert_eq!(post.id, "1");
//!
//! // Newest first.
//! let recent: Vec<Post> = table.list(&created.to_query(Value::Null))?;
//! assert_eq!(recent[0].id, "2");
//!
//! // Remove a record and every index entry it occupies.
//! table.delete(&Query::equals("id", "1"))?;
//! # Ok::<(), tabledb::Error>(())
//! ```
//!
//! # Concurrency
//!
//! The engine performs no locking: it assumes a single logical writer per
//! primary key and relies on the store's per-key atomicity. The store
//! handle is shared and thread-safe by contract; index declarations are
//! immutable after table construction.
//!
//! # Modules
//!
//! - [`table`] - The table engine ([`Table`], [`TableOptions`])
//! - [`error`] - Error types ([`enum@Error`])

// Deny unwrap in library code to ensure proper error handling
#![deny(clippy::unwrap_used)]

// Re-export core types
pub use tabledb_core::{CoreError, Fields, Index, IndexSet, Order, OrderType, Query, Value};

// Re-export storage types
pub use tabledb_storage::backends::{MemoryStore, RedbStore};
pub use tabledb_storage::{ListOptions, Store, StoreError};

pub mod error;
mod plan;
pub mod table;

pub use error::{Error, Result};
pub use table::{Table, TableOptions};
