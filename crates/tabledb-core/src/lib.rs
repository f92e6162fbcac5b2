//! TableDB Core
//!
//! This crate provides the fundamental types of the TableDB indexing layer:
//! field values, record reflection, the order-preserving key codec, and the
//! index declarations that describe a table.
//!
//! # Overview
//!
//! - **Values**: [`Value`], the indexable scalars (null, bool, int, float,
//!   string)
//! - **Records**: [`Fields`], named fields reflected out of any
//!   serde-serializable record, plus the JSON payload codec
//! - **Key codec**: [`codec`], byte encodings whose lexicographic order
//!   equals value order, ascending or descending
//! - **Indexes**: [`Index`] and [`IndexSet`], the declarative description
//!   of a table and the derivation of every storage key a record occupies
//! - **Queries**: [`Query`], equality filters with ordering and pagination
//!
//! # Example
//!
//! ```
//! use tabledb_core::{Fields, Index, IndexSet, Query};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct User {
//!     id: String,
//!     age: i64,
//! }
//!
//! let indexes = IndexSet::new(
//!     "users",
//!     IndexSet::default_id_index(),
//!     vec![Index::by_equality("age")],
//! );
//!
//! let fields = Fields::from_record(&User { id: "1".into(), age: 30 })?;
//! let entries = indexes.entries(&fields)?;
//! assert_eq!(entries.len(), 2); // ID entry + age entry
//!
//! let query = Query::equals("age", 30i64);
//! # Ok::<(), tabledb_core::CoreError>(())
//! ```
//!
//! # Modules
//!
//! - [`types`] - Field values and record reflection
//! - [`codec`] - Order-preserving key encoding
//! - [`index`] - Index declarations and key derivation
//! - [`query`] - Query descriptions
//! - [`error`] - Error types ([`CoreError`])

pub mod codec;
pub mod error;
pub mod index;
pub mod query;
pub mod types;

// Re-export commonly used types
pub use error::CoreError;
pub use index::{Index, IndexEntry, IndexSet, Order, OrderType};
pub use query::Query;
pub use types::{from_payload, to_payload, Fields, Value};
