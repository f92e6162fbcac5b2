//! Error types for the core crate.

use thiserror::Error;

/// Errors that can occur in the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A record or payload failed to (de)serialize.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A field holds a value that cannot be used in an index key.
    #[error("field '{field}' has unsupported type for indexing: {kind}")]
    UnsupportedField {
        /// The field name as declared on the index.
        field: String,
        /// What was found instead of an indexable scalar.
        kind: String,
    },
}
