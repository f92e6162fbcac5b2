//! Error types for TableDB.
//!
//! This module provides the [`enum@Error`] type covering every failure mode
//! of the table operations. All errors propagate to the caller unchanged;
//! this layer performs no retries.

use thiserror::Error;

/// Errors that can occur when using a table.
#[derive(Debug, Error)]
pub enum Error {
    /// A read found zero records matching the query.
    #[error("record not found")]
    NotFound,

    /// A read found more than one record matching the query.
    #[error("multiple records found")]
    MultipleRecordsFound,

    /// A save would violate a unique secondary index.
    #[error("duplicate value on unique index '{index}'")]
    Duplicate {
        /// The unique index that rejected the record.
        index: String,
    },

    /// The record's primary-key field is absent or empty.
    #[error("record is missing its primary key")]
    MissingId,

    /// The query's field matches neither the ID index nor any secondary
    /// index.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The underlying key-value store failed.
    #[error("store failure: {0}")]
    Store(#[from] tabledb_storage::StoreError),

    /// A record or payload could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] tabledb_core::CoreError),
}

/// A specialized `Result` type for table operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(Error::NotFound.to_string(), "record not found");
        assert_eq!(
            Error::Duplicate { index: "tag".into() }.to_string(),
            "duplicate value on unique index 'tag'"
        );
        assert_eq!(Error::MissingId.to_string(), "record is missing its primary key");
    }

    #[test]
    fn store_errors_preserve_their_cause() {
        let cause = tabledb_storage::StoreError::Backend("disk on fire".into());
        let err = Error::from(cause);
        assert!(err.to_string().contains("disk on fire"));
        assert!(matches!(err, Error::Store(_)));
    }
}
