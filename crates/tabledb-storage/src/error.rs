//! Storage error types.

use thiserror::Error;

/// Errors that can occur in store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be opened or created.
    #[error("failed to open store: {0}")]
    Open(String),

    /// The backend reported a failure.
    #[error("store backend error: {0}")]
    Backend(String),

    /// An internal lock was poisoned (a thread panicked while holding it).
    #[error("store lock poisoned: {0}")]
    LockPoisoned(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
