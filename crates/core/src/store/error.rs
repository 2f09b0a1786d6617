//! Error types for the result store.

use thiserror::Error;

/// Errors that can occur reading or writing the result store.
#[derive(Debug, Error)]
pub enum ResultStoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A result with a zero address was handed to the store.
    #[error("Refusing to persist incomplete result: {0} is zero")]
    Incomplete(&'static str),

    /// A stored row could not be decoded.
    #[error("Corrupt stored result: {0}")]
    Corrupt(String),

    #[error("Store lock poisoned")]
    LockPoisoned,
}
