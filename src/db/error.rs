//! Database-specific error types
//!
//! This module defines all error types that can occur during database operations.
//! Errors are properly categorized and include context for debugging.
//!
//! # Error Types
//!
//! - **`SledError`**: Errors from the underlying sled embedded database
//! - **`DecodeError`**: Failures when deserializing records from the database
//! - **`EncodeError`**: Failures when serializing records to the database
//! - **`CorruptKey`**: A key that does not have the expected id layout
//! - **`NotFound`**: A collection or item that does not exist
//! - **`InvalidTag`**: A tag name with characters outside the accepted set
//!
//! `DbError` converts into the search engine's `BackendError`, so the
//! `TagIndex`/`ResourceStore` implementations can propagate it with `?`.

use crate::search::BackendError;
use thiserror::Error;

/// Database-specific errors
#[derive(Debug, Error)]
pub enum DbError {
    /// Represents a sled database error
    #[error("Database error: {0}")]
    SledError(#[from] sled::Error),

    /// Represents a bincode decoding error
    #[error("Error while decoding data: {0}")]
    DecodeError(#[from] bincode::error::DecodeError),

    /// Represents a bincode encoding error
    #[error("Error while encoding data: {0}")]
    EncodeError(#[from] bincode::error::EncodeError),

    /// Key bytes that are not a big-endian id
    #[error("Corrupt key of {0} byte(s)")]
    CorruptKey(usize),

    /// Collection or item does not exist
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Tag name rejected on write
    #[error("Invalid tag '{0}': only letters, digits and %_+.!*',()~- are allowed")]
    InvalidTag(String),

    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<DbError> for BackendError {
    fn from(err: DbError) -> Self {
        Self::Source(Box::new(err))
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
