//! Session persistence errors

use std::io;
use thiserror::Error;

/// Errors that can occur while saving or loading search states
#[derive(Debug, Error)]
pub enum SessionError {
    /// I/O error on the session file
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Session data could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
