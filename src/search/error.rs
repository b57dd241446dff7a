//! Search-specific error types
//!
//! This module defines the errors surfaced by the search engine and its query
//! surface. Collaborator failures (tag index, resource store) arrive as
//! [`BackendError`] and are propagated unchanged; they are never retried here.
//!
//! # Error Types
//!
//! - **`UnknownTag`**: A tag name the index cannot resolve at all
//! - **`BackendUnavailable`**: I/O failure in the tag index or resource store
//! - **`InvalidPage`** / **`InvalidFilter`**: Rejected request parameters
//! - **`UnknownResource`**: A reference object that does not exist
//! - **`Session`**: Failure while persisting or restoring search state
//!
//! Missing objects while resolving result ids are not errors: they are
//! dropped and logged by the resolver.

use crate::model::ResourceId;
use thiserror::Error;

/// Failure reported by a tag index or resource store adapter
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend could not be reached or timed out
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// The backend failed while serving the request
    #[error("{0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

/// Search-specific errors
#[derive(Debug, Error)]
pub enum SearchError {
    /// Tag name unknown to the index
    #[error("Unknown tag: {0}")]
    UnknownTag(String),

    /// Tag index or resource store failed
    #[error("Backend error: {0}")]
    BackendUnavailable(#[from] BackendError),

    /// Page request outside the accepted range
    #[error("Invalid page request: {0}")]
    InvalidPage(String),

    /// Filter not acceptable for the search context
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// Search context key not registered
    #[error("Unknown search context: {0}")]
    UnknownContext(String),

    /// Reference object does not exist
    #[error("Unknown resource: {0}")]
    UnknownResource(ResourceId),

    /// Search state could not be saved or loaded
    #[error("Session error: {0}")]
    Session(#[from] crate::session::SessionError),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
