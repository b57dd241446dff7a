//! Tagfolio - tag-based search and browsing over collections and items
//!
//! This library resolves tag queries against an embedded index, pages through
//! mixed collection and item results with stable ordering, keeps each user's
//! last search in a session store, and ranks items by shared tags.

use thiserror::Error;

pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod model;
pub mod output;
pub mod search;
pub mod session;
pub mod style;

#[cfg(test)]
pub mod testing;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum TagfolioError {
    /// Database error
    #[error("Database error: {0}")]
    DbError(#[from] db::DbError),
    /// Search error
    #[error("Search error: {0}")]
    SearchError(#[from] search::SearchError),
    /// Session store error
    #[error("Session error: {0}")]
    SessionError(#[from] session::SessionError),
    /// Collection style error
    #[error("Style error: {0}")]
    StyleError(#[from] style::StyleError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, TagfolioError>;
