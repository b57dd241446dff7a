//! Persistence of search states between requests
//!
//! A search state is stored under a [`SearchKey`] (search context plus owning
//! session) and replaced as a whole on every update. Two stores are provided:
//!
//! - **`MemorySessions`**: in-process cache with a time-to-live, for long running hosts
//! - **`FileSessions`**: one JSON file per search on disk, for one-shot processes such as the CLI
//!
//! Both treat entries older than their TTL as absent.

pub mod error;
pub mod file;
pub mod memory;

pub use error::SessionError;
pub use file::FileSessions;
pub use memory::MemorySessions;

use crate::search::{SearchKey, SearchState};

/// Storage for search states keyed by context and session
pub trait SessionStore {
    /// Store `state` under `key`, replacing any previous state
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the state cannot be written.
    fn save_state(&self, key: &SearchKey, state: &SearchState) -> Result<(), SessionError>;

    /// State stored under `key`, or `None` if absent or expired
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the store cannot be read.
    fn load_state(&self, key: &SearchKey) -> Result<Option<SearchState>, SessionError>;

    /// Remove the state stored under `key`
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if the store cannot be written.
    fn clear_state(&self, key: &SearchKey) -> Result<(), SessionError>;
}
