//! In-process session store backed by a TTL cache

use super::{SessionError, SessionStore};
use crate::search::{SearchKey, SearchState};
use moka::sync::Cache;
use std::time::Duration;

/// Search states held in memory, evicted after a time-to-live
///
/// Safe to share between threads; each entry is replaced whole on save.
pub struct MemorySessions {
    cache: Cache<SearchKey, SearchState>,
}

impl MemorySessions {
    /// Create a store whose entries live for `ttl`, holding at most `max_capacity` states
    #[must_use]
    pub fn new(ttl: Duration, max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .time_to_live(ttl)
            .max_capacity(max_capacity)
            .build();
        Self { cache }
    }

    /// Number of stored states
    #[must_use]
    pub fn len(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionStore for MemorySessions {
    fn save_state(&self, key: &SearchKey, state: &SearchState) -> Result<(), SessionError> {
        self.cache.insert(key.clone(), state.clone());
        Ok(())
    }

    fn load_state(&self, key: &SearchKey) -> Result<Option<SearchState>, SessionError> {
        Ok(self.cache.get(key))
    }

    fn clear_state(&self, key: &SearchKey) -> Result<(), SessionError> {
        self.cache.invalidate(key);
        Ok(())
    }
}
