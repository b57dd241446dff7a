//! Command implementations
//!
//! Each command is a module with an execute function that takes parsed CLI args
//! and executes the operation against the database and the session store.

pub mod collection;
pub mod item;
pub mod related;
pub mod search;
pub mod tag;
pub mod tags;

use crate::config::TagfolioConfig;
use crate::db::Database;
use crate::search::TagBrowser;
use crate::session::SessionStore;

// Re-export execute functions for convenience
pub use collection::execute as collection;
pub use item::execute as item;
pub use related::execute as related;
pub use tag::execute as tag;
pub use tags::execute as tags;

/// Everything a command needs besides its own arguments
pub struct CommandEnv<'a> {
    pub db: &'a Database,
    pub sessions: &'a dyn SessionStore,
    pub config: &'a TagfolioConfig,
    /// Session name the stored searches belong to
    pub session: String,
    pub quiet: bool,
}

impl<'a> CommandEnv<'a> {
    /// Query surface over this environment's database and session store
    #[must_use]
    pub fn browser(&self) -> TagBrowser<'a, Database, Database, dyn SessionStore + 'a> {
        TagBrowser::new(self.db, self.db, self.sessions)
    }

    /// Requested page size, or the configured default
    #[must_use]
    pub fn page_size(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.config.page_size)
    }
}
