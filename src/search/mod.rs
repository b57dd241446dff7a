//! Tag search engine
//!
//! Resolves a set of tags into matching collections and items and serves them
//! as one stably paginated list, collections first. Also ranks items by tag
//! similarity to a reference item.
//!
//! - `state`: queries, filters and resolved search states
//! - `engine`: tag resolution and per-kind index queries
//! - `slicer`: pure page arithmetic over resolved id lists
//! - `resolver`: id to object lookup that tolerates stale index entries
//! - `related`: similarity ranking
//! - `browse`: the query surface tying it all to a session store

pub mod browse;
pub mod engine;
pub mod error;
pub mod related;
pub mod resolver;
pub mod slicer;
pub mod state;
pub mod traits;

pub use browse::{PageResult, TagBrowser};
pub use engine::SearchEngine;
pub use error::{BackendError, SearchError};
pub use related::{RankedMatch, RelatedItemRanker};
pub use slicer::{PageRequest, PageSlice};
pub use state::{Filter, Narrowing, SearchContext, SearchKey, SearchQuery, SearchState};
pub use traits::{Fetched, ResourceStore, ScoredId, TagIndex};
