//! Collaborator interfaces consumed by the search engine
//!
//! The engine never looks at storage directly. It talks to two adapters:
//!
//! ```text
//! ┌──────────────────────────┐      ┌──────────────────────────┐
//! │  TagIndex                │      │  ResourceStore           │
//! │  - resolve_tag_ids       │      │  - fetch_by_ids          │
//! │  - query_by_tags         │      │  - owner_of              │
//! │  - get_similar           │      └──────────────────────────┘
//! │  - tags_of               │
//! └──────────────────────────┘
//!            ▲                                 ▲
//!            │ implements                      │ implements
//!            └──────────┬──────────────────────┘
//!                 db::Database (sled)
//! ```
//!
//! Timeouts and retries belong to the adapters; a failed call surfaces as
//! [`BackendError`].

use super::error::BackendError;
use super::state::Filter;
use crate::model::{Resource, ResourceId, ResourceType, Tag, TagId};

/// Similarity score attached to a resource id
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredId {
    pub id: ResourceId,
    /// Higher means more similar; only comparable within one query
    pub score: f64,
}

impl ScoredId {
    #[must_use]
    pub const fn new(id: ResourceId, score: f64) -> Self {
        Self { id, score }
    }
}

/// Outcome of a batch lookup in the resource store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fetched {
    /// Resources that exist, in the order their ids were requested
    pub found: Vec<Resource>,
    /// Requested ids with no backing record
    pub missing: Vec<ResourceId>,
}

/// Tag-name resolution and tag-based queries
pub trait TagIndex {
    /// Resolve tag names to tags
    ///
    /// Names the index does not know are absent from the result; the caller
    /// decides whether that is an error.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the index cannot be queried.
    fn resolve_tag_ids(&self, names: &[String]) -> Result<Vec<Tag>, BackendError>;

    /// Ids of resources of `kind` carrying every tag in `tag_ids`, narrowed by `filter`
    ///
    /// The order is defined by the index and must be stable for a given index state.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the index cannot be queried.
    fn query_by_tags(
        &self,
        tag_ids: &[TagId],
        kind: ResourceType,
        filter: &Filter,
    ) -> Result<Vec<ResourceId>, BackendError>;

    /// Resources of `kind` sharing tags with `reference`, best match first
    ///
    /// At most `limit` entries, ordered by non-increasing score. When `owner`
    /// is given only resources owned by that identity are considered.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the index cannot be queried.
    fn get_similar(
        &self,
        reference: ResourceId,
        kind: ResourceType,
        limit: usize,
        owner: Option<&str>,
    ) -> Result<Vec<ScoredId>, BackendError>;

    /// Tags attached to a single resource
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the index cannot be queried.
    fn tags_of(&self, id: ResourceId, kind: ResourceType) -> Result<Vec<Tag>, BackendError>;
}

/// Lookup of the objects behind resource ids
pub trait ResourceStore {
    /// Fetch resources of `kind` by id, reporting ids that do not resolve
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the store cannot be read.
    fn fetch_by_ids(&self, ids: &[ResourceId], kind: ResourceType) -> Result<Fetched, BackendError>;

    /// Owning identity of an item, taken from its collection
    ///
    /// Returns `None` when the item or its collection does not exist.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the store cannot be read.
    fn owner_of(&self, item: ResourceId) -> Result<Option<String>, BackendError>;
}
