//! Query surface used by the CLI and other front ends
//!
//! `TagBrowser` ties the engine, the slicer, the resolver and the ranker to a
//! session store:
//!
//! ```text
//! search(context, session, tags, filter) ──▶ SearchKey   (state saved)
//! get_page(key, page, size)              ──▶ PageResult  (state re-resolved, replaced)
//! add_tag / remove_tag(key, tag)         ──▶ SearchState (state refined, replaced)
//! get_related(item, owner_only, limit)   ──▶ Vec<RankedMatch>
//! ```
//!
//! Every page request resolves the stored query again, so a page always
//! reflects the current index. The stored state is read, then replaced as a
//! whole; it is never modified in place.

use super::engine::SearchEngine;
use super::error::SearchError;
use super::related::{RankedMatch, RelatedItemRanker};
use super::resolver::resolve_ids;
use super::slicer::{self, PageRequest};
use super::state::{Filter, SearchContext, SearchKey, SearchQuery, SearchState};
use super::traits::{ResourceStore, TagIndex};
use crate::model::{Resource, ResourceId, ResourceType, TagInfo};
use crate::session::SessionStore;
use log::debug;

/// One page of search results: collections first, then items
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    pub page: usize,
    pub page_size: usize,
    pub collection_count: usize,
    pub item_count: usize,
    pub resources: Vec<Resource>,
}

impl PageResult {
    #[must_use]
    pub const fn total_count(&self) -> usize {
        self.collection_count + self.item_count
    }

    #[must_use]
    pub const fn page_count(&self) -> usize {
        slicer::page_count(self.total_count(), self.page_size)
    }
}

/// Search, paging and related-item lookups over a tag index and a resource store
pub struct TagBrowser<'a, I, R, S>
where
    I: TagIndex + ?Sized,
    R: ResourceStore + ?Sized,
    S: SessionStore + ?Sized,
{
    index: &'a I,
    store: &'a R,
    sessions: &'a S,
}

impl<'a, I, R, S> TagBrowser<'a, I, R, S>
where
    I: TagIndex + ?Sized,
    R: ResourceStore + ?Sized,
    S: SessionStore + ?Sized,
{
    #[must_use]
    pub const fn new(index: &'a I, store: &'a R, sessions: &'a S) -> Self {
        Self {
            index,
            store,
            sessions,
        }
    }

    #[must_use]
    pub const fn engine(&self) -> SearchEngine<'a, I> {
        SearchEngine::new(self.index)
    }

    /// Start a new search and persist it for `session`
    ///
    /// Any state previously stored under the same context and session is replaced.
    ///
    /// # Errors
    ///
    /// Returns `SearchError` if the filter is invalid for the context, a tag is
    /// unknown, a collaborator fails or the state cannot be saved.
    pub fn search(
        &self,
        context: SearchContext,
        session: &str,
        tag_names: &[String],
        filter: Filter,
    ) -> Result<SearchKey, SearchError> {
        let filter = context.prepare(filter)?;
        let state = self.engine().resolve(tag_names, &filter)?;
        let key = SearchKey::new(context, session);
        self.sessions.save_state(&key, &state)?;
        debug!("saved search {key} with {} result(s)", state.total_count());
        Ok(key)
    }

    /// Last stored state for `key`, if any
    ///
    /// # Errors
    ///
    /// Returns `SearchError::Session` if the session store fails.
    pub fn state(&self, key: &SearchKey) -> Result<Option<SearchState>, SearchError> {
        Ok(self.sessions.load_state(key)?)
    }

    /// Fetch one page of the search stored under `key`
    ///
    /// A key without stored state behaves like an empty tag set.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::InvalidPage` for a zero page size, and
    /// `SearchError` if resolution, lookup or persistence fails.
    pub fn get_page(
        &self,
        key: &SearchKey,
        page_index: usize,
        page_size: usize,
    ) -> Result<PageResult, SearchError> {
        let page = PageRequest::new(page_index, page_size)?;
        let state = self.refresh(key)?;

        let slice = slicer::slice(&state, page);
        debug!(
            "page {page_index} of {key}: {} collection(s), {} item(s)",
            slice.collections.len(),
            slice.items.len()
        );

        let mut resources = resolve_ids(self.store, slice.collections, ResourceType::Collection)?;
        resources.extend(resolve_ids(self.store, slice.items, ResourceType::Item)?);

        Ok(PageResult {
            page: page_index,
            page_size,
            collection_count: state.collection_count(),
            item_count: state.item_count(),
            resources,
        })
    }

    /// Narrow the stored search by one more tag
    ///
    /// # Errors
    ///
    /// Returns `SearchError::InvalidFilter` if the stored filter does not fit
    /// the key's context (an owner key with nothing stored has no owner),
    /// `SearchError::UnknownTag` if the tag is unknown, and `SearchError` if
    /// resolution or persistence fails.
    pub fn add_tag(&self, key: &SearchKey, tag: &str) -> Result<SearchState, SearchError> {
        self.refine(key, |query| query.with_tag(tag))
    }

    /// Widen the stored search by dropping a tag; no-op if it is not part of it
    ///
    /// # Errors
    ///
    /// Returns `SearchError::InvalidFilter` if the stored filter does not fit
    /// the key's context, and `SearchError` if resolution or persistence fails.
    pub fn remove_tag(&self, key: &SearchKey, tag: &str) -> Result<SearchState, SearchError> {
        self.refine(key, |query| query.without_tag(tag))
    }

    /// Tags that would narrow the stored search, most useful first
    ///
    /// # Errors
    ///
    /// Returns `SearchError` if resolution or persistence fails.
    pub fn related_tags(&self, key: &SearchKey) -> Result<Vec<TagInfo>, SearchError> {
        let state = self.refresh(key)?;
        self.engine().related_tags(&state)
    }

    /// Forget the search stored under `key`
    ///
    /// # Errors
    ///
    /// Returns `SearchError::Session` if the session store fails.
    pub fn clear(&self, key: &SearchKey) -> Result<(), SearchError> {
        Ok(self.sessions.clear_state(key)?)
    }

    /// Items similar to `item`, best match first
    ///
    /// # Errors
    ///
    /// See [`RelatedItemRanker::related_to`].
    pub fn get_related(
        &self,
        item: ResourceId,
        owner_only: bool,
        limit: usize,
    ) -> Result<Vec<RankedMatch>, SearchError> {
        RelatedItemRanker::new(self.index, self.store).related_to(item, owner_only, limit)
    }

    fn stored_query(&self, key: &SearchKey) -> Result<SearchQuery, SearchError> {
        Ok(self
            .sessions
            .load_state(key)?
            .map(|state| state.query().clone())
            .unwrap_or_default())
    }

    fn refresh(&self, key: &SearchKey) -> Result<SearchState, SearchError> {
        let query = self.stored_query(key)?;
        let state = self.engine().resolve_query(&query)?;
        if !query.is_empty() {
            self.sessions.save_state(key, &state)?;
        }
        Ok(state)
    }

    fn refine<F>(&self, key: &SearchKey, change: F) -> Result<SearchState, SearchError>
    where
        F: FnOnce(&SearchQuery) -> SearchQuery,
    {
        let mut query = change(&self.stored_query(key)?);
        query.filter = key.context.prepare(query.filter)?;
        let state = self.engine().resolve_query(&query)?;
        self.sessions.save_state(key, &state)?;
        Ok(state)
    }
}
