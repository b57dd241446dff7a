//! Resolution of tag queries into search states
//!
//! `SearchEngine` turns tag names and a filter into a [`SearchState`]:
//!
//! ```text
//! tag names ──resolve_tag_ids──▶ tag ids ──query_by_tags (per kind)──▶ id lists
//! ```
//!
//! One index query is issued per resource kind included by the filter scope.
//! An empty tag set short-circuits to an empty state without touching the index.

use super::error::SearchError;
use super::state::{Filter, SearchQuery, SearchState};
use super::traits::TagIndex;
use crate::model::{ResourceId, ResourceType, Tag, TagId, TagInfo};
use log::debug;
use std::collections::HashMap;

/// Builds search states from a tag index
pub struct SearchEngine<'a, I: TagIndex + ?Sized> {
    index: &'a I,
}

impl<'a, I: TagIndex + ?Sized> SearchEngine<'a, I> {
    #[must_use]
    pub const fn new(index: &'a I) -> Self {
        Self { index }
    }

    /// Resolve tag names and a filter into a search state
    ///
    /// # Errors
    ///
    /// Returns `SearchError::UnknownTag` if a name is unknown to the index and
    /// `SearchError::BackendUnavailable` if the index fails.
    pub fn resolve(&self, tag_names: &[String], filter: &Filter) -> Result<SearchState, SearchError> {
        self.resolve_query(&SearchQuery::new(tag_names.to_vec(), filter.clone()))
    }

    /// Resolve a stored query again against the current index
    ///
    /// # Errors
    ///
    /// Same as [`SearchEngine::resolve`].
    pub fn resolve_query(&self, query: &SearchQuery) -> Result<SearchState, SearchError> {
        if query.is_empty() {
            return Ok(SearchState::empty(query.clone()));
        }

        let tags = self.resolve_tags(&query.tags)?;
        let tag_ids: Vec<TagId> = tags.iter().map(|t| t.id).collect();

        let collection_ids = self.query_kind(&tag_ids, ResourceType::Collection, &query.filter)?;
        let item_ids = self.query_kind(&tag_ids, ResourceType::Item, &query.filter)?;

        debug!(
            "resolved {:?}: {} collection(s), {} item(s)",
            query.tags,
            collection_ids.len(),
            item_ids.len()
        );

        Ok(SearchState::new(query.clone(), tags, collection_ids, item_ids))
    }

    /// Tags co-occurring with the current search, most frequent first
    ///
    /// Each entry carries the number of matched resources that also carry the
    /// tag, which is the size of the search refined by that tag. The search's
    /// own tags and tags with no matches are left out.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::BackendUnavailable` if the index fails.
    pub fn related_tags(&self, state: &SearchState) -> Result<Vec<TagInfo>, SearchError> {
        if state.query().is_empty() {
            return Ok(Vec::new());
        }

        let mut totals: HashMap<TagId, TagInfo> = HashMap::new();
        let matched = state
            .collection_ids()
            .iter()
            .map(|id| (*id, ResourceType::Collection))
            .chain(state.item_ids().iter().map(|id| (*id, ResourceType::Item)));

        for (id, kind) in matched {
            for tag in self.index.tags_of(id, kind)? {
                if state.tags().iter().any(|t| t.id == tag.id) {
                    continue;
                }
                totals
                    .entry(tag.id)
                    .or_insert_with(|| TagInfo { tag, total: 0 })
                    .total += 1;
            }
        }

        let mut related: Vec<TagInfo> = totals.into_values().filter(|info| info.total > 0).collect();
        related.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.tag.name.cmp(&b.tag.name)));
        Ok(related)
    }

    fn resolve_tags(&self, names: &[String]) -> Result<Vec<Tag>, SearchError> {
        let known = self.index.resolve_tag_ids(names)?;
        names
            .iter()
            .map(|name| {
                known
                    .iter()
                    .find(|tag| &tag.name == name)
                    .cloned()
                    .ok_or_else(|| SearchError::UnknownTag(name.clone()))
            })
            .collect()
    }

    fn query_kind(
        &self,
        tag_ids: &[TagId],
        kind: ResourceType,
        filter: &Filter,
    ) -> Result<Vec<ResourceId>, SearchError> {
        if filter.scope.includes(kind) {
            Ok(self.index.query_by_tags(tag_ids, kind, filter)?)
        } else {
            Ok(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResourceScope;
    use crate::testing::FakeIndex;

    fn names(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|t| (*t).to_string()).collect()
    }

    #[test]
    fn test_empty_tag_set_skips_index() {
        let index = FakeIndex::with_ids(3, 4);
        let engine = SearchEngine::new(&index);

        let state = engine.resolve(&[], &Filter::default()).unwrap();

        assert_eq!(state.collection_count(), 0);
        assert_eq!(state.item_count(), 0);
        assert_eq!(index.calls(), 0);
    }

    #[test]
    fn test_resolve_both_kinds() {
        let index = FakeIndex::with_ids(3, 4);
        let engine = SearchEngine::new(&index);

        let state = engine.resolve(&names(&["beach"]), &Filter::default()).unwrap();

        assert_eq!(state.collection_count(), 3);
        assert_eq!(state.item_count(), 4);
        assert_eq!(state.total_count(), 7);
        assert_eq!(state.tags()[0].name, "beach");
    }

    #[test]
    fn test_scope_excludes_kind_without_query() {
        let index = FakeIndex::with_ids(3, 4);
        let engine = SearchEngine::new(&index);

        let state = engine
            .resolve(&names(&["beach"]), &Filter::new(ResourceScope::Items))
            .unwrap();

        assert!(state.collection_ids().is_empty());
        assert_eq!(state.item_count(), 4);
        assert_eq!(index.query_calls(), 1);
    }

    #[test]
    fn test_unknown_tag() {
        let index = FakeIndex::with_ids(1, 1);
        let engine = SearchEngine::new(&index);

        let err = engine
            .resolve(&names(&["beach", "volcano"]), &Filter::default())
            .unwrap_err();
        assert!(matches!(err, SearchError::UnknownTag(name) if name == "volcano"));
    }

    #[test]
    fn test_known_tag_without_matches_is_not_an_error() {
        let index = FakeIndex::with_ids(0, 0);
        let engine = SearchEngine::new(&index);

        let state = engine.resolve(&names(&["beach"]), &Filter::default()).unwrap();
        assert_eq!(state.total_count(), 0);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let index = FakeIndex::with_ids(2, 5);
        let engine = SearchEngine::new(&index);
        let filter = Filter::default().owner("alice");

        let first = engine.resolve(&names(&["beach", "sunset"]), &filter).unwrap();
        let second = engine.resolve(&names(&["beach", "sunset"]), &filter).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_backend_failure_propagates() {
        let index = FakeIndex::with_ids(1, 1).failing();
        let engine = SearchEngine::new(&index);

        let err = engine.resolve(&names(&["beach"]), &Filter::default()).unwrap_err();
        assert!(matches!(err, SearchError::BackendUnavailable(_)));
    }

    #[test]
    fn test_related_tags_sorted_by_total() {
        let index = FakeIndex::with_ids(1, 3)
            .tag_resource(ResourceType::Collection, 1, &["sunset"])
            .tag_resource(ResourceType::Item, 101, &["sunset", "sea"])
            .tag_resource(ResourceType::Item, 102, &["sea"])
            .tag_resource(ResourceType::Item, 103, &["sea", "beach"]);
        let engine = SearchEngine::new(&index);

        let state = engine.resolve(&names(&["beach"]), &Filter::default()).unwrap();
        let related = engine.related_tags(&state).unwrap();

        let summary: Vec<(&str, usize)> = related
            .iter()
            .map(|info| (info.tag.name.as_str(), info.total))
            .collect();
        assert_eq!(summary, vec![("sea", 3), ("sunset", 2)]);
    }

    #[test]
    fn test_related_tags_for_empty_search() {
        let index = FakeIndex::with_ids(1, 1);
        let engine = SearchEngine::new(&index);
        let state = SearchState::empty(SearchQuery::default());

        assert!(engine.related_tags(&state).unwrap().is_empty());
        assert_eq!(index.calls(), 0);
    }
}
