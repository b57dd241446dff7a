//! "Related items" ranking by tag similarity

use super::error::SearchError;
use super::traits::{ResourceStore, TagIndex};
use crate::model::{Item, Resource, ResourceId, ResourceType};
use log::{debug, warn};
use serde::Serialize;
use std::collections::HashMap;

/// An item with its similarity to the reference item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedMatch {
    pub item: Item,
    pub score: f64,
}

/// Ranks items by how many tags they share with a reference item
pub struct RelatedItemRanker<'a, I: TagIndex + ?Sized, R: ResourceStore + ?Sized> {
    index: &'a I,
    store: &'a R,
}

impl<'a, I: TagIndex + ?Sized, R: ResourceStore + ?Sized> RelatedItemRanker<'a, I, R> {
    #[must_use]
    pub const fn new(index: &'a I, store: &'a R) -> Self {
        Self { index, store }
    }

    /// Items similar to `item`, best match first
    ///
    /// With `owner_only` the candidates are limited to items owned by the
    /// reference item's owner. The index's ordering is kept as-is; ids that no
    /// longer resolve are dropped without reordering the rest.
    ///
    /// The store is only consulted once the index reports candidates, except
    /// for the owner lookup that `owner_only` needs before asking the index.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::UnknownResource` if `owner_only` is set and the
    /// reference item has no owner, and `SearchError::BackendUnavailable` if a
    /// collaborator fails.
    pub fn related_to(
        &self,
        item: ResourceId,
        owner_only: bool,
        limit: usize,
    ) -> Result<Vec<RankedMatch>, SearchError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let owner = if owner_only {
            let owner = self
                .store
                .owner_of(item)?
                .ok_or(SearchError::UnknownResource(item))?;
            Some(owner)
        } else {
            None
        };

        let scored = self
            .index
            .get_similar(item, ResourceType::Item, limit, owner.as_deref())?;
        if scored.is_empty() {
            debug!("no items similar to item {item}");
            return Ok(Vec::new());
        }

        let ids: Vec<ResourceId> = scored.iter().map(|s| s.id).collect();
        let fetched = self.store.fetch_by_ids(&ids, ResourceType::Item)?;
        for id in &fetched.missing {
            warn!("dropping related item {id}: missing from the store");
        }

        let mut items: HashMap<ResourceId, Item> = fetched
            .found
            .into_iter()
            .filter_map(|resource| match resource {
                Resource::Item(i) => Some((i.id, i)),
                Resource::Collection(_) => None,
            })
            .collect();

        Ok(scored
            .into_iter()
            .filter_map(|s| items.remove(&s.id).map(|item| RankedMatch { item, score: s.score }))
            .take(limit)
            .collect())
    }
}
