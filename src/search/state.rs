//! Search inputs and the resolved search state
//!
//! - **`Filter`**: resource scope plus one optional narrowing criterion
//! - **`SearchQuery`**: ordered tag names and a filter, i.e. what the user asked for
//! - **`SearchState`**: a query resolved against the index (tags and matching ids)
//! - **`SearchContext`** / **`SearchKey`**: where a state is persisted between requests
//!
//! A `SearchState` is a value: it is built by the engine, handed out, persisted
//! and replaced, never mutated in place.

use super::error::SearchError;
use crate::model::{ResourceId, ResourceScope, Tag};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Narrowing criteria for a tag search
///
/// `owner` and `container_set` are meant to be used one at a time. When both
/// are set, `container_set` takes precedence and `owner` is ignored; see
/// [`Filter::narrowing`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub scope: ResourceScope,
    pub owner: Option<String>,
    pub container_set: Option<BTreeSet<ResourceId>>,
}

/// The single narrowing criterion a filter applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Narrowing<'a> {
    None,
    Owner(&'a str),
    Containers(&'a BTreeSet<ResourceId>),
}

impl Filter {
    #[must_use]
    pub fn new(scope: ResourceScope) -> Self {
        Self {
            scope,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    #[must_use]
    pub fn containers(mut self, ids: impl IntoIterator<Item = ResourceId>) -> Self {
        self.container_set = Some(ids.into_iter().collect());
        self
    }

    /// Effective narrowing, with `container_set` winning over `owner`
    #[must_use]
    pub fn narrowing(&self) -> Narrowing<'_> {
        match (&self.container_set, &self.owner) {
            (Some(set), _) => Narrowing::Containers(set),
            (None, Some(owner)) => Narrowing::Owner(owner),
            (None, None) => Narrowing::None,
        }
    }
}

/// Ordered tag names plus filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub tags: Vec<String>,
    pub filter: Filter,
}

impl SearchQuery {
    #[must_use]
    pub fn new(tags: Vec<String>, filter: Filter) -> Self {
        Self { tags, filter }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Query with `name` appended, unless it is already part of the tag set
    #[must_use]
    pub fn with_tag(&self, name: &str) -> Self {
        let mut next = self.clone();
        if !next.tags.iter().any(|t| t == name) {
            next.tags.push(name.to_string());
        }
        next
    }

    /// Query with `name` removed; unchanged if it was not present
    #[must_use]
    pub fn without_tag(&self, name: &str) -> Self {
        let mut next = self.clone();
        next.tags.retain(|t| t != name);
        next
    }
}

/// A query resolved against the tag index
///
/// Counts are the lengths of the id sequences, so they can never disagree
/// with them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchState {
    query: SearchQuery,
    tags: Vec<Tag>,
    collection_ids: Vec<ResourceId>,
    item_ids: Vec<ResourceId>,
}

impl SearchState {
    pub(crate) fn new(
        query: SearchQuery,
        tags: Vec<Tag>,
        collection_ids: Vec<ResourceId>,
        item_ids: Vec<ResourceId>,
    ) -> Self {
        Self {
            query,
            tags,
            collection_ids,
            item_ids,
        }
    }

    /// State of a query that matches nothing without consulting the index
    #[must_use]
    pub fn empty(query: SearchQuery) -> Self {
        Self {
            query,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn query(&self) -> &SearchQuery {
        &self.query
    }

    #[must_use]
    pub const fn filter(&self) -> &Filter {
        &self.query.filter
    }

    /// Resolved tags, in query order
    #[must_use]
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    #[must_use]
    pub fn collection_ids(&self) -> &[ResourceId] {
        &self.collection_ids
    }

    #[must_use]
    pub fn item_ids(&self) -> &[ResourceId] {
        &self.item_ids
    }

    #[must_use]
    pub fn collection_count(&self) -> usize {
        self.collection_ids.len()
    }

    #[must_use]
    pub fn item_count(&self) -> usize {
        self.item_ids.len()
    }

    #[must_use]
    pub fn total_count(&self) -> usize {
        self.collection_count() + self.item_count()
    }
}

/// Named search flavours, each with its own filter rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchContext {
    /// Tag search across everything visible
    #[default]
    Tags,
    /// Tag search inside one owner's collections
    Owner,
}

impl SearchContext {
    pub const ALL: [Self; 2] = [Self::Tags, Self::Owner];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tags => "tags",
            Self::Owner => "owner",
        }
    }

    /// Apply the context's rules to a caller supplied filter
    ///
    /// # Errors
    ///
    /// Returns `SearchError::InvalidFilter` if the filter does not satisfy the
    /// context, e.g. an owner search without an owner.
    pub fn prepare(self, filter: Filter) -> Result<Filter, SearchError> {
        match self {
            Self::Tags => Ok(filter),
            Self::Owner => match filter.owner.as_deref() {
                Some(owner) if !owner.trim().is_empty() => Ok(filter),
                _ => Err(SearchError::InvalidFilter(
                    "owner search requires an owner".to_string(),
                )),
            },
        }
    }
}

impl fmt::Display for SearchContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchContext {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|context| context.as_str() == s.trim())
            .ok_or_else(|| SearchError::UnknownContext(s.to_string()))
    }
}

/// Persistence key of a search state: context plus owning session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchKey {
    pub context: SearchContext,
    pub session: String,
}

impl SearchKey {
    #[must_use]
    pub fn new(context: SearchContext, session: impl Into<String>) -> Self {
        Self {
            context,
            session: session.into(),
        }
    }
}

impl fmt::Display for SearchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.context, self.session)
    }
}
