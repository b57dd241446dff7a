//! Testing utilities for tagfolio
//!
//! This module provides helper types for writing tests:
//!
//! - **`TestDb`**: a sled database in a temporary directory
//! - **`FakeIndex`** / **`FakeStore`**: in-memory collaborators that count calls
//!   and can be switched into a failing mode
//!
//! Only available when compiled with `cfg(test)`.

use crate::db::Database;
use crate::model::{Collection, Item, Resource, ResourceId, ResourceType, Tag, TagId};
use crate::search::{BackendError, Fetched, Filter, ResourceStore, ScoredId, TagIndex};
use crate::style::CollectionStyle;
use chrono::Utc;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tempfile::TempDir;

/// Wrapper for a temporary test database that cleans up on drop
///
/// # Examples
/// ```ignore
/// let test_db = TestDb::new();
/// let collection = test_db.db().add_collection("Holiday", "alice", "").unwrap();
/// ```
pub struct TestDb {
    db: Database,
    dir: TempDir,
}

impl TestDb {
    /// # Panics
    /// Panics if the temporary directory or the database cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self::open_with(|db| db)
    }

    /// Test database with a custom similarity threshold
    ///
    /// # Panics
    /// Panics if the temporary directory or the database cannot be created.
    #[must_use]
    pub fn with_similarity_threshold(threshold: usize) -> Self {
        Self::open_with(|db| db.with_similarity_threshold(threshold))
    }

    fn open_with(configure: impl FnOnce(Database) -> Database) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let db = Database::open(dir.path().join("db")).expect("Failed to open test database");
        Self {
            db: configure(db),
            dir,
        }
    }

    /// Get a reference to the underlying database
    #[must_use]
    pub const fn db(&self) -> &Database {
        &self.db
    }

    /// Directory holding the database files
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

impl Default for TestDb {
    fn default() -> Self {
        Self::new()
    }
}

const VOCABULARY: [(u64, &str); 4] = [(1, "beach"), (2, "sunset"), (3, "sea"), (4, "mountain")];

fn unavailable() -> BackendError {
    BackendError::Unavailable("fake backend switched off".to_string())
}

/// In-memory tag index
///
/// Knows the tags `beach`, `sunset`, `sea` and `mountain`. Every tag query
/// matches collections `1..=c` and items `101..=100 + i`, whatever the tags
/// and filter.
pub struct FakeIndex {
    collections: Vec<ResourceId>,
    items: Vec<ResourceId>,
    tagged: HashMap<(ResourceType, ResourceId), Vec<Tag>>,
    similar: Vec<ScoredId>,
    failing: bool,
    calls: Cell<usize>,
    query_calls: Cell<usize>,
    similar_owner: RefCell<Option<String>>,
}

impl FakeIndex {
    #[must_use]
    pub fn with_ids(collections: u64, items: u64) -> Self {
        Self {
            collections: (1..=collections).map(ResourceId).collect(),
            items: (101..101 + items).map(ResourceId).collect(),
            tagged: HashMap::new(),
            similar: Vec::new(),
            failing: false,
            calls: Cell::new(0),
            query_calls: Cell::new(0),
            similar_owner: RefCell::new(None),
        }
    }

    /// Every call fails with `BackendError::Unavailable`
    #[must_use]
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Tags reported by `tags_of` for one resource
    ///
    /// # Panics
    /// Panics if a name is not part of the fake vocabulary.
    #[must_use]
    pub fn tag_resource(mut self, kind: ResourceType, id: u64, names: &[&str]) -> Self {
        let tags = names
            .iter()
            .map(|name| {
                let (id, name) = VOCABULARY
                    .iter()
                    .find(|(_, known)| known == name)
                    .expect("tag outside the fake vocabulary");
                Tag::new(TagId(*id), *name)
            })
            .collect();
        self.tagged.insert((kind, ResourceId(id)), tags);
        self
    }

    /// Result returned by `get_similar`, truncated to the requested limit
    #[must_use]
    pub fn with_similar(mut self, similar: Vec<ScoredId>) -> Self {
        self.similar = similar;
        self
    }

    /// Number of calls made to any index operation
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    /// Number of `query_by_tags` calls
    #[must_use]
    pub fn query_calls(&self) -> usize {
        self.query_calls.get()
    }

    /// Owner passed to the last `get_similar` call
    #[must_use]
    pub fn similar_owner(&self) -> Option<String> {
        self.similar_owner.borrow().clone()
    }

    fn enter(&self) -> Result<(), BackendError> {
        self.calls.set(self.calls.get() + 1);
        if self.failing { Err(unavailable()) } else { Ok(()) }
    }
}

impl TagIndex for FakeIndex {
    fn resolve_tag_ids(&self, names: &[String]) -> Result<Vec<Tag>, BackendError> {
        self.enter()?;
        Ok(names
            .iter()
            .filter_map(|name| {
                VOCABULARY
                    .iter()
                    .find(|(_, known)| known == name)
                    .map(|(id, known)| Tag::new(TagId(*id), *known))
            })
            .collect())
    }

    fn query_by_tags(
        &self,
        _tag_ids: &[TagId],
        kind: ResourceType,
        _filter: &Filter,
    ) -> Result<Vec<ResourceId>, BackendError> {
        self.enter()?;
        self.query_calls.set(self.query_calls.get() + 1);
        Ok(match kind {
            ResourceType::Collection => self.collections.clone(),
            ResourceType::Item => self.items.clone(),
        })
    }

    fn get_similar(
        &self,
        _reference: ResourceId,
        _kind: ResourceType,
        limit: usize,
        owner: Option<&str>,
    ) -> Result<Vec<ScoredId>, BackendError> {
        self.enter()?;
        *self.similar_owner.borrow_mut() = owner.map(str::to_string);
        Ok(self.similar.iter().take(limit).cloned().collect())
    }

    fn tags_of(&self, id: ResourceId, kind: ResourceType) -> Result<Vec<Tag>, BackendError> {
        self.enter()?;
        Ok(self.tagged.get(&(kind, id)).cloned().unwrap_or_default())
    }
}

/// In-memory resource store
///
/// Collections are registered with their owner, items with their collection.
pub struct FakeStore {
    collections: BTreeMap<ResourceId, String>,
    items: BTreeMap<ResourceId, ResourceId>,
    failing: bool,
    fetch_calls: Cell<usize>,
    owner_calls: Cell<usize>,
}

impl FakeStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            collections: BTreeMap::new(),
            items: BTreeMap::new(),
            failing: false,
            fetch_calls: Cell::new(0),
            owner_calls: Cell::new(0),
        }
    }

    #[must_use]
    pub fn with_collection(mut self, id: u64, owner: &str) -> Self {
        self.collections.insert(ResourceId(id), owner.to_string());
        self
    }

    #[must_use]
    pub fn with_item(mut self, id: u64, collection: u64) -> Self {
        self.items.insert(ResourceId(id), ResourceId(collection));
        self
    }

    /// Every call fails with `BackendError::Unavailable`
    #[must_use]
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Number of `fetch_by_ids` calls
    #[must_use]
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.get()
    }

    /// Number of `owner_of` calls
    #[must_use]
    pub fn owner_calls(&self) -> usize {
        self.owner_calls.get()
    }

    fn resource(&self, id: ResourceId, kind: ResourceType) -> Option<Resource> {
        match kind {
            ResourceType::Collection => self.collections.get(&id).map(|owner| {
                Resource::Collection(Collection {
                    id,
                    name: format!("collection-{id}"),
                    description: String::new(),
                    owner: owner.clone(),
                    style: CollectionStyle::default(),
                    created: Utc::now(),
                })
            }),
            ResourceType::Item => self.items.get(&id).map(|collection| {
                Resource::Item(Item {
                    id,
                    collection: *collection,
                    filename: format!("item-{id}.jpg"),
                    caption: String::new(),
                    created: Utc::now(),
                })
            }),
        }
    }
}

impl Default for FakeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceStore for FakeStore {
    fn fetch_by_ids(&self, ids: &[ResourceId], kind: ResourceType) -> Result<Fetched, BackendError> {
        self.fetch_calls.set(self.fetch_calls.get() + 1);
        if self.failing {
            return Err(unavailable());
        }

        let mut fetched = Fetched::default();
        for id in ids {
            match self.resource(*id, kind) {
                Some(resource) => fetched.found.push(resource),
                None => fetched.missing.push(*id),
            }
        }
        Ok(fetched)
    }

    fn owner_of(&self, item: ResourceId) -> Result<Option<String>, BackendError> {
        self.owner_calls.set(self.owner_calls.get() + 1);
        if self.failing {
            return Err(unavailable());
        }
        Ok(self
            .items
            .get(&item)
            .and_then(|collection| self.collections.get(collection))
            .cloned())
    }
}
