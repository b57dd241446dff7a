//! Database wrapper module for tagfolio
//!
//! Stores collections, items and their tags in sled and serves them to the
//! search engine through the [`TagIndex`] and [`ResourceStore`] traits.
//!
//! Uses multiple sled trees for efficient indexing:
//! - `tags` / `tag_names`: tag name -> id and id -> name
//! - `collections` / `items`: id -> record
//! - `collection_tags` / `item_tags`: resource id -> `Vec<TagId>`
//! - `collection_index` / `item_index`: tag id -> sorted `Vec<ResourceId>`
//!
//! All keys are big-endian ids (see [`IdKey`]) except in `tags`, which is keyed
//! by the tag name itself.

use crate::model::{Collection, Item, Resource, ResourceId, ResourceType, Tag, TagId, TagInfo};
use crate::search::{BackendError, Fetched, Filter, Narrowing, ResourceStore, ScoredId, TagIndex};
use crate::style::CollectionStyle;
use chrono::Utc;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use sled::{Db, Tree};
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

pub mod error;
pub mod types;

pub use error::DbError;
pub use types::{IdKey, TagValidator};

use types::{decode, encode};

/// Default number of shared tags for two resources to count as similar
pub const DEFAULT_SIMILARITY_THRESHOLD: usize = 1;

/// The three trees serving one resource kind
struct KindTrees<'a> {
    records: &'a Tree,
    links: &'a Tree,
    index: &'a Tree,
}

/// Database wrapper that encapsulates all database operations
pub struct Database {
    db: Db,
    tags: Tree,
    tag_names: Tree,
    collections: Tree,
    items: Tree,
    collection_tags: Tree,
    item_tags: Tree,
    collection_index: Tree,
    item_index: Tree,
    validator: TagValidator,
    similarity_threshold: usize,
}

impl Database {
    /// Opens or creates a database at the specified path
    ///
    /// # Examples
    /// ```no_run
    /// use tagfolio::db::Database;
    /// let db = Database::open("my_db").unwrap();
    /// ```
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the database cannot be opened or if the internal trees cannot be created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DbError> {
        let db = sled::open(path)?;
        Ok(Self {
            tags: db.open_tree("tags")?,
            tag_names: db.open_tree("tag_names")?,
            collections: db.open_tree("collections")?,
            items: db.open_tree("items")?,
            collection_tags: db.open_tree("collection_tags")?,
            item_tags: db.open_tree("item_tags")?,
            collection_index: db.open_tree("collection_index")?,
            item_index: db.open_tree("item_index")?,
            validator: TagValidator::new()?,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            db,
        })
    }

    /// Minimum number of shared tags used by [`TagIndex::get_similar`]
    ///
    /// A threshold of zero is treated as one.
    #[must_use]
    pub fn with_similarity_threshold(mut self, threshold: usize) -> Self {
        self.similarity_threshold = threshold.max(1);
        self
    }

    /// Create a collection owned by `owner`
    ///
    /// # Errors
    ///
    /// Returns `DbError::InvalidInput` if the name or owner is blank, or a
    /// storage error if the record cannot be written.
    pub fn add_collection(&self, name: &str, owner: &str, description: &str) -> Result<Collection, DbError> {
        let name = name.trim();
        let owner = owner.trim();
        if name.is_empty() || owner.is_empty() {
            return Err(DbError::InvalidInput(
                "collection name and owner must not be empty".to_string(),
            ));
        }

        let collection = Collection {
            id: self.next_id()?,
            name: name.to_string(),
            description: description.trim().to_string(),
            owner: owner.to_string(),
            style: CollectionStyle::default(),
            created: Utc::now(),
        };
        self.collections
            .insert(IdKey::from(collection.id), encode(&collection)?)?;
        debug!("added collection {} '{}'", collection.id, collection.name);
        Ok(collection)
    }

    /// Create an item inside an existing collection
    ///
    /// # Errors
    ///
    /// Returns `DbError::NotFound` if the collection does not exist and
    /// `DbError::InvalidInput` if the filename is blank.
    pub fn add_item(&self, collection: ResourceId, filename: &str, caption: &str) -> Result<Item, DbError> {
        let filename = filename.trim();
        if filename.is_empty() {
            return Err(DbError::InvalidInput("item filename must not be empty".to_string()));
        }
        if !self.collections.contains_key(IdKey::from(collection))? {
            return Err(DbError::NotFound(format!("collection {collection}")));
        }

        let item = Item {
            id: self.next_id()?,
            collection,
            filename: filename.to_string(),
            caption: caption.trim().to_string(),
            created: Utc::now(),
        };
        self.items.insert(IdKey::from(item.id), encode(&item)?)?;
        debug!("added item {} to collection {collection}", item.id);
        Ok(item)
    }

    /// # Errors
    ///
    /// Returns `DbError` if database operations fail or deserialization errors occur.
    pub fn get_collection(&self, id: ResourceId) -> Result<Option<Collection>, DbError> {
        read_record(&self.collections, id)
    }

    /// # Errors
    ///
    /// Returns `DbError` if database operations fail or deserialization errors occur.
    pub fn get_item(&self, id: ResourceId) -> Result<Option<Item>, DbError> {
        read_record(&self.items, id)
    }

    /// Fetch a collection or an item as a [`Resource`]
    ///
    /// # Errors
    ///
    /// Returns `DbError` if database operations fail or deserialization errors occur.
    pub fn get_resource(&self, id: ResourceId, kind: ResourceType) -> Result<Option<Resource>, DbError> {
        Ok(match kind {
            ResourceType::Collection => self.get_collection(id)?.map(Resource::Collection),
            ResourceType::Item => self.get_item(id)?.map(Resource::Item),
        })
    }

    /// All collections, ordered by id
    ///
    /// # Errors
    ///
    /// Returns `DbError` if database operations fail or deserialization errors occur.
    pub fn list_collections(&self) -> Result<Vec<Collection>, DbError> {
        self.collections
            .iter()
            .values()
            .map(|value| decode(&value?))
            .collect()
    }

    /// Replace the display style of a collection
    ///
    /// # Errors
    ///
    /// Returns `DbError::NotFound` if the collection does not exist.
    pub fn update_style(&self, id: ResourceId, style: CollectionStyle) -> Result<Collection, DbError> {
        let mut collection = self
            .get_collection(id)?
            .ok_or_else(|| DbError::NotFound(format!("collection {id}")))?;
        collection.style = style;
        self.collections.insert(IdKey::from(id), encode(&collection)?)?;
        Ok(collection)
    }

    /// Remove an item and its tag links
    ///
    /// Returns whether the item existed.
    ///
    /// # Errors
    ///
    /// Returns `DbError` if database operations fail.
    pub fn remove_item(&self, id: ResourceId) -> Result<bool, DbError> {
        let trees = self.trees(ResourceType::Item);
        let old: Vec<TagId> = read_list(trees.links, IdKey::from(id))?;
        for tag in &old {
            Self::unlink(&trees, *tag, id)?;
        }
        trees.links.remove(IdKey::from(id))?;
        Ok(trees.records.remove(IdKey::from(id))?.is_some())
    }

    /// Replace the tags of a collection or an item
    ///
    /// Names are trimmed and empty names skipped; duplicates keep their first
    /// position. Tags that do not exist yet are created. Returns the tags now
    /// attached to the resource.
    ///
    /// # Errors
    ///
    /// Returns `DbError::NotFound` if the resource does not exist and
    /// `DbError::InvalidTag` if a name contains characters outside the accepted set.
    /// Nothing is written when validation fails.
    pub fn set_tags(&self, id: ResourceId, kind: ResourceType, names: &[String]) -> Result<Vec<Tag>, DbError> {
        let trees = self.trees(kind);
        if !trees.records.contains_key(IdKey::from(id))? {
            return Err(DbError::NotFound(format!("{kind} {id}")));
        }

        let mut normalized: Vec<String> = Vec::with_capacity(names.len());
        for raw in names {
            if let Some(name) = self.validator.normalize(raw)?
                && !normalized.contains(&name)
            {
                normalized.push(name);
            }
        }

        let tags = normalized
            .iter()
            .map(|name| self.get_or_create_tag(name))
            .collect::<Result<Vec<Tag>, DbError>>()?;
        let new_ids: Vec<TagId> = tags.iter().map(|t| t.id).collect();
        let old_ids: Vec<TagId> = read_list(trees.links, IdKey::from(id))?;

        for tag in old_ids.iter().filter(|t| !new_ids.contains(t)) {
            Self::unlink(&trees, *tag, id)?;
        }
        for tag in new_ids.iter().filter(|t| !old_ids.contains(t)) {
            Self::link(&trees, *tag, id)?;
        }
        trees.links.insert(IdKey::from(id), encode(&new_ids)?)?;

        debug!("{kind} {id} tagged with {normalized:?}");
        Ok(tags)
    }

    /// Tags attached to a resource, in the order they were set
    ///
    /// # Errors
    ///
    /// Returns `DbError` if database operations fail or deserialization errors occur.
    pub fn tags_for(&self, id: ResourceId, kind: ResourceType) -> Result<Vec<Tag>, DbError> {
        let ids: Vec<TagId> = read_list(self.trees(kind).links, IdKey::from(id))?;
        self.tag_names(&ids)
    }

    /// Look up tags by id; unknown ids are skipped
    ///
    /// # Errors
    ///
    /// Returns `DbError` if database operations fail or a stored name is not valid UTF-8.
    pub fn tag_names(&self, ids: &[TagId]) -> Result<Vec<Tag>, DbError> {
        let mut tags = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(name) = self.tag_names.get(IdKey::from(*id))? {
                let name = String::from_utf8(name.to_vec())
                    .map_err(|e| DbError::InvalidInput(format!("tag {id} has a non UTF-8 name: {e}")))?;
                tags.push(Tag::new(*id, name));
            }
        }
        Ok(tags)
    }

    /// Tags with the number of resources carrying them, most used first
    ///
    /// `ids` restricts the listing to the given tags; `Some(&[])` yields an
    /// empty list. Tags carried by nothing are left out. A `limit` of zero
    /// means no limit.
    ///
    /// # Errors
    ///
    /// Returns `DbError` if database operations fail or deserialization errors occur.
    pub fn list_tag_info(&self, ids: Option<&[TagId]>, limit: usize) -> Result<Vec<TagInfo>, DbError> {
        let tags = match ids {
            Some(ids) => self.tag_names(ids)?,
            None => self.all_tags()?,
        };

        let mut infos = Vec::with_capacity(tags.len());
        for tag in tags {
            let key = IdKey::from(tag.id);
            let total = read_list::<ResourceId>(&self.collection_index, key)?.len()
                + read_list::<ResourceId>(&self.item_index, key)?.len();
            if total > 0 {
                infos.push(TagInfo { tag, total });
            }
        }

        infos.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.tag.name.cmp(&b.tag.name)));
        if limit > 0 {
            infos.truncate(limit);
        }
        Ok(infos)
    }

    /// Number of stored resources of `kind`
    #[must_use]
    pub fn count(&self, kind: ResourceType) -> usize {
        self.trees(kind).records.len()
    }

    /// Flush the database to disk
    ///
    /// # Errors
    ///
    /// Returns `DbError` if the flush operation fails.
    pub fn flush(&self) -> Result<(), DbError> {
        self.db.flush()?;
        Ok(())
    }

    /// Clear all data from the database
    ///
    /// # Errors
    ///
    /// Returns `DbError` if any tree cannot be cleared.
    pub fn clear(&self) -> Result<(), DbError> {
        for tree in [
            &self.tags,
            &self.tag_names,
            &self.collections,
            &self.items,
            &self.collection_tags,
            &self.item_tags,
            &self.collection_index,
            &self.item_index,
        ] {
            tree.clear()?;
        }
        Ok(())
    }

    fn trees(&self, kind: ResourceType) -> KindTrees<'_> {
        match kind {
            ResourceType::Collection => KindTrees {
                records: &self.collections,
                links: &self.collection_tags,
                index: &self.collection_index,
            },
            ResourceType::Item => KindTrees {
                records: &self.items,
                links: &self.item_tags,
                index: &self.item_index,
            },
        }
    }

    fn next_id(&self) -> Result<ResourceId, DbError> {
        Ok(ResourceId(self.db.generate_id()? + 1))
    }

    fn all_tags(&self) -> Result<Vec<Tag>, DbError> {
        self.tag_names
            .iter()
            .map(|entry| -> Result<Tag, DbError> {
                let (key, name) = entry?;
                let id = TagId(IdKey::from_bytes(&key)?.value());
                let name = String::from_utf8(name.to_vec())
                    .map_err(|e| DbError::InvalidInput(format!("tag {id} has a non UTF-8 name: {e}")))?;
                Ok(Tag::new(id, name))
            })
            .collect()
    }

    fn find_tag(&self, name: &str) -> Result<Option<Tag>, DbError> {
        match self.tags.get(name.as_bytes())? {
            Some(raw) => Ok(Some(Tag::new(TagId(IdKey::from_bytes(&raw)?.value()), name))),
            None => Ok(None),
        }
    }

    fn get_or_create_tag(&self, name: &str) -> Result<Tag, DbError> {
        if let Some(tag) = self.find_tag(name)? {
            return Ok(tag);
        }
        let id = TagId(self.db.generate_id()? + 1);
        self.tags.insert(name.as_bytes(), IdKey::from(id).as_bytes().to_vec())?;
        self.tag_names.insert(IdKey::from(id), name.as_bytes())?;
        debug!("created tag {id} '{name}'");
        Ok(Tag::new(id, name))
    }

    fn link(trees: &KindTrees<'_>, tag: TagId, id: ResourceId) -> Result<(), DbError> {
        let key = IdKey::from(tag);
        let mut ids: Vec<ResourceId> = read_list(trees.index, key)?;
        if let Err(pos) = ids.binary_search(&id) {
            ids.insert(pos, id);
            trees.index.insert(key, encode(&ids)?)?;
        }
        Ok(())
    }

    fn unlink(trees: &KindTrees<'_>, tag: TagId, id: ResourceId) -> Result<(), DbError> {
        let key = IdKey::from(tag);
        let mut ids: Vec<ResourceId> = read_list(trees.index, key)?;
        if let Ok(pos) = ids.binary_search(&id) {
            ids.remove(pos);
            if ids.is_empty() {
                trees.index.remove(key)?;
            } else {
                trees.index.insert(key, encode(&ids)?)?;
            }
        }
        Ok(())
    }

    /// Owner of a resource: the collection's owner, or the owner of the item's collection
    fn owner_of_kind(&self, id: ResourceId, kind: ResourceType) -> Result<Option<String>, DbError> {
        let collection = match kind {
            ResourceType::Collection => id,
            ResourceType::Item => match self.get_item(id)? {
                Some(item) => item.collection,
                None => return Ok(None),
            },
        };
        Ok(self.get_collection(collection)?.map(|c| c.owner))
    }

    /// Parent collection of an item, or the collection itself
    fn container_of(&self, id: ResourceId, kind: ResourceType) -> Result<Option<ResourceId>, DbError> {
        match kind {
            ResourceType::Collection => Ok(Some(id)),
            ResourceType::Item => Ok(self.get_item(id)?.map(|item| item.collection)),
        }
    }

    fn matches_owner(
        &self,
        id: ResourceId,
        kind: ResourceType,
        owner: &str,
        owners: &mut HashMap<ResourceId, Option<String>>,
    ) -> Result<bool, DbError> {
        let Some(container) = self.container_of(id, kind)? else {
            return Ok(false);
        };
        if !owners.contains_key(&container) {
            let found = self.owner_of_kind(container, ResourceType::Collection)?;
            owners.insert(container, found);
        }
        Ok(owners.get(&container).and_then(Option::as_deref) == Some(owner))
    }

    fn narrow(&self, ids: Vec<ResourceId>, kind: ResourceType, filter: &Filter) -> Result<Vec<ResourceId>, DbError> {
        match filter.narrowing() {
            Narrowing::None => Ok(ids),
            Narrowing::Containers(set) => self.within_containers(ids, kind, set),
            Narrowing::Owner(owner) => {
                let mut owners = HashMap::new();
                let mut kept = Vec::with_capacity(ids.len());
                for id in ids {
                    if self.matches_owner(id, kind, owner, &mut owners)? {
                        kept.push(id);
                    }
                }
                Ok(kept)
            }
        }
    }

    fn within_containers(
        &self,
        ids: Vec<ResourceId>,
        kind: ResourceType,
        set: &BTreeSet<ResourceId>,
    ) -> Result<Vec<ResourceId>, DbError> {
        let mut kept = Vec::with_capacity(ids.len());
        for id in ids {
            if self.container_of(id, kind)?.is_some_and(|c| set.contains(&c)) {
                kept.push(id);
            }
        }
        Ok(kept)
    }
}

impl TagIndex for Database {
    fn resolve_tag_ids(&self, names: &[String]) -> Result<Vec<Tag>, BackendError> {
        let mut tags = Vec::with_capacity(names.len());
        for name in names {
            if let Some(tag) = self.find_tag(name)? {
                tags.push(tag);
            }
        }
        Ok(tags)
    }

    fn query_by_tags(
        &self,
        tag_ids: &[TagId],
        kind: ResourceType,
        filter: &Filter,
    ) -> Result<Vec<ResourceId>, BackendError> {
        let Some((first, rest)) = tag_ids.split_first() else {
            return Ok(Vec::new());
        };

        let index = self.trees(kind).index;
        let mut ids: Vec<ResourceId> = read_list(index, IdKey::from(*first))?;
        for tag in rest {
            if ids.is_empty() {
                break;
            }
            let other: BTreeSet<ResourceId> = read_list(index, IdKey::from(*tag))?.into_iter().collect();
            ids.retain(|id| other.contains(id));
        }

        Ok(self.narrow(ids, kind, filter)?)
    }

    fn get_similar(
        &self,
        reference: ResourceId,
        kind: ResourceType,
        limit: usize,
        owner: Option<&str>,
    ) -> Result<Vec<ScoredId>, BackendError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let trees = self.trees(kind);
        let tags: Vec<TagId> = read_list(trees.links, IdKey::from(reference))?;
        let mut shared: HashMap<ResourceId, usize> = HashMap::new();
        for tag in &tags {
            for id in read_list::<ResourceId>(trees.index, IdKey::from(*tag))? {
                if id != reference {
                    *shared.entry(id).or_insert(0) += 1;
                }
            }
        }

        let mut candidates: Vec<(ResourceId, usize)> = shared
            .into_iter()
            .filter(|(_, count)| *count >= self.similarity_threshold)
            .collect();
        candidates.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        let mut owners = HashMap::new();
        let mut scored = Vec::with_capacity(limit.min(candidates.len()));
        for (id, count) in candidates {
            if scored.len() == limit {
                break;
            }
            if let Some(owner) = owner
                && !self.matches_owner(id, kind, owner, &mut owners)?
            {
                continue;
            }
            #[allow(clippy::cast_precision_loss)]
            scored.push(ScoredId::new(id, count as f64));
        }
        Ok(scored)
    }

    fn tags_of(&self, id: ResourceId, kind: ResourceType) -> Result<Vec<Tag>, BackendError> {
        Ok(self.tags_for(id, kind)?)
    }
}

impl ResourceStore for Database {
    fn fetch_by_ids(&self, ids: &[ResourceId], kind: ResourceType) -> Result<Fetched, BackendError> {
        let mut fetched = Fetched::default();
        for id in ids {
            match self.get_resource(*id, kind)? {
                Some(resource) => fetched.found.push(resource),
                None => fetched.missing.push(*id),
            }
        }
        Ok(fetched)
    }

    fn owner_of(&self, item: ResourceId) -> Result<Option<String>, BackendError> {
        Ok(self.owner_of_kind(item, ResourceType::Item)?)
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        if let Err(e) = self.db.flush() {
            warn!("failed to flush database on drop: {e}");
        }
    }
}

fn read_record<T: DeserializeOwned>(tree: &Tree, id: ResourceId) -> Result<Option<T>, DbError> {
    match tree.get(IdKey::from(id))? {
        Some(value) => Ok(Some(decode(&value)?)),
        None => Ok(None),
    }
}

fn read_list<T: DeserializeOwned>(tree: &Tree, key: IdKey) -> Result<Vec<T>, DbError> {
    match tree.get(key)? {
        Some(value) => decode(&value),
        None => Ok(Vec::new()),
    }
}
