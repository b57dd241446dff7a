//! Core data model shared by the index, the store and the search engine
//!
//! Two kinds of resources can be tagged and searched:
//!
//! - **Collections**: containers (galleries) owned by a single identity
//! - **Items**: leaf resources (images) that belong to exactly one collection
//!
//! Tags are addressed by name at the edges and by [`TagId`] everywhere else.

use crate::style::CollectionStyle;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Durable key of a tag in the index
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagId(pub u64);

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a collection or an item
///
/// Collections and items draw ids from one shared counter, so an id names at
/// most one resource. Lookups still take a [`ResourceType`] to pick the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(pub u64);

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ResourceId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A tag as resolved by the index
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}

impl Tag {
    #[must_use]
    pub fn new(id: TagId, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }
}

/// A tag together with the number of resources carrying it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagInfo {
    pub tag: Tag,
    pub total: usize,
}

/// The kind of a single resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Collection,
    Item,
}

impl ResourceType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Collection => "collection",
            Self::Item => "item",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "collection" | "collections" | "gallery" => Ok(Self::Collection),
            "item" | "items" | "image" => Ok(Self::Item),
            other => Err(format!("unknown resource type '{other}' (expected collection or item)")),
        }
    }
}

/// Which resource kinds a search should return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceScope {
    Collections,
    Items,
    #[default]
    Both,
}

impl ResourceScope {
    /// Whether resources of `kind` are part of this scope
    #[must_use]
    pub const fn includes(self, kind: ResourceType) -> bool {
        matches!(
            (self, kind),
            (Self::Both, _)
                | (Self::Collections, ResourceType::Collection)
                | (Self::Items, ResourceType::Item)
        )
    }
}

impl FromStr for ResourceScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "collections" | "collection" => Ok(Self::Collections),
            "items" | "item" => Ok(Self::Items),
            "all" | "both" => Ok(Self::Both),
            other => Err(format!("unknown scope '{other}' (expected collections, items or all)")),
        }
    }
}

/// A container resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: ResourceId,
    pub name: String,
    pub description: String,
    /// Identity that owns the collection and, transitively, its items
    pub owner: String,
    pub style: CollectionStyle,
    pub created: DateTime<Utc>,
}

/// A leaf resource belonging to one collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ResourceId,
    pub collection: ResourceId,
    pub filename: String,
    pub caption: String,
    pub created: DateTime<Utc>,
}

/// A resolved search result of either kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Resource {
    Collection(Collection),
    Item(Item),
}

impl Resource {
    #[must_use]
    pub const fn id(&self) -> ResourceId {
        match self {
            Self::Collection(c) => c.id,
            Self::Item(i) => i.id,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ResourceType {
        match self {
            Self::Collection(_) => ResourceType::Collection,
            Self::Item(_) => ResourceType::Item,
        }
    }

    /// Human readable title: the collection name or the item filename
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Collection(c) => &c.name,
            Self::Item(i) => &i.filename,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_includes() {
        assert!(ResourceScope::Both.includes(ResourceType::Collection));
        assert!(ResourceScope::Both.includes(ResourceType::Item));
        assert!(ResourceScope::Collections.includes(ResourceType::Collection));
        assert!(!ResourceScope::Collections.includes(ResourceType::Item));
        assert!(ResourceScope::Items.includes(ResourceType::Item));
        assert!(!ResourceScope::Items.includes(ResourceType::Collection));
    }

    #[test]
    fn test_parse_resource_type() {
        assert_eq!("collection".parse::<ResourceType>(), Ok(ResourceType::Collection));
        assert_eq!("Gallery".parse::<ResourceType>(), Ok(ResourceType::Collection));
        assert_eq!("items".parse::<ResourceType>(), Ok(ResourceType::Item));
        assert!("folder".parse::<ResourceType>().is_err());
    }

    #[test]
    fn test_parse_scope() {
        assert_eq!("all".parse::<ResourceScope>(), Ok(ResourceScope::Both));
        assert_eq!("collections".parse::<ResourceScope>(), Ok(ResourceScope::Collections));
        assert_eq!(" items ".parse::<ResourceScope>(), Ok(ResourceScope::Items));
        assert!("everything".parse::<ResourceScope>().is_err());
    }

    #[test]
    fn test_parse_resource_id() {
        assert_eq!("42".parse::<ResourceId>(), Ok(ResourceId(42)));
        assert!("-1".parse::<ResourceId>().is_err());
    }

    #[test]
    fn test_resource_accessors() {
        let item = Resource::Item(Item {
            id: ResourceId(7),
            collection: ResourceId(1),
            filename: "beach.jpg".into(),
            caption: String::new(),
            created: Utc::now(),
        });
        assert_eq!(item.id(), ResourceId(7));
        assert_eq!(item.kind(), ResourceType::Item);
        assert_eq!(item.title(), "beach.jpg");
    }
}
