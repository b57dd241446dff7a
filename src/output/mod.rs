//! Output formatting for CLI display
//!
//! This module provides utilities for formatting search results, tags and
//! related items in the CLI. In quiet mode only ids and names are printed so
//! the output can be piped.

use crate::model::{Collection, Item, Resource, Tag, TagInfo};
use crate::search::{PageResult, RankedMatch};
use colored::Colorize;

/// Format a resource on one line
#[must_use]
pub fn resource(resource: &Resource, quiet: bool) -> String {
    if quiet {
        return format!("{} {}", resource.kind(), resource.id());
    }
    match resource {
        Resource::Collection(c) => collection(c),
        Resource::Item(i) => item(i),
    }
}

/// Format a collection with its owner
#[must_use]
pub fn collection(collection: &Collection) -> String {
    let mut line = format!(
        "  {} {} {}",
        format!("[{}]", collection.id).dimmed(),
        collection.name.blue().bold(),
        format!("by {}", collection.owner).dimmed()
    );
    if !collection.description.is_empty() {
        line.push_str(&format!(" - {}", collection.description));
    }
    line
}

/// Format an item with its caption
#[must_use]
pub fn item(item: &Item) -> String {
    let mut line = format!(
        "  {} {} {}",
        format!("[{}]", item.id).dimmed(),
        item.filename.green(),
        format!("in {}", item.collection).dimmed()
    );
    if !item.caption.is_empty() {
        line.push_str(&format!(" - {}", item.caption));
    }
    line
}

/// Comma separated tag names
#[must_use]
pub fn tag_list(tags: &[Tag]) -> String {
    if tags.is_empty() {
        "(no tags)".dimmed().to_string()
    } else {
        tags.iter().map(|t| t.name.as_str()).collect::<Vec<_>>().join(", ")
    }
}

/// Format a tag with usage count
#[must_use]
pub fn tag_with_count(info: &TagInfo, quiet: bool) -> String {
    if quiet {
        info.tag.name.clone()
    } else {
        format!("  {} (used by {} resource(s))", info.tag.name.yellow(), info.total)
    }
}

/// Header line of a result page
#[must_use]
pub fn page_header(page: &PageResult, tags: &[String]) -> String {
    let pages = page.page_count().max(1);
    format!(
        "{} {} collection(s), {} item(s) for [{}] - page {} of {}",
        "Found".bold(),
        page.collection_count,
        page.item_count,
        tags.join(", "),
        page.page + 1,
        pages
    )
}

/// Format a related item with its score
#[must_use]
pub fn ranked_match(m: &RankedMatch, quiet: bool) -> String {
    if quiet {
        m.item.id.to_string()
    } else {
        format!("{} {}", item(&m.item), format!("(score {})", m.score).cyan())
    }
}
