//! Command-line interface definitions and parsing
//!
//! This module defines the complete CLI structure for tagfolio using the `clap` crate.
//!
//! # Commands
//!
//! - **collection** / **item**: create and edit the resources being tagged
//! - **tag**: replace the tags of a collection or an item
//! - **search**: start a tag search and show its first page
//! - **page** / **refine** / **related-tags** / **clear**: work with the stored search
//! - **related**: items sharing the most tags with a given item
//! - **tags**: list tags with usage counts
//!
//! Searches are stored per session (see `--session`), so `page` and `refine`
//! continue where the last `search` left off.
//!
//! # Examples
//!
//! ```text
//! tagfolio collection add "Holiday" --owner alice
//! tagfolio item add 1 beach.jpg --caption "Evening"
//! tagfolio tag item 2 beach sunset
//! tagfolio search beach --owner alice --per-page 10
//! tagfolio page 2
//! tagfolio refine --add sunset
//! tagfolio related 2 --owner-only
//! ```

use crate::model::{ResourceId, ResourceScope, ResourceType};
use crate::search::SearchContext;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tagfolio")]
#[command(about = "Tag-based search and browsing for collections and items", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Suppress informational output (only print results)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Database directory (overrides config)
    #[arg(long = "db", value_name = "PATH", global = true)]
    pub db: Option<PathBuf>,

    /// Session under which searches are stored (overrides config)
    #[arg(long = "session", value_name = "NAME", global = true)]
    pub session: Option<String>,
}

/// Selects which stored search a command works on
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ContextArgs {
    /// Search context: tags or owner
    #[arg(short = 'c', long = "context", value_name = "CONTEXT", default_value = "tags")]
    pub context: SearchContext,
}

/// Paging options
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct PageArgs {
    /// Results per page (defaults to the configured page size)
    #[arg(long = "per-page", value_name = "N")]
    pub per_page: Option<usize>,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Manage collections
    #[command(visible_alias = "c")]
    Collection {
        #[command(subcommand)]
        command: CollectionCommands,
    },

    /// Manage items
    #[command(visible_alias = "i")]
    Item {
        #[command(subcommand)]
        command: ItemCommands,
    },

    /// Replace the tags of a collection or an item (no tags clears them)
    #[command(visible_alias = "t")]
    Tag {
        /// Resource kind: collection or item
        kind: ResourceType,

        /// Resource id
        id: ResourceId,

        /// Tags to set
        #[arg(value_name = "TAG", num_args = 0..)]
        tags: Vec<String>,
    },

    /// Search by tags and show the first page of results
    #[command(visible_alias = "s")]
    Search {
        /// Tags that every result must carry
        #[arg(value_name = "TAG", num_args = 0..)]
        tags: Vec<String>,

        /// Resource kinds to return: collections, items or all
        #[arg(long = "type", value_name = "SCOPE", default_value = "all")]
        scope: ResourceScope,

        /// Only return resources owned by this identity
        #[arg(short = 'o', long = "owner", value_name = "OWNER")]
        owner: Option<String>,

        /// Only return resources inside these collections (wins over --owner)
        #[arg(long = "in", value_name = "COLLECTION", num_args = 1..)]
        containers: Vec<ResourceId>,

        /// Page to show, starting at 1
        #[arg(short = 'p', long = "page", value_name = "N", default_value_t = 1)]
        page: usize,

        #[command(flatten)]
        page_args: PageArgs,

        #[command(flatten)]
        context: ContextArgs,
    },

    /// Show another page of the stored search
    #[command(visible_alias = "p")]
    Page {
        /// Page to show, starting at 1
        #[arg(value_name = "N", default_value_t = 1)]
        page: usize,

        #[command(flatten)]
        page_args: PageArgs,

        #[command(flatten)]
        context: ContextArgs,
    },

    /// Add or remove tags from the stored search
    Refine {
        /// Tags to add
        #[arg(short = 'a', long = "add", value_name = "TAG", num_args = 1..)]
        add: Vec<String>,

        /// Tags to remove
        #[arg(short = 'r', long = "remove", value_name = "TAG", num_args = 1..)]
        remove: Vec<String>,

        #[command(flatten)]
        page_args: PageArgs,

        #[command(flatten)]
        context: ContextArgs,
    },

    /// Tags that would narrow the stored search
    #[command(name = "related-tags")]
    RelatedTags {
        /// Maximum number of tags to show (0 for all)
        #[arg(short = 'l', long = "limit", value_name = "N", default_value_t = 0)]
        limit: usize,

        #[command(flatten)]
        context: ContextArgs,
    },

    /// Forget the stored search
    Clear {
        #[command(flatten)]
        context: ContextArgs,
    },

    /// Items sharing the most tags with an item
    #[command(visible_alias = "r")]
    Related {
        /// Reference item id
        item: ResourceId,

        /// Only consider items of the reference item's owner
        #[arg(long = "owner-only")]
        owner_only: bool,

        /// Maximum number of items (defaults to the configured limit)
        #[arg(short = 'l', long = "limit", value_name = "N")]
        limit: Option<usize>,
    },

    /// List tags with usage counts, most used first
    Tags {
        /// Maximum number of tags to show (0 for all)
        #[arg(short = 'l', long = "limit", value_name = "N", default_value_t = 0)]
        limit: usize,
    },
}

/// Collection management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum CollectionCommands {
    /// Create a collection
    Add {
        /// Collection name
        name: String,

        /// Owner of the collection (defaults to the session name)
        #[arg(short = 'o', long = "owner", value_name = "OWNER")]
        owner: Option<String>,

        /// Free-form description
        #[arg(short = 'd', long = "description", default_value = "")]
        description: String,
    },

    /// List all collections
    #[command(visible_alias = "ls")]
    List,

    /// Show or change the display style of a collection
    Style {
        /// Collection id
        id: ResourceId,

        /// Style field (name, thumbstyle, background, view, default_image, width, height)
        field: Option<String>,

        /// New value; omit to print the current value
        value: Option<String>,
    },
}

/// Item management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ItemCommands {
    /// Add an item to a collection
    Add {
        /// Collection the item belongs to
        collection: ResourceId,

        /// File name of the item
        filename: String,

        /// Caption shown with the item
        #[arg(long = "caption", default_value = "")]
        caption: String,
    },

    /// Remove an item and its tags
    #[command(visible_alias = "rm")]
    Remove {
        /// Item id
        id: ResourceId,
    },
}

impl Cli {
    /// Parse command line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Convert a 1-based page number from the command line to a page index
#[must_use]
pub const fn page_index(page: usize) -> usize {
    page.saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search() {
        let cli = Cli::parse_from([
            "tagfolio", "search", "beach", "sunset", "--owner", "alice", "--per-page", "5",
        ]);
        match cli.command {
            Commands::Search {
                tags,
                scope,
                owner,
                containers,
                page,
                page_args,
                context,
            } => {
                assert_eq!(tags, vec!["beach", "sunset"]);
                assert_eq!(scope, ResourceScope::Both);
                assert_eq!(owner.as_deref(), Some("alice"));
                assert!(containers.is_empty());
                assert_eq!(page, 1);
                assert_eq!(page_args.per_page, Some(5));
                assert_eq!(context.context, SearchContext::Tags);
            }
            other => panic!("Expected Search command, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_search_with_containers_and_scope() {
        let cli = Cli::parse_from(["tagfolio", "search", "beach", "--type", "items", "--in", "1", "2"]);
        match cli.command {
            Commands::Search { scope, containers, .. } => {
                assert_eq!(scope, ResourceScope::Items);
                assert_eq!(containers, vec![ResourceId(1), ResourceId(2)]);
            }
            other => panic!("Expected Search command, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_tag() {
        let cli = Cli::parse_from(["tagfolio", "tag", "item", "7", "beach", "sea"]);
        match cli.command {
            Commands::Tag { kind, id, tags } => {
                assert_eq!(kind, ResourceType::Item);
                assert_eq!(id, ResourceId(7));
                assert_eq!(tags, vec!["beach", "sea"]);
            }
            other => panic!("Expected Tag command, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_page_with_context() {
        let cli = Cli::parse_from(["tagfolio", "page", "3", "--context", "owner"]);
        match cli.command {
            Commands::Page { page, context, .. } => {
                assert_eq!(page_index(page), 2);
                assert_eq!(context.context, SearchContext::Owner);
            }
            other => panic!("Expected Page command, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_context_rejected() {
        let result = Cli::try_parse_from(["tagfolio", "page", "--context", "album"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_related() {
        let cli = Cli::parse_from(["tagfolio", "-q", "related", "12", "--owner-only", "--limit", "3"]);
        assert!(cli.quiet);
        match cli.command {
            Commands::Related {
                item,
                owner_only,
                limit,
            } => {
                assert_eq!(item, ResourceId(12));
                assert!(owner_only);
                assert_eq!(limit, Some(3));
            }
            other => panic!("Expected Related command, got {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["tagfolio", "tags", "--db", "/tmp/db", "--session", "bob"]);
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/db")));
        assert_eq!(cli.session.as_deref(), Some("bob"));
    }

    #[test]
    fn test_page_index_is_zero_based() {
        assert_eq!(page_index(1), 0);
        assert_eq!(page_index(0), 0);
    }
}
