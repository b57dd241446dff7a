//! Search commands - start a tag search and work with the stored result
//!
//! `search` stores the resolved search under `context:session`; `page`,
//! `refine`, `related-tags` and `clear` pick it up from there.

use super::CommandEnv;
use crate::{
    Result,
    cli::page_index,
    model::{ResourceId, ResourceScope},
    output,
    search::{Filter, SearchContext, SearchKey},
};
use log::debug;

/// Arguments of the search command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchArgs<'a> {
    pub tags: &'a [String],
    pub scope: ResourceScope,
    pub owner: Option<&'a str>,
    pub containers: &'a [ResourceId],
    pub context: SearchContext,
    /// 1-based page number
    pub page: usize,
    pub per_page: Option<usize>,
}

impl SearchArgs<'_> {
    /// Filter for the search; an owner search without `--owner` searches the session's own resources
    #[must_use]
    pub fn filter(&self, session: &str) -> Filter {
        let mut filter = Filter::new(self.scope);
        match (self.owner, self.context) {
            (Some(owner), _) => filter = filter.owner(owner),
            (None, SearchContext::Owner) => filter = filter.owner(session),
            (None, SearchContext::Tags) => {}
        }
        if !self.containers.is_empty() {
            filter = filter.containers(self.containers.iter().copied());
        }
        filter
    }
}

/// Execute the search command and print the requested page
///
/// # Errors
/// Returns an error if a tag is unknown, the page size is zero, or the
/// database or session store fails
pub fn execute(env: &CommandEnv<'_>, args: &SearchArgs<'_>) -> Result<()> {
    let filter = args.filter(&env.session);
    debug!("search {:?} with {filter:?}", args.tags);
    let key = env
        .browser()
        .search(args.context, &env.session, args.tags, filter)?;
    show_page(env, &key, page_index(args.page), args.per_page)
}

/// Print a page of the stored search
///
/// # Errors
/// Returns an error if the page size is zero or the database or session store fails
pub fn page(env: &CommandEnv<'_>, context: SearchContext, page: usize, per_page: Option<usize>) -> Result<()> {
    let key = SearchKey::new(context, env.session.clone());
    show_page(env, &key, page_index(page), per_page)
}

/// Add and remove tags on the stored search, then print its first page
///
/// # Errors
/// Returns an error if an added tag is unknown or the database or session store fails
pub fn refine(
    env: &CommandEnv<'_>,
    context: SearchContext,
    add: &[String],
    remove: &[String],
    per_page: Option<usize>,
) -> Result<()> {
    let key = SearchKey::new(context, env.session.clone());
    let browser = env.browser();
    for tag in add {
        browser.add_tag(&key, tag)?;
    }
    for tag in remove {
        browser.remove_tag(&key, tag)?;
    }
    show_page(env, &key, 0, per_page)
}

/// Print tags co-occurring with the stored search
///
/// # Errors
/// Returns an error if the database or session store fails
pub fn related_tags(env: &CommandEnv<'_>, context: SearchContext, limit: usize) -> Result<()> {
    let key = SearchKey::new(context, env.session.clone());
    let mut related = env.browser().related_tags(&key)?;
    if limit > 0 {
        related.truncate(limit);
    }

    if related.is_empty() {
        if !env.quiet {
            println!("No related tags.");
        }
        return Ok(());
    }
    for info in &related {
        println!("{}", output::tag_with_count(info, env.quiet));
    }
    Ok(())
}

/// Forget the stored search
///
/// # Errors
/// Returns an error if the session store fails
pub fn clear(env: &CommandEnv<'_>, context: SearchContext) -> Result<()> {
    let key = SearchKey::new(context, env.session.clone());
    env.browser().clear(&key)?;
    if !env.quiet {
        println!("Cleared search {key}");
    }
    Ok(())
}

fn show_page(env: &CommandEnv<'_>, key: &SearchKey, index: usize, per_page: Option<usize>) -> Result<()> {
    let browser = env.browser();
    let page = browser.get_page(key, index, env.page_size(per_page))?;

    if !env.quiet {
        let tags = browser
            .state(key)?
            .map(|state| state.query().tags.clone())
            .unwrap_or_default();
        println!("{}", output::page_header(&page, &tags));
        if page.resources.is_empty() {
            println!("No results on this page.");
        }
    }
    for resource in &page.resources {
        println!("{}", output::resource(resource, env.quiet));
    }
    Ok(())
}
