//! Related command - items sharing the most tags with an item

use super::CommandEnv;
use crate::{Result, model::ResourceId, output};

/// Execute the related items command
///
/// # Errors
/// Returns an error if `owner_only` is set for an unknown item or database operations fail
pub fn execute(env: &CommandEnv<'_>, item: ResourceId, owner_only: bool, limit: Option<usize>) -> Result<()> {
    let limit = limit.unwrap_or(env.config.related_limit);
    let related = env.browser().get_related(item, owner_only, limit)?;

    if related.is_empty() {
        if !env.quiet {
            println!("No related items found for item {item}.");
        }
        return Ok(());
    }

    if !env.quiet {
        println!("Items related to {item}:");
    }
    for ranked in &related {
        println!("{}", output::ranked_match(ranked, env.quiet));
    }
    Ok(())
}
