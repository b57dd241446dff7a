//! Tag command - replace the tags of a collection or an item

use crate::{Result, db::Database, model::{ResourceId, ResourceType}, output};

/// Execute the tag command
///
/// # Errors
/// Returns an error if the resource does not exist, a tag name is invalid,
/// or database operations fail
pub fn execute(db: &Database, kind: ResourceType, id: ResourceId, tags: &[String], quiet: bool) -> Result<()> {
    let applied = db.set_tags(id, kind, tags)?;
    db.flush()?;

    if !quiet {
        println!("Tagged {kind} {id}: {}", output::tag_list(&applied));
    }
    Ok(())
}
