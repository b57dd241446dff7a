//! Tags command - list tags with usage counts

use crate::{Result, db::Database, output};

/// Execute the tags listing command
///
/// # Errors
/// Returns an error if database operations fail
pub fn execute(db: &Database, limit: usize, quiet: bool) -> Result<()> {
    let infos = db.list_tag_info(None, limit)?;

    if infos.is_empty() {
        if !quiet {
            println!("No tags found in database.");
        }
        return Ok(());
    }

    if !quiet {
        println!("Tags in database:");
    }
    for info in &infos {
        println!("{}", output::tag_with_count(info, quiet));
    }
    Ok(())
}
