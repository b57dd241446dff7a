//! Item command - add and remove items

use crate::{Result, TagfolioError, cli::ItemCommands, db::Database, output};

/// Execute an item management command
///
/// # Errors
/// Returns an error if the collection or item does not exist or database operations fail
pub fn execute(db: &Database, command: &ItemCommands, quiet: bool) -> Result<()> {
    match command {
        ItemCommands::Add {
            collection,
            filename,
            caption,
        } => {
            let item = db.add_item(*collection, filename, caption)?;
            db.flush()?;
            if quiet {
                println!("{}", item.id);
            } else {
                println!("Added item:\n{}", output::item(&item));
            }
        }
        ItemCommands::Remove { id } => {
            if !db.remove_item(*id)? {
                return Err(TagfolioError::InvalidInput(format!("item {id} does not exist")));
            }
            db.flush()?;
            if !quiet {
                println!("Removed item {id}");
            }
        }
    }
    Ok(())
}
