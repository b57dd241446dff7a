//! Collection command - create, list and style collections

use super::CommandEnv;
use crate::{Result, TagfolioError, cli::CollectionCommands, model::ResourceId, output, style};
use colored::Colorize;

/// Execute a collection management command
///
/// # Errors
/// Returns an error if the collection does not exist, a style value is invalid,
/// or database operations fail
pub fn execute(env: &CommandEnv<'_>, command: &CollectionCommands) -> Result<()> {
    match command {
        CollectionCommands::Add {
            name,
            owner,
            description,
        } => {
            let owner = owner.clone().unwrap_or_else(|| env.session.clone());
            let collection = env.db.add_collection(name, &owner, description)?;
            env.db.flush()?;
            if env.quiet {
                println!("{}", collection.id);
            } else {
                println!("Added collection:\n{}", output::collection(&collection));
            }
            Ok(())
        }
        CollectionCommands::List => list(env),
        CollectionCommands::Style { id, field, value } => {
            style_command(env, *id, field.as_deref(), value.as_deref())
        }
    }
}

fn list(env: &CommandEnv<'_>) -> Result<()> {
    let collections = env.db.list_collections()?;
    if collections.is_empty() {
        if !env.quiet {
            println!("No collections found in database.");
        }
        return Ok(());
    }
    for collection in &collections {
        if env.quiet {
            println!("{}", collection.id);
        } else {
            println!("{}", output::collection(collection));
        }
    }
    Ok(())
}

fn style_command(env: &CommandEnv<'_>, id: ResourceId, field: Option<&str>, value: Option<&str>) -> Result<()> {
    let collection = env
        .db
        .get_collection(id)?
        .ok_or_else(|| TagfolioError::InvalidInput(format!("collection {id} does not exist")))?;

    match (field, value) {
        (None, _) => {
            for name in style::FIELDS {
                println!("{:<14} {}", name.bold(), collection.style.get(name)?);
            }
        }
        (Some(field), None) => println!("{}", collection.style.get(field)?),
        (Some(field), Some(value)) => {
            let mut style = collection.style.clone();
            style.set(field, value)?;
            let updated = env.db.update_style(id, style)?;
            env.db.flush()?;
            if !env.quiet {
                println!("Set {field} = {} on collection {id}", updated.style.get(field)?);
            }
        }
    }
    Ok(())
}
