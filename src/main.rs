//! Tagfolio CLI application entry point
//!
//! Opens the database and the session file named by the configuration, parses
//! the command line and dispatches to the command handlers.
//!
//! # Usage
//!
//! ```bash
//! # Create a collection and an item, then tag them
//! tagfolio collection add Holiday --owner alice
//! tagfolio item add 1 beach.jpg
//! tagfolio tag item 2 beach sunset
//!
//! # Search, page through and refine the result
//! tagfolio search beach --per-page 10
//! tagfolio page 2
//! tagfolio refine --add sunset
//!
//! # Quiet mode (only output results)
//! tagfolio -q related 2 --owner-only
//! ```
//!
//! # Configuration
//!
//! Settings are read from the user's config directory
//! (`~/.config/tagfolio/config.toml` on Linux) and `TAGFOLIO_*` environment
//! variables. Logging is controlled with `RUST_LOG`.

use env_logger::{Builder, Env};
use log::debug;
use std::io::Write;
use tagfolio::{
    Result,
    cli::{Cli, Commands},
    commands::{self, CommandEnv, search::SearchArgs},
    config::TagfolioConfig,
    db::Database,
    session::FileSessions,
};

fn setup_logging() {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} [{}] [{}] {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.module_path().unwrap_or("unknown"),
            record.args()
        )
    });
    builder.init();
}

/// Main entry point for the tagfolio CLI application
///
/// # Errors
///
/// Returns `TagfolioError` if configuration loading fails, database initialization fails,
/// or any command handler returns an error.
fn main() -> Result<()> {
    setup_logging();

    let cli = Cli::parse_args();
    let config = TagfolioConfig::load()?;

    let db_path = match &cli.db {
        Some(path) => path.clone(),
        None => config.database_path()?,
    };
    debug!("opening database at {}", db_path.display());
    let db = Database::open(&db_path)?.with_similarity_threshold(config.similarity_threshold);
    let sessions = FileSessions::new(config.session_dir()?, config.session_ttl());

    let env = CommandEnv {
        db: &db,
        sessions: &sessions,
        config: &config,
        session: cli.session.clone().unwrap_or_else(|| config.session_name()),
        quiet: cli.quiet || config.quiet,
    };

    match &cli.command {
        Commands::Collection { command } => commands::collection(&env, command)?,
        Commands::Item { command } => commands::item(&db, command, env.quiet)?,
        Commands::Tag { kind, id, tags } => commands::tag(&db, *kind, *id, tags, env.quiet)?,
        Commands::Search {
            tags,
            scope,
            owner,
            containers,
            page,
            page_args,
            context,
        } => {
            let args = SearchArgs {
                tags,
                scope: *scope,
                owner: owner.as_deref(),
                containers,
                context: context.context,
                page: *page,
                per_page: page_args.per_page,
            };
            commands::search::execute(&env, &args)?;
        }
        Commands::Page {
            page,
            page_args,
            context,
        } => commands::search::page(&env, context.context, *page, page_args.per_page)?,
        Commands::Refine {
            add,
            remove,
            page_args,
            context,
        } => commands::search::refine(&env, context.context, add, remove, page_args.per_page)?,
        Commands::RelatedTags { limit, context } => {
            commands::search::related_tags(&env, context.context, *limit)?;
        }
        Commands::Clear { context } => commands::search::clear(&env, context.context)?,
        Commands::Related {
            item,
            owner_only,
            limit,
        } => commands::related(&env, *item, *owner_only, *limit)?,
        Commands::Tags { limit } => commands::tags(&db, *limit, env.quiet)?,
    }

    Ok(())
}
