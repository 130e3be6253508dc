//! Command-line driver for the category store.
//!
//! # Responsibility
//! - Map subcommands onto `CategoryRepository` operations.
//! - Print results as JSON on stdout; diagnostics go through `log`.

use clap::{Parser, Subcommand};
use log::warn;
use pointbook_core::db::open_db;
use pointbook_core::{
    default_log_level, init_logging, Category, CategoryId, CategoryRepository, LogTarget,
    NewCategory, SqliteCategoryRepository,
};
use serde_json::json;
use std::error::Error;
use std::path::PathBuf;
use std::process::exit;

/// Manage categories and their shared points in a SQLite database.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// SQLite database file. Created with the category tables when missing.
    #[arg(long, env = "POINTBOOK_DB", default_value = "pointbook.sqlite3")]
    db: PathBuf,

    /// Log level: trace, debug, info, warn or error.
    #[arg(long, env = "POINTBOOK_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rotated log files. Logs go to stderr otherwise.
    #[arg(long, env = "POINTBOOK_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every category with its sorted points.
    List,
    /// Show one category.
    Show { id: CategoryId },
    /// List every stored point text, including ones no category uses.
    Points,
    /// Create a category.
    Create {
        #[arg(long)]
        title: String,
        /// Point text to bind; repeat for several points.
        #[arg(long = "point")]
        points: Vec<String>,
    },
    /// Replace a category's points, and its title when given.
    Update {
        id: CategoryId,
        #[arg(long)]
        title: Option<String>,
        /// Point text to bind; omit to clear all points.
        #[arg(long = "point")]
        points: Vec<String>,
    },
    /// Delete a category. Its points stay in the store.
    Delete { id: CategoryId },
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let level = args.log_level.as_deref().unwrap_or(default_log_level());
    let target = match args.log_dir {
        Some(dir) => LogTarget::Directory(dir),
        None => LogTarget::Stderr,
    };
    init_logging(level, target)?;

    let mut conn = open_db(&args.db)?;
    let mut repo = SqliteCategoryRepository::try_new(&mut conn)?;

    match args.command {
        Command::List => print_json(&repo.list_categories()?)?,
        Command::Show { id } => match repo.get_category(id)? {
            Some(category) => print_json(&category)?,
            None => not_found(id),
        },
        Command::Points => print_json(&repo.list_points()?)?,
        Command::Create { title, points } => {
            let created = repo.create_category(&NewCategory::new(title, points))?;
            print_json(&created)?;
        }
        Command::Update { id, title, points } => {
            let value = Category {
                id,
                title: title.unwrap_or_default(),
                points,
            };
            match repo.update_category(&value)? {
                Some(category) => print_json(&category)?,
                None => not_found(id),
            }
        }
        Command::Delete { id } => {
            let deleted = repo.delete_category(id)?;
            print_json(&json!({ "deleted": deleted }))?;
        }
    }

    Ok(())
}

fn print_json(value: &impl serde::Serialize) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn not_found(id: CategoryId) -> ! {
    warn!("event=cli_command module=cli status=not_found category_id={id}");
    eprintln!("category {id} not found");
    log::logger().flush();
    exit(1);
}
