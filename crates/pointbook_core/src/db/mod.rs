//! SQLite connection bootstrap for the category store.
//!
//! # Responsibility
//! - Open and configure SQLite connections used by repositories.
//! - Create the category/point tables when they are missing.
//!
//! # Invariants
//! - Returned connections have `foreign_keys=ON`, so deleting a category
//!   cascades to its bindings.
//! - Schema bootstrap is idempotent and never alters existing tables.
//!
//! # See also
//! - DESIGN.md

use std::error::Error;
use std::fmt::{Display, Formatter};

mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
