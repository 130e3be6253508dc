//! Repository layer for categories and points.
//!
//! # Responsibility
//! - Define the data access contract used by callers.
//! - Keep SQLite statement details out of callers.
//!
//! # Invariants
//! - Repositories take their connection from the caller; there is no shared
//!   global handle.
//! - Soft not-found is reported through `Option`/`bool`, never `RepoError`.

pub mod category_repo;
