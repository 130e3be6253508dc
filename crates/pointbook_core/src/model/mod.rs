//! Domain model for categories and their shared points.
//!
//! # Responsibility
//! - Define the data structures exchanged between callers and repositories.
//!
//! # Invariants
//! - Point texts are globally unique in storage and shared across categories.
//! - Point rows are never deleted; a category only drops its bindings.
//!
//! # See also
//! - DESIGN.md

pub mod category;
