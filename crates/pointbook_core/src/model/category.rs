//! Category and point domain model.
//!
//! # Responsibility
//! - Define the category record returned by repository reads and writes.
//! - Define the create request and its validation rules.
//!
//! # Invariants
//! - `id` is assigned by storage on creation and never changes afterwards.
//! - A read-back `Category` always carries its point texts sorted ascending.
//! - An empty `title` on an update request means "keep the stored title".
//!
//! # See also
//! - DESIGN.md

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned category identifier.
pub type CategoryId = i64;

/// Storage-assigned point identifier.
pub type PointId = i64;

/// Category with its bound point texts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Stable storage id.
    pub id: CategoryId,
    /// Display title. Empty only as the update "keep" sentinel.
    pub title: String,
    /// Bound point texts. Duplicates are preserved.
    #[serde(default)]
    pub points: Vec<String>,
}

impl Category {
    /// Builds an update value that keeps the stored title and replaces points.
    pub fn keep_title(id: CategoryId, points: Vec<String>) -> Self {
        Self {
            id,
            title: String::new(),
            points,
        }
    }

    /// Returns whether this value asks update to keep the stored title.
    pub fn keeps_title(&self) -> bool {
        self.title.is_empty()
    }
}

/// Create request for a category and its initial points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub title: String,
    #[serde(default)]
    pub points: Vec<String>,
}

impl NewCategory {
    pub fn new(title: impl Into<String>, points: Vec<String>) -> Self {
        Self {
            title: title.into(),
            points,
        }
    }

    /// Checks the request before any SQL runs.
    ///
    /// # Errors
    /// - Returns `EmptyTitle` when the title is empty or whitespace only.
    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        if self.title.trim().is_empty() {
            return Err(CategoryValidationError::EmptyTitle);
        }
        Ok(())
    }

    /// Combines the request with the assigned id, points kept in request order.
    pub fn into_category(self, id: CategoryId) -> Category {
        Category {
            id,
            title: self.title,
            points: self.points,
        }
    }
}

/// Validation failure for category write requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyTitle,
}

impl Display for CategoryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "category title cannot be empty"),
        }
    }
}

impl Error for CategoryValidationError {}
