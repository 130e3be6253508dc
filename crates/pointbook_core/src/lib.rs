//! Core data access for categories and their shared points.
//! This crate owns the category/point storage invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::category::{
    Category, CategoryId, CategoryValidationError, NewCategory, PointId,
};
pub use repo::category_repo::{
    add_category_point, bind_category_points, create_or_get_point, load_category_points,
    CategoryRepository, RepoError, RepoResult, SqliteCategoryRepository,
};
