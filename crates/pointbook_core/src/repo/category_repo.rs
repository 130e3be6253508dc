//! Category/point repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide category CRUD on top of `categories`, `points` and the
//!   `category_points` join table.
//! - Own get-or-create semantics for points and the rebind-on-update flow.
//!
//! # Invariants
//! - Point texts are unique; binding an existing text reuses its row.
//! - Category reads always return point texts sorted ascending.
//! - `create_category` and `update_category` run in one transaction each.
//! - Point rows are never deleted here, so unbound points stay as orphans.
//!
//! # See also
//! - DESIGN.md

use crate::db::schema::{table_exists, table_has_column, REQUIRED_TABLES};
use crate::db::DbError;
use crate::model::category::{
    Category, CategoryId, CategoryValidationError, NewCategory, PointId,
};
use log::{debug, info, warn};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for category persistence and query operations.
///
/// Absence is not an error here: missing categories surface as `None` or
/// `false` from the operation itself.
#[derive(Debug)]
pub enum RepoError {
    Validation(CategoryValidationError),
    Db(DbError),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::MissingRequiredTable(_) | Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<CategoryValidationError> for RepoError {
    fn from(value: CategoryValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for categories and their points.
pub trait CategoryRepository {
    /// Lists every category with its sorted points, in storage order.
    fn list_categories(&self) -> RepoResult<Vec<Category>>;
    /// Gets one category with sorted points, `None` when the id is unknown.
    fn get_category(&self, category_id: CategoryId) -> RepoResult<Option<Category>>;
    /// Returns the point texts bound to a category, sorted ascending.
    fn get_category_points(&self, category_id: CategoryId) -> RepoResult<Vec<String>>;
    /// Creates a category and binds its points in one transaction.
    fn create_category(&mut self, request: &NewCategory) -> RepoResult<Category>;
    /// Returns the id of the point with `text`, inserting it when absent.
    fn create_or_get_point(&self, text: &str) -> RepoResult<PointId>;
    /// Replaces title (unless empty) and the full point set in one transaction.
    ///
    /// Returns `Ok(None)` when the category does not exist.
    fn update_category(&mut self, value: &Category) -> RepoResult<Option<Category>>;
    /// Deletes a category row; returns whether a row was removed.
    fn delete_category(&self, category_id: CategoryId) -> RepoResult<bool>;
    /// Returns every stored point text sorted ascending, orphans included.
    fn list_points(&self) -> RepoResult<Vec<String>>;
}

/// SQLite-backed category repository.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    /// Constructs a repository from a connection that already has the schema.
    ///
    /// # Errors
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the connected
    ///   database lacks the category tables.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_category_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn list_categories(&self) -> RepoResult<Vec<Category>> {
        let mut stmt = self.conn.prepare("SELECT id, title FROM categories;")?;
        let mut rows = stmt.query([])?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            let id: CategoryId = row.get("id")?;
            let points = load_category_points(self.conn, id)?;
            categories.push(Category {
                id,
                title: row.get("title")?,
                points,
            });
        }

        debug!(
            "event=category_list module=repo status=ok count={}",
            categories.len()
        );
        Ok(categories)
    }

    fn get_category(&self, category_id: CategoryId) -> RepoResult<Option<Category>> {
        let title: Option<String> = self
            .conn
            .query_row(
                "SELECT title FROM categories WHERE id = ?1;",
                [category_id],
                |row| row.get(0),
            )
            .optional()?;

        match title {
            Some(title) => Ok(Some(Category {
                id: category_id,
                title,
                points: load_category_points(self.conn, category_id)?,
            })),
            None => Ok(None),
        }
    }

    fn get_category_points(&self, category_id: CategoryId) -> RepoResult<Vec<String>> {
        load_category_points(self.conn, category_id)
    }

    fn create_category(&mut self, request: &NewCategory) -> RepoResult<Category> {
        request.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let category_id: CategoryId = tx.query_row(
            "INSERT INTO categories (title) VALUES (?1) RETURNING id;",
            [request.title.as_str()],
            |row| row.get(0),
        )?;
        bind_category_points(&tx, category_id, &request.points)?;
        tx.commit()?;

        info!(
            "event=category_create module=repo status=ok category_id={} point_count={}",
            category_id,
            request.points.len()
        );
        Ok(request.clone().into_category(category_id))
    }

    fn create_or_get_point(&self, text: &str) -> RepoResult<PointId> {
        create_or_get_point(self.conn, text)
    }

    fn update_category(&mut self, value: &Category) -> RepoResult<Option<Category>> {
        let category_id = value.id;
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let title = if value.keeps_title() {
            let stored: Option<String> = tx
                .query_row(
                    "SELECT title FROM categories WHERE id = ?1;",
                    [category_id],
                    |row| row.get(0),
                )
                .optional()?;
            match stored {
                Some(title) => title,
                None => {
                    warn!(
                        "event=category_update module=repo status=not_found category_id={category_id}"
                    );
                    return Ok(None);
                }
            }
        } else {
            let changed = tx.execute(
                "UPDATE categories SET title = ?2 WHERE id = ?1;",
                params![category_id, value.title.as_str()],
            )?;
            if changed == 0 {
                warn!(
                    "event=category_update module=repo status=not_found category_id={category_id}"
                );
                return Ok(None);
            }
            value.title.clone()
        };

        tx.execute(
            "DELETE FROM category_points WHERE category_id = ?1;",
            [category_id],
        )?;
        bind_category_points(&tx, category_id, &value.points)?;
        tx.commit()?;

        let mut points = value.points.clone();
        points.sort();

        info!(
            "event=category_update module=repo status=ok category_id={} point_count={} title_kept={}",
            category_id,
            points.len(),
            value.keeps_title()
        );
        Ok(Some(Category {
            id: category_id,
            title,
            points,
        }))
    }

    fn delete_category(&self, category_id: CategoryId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM categories WHERE id = ?1;", [category_id])?;
        let deleted = changed > 0;

        info!(
            "event=category_delete module=repo status={} category_id={category_id}",
            if deleted { "ok" } else { "not_found" }
        );
        Ok(deleted)
    }

    fn list_points(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT text FROM points;")?;
        let mut rows = stmt.query([])?;
        let mut points = Vec::new();
        while let Some(row) = rows.next()? {
            points.push(row.get::<_, String>(0)?);
        }
        points.sort();
        Ok(points)
    }
}

/// Loads the point texts bound to `category_id`, sorted ascending.
///
/// An unknown category yields an empty list.
pub fn load_category_points(conn: &Connection, category_id: CategoryId) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT p.text
         FROM category_points cp
         INNER JOIN points p ON p.id = cp.point_id
         WHERE cp.category_id = ?1;",
    )?;
    let mut rows = stmt.query([category_id])?;
    let mut points = Vec::new();
    while let Some(row) = rows.next()? {
        points.push(row.get::<_, String>(0)?);
    }
    points.sort();
    Ok(points)
}

/// Binds each point text to `category_id` in caller order.
///
/// Stops at the first failure. Earlier bindings are only undone when the
/// caller runs this inside a transaction it then drops.
pub fn bind_category_points(
    conn: &Connection,
    category_id: CategoryId,
    points: &[String],
) -> RepoResult<()> {
    for text in points {
        let point_id = create_or_get_point(conn, text)?;
        add_category_point(conn, category_id, point_id)?;
    }
    Ok(())
}

/// Returns the id of the point with exactly `text`, inserting it when absent.
///
/// Only a lookup that finds no row falls through to the insert; any other
/// lookup failure is returned as-is. Two connections racing on the same new
/// text are serialized by the `UNIQUE` constraint, and the loser gets the
/// constraint error without a retry.
pub fn create_or_get_point(conn: &Connection, text: &str) -> RepoResult<PointId> {
    let existing: Option<PointId> = conn
        .query_row("SELECT id FROM points WHERE text = ?1;", [text], |row| {
            row.get(0)
        })
        .optional()?;
    if let Some(point_id) = existing {
        return Ok(point_id);
    }

    let point_id: PointId = conn.query_row(
        "INSERT INTO points (text) VALUES (?1) RETURNING id;",
        [text],
        |row| row.get(0),
    )?;
    debug!("event=point_create module=repo status=ok point_id={point_id}");
    Ok(point_id)
}

/// Inserts one category/point binding without checking either id exists.
///
/// With `foreign_keys=ON` the store rejects unknown ids.
pub fn add_category_point(
    conn: &Connection,
    category_id: CategoryId,
    point_id: PointId,
) -> RepoResult<()> {
    conn.execute(
        "INSERT INTO category_points (category_id, point_id) VALUES (?1, ?2);",
        params![category_id, point_id],
    )?;
    Ok(())
}

fn ensure_category_connection_ready(conn: &Connection) -> RepoResult<()> {
    for &(table, columns) in REQUIRED_TABLES {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{add_category_point, create_or_get_point, load_category_points};
    use crate::db::open_db_in_memory;

    #[test]
    fn create_or_get_point_reuses_existing_row() {
        let conn = open_db_in_memory().unwrap();
        let first = create_or_get_point(&conn, "Check brakes").unwrap();
        let second = create_or_get_point(&conn, "Check brakes").unwrap();
        assert_eq!(first, second);

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM points;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn create_or_get_point_is_case_sensitive() {
        let conn = open_db_in_memory().unwrap();
        let lower = create_or_get_point(&conn, "wear helmet").unwrap();
        let upper = create_or_get_point(&conn, "Wear helmet").unwrap();
        assert_ne!(lower, upper);
    }

    #[test]
    fn add_category_point_rejects_unknown_category() {
        let conn = open_db_in_memory().unwrap();
        let point_id = create_or_get_point(&conn, "Wear helmet").unwrap();
        assert!(add_category_point(&conn, 404, point_id).is_err());
    }

    #[test]
    fn load_category_points_for_unknown_category_is_empty() {
        let conn = open_db_in_memory().unwrap();
        assert!(load_category_points(&conn, 404).unwrap().is_empty());
    }
}
