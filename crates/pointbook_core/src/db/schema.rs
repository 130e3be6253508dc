//! Table bootstrap for categories, points and their bindings.
//!
//! Only `CREATE ... IF NOT EXISTS` statements run here. There is no schema
//! versioning; an existing database is used as found.

use crate::db::DbResult;
use rusqlite::Connection;

/// Tables the category repository reads and writes, with required columns.
pub const REQUIRED_TABLES: &[(&str, &[&str])] = &[
    ("categories", &["id", "title"]),
    ("points", &["id", "text"]),
    ("category_points", &["category_id", "point_id"]),
];

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Creates missing category/point tables on the provided connection.
pub fn ensure_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

/// Returns whether `table` exists in the connected database.
pub fn table_exists(conn: &Connection, table: &str) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

/// Returns whether `table` declares `column`.
pub fn table_has_column(conn: &Connection, table: &str, column: &str) -> DbResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::{ensure_schema, table_exists, table_has_column, REQUIRED_TABLES};
    use rusqlite::Connection;

    #[test]
    fn ensure_schema_creates_required_tables_and_is_repeatable() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        ensure_schema(&conn).unwrap();

        for (table, columns) in REQUIRED_TABLES {
            assert!(table_exists(&conn, table).unwrap(), "missing {table}");
            for column in *columns {
                assert!(table_has_column(&conn, table, column).unwrap());
            }
        }
    }

    #[test]
    fn table_exists_is_false_on_empty_database() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(!table_exists(&conn, "categories").unwrap());
    }
}
