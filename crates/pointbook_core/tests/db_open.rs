use pointbook_core::db::schema::REQUIRED_TABLES;
use pointbook_core::db::{open_db, open_db_in_memory};
use pointbook_core::{CategoryRepository, NewCategory, SqliteCategoryRepository};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_creates_category_tables() {
    let conn = open_db_in_memory().unwrap();

    for (table, _) in REQUIRED_TABLES {
        assert_table_exists(&conn, table);
    }
}

#[test]
fn open_db_enables_foreign_keys() {
    let conn = open_db_in_memory().unwrap();
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);
}

#[test]
fn reopening_file_database_keeps_existing_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pointbook.sqlite3");

    let created_id = {
        let mut conn = open_db(&path).unwrap();
        let mut repo = SqliteCategoryRepository::try_new(&mut conn).unwrap();
        repo.create_category(&NewCategory::new(
            "Safety",
            vec!["Wear helmet".to_string()],
        ))
        .unwrap()
        .id
    };

    let mut conn = open_db(&path).unwrap();
    let repo = SqliteCategoryRepository::try_new(&mut conn).unwrap();
    let loaded = repo.get_category(created_id).unwrap().unwrap();
    assert_eq!(loaded.title, "Safety");
    assert_eq!(loaded.points, vec!["Wear helmet".to_string()]);
}

#[test]
fn open_db_accepts_existing_schema_created_elsewhere() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("external.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE categories (id INTEGER PRIMARY KEY AUTOINCREMENT, title TEXT NOT NULL);
         INSERT INTO categories (title) VALUES ('Imported');",
    )
    .unwrap();
    drop(conn);

    let mut conn = open_db(&path).unwrap();
    let repo = SqliteCategoryRepository::try_new(&mut conn).unwrap();
    let listed = repo.list_categories().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "Imported");
    assert!(listed[0].points.is_empty());
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
