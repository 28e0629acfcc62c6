//! SQLite Execution Tests
//!
//! Generated SQL is run against an in-memory database to check that it is
//! accepted by SQLite and that rebuilt tables keep their rows.

use rusqlite::Connection;
use sqlshift_migrations::resolver::RenameList;
use sqlshift_migrations::sqlite::{
    MigrationDiff, SQLiteDDL,
    ddl::{
        CheckConstraint, Column, ForeignKey, Index, PrimaryKey, ReferentialAction, Table, View,
    },
    ddl_diff,
};
use sqlshift_migrations::DiffOptions;

// =============================================================================
// Helper Functions
// =============================================================================

fn connect() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("PRAGMA foreign_keys=ON;").unwrap();
    conn
}

/// Diff and run every statement, one at a time
fn apply(conn: &Connection, from: &SQLiteDDL, to: &SQLiteDDL, renames: &[&str]) -> MigrationDiff {
    let mut resolver = RenameList::parse(renames).unwrap();
    let diff = ddl_diff(from, to, &mut resolver, &DiffOptions::default()).unwrap();
    for sql in &diff.sql_statements {
        conn.execute_batch(sql)
            .unwrap_or_else(|e| panic!("SQLite rejected `{sql}`: {e}"));
    }
    diff
}

fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT count(*) FROM `{table}`"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

fn users() -> SQLiteDDL {
    let mut ddl = SQLiteDDL::new();
    ddl.push(Table::new("users"));
    ddl.push(Column::new("users", "id", "integer").not_null());
    ddl.push(Column::new("users", "name", "text"));
    ddl.push(PrimaryKey::new("users", ["id"]));
    ddl
}

fn with_posts(mut ddl: SQLiteDDL) -> SQLiteDDL {
    ddl.push(Table::new("posts"));
    ddl.push(Column::new("posts", "id", "integer").not_null());
    ddl.push(Column::new("posts", "author_id", "integer").not_null());
    ddl.push(Column::new("posts", "title", "text").not_null());
    ddl.push(PrimaryKey::new("posts", ["id"]));
    ddl.push(
        ForeignKey::new("posts", ["author_id"], "users", ["id"])
            .on_delete(ReferentialAction::Cascade),
    );
    ddl
}

fn seed_users(conn: &Connection) {
    conn.execute_batch(
        "INSERT INTO users (id, name) VALUES (1, 'ada'), (2, 'grace'), (3, 'edsger');",
    )
    .unwrap();
}

// =============================================================================
// Tests
// =============================================================================

#[test]
fn test_created_schema_is_usable() {
    let conn = connect();
    let mut to = with_posts(users());
    to.push(Index::new("users", "users_name_idx", ["name"]).unique());
    to.push(View::new("post_titles").definition("SELECT title FROM posts"));

    apply(&conn, &SQLiteDDL::new(), &to, &[]);

    seed_users(&conn);
    conn.execute_batch("INSERT INTO posts (id, author_id, title) VALUES (1, 1, 'notes');")
        .unwrap();
    assert_eq!(count(&conn, "post_titles"), 1);

    // Cascade and unique index came through
    conn.execute_batch("DELETE FROM users WHERE id = 1;").unwrap();
    assert_eq!(count(&conn, "posts"), 0);
    assert!(
        conn.execute_batch("INSERT INTO users (id, name) VALUES (9, 'grace');")
            .is_err()
    );
}

#[test]
fn test_recreation_keeps_rows_and_enforces_check() {
    let conn = connect();
    apply(&conn, &SQLiteDDL::new(), &users(), &[]);
    seed_users(&conn);

    let mut to = users();
    to.push(CheckConstraint::new("users", "name_check", "length(name) > 0"));
    apply(&conn, &users(), &to, &[]);

    assert_eq!(count(&conn, "users"), 3);
    assert!(
        conn.execute_batch("INSERT INTO users (id, name) VALUES (4, '');")
            .is_err(),
        "check should be enforced after the rebuild"
    );
    let foreign_keys: i64 = conn
        .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
        .unwrap();
    assert_eq!(foreign_keys, 1);
}

#[test]
fn test_recreation_under_referencing_table() {
    let conn = connect();
    let from = with_posts(users());
    apply(&conn, &SQLiteDDL::new(), &from, &[]);
    seed_users(&conn);
    conn.execute_batch("INSERT INTO posts (id, author_id, title) VALUES (1, 2, 'compilers');")
        .unwrap();

    let mut to = from.clone();
    to.push(CheckConstraint::new("users", "id_check", "id > 0"));
    apply(&conn, &from, &to, &[]);

    assert_eq!(count(&conn, "posts"), 1);
    let violations = conn
        .prepare("PRAGMA foreign_key_check")
        .unwrap()
        .query_map([], |_| Ok(()))
        .unwrap()
        .count();
    assert_eq!(violations, 0);
}

#[test]
fn test_renames_keep_data() {
    let conn = connect();
    apply(&conn, &SQLiteDDL::new(), &users(), &[]);
    seed_users(&conn);

    let mut to = SQLiteDDL::new();
    to.push(Table::new("accounts"));
    to.push(Column::new("accounts", "id", "integer").not_null());
    to.push(Column::new("accounts", "full_name", "text"));
    to.push(PrimaryKey::new("accounts", ["id"]));

    apply(
        &conn,
        &users(),
        &to,
        &["users->accounts", "users.name->accounts.full_name"],
    );

    let name: String = conn
        .query_row("SELECT full_name FROM accounts WHERE id = 2", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(name, "grace");
}

#[test]
fn test_add_and_drop_columns() {
    let conn = connect();
    let mut from = users();
    from.push(Column::new("users", "legacy", "text"));
    apply(&conn, &SQLiteDDL::new(), &from, &[]);
    seed_users(&conn);

    let mut to = users();
    to.push(
        Column::new("users", "active", "integer")
            .not_null()
            .default_value("1"),
    );
    apply(&conn, &from, &to, &[]);

    let active: i64 = conn
        .query_row("SELECT sum(active) FROM users", [], |row| row.get(0))
        .unwrap();
    assert_eq!(active, 3);
    assert!(conn.prepare("SELECT legacy FROM users").is_err());
}

#[test]
fn test_virtual_column_is_rebuilt() {
    let conn = connect();
    let mut from = users();
    from.push(Column::new("users", "label", "text").generated_virtual("upper(name)"));
    apply(&conn, &SQLiteDDL::new(), &from, &[]);
    seed_users(&conn);

    let mut to = users();
    to.push(Column::new("users", "label", "text").generated_virtual("name || '!'"));
    let diff = apply(&conn, &from, &to, &[]);

    assert_eq!(diff.sql_statements.len(), 2);
    let label: String = conn
        .query_row("SELECT label FROM users WHERE id = 1", [], |row| row.get(0))
        .unwrap();
    assert_eq!(label, "ada!");
}

/// `t(a, g AS (<expression>) VIRTUAL)` plus whatever `extra` adds
fn generated_table(expression: &str, extra: impl Fn(&mut SQLiteDDL)) -> SQLiteDDL {
    let mut ddl = SQLiteDDL::new();
    ddl.push(Table::new("t"));
    ddl.push(Column::new("t", "a", "integer"));
    ddl.push(Column::new("t", "g", "integer").generated_virtual(expression));
    extra(&mut ddl);
    ddl
}

#[test]
fn test_indexed_virtual_column_is_rebuilt() {
    let conn = connect();
    let indexed = |ddl: &mut SQLiteDDL| {
        ddl.push(Index::new("t", "t_g_idx", ["g"]));
    };
    let from = generated_table("a + 1", indexed);
    apply(&conn, &SQLiteDDL::new(), &from, &[]);
    conn.execute_batch("INSERT INTO t (a) VALUES (1), (2);").unwrap();

    apply(&conn, &from, &generated_table("a + 2", indexed), &[]);

    let total: i64 = conn
        .query_row("SELECT sum(g) FROM t", [], |row| row.get(0))
        .unwrap();
    assert_eq!(total, 7);
    let indexes: i64 = conn
        .query_row(
            "SELECT count(*) FROM sqlite_master WHERE type = 'index' AND name = 't_g_idx'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(indexes, 1);
}

#[test]
fn test_virtual_column_read_by_another_rebuilds_table() {
    let conn = connect();
    let chained = |ddl: &mut SQLiteDDL| {
        ddl.push(Column::new("t", "h", "integer").generated_virtual("g * 10"));
    };
    let from = generated_table("a + 1", chained);
    apply(&conn, &SQLiteDDL::new(), &from, &[]);
    conn.execute_batch("INSERT INTO t (a) VALUES (1);").unwrap();

    apply(&conn, &from, &generated_table("a + 2", chained), &[]);

    let h: i64 = conn
        .query_row("SELECT h FROM t WHERE a = 1", [], |row| row.get(0))
        .unwrap();
    assert_eq!(h, 30);
}

#[test]
fn test_indexes_and_views_survive_recreation() {
    let conn = connect();
    let mut from = users();
    from.push(Index::new("users", "users_name_idx", ["name"]));
    from.push(View::new("names").definition("SELECT name FROM users"));
    apply(&conn, &SQLiteDDL::new(), &from, &[]);
    seed_users(&conn);

    let mut to = from.clone();
    to.push(CheckConstraint::new("users", "id_check", "id > 0"));
    apply(&conn, &from, &to, &[]);

    let indexes: i64 = conn
        .query_row(
            "SELECT count(*) FROM sqlite_master WHERE type = 'index' AND name = 'users_name_idx'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(indexes, 1);
    assert_eq!(count(&conn, "names"), 3);
}

#[test]
fn test_circular_tables_create_and_drop() {
    let conn = connect();
    let mut ddl = SQLiteDDL::new();
    for (table, other) in [("a", "b"), ("b", "a")] {
        ddl.push(Table::new(table));
        ddl.push(Column::new(table, "id", "integer").not_null());
        ddl.push(Column::new(table, "other_id", "integer"));
        ddl.push(PrimaryKey::new(table, ["id"]));
        ddl.push(ForeignKey::new(table, ["other_id"], other, ["id"]));
    }

    apply(&conn, &SQLiteDDL::new(), &ddl, &[]);
    conn.execute_batch(
        "INSERT INTO a (id, other_id) VALUES (1, NULL);
         INSERT INTO b (id, other_id) VALUES (1, 1);
         UPDATE a SET other_id = 1;",
    )
    .unwrap();

    apply(&conn, &ddl, &SQLiteDDL::new(), &[]);
    let tables: i64 = conn
        .query_row(
            "SELECT count(*) FROM sqlite_master WHERE type = 'table'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(tables, 0);
}
