//! SQLite Snapshot Model Tests
//!
//! How queued model errors, dangling references and snapshot threading
//! surface through a diff.

use sqlshift_migrations::sqlite::{
    JsonStatement, SQLiteDDL, SQLiteSnapshot, compute_migration,
    ddl::{CheckConstraint, Column, ForeignKey, PrimaryKey, Table, View},
};
use sqlshift_migrations::{DdlError, DiffError, EntityKind};

fn users() -> SQLiteDDL {
    let mut ddl = SQLiteDDL::new();
    ddl.push(Table::new("users"));
    ddl.push(Column::new("users", "id", "integer").not_null());
    ddl.push(Column::new("users", "age", "integer"));
    ddl.push(PrimaryKey::new("users", ["id"]));
    ddl
}

fn error_kinds(errors: &[DdlError]) -> Vec<&'static str> {
    errors.iter().map(DdlError::kind).collect()
}

// =============================================================================
// Queued errors
// =============================================================================

#[test]
fn test_conflicting_checks_are_withheld() {
    let mut to = users();
    to.push(CheckConstraint::new("users", "age_check", "age > 0"));
    to.push(CheckConstraint::new("users", "age_check", "age < 150"));

    let diff = compute_migration(&users(), &to).expect("diff should succeed");

    assert!(diff.is_empty(), "no check may be emitted: {:?}", diff.sql_statements);
    assert_eq!(error_kinds(&diff.errors), vec!["conflict_check"]);
    assert!(diff.next.checks.is_empty());
}

#[test]
fn test_duplicate_column_is_reported() {
    let mut to = users();
    let inserted = to.push(Column::new("users", "age", "text"));

    assert!(!inserted);
    let diff = compute_migration(&users(), &to).expect("diff should succeed");

    assert!(diff.is_empty());
    assert!(matches!(
        &diff.errors[..],
        [DdlError::DuplicateEntity { entity: EntityKind::Column, .. }]
    ));
}

#[test]
fn test_autoincrement_in_composite_key() {
    let mut to = SQLiteDDL::new();
    to.push(Table::new("events"));
    to.push(Column::new("events", "id", "integer").not_null().autoincrement());
    to.push(Column::new("events", "seq", "integer").not_null());
    to.push(PrimaryKey::new("events", ["id", "seq"]));

    let diff = compute_migration(&SQLiteDDL::new(), &to).expect("diff should succeed");

    assert_eq!(error_kinds(&diff.errors), vec!["autoincrement_in_composite_key"]);
    assert_eq!(diff.sql_statements.len(), 1);
}

#[test]
fn test_foreign_key_arity_mismatch_is_left_out() {
    let mut to = users();
    to.push(Table::new("posts"));
    to.push(Column::new("posts", "a", "integer"));
    to.push(Column::new("posts", "b", "integer"));
    to.push(ForeignKey::new("posts", ["a", "b"], "users", ["id"]));

    let diff = compute_migration(&users(), &to).expect("diff should succeed");

    assert_eq!(error_kinds(&diff.errors), vec!["foreign_key_arity"]);
    assert_eq!(
        diff.sql_statements,
        vec!["CREATE TABLE `posts` (\n\t`a` INTEGER,\n\t`b` INTEGER\n);"]
    );
    assert!(diff.next.fks.is_empty());
}

#[test]
fn test_unresolved_view_keeps_previous_definition() {
    let mut from = users();
    from.push(View::new("adults").definition("SELECT id FROM users WHERE age >= 18"));
    let mut to = users();
    to.push(
        View::new("adults")
            .definition("SELECT id FROM members")
            .with_error("no such table: members"),
    );

    let diff = compute_migration(&from, &to).expect("diff should succeed");

    assert!(diff.is_empty());
    assert_eq!(error_kinds(&diff.errors), vec!["unresolved_view"]);
    assert_eq!(diff.next.views.list(), from.views.list());
}

#[test]
fn test_unresolved_new_view_is_omitted() {
    let mut to = users();
    to.push(View::new("broken").with_error("syntax error"));

    let diff = compute_migration(&users(), &to).expect("diff should succeed");

    assert!(diff.is_empty());
    assert!(diff.next.views.is_empty());
}

// =============================================================================
// Dangling references
// =============================================================================

#[test]
fn test_dangling_reference_in_new_snapshot() {
    let mut to = users();
    to.push(Table::new("posts"));
    to.push(Column::new("posts", "author_id", "integer"));
    to.push(ForeignKey::new("posts", ["author_id"], "authors", ["id"]));

    let err = compute_migration(&users(), &to).unwrap_err();

    match err {
        DiffError::InconsistentSnapshot {
            side,
            kind,
            missing,
            ..
        } => {
            assert_eq!(side, "to");
            assert_eq!(kind, EntityKind::ForeignKey);
            assert_eq!(missing, "table `authors`");
        }
        other => panic!("expected InconsistentSnapshot, got {other}"),
    }
}

#[test]
fn test_dangling_column_in_old_snapshot() {
    let mut from = users();
    from.push(PrimaryKey::new("ghosts", ["id"]));

    let err = compute_migration(&from, &users()).unwrap_err();

    assert!(
        matches!(err, DiffError::InconsistentSnapshot { side: "from", .. }),
        "{err}"
    );
}

// =============================================================================
// Snapshot threading
// =============================================================================

#[test]
fn test_next_snapshot_feeds_the_following_diff() {
    let first = compute_migration(&SQLiteDDL::new(), &users()).expect("diff should succeed");
    assert!(!first.is_empty());

    // Re-diffing against the produced snapshot is a no-op
    let again = compute_migration(&first.next, &users()).expect("diff should succeed");
    assert!(again.is_empty(), "{:?}", again.sql_statements);

    let mut v2 = users();
    v2.push(Column::new("users", "email", "text"));
    let second = compute_migration(&first.next, &v2).expect("diff should succeed");
    assert_eq!(
        second.sql_statements,
        vec!["ALTER TABLE `users` ADD `email` TEXT;"]
    );
}

#[test]
fn test_snapshot_json_round_trip_through_diff() {
    let diff = compute_migration(&SQLiteDDL::new(), &users()).expect("diff should succeed");

    let json = diff.snapshot().to_json().expect("snapshot should serialize");
    let loaded = SQLiteSnapshot::from_json(&json).expect("snapshot should parse");

    assert_eq!(loaded.dialect, "sqlite");
    assert_eq!(loaded.to_ddl(), diff.next);
    assert!(compute_migration(&loaded.to_ddl(), &users())
        .expect("diff should succeed")
        .is_empty());
}

#[test]
fn test_grouped_statements_pair_records_with_sql() {
    let diff = compute_migration(&SQLiteDDL::new(), &users()).expect("diff should succeed");

    assert_eq!(diff.grouped.len(), diff.statements.len());
    assert!(matches!(
        diff.grouped[0].json_statement,
        JsonStatement::CreateTable(_)
    ));
    assert_eq!(diff.grouped[0].sql_statements, diff.sql_statements);
}
