//! SQLite Column Alteration Tests
//!
//! Which column and constraint changes SQLite can express with ALTER TABLE,
//! and which ones rebuild the table through a `__new_` shadow copy.

use sqlshift_migrations::DiffError;
use sqlshift_migrations::sqlite::{
    JsonStatement, RecreateReason, SQLiteDDL, compute_migration,
    ddl::{CheckConstraint, Column, ForeignKey, Index, PrimaryKey, Table, UniqueConstraint},
};

// =============================================================================
// Helper Functions
// =============================================================================

fn diff_sql(from: &SQLiteDDL, to: &SQLiteDDL) -> Vec<String> {
    compute_migration(from, to)
        .expect("diff should succeed")
        .sql_statements
}

fn statement_types(from: &SQLiteDDL, to: &SQLiteDDL) -> Vec<&'static str> {
    compute_migration(from, to)
        .expect("diff should succeed")
        .statements
        .iter()
        .map(JsonStatement::type_name)
        .collect()
}

fn recreate_reasons(from: &SQLiteDDL, to: &SQLiteDDL) -> Vec<RecreateReason> {
    let diff = compute_migration(from, to).expect("diff should succeed");
    diff.statements
        .iter()
        .find_map(|st| match st {
            JsonStatement::RecreateTable(st) => Some(st.reasons.clone()),
            _ => None,
        })
        .unwrap_or_default()
}

/// `users(id integer pk, name text)`
fn users() -> SQLiteDDL {
    let mut ddl = SQLiteDDL::new();
    ddl.push(Table::new("users"));
    ddl.push(Column::new("users", "id", "integer").not_null());
    ddl.push(Column::new("users", "name", "text"));
    ddl.push(PrimaryKey::new("users", ["id"]));
    ddl
}

// =============================================================================
// Incremental changes
// =============================================================================

#[test]
fn test_add_nullable_column() {
    let mut to = users();
    to.push(Column::new("users", "email", "text"));

    assert_eq!(
        diff_sql(&users(), &to),
        vec!["ALTER TABLE `users` ADD `email` TEXT;"]
    );
}

#[test]
fn test_add_column_with_default() {
    let mut to = users();
    to.push(
        Column::new("users", "active", "integer")
            .not_null()
            .default_value("1"),
    );

    assert_eq!(
        diff_sql(&users(), &to),
        vec!["ALTER TABLE `users` ADD `active` INTEGER DEFAULT 1 NOT NULL;"]
    );
}

#[test]
fn test_drop_column() {
    let mut from = users();
    from.push(Column::new("users", "legacy", "text"));

    assert_eq!(
        diff_sql(&from, &users()),
        vec!["ALTER TABLE `users` DROP COLUMN `legacy`;"]
    );
}

#[test]
fn test_add_column_with_inline_reference() {
    let mut from = users();
    from.push(Table::new("posts"));
    from.push(Column::new("posts", "id", "integer"));

    let mut to = from.clone();
    to.push(Column::new("posts", "author_id", "integer"));
    to.push(ForeignKey::new("posts", ["author_id"], "users", ["id"]));

    assert_eq!(
        diff_sql(&from, &to),
        vec!["ALTER TABLE `posts` ADD `author_id` INTEGER REFERENCES `users`(`id`);"]
    );
}

#[test]
fn test_virtual_expression_change_recreates_column_only() {
    let mut from = users();
    from.push(Column::new("users", "shout", "text").generated_virtual("upper(name)"));
    let mut to = users();
    to.push(Column::new("users", "shout", "text").generated_virtual("upper(name) || '!'"));

    assert_eq!(
        diff_sql(&from, &to),
        vec![
            "ALTER TABLE `users` DROP COLUMN `shout`;",
            "ALTER TABLE `users` ADD `shout` TEXT GENERATED ALWAYS AS (upper(name) || '!') VIRTUAL;",
        ]
    );
}

#[test]
fn test_not_null_reference_is_not_inlined() {
    let mut from = users();
    from.push(Table::new("posts"));
    from.push(Column::new("posts", "id", "integer"));

    let mut to = from.clone();
    to.push(Column::new("posts", "author_id", "integer").not_null());
    to.push(ForeignKey::new("posts", ["author_id"], "users", ["id"]));

    assert_eq!(statement_types(&from, &to), vec!["add_column", "recreate_table"]);
    assert_eq!(
        diff_sql(&from, &to)[0],
        "ALTER TABLE `posts` ADD `author_id` INTEGER NOT NULL;"
    );
    assert_eq!(
        recreate_reasons(&from, &to),
        vec![RecreateReason::ForeignKeyChanged]
    );
}

#[test]
fn test_virtual_column_indexes_follow_the_rebuild() {
    let mut from = users();
    from.push(Column::new("users", "shout", "text").generated_virtual("upper(name)"));
    from.push(Index::new("users", "users_shout_idx", ["shout"]));
    from.push(Index::new("users", "users_name_idx", ["name"]));
    let mut to = users();
    to.push(Column::new("users", "shout", "text").generated_virtual("lower(name)"));
    to.push(Index::new("users", "users_shout_idx", ["shout"]));
    to.push(Index::new("users", "users_name_idx", ["name"]));

    assert_eq!(
        diff_sql(&from, &to),
        vec![
            "DROP INDEX IF EXISTS `users_shout_idx`;",
            "ALTER TABLE `users` DROP COLUMN `shout`;",
            "ALTER TABLE `users` ADD `shout` TEXT GENERATED ALWAYS AS (lower(name)) VIRTUAL;",
            "CREATE INDEX `users_shout_idx` ON `users` (`shout`);",
        ]
    );
}

#[test]
fn test_virtual_column_read_elsewhere_recreates_table() {
    let shout = |expression: &str| {
        let mut ddl = users();
        ddl.push(Column::new("users", "shout", "text").generated_virtual(expression));
        ddl.push(Column::new("users", "echo", "text").generated_virtual("shout || shout"));
        ddl
    };

    assert_eq!(
        recreate_reasons(&shout("upper(name)"), &shout("lower(name)")),
        vec![RecreateReason::ColumnAltered]
    );

    let checked = |expression: &str| {
        let mut ddl = users();
        ddl.push(Column::new("users", "shout", "text").generated_virtual(expression));
        ddl.push(CheckConstraint::new("users", "shout_check", "length(shout) < 64"));
        ddl
    };
    assert_eq!(
        statement_types(&checked("upper(name)"), &checked("lower(name)")),
        vec!["recreate_table"]
    );
}

#[test]
fn test_add_virtual_generated_column() {
    let mut to = users();
    to.push(Column::new("users", "shout", "text").generated_virtual("upper(name)"));

    assert_eq!(
        statement_types(&users(), &to),
        vec!["add_column"],
    );
}

// =============================================================================
// Recreation
// =============================================================================

#[test]
fn test_add_check_recreates_table() {
    let mut to = users();
    to.push(CheckConstraint::new("users", "id_check", "id > 0"));

    let sql = diff_sql(&users(), &to);

    assert_eq!(
        sql,
        vec![
            "PRAGMA foreign_keys=OFF;",
            "CREATE TABLE `__new_users` (\n\
             \t`id` INTEGER PRIMARY KEY,\n\
             \t`name` TEXT,\n\
             \tCONSTRAINT `id_check` CHECK(id > 0)\n\
             );",
            "INSERT INTO `__new_users`(`id`, `name`) SELECT `id`, `name` FROM `users`;",
            "DROP TABLE `users`;",
            "ALTER TABLE `__new_users` RENAME TO `users`;",
            "PRAGMA foreign_keys=ON;",
        ]
    );
    assert_eq!(recreate_reasons(&users(), &to), vec![RecreateReason::CheckChanged]);
}

#[test]
fn test_changed_check_expression_recreates() {
    let mut from = users();
    from.push(CheckConstraint::new("users", "id_check", "id > 0"));
    let mut to = users();
    to.push(CheckConstraint::new("users", "id_check", "id >= 0"));

    assert_eq!(statement_types(&from, &to), vec!["recreate_table"]);
}

#[test]
fn test_type_change_recreates() {
    let mut to = SQLiteDDL::new();
    to.push(Table::new("users"));
    to.push(Column::new("users", "id", "integer").not_null());
    to.push(Column::new("users", "name", "varchar(255)"));
    to.push(PrimaryKey::new("users", ["id"]));

    assert_eq!(recreate_reasons(&users(), &to), vec![RecreateReason::ColumnAltered]);
}

#[test]
fn test_default_change_recreates() {
    let mut to = SQLiteDDL::new();
    to.push(Table::new("users"));
    to.push(Column::new("users", "id", "integer").not_null());
    to.push(Column::new("users", "name", "text").default_value("'anon'"));
    to.push(PrimaryKey::new("users", ["id"]));

    assert_eq!(statement_types(&users(), &to), vec!["recreate_table"]);
}

#[test]
fn test_primary_key_change_recreates() {
    let mut to = SQLiteDDL::new();
    to.push(Table::new("users"));
    to.push(Column::new("users", "id", "integer").not_null());
    to.push(Column::new("users", "name", "text").not_null());
    to.push(PrimaryKey::new("users", ["id", "name"]));

    let reasons = recreate_reasons(&users(), &to);
    assert!(reasons.contains(&RecreateReason::PrimaryKeyChanged), "{reasons:?}");
    assert!(reasons.contains(&RecreateReason::ColumnAltered), "{reasons:?}");
}

#[test]
fn test_unique_and_options_recreate() {
    let mut to = users();
    to.push(UniqueConstraint::new("users", ["name"]));
    assert_eq!(recreate_reasons(&users(), &to), vec![RecreateReason::UniqueChanged]);

    let mut strict = SQLiteDDL::new();
    strict.push(Table::new("users").strict());
    strict.push(Column::new("users", "id", "integer").not_null());
    strict.push(Column::new("users", "name", "text"));
    strict.push(PrimaryKey::new("users", ["id"]));
    assert_eq!(
        recreate_reasons(&users(), &strict),
        vec![RecreateReason::TableOptionsChanged]
    );
}

#[test]
fn test_stored_generated_column_cannot_be_added() {
    let mut to = users();
    to.push(Column::new("users", "shout", "text").generated_stored("upper(name)"));

    assert_eq!(
        recreate_reasons(&users(), &to),
        vec![RecreateReason::StoredGeneratedAdded]
    );
}

#[test]
fn test_not_null_column_added_before_recreation() {
    let mut to = users();
    to.push(Column::new("users", "email", "text").not_null());
    to.push(CheckConstraint::new("users", "email_check", "email <> ''"));

    let sql = diff_sql(&users(), &to);

    assert_eq!(sql[0], "ALTER TABLE `users` ADD `email` TEXT NOT NULL;");
    assert_eq!(sql[1], "PRAGMA foreign_keys=OFF;");
    assert_eq!(
        sql[3],
        "INSERT INTO `__new_users`(`id`, `name`, `email`) SELECT `id`, `name`, `email` FROM `users`;"
    );
    assert_eq!(sql.len(), 7);
}

#[test]
fn test_copy_skips_new_and_generated_columns() {
    let mut from = users();
    from.push(Column::new("users", "legacy", "text"));
    let mut to = users();
    to.push(Column::new("users", "nick", "text").default_value("'x'"));
    to.push(Column::new("users", "shout", "text").generated_stored("upper(name)"));

    let sql = diff_sql(&from, &to);
    assert_eq!(sql.len(), 6, "{sql:?}");
    assert_eq!(
        sql[2],
        "INSERT INTO `__new_users`(`id`, `name`) SELECT `id`, `name` FROM `users`;"
    );
}

#[test]
fn test_indexes_are_rebuilt_after_recreation() {
    use sqlshift_migrations::sqlite::ddl::Index;

    let mut from = users();
    from.push(Index::new("users", "users_name_idx", ["name"]));
    let mut to = from.clone();
    to.push(CheckConstraint::new("users", "id_check", "id > 0"));

    let types = statement_types(&from, &to);
    assert_eq!(types, vec!["recreate_table", "create_index"]);
}

#[test]
fn test_views_reading_recreated_table_are_rebuilt() {
    use sqlshift_migrations::sqlite::ddl::View;

    let mut from = users();
    from.push(View::new("names").definition("SELECT name FROM users"));
    let mut to = from.clone();
    to.push(CheckConstraint::new("users", "id_check", "id > 0"));

    assert_eq!(
        statement_types(&from, &to),
        vec!["drop_view", "recreate_table", "create_view"]
    );
}

// =============================================================================
// Unsupported transitions
// =============================================================================

#[test]
fn test_generated_primary_key_is_rejected() {
    let mut to = SQLiteDDL::new();
    to.push(Table::new("t"));
    to.push(Column::new("t", "id", "integer").generated_stored("1"));
    to.push(PrimaryKey::new("t", ["id"]));

    let err = compute_migration(&SQLiteDDL::new(), &to).unwrap_err();
    assert!(
        matches!(err, DiffError::UnsupportedTransition { ref column, .. } if column == "id"),
        "{err}"
    );
}

#[test]
fn test_generated_column_with_default_is_rejected() {
    let mut to = users();
    to.push(
        Column::new("users", "shout", "text")
            .generated_virtual("upper(name)")
            .default_value("''"),
    );

    assert!(matches!(
        compute_migration(&users(), &to),
        Err(DiffError::UnsupportedTransition { .. })
    ));
}
