//! Data-loss hints for push-style application
//!
//! Analysis reads only the planned statements. Nothing here looks at a live
//! database, so every hint means "this can lose data if the table has rows".

use super::ddl::{Column, Index};
use super::grammar::quote;
use super::statements::{JsonStatement, RecreateTableStatement};
use serde::Serialize;
use sqlshift_types::sqlite::Affinity;

/// What kind of loss a hint warns about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HintKind {
    /// NOT NULL column without a default added to an existing table
    NotNullWithoutDefault,
    /// A nullable column became NOT NULL
    NullabilityTightened,
    /// Stored values may not fit the new type affinity
    NarrowingType,
    DropColumn,
    DropTable,
    /// Existing rows may violate a new uniqueness rule
    UniqueAdded,
}

/// A proposed mitigation the caller may choose to run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub kind: HintKind,
    pub table: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    pub description: String,
    /// Statement that makes the change safe, when one exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statement: Option<String>,
}

impl Hint {
    fn new(kind: HintKind, table: &str, column: Option<&str>, description: String) -> Self {
        Self {
            kind,
            table: table.to_string(),
            column: column.map(str::to_string),
            description,
            statement: None,
        }
    }

    fn with_statement(mut self, statement: String) -> Self {
        self.statement = Some(statement);
        self
    }
}

/// Statement that empties `table`
pub fn truncate_statement(table: &str) -> String {
    format!("DELETE FROM {} where true;", quote(table))
}

/// Hints for a planned statement list, in statement order
pub fn analyze(statements: &[JsonStatement]) -> Vec<Hint> {
    let created: Vec<&str> = statements
        .iter()
        .filter_map(|st| match st {
            JsonStatement::CreateTable(st) => Some(st.table.name.as_str()),
            _ => None,
        })
        .collect();
    // Indexes dropped and created unchanged were already satisfied by the data
    let rebuilt = |index: &Index| {
        statements
            .iter()
            .any(|st| matches!(st, JsonStatement::DropIndex(dropped) if dropped.index == *index))
    };

    let mut hints = Vec::new();
    for statement in statements {
        match statement {
            JsonStatement::AddColumn(st) if st.column.requires_value() => {
                hints.push(not_null_without_default(&st.column));
            }
            JsonStatement::DropColumn(st) => {
                hints.push(Hint::new(
                    HintKind::DropColumn,
                    &st.column.table,
                    Some(&st.column.name),
                    format!(
                        "Dropping column `{}` from `{}` deletes its data",
                        st.column.name, st.column.table
                    ),
                ));
            }
            JsonStatement::DropTable(st) => {
                hints.push(Hint::new(
                    HintKind::DropTable,
                    &st.table_name,
                    None,
                    format!("Dropping table `{}` deletes all of its rows", st.table_name),
                ));
            }
            JsonStatement::CreateIndex(st)
                if st.index.is_unique
                    && !created.contains(&st.index.table.as_str())
                    && !rebuilt(&st.index) =>
            {
                hints.push(Hint::new(
                    HintKind::UniqueAdded,
                    &st.index.table,
                    None,
                    format!(
                        "Unique index `{}` fails if `{}` has duplicate rows",
                        st.index.name, st.index.table
                    ),
                ));
            }
            JsonStatement::RecreateTable(st) => recreate_hints(st, &mut hints),
            _ => {}
        }
    }
    hints
}

fn not_null_without_default(column: &Column) -> Hint {
    Hint::new(
        HintKind::NotNullWithoutDefault,
        &column.table,
        Some(&column.name),
        format!(
            "Adding not-null column `{}` without a default to `{}` fails if the table has rows",
            column.name, column.table
        ),
    )
    .with_statement(truncate_statement(&column.table))
}

fn recreate_hints(st: &RecreateTableStatement, hints: &mut Vec<Hint>) {
    let table = st.to.name.as_str();

    for column in &st.to.columns {
        let Some(old) = st.from.column(&column.name) else {
            continue;
        };

        if column.not_null && !old.not_null && column.generated.is_none() {
            let statement = match &column.default {
                Some(default) => format!(
                    "UPDATE {} SET {} = {default} WHERE {} IS NULL;",
                    quote(table),
                    quote(&column.name),
                    quote(&column.name)
                ),
                None => truncate_statement(table),
            };
            hints.push(
                Hint::new(
                    HintKind::NullabilityTightened,
                    table,
                    Some(&column.name),
                    format!(
                        "Column `{}` of `{table}` becomes not-null; existing NULL values block the copy",
                        column.name
                    ),
                )
                .with_statement(statement),
            );
        }

        let before = Affinity::from_sql_type(&old.sql_type);
        let after = Affinity::from_sql_type(&column.sql_type);
        if before.narrows_to(after) {
            hints.push(Hint::new(
                HintKind::NarrowingType,
                table,
                Some(&column.name),
                format!(
                    "Changing `{}`.`{}` from {} to {} may lose stored values",
                    table, column.name, old.sql_type, column.sql_type
                ),
            ));
        }
    }

    for old in st.from.columns.iter().filter(|c| st.to.column(&c.name).is_none()) {
        hints.push(Hint::new(
            HintKind::DropColumn,
            table,
            Some(&old.name),
            format!("Dropping column `{}` from `{table}` deletes its data", old.name),
        ));
    }

    for unique in st
        .to
        .uniques
        .iter()
        .filter(|u| !st.from.uniques.iter().any(|o| o.columns == u.columns))
    {
        hints.push(Hint::new(
            HintKind::UniqueAdded,
            table,
            None,
            format!(
                "Unique constraint `{}` fails the copy if `{table}` has duplicate rows",
                unique.name
            ),
        ));
    }
}
