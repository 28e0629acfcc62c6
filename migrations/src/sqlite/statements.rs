//! SQLite statement records and SQL synthesis
//!
//! - [`JsonStatement`] is the structured record of one planned change
//! - the convertor functions render records to SQL text
//!
//! Rendering never decides whether a statement is needed. The same record
//! always produces the same text.

use super::collection::SQLiteDDL;
use super::ddl::{
    CheckConstraint, Column, ForeignKey, Index, PrimaryKey, ReferentialAction, Table,
    UniqueConstraint, View,
};
use super::grammar::{generated_expression, quote, quote_list};
use serde::{Deserialize, Serialize};

/// SQL statement breakpoint marker used in migration files
pub const BREAKPOINT: &str = "--> statement-breakpoint";

// =============================================================================
// Statement Records
// =============================================================================

/// Full table shape for create/recreate operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableFull {
    pub name: String,
    pub columns: Vec<Column>,
    pub pk: Option<PrimaryKey>,
    pub fks: Vec<ForeignKey>,
    pub uniques: Vec<UniqueConstraint>,
    pub checks: Vec<CheckConstraint>,
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub without_rowid: bool,
}

impl TableFull {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            columns: Vec::new(),
            pk: None,
            fks: Vec::new(),
            uniques: Vec::new(),
            checks: Vec::new(),
            strict: false,
            without_rowid: false,
        }
    }

    /// Collect the shape of `name` from a snapshot
    pub fn from_ddl(ddl: &SQLiteDDL, name: &str) -> Self {
        let entities = ddl.table_entities(name);
        let (strict, without_rowid) = entities
            .table
            .map(|t| (t.strict, t.without_rowid))
            .unwrap_or_default();
        Self {
            name: name.to_string(),
            columns: entities.columns.into_iter().cloned().collect(),
            pk: entities.pk.cloned(),
            fks: entities.fks.into_iter().cloned().collect(),
            uniques: entities.uniques.into_iter().cloned().collect(),
            checks: entities.checks.into_iter().cloned().collect(),
            strict,
            without_rowid,
        }
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    fn options_suffix(&self) -> &'static str {
        Table {
            name: String::new(),
            strict: self.strict,
            without_rowid: self.without_rowid,
        }
        .options_suffix()
    }

    /// Whether `column` is the sole, auto-named primary key column
    fn is_inline_pk(&self, column: &str) -> bool {
        self.pk
            .as_ref()
            .is_some_and(|pk| !pk.name_explicit && pk.columns.len() == 1 && pk.columns[0] == column)
    }

    fn is_inline_unique(&self, unique: &UniqueConstraint) -> bool {
        !unique.name_explicit && unique.columns.len() == 1
    }
}

/// Whether a foreign key can be written as a column-level `REFERENCES` clause
pub fn is_inline_fk(fk: &ForeignKey) -> bool {
    !fk.name_explicit && fk.columns.len() == 1 && fk.columns_to.len() == 1
}

/// Why a table is rebuilt instead of altered in place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecreateReason {
    /// Type, nullability, default, autoincrement or generated expression changed
    ColumnAltered,
    /// A STORED generated column cannot be added with ALTER TABLE
    StoredGeneratedAdded,
    PrimaryKeyChanged,
    UniqueChanged,
    ForeignKeyChanged,
    CheckChanged,
    /// STRICT or WITHOUT ROWID changed
    TableOptionsChanged,
    /// A constraint kept its definition but changed its name
    ConstraintRenamed,
}

/// All possible statement records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JsonStatement {
    CreateTable(CreateTableStatement),
    DropTable(DropTableStatement),
    RenameTable(RenameTableStatement),
    AddColumn(AddColumnStatement),
    DropColumn(DropColumnStatement),
    RenameColumn(RenameColumnStatement),
    RecreateColumn(RecreateColumnStatement),
    RecreateTable(RecreateTableStatement),
    CreateIndex(CreateIndexStatement),
    DropIndex(DropIndexStatement),
    CreateView(CreateViewStatement),
    DropView(DropViewStatement),
    /// Brackets tables created with circular references
    ToggleForeignKeys(ToggleForeignKeysStatement),
}

impl JsonStatement {
    /// Get the type name of this statement
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::CreateTable(_) => "create_table",
            Self::DropTable(_) => "drop_table",
            Self::RenameTable(_) => "rename_table",
            Self::AddColumn(_) => "add_column",
            Self::DropColumn(_) => "drop_column",
            Self::RenameColumn(_) => "rename_column",
            Self::RecreateColumn(_) => "recreate_column",
            Self::RecreateTable(_) => "recreate_table",
            Self::CreateIndex(_) => "create_index",
            Self::DropIndex(_) => "drop_index",
            Self::CreateView(_) => "create_view",
            Self::DropView(_) => "drop_view",
            Self::ToggleForeignKeys(_) => "toggle_foreign_keys",
        }
    }

    /// Table the statement operates on, if any
    pub fn table_name(&self) -> Option<&str> {
        match self {
            Self::CreateTable(st) => Some(&st.table.name),
            Self::DropTable(st) => Some(&st.table_name),
            Self::RenameTable(st) => Some(&st.to),
            Self::AddColumn(st) => Some(&st.column.table),
            Self::DropColumn(st) => Some(&st.column.table),
            Self::RenameColumn(st) => Some(&st.table),
            Self::RecreateColumn(st) => Some(&st.column.table),
            Self::RecreateTable(st) => Some(&st.to.name),
            Self::CreateIndex(st) => Some(&st.index.table),
            Self::DropIndex(st) => Some(&st.index.table),
            Self::CreateView(_) | Self::DropView(_) | Self::ToggleForeignKeys(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTableStatement {
    pub table: TableFull,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropTableStatement {
    pub table_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameTableStatement {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddColumnStatement {
    pub column: Column,
    pub fk: Option<ForeignKey>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropColumnStatement {
    pub column: Column,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameColumnStatement {
    pub table: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecreateColumnStatement {
    pub column: Column,
    pub fk: Option<ForeignKey>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecreateTableStatement {
    pub from: TableFull,
    pub to: TableFull,
    pub reasons: Vec<RecreateReason>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIndexStatement {
    pub index: Index,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropIndexStatement {
    pub index: Index,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateViewStatement {
    pub view: View,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropViewStatement {
    pub view: View,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleForeignKeysStatement {
    pub enabled: bool,
}

// =============================================================================
// Convertor - Statement to SQL
// =============================================================================

/// Convert a statement record to SQL string(s)
pub fn convert_statement(statement: &JsonStatement) -> Vec<String> {
    match statement {
        JsonStatement::CreateTable(st) => vec![convert_create_table(&st.table)],
        JsonStatement::DropTable(st) => vec![drop_table(&st.table_name)],
        JsonStatement::RenameTable(st) => vec![rename_table(&st.from, &st.to)],
        JsonStatement::AddColumn(st) => vec![convert_add_column(&st.column, st.fk.as_ref())],
        JsonStatement::DropColumn(st) => vec![convert_drop_column(&st.column)],
        JsonStatement::RenameColumn(st) => vec![convert_rename_column(st)],
        JsonStatement::RecreateColumn(st) => vec![
            convert_drop_column(&st.column),
            convert_add_column(&st.column, st.fk.as_ref()),
        ],
        JsonStatement::RecreateTable(st) => convert_recreate_table(st),
        JsonStatement::CreateIndex(st) => vec![convert_create_index(&st.index)],
        JsonStatement::DropIndex(st) => {
            vec![format!("DROP INDEX IF EXISTS {};", quote(&st.index.name))]
        }
        JsonStatement::CreateView(st) => vec![convert_create_view(&st.view)],
        JsonStatement::DropView(st) => vec![format!("DROP VIEW {};", quote(&st.view.name))],
        JsonStatement::ToggleForeignKeys(st) => vec![foreign_keys_pragma(st.enabled)],
    }
}

/// Convert multiple statements to SQL with optional breakpoints
pub fn statements_to_sql(statements: &[JsonStatement], breakpoints: bool) -> String {
    let sql_statements: Vec<String> = statements.iter().flat_map(convert_statement).collect();
    join_sql(&sql_statements, breakpoints)
}

/// Join rendered SQL for a migration file
pub fn join_sql(sql_statements: &[String], breakpoints: bool) -> String {
    if breakpoints {
        sql_statements.join(&format!("\n{BREAKPOINT}\n"))
    } else {
        sql_statements.join("\n")
    }
}

/// A statement record with the SQL it produced
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupedStatement {
    pub json_statement: JsonStatement,
    pub sql_statements: Vec<String>,
}

/// Render each record, keeping the SQL grouped by record
pub fn group_statements(statements: &[JsonStatement]) -> Vec<GroupedStatement> {
    statements
        .iter()
        .map(|statement| GroupedStatement {
            sql_statements: convert_statement(statement),
            json_statement: statement.clone(),
        })
        .collect()
}

// =============================================================================
// Individual Convertors
// =============================================================================

fn foreign_keys_pragma(enabled: bool) -> String {
    format!("PRAGMA foreign_keys={};", if enabled { "ON" } else { "OFF" })
}

fn drop_table(name: &str) -> String {
    format!("DROP TABLE {};", quote(name))
}

fn rename_table(from: &str, to: &str) -> String {
    format!("ALTER TABLE {} RENAME TO {};", quote(from), quote(to))
}

fn referential_actions(fk: &ForeignKey) -> String {
    let mut sql = String::new();
    if fk.on_update != ReferentialAction::NoAction {
        sql.push_str(" ON UPDATE ");
        sql.push_str(fk.on_update.as_sql());
    }
    if fk.on_delete != ReferentialAction::NoAction {
        sql.push_str(" ON DELETE ");
        sql.push_str(fk.on_delete.as_sql());
    }
    sql
}

fn references(fk: &ForeignKey) -> String {
    format!(
        " REFERENCES {}({}){}",
        quote(&fk.table_to),
        quote_list(&fk.columns_to, ","),
        referential_actions(fk)
    )
}

/// Attribute tail shared by CREATE TABLE and ADD COLUMN
fn column_attributes(column: &Column) -> (String, String) {
    let default = column
        .default
        .as_ref()
        .map(|d| format!(" DEFAULT {d}"))
        .unwrap_or_default();
    let generated = column
        .generated
        .as_ref()
        .map(|g| {
            format!(
                " GENERATED ALWAYS AS {} {}",
                generated_expression(&g.expression),
                g.gen_type.as_sql()
            )
        })
        .unwrap_or_default();
    (default, generated)
}

fn convert_create_table(table: &TableFull) -> String {
    let mut lines = Vec::with_capacity(table.columns.len());

    for column in &table.columns {
        let is_pk = table.is_inline_pk(&column.name);
        // INTEGER PRIMARY KEY aliases the rowid and is never NULL
        let omit_not_null = is_pk && column.sql_type.trim().eq_ignore_ascii_case("integer");

        let (default, generated) = column_attributes(column);
        let unique = table
            .uniques
            .iter()
            .any(|u| table.is_inline_unique(u) && u.columns[0] == column.name);
        let reference = table
            .fks
            .iter()
            .find(|fk| is_inline_fk(fk) && fk.columns[0] == column.name)
            .map(references)
            .unwrap_or_default();

        lines.push(format!(
            "\t{} {}{}{}{}{}{}{}{}",
            quote(&column.name),
            column.sql_type.to_uppercase(),
            if is_pk { " PRIMARY KEY" } else { "" },
            if column.autoincrement { " AUTOINCREMENT" } else { "" },
            default,
            generated,
            if column.not_null && !omit_not_null { " NOT NULL" } else { "" },
            if unique { " UNIQUE" } else { "" },
            reference,
        ));
    }

    if let Some(pk) = &table.pk
        && !table.is_inline_pk(pk.columns.first().map_or("", String::as_str))
    {
        lines.push(format!(
            "\tCONSTRAINT {} PRIMARY KEY({})",
            quote(&pk.name),
            quote_list(&pk.columns, ", ")
        ));
    }

    for fk in table.fks.iter().filter(|fk| !is_inline_fk(fk)) {
        lines.push(format!(
            "\tCONSTRAINT {} FOREIGN KEY ({}) REFERENCES {}({}){}",
            quote(&fk.name),
            quote_list(&fk.columns, ","),
            quote(&fk.table_to),
            quote_list(&fk.columns_to, ","),
            referential_actions(fk)
        ));
    }

    for unique in table.uniques.iter().filter(|u| !table.is_inline_unique(u)) {
        lines.push(format!(
            "\tCONSTRAINT {} UNIQUE({})",
            quote(&unique.name),
            quote_list(&unique.columns, ",")
        ));
    }

    for check in &table.checks {
        lines.push(format!(
            "\tCONSTRAINT {} CHECK({})",
            quote(&check.name),
            check.value
        ));
    }

    format!(
        "CREATE TABLE {} (\n{}\n){};",
        quote(&table.name),
        lines.join(",\n"),
        table.options_suffix()
    )
}

fn convert_add_column(column: &Column, fk: Option<&ForeignKey>) -> String {
    let (default, generated) = column_attributes(column);
    let reference = fk
        .map(|fk| {
            if fk.name_explicit {
                format!(" CONSTRAINT {}{}", quote(&fk.name), references(fk))
            } else {
                references(fk)
            }
        })
        .unwrap_or_default();

    format!(
        "ALTER TABLE {} ADD {} {}{}{}{}{};",
        quote(&column.table),
        quote(&column.name),
        column.sql_type.to_uppercase(),
        default,
        generated,
        if column.not_null { " NOT NULL" } else { "" },
        reference
    )
}

fn convert_drop_column(column: &Column) -> String {
    format!(
        "ALTER TABLE {} DROP COLUMN {};",
        quote(&column.table),
        quote(&column.name)
    )
}

fn convert_rename_column(st: &RenameColumnStatement) -> String {
    format!(
        "ALTER TABLE {} RENAME COLUMN {} TO {};",
        quote(&st.table),
        quote(&st.from),
        quote(&st.to)
    )
}

/// Name of the shadow table used while rebuilding `table`
pub fn shadow_name(table: &str) -> String {
    format!("__new_{table}")
}

fn convert_recreate_table(st: &RecreateTableStatement) -> Vec<String> {
    let name = &st.to.name;
    let shadow = shadow_name(name);

    // Columns present in both shapes, in the new order; generated targets
    // cannot be written.
    let copied: Vec<&str> = st
        .to
        .columns
        .iter()
        .filter(|c| c.generated.is_none() && st.from.column(&c.name).is_some())
        .map(|c| c.name.as_str())
        .collect();

    let mut shadow_table = st.to.clone();
    shadow_table.name = shadow.clone();
    for check in &mut shadow_table.checks {
        check.table = shadow.clone();
    }

    let mut statements = vec![
        foreign_keys_pragma(false),
        convert_create_table(&shadow_table),
    ];
    if !copied.is_empty() {
        let columns = quote_list(&copied, ", ");
        statements.push(format!(
            "INSERT INTO {}({columns}) SELECT {columns} FROM {};",
            quote(&shadow),
            quote(name)
        ));
    }
    statements.push(drop_table(name));
    statements.push(rename_table(&shadow, name));
    statements.push(foreign_keys_pragma(true));
    statements
}

fn convert_create_index(index: &Index) -> String {
    let columns = index
        .columns
        .iter()
        .map(|c| {
            let value = if c.is_expression {
                c.value.clone()
            } else {
                quote(&c.value)
            };
            match c.direction {
                Some(direction) => format!("{value} {}", direction.as_sql()),
                None => value,
            }
        })
        .collect::<Vec<_>>()
        .join(",");

    let where_clause = index
        .where_clause
        .as_ref()
        .map(|w| format!(" WHERE {w}"))
        .unwrap_or_default();

    format!(
        "CREATE {}INDEX {} ON {} ({columns}){where_clause};",
        if index.is_unique { "UNIQUE " } else { "" },
        quote(&index.name),
        quote(&index.table),
    )
}

fn convert_create_view(view: &View) -> String {
    format!(
        "CREATE VIEW {} AS {};",
        quote(&view.name),
        view.definition.as_deref().unwrap_or_default()
    )
}
