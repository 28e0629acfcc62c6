//! SQLite structural differ
//!
//! [`ddl_diff`] matches two snapshots, asks the [`RenameResolver`] about
//! every unmatched name, decides per table whether `ALTER TABLE` can express
//! the change or the table has to be rebuilt, and assembles the statements in
//! an order that is safe to execute front to back:
//!
//! 1. table renames, then column renames
//! 2. drops of views and indexes that would block the changes below
//! 3. created tables (referenced tables first)
//! 4. added columns, rebuilt tables, rebuilt columns, dropped columns
//! 5. created indexes
//! 6. dropped tables (referencing tables first)
//! 7. created views
//!
//! Renamed tables and columns are applied to a working copy of the old
//! snapshot first, so everything after step 1 compares like with like.

use super::collection::SQLiteDDL;
use super::ddl::{Column, ForeignKey, Index, IndexOrigin, PrimaryKey, View};
use super::grammar::{mentions_identifier, rename_identifier};
use super::hints::{self, Hint};
use super::snapshot::SQLiteSnapshot;
use super::statements::{
    AddColumnStatement, CreateIndexStatement, CreateTableStatement, CreateViewStatement,
    DropColumnStatement, DropIndexStatement, DropTableStatement, DropViewStatement,
    GroupedStatement, JsonStatement, RecreateColumnStatement, RecreateReason,
    RecreateTableStatement, RenameColumnStatement, RenameTableStatement, TableFull,
    ToggleForeignKeysStatement, group_statements, is_inline_fk, join_sql,
};
use crate::config::DiffOptions;
use crate::error::{DdlError, DiffError};
use crate::resolver::{NoRenames, RenameCandidate, RenameResolver, ResolveRequest};
use crate::traits::{Entity, EntityKey, EntityKind};
use std::collections::HashSet;

/// Result of diffing two snapshots
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationDiff {
    /// Structured records, in execution order
    pub statements: Vec<JsonStatement>,
    /// Rendered SQL, in execution order
    pub sql_statements: Vec<String>,
    /// Each record with the SQL it produced
    pub grouped: Vec<GroupedStatement>,
    /// The new snapshot, to be used as `from` of the next diff
    pub next: SQLiteDDL,
    /// Resolved renames in rename-list form
    pub renames: Vec<String>,
    /// Model errors found in the new snapshot
    pub errors: Vec<DdlError>,
    /// Data-loss hints, push mode only
    pub hints: Vec<Hint>,
    /// Whether [`Self::to_migration_sql`] joins with breakpoints
    pub breakpoints: bool,
}

impl MigrationDiff {
    /// No statements were produced
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// SQL joined for a migration file
    pub fn to_migration_sql(&self) -> String {
        join_sql(&self.sql_statements, self.breakpoints)
    }

    /// Snapshot of [`Self::next`] carrying this diff's rename ledger
    pub fn snapshot(&self) -> SQLiteSnapshot {
        SQLiteSnapshot::from_ddl(&self.next, self.renames.clone())
    }
}

/// Diff with no renames and default options
pub fn compute_migration(from: &SQLiteDDL, to: &SQLiteDDL) -> Result<MigrationDiff, DiffError> {
    ddl_diff(from, to, &mut NoRenames, &DiffOptions::default())
}

/// Compute the statements that move a database from `from` to `to`.
///
/// Model errors in `to` are returned in [`MigrationDiff::errors`]; the
/// offending entities are left out and the rest is still diffed. The call only
/// fails on dangling references, malformed resolver answers and generated
/// column shapes SQLite cannot build.
pub fn ddl_diff(
    from: &SQLiteDDL,
    to: &SQLiteDDL,
    resolver: &mut dyn RenameResolver,
    options: &DiffOptions,
) -> Result<MigrationDiff, DiffError> {
    from.check_references("from")?;
    to.check_references("to")?;

    let (next, errors) = sanitize(from, to);
    let (statements, renames) = Differ::new(from, &next, resolver).run()?;

    let grouped = group_statements(&statements);
    let sql_statements: Vec<String> = grouped
        .iter()
        .flat_map(|g| g.sql_statements.iter().cloned())
        .collect();
    let hints = if options.is_push() {
        hints::analyze(&statements)
    } else {
        Vec::new()
    };

    sqlshift_trace_diff!(statements.len(), errors.len(), hints.len());

    Ok(MigrationDiff {
        statements,
        sql_statements,
        grouped,
        next,
        renames,
        errors,
        hints,
        breakpoints: options.breakpoints,
    })
}

/// Drop what cannot be diffed from `to` and collect its model errors
fn sanitize(from: &SQLiteDDL, to: &SQLiteDDL) -> (SQLiteDDL, Vec<DdlError>) {
    let mut errors = to.errors().to_vec();
    for error in to.validate() {
        sqlshift_trace_conflict!(error);
        errors.push(error);
    }

    let mut next = to.clone();
    next.fks.retain(|fk| fk.columns.len() == fk.columns_to.len());

    // A view that failed to resolve keeps its previous definition
    let unresolved: Vec<String> = next
        .views
        .iter()
        .filter(|v| !v.is_existing && v.error.is_some())
        .map(|v| v.name.clone())
        .collect();
    for name in unresolved {
        let key = EntityKey::simple(&name);
        next.views.delete(&key);
        if let Some(previous) = from.views.get(&key) {
            next.views.push(previous.clone());
        }
    }

    (next, errors)
}

// =============================================================================
// Plan
// =============================================================================

#[derive(Debug, Default)]
struct Plan {
    rename_tables: Vec<JsonStatement>,
    rename_columns: Vec<JsonStatement>,
    drop_views: Vec<JsonStatement>,
    drop_indexes: Vec<JsonStatement>,
    create_tables: Vec<JsonStatement>,
    add_columns: Vec<JsonStatement>,
    recreate_tables: Vec<JsonStatement>,
    recreate_columns: Vec<JsonStatement>,
    drop_columns: Vec<JsonStatement>,
    create_indexes: Vec<JsonStatement>,
    drop_tables: Vec<JsonStatement>,
    create_views: Vec<JsonStatement>,
}

impl Plan {
    fn into_statements(self) -> Vec<JsonStatement> {
        [
            self.rename_tables,
            self.rename_columns,
            self.drop_views,
            self.drop_indexes,
            self.create_tables,
            self.add_columns,
            self.recreate_tables,
            self.recreate_columns,
            self.drop_columns,
            self.create_indexes,
            self.drop_tables,
            self.create_views,
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Entities of one kind and table, split by how they changed
struct Matched<'t, T> {
    created: Vec<&'t T>,
    dropped: Vec<&'t T>,
    altered: Vec<(&'t T, &'t T)>,
    renamed: Vec<(&'t T, &'t T)>,
}

impl<T> Matched<'_, T> {
    fn has_changes(&self) -> bool {
        !self.created.is_empty() || !self.dropped.is_empty() || !self.altered.is_empty()
    }
}

// =============================================================================
// Differ
// =============================================================================

struct Differ<'a, 'r> {
    /// Old snapshot with accepted renames applied
    working: SQLiteDDL,
    to: &'a SQLiteDDL,
    resolver: &'r mut dyn RenameResolver,
    /// (old, new) table names
    table_renames: Vec<(String, String)>,
    /// Tables whose shape changes; views reading them are rebuilt
    touched: Vec<String>,
    renames: Vec<String>,
    plan: Plan,
}

impl<'a, 'r> Differ<'a, 'r> {
    fn new(from: &SQLiteDDL, to: &'a SQLiteDDL, resolver: &'r mut dyn RenameResolver) -> Self {
        Self {
            working: from.clone(),
            to,
            resolver,
            table_renames: Vec::new(),
            touched: Vec::new(),
            renames: Vec::new(),
            plan: Plan::default(),
        }
    }

    fn run(mut self) -> Result<(Vec<JsonStatement>, Vec<String>), DiffError> {
        self.rename_tables()?;

        let created: Vec<String> = self
            .to
            .tables
            .iter()
            .filter(|t| self.working.table(&t.name).is_none())
            .map(|t| t.name.clone())
            .collect();
        let dropped: Vec<String> = self
            .working
            .tables
            .iter()
            .filter(|t| self.to.table(&t.name).is_none())
            .map(|t| t.name.clone())
            .collect();
        let matched: Vec<String> = self
            .to
            .tables
            .iter()
            .filter(|t| self.working.table(&t.name).is_some())
            .map(|t| t.name.clone())
            .collect();

        self.create_tables(created)?;
        for table in &matched {
            self.diff_table(table)?;
        }
        self.drop_tables(dropped);
        self.diff_views()?;

        Ok((self.plan.into_statements(), self.renames))
    }

    // -------------------------------------------------------------------------
    // Renames
    // -------------------------------------------------------------------------

    /// Ask the resolver and check its answer against what was offered
    fn resolve(
        &mut self,
        kind: EntityKind,
        table: Option<&str>,
        previous_table: Option<&str>,
        dropped: Vec<RenameCandidate>,
        created: Vec<RenameCandidate>,
    ) -> Result<Vec<(String, String)>, DiffError> {
        if dropped.is_empty() || created.is_empty() {
            return Ok(Vec::new());
        }

        let request = ResolveRequest {
            kind,
            table,
            previous_table,
            dropped: &dropped,
            created: &created,
        };
        let pairs = self.resolver.resolve(&request);

        let malformed = |detail: String| DiffError::MalformedResolution { kind, detail };
        let mut used_from = HashSet::new();
        let mut used_to = HashSet::new();
        let mut resolved = Vec::with_capacity(pairs.len());
        for pair in pairs {
            if !dropped.contains(&pair.from) {
                return Err(malformed(format!("`{}` was not offered as dropped", pair.from)));
            }
            if !created.contains(&pair.to) {
                return Err(malformed(format!("`{}` was not offered as created", pair.to)));
            }
            if !used_from.insert(pair.from.name.clone()) {
                return Err(malformed(format!("`{}` was paired twice", pair.from)));
            }
            if !used_to.insert(pair.to.name.clone()) {
                return Err(malformed(format!("`{}` was paired twice", pair.to)));
            }
            resolved.push((pair.from.name, pair.to.name));
        }
        Ok(resolved)
    }

    fn record_rename(&mut self, kind: EntityKind, table: Option<&str>, from: &str, to: &str) {
        sqlshift_trace_rename!(kind, from, to);
        self.renames.push(match table {
            Some(table) => format!("{table}.{from}->{table}.{to}"),
            None => format!("{from}->{to}"),
        });
    }

    fn touch(&mut self, table: &str) {
        if !self.touched.iter().any(|t| t == table) {
            self.touched.push(table.to_string());
        }
    }

    fn previous_name(&self, table: &str) -> Option<String> {
        self.table_renames
            .iter()
            .find(|(_, new)| new == table)
            .map(|(old, _)| old.clone())
    }

    fn rename_tables(&mut self) -> Result<(), DiffError> {
        let dropped: Vec<RenameCandidate> = self
            .working
            .tables
            .iter()
            .filter(|t| self.to.table(&t.name).is_none())
            .map(|t| RenameCandidate::new(EntityKind::Table, None, &t.name))
            .collect();
        let created: Vec<RenameCandidate> = self
            .to
            .tables
            .iter()
            .filter(|t| self.working.table(&t.name).is_none())
            .map(|t| RenameCandidate::new(EntityKind::Table, None, &t.name))
            .collect();

        for (old, new) in self.resolve(EntityKind::Table, None, None, dropped, created)? {
            self.record_rename(EntityKind::Table, None, &old, &new);
            self.plan
                .rename_tables
                .push(JsonStatement::RenameTable(RenameTableStatement {
                    from: old.clone(),
                    to: new.clone(),
                }));
            apply_table_rename(&mut self.working, &old, &new);
            self.touch(&old);
            self.touch(&new);
            self.table_renames.push((old, new));
        }
        Ok(())
    }

    fn rename_columns(&mut self, table: &str, previous: Option<&str>) -> Result<(), DiffError> {
        let dropped: Vec<RenameCandidate> = self
            .working
            .columns
            .for_table(table)
            .filter(|c| self.to.column(table, &c.name).is_none())
            .map(|c| RenameCandidate::new(EntityKind::Column, Some(table), &c.name))
            .collect();
        let created: Vec<RenameCandidate> = self
            .to
            .columns
            .for_table(table)
            .filter(|c| self.working.column(table, &c.name).is_none())
            .map(|c| RenameCandidate::new(EntityKind::Column, Some(table), &c.name))
            .collect();

        for (old, new) in self.resolve(EntityKind::Column, Some(table), previous, dropped, created)? {
            self.record_rename(EntityKind::Column, Some(table), &old, &new);
            self.plan
                .rename_columns
                .push(JsonStatement::RenameColumn(RenameColumnStatement {
                    table: table.to_string(),
                    from: old.clone(),
                    to: new.clone(),
                }));
            apply_column_rename(&mut self.working, table, &old, &new);
            self.touch(table);
        }
        Ok(())
    }

    /// Match same-named entities; explicitly named leftovers go to the resolver
    fn match_entities<'t, T: Entity>(
        &mut self,
        table: Option<&str>,
        previous: Option<&str>,
        old: &'t [T],
        new: &'t [T],
    ) -> Result<Matched<'t, T>, DiffError> {
        let find = |list: &'t [T], name: &str| list.iter().find(|e| e.entity_name() == name);

        let mut matched = Matched {
            created: new
                .iter()
                .filter(|n| find(old, n.entity_name()).is_none())
                .collect(),
            dropped: old
                .iter()
                .filter(|o| find(new, o.entity_name()).is_none())
                .collect(),
            altered: old
                .iter()
                .filter_map(|o| find(new, o.entity_name()).filter(|n| *n != o).map(|n| (o, n)))
                .collect(),
            renamed: Vec::new(),
        };

        let candidates = |list: &[&T]| -> Vec<RenameCandidate> {
            list.iter()
                .filter(|e| e.name_explicit())
                .map(|e| RenameCandidate::new(T::KIND, table, e.entity_name()))
                .collect()
        };
        let dropped = candidates(&matched.dropped);
        let created = candidates(&matched.created);

        for (old_name, new_name) in self.resolve(T::KIND, table, previous, dropped, created)? {
            let from = matched.dropped.iter().position(|e| e.entity_name() == old_name);
            let to = matched.created.iter().position(|e| e.entity_name() == new_name);
            if let (Some(from), Some(to)) = (from, to) {
                let pair = (matched.dropped.remove(from), matched.created.remove(to));
                matched.renamed.push(pair);
                self.record_rename(T::KIND, table, &old_name, &new_name);
            }
        }
        Ok(matched)
    }

    // -------------------------------------------------------------------------
    // Tables
    // -------------------------------------------------------------------------

    fn create_tables(&mut self, created: Vec<String>) -> Result<(), DiffError> {
        for name in &created {
            let shape = TableFull::from_ddl(self.to, name);
            for column in &shape.columns {
                check_generated(column, shape.pk.as_ref())?;
            }
        }

        let to = self.to;
        let (ordered, cyclic) = order_by_references(created, |name| {
            to.fks
                .for_table(name)
                .map(|fk| fk.table_to.clone())
                .collect()
        });

        let create = |name: &String| {
            JsonStatement::CreateTable(CreateTableStatement {
                table: TableFull::from_ddl(to, name),
            })
        };
        self.plan.create_tables.extend(ordered.iter().map(create));
        if !cyclic.is_empty() {
            self.plan.create_tables.push(toggle_foreign_keys(false));
            self.plan.create_tables.extend(cyclic.iter().map(create));
            self.plan.create_tables.push(toggle_foreign_keys(true));
        }

        for name in ordered.iter().chain(&cyclic) {
            self.create_indexes_of(name);
        }
        Ok(())
    }

    fn create_indexes_of(&mut self, table: &str) {
        let indexes = self
            .to
            .indexes
            .for_table(table)
            .filter(|i| i.origin == IndexOrigin::Manual)
            .cloned()
            .map(create_index);
        self.plan.create_indexes.extend(indexes);
    }

    fn drop_tables(&mut self, dropped: Vec<String>) {
        let working = &self.working;
        let (ordered, cyclic) = order_by_references(dropped, |name| {
            working
                .fks
                .for_table(name)
                .map(|fk| fk.table_to.clone())
                .collect()
        });

        let drop_table = |name: &String| {
            JsonStatement::DropTable(DropTableStatement {
                table_name: name.clone(),
            })
        };
        if !cyclic.is_empty() {
            self.plan.drop_tables.push(toggle_foreign_keys(false));
            self.plan.drop_tables.extend(cyclic.iter().map(drop_table));
            self.plan.drop_tables.push(toggle_foreign_keys(true));
        }
        self.plan.drop_tables.extend(ordered.iter().rev().map(drop_table));

        for name in ordered.iter().chain(&cyclic) {
            self.touch(name);
        }
    }

    fn diff_table(&mut self, table: &str) -> Result<(), DiffError> {
        let previous = self.previous_name(table);
        self.rename_columns(table, previous.as_deref())?;

        let old = TableFull::from_ddl(&self.working, table);
        let new = TableFull::from_ddl(self.to, table);
        let mut reasons = Vec::new();

        if old.strict != new.strict || old.without_rowid != new.without_rowid {
            add_reason(&mut reasons, RecreateReason::TableOptionsChanged);
        }

        // Columns
        let mut added: Vec<(Column, Option<ForeignKey>)> = Vec::new();
        let mut rebuilt_columns = Vec::new();
        for column in &new.columns {
            match old.column(&column.name) {
                None => {
                    check_generated(column, new.pk.as_ref())?;
                    if column.is_stored_generated() {
                        add_reason(&mut reasons, RecreateReason::StoredGeneratedAdded);
                    }
                    let fk = new
                        .fks
                        .iter()
                        .find(|fk| {
                            is_inline_fk(fk)
                                && fk.columns[0] == column.name
                                && !column.not_null
                                && column.default.is_none()
                        })
                        .cloned();
                    added.push((column.clone(), fk));
                }
                Some(existing) if existing != column => {
                    check_generated(column, new.pk.as_ref())?;
                    if is_virtual_expression_change(existing, column) {
                        rebuilt_columns.push(column.clone());
                    } else {
                        add_reason(&mut reasons, RecreateReason::ColumnAltered);
                    }
                }
                Some(_) => {}
            }
        }
        // DROP COLUMN is refused while anything else in the table reads the column
        if rebuilt_columns
            .iter()
            .any(|c| has_dependents(&old, &c.name) || has_dependents(&new, &c.name))
        {
            add_reason(&mut reasons, RecreateReason::ColumnAltered);
        }
        let rebuilt_names: Vec<String> = rebuilt_columns.iter().map(|c| c.name.clone()).collect();

        let dropped_columns: Vec<Column> = old
            .columns
            .iter()
            .filter(|c| new.column(&c.name).is_none())
            .cloned()
            .collect();

        // Constraints
        let prev = previous.as_deref();
        let pks = self.match_entities(Some(table), prev, old.pk.as_slice(), new.pk.as_slice())?;
        constraint_reasons(&pks, RecreateReason::PrimaryKeyChanged, &mut reasons, |a, b| {
            a.columns == b.columns
        });

        let uniques = self.match_entities(Some(table), prev, &old.uniques, &new.uniques)?;
        constraint_reasons(&uniques, RecreateReason::UniqueChanged, &mut reasons, |a, b| {
            a.columns == b.columns
        });

        let mut fks = self.match_entities(Some(table), prev, &old.fks, &new.fks)?;
        fks.created
            .retain(|fk| !added.iter().any(|(_, inline)| inline.as_ref() == Some(*fk)));
        constraint_reasons(&fks, RecreateReason::ForeignKeyChanged, &mut reasons, |a, b| {
            same_reference(a, b)
        });

        let checks = self.match_entities(Some(table), prev, &old.checks, &new.checks)?;
        constraint_reasons(&checks, RecreateReason::CheckChanged, &mut reasons, |a, b| {
            a.value == b.value
        });

        let old_indexes = manual_indexes(&self.working, table);
        let new_indexes = manual_indexes(self.to, table);
        let indexes = self.match_entities(Some(table), prev, &old_indexes, &new_indexes)?;

        if !reasons.is_empty() {
            sqlshift_trace_recreate!(table, reasons);
            self.touch(table);

            // Values for these must exist before the copy step
            let mut from = old;
            for (column, _) in added.into_iter().filter(|(c, _)| c.requires_value()) {
                self.plan
                    .add_columns
                    .push(JsonStatement::AddColumn(AddColumnStatement {
                        column: column.clone(),
                        fk: None,
                    }));
                from.columns.push(column);
            }
            self.plan
                .recreate_tables
                .push(JsonStatement::RecreateTable(RecreateTableStatement {
                    from,
                    to: new,
                    reasons,
                }));
            self.create_indexes_of(table);
            return Ok(());
        }

        if !added.is_empty() || !rebuilt_columns.is_empty() || !dropped_columns.is_empty() {
            self.touch(table);
        }
        self.plan
            .add_columns
            .extend(added.into_iter().map(|(column, fk)| {
                JsonStatement::AddColumn(AddColumnStatement { column, fk })
            }));
        self.plan
            .recreate_columns
            .extend(rebuilt_columns.into_iter().map(|column| {
                JsonStatement::RecreateColumn(RecreateColumnStatement { column, fk: None })
            }));
        self.plan
            .drop_columns
            .extend(dropped_columns.into_iter().map(|column| {
                JsonStatement::DropColumn(DropColumnStatement { column })
            }));

        for index in indexes.dropped {
            self.plan.drop_indexes.push(drop_index(index.clone()));
        }
        for (old, new) in indexes.altered.into_iter().chain(indexes.renamed) {
            self.plan.drop_indexes.push(drop_index(old.clone()));
            self.plan.create_indexes.push(create_index(new.clone()));
        }
        for index in indexes.created {
            self.plan.create_indexes.push(create_index(index.clone()));
        }

        // Unchanged indexes on a rebuilt column are dropped and created around it
        for index in old_indexes.iter().filter(|i| new_indexes.contains(i)) {
            if rebuilt_names.iter().any(|c| index_reads_column(index, c)) {
                self.plan.drop_indexes.push(drop_index(index.clone()));
                self.plan.create_indexes.push(create_index(index.clone()));
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Views
    // -------------------------------------------------------------------------

    fn diff_views(&mut self) -> Result<(), DiffError> {
        let old: Vec<View> = managed_views(&self.working);
        let new: Vec<View> = managed_views(self.to);
        let matched = self.match_entities(None, None, &old, &new)?;

        let mut drops: Vec<&View> = matched.dropped.clone();
        let mut creates: Vec<&View> = matched.created.clone();
        for &(before, after) in matched.altered.iter().chain(&matched.renamed) {
            drops.push(before);
            creates.push(after);
        }

        // Unchanged views reading a changed table are rebuilt around it
        for view in &new {
            let unchanged = old.iter().find(|o| o.name == view.name && *o == view);
            if let Some(previous) = unchanged
                && self.touched.iter().any(|t| reads_table(previous, t))
            {
                drops.push(previous);
                creates.push(view);
            }
        }

        let order = |list: &[View], view: &View| list.iter().position(|v| v.name == view.name);
        drops.sort_by_key(|v| order(&old, *v));
        creates.sort_by_key(|v| order(&new, *v));

        self.plan.drop_views.extend(
            drops
                .into_iter()
                .map(|view| JsonStatement::DropView(DropViewStatement { view: view.clone() })),
        );
        self.plan.create_views.extend(
            creates
                .into_iter()
                .map(|view| JsonStatement::CreateView(CreateViewStatement { view: view.clone() })),
        );
        Ok(())
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn add_reason(reasons: &mut Vec<RecreateReason>, reason: RecreateReason) {
    if !reasons.contains(&reason) {
        reasons.push(reason);
    }
}

fn constraint_reasons<T>(
    matched: &Matched<'_, T>,
    reason: RecreateReason,
    reasons: &mut Vec<RecreateReason>,
    same_definition: impl Fn(&T, &T) -> bool,
) {
    if matched.has_changes() {
        add_reason(reasons, reason);
    }
    for (old, new) in &matched.renamed {
        add_reason(reasons, RecreateReason::ConstraintRenamed);
        if !same_definition(old, new) {
            add_reason(reasons, reason);
        }
    }
}

fn same_reference(a: &ForeignKey, b: &ForeignKey) -> bool {
    a.columns == b.columns
        && a.table_to == b.table_to
        && a.columns_to == b.columns_to
        && a.on_delete == b.on_delete
        && a.on_update == b.on_update
}

fn is_virtual_expression_change(old: &Column, new: &Column) -> bool {
    let (Some(old_gen), Some(new_gen)) = (&old.generated, &new.generated) else {
        return false;
    };
    old_gen.gen_type == new_gen.gen_type
        && !new.is_stored_generated()
        && Column {
            generated: Some(new_gen.clone()),
            ..old.clone()
        } == *new
}

fn check_generated(column: &Column, pk: Option<&PrimaryKey>) -> Result<(), DiffError> {
    if column.generated.is_none() {
        return Ok(());
    }
    let unsupported = |reason| DiffError::UnsupportedTransition {
        table: column.table.clone(),
        column: column.name.clone(),
        reason,
    };
    if pk.is_some_and(|pk| pk.columns.contains(&column.name)) {
        return Err(unsupported("generated columns cannot be part of a primary key"));
    }
    if column.default.is_some() {
        return Err(unsupported("generated columns cannot have a default value"));
    }
    Ok(())
}

/// Whether another column or constraint of `table` reads `column`
fn has_dependents(table: &TableFull, column: &str) -> bool {
    let generated = table.columns.iter().any(|c| {
        c.name != column
            && c.generated
                .as_ref()
                .is_some_and(|g| mentions_identifier(&g.expression, column))
    });
    generated
        || table.checks.iter().any(|c| mentions_identifier(&c.value, column))
        || table.uniques.iter().any(|u| u.columns.iter().any(|c| c == column))
        || table.fks.iter().any(|fk| fk.columns.iter().any(|c| c == column))
}

fn index_reads_column(index: &Index, column: &str) -> bool {
    let in_columns = index.columns.iter().any(|c| {
        if c.is_expression {
            mentions_identifier(&c.value, column)
        } else {
            c.value == column
        }
    });
    in_columns
        || index
            .where_clause
            .as_deref()
            .is_some_and(|w| mentions_identifier(w, column))
}

fn manual_indexes(ddl: &SQLiteDDL, table: &str) -> Vec<Index> {
    ddl.indexes
        .for_table(table)
        .filter(|i| i.origin == IndexOrigin::Manual)
        .cloned()
        .collect()
}

fn managed_views(ddl: &SQLiteDDL) -> Vec<View> {
    ddl.views.iter().filter(|v| !v.is_existing).cloned().collect()
}

fn reads_table(view: &View, table: &str) -> bool {
    let Some(definition) = &view.definition else {
        return false;
    };
    mentions_identifier(definition, table)
}

fn create_index(index: Index) -> JsonStatement {
    JsonStatement::CreateIndex(CreateIndexStatement { index })
}

fn drop_index(index: Index) -> JsonStatement {
    JsonStatement::DropIndex(DropIndexStatement { index })
}

fn toggle_foreign_keys(enabled: bool) -> JsonStatement {
    JsonStatement::ToggleForeignKeys(ToggleForeignKeysStatement { enabled })
}

/// Order tables so referenced ones come first. Tables caught in a reference
/// cycle are returned separately, in input order.
fn order_by_references(
    mut remaining: Vec<String>,
    references: impl Fn(&str) -> Vec<String>,
) -> (Vec<String>, Vec<String>) {
    let mut ordered = Vec::with_capacity(remaining.len());
    loop {
        let ready = remaining.iter().position(|name| {
            references(name)
                .iter()
                .all(|target| target == name || !remaining.contains(target))
        });
        match ready {
            Some(i) => ordered.push(remaining.remove(i)),
            None => break,
        }
    }
    (ordered, remaining)
}

fn retarget(field: &mut String, from: &str, to: &str) -> bool {
    if field == from {
        *field = to.to_string();
        true
    } else {
        false
    }
}

fn rename_in(columns: &mut [String], from: &str, to: &str) -> bool {
    let mut touched = false;
    for column in columns.iter_mut() {
        touched |= retarget(column, from, to);
    }
    touched
}

/// Point every entity of table `from` at `to`, re-deriving generated names
fn apply_table_rename(ddl: &mut SQLiteDDL, from: &str, to: &str) {
    ddl.tables.update_all(|t| {
        retarget(&mut t.name, from, to);
    });
    ddl.columns.update_all(|c| {
        retarget(&mut c.table, from, to);
    });
    ddl.indexes.update_all(|i| {
        retarget(&mut i.table, from, to);
    });
    ddl.checks.update_all(|c| {
        retarget(&mut c.table, from, to);
    });
    ddl.pks.update_all(|pk| {
        if retarget(&mut pk.table, from, to) && !pk.name_explicit {
            pk.name = pk.derived_name();
        }
    });
    ddl.uniques.update_all(|u| {
        if retarget(&mut u.table, from, to) && !u.name_explicit {
            u.name = u.derived_name();
        }
    });
    ddl.fks.update_all(|fk| {
        let local = retarget(&mut fk.table, from, to);
        let target = retarget(&mut fk.table_to, from, to);
        if (local || target) && !fk.name_explicit {
            fk.name = fk.derived_name();
        }
    });
}

/// Rename a column everywhere it is referenced, re-deriving generated names
fn apply_column_rename(ddl: &mut SQLiteDDL, table: &str, from: &str, to: &str) {
    ddl.columns.update_all(|c| {
        if c.table == table {
            retarget(&mut c.name, from, to);
        }
    });
    ddl.pks.update_all(|pk| {
        if pk.table == table && rename_in(&mut pk.columns, from, to) && !pk.name_explicit {
            pk.name = pk.derived_name();
        }
    });
    ddl.uniques.update_all(|u| {
        if u.table == table && rename_in(&mut u.columns, from, to) && !u.name_explicit {
            u.name = u.derived_name();
        }
    });
    ddl.fks.update_all(|fk| {
        let mut touched = false;
        if fk.table == table {
            touched |= rename_in(&mut fk.columns, from, to);
        }
        if fk.table_to == table {
            touched |= rename_in(&mut fk.columns_to, from, to);
        }
        if touched && !fk.name_explicit {
            fk.name = fk.derived_name();
        }
    });
    ddl.indexes.update_all(|i| {
        if i.table == table {
            for column in i.columns.iter_mut().filter(|c| !c.is_expression) {
                retarget(&mut column.value, from, to);
            }
        }
    });
    ddl.checks.update_all(|c| {
        if c.table == table {
            c.value = rename_identifier(&c.value, from, to);
        }
    });
}
