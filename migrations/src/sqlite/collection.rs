//! SQLite DDL collection - entity storage and management
//!
//! A [`SQLiteDDL`] is one schema snapshot: a typed store per entity kind with
//! O(1) lookup by [`EntityKey`]. Pushing an entity that breaks a uniqueness
//! rule does not fail; the problem is queued in [`SQLiteDDL::errors`] and the
//! rest of the snapshot stays usable.

use super::ddl::{
    CheckConstraint, Column, ForeignKey, Index, PrimaryKey, SqliteEntity, Table, UniqueConstraint,
    View,
};
use crate::error::{DdlError, DiffError, LookupError};
use crate::traits::{Entity, EntityKey, EntityKind};
use std::collections::HashMap;

// =============================================================================
// Entity Collection - Typed Operations
// =============================================================================

/// DDL entity collection with typed operations
#[derive(Debug, Clone)]
pub struct EntityCollection<T> {
    entities: Vec<T>,
    index: HashMap<EntityKey, usize>,
}

impl<T> Default for EntityCollection<T> {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: Entity> EntityCollection<T> {
    /// Create empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an entity, returns true if inserted, false if its key is taken
    pub fn push(&mut self, entity: T) -> bool {
        let key = entity.key();
        if self.index.contains_key(&key) {
            return false;
        }
        self.index.insert(key, self.entities.len());
        self.entities.push(entity);
        true
    }

    /// All entities, in insertion order
    pub fn list(&self) -> &[T] {
        &self.entities
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entities.iter()
    }

    /// Lookup by key
    pub fn get(&self, key: &EntityKey) -> Option<&T> {
        self.index.get(key).map(|&i| &self.entities[i])
    }

    pub fn contains(&self, key: &EntityKey) -> bool {
        self.index.contains_key(key)
    }

    /// The single entity matching `predicate`
    pub fn one(&self, predicate: impl Fn(&T) -> bool) -> Result<&T, LookupError> {
        let mut matches = self.entities.iter().filter(|e| predicate(e));
        let first = matches.next().ok_or(LookupError::NotFound { kind: T::KIND })?;
        let rest = matches.count();
        if rest > 0 {
            return Err(LookupError::Ambiguous {
                kind: T::KIND,
                count: rest + 1,
            });
        }
        Ok(first)
    }

    /// Entities owned by `table`
    pub fn for_table<'a, 't>(
        &'a self,
        table: &'t str,
    ) -> impl Iterator<Item = &'a T> + use<'a, 't, T> {
        self.entities
            .iter()
            .filter(move |e| e.parent_table() == Some(table))
    }

    /// Remove by key
    pub fn delete(&mut self, key: &EntityKey) -> Option<T> {
        let position = self.index.remove(key)?;
        let removed = self.entities.remove(position);
        self.reindex();
        Some(removed)
    }

    /// Keep only entities matching `keep`
    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        self.entities.retain(keep);
        self.reindex();
    }

    /// Apply `transform` to every entity, keys may change
    pub fn update_all(&mut self, transform: impl FnMut(&mut T)) {
        self.entities.iter_mut().for_each(transform);
        self.reindex();
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Get count
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    fn reindex(&mut self) {
        self.index = self
            .entities
            .iter()
            .enumerate()
            .map(|(i, e)| (e.key(), i))
            .collect();
    }
}

impl<T: Entity> PartialEq for EntityCollection<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entities
                .iter()
                .all(|e| other.get(&e.key()) == Some(e))
    }
}

// =============================================================================
// SQLite DDL
// =============================================================================

/// One SQLite schema snapshot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SQLiteDDL {
    pub tables: EntityCollection<Table>,
    pub columns: EntityCollection<Column>,
    pub indexes: EntityCollection<Index>,
    pub fks: EntityCollection<ForeignKey>,
    pub pks: EntityCollection<PrimaryKey>,
    pub uniques: EntityCollection<UniqueConstraint>,
    pub checks: EntityCollection<CheckConstraint>,
    pub views: EntityCollection<View>,
    errors: Vec<DdlError>,
}

impl SQLiteDDL {
    /// Create empty DDL
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a flat entity list
    pub fn from_entities(entities: impl IntoIterator<Item = SqliteEntity>) -> Self {
        let mut ddl = Self::new();
        for entity in entities {
            ddl.push(entity);
        }
        ddl
    }

    /// Add an entity, queueing an error instead of inserting when it
    /// collides with one already present
    pub fn push(&mut self, entity: impl Into<SqliteEntity>) -> bool {
        match entity.into() {
            SqliteEntity::Table(e) => insert(&mut self.tables, &mut self.errors, e),
            SqliteEntity::Column(e) => insert(&mut self.columns, &mut self.errors, e),
            SqliteEntity::Index(e) => insert(&mut self.indexes, &mut self.errors, e),
            SqliteEntity::ForeignKey(e) => insert(&mut self.fks, &mut self.errors, e),
            SqliteEntity::UniqueConstraint(e) => insert(&mut self.uniques, &mut self.errors, e),
            SqliteEntity::View(e) => insert(&mut self.views, &mut self.errors, e),
            SqliteEntity::PrimaryKey(e) => {
                if self.pks.for_table(&e.table).next().is_some() {
                    let error = DdlError::DuplicateEntity {
                        entity: EntityKind::PrimaryKey,
                        key: EntityKey::simple(e.table.clone()),
                    };
                    sqlshift_trace_conflict!(error);
                    self.errors.push(error);
                    return false;
                }
                insert(&mut self.pks, &mut self.errors, e)
            }
            SqliteEntity::CheckConstraint(e) => self.push_check(e),
        }
    }

    /// Two checks sharing a name on one table are both withheld and
    /// reported once as `conflict_check`.
    fn push_check(&mut self, check: CheckConstraint) -> bool {
        let already_conflicted = self.errors.iter().any(|e| {
            matches!(e, DdlError::ConflictCheck { table, name }
                if *table == check.table && *name == check.name)
        });
        if already_conflicted {
            return false;
        }

        let key = check.key();
        if self.checks.delete(&key).is_some() {
            let error = DdlError::ConflictCheck {
                table: check.table,
                name: check.name,
            };
            sqlshift_trace_conflict!(error);
            self.errors.push(error);
            return false;
        }
        self.checks.push(check)
    }

    /// Errors queued while building this snapshot
    pub fn errors(&self) -> &[DdlError] {
        &self.errors
    }

    /// Flatten into entities: tables, columns, indexes, fks, pks, uniques, checks, views
    pub fn to_entities(&self) -> Vec<SqliteEntity> {
        let mut entities = Vec::new();
        entities.extend(self.tables.iter().cloned().map(SqliteEntity::Table));
        entities.extend(self.columns.iter().cloned().map(SqliteEntity::Column));
        entities.extend(self.indexes.iter().cloned().map(SqliteEntity::Index));
        entities.extend(self.fks.iter().cloned().map(SqliteEntity::ForeignKey));
        entities.extend(self.pks.iter().cloned().map(SqliteEntity::PrimaryKey));
        entities.extend(
            self.uniques
                .iter()
                .cloned()
                .map(SqliteEntity::UniqueConstraint),
        );
        entities.extend(self.checks.iter().cloned().map(SqliteEntity::CheckConstraint));
        entities.extend(self.views.iter().cloned().map(SqliteEntity::View));
        entities
    }

    /// Check if the DDL has no entities
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
            && self.columns.is_empty()
            && self.indexes.is_empty()
            && self.fks.is_empty()
            && self.pks.is_empty()
            && self.uniques.is_empty()
            && self.checks.is_empty()
            && self.views.is_empty()
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(&EntityKey::simple(name))
    }

    pub fn column(&self, table: &str, name: &str) -> Option<&Column> {
        self.columns.get(&EntityKey::composite2(table, name))
    }

    pub fn pk(&self, table: &str) -> Option<&PrimaryKey> {
        self.pks.for_table(table).next()
    }

    /// Get all entities for a specific table
    pub fn table_entities<'a>(&'a self, table_name: &'a str) -> TableEntities<'a> {
        TableEntities {
            table: self.table(table_name),
            columns: self.columns.for_table(table_name).collect(),
            pk: self.pk(table_name),
            fks: self.fks.for_table(table_name).collect(),
            uniques: self.uniques.for_table(table_name).collect(),
            checks: self.checks.for_table(table_name).collect(),
            indexes: self.indexes.for_table(table_name).collect(),
        }
    }

    /// Model rules that cannot be checked one push at a time
    pub fn validate(&self) -> Vec<DdlError> {
        let mut errors = Vec::new();

        for pk in self.pks.iter().filter(|pk| pk.is_composite()) {
            for column in &pk.columns {
                if self.column(&pk.table, column).is_some_and(|c| c.autoincrement) {
                    errors.push(DdlError::AutoincrementInCompositeKey {
                        table: pk.table.clone(),
                        column: column.clone(),
                    });
                }
            }
        }

        for fk in self.fks.iter() {
            if fk.columns.len() != fk.columns_to.len() {
                errors.push(DdlError::ForeignKeyArity {
                    table: fk.table.clone(),
                    name: fk.name.clone(),
                    columns: fk.columns.len(),
                    columns_to: fk.columns_to.len(),
                });
            }
        }

        for view in self.views.iter().filter(|v| !v.is_existing) {
            if let Some(error) = &view.error {
                errors.push(DdlError::UnresolvedView {
                    name: view.name.clone(),
                    error: error.clone(),
                });
            }
        }

        errors
    }

    /// Every table and column an entity names must exist in this snapshot
    pub fn check_references(&self, side: &'static str) -> Result<(), DiffError> {
        let missing = |kind: EntityKind, name: &str, what: String| DiffError::InconsistentSnapshot {
            side,
            kind,
            name: name.to_string(),
            missing: what,
        };
        let has_table = |table: &str| self.table(table).is_some();
        let has_column = |table: &str, column: &str| self.column(table, column).is_some();

        fn check_columns<'a>(
            columns: impl IntoIterator<Item = &'a String>,
            table: &str,
            has_column: &dyn Fn(&str, &str) -> bool,
        ) -> Option<String> {
            columns
                .into_iter()
                .find(|c| !has_column(table, c))
                .map(|c| format!("column `{table}`.`{c}`"))
        }

        for column in self.columns.iter() {
            if !has_table(&column.table) {
                return Err(missing(
                    EntityKind::Column,
                    &column.name,
                    format!("table `{}`", column.table),
                ));
            }
        }

        for pk in self.pks.iter() {
            if let Some(what) = check_columns(&pk.columns, &pk.table, &has_column) {
                return Err(missing(EntityKind::PrimaryKey, &pk.name, what));
            }
        }

        for unique in self.uniques.iter() {
            if let Some(what) = check_columns(&unique.columns, &unique.table, &has_column) {
                return Err(missing(EntityKind::UniqueConstraint, &unique.name, what));
            }
        }

        for fk in self.fks.iter() {
            if !has_table(&fk.table_to) {
                return Err(missing(
                    EntityKind::ForeignKey,
                    &fk.name,
                    format!("table `{}`", fk.table_to),
                ));
            }
            let what = check_columns(&fk.columns, &fk.table, &has_column)
                .or_else(|| check_columns(&fk.columns_to, &fk.table_to, &has_column));
            if let Some(what) = what {
                return Err(missing(EntityKind::ForeignKey, &fk.name, what));
            }
        }

        for index in self.indexes.iter() {
            let what = index
                .columns
                .iter()
                .filter_map(|c| c.column())
                .find(|c| !has_column(&index.table, c))
                .map(|c| format!("column `{}`.`{c}`", index.table));
            if let Some(what) = what {
                return Err(missing(EntityKind::Index, &index.name, what));
            }
        }

        for check in self.checks.iter() {
            if !has_table(&check.table) {
                return Err(missing(
                    EntityKind::CheckConstraint,
                    &check.name,
                    format!("table `{}`", check.table),
                ));
            }
        }

        Ok(())
    }
}

fn insert<T>(collection: &mut EntityCollection<T>, errors: &mut Vec<DdlError>, entity: T) -> bool
where
    T: Entity,
{
    let key = entity.key();
    if collection.push(entity) {
        return true;
    }
    let error = DdlError::DuplicateEntity {
        entity: T::KIND,
        key,
    };
    sqlshift_trace_conflict!(error);
    errors.push(error);
    false
}

/// Entities belonging to a specific table
#[derive(Debug, Clone)]
pub struct TableEntities<'a> {
    pub table: Option<&'a Table>,
    pub columns: Vec<&'a Column>,
    pub pk: Option<&'a PrimaryKey>,
    pub fks: Vec<&'a ForeignKey>,
    pub uniques: Vec<&'a UniqueConstraint>,
    pub checks: Vec<&'a CheckConstraint>,
    pub indexes: Vec<&'a Index>,
}
