//! SQLite DDL (Data Definition Language) entity types
//!
//! One value per schema object. A snapshot is a flat list of these entities,
//! each keyed by `(entity type, table, name)`:
//!
//! ```text
//! Table ─┬─ Column*
//!        ├─ PrimaryKey?
//!        ├─ UniqueConstraint*
//!        ├─ Index*
//!        ├─ ForeignKey*  ──► Table
//!        └─ CheckConstraint*
//! View (free standing)
//! ```
//!
//! Constraint names that were not given explicitly are derived with the
//! `name_for_*` helpers, so the same columns always yield the same name.
//!
//! # Examples
//!
//! ```
//! use sqlshift_types::sqlite::ddl::{Column, ForeignKey, PrimaryKey, Table};
//!
//! let table = Table::new("posts").strict();
//! let id = Column::new("posts", "id", "integer").not_null();
//! let pk = PrimaryKey::new("posts", ["id"]);
//! let fk = ForeignKey::new("posts", ["author_id"], "users", ["id"]);
//!
//! assert_eq!(table.name(), "posts");
//! assert!(id.not_null);
//! assert_eq!(pk.name(), "posts_pk");
//! assert_eq!(fk.name(), "fk_posts_author_id_users_id_fk");
//! ```

mod check_constraint;
mod column;
mod foreign_key;
mod index;
mod primary_key;
mod table;
mod unique_constraint;
mod view;

pub use check_constraint::CheckConstraint;
pub use column::{Column, Generated, GeneratedType};
pub use foreign_key::{ForeignKey, ReferentialAction};
pub use index::{Index, IndexColumn, IndexDirection, IndexOrigin};
pub use primary_key::PrimaryKey;
pub use table::Table;
pub use unique_constraint::UniqueConstraint;
pub use view::View;

// =============================================================================
// Unified Entity Type
// =============================================================================

/// Any SQLite DDL entity, tagged by its entity type.
///
/// The serialized form carries an `entityType` field whose value names the
/// collection the entity belongs to (`tables`, `columns`, ...).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "entityType"))]
pub enum SqliteEntity {
    #[cfg_attr(feature = "serde", serde(rename = "tables"))]
    Table(Table),
    #[cfg_attr(feature = "serde", serde(rename = "columns"))]
    Column(Column),
    #[cfg_attr(feature = "serde", serde(rename = "indexes"))]
    Index(Index),
    #[cfg_attr(feature = "serde", serde(rename = "fks"))]
    ForeignKey(ForeignKey),
    #[cfg_attr(feature = "serde", serde(rename = "pks"))]
    PrimaryKey(PrimaryKey),
    #[cfg_attr(feature = "serde", serde(rename = "uniques"))]
    UniqueConstraint(UniqueConstraint),
    #[cfg_attr(feature = "serde", serde(rename = "checks"))]
    CheckConstraint(CheckConstraint),
    #[cfg_attr(feature = "serde", serde(rename = "views"))]
    View(View),
}

impl SqliteEntity {
    /// Owning table, `None` for tables and views
    #[must_use]
    pub fn table(&self) -> Option<&str> {
        match self {
            Self::Table(_) | Self::View(_) => None,
            Self::Column(e) => Some(&e.table),
            Self::Index(e) => Some(&e.table),
            Self::ForeignKey(e) => Some(&e.table),
            Self::PrimaryKey(e) => Some(&e.table),
            Self::UniqueConstraint(e) => Some(&e.table),
            Self::CheckConstraint(e) => Some(&e.table),
        }
    }

    /// Entity name
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Table(e) => &e.name,
            Self::View(e) => &e.name,
            Self::Column(e) => &e.name,
            Self::Index(e) => &e.name,
            Self::ForeignKey(e) => &e.name,
            Self::PrimaryKey(e) => &e.name,
            Self::UniqueConstraint(e) => &e.name,
            Self::CheckConstraint(e) => &e.name,
        }
    }
}

macro_rules! impl_from_entity {
    ($($ty:ident),* $(,)?) => {
        $(
            impl From<$ty> for SqliteEntity {
                fn from(entity: $ty) -> Self {
                    Self::$ty(entity)
                }
            }
        )*
    };
}

impl_from_entity!(
    Table,
    Column,
    Index,
    ForeignKey,
    PrimaryKey,
    UniqueConstraint,
    CheckConstraint,
    View,
);

// =============================================================================
// Naming Helpers
// =============================================================================

/// Generate a default name for a foreign key constraint
#[must_use]
pub fn name_for_fk<S: AsRef<str>>(
    table: &str,
    columns: &[S],
    table_to: &str,
    columns_to: &[S],
) -> String {
    format!(
        "fk_{}_{}_{}_{}_fk",
        table,
        join(columns),
        table_to,
        join(columns_to)
    )
}

/// Generate a default name for a unique constraint
#[must_use]
pub fn name_for_unique<S: AsRef<str>>(table: &str, columns: &[S]) -> String {
    format!("{}_{}_unique", table, join(columns))
}

/// Generate a default name for a primary key constraint
#[must_use]
pub fn name_for_pk(table: &str) -> String {
    format!("{}_pk", table)
}

fn join<S: AsRef<str>>(parts: &[S]) -> String {
    parts
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("_")
}
