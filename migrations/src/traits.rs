//! Core traits for the migration infrastructure
//!
//! - `EntityKind` - enum replacing string entity_type discrimination
//! - `EntityKey` - identity of an entity inside one snapshot
//! - `Entity` - trait for DDL entities with const KIND
//! - `Dialect` - per-dialect constants written into snapshots

use std::fmt;
use std::hash::Hash;

// =============================================================================
// Entity System
// =============================================================================

/// Entity kind discriminator enum.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum EntityKind {
    #[serde(rename = "tables")]
    Table,
    #[serde(rename = "columns")]
    Column,
    #[serde(rename = "indexes")]
    Index,
    #[serde(rename = "fks")]
    ForeignKey,
    #[serde(rename = "pks")]
    PrimaryKey,
    #[serde(rename = "uniques")]
    UniqueConstraint,
    #[serde(rename = "checks")]
    CheckConstraint,
    #[serde(rename = "views")]
    View,
}

impl EntityKind {
    /// Get the string representation for JSON serialization compatibility
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Table => "tables",
            Self::Column => "columns",
            Self::Index => "indexes",
            Self::ForeignKey => "fks",
            Self::PrimaryKey => "pks",
            Self::UniqueConstraint => "uniques",
            Self::CheckConstraint => "checks",
            Self::View => "views",
        }
    }

    /// Singular, human-facing label
    pub const fn label(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Column => "column",
            Self::Index => "index",
            Self::ForeignKey => "foreign key",
            Self::PrimaryKey => "primary key",
            Self::UniqueConstraint => "unique constraint",
            Self::CheckConstraint => "check constraint",
            Self::View => "view",
        }
    }

    /// Whether entities of this kind live inside a table
    pub const fn is_table_scoped(self) -> bool {
        !matches!(self, Self::Table | Self::View)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Entity key types for unique identification
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKey {
    /// Simple name (tables, views)
    Simple(String),
    /// Table-scoped name (columns, keys, indexes, checks)
    Composite2(String, String),
}

impl EntityKey {
    pub fn simple(name: impl Into<String>) -> Self {
        Self::Simple(name.into())
    }

    pub fn composite2(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self::Composite2(a.into(), b.into())
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple(name) => write!(f, "{name}"),
            Self::Composite2(table, name) => write!(f, "{table}.{name}"),
        }
    }
}

/// Trait for DDL entities.
///
/// All DDL entity types (Table, Column, Index, etc.) implement this trait.
/// The `KIND` constant enables compile-time entity type discrimination.
pub trait Entity: Clone + PartialEq {
    /// The entity kind (discriminator)
    const KIND: EntityKind;

    /// Entity name
    fn entity_name(&self) -> &str;

    /// Owning table, for table-scoped entities
    fn parent_table(&self) -> Option<&str> {
        None
    }

    /// Get the unique key for this entity
    fn key(&self) -> EntityKey {
        match self.parent_table() {
            Some(table) => EntityKey::composite2(table, self.entity_name()),
            None => EntityKey::simple(self.entity_name()),
        }
    }

    /// Whether the name was given by the schema author rather than derived
    fn name_explicit(&self) -> bool {
        true
    }
}

// =============================================================================
// Dialect Trait
// =============================================================================

/// Trait representing a database dialect.
pub trait Dialect: Sized + 'static {
    /// Display name of the dialect
    const NAME: &'static str;

    /// Version written into serialized snapshots
    const SNAPSHOT_VERSION: &'static str;
}
