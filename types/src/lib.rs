//! Schema entity types for sqlshift
//!
//! This crate holds the plain data that describes one schema snapshot:
//!
//! - SQLite DDL entities in [`sqlite::ddl`] (tables, columns, keys, indexes, checks, views)
//! - Naming helpers that derive constraint names the same way on every run
//! - SQLite column type affinity in [`sqlite::Affinity`]
//!
//! Diffing and statement generation live in `sqlshift-migrations`.
//!
//! # Features
//!
//! - `serde` - Enable serde serialization/deserialization of every entity

pub mod sqlite;

/// Prelude module for commonly used types
pub mod prelude {
    pub use crate::sqlite::Affinity;
    pub use crate::sqlite::ddl::{
        CheckConstraint, Column, ForeignKey, Generated, GeneratedType, Index, IndexColumn,
        IndexDirection, IndexOrigin, PrimaryKey, ReferentialAction, SqliteEntity, Table,
        UniqueConstraint, View,
    };
}
