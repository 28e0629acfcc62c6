//! Error types
//!
//! Two families live here. [`DiffError`] aborts a diff call: it is only
//! returned for programmer errors and for changes no SQLite statement can
//! express. [`DdlError`] is data: model problems are queued on the snapshot
//! and handed back next to the statements that could still be produced.

use crate::traits::{EntityKey, EntityKind};
use serde::Serialize;

/// Hard failure of a diff call
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    #[error("Inconsistent {side} snapshot: {kind} `{name}` references missing {missing}")]
    InconsistentSnapshot {
        side: &'static str,
        kind: EntityKind,
        name: String,
        missing: String,
    },
    #[error("Malformed rename resolution for {kind}: {detail}")]
    MalformedResolution { kind: EntityKind, detail: String },
    #[error("Unsupported transition for `{table}`.`{column}`: {reason}")]
    UnsupportedTransition {
        table: String,
        column: String,
        reason: &'static str,
    },
}

/// Queued model-construction error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DdlError {
    #[error("Duplicate check constraint `{name}` on table `{table}`")]
    ConflictCheck { table: String, name: String },
    #[error("Duplicate {entity} `{key}`")]
    DuplicateEntity {
        entity: EntityKind,
        #[serde(serialize_with = "serialize_key")]
        key: EntityKey,
    },
    #[error("Column `{table}`.`{column}` is autoincrement but part of a composite primary key")]
    AutoincrementInCompositeKey { table: String, column: String },
    #[error("Foreign key `{name}` on `{table}` maps {columns} column(s) onto {columns_to}")]
    ForeignKeyArity {
        table: String,
        name: String,
        columns: usize,
        columns_to: usize,
    },
    #[error("View `{name}` could not be resolved: {error}")]
    UnresolvedView { name: String, error: String },
}

impl DdlError {
    /// Stable snake_case discriminator
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ConflictCheck { .. } => "conflict_check",
            Self::DuplicateEntity { .. } => "duplicate_entity",
            Self::AutoincrementInCompositeKey { .. } => "autoincrement_in_composite_key",
            Self::ForeignKeyArity { .. } => "foreign_key_arity",
            Self::UnresolvedView { .. } => "unresolved_view",
        }
    }
}

fn serialize_key<S: serde::Serializer>(key: &EntityKey, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(key)
}

/// A default value with no SQLite literal form
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LiteralError {
    #[error("Real default `{0}` is not finite")]
    NonFiniteReal(f64),
}

/// Result of a failed single-entity lookup
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("No {kind} matched")]
    NotFound { kind: EntityKind },
    #[error("{count} {kind} matched where one was expected")]
    Ambiguous { kind: EntityKind, count: usize },
}
