//! # sqlshift
//!
//! Structural schema diffing for SQLite: give it the schema you have and the
//! schema you want, get back the ordered statements that get you there.
//!
//! ## Quick Start
//!
//! ```rust
//! use sqlshift::prelude::*;
//!
//! let mut from = SQLiteDDL::new();
//! from.push(Table::new("users"));
//! from.push(Column::new("users", "id", "integer").not_null());
//! from.push(PrimaryKey::new("users", ["id"]));
//!
//! let mut to = from.clone();
//! to.push(CheckConstraint::new("users", "id_positive", "id > 0"));
//!
//! let diff = compute_migration(&from, &to)?;
//! assert_eq!(diff.sql_statements.len(), 6);
//! assert_eq!(diff.sql_statements[0], "PRAGMA foreign_keys=OFF;");
//! # Ok::<(), sqlshift::migrations::DiffError>(())
//! ```
//!
//! ## Crates
//!
//! | Crate                  | Contents                                         |
//! |------------------------|--------------------------------------------------|
//! | `sqlshift-types`       | DDL entities, naming helpers, type affinity      |
//! | `sqlshift-migrations`  | snapshot store, resolvers, differ, SQL synthesis |
//!
//! ## Features
//!
//! - `tracing` (default) - structured diagnostics via `tracing`
//! - `prompt` - terminal rename prompts via `inquire`

pub use sqlshift_migrations as migrations;
pub use sqlshift_types as types;

/// Prelude with the types most callers need
pub mod prelude {
    pub use sqlshift_migrations::resolver::{InteractiveResolver, NoRenames, RenameList};
    pub use sqlshift_migrations::sqlite::{
        Hint, HintKind, JsonStatement, MigrationDiff, SQLiteDDL, SQLiteSnapshot,
        compute_migration, ddl_diff,
        grammar::{Literal, LiteralDefault},
    };
    pub use sqlshift_migrations::{
        DdlError, DiffError, DiffOptions, LiteralError, MigrationMode, RenameResolver,
    };
    pub use sqlshift_types::prelude::*;
}
