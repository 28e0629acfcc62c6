//! sqlshift migrations - structural schema diffing for SQLite
//!
//! This crate turns two schema snapshots into the ordered statement stream
//! that migrates a database from the first shape to the second:
//!
//! - [`sqlite::SQLiteDDL`] - typed snapshot store with uniqueness checks
//! - [`resolver`] - rename disambiguation (scripted list or interactive)
//! - [`sqlite::diff`] - matching, classification and the recreate-vs-alter policy
//! - [`sqlite::statements`] - SQL synthesis from structured statement records
//! - [`sqlite::hints`] - data-loss hints for push-style application
//!
//! # Example
//!
//! ```
//! use sqlshift_migrations::sqlite::{SQLiteDDL, ddl::{Column, Table}, diff::ddl_diff};
//! use sqlshift_migrations::resolver::RenameList;
//! use sqlshift_migrations::DiffOptions;
//!
//! let mut from = SQLiteDDL::new();
//! from.push(Table::new("users"));
//! from.push(Column::new("users", "name", "text"));
//!
//! let mut to = SQLiteDDL::new();
//! to.push(Table::new("users"));
//! to.push(Column::new("users", "full_name", "text"));
//!
//! let mut renames = RenameList::parse(["users.name->users.full_name"]).unwrap();
//! let diff = ddl_diff(&from, &to, &mut renames, &DiffOptions::default()).unwrap();
//!
//! assert_eq!(
//!     diff.sql_statements,
//!     vec!["ALTER TABLE `users` RENAME COLUMN `name` TO `full_name`;"]
//! );
//! ```
//!
//! # Features
//!
//! - `tracing` - structured diagnostics through the `tracing` crate (default)
//! - `prompt` - terminal rename prompts via `inquire`

#[macro_use]
mod trace;

pub mod config;
pub mod error;
pub mod resolver;
pub mod sqlite;
pub mod traits;

pub use config::{ConfigError, DiffOptions, MigrationMode};
pub use error::{DdlError, DiffError, LiteralError, LookupError};
pub use resolver::{NoRenames, RenameList, RenameResolver};
pub use traits::{Dialect, Entity, EntityKey, EntityKind};
