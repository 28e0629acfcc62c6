//! SQLite schema types
//!
//! - [`ddl`] - DDL entities making up a snapshot
//! - [`Affinity`] - column type affinity as SQLite derives it from a declared type

mod affinity;
pub mod ddl;

pub use affinity::Affinity;
