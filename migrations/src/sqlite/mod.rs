//! SQLite dialect: snapshot store, differ, recreation policy and SQL synthesis

pub mod collection;
pub mod ddl;
pub mod diff;
pub mod grammar;
pub mod hints;
pub mod snapshot;
pub mod statements;

pub use collection::{EntityCollection, SQLiteDDL, TableEntities};
pub use diff::{MigrationDiff, compute_migration, ddl_diff};
pub use hints::{Hint, HintKind};
pub use snapshot::SQLiteSnapshot;
pub use statements::{BREAKPOINT, GroupedStatement, JsonStatement, RecreateReason, TableFull};

use crate::traits::Dialect;

/// SQLite dialect marker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sqlite;

impl Dialect for Sqlite {
    const NAME: &'static str = "sqlite";
    const SNAPSHOT_VERSION: &'static str = "7";
}

