//! SQLite snapshot serialization
//!
//! A snapshot is the flat `entityType`-tagged entity array plus the rename
//! ledger that produced it. Loading goes back through [`SQLiteDDL`] so
//! duplicate and conflicting entities are detected again.

use super::Sqlite;
use super::collection::SQLiteDDL;
use super::ddl::SqliteEntity;
use crate::traits::Dialect;
use serde::{Deserialize, Serialize};

/// Serialized SQLite schema snapshot
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SQLiteSnapshot {
    /// Snapshot format version
    pub version: String,
    /// Dialect identifier
    pub dialect: String,
    /// DDL entities (tables, columns, indexes, etc.)
    pub ddl: Vec<SqliteEntity>,
    /// Renames applied when this snapshot was produced
    #[serde(default)]
    pub renames: Vec<String>,
}

impl Default for SQLiteSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl SQLiteSnapshot {
    /// Create a new empty SQLite snapshot
    pub fn new() -> Self {
        Self {
            version: Sqlite::SNAPSHOT_VERSION.to_string(),
            dialect: Sqlite::NAME.to_string(),
            ddl: Vec::new(),
            renames: Vec::new(),
        }
    }

    /// Capture a model, with the rename ledger of the diff that produced it
    pub fn from_ddl(ddl: &SQLiteDDL, renames: Vec<String>) -> Self {
        Self {
            ddl: ddl.to_entities(),
            renames,
            ..Self::new()
        }
    }

    /// Rebuild the model; queued errors are available on the result
    pub fn to_ddl(&self) -> SQLiteDDL {
        SQLiteDDL::from_entities(self.ddl.iter().cloned())
    }

    /// Load snapshot from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize snapshot to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
