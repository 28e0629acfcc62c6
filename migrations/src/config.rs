//! Diff options
//!
//! Options can be built in code or read from a TOML document:
//!
//! ```toml
//! mode = "push"
//! breakpoints = false
//! renames = ["users->accounts", "accounts.name->accounts.full_name"]
//! ```

use serde::{Deserialize, Serialize};

/// How the produced statements are going to be applied
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MigrationMode {
    /// Written to a migration file for later application
    #[default]
    Generate,
    /// Applied directly to a live database; enables hints
    Push,
}

/// Options for one diff call
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct DiffOptions {
    /// Generate or push
    pub mode: MigrationMode,
    /// Join SQL with statement breakpoints when rendering a migration file
    pub breakpoints: bool,
    /// Rename list entries for [`RenameList`](crate::resolver::RenameList)
    pub renames: Vec<String>,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            mode: MigrationMode::Generate,
            breakpoints: true,
            renames: Vec::new(),
        }
    }
}

impl DiffOptions {
    /// Options for push-style application
    pub fn push() -> Self {
        Self {
            mode: MigrationMode::Push,
            ..Self::default()
        }
    }

    /// Set whether breakpoints are emitted
    pub fn with_breakpoints(mut self, breakpoints: bool) -> Self {
        self.breakpoints = breakpoints;
        self
    }

    /// Whether the safety analyzer runs
    pub fn is_push(&self) -> bool {
        self.mode == MigrationMode::Push
    }

    /// Parse options from TOML text
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Parse error: {0}")]
    ParseError(#[from] toml::de::Error),
}
