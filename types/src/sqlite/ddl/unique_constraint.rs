//! SQLite Unique Constraint DDL type

use super::name_for_unique;

/// Unique constraint entity, embedded in the `CREATE TABLE` body.
///
/// Standalone `CREATE UNIQUE INDEX` statements are modeled as an
/// [`Index`](super::Index) with `is_unique` set instead.
///
/// # Examples
///
/// ```
/// use sqlshift_types::sqlite::ddl::UniqueConstraint;
///
/// let uq = UniqueConstraint::new("users", ["email"]);
/// assert_eq!(uq.name(), "users_email_unique");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct UniqueConstraint {
    /// Parent table name
    pub table: String,

    /// Constraint name
    pub name: String,

    /// Columns in the constraint
    pub columns: Vec<String>,

    /// Whether the constraint name was explicitly specified
    #[cfg_attr(feature = "serde", serde(default))]
    pub name_explicit: bool,
}

impl UniqueConstraint {
    /// Create a unique constraint with the derived name
    #[must_use]
    pub fn new<I, S>(table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let table = table.into();
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        Self {
            name: name_for_unique(&table, &columns),
            table,
            columns,
            name_explicit: false,
        }
    }

    /// Give the constraint an explicit name
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self.name_explicit = true;
        self
    }

    /// Get the constraint name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the table name
    #[inline]
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// The name this constraint would get if it were not explicitly named
    #[must_use]
    pub fn derived_name(&self) -> String {
        name_for_unique(&self.table, &self.columns)
    }
}
