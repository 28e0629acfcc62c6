//! SQLite Primary Key DDL type

use super::name_for_pk;

/// Primary key constraint entity.
///
/// A key built with [`PrimaryKey::new`] is named `<table>_pk`; use
/// [`PrimaryKey::named`] to give it an explicit name.
///
/// # Examples
///
/// ```
/// use sqlshift_types::sqlite::ddl::PrimaryKey;
///
/// let pk = PrimaryKey::new("T", ["a", "b"]);
/// assert_eq!(pk.name(), "T_pk");
/// assert!(!pk.name_explicit);
///
/// let named = PrimaryKey::new("T", ["a"]).named("t_key");
/// assert_eq!(named.name(), "t_key");
/// assert!(named.name_explicit);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PrimaryKey {
    /// Parent table name
    pub table: String,

    /// Constraint name
    pub name: String,

    /// Columns in the primary key, in key order
    pub columns: Vec<String>,

    /// Whether the constraint name was explicitly specified
    #[cfg_attr(feature = "serde", serde(default))]
    pub name_explicit: bool,
}

impl PrimaryKey {
    /// Create a primary key with the derived name
    #[must_use]
    pub fn new<I, S>(table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let table = table.into();
        Self {
            name: name_for_pk(&table),
            table,
            columns: columns.into_iter().map(Into::into).collect(),
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

    /// Whether the key spans more than one column
    #[inline]
    #[must_use]
    pub fn is_composite(&self) -> bool {
        self.columns.len() > 1
    }

    /// The name this key would get if it were not explicitly named
    #[must_use]
    pub fn derived_name(&self) -> String {
        name_for_pk(&self.table)
    }
}
