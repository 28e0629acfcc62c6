//! SQLite Check Constraint DDL type

/// Check constraint entity
///
/// # Examples
///
/// ```
/// use sqlshift_types::sqlite::ddl::CheckConstraint;
///
/// let check = CheckConstraint::new("users", "age_check", "\"age\" > 0");
/// assert_eq!(check.name(), "age_check");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CheckConstraint {
    /// Parent table name
    pub table: String,

    /// Constraint name
    pub name: String,

    /// Check expression
    pub value: String,
}

impl CheckConstraint {
    /// Create a new check constraint
    #[must_use]
    pub fn new(
        table: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            name: name.into(),
            value: value.into(),
        }
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
}
