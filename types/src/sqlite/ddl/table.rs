//! SQLite Table DDL type

/// Table entity.
///
/// # Examples
///
/// ```
/// use sqlshift_types::sqlite::ddl::Table;
///
/// let table = Table::new("users").strict();
/// assert_eq!(table.name(), "users");
/// assert!(table.strict);
/// assert!(!table.without_rowid);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Table {
    /// Table name
    pub name: String,

    /// Is this a STRICT table?
    #[cfg_attr(feature = "serde", serde(default))]
    pub strict: bool,

    /// Is this a WITHOUT ROWID table?
    #[cfg_attr(feature = "serde", serde(default))]
    pub without_rowid: bool,
}

impl Table {
    /// Create a new table
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            strict: false,
            without_rowid: false,
        }
    }

    /// Set STRICT mode
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Set WITHOUT ROWID mode
    #[must_use]
    pub fn without_rowid(mut self) -> Self {
        self.without_rowid = true;
        self
    }

    /// Get the table name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Table options that follow the closing parenthesis of `CREATE TABLE`
    #[must_use]
    pub fn options_suffix(&self) -> &'static str {
        match (self.without_rowid, self.strict) {
            (true, true) => " WITHOUT ROWID, STRICT",
            (true, false) => " WITHOUT ROWID",
            (false, true) => " STRICT",
            (false, false) => "",
        }
    }
}
