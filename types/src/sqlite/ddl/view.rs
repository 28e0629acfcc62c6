//! SQLite View DDL type

/// View entity.
///
/// `error` is filled in by whoever built the snapshot when the view's source
/// could not be resolved; such views are reported, not synthesized.
///
/// # Examples
///
/// ```
/// use sqlshift_types::sqlite::ddl::View;
///
/// let view = View::new("active_users")
///     .definition("SELECT * FROM users WHERE active = 1")
///     .columns(["id", "name"]);
/// assert_eq!(view.name(), "active_users");
/// assert_eq!(view.columns, vec!["id", "name"]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct View {
    /// View name
    pub name: String,

    /// View definition (the query after `AS`)
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub definition: Option<String>,

    /// Output column names
    #[cfg_attr(feature = "serde", serde(default))]
    pub columns: Vec<String>,

    /// Whether this is an existing view not managed by migrations
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_existing: bool,

    /// Error message if the view failed to resolve
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub error: Option<String>,
}

impl View {
    /// Create a new view
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            definition: None,
            columns: Vec::new(),
            is_existing: false,
            error: None,
        }
    }

    /// Set the view definition
    #[must_use]
    pub fn definition(mut self, sql: impl Into<String>) -> Self {
        self.definition = Some(sql.into());
        self
    }

    /// Set the output column list
    #[must_use]
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Mark as existing (not managed)
    #[must_use]
    pub fn existing(mut self) -> Self {
        self.is_existing = true;
        self
    }

    /// Record a resolution error
    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Get the view name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}
