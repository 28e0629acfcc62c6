//! SQLite Index DDL types

// =============================================================================
// Index Origin
// =============================================================================

/// Index origin - how the index was created
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum IndexOrigin {
    /// Manually created via CREATE INDEX
    #[default]
    Manual,
    /// Auto-created by SQLite for a UNIQUE or PRIMARY KEY constraint
    Auto,
}

/// Sort direction of one index entry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum IndexDirection {
    Asc,
    Desc,
}

impl IndexDirection {
    #[must_use]
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

// =============================================================================
// Index Column
// =============================================================================

/// One entry of an index: a column reference or a raw expression.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct IndexColumn {
    /// Column name or expression
    pub value: String,

    /// Whether this is an expression (vs column name)
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_expression: bool,

    /// Explicit sort direction, if any
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub direction: Option<IndexDirection>,
}

impl IndexColumn {
    /// Create a new index column
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            is_expression: false,
            direction: None,
        }
    }

    /// Create a new index column from an expression
    #[must_use]
    pub fn expression(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            is_expression: true,
            direction: None,
        }
    }

    /// Sort ascending
    #[must_use]
    pub fn asc(mut self) -> Self {
        self.direction = Some(IndexDirection::Asc);
        self
    }

    /// Sort descending
    #[must_use]
    pub fn desc(mut self) -> Self {
        self.direction = Some(IndexDirection::Desc);
        self
    }

    /// Column this entry refers to, `None` for expressions
    #[must_use]
    pub fn column(&self) -> Option<&str> {
        (!self.is_expression).then_some(self.value.as_str())
    }
}

impl From<&str> for IndexColumn {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for IndexColumn {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

// =============================================================================
// Index
// =============================================================================

/// Index entity.
///
/// # Examples
///
/// ```
/// use sqlshift_types::sqlite::ddl::{Index, IndexColumn};
///
/// let idx = Index::new("users", "users_email_idx", ["email"]).unique();
/// assert!(idx.is_unique);
///
/// let mixed = Index::new(
///     "users",
///     "users_search_idx",
///     [IndexColumn::expression("lower(name)"), IndexColumn::new("id").desc()],
/// );
/// assert_eq!(mixed.column_names(), vec!["id"]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Index {
    /// Parent table name
    pub table: String,

    /// Index name
    pub name: String,

    /// Indexed entries, in order
    pub columns: Vec<IndexColumn>,

    /// Is this a unique index?
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_unique: bool,

    /// WHERE clause of a partial index
    #[cfg_attr(
        feature = "serde",
        serde(default, rename = "where", skip_serializing_if = "Option::is_none")
    )]
    pub where_clause: Option<String>,

    /// How the index was created
    #[cfg_attr(feature = "serde", serde(default))]
    pub origin: IndexOrigin,
}

impl Index {
    /// Create a new index
    #[must_use]
    pub fn new<I, C>(table: impl Into<String>, name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<IndexColumn>,
    {
        Self {
            table: table.into(),
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            is_unique: false,
            where_clause: None,
            origin: IndexOrigin::Manual,
        }
    }

    /// Make this a unique index
    #[must_use]
    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    /// Make this a partial index
    #[must_use]
    pub fn where_clause(mut self, predicate: impl Into<String>) -> Self {
        self.where_clause = Some(predicate.into());
        self
    }

    /// Mark as created implicitly by SQLite
    #[must_use]
    pub fn auto(mut self) -> Self {
        self.origin = IndexOrigin::Auto;
        self
    }

    /// Get the index name
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

    /// Names of plain column entries, skipping expressions
    #[must_use]
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().filter_map(IndexColumn::column).collect()
    }
}
