//! SQLite Column DDL types

// =============================================================================
// Generated Column Types
// =============================================================================

/// Generated column type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum GeneratedType {
    /// Stored generated column
    #[default]
    Stored,
    /// Virtual generated column
    Virtual,
}

impl GeneratedType {
    /// SQL keyword for this mode
    #[must_use]
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::Stored => "STORED",
            Self::Virtual => "VIRTUAL",
        }
    }
}

/// Generated column configuration
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Generated {
    /// SQL expression for generation
    #[cfg_attr(feature = "serde", serde(rename = "as"))]
    pub expression: String,
    /// Generation type: stored or virtual
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub gen_type: GeneratedType,
}

impl Generated {
    /// Create a new stored generated column
    #[must_use]
    pub fn stored(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            gen_type: GeneratedType::Stored,
        }
    }

    /// Create a new virtual generated column
    #[must_use]
    pub fn virtual_col(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            gen_type: GeneratedType::Virtual,
        }
    }
}

// =============================================================================
// Column
// =============================================================================

/// Column entity.
///
/// `default` holds SQL text exactly as it should appear after `DEFAULT`:
/// either a canonical literal (`'abc'`, `42`) or a parenthesized expression.
///
/// # Examples
///
/// ```
/// use sqlshift_types::sqlite::ddl::Column;
///
/// let col = Column::new("users", "name", "text")
///     .not_null()
///     .default_value("'anonymous'");
///
/// assert_eq!(col.table(), "users");
/// assert_eq!(col.default.as_deref(), Some("'anonymous'"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Column {
    /// Parent table name
    pub table: String,

    /// Column name
    pub name: String,

    /// SQL type (e.g., "integer", "text", "real", "blob")
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub sql_type: String,

    /// Is this column NOT NULL?
    #[cfg_attr(feature = "serde", serde(default))]
    pub not_null: bool,

    /// Is this column AUTOINCREMENT?
    #[cfg_attr(feature = "serde", serde(default))]
    pub autoincrement: bool,

    /// Default value as SQL text
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub default: Option<String>,

    /// Generated column configuration
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub generated: Option<Generated>,
}

impl Column {
    /// Create a new nullable column
    #[must_use]
    pub fn new(
        table: impl Into<String>,
        name: impl Into<String>,
        sql_type: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            name: name.into(),
            sql_type: sql_type.into(),
            not_null: false,
            autoincrement: false,
            default: None,
            generated: None,
        }
    }

    /// Set NOT NULL
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Set AUTOINCREMENT
    #[must_use]
    pub fn autoincrement(mut self) -> Self {
        self.autoincrement = true;
        self
    }

    /// Set default value (SQL text)
    #[must_use]
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Set as generated stored column
    #[must_use]
    pub fn generated_stored(mut self, expression: impl Into<String>) -> Self {
        self.generated = Some(Generated::stored(expression));
        self
    }

    /// Set as generated virtual column
    #[must_use]
    pub fn generated_virtual(mut self, expression: impl Into<String>) -> Self {
        self.generated = Some(Generated::virtual_col(expression));
        self
    }

    /// Get the column name
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

    /// Get the SQL type
    #[inline]
    #[must_use]
    pub fn sql_type(&self) -> &str {
        &self.sql_type
    }

    /// Check if this is a generated column of either mode
    #[inline]
    #[must_use]
    pub fn is_generated(&self) -> bool {
        self.generated.is_some()
    }

    /// Check if this is a STORED generated column
    #[inline]
    #[must_use]
    pub fn is_stored_generated(&self) -> bool {
        matches!(
            self.generated,
            Some(Generated {
                gen_type: GeneratedType::Stored,
                ..
            })
        )
    }

    /// A NOT NULL column that has neither a default nor a generator cannot be
    /// filled in for rows that already exist.
    #[must_use]
    pub fn requires_value(&self) -> bool {
        self.not_null && self.default.is_none() && self.generated.is_none()
    }
}
