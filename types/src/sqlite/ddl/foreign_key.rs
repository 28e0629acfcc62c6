//! SQLite Foreign Key DDL types

use super::name_for_fk;

// =============================================================================
// Shared Types
// =============================================================================

/// Foreign key referential action
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ReferentialAction {
    /// No action (default)
    #[default]
    NoAction,
    /// Restrict deletion
    Restrict,
    /// Cascade changes
    Cascade,
    /// Set to NULL
    SetNull,
    /// Set to default value
    SetDefault,
}

impl ReferentialAction {
    /// Get the SQL representation
    #[must_use]
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::NoAction => "NO ACTION",
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
        }
    }

    /// Parse from SQL string
    #[must_use]
    pub fn from_sql(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "NO ACTION" => Some(Self::NoAction),
            "RESTRICT" => Some(Self::Restrict),
            "CASCADE" => Some(Self::Cascade),
            "SET NULL" => Some(Self::SetNull),
            "SET DEFAULT" => Some(Self::SetDefault),
            _ => None,
        }
    }
}

// =============================================================================
// Foreign Key
// =============================================================================

/// Foreign key constraint entity.
///
/// # Examples
///
/// ```
/// use sqlshift_types::sqlite::ddl::{ForeignKey, ReferentialAction};
///
/// let fk = ForeignKey::new("T", ["a"], "U", ["b"]).on_delete(ReferentialAction::Cascade);
/// assert_eq!(fk.name(), "fk_T_a_U_b_fk");
/// assert_eq!(fk.on_delete, ReferentialAction::Cascade);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ForeignKey {
    /// Parent table name
    pub table: String,

    /// Constraint name
    pub name: String,

    /// Source columns
    pub columns: Vec<String>,

    /// Referenced table name
    pub table_to: String,

    /// Referenced columns
    pub columns_to: Vec<String>,

    /// ON DELETE action
    #[cfg_attr(feature = "serde", serde(default))]
    pub on_delete: ReferentialAction,

    /// ON UPDATE action
    #[cfg_attr(feature = "serde", serde(default))]
    pub on_update: ReferentialAction,

    /// Whether the constraint name was explicitly specified
    #[cfg_attr(feature = "serde", serde(default))]
    pub name_explicit: bool,
}

impl ForeignKey {
    /// Create a foreign key with the derived name
    #[must_use]
    pub fn new<I, J, S, T>(
        table: impl Into<String>,
        columns: I,
        table_to: impl Into<String>,
        columns_to: J,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        let mut fk = Self {
            table: table.into(),
            name: String::new(),
            columns: columns.into_iter().map(Into::into).collect(),
            table_to: table_to.into(),
            columns_to: columns_to.into_iter().map(Into::into).collect(),
            on_delete: ReferentialAction::NoAction,
            on_update: ReferentialAction::NoAction,
            name_explicit: false,
        };
        fk.name = fk.derived_name();
        fk
    }

    /// Give the constraint an explicit name
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self.name_explicit = true;
        self
    }

    /// Set ON DELETE action
    #[must_use]
    pub fn on_delete(mut self, action: ReferentialAction) -> Self {
        self.on_delete = action;
        self
    }

    /// Set ON UPDATE action
    #[must_use]
    pub fn on_update(mut self, action: ReferentialAction) -> Self {
        self.on_update = action;
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

    /// Whether the key points back at its own table
    #[inline]
    #[must_use]
    pub fn is_self_reference(&self) -> bool {
        self.table == self.table_to
    }

    /// The name this key would get if it were not explicitly named
    #[must_use]
    pub fn derived_name(&self) -> String {
        name_for_fk(&self.table, &self.columns, &self.table_to, &self.columns_to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_referential_action_sql() {
        assert_eq!(ReferentialAction::SetNull.as_sql(), "SET NULL");
        assert_eq!(
            ReferentialAction::from_sql("cascade"),
            Some(ReferentialAction::Cascade)
        );
        assert_eq!(ReferentialAction::from_sql("bogus"), None);
    }

    #[test]
    fn test_composite_derived_name() {
        let fk = ForeignKey::new("orders", ["a", "b"], "items", ["x", "y"]);
        assert_eq!(fk.name(), "fk_orders_a_b_items_x_y_fk");
        assert!(!fk.is_self_reference());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_actions_default() {
        let fk: ForeignKey = serde_json::from_str(
            r#"{"table":"p","name":"f","columns":["a"],"tableTo":"u","columnsTo":["id"],"onDelete":"cascade"}"#,
        )
        .unwrap();
        assert_eq!(fk.on_delete, ReferentialAction::Cascade);
        assert_eq!(fk.on_update, ReferentialAction::NoAction);
        assert!(!fk.name_explicit);
    }
}
