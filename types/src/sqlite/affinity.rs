//! SQLite type affinity
//!
//! See: <https://www.sqlite.org/datatype3.html#determination_of_column_affinity>

/// Storage affinity SQLite assigns to a column from its declared type.
///
/// # Examples
///
/// ```
/// use sqlshift_types::sqlite::Affinity;
///
/// assert_eq!(Affinity::from_sql_type("INTEGER"), Affinity::Integer);
/// assert_eq!(Affinity::from_sql_type("varchar(255)"), Affinity::Text);
/// assert_eq!(Affinity::from_sql_type("DOUBLE PRECISION"), Affinity::Real);
/// assert_eq!(Affinity::from_sql_type("DECIMAL(10,2)"), Affinity::Numeric);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Affinity {
    /// INT, INTEGER, BIGINT, ...
    Integer,
    /// REAL, DOUBLE, FLOAT
    Real,
    /// NUMERIC, DECIMAL, BOOLEAN, DATE, anything unrecognized
    Numeric,
    /// TEXT, VARCHAR, CHAR, CLOB
    Text,
    /// BLOB or no declared type
    Blob,
}

impl Affinity {
    /// Apply SQLite's affinity rules, in the order SQLite applies them.
    #[must_use]
    pub fn from_sql_type(sql_type: &str) -> Self {
        let upper = sql_type.trim().to_ascii_uppercase();

        if upper.contains("INT") {
            Self::Integer
        } else if upper.contains("CHAR") || upper.contains("CLOB") || upper.contains("TEXT") {
            Self::Text
        } else if upper.is_empty() || upper.contains("BLOB") {
            Self::Blob
        } else if upper.contains("REAL") || upper.contains("FLOA") || upper.contains("DOUB") {
            Self::Real
        } else {
            Self::Numeric
        }
    }

    /// Whether values of this affinity are written as bare numbers.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Real | Self::Numeric)
    }

    /// Whether converting stored values from `self` to `to` can lose data.
    ///
    /// Text and blob hold anything; numeric holds integers and reals; real
    /// holds integers. Moving towards a narrower class is lossy.
    #[must_use]
    pub const fn narrows_to(self, to: Affinity) -> bool {
        self.width() > to.width()
    }

    const fn width(self) -> u8 {
        match self {
            Self::Integer => 0,
            Self::Real => 1,
            Self::Numeric => 2,
            Self::Text | Self::Blob => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affinity_rule_order() {
        // "INT" wins over "CHAR" because it is checked first
        assert_eq!(Affinity::from_sql_type("CHARINT"), Affinity::Integer);
        assert_eq!(Affinity::from_sql_type("FLOATING POINT"), Affinity::Integer);
        assert_eq!(Affinity::from_sql_type("clob"), Affinity::Text);
        assert_eq!(Affinity::from_sql_type(""), Affinity::Blob);
        assert_eq!(Affinity::from_sql_type("boolean"), Affinity::Numeric);
        assert_eq!(Affinity::from_sql_type("json"), Affinity::Numeric);
    }

    #[test]
    fn test_narrowing() {
        assert!(Affinity::Text.narrows_to(Affinity::Integer));
        assert!(Affinity::Real.narrows_to(Affinity::Integer));
        assert!(!Affinity::Integer.narrows_to(Affinity::Text));
        assert!(!Affinity::Text.narrows_to(Affinity::Blob));
        assert!(!Affinity::Numeric.narrows_to(Affinity::Numeric));
    }
}
