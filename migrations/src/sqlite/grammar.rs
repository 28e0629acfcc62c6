//! SQLite lexical rendering: identifier quoting, literal canonicalization and
//! expression re-quoting.

use super::ddl::Column;
use crate::error::LiteralError;
use regex::Regex;
use serde_json::Value;
use sqlshift_types::sqlite::Affinity;
use std::sync::LazyLock;

/// Quote an identifier with backticks, doubling embedded backticks
pub fn quote(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}

/// Quote and join identifiers
pub fn quote_list<S: AsRef<str>>(idents: &[S], separator: &str) -> String {
    idents
        .iter()
        .map(|i| quote(i.as_ref()))
        .collect::<Vec<_>>()
        .join(separator)
}

// Single-quoted strings are matched first so their contents are skipped.
static DOUBLE_QUOTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"'(?:[^']|'')*'|"((?:[^"]|"")*)""#).expect("static regex is valid")
});

/// Rewrite `"ident"` to `` `ident` `` outside string literals
pub fn requote_identifiers(expression: &str) -> String {
    DOUBLE_QUOTED
        .replace_all(expression, |caps: &regex::Captures<'_>| match caps.get(1) {
            Some(ident) => quote(&ident.as_str().replace("\"\"", "\"")),
            None => caps[0].to_string(),
        })
        .into_owned()
}

// String literals and numbers are matched whole so identifiers are never
// found inside them.
static WORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"'(?:[^']|'')*'|[0-9][A-Za-z0-9_.]*|[A-Za-z_][A-Za-z0-9_$]*")
        .expect("static regex is valid")
});

/// Whether `ident` appears in `sql` as an identifier
pub fn mentions_identifier(sql: &str, ident: &str) -> bool {
    WORDS
        .find_iter(sql)
        .any(|word| word.as_str().eq_ignore_ascii_case(ident))
}

/// Replace every identifier `from` in `sql` with `to`, leaving string literals alone
pub fn rename_identifier(sql: &str, from: &str, to: &str) -> String {
    WORDS
        .replace_all(sql, |caps: &regex::Captures<'_>| {
            if caps[0].eq_ignore_ascii_case(from) {
                to.to_string()
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// Wrap an expression in parentheses unless one pair already encloses all of it
pub fn wrap_expression(expression: &str) -> String {
    let trimmed = expression.trim();
    if is_fully_wrapped(trimmed) {
        trimmed.to_string()
    } else {
        format!("({trimmed})")
    }
}

fn is_fully_wrapped(expression: &str) -> bool {
    if !expression.starts_with('(') || !expression.ends_with(')') {
        return false;
    }
    let mut depth = 0usize;
    let mut in_string = false;
    let last = expression.len() - 1;
    for (i, ch) in expression.char_indices() {
        match ch {
            '\'' => in_string = !in_string,
            '(' if !in_string => depth += 1,
            ')' if !in_string => {
                depth = depth.saturating_sub(1);
                if depth == 0 && i != last {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

/// Generated-column expression as it appears after `GENERATED ALWAYS AS`
pub fn generated_expression(expression: &str) -> String {
    wrap_expression(&requote_identifiers(expression))
}

/// A default value before rendering
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Integer(i64),
    Real(f64),
    /// Digits of an integer too wide for `i64`
    BigInt(String),
    Bool(bool),
    Text(String),
    Json(Value),
    Blob(Vec<u8>),
    /// Raw SQL expression, rendered in parentheses
    Expression(String),
}

impl Literal {
    /// Render without knowledge of the target column
    pub fn render(&self) -> Result<String, LiteralError> {
        Ok(match self {
            Self::Null => "NULL".to_string(),
            Self::Integer(v) => v.to_string(),
            Self::Real(v) if !v.is_finite() => return Err(LiteralError::NonFiniteReal(*v)),
            Self::Real(v) => v.to_string(),
            Self::BigInt(digits) => text(digits),
            Self::Bool(v) => String::from(if *v { "1" } else { "0" }),
            Self::Text(s) => text(s),
            Self::Json(value) => text(&canonical_json(value)),
            Self::Blob(bytes) => format!("X'{}'", hex::encode_upper(bytes)),
            Self::Expression(expr) => wrap_expression(&requote_identifiers(expr)),
        })
    }

    /// Render for a column of `sql_type`
    pub fn render_for(&self, sql_type: &str) -> Result<String, LiteralError> {
        match self {
            Self::BigInt(digits) if Affinity::from_sql_type(sql_type).is_numeric() => {
                Ok(digits.clone())
            }
            _ => self.render(),
        }
    }
}

/// Column defaults given as a [`Literal`]
pub trait LiteralDefault: Sized {
    /// Set the default, rendered for the column's declared type
    fn default_literal(self, literal: &Literal) -> Result<Self, LiteralError>;
}

impl LiteralDefault for Column {
    fn default_literal(self, literal: &Literal) -> Result<Self, LiteralError> {
        let rendered = literal.render_for(&self.sql_type)?;
        Ok(self.default_value(rendered))
    }
}

// Backslashes are doubled as well as quotes. SQLite keeps both characters,
// so `a\b` reads back as `a\\b`.
fn text(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "''"))
}

/// JSON with object keys sorted at every level
pub fn canonical_json(value: &Value) -> String {
    sorted(value).to_string()
}

fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), sorted(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}
