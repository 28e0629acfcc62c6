//! Rename resolution
//!
//! When a name disappears from the old snapshot and another appears in the new
//! one, the differ cannot tell a rename from an unrelated drop + create. It
//! asks a [`RenameResolver`] instead of guessing. Whatever the resolver does
//! not pair up is dropped and created.
//!
//! Two resolvers ship with the crate:
//!
//! - [`RenameList`] - scripted answers in the `old->new` / `table.old->table.new` form
//! - [`InteractiveResolver`] - asks a callback about every appeared entity
//!   ([`terminal`] builds one on top of `inquire` with the `prompt` feature)

use std::fmt;
use std::str::FromStr;

use crate::config::DiffOptions;
use crate::traits::EntityKind;

// =============================================================================
// Contract
// =============================================================================

/// One entity that disappeared or appeared between two snapshots
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenameCandidate {
    pub kind: EntityKind,
    /// Owning table (its new name when the table itself was renamed)
    pub table: Option<String>,
    pub name: String,
}

impl RenameCandidate {
    pub fn new(kind: EntityKind, table: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            kind,
            table: table.map(str::to_string),
            name: name.into(),
        }
    }
}

impl fmt::Display for RenameCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.table {
            Some(table) => write!(f, "{table}.{}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Candidates of one kind within one neighborhood (a table, or the schema)
#[derive(Debug, Clone, Copy)]
pub struct ResolveRequest<'a> {
    pub kind: EntityKind,
    /// Table being diffed, for table-scoped kinds
    pub table: Option<&'a str>,
    /// Name the table had in the old snapshot, when it was renamed
    pub previous_table: Option<&'a str>,
    /// Present in the old snapshot only
    pub dropped: &'a [RenameCandidate],
    /// Present in the new snapshot only
    pub created: &'a [RenameCandidate],
}

/// A dropped candidate paired with the created candidate it became
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePair {
    pub from: RenameCandidate,
    pub to: RenameCandidate,
}

/// Decides which disappeared/appeared pairs are renames.
///
/// Every returned pair must use candidates from the request, each at most
/// once. A resolver that cannot decide returns no pair for it.
pub trait RenameResolver {
    fn resolve(&mut self, request: &ResolveRequest<'_>) -> Vec<RenamePair>;
}

impl<R: RenameResolver + ?Sized> RenameResolver for &mut R {
    fn resolve(&mut self, request: &ResolveRequest<'_>) -> Vec<RenamePair> {
        (**self).resolve(request)
    }
}

impl<R: RenameResolver + ?Sized> RenameResolver for Box<R> {
    fn resolve(&mut self, request: &ResolveRequest<'_>) -> Vec<RenamePair> {
        (**self).resolve(request)
    }
}

/// Treats every change as drop + create
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRenames;

impl RenameResolver for NoRenames {
    fn resolve(&mut self, _request: &ResolveRequest<'_>) -> Vec<RenamePair> {
        Vec::new()
    }
}

// =============================================================================
// Rename List
// =============================================================================

/// Malformed rename list entry
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenameParseError {
    #[error("Missing `->` in rename entry `{0}`")]
    MissingArrow(String),
    #[error("Empty name in rename entry `{0}`")]
    EmptyName(String),
    #[error("Rename entry `{0}` mixes table-qualified and bare names")]
    MixedQualification(String),
}

/// One parsed `old->new` entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenameEntry {
    pub from_table: Option<String>,
    pub from: String,
    pub to_table: Option<String>,
    pub to: String,
}

impl RenameEntry {
    fn matches(&self, request: &ResolveRequest<'_>) -> bool {
        if !request.kind.is_table_scoped() {
            return self.from_table.is_none();
        }
        let (Some(from_table), Some(to_table)) = (&self.from_table, &self.to_table) else {
            return false;
        };
        let to_matches = request.table == Some(to_table.as_str());
        let from_matches = request.table == Some(from_table.as_str())
            || request.previous_table == Some(from_table.as_str());
        to_matches && from_matches
    }
}

impl FromStr for RenameEntry {
    type Err = RenameParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (from, to) = s
            .split_once("->")
            .ok_or_else(|| RenameParseError::MissingArrow(s.to_string()))?;

        let split = |part: &str| -> Result<(Option<String>, String), RenameParseError> {
            let part = part.trim();
            let (table, name) = match part.split_once('.') {
                Some((table, name)) => (Some(table.trim()), name.trim()),
                None => (None, part),
            };
            if name.is_empty() || table.is_some_and(str::is_empty) {
                return Err(RenameParseError::EmptyName(s.to_string()));
            }
            Ok((table.map(str::to_string), name.to_string()))
        };

        let (from_table, from) = split(from)?;
        let (to_table, to) = split(to)?;
        if from_table.is_some() != to_table.is_some() {
            return Err(RenameParseError::MixedQualification(s.to_string()));
        }

        Ok(Self {
            from_table,
            from,
            to_table,
            to,
        })
    }
}

impl fmt::Display for RenameEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.from_table, &self.to_table) {
            (Some(from_table), Some(to_table)) => write!(
                f,
                "{from_table}.{}->{to_table}.{}",
                self.from, self.to
            ),
            _ => write!(f, "{}->{}", self.from, self.to),
        }
    }
}

/// Deterministic resolver driven by an explicit rename list.
///
/// # Examples
///
/// ```
/// use sqlshift_migrations::resolver::RenameList;
///
/// let list = RenameList::parse(["users->accounts", "accounts.name->accounts.full_name"]).unwrap();
/// assert_eq!(list.entries().len(), 2);
/// assert!(RenameList::parse(["users"]).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameList {
    entries: Vec<RenameEntry>,
}

impl RenameList {
    /// Parse every entry, failing on the first malformed one
    pub fn parse<I, S>(entries: I) -> Result<Self, RenameParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|entry| entry.as_ref().parse())
            .collect::<Result<_, _>>()?;
        Ok(Self { entries })
    }

    /// Build from the `renames` field of the options
    pub fn from_options(options: &DiffOptions) -> Result<Self, RenameParseError> {
        Self::parse(&options.renames)
    }

    pub fn entries(&self) -> &[RenameEntry] {
        &self.entries
    }
}

impl RenameResolver for RenameList {
    fn resolve(&mut self, request: &ResolveRequest<'_>) -> Vec<RenamePair> {
        let mut used_from = vec![false; request.dropped.len()];
        let mut used_to = vec![false; request.created.len()];
        let mut pairs = Vec::new();

        for entry in self.entries.iter().filter(|e| e.matches(request)) {
            let from = request
                .dropped
                .iter()
                .enumerate()
                .position(|(i, c)| !used_from[i] && c.name == entry.from);
            let to = request
                .created
                .iter()
                .enumerate()
                .position(|(i, c)| !used_to[i] && c.name == entry.to);

            if let (Some(from), Some(to)) = (from, to) {
                used_from[from] = true;
                used_to[to] = true;
                pairs.push(RenamePair {
                    from: request.dropped[from].clone(),
                    to: request.created[to].clone(),
                });
            }
        }

        pairs
    }
}

// =============================================================================
// Interactive Resolver
// =============================================================================

/// Asks a callback, once per appeared entity, whether it was renamed from one
/// of the still-unclaimed disappeared entities.
///
/// The callback returns the index of the chosen entry in the slice it is
/// given, or `None` for "newly created". Out of range answers count as `None`.
pub struct InteractiveResolver<F> {
    ask: F,
}

impl<F> InteractiveResolver<F>
where
    F: FnMut(&ResolveRequest<'_>, &RenameCandidate, &[RenameCandidate]) -> Option<usize>,
{
    pub fn new(ask: F) -> Self {
        Self { ask }
    }
}

impl<F> RenameResolver for InteractiveResolver<F>
where
    F: FnMut(&ResolveRequest<'_>, &RenameCandidate, &[RenameCandidate]) -> Option<usize>,
{
    fn resolve(&mut self, request: &ResolveRequest<'_>) -> Vec<RenamePair> {
        let mut remaining = request.dropped.to_vec();
        let mut pairs = Vec::new();

        for created in request.created {
            if remaining.is_empty() {
                break;
            }
            match (self.ask)(request, created, &remaining) {
                Some(index) if index < remaining.len() => {
                    let from = remaining.remove(index);
                    pairs.push(RenamePair {
                        from,
                        to: created.clone(),
                    });
                }
                Some(index) => {
                    sqlshift_trace_resolver!(
                        request.kind,
                        format!("answer {index} out of range for `{created}`")
                    );
                }
                None => {}
            }
        }

        pairs
    }
}

impl<F> fmt::Debug for InteractiveResolver<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InteractiveResolver").finish_non_exhaustive()
    }
}

/// Terminal prompt: one select per appeared entity.
///
/// A cancelled or failed prompt is treated as "newly created".
#[cfg(feature = "prompt")]
pub fn terminal() -> InteractiveResolver<
    impl FnMut(&ResolveRequest<'_>, &RenameCandidate, &[RenameCandidate]) -> Option<usize>,
> {
    use inquire::Select;

    InteractiveResolver::new(
        |request: &ResolveRequest<'_>, created: &RenameCandidate, dropped: &[RenameCandidate]| {
            let label = request.kind.label();
            let mut options = vec![format!("+ {created} create {label}")];
            options.extend(
                dropped
                    .iter()
                    .map(|from| format!("~ {from} › {created} rename {label}")),
            );

            let message = format!("Is {label} `{created}` created or renamed from another {label}?");
            match Select::new(&message, options).raw_prompt() {
                Ok(choice) => choice.index.checked_sub(1),
                Err(e) => {
                    sqlshift_trace_resolver!(request.kind, e);
                    None
                }
            }
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(table: &str, names: &[&str]) -> Vec<RenameCandidate> {
        names
            .iter()
            .map(|n| RenameCandidate::new(EntityKind::Column, Some(table), *n))
            .collect()
    }

    fn tables(names: &[&str]) -> Vec<RenameCandidate> {
        names
            .iter()
            .map(|n| RenameCandidate::new(EntityKind::Table, None, *n))
            .collect()
    }

    #[test]
    fn test_parse_entries() {
        let entry: RenameEntry = "users.name -> users.full_name".parse().unwrap();
        assert_eq!(entry.from_table.as_deref(), Some("users"));
        assert_eq!(entry.from, "name");
        assert_eq!(entry.to, "full_name");
        assert_eq!(entry.to_string(), "users.name->users.full_name");

        let entry: RenameEntry = "users->accounts".parse().unwrap();
        assert!(entry.from_table.is_none());
        assert_eq!(entry.to_string(), "users->accounts");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "users".parse::<RenameEntry>(),
            Err(RenameParseError::MissingArrow("users".into()))
        );
        assert_eq!(
            "users->".parse::<RenameEntry>(),
            Err(RenameParseError::EmptyName("users->".into()))
        );
        assert_eq!(
            "users.a->b".parse::<RenameEntry>(),
            Err(RenameParseError::MixedQualification("users.a->b".into()))
        );
    }

    #[test]
    fn test_list_pairs_only_offered_candidates() {
        let mut list = RenameList::parse(["users.a->users.b", "users.x->users.y"]).unwrap();
        let dropped = columns("users", &["a", "c"]);
        let created = columns("users", &["b", "d"]);

        let pairs = list.resolve(&ResolveRequest {
            kind: EntityKind::Column,
            table: Some("users"),
            previous_table: None,
            dropped: &dropped,
            created: &created,
        });

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].from.name, "a");
        assert_eq!(pairs[0].to.name, "b");
    }

    #[test]
    fn test_list_scopes_by_kind_and_table() {
        let mut list = RenameList::parse(["a->b", "posts.a->posts.b"]).unwrap();
        let dropped = columns("users", &["a"]);
        let created = columns("users", &["b"]);

        let pairs = list.resolve(&ResolveRequest {
            kind: EntityKind::Column,
            table: Some("users"),
            previous_table: None,
            dropped: &dropped,
            created: &created,
        });
        assert!(pairs.is_empty(), "entries for other tables must not apply");

        let dropped = tables(&["a"]);
        let created = tables(&["b"]);
        let pairs = list.resolve(&ResolveRequest {
            kind: EntityKind::Table,
            table: None,
            previous_table: None,
            dropped: &dropped,
            created: &created,
        });
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn test_list_accepts_previous_table_name() {
        let mut list = RenameList::parse(["people.name->users.full_name"]).unwrap();
        let dropped = columns("users", &["name"]);
        let created = columns("users", &["full_name"]);

        let pairs = list.resolve(&ResolveRequest {
            kind: EntityKind::Column,
            table: Some("users"),
            previous_table: Some("people"),
            dropped: &dropped,
            created: &created,
        });
        assert_eq!(pairs.len(), 1);
    }

    #[test]
    fn test_interactive_resolver_claims_each_candidate_once() {
        let mut asked = Vec::new();
        let mut resolver = InteractiveResolver::new(
            |_: &ResolveRequest<'_>, created: &RenameCandidate, dropped: &[RenameCandidate]| {
                asked.push((created.name.clone(), dropped.len()));
                Some(0)
            },
        );
        let dropped = tables(&["old"]);
        let created = tables(&["new1", "new2"]);

        let pairs = resolver.resolve(&ResolveRequest {
            kind: EntityKind::Table,
            table: None,
            previous_table: None,
            dropped: &dropped,
            created: &created,
        });

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].to.name, "new1");
        drop(resolver);
        assert_eq!(asked, vec![("new1".to_string(), 1)]);
    }

    #[test]
    fn test_interactive_out_of_range_is_create() {
        let mut resolver = InteractiveResolver::new(
            |_: &ResolveRequest<'_>, _: &RenameCandidate, _: &[RenameCandidate]| Some(7),
        );
        let dropped = tables(&["old"]);
        let created = tables(&["new"]);

        let pairs = resolver.resolve(&ResolveRequest {
            kind: EntityKind::Table,
            table: None,
            previous_table: None,
            dropped: &dropped,
            created: &created,
        });
        assert!(pairs.is_empty());
    }
}
