//! Name lookups and project selection.
//!
//! Two different matching rules live here:
//! - [`resolve`]: case-insensitive *exact* name match, used for spaces,
//!   environments and single projects.
//! - [`ProjectFilter`]: case-insensitive *substring* match, used for
//!   `--filter` / `--exclude`.

use serde::{Deserialize, Serialize};

use crate::error::PromoteError;
use crate::types::{Named, ResourceId, ResourceKind};

fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Find the single resource called `name`, ignoring case.
pub fn resolve<'a, T: Named>(
    kind: ResourceKind,
    name: &str,
    candidates: &'a [T],
) -> Result<&'a T, PromoteError> {
    let mut matches = candidates.iter().filter(|c| same_name(c.name(), name));

    let first = matches
        .next()
        .ok_or_else(|| PromoteError::not_found(kind, name))?;

    let extra = matches.count();
    if extra > 0 {
        return Err(PromoteError::Ambiguous {
            kind,
            name: name.to_string(),
            count: extra + 1,
        });
    }

    Ok(first)
}

/// Like [`resolve`], returning only the id.
pub fn resolve_id<T: Named>(
    kind: ResourceKind,
    name: &str,
    candidates: &[T],
) -> Result<ResourceId, PromoteError> {
    resolve(kind, name, candidates).map(|found| found.id().clone())
}

/// `--filter` / `--exclude` selection over project names.
///
/// A project is kept when it contains the filter (if any) and contains none
/// of the exclude terms. All comparisons ignore case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFilter {
    pub filter: Option<String>,
    pub exclude: Vec<String>,
}

impl ProjectFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_exclude(mut self, term: impl Into<String>) -> Self {
        self.exclude.push(term.into());
        self
    }

    pub fn with_excludes<I, S>(mut self, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(terms.into_iter().map(Into::into));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.filter.is_none() && self.exclude.is_empty()
    }

    pub fn matches(&self, name: &str) -> bool {
        let name = name.to_lowercase();

        let included = self
            .filter
            .as_ref()
            .is_none_or(|filter| name.contains(&filter.to_lowercase()));

        included
            && !self
                .exclude
                .iter()
                .any(|term| name.contains(&term.to_lowercase()))
    }

    /// Keep matching items, preserving their order.
    pub fn apply<T: Named>(&self, items: Vec<T>) -> Vec<T> {
        items
            .into_iter()
            .filter(|item| self.matches(item.name()))
            .collect()
    }

    /// One-line description, e.g. `matching filter 'api' and excluding 'legacy'`.
    pub fn describe(&self) -> Option<String> {
        let excludes = self.exclude.join("', '");
        match (&self.filter, self.exclude.is_empty()) {
            (None, true) => None,
            (Some(filter), true) => Some(format!("matching filter '{filter}'")),
            (None, false) => Some(format!("excluding '{excludes}'")),
            (Some(filter), false) => Some(format!(
                "matching filter '{filter}' and excluding '{excludes}'"
            )),
        }
    }
}
