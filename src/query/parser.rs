//! Structured query parser.
//!
//! # Syntax
//!
//! ```text
//! query := token (whitespace token)*
//! token := key ":" value | key
//! key   := field name or alias (see [`super::fields`])
//! ```
//!
//! Tokens that do not resolve are dropped silently: an unknown key, a value
//! the field rejects, or plain words. A query where nothing resolves parses to
//! an empty [`StructuredQuery`] and is treated as free text by the evaluator.
//!
//! ```rust
//! # use tabhop::query::parser::parse_query;
//! let query = parse_query("pinned:true domain:github hello");
//! assert_eq!(query.len(), 2);
//! assert_eq!(query.get("hostname"), Some(Some("github")));
//!
//! assert!(parse_query("pinned:maybe").is_empty());
//! ```

use std::collections::BTreeMap;

use super::fields::resolve;
use crate::models::TabSnapshot;

/// Resolved `field:value` filters keyed by canonical field name.
///
/// A repeated field keeps its last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredQuery {
    filters: BTreeMap<&'static str, Option<String>>,
}

impl StructuredQuery {
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Value parsed for `field` (canonical name); `Some(None)` for a bare key
    pub fn get(&self, field: &str) -> Option<Option<&str>> {
        self.filters.get(field).map(|value| value.as_deref())
    }

    /// Filters in field-name order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Option<&str>)> {
        self.filters.iter().map(|(name, value)| (*name, value.as_deref()))
    }

    /// True when every filter holds for `tab`
    pub fn matches(&self, tab: &TabSnapshot) -> bool {
        self.filters.iter().all(|(name, value)| {
            resolve(name).is_some_and(|field| field.matches(tab, value.as_deref()))
        })
    }
}

pub fn parse_query(input: &str) -> StructuredQuery {
    let mut query = StructuredQuery::default();

    for token in input.split_whitespace() {
        let (key, value) = match token.split_once(':') {
            Some((key, value)) => (key, Some(value)),
            None => (token, None),
        };

        let Some(field) = resolve(key) else {
            continue;
        };
        if !field.accepts(value) {
            continue;
        }
        query.filters.insert(field.name, value.map(str::to_owned));
    }

    query
}
