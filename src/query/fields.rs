//! Structured-query vocabulary.
//!
//! Each [`SearchField`] is a named predicate record: which values it accepts
//! and how it tests a tab. The set is fixed; add a field by adding an entry to
//! [`FIELDS`].

use crate::models::TabSnapshot;

pub struct SearchField {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    accepts: fn(Option<&str>) -> bool,
    matches: fn(&TabSnapshot, Option<&str>) -> bool,
}

impl SearchField {
    /// Exact name or alias match
    pub fn answers_to(&self, key: &str) -> bool {
        self.name == key || self.aliases.contains(&key)
    }

    pub fn accepts(&self, value: Option<&str>) -> bool {
        (self.accepts)(value)
    }

    pub fn matches(&self, tab: &TabSnapshot, value: Option<&str>) -> bool {
        (self.matches)(tab, value)
    }
}

impl std::fmt::Debug for SearchField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchField").field("name", &self.name).field("aliases", &self.aliases).finish()
    }
}

pub static FIELDS: [SearchField; 3] = [
    SearchField {
        name: "sys",
        aliases: &[],
        description: "browser-internal pages (true) or web pages (false)",
        accepts: accepts_bool,
        matches: match_sys,
    },
    SearchField {
        name: "pinned",
        aliases: &[],
        description: "pinned tabs (true) or unpinned tabs (false)",
        accepts: accepts_bool,
        matches: match_pinned,
    },
    SearchField {
        name: "hostname",
        aliases: &["domain"],
        description: "tabs whose hostname contains the value",
        accepts: accepts_non_empty,
        matches: match_hostname,
    },
];

pub fn registry() -> &'static [SearchField] {
    &FIELDS
}

/// Look a key up by name or alias
pub fn resolve(key: &str) -> Option<&'static SearchField> {
    FIELDS.iter().find(|field| field.answers_to(key))
}

fn parse_bool(value: Option<&str>) -> Option<bool> {
    let value = value?;
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn accepts_bool(value: Option<&str>) -> bool {
    parse_bool(value).is_some()
}

fn accepts_non_empty(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

fn match_sys(tab: &TabSnapshot, value: Option<&str>) -> bool {
    parse_bool(value) == Some(!tab.is_web())
}

fn match_pinned(tab: &TabSnapshot, value: Option<&str>) -> bool {
    parse_bool(value) == Some(tab.pinned)
}

fn match_hostname(tab: &TabSnapshot, value: Option<&str>) -> bool {
    let (Some(value), Some(hostname)) = (value, tab.hostname()) else {
        return false;
    };
    hostname.contains(&value.to_lowercase())
}
