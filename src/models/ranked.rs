use std::ops::Range;

use serde::Serialize;

use super::tab::TabSnapshot;

/// Tab field a fuzzy match was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchField {
    Title,
    Hostname,
}

/// Highlight spans for one field.
///
/// Spans are byte ranges into the field's text, sorted, non-overlapping and
/// always on char boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMatch {
    pub field: MatchField,
    pub spans: Vec<Range<usize>>,
}

/// One entry of an evaluated query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedResult {
    pub tab: TabSnapshot,
    /// Position in the result list (0 is best)
    pub rank: usize,
    /// Fuzzy relevance score, absent for unscored listings and structured filters
    pub score: Option<u32>,
    pub matches: Vec<FieldMatch>,
}

impl RankedResult {
    pub fn unscored(tab: TabSnapshot, rank: usize) -> Self {
        Self { tab, rank, score: None, matches: Vec::new() }
    }

    /// Spans for `field`, empty when the field did not match
    pub fn spans_for(&self, field: MatchField) -> &[Range<usize>] {
        self.matches.iter().find(|m| m.field == field).map(|m| m.spans.as_slice()).unwrap_or(&[])
    }
}
