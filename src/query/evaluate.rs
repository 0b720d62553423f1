//! Query evaluation over an ordered tab list.
//!
//! Three branches, picked from the trimmed query string:
//!
//! | query                        | result                                       |
//! |------------------------------|----------------------------------------------|
//! | empty / whitespace           | every tab, input order, rank = input index   |
//! | at least one resolved filter | matching tabs, input order, no spans         |
//! | anything else                | fuzzy over title + hostname, best score first |
//!
//! In the fuzzy branch a tab's score is the best of its field scores; ties keep
//! input (recency) order.

use tracing::trace;

use super::fuzzy::{FuzzyMatcher, FuzzyOptions};
use super::parser::{StructuredQuery, parse_query};
use crate::models::{FieldMatch, MatchField, RankedResult, TabSnapshot};

#[derive(Debug)]
pub struct QueryEngine {
    matcher: FuzzyMatcher,
}

impl Default for QueryEngine {
    fn default() -> Self {
        Self::new(FuzzyOptions::default())
    }
}

impl QueryEngine {
    pub fn new(options: FuzzyOptions) -> Self {
        Self { matcher: FuzzyMatcher::new(options) }
    }

    pub fn evaluate(&mut self, tabs: &[TabSnapshot], query: &str) -> Vec<RankedResult> {
        let query = query.trim();
        if query.is_empty() {
            return tabs
                .iter()
                .enumerate()
                .map(|(idx, tab)| RankedResult::unscored(tab.clone(), idx))
                .collect();
        }

        let structured = parse_query(query);
        if !structured.is_empty() {
            return filter_structured(tabs, &structured);
        }

        self.fuzzy(tabs, query)
    }

    fn fuzzy(&mut self, tabs: &[TabSnapshot], query: &str) -> Vec<RankedResult> {
        let pattern = self.matcher.pattern(query);
        let mut scored: Vec<(u32, &TabSnapshot, Vec<FieldMatch>)> = Vec::new();

        for tab in tabs {
            let mut best: Option<u32> = None;
            let mut matches = Vec::new();

            if let Some(hit) = self.matcher.match_field(&pattern, tab.title_text()) {
                best = best.max(Some(hit.score));
                matches.push(FieldMatch { field: MatchField::Title, spans: hit.spans });
            }
            if let Some(hostname) = tab.hostname()
                && let Some(hit) = self.matcher.match_field(&pattern, &hostname)
            {
                best = best.max(Some(hit.score));
                matches.push(FieldMatch { field: MatchField::Hostname, spans: hit.spans });
            }

            if let Some(score) = best {
                scored.push((score, tab, matches));
            }
        }

        // Stable: equal scores keep recency order
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        trace!(query, candidates = tabs.len(), matched = scored.len(), "fuzzy evaluation");

        scored
            .into_iter()
            .enumerate()
            .map(|(rank, (score, tab, matches))| RankedResult {
                tab: tab.clone(),
                rank,
                score: Some(score),
                matches,
            })
            .collect()
    }
}

fn filter_structured(tabs: &[TabSnapshot], query: &StructuredQuery) -> Vec<RankedResult> {
    tabs.iter()
        .filter(|tab| query.matches(tab))
        .enumerate()
        .map(|(rank, tab)| RankedResult::unscored(tab.clone(), rank))
        .collect()
}

/// Evaluate with default fuzzy options
pub fn evaluate(tabs: &[TabSnapshot], query: &str) -> Vec<RankedResult> {
    QueryEngine::default().evaluate(tabs, query)
}
