//! Fuzzy matching via `nucleo` with highlight span extraction.
//!
//! nucleo reports matched positions as char indices into the haystack. They
//! are sorted, deduplicated and folded into contiguous byte ranges so callers
//! can slice the original string directly.

use std::ops::Range;

use nucleo::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo::{Config, Matcher, Utf32Str};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseMode {
    /// Case-sensitive only when the pattern contains an uppercase letter
    #[default]
    Smart,
    Respect,
    Ignore,
}

impl From<CaseMode> for CaseMatching {
    fn from(mode: CaseMode) -> Self {
        match mode {
            CaseMode::Smart => CaseMatching::Smart,
            CaseMode::Respect => CaseMatching::Respect,
            CaseMode::Ignore => CaseMatching::Ignore,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuzzyOptions {
    pub case_matching: CaseMode,
    /// Match accented characters against their plain forms
    pub normalize: bool,
}

impl Default for FuzzyOptions {
    fn default() -> Self {
        Self { case_matching: CaseMode::Smart, normalize: true }
    }
}

/// Score and highlight spans for one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldHit {
    pub score: u32,
    pub spans: Vec<Range<usize>>,
}

/// Reusable matcher; holds nucleo's scratch memory between calls
pub struct FuzzyMatcher {
    matcher: Matcher,
    options: FuzzyOptions,
    chars: Vec<char>,
    indices: Vec<u32>,
}

impl FuzzyMatcher {
    pub fn new(options: FuzzyOptions) -> Self {
        Self {
            matcher: Matcher::new(Config::DEFAULT),
            options,
            chars: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn options(&self) -> FuzzyOptions {
        self.options
    }

    /// Compile `query` into a pattern; every whitespace-separated word must match
    pub fn pattern(&self, query: &str) -> Pattern {
        let normalization =
            if self.options.normalize { Normalization::Smart } else { Normalization::Never };
        Pattern::new(query, self.options.case_matching.into(), normalization, AtomKind::Fuzzy)
    }

    /// Match `pattern` against `haystack`, returning `None` when it does not match
    pub fn match_field(&mut self, pattern: &Pattern, haystack: &str) -> Option<FieldHit> {
        if haystack.is_empty() {
            return None;
        }

        self.indices.clear();
        let score = if haystack.is_ascii() {
            let haystack = Utf32Str::Ascii(haystack.as_bytes());
            pattern.indices(haystack, &mut self.matcher, &mut self.indices)
        } else {
            // One slot per char so indices map back onto char boundaries
            self.chars.clear();
            self.chars.extend(haystack.chars());
            pattern.indices(Utf32Str::Unicode(&self.chars), &mut self.matcher, &mut self.indices)
        }?;

        Some(FieldHit { score, spans: char_indices_to_spans(haystack, &mut self.indices) })
    }
}

impl std::fmt::Debug for FuzzyMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FuzzyMatcher").field("options", &self.options).finish()
    }
}

/// Fold matched char indices into sorted, disjoint byte ranges over `text`
fn char_indices_to_spans(text: &str, indices: &mut Vec<u32>) -> Vec<Range<usize>> {
    indices.sort_unstable();
    indices.dedup();

    // Byte offset of every char start, plus the end of the string
    let offsets: Vec<usize> =
        text.char_indices().map(|(offset, _)| offset).chain(std::iter::once(text.len())).collect();
    let char_count = offsets.len() - 1;

    let mut spans: Vec<Range<usize>> = Vec::new();
    let mut run: Option<Range<usize>> = None;

    for &idx in indices.iter() {
        let idx = idx as usize;
        if idx >= char_count {
            break;
        }
        run = match run {
            Some(current) if current.end == idx => Some(current.start..idx + 1),
            Some(current) => {
                spans.push(offsets[current.start]..offsets[current.end]);
                Some(idx..idx + 1)
            }
            None => Some(idx..idx + 1),
        };
    }
    if let Some(current) = run {
        spans.push(offsets[current.start]..offsets[current.end]);
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> FuzzyMatcher {
        FuzzyMatcher::new(FuzzyOptions::default())
    }

    #[test]
    fn test_contiguous_match_is_one_span() {
        let mut m = matcher();
        let pattern = m.pattern("git");
        let hit = m.match_field(&pattern, "GitHub").unwrap();
        assert_eq!(hit.spans, vec![0..3]);
    }

    #[test]
    fn test_scattered_match_spans_sorted_and_disjoint() {
        let mut m = matcher();
        let pattern = m.pattern("gh");
        let hit = m.match_field(&pattern, "GitHub").unwrap();
        assert!(!hit.spans.is_empty());
        for pair in hit.spans.windows(2) {
            assert!(pair[0].end < pair[1].start);
        }
        let matched: String = hit.spans.iter().map(|s| &"GitHub"[s.clone()]).collect();
        assert_eq!(matched.to_lowercase(), "gh");
    }

    #[test]
    fn test_no_match() {
        let mut m = matcher();
        let pattern = m.pattern("xyz");
        assert!(m.match_field(&pattern, "GitHub").is_none());
        assert!(m.match_field(&pattern, "").is_none());
    }

    #[test]
    fn test_unicode_spans_fall_on_char_boundaries() {
        let mut m = matcher();
        let text = "Über den Café";
        for query in ["caf", "fé", "ber"] {
            let pattern = m.pattern(query);
            let hit = m.match_field(&pattern, text).unwrap();
            for span in &hit.spans {
                assert!(text.is_char_boundary(span.start));
                assert!(text.is_char_boundary(span.end));
                assert!(span.end <= text.len());
            }
            let matched: String = hit.spans.iter().map(|s| &text[s.clone()]).collect();
            assert_eq!(matched.to_lowercase(), query);
        }
    }

    #[test]
    fn test_respect_case() {
        let options = FuzzyOptions { case_matching: CaseMode::Respect, ..FuzzyOptions::default() };
        let mut m = FuzzyMatcher::new(options);
        let pattern = m.pattern("github");
        assert!(m.match_field(&pattern, "GitHub").is_none());
    }

    #[test]
    fn test_char_indices_to_spans_merges_runs() {
        let mut indices = vec![4, 0, 1, 1, 5, 2, 9];
        assert_eq!(char_indices_to_spans("abcdefgh", &mut indices), vec![0..3, 4..6]);
    }
}
