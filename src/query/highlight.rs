use std::ops::Range;

/// A piece of field text, either inside a match span or between spans
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run<'a> {
    pub text: &'a str,
    pub matched: bool,
}

/// Split `text` into alternating unmatched and matched runs.
///
/// `spans` must be sorted, disjoint byte ranges on char boundaries, as produced
/// by the query engine. Spans reaching past the end of `text` are clipped.
/// Concatenating the runs yields `text` unchanged.
pub fn runs<'a>(text: &'a str, spans: &[Range<usize>]) -> Vec<Run<'a>> {
    let mut out = Vec::with_capacity(spans.len() * 2 + 1);
    let mut cursor = 0;

    for span in spans {
        let start = span.start.clamp(cursor, text.len());
        let end = span.end.clamp(start, text.len());
        if start > cursor {
            out.push(Run { text: &text[cursor..start], matched: false });
        }
        if end > start {
            out.push(Run { text: &text[start..end], matched: true });
        }
        cursor = end;
    }
    if cursor < text.len() {
        out.push(Run { text: &text[cursor..], matched: false });
    }

    out
}

/// Render `text` with every matched run wrapped in `open` / `close`
pub fn mark(text: &str, spans: &[Range<usize>], open: &str, close: &str) -> String {
    let mut out = String::with_capacity(text.len() + spans.len() * (open.len() + close.len()));
    for run in runs(text, spans) {
        if run.matched {
            out.push_str(open);
            out.push_str(run.text);
            out.push_str(close);
        } else {
            out.push_str(run.text);
        }
    }
    out
}
