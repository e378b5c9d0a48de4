//! Per-string match highlighting.
//!
//! Given a source string and a query term, compute the matched character
//! spans and an HTML-escaped copy with each span wrapped in a `<mark>`.
//! The spans are offsets into the **original unescaped** string - the
//! fragment splicer consumes raw text, not escaped HTML.
//!
//! # Invariants
//!
//! - Spans are sorted ascending and non-overlapping (overlapping candidates
//!   merge into their union).
//! - Zero matches → empty spans, `html` equals the escaped input.
//! - Deterministic for identical inputs.

use crate::scoring::MatchTier;
use crate::search::{match_tier, SearchOptions};
use crate::tokenize::{normalize, word_tokens, Token};
use crate::types::Span;
use crate::utils::{char_len, char_slice, escape_html};

/// The marker element wrapped around every matched span.
pub const MARK_OPEN: &str = "<mark class=\"search-highlight\">";
pub const MARK_CLOSE: &str = "</mark>";

/// A highlighted rendering of one string.
#[derive(Debug, Clone, PartialEq)]
pub struct Highlighted {
    /// HTML-escaped copy of the input with spans wrapped in `<mark>`.
    pub html: String,
    /// Matched spans against the original unescaped input, ascending and
    /// non-overlapping.
    pub spans: Vec<Span>,
}

/// Highlight `term` inside `text` with the default fuzzy threshold.
pub fn highlight(text: &str, term: &str) -> Highlighted {
    highlight_with_threshold(text, term, SearchOptions::default().threshold)
}

/// Highlight with an explicit threshold (the same scale as search).
///
/// Case-insensitive, best-effort: each word of `text` is checked against
/// each query token with the exact/prefix/fuzzy tiers, plus an
/// inside-the-word substring tier so camel-case fragments light up
/// ("server" inside "HTTPServer"). Exact and fuzzy matches cover the whole
/// word, prefix matches cover the matched prefix, substring matches cover
/// the embedded occurrence.
pub fn highlight_with_threshold(text: &str, term: &str, threshold: f64) -> Highlighted {
    let normalized = normalize(term);
    let parts: Vec<&str> = normalized.split(' ').filter(|p| !p.is_empty()).collect();
    if parts.is_empty() {
        return Highlighted {
            html: escape_html(text),
            spans: Vec::new(),
        };
    }

    // Stopwords stay in: the scan runs against visible text, and hiding a
    // match because the word is common would look like a rendering bug.
    let tokens = word_tokens(text, false);
    let mut candidates: Vec<Span> = Vec::new();

    for token in &tokens {
        for part in &parts {
            if let Some(span) = token_span(token, part, threshold) {
                candidates.push(span);
            }
        }
    }

    let spans = merge_spans(candidates);
    Highlighted {
        html: render_marked(text, &spans),
        spans,
    }
}

/// The span covered by `part` matching `token`, if it matches.
fn token_span(token: &Token, part: &str, threshold: f64) -> Option<Span> {
    let part_chars = char_len(part);
    if let Some(tier) = match_tier(part, &token.text, threshold) {
        let span = match tier {
            // Whole word matched (exactly, or near enough)
            MatchTier::Exact | MatchTier::Fuzzy(_) => {
                Span::new(token.start, token.start + token.chars - 1)
            }
            // Only the typed prefix matched; don't overclaim the rest
            MatchTier::Prefix => Span::new(token.start, token.start + part_chars - 1),
        };
        return Some(span);
    }
    // Substring tier: the query names a fragment in the middle of the word
    if threshold > 0.0 && part_chars > 0 {
        if let Some(inner) = find_char_offset(&token.text, part) {
            let start = token.start + inner;
            return Some(Span::new(start, start + part_chars - 1));
        }
    }
    None
}

/// Character offset of the first occurrence of `needle` in `haystack`.
fn find_char_offset(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .find(needle)
        .map(|byte_idx| haystack[..byte_idx].chars().count())
}

/// Collapse candidate spans into a sorted, non-overlapping set, merging
/// overlaps into their union.
pub fn merge_spans(mut candidates: Vec<Span>) -> Vec<Span> {
    if candidates.is_empty() {
        return candidates;
    }
    candidates.sort_by_key(|s| (s.start, s.end));

    let mut merged: Vec<Span> = Vec::with_capacity(candidates.len());
    let mut current = candidates[0];
    for span in candidates.into_iter().skip(1) {
        if span.start <= current.end {
            current.end = current.end.max(span.end);
        } else {
            merged.push(current);
            current = span;
        }
    }
    merged.push(current);
    merged
}

/// Escape `text` and wrap each span in the marker element.
fn render_marked(text: &str, spans: &[Span]) -> String {
    let total = char_len(text);
    let mut html = String::with_capacity(text.len() + spans.len() * 40);
    let mut cursor = 0;

    for span in spans {
        if cursor < span.start {
            html.push_str(&escape_html(char_slice(text, cursor, span.start)));
        }
        html.push_str(MARK_OPEN);
        html.push_str(&escape_html(char_slice(text, span.start, span.end + 1)));
        html.push_str(MARK_CLOSE);
        cursor = span.end + 1;
    }
    if cursor < total {
        html.push_str(&escape_html(char_slice(text, cursor, total)));
    }

    html
}
