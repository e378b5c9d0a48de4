//! The fragment splicer: mapping flat match spans back onto fragmented text.
//!
//! Rendered markup breaks a string across many adjacent text leaves. Match
//! spans are computed against the plain concatenation of those leaves, so
//! wrapping them in markers means translating flat offsets into per-leaf
//! edits - including spans that start in one leaf and end in a later one.
//! This is the most error-prone part of the engine; every branch below is
//! pinned by a boundary-case test.
//!
//! # Contract
//!
//! - Input: ordered leaves plus ascending, non-overlapping spans
//!   (closed-inclusive ends, character offsets into the concatenation).
//! - Output: a rewrite plan touching exactly the leaves a span intersects.
//! - Guarantee: concatenating the plain text of the output, ignoring
//!   highlight boundaries, reproduces the input character for character.
//! - A span past the end of the concatenation is a programming error
//!   between highlighter and splicer and fails loudly.

use crate::error::SpliceError;
use crate::types::Span;
use crate::utils::{char_len, char_slice, escape_html};

/// One run of leaf text, highlighted or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub highlighted: bool,
}

impl Segment {
    fn plain(text: &str) -> Self {
        Segment {
            text: text.to_string(),
            highlighted: false,
        }
    }

    fn marked(text: &str) -> Self {
        Segment {
            text: text.to_string(),
            highlighted: true,
        }
    }
}

/// Replacement for one leaf: an ordered run of segments whose concatenated
/// text equals the leaf's original text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafRewrite {
    /// Index of the leaf in the input sequence.
    pub leaf: usize,
    pub segments: Vec<Segment>,
}

/// Compute the rewrite plan wrapping `spans` in highlight markers across
/// `leaves`. Leaves untouched by any span get no rewrite entry.
pub fn splice<S: AsRef<str>>(leaves: &[S], spans: &[Span]) -> Result<Vec<LeafRewrite>, SpliceError> {
    let total: usize = leaves.iter().map(|l| char_len(l.as_ref())).sum();
    validate_spans(spans, total)?;

    let mut rewrites = Vec::new();
    let mut span_iter = spans.iter().copied().peekable();
    // Start offset of the current leaf within the logical string
    let mut cursor = 0;

    for (leaf_idx, leaf) in leaves.iter().enumerate() {
        let leaf = leaf.as_ref();
        let len = char_len(leaf);
        if len == 0 {
            continue; // empty leaves carry no span range
        }
        let leaf_end = cursor + len; // exclusive
        let mut segments: Vec<Segment> = Vec::new();
        // Local position within this leaf, in chars
        let mut pos = 0;

        while let Some(span) = span_iter.peek().copied() {
            if span.start >= leaf_end {
                break; // span belongs to a later leaf
            }

            // Where the highlight begins inside this leaf: at the span's
            // local start, or at the leaf's start if the span opened earlier.
            let local_start = span.start.saturating_sub(cursor);
            if local_start > pos {
                segments.push(Segment::plain(char_slice(leaf, pos, local_start)));
            }

            // Closed-inclusive span end, clamped to this leaf
            let local_end = (span.end - cursor + 1).min(len);
            segments.push(Segment::marked(char_slice(leaf, local_start, local_end)));
            pos = local_end;

            if span.end < leaf_end {
                // Span resolved inside this leaf; the next span may still
                // touch the remainder of the same leaf.
                span_iter.next();
            } else {
                // Span continues into a later leaf; keep it pending and
                // stop processing this leaf (spans are non-overlapping, so
                // nothing else can start here).
                break;
            }
        }

        if !segments.is_empty() {
            if pos < len {
                segments.push(Segment::plain(char_slice(leaf, pos, len)));
            }
            rewrites.push(LeafRewrite {
                leaf: leaf_idx,
                segments,
            });
        }

        cursor = leaf_end;
    }

    Ok(rewrites)
}

fn validate_spans(spans: &[Span], total: usize) -> Result<(), SpliceError> {
    let mut prev_end: Option<usize> = None;
    for (i, span) in spans.iter().enumerate() {
        if span.start > span.end {
            return Err(SpliceError::UnsortedSpans(i));
        }
        if let Some(prev) = prev_end {
            if span.start <= prev {
                return Err(SpliceError::UnsortedSpans(i));
            }
        }
        if span.end >= total {
            return Err(SpliceError::SpanOutOfRange {
                start: span.start,
                end: span.end,
                len: total,
            });
        }
        prev_end = Some(span.end);
    }
    Ok(())
}

// =============================================================================
// FRAGMENT TREES
// =============================================================================

/// An ordered sequence of text leaves inside a fixed structural skeleton.
///
/// Element boundaries are never text; only leaves carry characters. The
/// logical string is the concatenation of leaf texts in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentTree {
    leaves: Vec<String>,
}

impl FragmentTree {
    pub fn new(leaves: Vec<String>) -> Self {
        FragmentTree { leaves }
    }

    /// Leaves extracted from a markup blob: every text run between tags,
    /// entities decoded. The skeleton (the tags) is not retained here;
    /// [`splice_markup`] preserves it when rewriting a full blob.
    pub fn from_markup(markup: &str) -> Self {
        let leaves = markup_parts(markup)
            .into_iter()
            .filter_map(|part| match part {
                MarkupPart::Text { decoded, .. } => Some(decoded),
                MarkupPart::Tag(_) => None,
            })
            .collect();
        FragmentTree { leaves }
    }

    pub fn leaves(&self) -> &[String] {
        &self.leaves
    }

    /// The logical string the leaves spell out.
    pub fn text(&self) -> String {
        self.leaves.concat()
    }

    /// Apply a rewrite plan, yielding the segment runs for every leaf.
    /// Untouched leaves come back as a single plain segment.
    pub fn apply(&self, rewrites: &[LeafRewrite]) -> Vec<Vec<Segment>> {
        let mut out: Vec<Vec<Segment>> = self
            .leaves
            .iter()
            .map(|leaf| vec![Segment::plain(leaf)])
            .collect();
        for rewrite in rewrites {
            if let Some(slot) = out.get_mut(rewrite.leaf) {
                *slot = rewrite.segments.clone();
            }
        }
        out
    }

    /// Splice `spans` and render the whole tree as escaped HTML with
    /// markers, leaf boundaries dissolved.
    pub fn render_html(&self, spans: &[Span]) -> Result<String, SpliceError> {
        let rewrites = splice(&self.leaves, spans)?;
        let mut html = String::new();
        for run in self.apply(&rewrites) {
            for segment in run {
                push_segment_html(&mut html, &segment);
            }
        }
        Ok(html)
    }
}

// =============================================================================
// MARKUP SPLICING
// =============================================================================

/// One piece of a markup blob: a tag (kept verbatim) or a text run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MarkupPart {
    Tag(String),
    Text { raw: String, decoded: String },
}

/// Split a markup blob into tags and text runs. No nesting analysis - the
/// splicer only needs to know which characters render as text.
pub(crate) fn markup_parts(markup: &str) -> Vec<MarkupPart> {
    let mut parts = Vec::new();
    let mut rest = markup;

    while !rest.is_empty() {
        match rest.find('<') {
            Some(0) => {
                let end = rest.find('>').map_or(rest.len(), |i| i + 1);
                parts.push(MarkupPart::Tag(rest[..end].to_string()));
                rest = &rest[end..];
            }
            Some(idx) => {
                let raw = &rest[..idx];
                parts.push(MarkupPart::Text {
                    raw: raw.to_string(),
                    decoded: crate::utils::unescape_html(raw),
                });
                rest = &rest[idx..];
            }
            None => {
                parts.push(MarkupPart::Text {
                    raw: rest.to_string(),
                    decoded: crate::utils::unescape_html(rest),
                });
                rest = "";
            }
        }
    }

    parts
}

/// Rewrite a markup blob so every span is wrapped in a highlight marker.
///
/// Spans are character offsets into the blob's plain text (the decoded
/// concatenation of its text runs) - exactly what [`crate::highlight`]
/// produces against a record's `description`. Tags pass through verbatim;
/// only the text runs a span touches are re-emitted, re-escaped.
pub fn splice_markup(markup: &str, spans: &[Span]) -> Result<String, SpliceError> {
    let parts = markup_parts(markup);
    let leaves: Vec<&str> = parts
        .iter()
        .filter_map(|p| match p {
            MarkupPart::Text { decoded, .. } => Some(decoded.as_str()),
            MarkupPart::Tag(_) => None,
        })
        .collect();

    let rewrites = splice(&leaves, spans)?;
    let mut by_leaf: std::collections::HashMap<usize, &LeafRewrite> =
        rewrites.iter().map(|r| (r.leaf, r)).collect();

    let mut out = String::with_capacity(markup.len() + spans.len() * 40);
    let mut leaf_idx = 0;
    for part in &parts {
        match part {
            MarkupPart::Tag(tag) => out.push_str(tag),
            MarkupPart::Text { raw, .. } => {
                match by_leaf.remove(&leaf_idx) {
                    Some(rewrite) => {
                        for segment in &rewrite.segments {
                            push_segment_html(&mut out, segment);
                        }
                    }
                    None => out.push_str(raw),
                }
                leaf_idx += 1;
            }
        }
    }

    Ok(out)
}

fn push_segment_html(out: &mut String, segment: &Segment) {
    if segment.highlighted {
        out.push_str(crate::highlight::MARK_OPEN);
        out.push_str(&escape_html(&segment.text));
        out.push_str(crate::highlight::MARK_CLOSE);
    } else {
        out.push_str(&escape_html(&segment.text));
    }
}
