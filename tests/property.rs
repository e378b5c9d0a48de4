//! Property-based tests using proptest.
//!
//! These verify the engine's structural invariants for randomly generated
//! inputs: the splicer never alters rendered text, tokenization is
//! idempotent, highlight spans are always well-formed, and ranking is
//! reproducible.

mod common;

use proptest::prelude::*;
use symsearch::{
    build_index, highlight, search, splice, Field, Record, SearchOptions, Span,
};

// ============================================================================
// STRATEGIES
// ============================================================================

/// Random word-like strings.
fn word_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9]{2,8}").unwrap()
}

/// Random description text (multiple words).
fn description_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(word_strategy(), 1..8).prop_map(|words| words.join(" "))
}

/// Random camel-case symbol names.
fn name_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::string::string_regex("[A-Z][a-z]{1,6}").unwrap(), 1..4)
        .prop_map(|pieces| pieces.concat())
}

/// A random corpus with unique names.
fn corpus_strategy() -> impl Strategy<Value = Vec<Record>> {
    prop::collection::vec((name_strategy(), description_strategy()), 1..6).prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .map(|(i, (name, description))| common::make_record(&format!("{name}{i}"), &description))
            .collect()
    })
}

/// Random leaf sequences, empty leaves included.
fn leaves_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop::string::string_regex("[a-zA-Z ]{0,8}").unwrap(), 1..6)
}

/// Ascending, non-overlapping spans within a string of `total` characters.
///
/// Sorted unique cut points are consumed pairwise: `(p0,p1), (p2,p3), ...`
/// which is ascending and non-overlapping by construction.
fn spans_for(total: usize) -> impl Strategy<Value = Vec<Span>> {
    prop::collection::vec(0..total.max(1), 0..8).prop_map(move |mut points| {
        if total == 0 {
            return Vec::new();
        }
        points.sort_unstable();
        points.dedup();
        points
            .chunks_exact(2)
            .map(|pair| Span::new(pair[0], pair[1]))
            .collect()
    })
}

fn leaves_and_spans() -> impl Strategy<Value = (Vec<String>, Vec<Span>)> {
    leaves_strategy().prop_flat_map(|leaves| {
        let total: usize = leaves.iter().map(|l| l.chars().count()).sum();
        let spans = spans_for(total);
        (Just(leaves), spans)
    })
}

// ============================================================================
// SPLICER
// ============================================================================

proptest! {
    /// Plain-text concatenation of the splice output equals the input,
    /// for every leaf sequence and every valid span set.
    #[test]
    fn prop_splice_preserves_text((leaves, spans) in leaves_and_spans()) {
        let rewrites = splice(&leaves, &spans).expect("generated spans are valid");

        let mut rebuilt = String::new();
        let mut by_leaf = std::collections::HashMap::new();
        for rewrite in &rewrites {
            by_leaf.insert(rewrite.leaf, rewrite);
        }
        for (i, leaf) in leaves.iter().enumerate() {
            match by_leaf.get(&i) {
                Some(rewrite) => {
                    for segment in &rewrite.segments {
                        rebuilt.push_str(&segment.text);
                    }
                }
                None => rebuilt.push_str(leaf),
            }
        }

        prop_assert_eq!(rebuilt, leaves.concat());
    }

    /// Every rewrite contains at least one highlighted segment, and each
    /// rewritten leaf's segments spell out exactly that leaf.
    #[test]
    fn prop_splice_rewrites_are_leaf_local((leaves, spans) in leaves_and_spans()) {
        let rewrites = splice(&leaves, &spans).expect("generated spans are valid");
        for rewrite in &rewrites {
            prop_assert!(rewrite.segments.iter().any(|s| s.highlighted));
            let spelled: String = rewrite
                .segments
                .iter()
                .map(|s| s.text.as_str())
                .collect();
            prop_assert_eq!(&spelled, &leaves[rewrite.leaf]);
        }
    }

    /// Total highlighted characters equal total span coverage.
    #[test]
    fn prop_splice_marks_exactly_span_chars((leaves, spans) in leaves_and_spans()) {
        let rewrites = splice(&leaves, &spans).expect("generated spans are valid");
        let marked: usize = rewrites
            .iter()
            .flat_map(|r| &r.segments)
            .filter(|s| s.highlighted)
            .map(|s| s.text.chars().count())
            .sum();
        let covered: usize = spans.iter().map(Span::len).sum();
        prop_assert_eq!(marked, covered);
    }
}

// ============================================================================
// TOKENIZER
// ============================================================================

proptest! {
    /// Tokenizing each produced token again yields the token itself.
    #[test]
    fn prop_description_tokenize_idempotent(text in description_strategy()) {
        for token in symsearch::tokenize(&text, Field::Description) {
            let again = symsearch::tokenize(&token.text, Field::Description);
            prop_assert_eq!(again.len(), 1);
            prop_assert_eq!(&again[0].text, &token.text);
        }
    }

    #[test]
    fn prop_name_tokenize_idempotent(name in name_strategy()) {
        for token in symsearch::tokenize(&name, Field::Name) {
            let again = symsearch::tokenize(&token.text, Field::Name);
            prop_assert_eq!(again.len(), 1);
            prop_assert_eq!(&again[0].text, &token.text);
        }
    }

    /// Tokens are lowercase and carry in-bounds offsets.
    #[test]
    fn prop_tokens_are_normalized(text in description_strategy()) {
        let total = text.chars().count();
        for token in symsearch::tokenize(&text, Field::Description) {
            prop_assert!(token.text.chars().all(|c| !c.is_uppercase()));
            prop_assert!(token.start + token.chars <= total);
        }
    }
}

// ============================================================================
// HIGHLIGHTER
// ============================================================================

proptest! {
    /// Spans are sorted ascending, non-overlapping, and in bounds; and the
    /// splicer accepts them against the very string they were computed on.
    #[test]
    fn prop_highlight_spans_well_formed(
        text in description_strategy(),
        term in word_strategy(),
    ) {
        let out = highlight(&text, &term);
        let total = text.chars().count();

        let mut prev_end: Option<usize> = None;
        for span in &out.spans {
            prop_assert!(span.start <= span.end);
            prop_assert!(span.end < total);
            if let Some(prev) = prev_end {
                prop_assert!(span.start > prev);
            }
            prev_end = Some(span.end);
        }

        // Contract with the splicer: the whole string as a single leaf
        prop_assert!(splice(&[text.as_str()], &out.spans).is_ok());
    }

    /// Identical inputs produce identical output.
    #[test]
    fn prop_highlight_deterministic(
        text in description_strategy(),
        term in word_strategy(),
    ) {
        prop_assert_eq!(highlight(&text, &term), highlight(&text, &term));
    }
}

// ============================================================================
// RANKING
// ============================================================================

proptest! {
    /// Identical corpus and term produce identical ordered hit lists.
    #[test]
    fn prop_search_deterministic(records in corpus_strategy(), term in word_strategy()) {
        let index_a = build_index(records.clone()).unwrap();
        let index_b = build_index(records).unwrap();
        let options = SearchOptions::default();
        prop_assert_eq!(
            search(&index_a, &term, &options),
            search(&index_b, &term, &options)
        );
    }

    /// Hit scores are sorted descending, ties by record order.
    #[test]
    fn prop_hits_ranked(records in corpus_strategy(), term in word_strategy()) {
        let index = build_index(records).unwrap();
        let hits = search(&index, &term, &SearchOptions::default());
        for pair in hits.windows(2) {
            prop_assert!(
                pair[0].score > pair[1].score
                    || (pair[0].score == pair[1].score
                        && pair[0].record_id < pair[1].record_id)
            );
        }
    }
}
