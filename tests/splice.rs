//! Boundary-case tests for the fragment splicer.
//!
//! These pin the exact per-leaf emissions for spans that sit inside one
//! leaf, cross a leaf boundary, or swallow a whole leaf - the three shapes
//! that historically go wrong in offset-reconciliation code.

use symsearch::{highlight, splice, splice_markup, FragmentTree, Span, SpliceError};

fn marked(rewrites: &[symsearch::LeafRewrite], leaf: usize) -> Vec<(String, bool)> {
    rewrites
        .iter()
        .find(|r| r.leaf == leaf)
        .map(|r| {
            r.segments
                .iter()
                .map(|s| (s.text.clone(), s.highlighted))
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn test_span_fully_inside_one_leaf() {
    // "HelloWorld" with span (0,4) -> mark("Hello") + "World"
    let rewrites = splice(&["HelloWorld"], &[Span::new(0, 4)]).unwrap();
    assert_eq!(
        marked(&rewrites, 0),
        [("Hello".to_string(), true), ("World".to_string(), false)]
    );
}

#[test]
fn test_span_crossing_two_leaves() {
    // "Hel" | "loWorld" with span (0,4): leaf 0 fully marked, leaf 1
    // partially marked
    let rewrites = splice(&["Hel", "loWorld"], &[Span::new(0, 4)]).unwrap();
    assert_eq!(marked(&rewrites, 0), [("Hel".to_string(), true)]);
    assert_eq!(
        marked(&rewrites, 1),
        [("lo".to_string(), true), ("World".to_string(), false)]
    );
}

#[test]
fn test_span_spanning_whole_middle_leaf() {
    // Span (2,6) over "abc" | "def" | "ghi": touches the tail of leaf 0,
    // swallows leaf 1 entirely, and touches the head of leaf 2
    let rewrites = splice(&["abc", "def", "ghi"], &[Span::new(2, 6)]).unwrap();
    assert_eq!(
        marked(&rewrites, 0),
        [("ab".to_string(), false), ("c".to_string(), true)]
    );
    assert_eq!(marked(&rewrites, 1), [("def".to_string(), true)]);
    assert_eq!(
        marked(&rewrites, 2),
        [("g".to_string(), true), ("hi".to_string(), false)]
    );
}

#[test]
fn test_multiple_spans_across_boundaries() {
    // "one two" | " three fo" | "ur five": spans over "two" and "four"
    let leaves = ["one two", " three fo", "ur five"];
    let full: String = leaves.concat();
    assert_eq!(&full[4..7], "two");
    assert_eq!(&full[14..18], "four");

    let rewrites = splice(&leaves, &[Span::new(4, 6), Span::new(14, 17)]).unwrap();
    assert_eq!(
        marked(&rewrites, 0),
        [("one ".to_string(), false), ("two".to_string(), true)]
    );
    assert_eq!(
        marked(&rewrites, 1),
        [(" three ".to_string(), false), ("fo".to_string(), true)]
    );
    assert_eq!(
        marked(&rewrites, 2),
        [("ur".to_string(), true), (" five".to_string(), false)]
    );
}

#[test]
fn test_spans_from_highlighter_splice_cleanly() {
    // The end-to-end contract: spans computed against the plain text of a
    // fragment tree splice into its leaves without error or text loss
    let tree = FragmentTree::from_markup(
        "<p>Matches <code>camelCase</code> names and <em>plain</em> words.</p>",
    );
    let text = tree.text();
    let out = highlight(&text, "camel");
    assert!(!out.spans.is_empty());

    let html = tree.render_html(&out.spans).unwrap();
    assert!(html.contains("<mark"));
}

#[test]
fn test_out_of_range_span_is_fatal_contract_violation() {
    let err = splice(&["short"], &[Span::new(3, 9)]).unwrap_err();
    assert!(matches!(err, SpliceError::SpanOutOfRange { len: 5, .. }));
}

#[test]
fn test_descending_spans_rejected() {
    let err = splice(&["abcdefgh"], &[Span::new(4, 5), Span::new(0, 1)]).unwrap_err();
    assert_eq!(err, SpliceError::UnsortedSpans(1));
}

#[test]
fn test_splice_markup_end_to_end() {
    let markup = "<p>Serves <em>HTTP</em> requests.</p>";
    let plain = symsearch::plain_text(markup);
    let out = highlight(&plain, "http");
    let spliced = splice_markup(markup, &out.spans).unwrap();

    assert_eq!(
        spliced,
        format!(
            "<p>Serves <em>{}HTTP{}</em> requests.</p>",
            symsearch::highlight::MARK_OPEN,
            symsearch::highlight::MARK_CLOSE
        )
    );
    // Stripping the markers back out restores the rendered text
    assert_eq!(symsearch::plain_text(&spliced), plain);
}

#[test]
fn test_unicode_offsets_splice_by_chars() {
    // "café " is 5 chars; a span over "au" must not split the é's bytes
    let rewrites = splice(&["café ", "au lait"], &[Span::new(5, 6)]).unwrap();
    assert_eq!(
        marked(&rewrites, 1),
        [("au".to_string(), true), (" lait".to_string(), false)]
    );
}
