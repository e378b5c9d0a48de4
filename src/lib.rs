//! In-memory fuzzy symbol search with fragment-aware match highlighting.
//!
//! The crate indexes a small corpus of `{name, description}` records,
//! answers per-keystroke fuzzy queries ranked by relevance, and maps the
//! matched character spans back onto text that rendering has fragmented
//! across multiple adjacent leaves - so match markers can be spliced in
//! without corrupting the surrounding markup.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌─────────────┐
//! │ tokenize.rs │────▶│   index.rs   │────▶│  search.rs  │
//! │ (camel/word │     │ (build_index)│     │ (tiered     │
//! │  tokenizers)│     │              │     │  matching)  │
//! └─────────────┘     └──────────────┘     └──────┬──────┘
//!                                                 │ hits
//!                      ┌──────────────┐    ┌──────▼──────┐
//!                      │  splice.rs   │◀───│ highlight.rs│
//!                      │ (fragment    │    │ (spans +    │
//!                      │  splicer)    │    │  marked html)│
//!                      └──────▲───────┘    └─────────────┘
//!                             │
//!                      ┌──────┴───────┐
//!                      │  session.rs  │  readiness gating,
//!                      │              │  stale-query suppression
//!                      └──────────────┘
//! ```
//!
//! `source.rs` feeds the pipeline (markup blob or fetched document, one
//! contract) and `filter.rs` turns hits into section/item visibility
//! decisions.
//!
//! # Usage
//!
//! ```
//! use symsearch::{CorpusSource, QueryOutcome, SearchSession, SessionConfig};
//!
//! let markup = r#"
//!   <div class="section" id="fns">
//!     <div class="namespaceItem" data-name="HTTPServer">
//!       <div class="markdown_summary"><p>Serves requests.</p></div>
//!     </div>
//!   </div>"#;
//!
//! let mut session = SearchSession::build(
//!     CorpusSource::Inline(markup.to_string()),
//!     SessionConfig::default(),
//! );
//! assert!(session.is_ready());
//!
//! let QueryOutcome::Active(results) = session.query("server") else {
//!     panic!("index is ready, term is non-empty");
//! };
//! assert_eq!(results.hits.len(), 1);
//! ```

pub mod error;
pub mod filter;
pub mod highlight;
pub mod index;
pub mod scoring;
pub mod search;
pub mod session;
pub mod source;
pub mod splice;
pub mod testing;
pub mod tokenize;
pub mod types;
pub mod utils;

// Re-exports for the public API
pub use error::{Error, IndexError, Result, SourceError, SpliceError};
pub use filter::{filter_visible, Section, SectionVisibility};
pub use highlight::{highlight, highlight_with_threshold, merge_spans, Highlighted};
pub use index::build_index;
pub use scoring::{field_weight, position_bonus, MatchTier, MAX_EDITS};
pub use search::{search, SearchOptions};
pub use session::{HighlightOutput, QueryOutcome, QueryResults, SearchSession, SessionConfig};
pub use source::{
    corpus_from_json, corpus_from_markup, load_corpus, plain_text, Corpus, CorpusFetch,
    CorpusSource,
};
pub use splice::{splice, splice_markup, FragmentTree, LeafRewrite, Segment};
pub use tokenize::{is_stop_word, normalize, tokenize, Token};
pub use types::{Field, Hit, Record, RecordId, SearchIndex, Span};

#[cfg(test)]
mod tests {
    //! End-to-end smoke tests across the whole pipeline.

    use super::*;
    use crate::testing::corpus_markup;

    #[test]
    fn test_markup_to_spliced_highlight() {
        let mut session = SearchSession::build(
            CorpusSource::Inline(corpus_markup()),
            SessionConfig::default(),
        );
        assert!(session.is_ready());

        let QueryOutcome::Active(results) = session.query("http") else {
            panic!("expected an active query");
        };
        let top = results.hits.first().expect("http should match");
        let index = session.index().unwrap();
        assert_eq!(index.record(top.record_id).unwrap().name, "HTTPServer");

        let out = session
            .highlight_for(results.seq, "HTTPServer", "http")
            .unwrap();
        // The span lands exactly on the <em> fragment's text in the markup
        assert!(out.markup.contains("<mark"));
        assert_eq!(
            plain_text(&out.markup),
            "Serves HTTP requests.",
            "splicing must preserve the rendered text"
        );
    }

    #[test]
    fn test_highlighter_and_splicer_agree_on_offsets() {
        let description = "Serves HTTP requests.";
        let spans = highlight(description, "http").spans;
        let tree = FragmentTree::from_markup("<p>Serves <em>HTTP</em> requests.</p>");
        assert_eq!(tree.text(), description);
        // Spans computed on the plain string apply cleanly to the tree
        assert!(tree.render_html(&spans).is_ok());
    }
}
