//! The search session: index ownership, readiness gating, and stale-query
//! suppression.
//!
//! One session per rendered document. It owns the index (read-only after
//! build), the latest query sequence number, and the currently-rendered
//! markup snapshot per record. Queries are rejected while the corpus is
//! loading or after it failed; highlight results are discarded unless they
//! carry the latest sequence number, so out-of-order completions can never
//! flicker stale marks onto the page (last writer wins).

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, warn};

use crate::error::SourceError;
use crate::filter::{filter_visible, Section, SectionVisibility};
use crate::highlight::{highlight_with_threshold, Highlighted};
use crate::index::build_index;
use crate::search::{search, SearchOptions};
use crate::source::{load_corpus, Corpus, CorpusSource};
use crate::splice::splice_markup;
use crate::types::{Hit, SearchIndex};

/// Session-wide configuration, fixed at creation.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    pub options: SearchOptions,
}

enum SessionState {
    /// Corpus not yet supplied; queries are rejected, not queued.
    Pending,
    Ready(SearchIndex),
    /// Corpus acquisition or indexing failed; "index unavailable".
    Failed(SourceError),
}

/// Outcome of one query against the session.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// The index is not ready (still pending, or failed). The host should
    /// keep its input disabled.
    NotReady,
    /// Empty term: no query active, every item visible, highlights cleared.
    Inactive,
    Active(QueryResults),
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryResults {
    /// Monotonically increasing stamp; pass it back to
    /// [`SearchSession::apply_highlights`] so stale passes get dropped.
    pub seq: u64,
    pub hits: Vec<Hit>,
    pub sections: Vec<SectionVisibility>,
}

/// Scoped owner of one document's search state. Created when the document
/// renders, dropped when the host navigates away.
pub struct SearchSession {
    state: SessionState,
    config: SessionConfig,
    sections: Vec<Section>,
    /// Latest issued query sequence number; 0 means "no query yet".
    seq: u64,
    /// True between a non-empty query and the next empty one.
    active: bool,
    /// Currently rendered description markup per record name - the
    /// fragment-tree snapshot the latest completed query owns.
    rendered: HashMap<String, String>,
}

impl SearchSession {
    /// A session waiting for its corpus. Queries return
    /// [`QueryOutcome::NotReady`] until [`attach_corpus`] succeeds.
    ///
    /// [`attach_corpus`]: SearchSession::attach_corpus
    pub fn new(config: SessionConfig) -> Self {
        SearchSession {
            state: SessionState::Pending,
            config,
            sections: Vec::new(),
            seq: 0,
            active: false,
            rendered: HashMap::new(),
        }
    }

    /// Build a session straight from a corpus source. Failure is recorded,
    /// not returned: the session exists either way and reports readiness
    /// through [`is_ready`](SearchSession::is_ready).
    pub fn build(source: CorpusSource, config: SessionConfig) -> Self {
        let mut session = SearchSession::new(config);
        session.attach_corpus(source);
        session
    }

    /// Supply the corpus (the bulk load the host awaited). On success the
    /// session becomes ready; on failure it reports "index unavailable"
    /// and keeps rejecting queries. A partially built index is never
    /// exposed.
    pub fn attach_corpus(&mut self, source: CorpusSource) {
        match load_corpus(source) {
            Ok(Corpus { records, sections }) => match build_index(records) {
                Ok(index) => {
                    self.rendered = index
                        .records()
                        .iter()
                        .map(|r| (r.name.clone(), r.description_markup.clone()))
                        .collect();
                    self.sections = sections;
                    self.state = SessionState::Ready(index);
                    debug!("session ready");
                }
                Err(e) => {
                    warn!(error = %e, "index build failed");
                    self.state =
                        SessionState::Failed(SourceError::Malformed(e.to_string()));
                }
            },
            Err(e) => {
                warn!(error = %e, "corpus unavailable");
                self.state = SessionState::Failed(e);
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, SessionState::Ready(_))
    }

    /// The failure that made the index unavailable, if any.
    pub fn last_error(&self) -> Option<&SourceError> {
        match &self.state {
            SessionState::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn index(&self) -> Option<&SearchIndex> {
        match &self.state {
            SessionState::Ready(index) => Some(index),
            _ => None,
        }
    }

    /// Is a query currently filtering the view? Gates which top-level
    /// container (original vs. filtered) the host shows.
    pub fn has_active_query(&self) -> bool {
        self.active
    }

    /// Execute one keystroke's term.
    ///
    /// Every call - including an empty term - advances the sequence
    /// number, so splice passes still in flight for the previous term
    /// become stale immediately.
    pub fn query(&mut self, term: &str) -> QueryOutcome {
        let SessionState::Ready(index) = &self.state else {
            return QueryOutcome::NotReady;
        };

        self.seq += 1;

        if term.trim().is_empty() {
            // No query active: restore every record's original markup
            self.active = false;
            self.rendered = index
                .records()
                .iter()
                .map(|r| (r.name.clone(), r.description_markup.clone()))
                .collect();
            return QueryOutcome::Inactive;
        }

        self.active = true;
        let hits = search(index, term, &self.config.options);
        let matched: BTreeSet<String> = hits
            .iter()
            .filter_map(|h| index.record(h.record_id))
            .map(|r| r.name.clone())
            .collect();
        let sections = filter_visible(&self.sections, Some(&matched));

        QueryOutcome::Active(QueryResults {
            seq: self.seq,
            hits,
            sections,
        })
    }

    /// Highlight one hit record for the query stamped `seq`: the name's
    /// escaped-and-marked HTML, plus the description markup with the
    /// matched spans spliced in. Returns `None` if the record is unknown,
    /// the stamp is stale, or the session is not ready - a stale pass must
    /// produce no DOM effects at all.
    pub fn highlight_for(&self, seq: u64, name: &str, term: &str) -> Option<HighlightOutput> {
        if seq != self.seq {
            debug!(seq, latest = self.seq, "discarding stale highlight pass");
            return None;
        }
        let index = self.index()?;
        let (_, record) = index.record_by_name(name)?;

        let threshold = self.config.options.threshold;
        let name_html = highlight_with_threshold(&record.name, term, threshold).html;
        let Highlighted { spans, .. } =
            highlight_with_threshold(&record.description, term, threshold);
        // Spans come from the highlighter against this very description, so
        // splicing them into its markup cannot go out of range.
        let markup = splice_markup(&record.description_markup, &spans).ok()?;

        Some(HighlightOutput {
            name_html,
            spans,
            markup,
        })
    }

    /// Commit a highlight pass to the rendered snapshot. Returns false -
    /// and changes nothing - when `seq` is not the latest (last writer
    /// wins on the visible result set).
    pub fn apply_highlights(&mut self, seq: u64, name: &str, markup: String) -> bool {
        if seq != self.seq {
            return false;
        }
        match self.rendered.get_mut(name) {
            Some(slot) => {
                *slot = markup;
                true
            }
            None => false,
        }
    }

    /// The currently rendered markup for a record.
    pub fn rendered(&self, name: &str) -> Option<&str> {
        self.rendered.get(name).map(String::as_str)
    }
}

/// One record's worth of highlight output, ready for the host to render.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightOutput {
    /// Escaped name with matches marked.
    pub name_html: String,
    /// Spans against the plain description, ascending and non-overlapping.
    pub spans: Vec<crate::types::Span>,
    /// Description markup with the spans spliced in.
    pub markup: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use crate::testing::corpus_markup;

    fn ready_session() -> SearchSession {
        SearchSession::build(
            CorpusSource::Inline(corpus_markup()),
            SessionConfig::default(),
        )
    }

    #[test]
    fn test_pending_session_rejects_queries() {
        let mut session = SearchSession::new(SessionConfig::default());
        assert!(!session.is_ready());
        assert_eq!(session.query("server"), QueryOutcome::NotReady);
    }

    #[test]
    fn test_failed_corpus_reports_unavailable() {
        let source = CorpusSource::Remote(Box::new(|| {
            Err(SourceError::Unavailable("503".to_string()))
        }));
        let mut session = SearchSession::build(source, SessionConfig::default());
        assert!(!session.is_ready());
        assert!(matches!(
            session.last_error(),
            Some(SourceError::Unavailable(_))
        ));
        assert_eq!(session.query("server"), QueryOutcome::NotReady);
    }

    #[test]
    fn test_empty_term_is_inactive() {
        let mut session = ready_session();
        assert_eq!(session.query(""), QueryOutcome::Inactive);
        assert!(!session.has_active_query());
    }

    #[test]
    fn test_query_returns_hits_and_visibility() {
        let mut session = ready_session();
        let QueryOutcome::Active(results) = session.query("server") else {
            panic!("expected an active query");
        };
        assert!(!results.hits.is_empty());
        assert!(results.sections.iter().any(|s| s.visible));
    }

    #[test]
    fn test_stale_highlight_pass_is_discarded() {
        let mut session = ready_session();

        let QueryOutcome::Active(first) = session.query("server") else {
            panic!("expected an active query");
        };
        let stale = session
            .highlight_for(first.seq, "HTTPServer", "server")
            .expect("fresh pass should produce output");

        // A newer keystroke arrives before the first pass is applied
        let QueryOutcome::Active(second) = session.query("serve") else {
            panic!("expected an active query");
        };

        // The stale pass must not land...
        assert!(session.highlight_for(first.seq, "HTTPServer", "server").is_none());
        assert!(!session.apply_highlights(first.seq, "HTTPServer", stale.markup));

        // ...and the fresh one must
        let fresh = session
            .highlight_for(second.seq, "HTTPServer", "serve")
            .unwrap();
        assert!(session.apply_highlights(second.seq, "HTTPServer", fresh.markup.clone()));
        assert_eq!(session.rendered("HTTPServer"), Some(fresh.markup.as_str()));
    }

    #[test]
    fn test_empty_term_restores_original_markup() {
        let mut session = ready_session();
        let QueryOutcome::Active(results) = session.query("server") else {
            panic!("expected an active query");
        };
        let out = session
            .highlight_for(results.seq, "HTTPServer", "server")
            .unwrap();
        session.apply_highlights(results.seq, "HTTPServer", out.markup);
        assert!(session.has_active_query());

        assert_eq!(session.query(""), QueryOutcome::Inactive);
        assert!(!session.has_active_query());
        let index = session.index().unwrap();
        let (_, record) = index.record_by_name("HTTPServer").unwrap();
        assert_eq!(
            session.rendered("HTTPServer"),
            Some(record.description_markup.as_str())
        );
    }

    #[test]
    fn test_highlight_output_marks_name_and_description() {
        let mut session = ready_session();
        let QueryOutcome::Active(results) = session.query("server") else {
            panic!("expected an active query");
        };
        let out = session
            .highlight_for(results.seq, "HTTPServer", "server")
            .unwrap();
        assert!(out.name_html.contains("<mark"));
        assert!(out.markup.contains("<mark"));
        assert!(!out.spans.is_empty());
    }
}
