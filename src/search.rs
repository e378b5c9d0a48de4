//! Query execution and result ranking.
//!
//! Each query token is matched against the sorted vocabulary in three
//! tiers - exact, prefix, bounded-Levenshtein fuzzy - and scored per
//! posting. Multi-token queries intersect: a record must match every token,
//! taking the maximum posting score per token and summing across tokens.
//!
//! Ranking is deterministic by construction: the vocabulary scan runs in
//! sorted order, per-record scores accumulate in that fixed order, and ties
//! break by [`RecordId`] (stable record order).

pub mod levenshtein;

use std::collections::{BTreeSet, HashMap};

use tracing::trace;

use crate::scoring::{posting_score, MatchTier, MAX_EDITS};
use crate::tokenize::normalize;
use crate::types::{Field, Hit, RecordId, SearchIndex};

use levenshtein::bounded_distance;

/// Fixed, explicit query configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    /// Fields to match against.
    pub fields: BTreeSet<Field>,
    /// Fuzzy tolerance in `[0, 1]`. `0.0` means exact token matches only;
    /// anything above enables prefix matching and edit-distance fuzz with
    /// `max_edits = ceil(threshold * token_chars)`, capped at [`MAX_EDITS`].
    pub threshold: f64,
    /// Truncate the ranked hit list, `None` for all hits.
    pub limit: Option<usize>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            fields: BTreeSet::from(Field::ALL),
            // The per-keystroke sweet spot: forgiving enough for partial
            // terms and one-letter slips, strict enough to keep junk out.
            threshold: 0.4,
            limit: None,
        }
    }
}

/// Edit budget for a query token of `token_chars` characters.
pub(crate) fn max_edits(threshold: f64, token_chars: usize) -> usize {
    if threshold <= 0.0 {
        return 0;
    }
    let budget = (threshold * token_chars as f64).ceil() as usize;
    budget.min(MAX_EDITS)
}

/// How does `query_token` match `term`, if at all?
///
/// Tier order is exact > prefix > fuzzy; a term is only scored at its best
/// tier. Prefix and fuzzy require a positive threshold.
pub(crate) fn match_tier(query_token: &str, term: &str, threshold: f64) -> Option<MatchTier> {
    if term == query_token {
        return Some(MatchTier::Exact);
    }
    if threshold <= 0.0 {
        return None;
    }
    if term.starts_with(query_token) {
        return Some(MatchTier::Prefix);
    }
    let budget = max_edits(threshold, query_token.chars().count());
    if budget == 0 {
        return None;
    }
    bounded_distance(query_token, term, budget).map(MatchTier::Fuzzy)
}

/// Execute `term` against the index, returning hits ranked by relevance.
///
/// An empty or whitespace-only term yields an empty hit list; "no query
/// active" is the caller's interpretation. Never fails: any token that
/// matches nothing simply empties the intersection.
pub fn search(index: &SearchIndex, term: &str, options: &SearchOptions) -> Vec<Hit> {
    let normalized = normalize(term);
    let parts: Vec<&str> = normalized.split(' ').filter(|p| !p.is_empty()).collect();
    if parts.is_empty() {
        return Vec::new();
    }

    // Per-token score maps: record -> (best score, fields that matched)
    let mut per_token: Vec<HashMap<RecordId, (f64, BTreeSet<Field>)>> =
        Vec::with_capacity(parts.len());
    for part in &parts {
        per_token.push(score_token(index, part, options));
    }

    // Intersection across tokens, summing each token's best score
    let mut first = per_token.remove(0);
    for token_scores in per_token {
        first.retain(|record_id, (score, fields)| {
            if let Some((extra, extra_fields)) = token_scores.get(record_id) {
                *score += extra;
                fields.extend(extra_fields.iter().copied());
                true
            } else {
                false
            }
        });
        if first.is_empty() {
            break;
        }
    }

    let mut hits: Vec<Hit> = first
        .into_iter()
        .map(|(record_id, (score, matched_fields))| Hit {
            record_id,
            score,
            matched_fields,
        })
        .collect();

    // Score descending, ties by stable record order
    hits.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.record_id.cmp(&b.record_id))
    });

    if let Some(limit) = options.limit {
        hits.truncate(limit);
    }

    trace!(term, hits = hits.len(), "query executed");
    hits
}

/// Score one query token: walk the sorted vocabulary, tier-match each term,
/// and keep the best posting score per record.
fn score_token(
    index: &SearchIndex,
    query_token: &str,
    options: &SearchOptions,
) -> HashMap<RecordId, (f64, BTreeSet<Field>)> {
    let mut best: HashMap<RecordId, (f64, BTreeSet<Field>)> = HashMap::new();

    for term in &index.vocab {
        let Some(tier) = match_tier(query_token, term, options.threshold) else {
            continue;
        };
        let Some(posting_list) = index.terms.get(term) else {
            continue;
        };
        for posting in &posting_list.postings {
            if !options.fields.contains(&posting.field) {
                continue;
            }
            let score = posting_score(posting.field, tier, posting.token_index, posting.token_count);
            let entry = best
                .entry(posting.record_id)
                .or_insert_with(|| (f64::NEG_INFINITY, BTreeSet::new()));
            if score > entry.0 {
                entry.0 = score;
            }
            entry.1.insert(posting.field);
        }
    }

    best
}
