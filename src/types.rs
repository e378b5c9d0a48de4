//! The building blocks of a search session.
//!
//! These types define how records, postings, spans, and hits fit together.
//!
//! # Invariants (the stuff that breaks if you ignore it)
//!
//! - **Posting**: `record_id` indexes into `SearchIndex::records` and
//!   `token_index < token_count` for its field. Postings are sorted by
//!   `(record_id, field, token_index)` within each list.
//! - **Span**: character offsets, end **closed-inclusive**, `start <= end`.
//!   Spans belonging to one highlight pass are ascending and non-overlapping.
//! - **SearchIndex**: built once, read-only afterward. `vocab` is the sorted
//!   list of every key in `terms` - fuzzy scans iterate it instead of the
//!   map so ranking is reproducible run to run.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

// =============================================================================
// NEWTYPES: Type-safe identifiers
// =============================================================================

/// Type-safe record identifier: the record's stable insertion-order slot.
///
/// Prevents accidentally passing a token index where a record id is expected,
/// and doubles as the deterministic tie-break key for equal scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct RecordId(pub u32);

impl RecordId {
    /// Create a new RecordId, validating it's within bounds.
    #[inline]
    pub fn new(id: u32, num_records: usize) -> Option<Self> {
        if (id as usize) < num_records {
            Some(RecordId(id))
        } else {
            None
        }
    }

    /// Convert to usize for array indexing.
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for RecordId {
    fn from(id: u32) -> Self {
        RecordId(id)
    }
}

// =============================================================================
// RECORDS
// =============================================================================

/// One searchable entry: a symbol name plus its description.
///
/// `description` is the plain-text rendering of `description_markup`;
/// character for character it equals the concatenation of the markup's text
/// runs, which is what lets highlight spans computed against it be spliced
/// back into the markup. Identity is `name`; duplicates are resolved
/// last-write-wins at index build time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub description_markup: String,
}

/// A searchable field of a [`Record`], with its fixed tokenizer rule.
///
/// The set is closed on purpose: rather than injecting arbitrary tokenizers,
/// each field names the one rule it uses (`Name` splits at camel-case
/// boundaries, `Description` uses the generic word tokenizer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Name,
    Description,
}

impl Field {
    /// Every searchable field, in score-dominance order.
    pub const ALL: [Field; 2] = [Field::Name, Field::Description];
}

// =============================================================================
// SPANS
// =============================================================================

/// A contiguous matched character range in a logical string.
///
/// Offsets count **characters**, not bytes. `end` is closed-inclusive:
/// `Span { start: 0, end: 4 }` covers five characters. Spans produced by one
/// highlight pass are sorted ascending and never overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start must not exceed end");
        Span { start, end }
    }

    /// Number of characters covered. A closed-inclusive span always covers
    /// at least one character.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }
}

// =============================================================================
// HITS
// =============================================================================

/// A record matched by a query, with its relevance score.
///
/// Hits are recomputed per query and never cached across queries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hit {
    pub record_id: RecordId,
    pub score: f64,
    /// Every field that contributed at least one matching token.
    pub matched_fields: BTreeSet<Field>,
}

// =============================================================================
// INDEX INTERNALS
// =============================================================================

/// One token occurrence inside one record field.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Posting {
    pub record_id: RecordId,
    pub field: Field,
    /// Position of the token within its field, for the position bonus.
    pub token_index: usize,
    /// Total tokens in that field, the bonus denominator.
    pub token_count: usize,
}

/// All occurrences of one term, sorted by `(record_id, field, token_index)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingList {
    pub postings: Vec<Posting>,
    /// Number of distinct records containing the term.
    pub record_freq: usize,
}

/// The complete searchable index: built once from the full record set,
/// read-only afterward. Rebuild means discard and recreate.
#[derive(Debug, Clone)]
pub struct SearchIndex {
    pub(crate) records: Vec<Record>,
    pub(crate) terms: HashMap<String, PostingList>,
    /// Sorted copy of `terms` keys. Prefix and fuzzy matching walk this
    /// instead of the map so score accumulation order - and therefore
    /// tie-breaking - is identical on every run.
    pub(crate) vocab: Vec<String>,
}

impl SearchIndex {
    /// The indexed records, in stable insertion order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Look up a record by id.
    pub fn record(&self, id: RecordId) -> Option<&Record> {
        self.records.get(id.as_usize())
    }

    /// Look up a record by its identity key.
    pub fn record_by_name(&self, name: &str) -> Option<(RecordId, &Record)> {
        self.records
            .iter()
            .enumerate()
            .find(|(_, r)| r.name == name)
            .map(|(i, r)| (RecordId(i as u32), r))
    }

    /// Number of indexed records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of distinct indexed terms.
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }
}
