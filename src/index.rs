//! Inverted index construction.
//!
//! # INVARIANTS (DO NOT VIOLATE)
//!
//! 1. **POSTING_LIST_SORTED**: Each posting list is sorted by
//!    `(record_id, field, token_index)`
//! 2. **RECORD_FREQ_CORRECT**: `record_freq` equals the count of unique
//!    record ids in the list
//! 3. **VOCAB_COMPLETE**: `vocab` holds every key of `terms`, sorted
//! 4. **IDENTITY_UNIQUE**: no two records share a name after build
//!    (duplicates resolve last-write-wins, keeping the first occurrence's
//!    slot so ranking tie-breaks stay order-independent)

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::IndexError;
use crate::tokenize::tokenize;
use crate::types::{Field, Posting, PostingList, Record, RecordId, SearchIndex};

/// Build a [`SearchIndex`] from the full record set in one bulk operation.
///
/// Records with a duplicate `name` replace the earlier record's content in
/// place (last write wins) - the record keeps its original slot, so equal
/// scores still tie-break by first-appearance order. A record with an empty
/// name has no identity and aborts the build; no partially built index is
/// ever returned.
pub fn build_index(records: Vec<Record>) -> Result<SearchIndex, IndexError> {
    let mut deduped: Vec<Record> = Vec::with_capacity(records.len());
    let mut slots: HashMap<String, usize> = HashMap::with_capacity(records.len());

    for (position, record) in records.into_iter().enumerate() {
        if record.name.is_empty() {
            return Err(IndexError::EmptyName(position));
        }
        match slots.get(&record.name) {
            Some(&slot) => {
                warn!(name = %record.name, slot, "duplicate record name, last write wins");
                deduped[slot] = record;
            }
            None => {
                slots.insert(record.name.clone(), deduped.len());
                deduped.push(record);
            }
        }
    }

    let mut terms: HashMap<String, Vec<Posting>> = HashMap::new();

    for (idx, record) in deduped.iter().enumerate() {
        let record_id = RecordId(idx as u32);
        for field in Field::ALL {
            let text = match field {
                Field::Name => &record.name,
                Field::Description => &record.description,
            };
            let tokens = tokenize(text, field);
            let token_count = tokens.len();
            for (token_index, token) in tokens.into_iter().enumerate() {
                terms.entry(token.text).or_default().push(Posting {
                    record_id,
                    field,
                    token_index,
                    token_count,
                });
            }
        }
    }

    // INVARIANT: POSTING_LIST_SORTED
    for postings in terms.values_mut() {
        postings.sort();
    }

    let mut final_terms: HashMap<String, PostingList> = HashMap::with_capacity(terms.len());
    for (term, postings) in terms {
        // INVARIANT: RECORD_FREQ_CORRECT
        let mut record_ids: Vec<RecordId> = postings.iter().map(|p| p.record_id).collect();
        record_ids.dedup(); // postings already sorted by record_id
        let record_freq = record_ids.len();

        final_terms.insert(
            term,
            PostingList {
                postings,
                record_freq,
            },
        );
    }

    // INVARIANT: VOCAB_COMPLETE
    let mut vocab: Vec<String> = final_terms.keys().cloned().collect();
    vocab.sort_unstable();

    debug!(
        records = deduped.len(),
        terms = final_terms.len(),
        "index built"
    );

    Ok(SearchIndex {
        records: deduped,
        terms: final_terms,
        vocab,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::make_record;

    #[test]
    fn test_build_empty_corpus() {
        let index = build_index(vec![]).unwrap();
        assert!(index.is_empty());
        assert_eq!(index.term_count(), 0);
    }

    #[test]
    fn test_build_indexes_both_fields() {
        let index = build_index(vec![make_record("HTTPServer", "Serves requests over http.")])
            .unwrap();
        // "server" from the camel split, "serves" from the description
        assert!(index.terms.contains_key("server"));
        assert!(index.terms.contains_key("serves"));
        // "http" occurs in both fields: one posting each
        assert_eq!(index.terms["http"].postings.len(), 2);
        assert_eq!(index.terms["http"].record_freq, 1);
    }

    #[test]
    fn test_duplicate_name_last_write_wins() {
        let index = build_index(vec![
            make_record("Alpha", "first body"),
            make_record("Beta", "middle"),
            make_record("Alpha", "second body"),
        ])
        .unwrap();
        assert_eq!(index.len(), 2);
        // Alpha keeps slot 0 but carries the later description
        assert_eq!(index.records()[0].description, "second body");
        assert!(index.terms.contains_key("second"));
        assert!(!index.terms.contains_key("first"));
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = build_index(vec![make_record("", "whatever")]).unwrap_err();
        assert_eq!(err, IndexError::EmptyName(0));
    }

    #[test]
    fn test_posting_lists_sorted() {
        let index = build_index(vec![
            make_record("Parser", "parse parse parse"),
            make_record("ParserError", "raised by parse"),
        ])
        .unwrap();
        let postings = &index.terms["parse"].postings;
        let mut sorted = postings.clone();
        sorted.sort();
        assert_eq!(*postings, sorted);
    }

    #[test]
    fn test_vocab_sorted_and_complete() {
        let index = build_index(vec![make_record("ZipReader", "reads zip archives")]).unwrap();
        let mut expected: Vec<String> = index.terms.keys().cloned().collect();
        expected.sort_unstable();
        assert_eq!(index.vocab, expected);
    }
}
