//! Shared test utilities and fixtures.

#![allow(dead_code)]

use symsearch::{build_index, Record, SearchIndex};

// Re-export canonical test utilities from symsearch::testing
pub use symsearch::testing::{corpus_markup, make_record, make_record_with_markup};

/// A small fixed corpus exercising both name and description matches.
pub fn sample_records() -> Vec<Record> {
    vec![
        make_record("HTTPServer", "Serves HTTP requests."),
        make_record("parseHeaders", "Parses raw header lines."),
        make_record("Client", "A server connection client."),
        make_record("WebSocketUpgrade", "Upgrades a connection to websockets."),
    ]
}

pub fn sample_index() -> SearchIndex {
    build_index(sample_records()).expect("sample corpus builds")
}

/// Name of the record behind a hit, for readable assertions.
pub fn hit_name(index: &SearchIndex, hit: &symsearch::Hit) -> String {
    index
        .record(hit.record_id)
        .map(|r| r.name.clone())
        .expect("hit points at an indexed record")
}
