//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.
//! It provides canonical implementations of test helpers to avoid
//! duplication.

#![doc(hidden)]

use crate::types::Record;

/// Create a record whose markup is the description wrapped in a paragraph.
///
/// This is the canonical implementation used across all tests.
pub fn make_record(name: &str, description: &str) -> Record {
    Record {
        name: name.to_string(),
        description: description.to_string(),
        description_markup: format!("<p>{}</p>", description),
    }
}

/// Create a record with explicit markup; `description` must equal the
/// markup's plain text or span offsets will not line up.
pub fn make_record_with_markup(name: &str, description: &str, markup: &str) -> Record {
    Record {
        name: name.to_string(),
        description: description.to_string(),
        description_markup: markup.to_string(),
    }
}

/// A small pre-rendered corpus in the shape the markup scanner expects:
/// two sections, three items, one fragmented description.
pub fn corpus_markup() -> String {
    concat!(
        "<div class=\"section\" id=\"functions\"><h2>Functions</h2>",
        "<div class=\"namespaceItem\" data-name=\"HTTPServer\">",
        "<div class=\"markdown_summary\"><p>Serves <em>HTTP</em> requests.</p></div>",
        "</div>",
        "<div class=\"namespaceItem\" data-name=\"parseHeaders\">",
        "<div class=\"markdown_summary\"><p>Parses raw header lines.</p></div>",
        "</div>",
        "</div>",
        "<div class=\"section\" id=\"classes\"><h2>Classes</h2>",
        "<div class=\"namespaceItem\" data-name=\"Client\">",
        "<div class=\"markdown_summary\"><p>A server connection client.</p></div>",
        "</div>",
        "</div>",
    )
    .to_string()
}
