//! Corpus acquisition: turning a record source into `Record`s.
//!
//! A corpus arrives one of two ways - an inline pre-rendered markup blob,
//! or a collaborator endpoint that returns the same markup - and both must
//! produce the identical record sequence. The network side stays behind
//! the [`CorpusFetch`] trait; this module never opens a socket.
//!
//! The markup scanner is deliberately small: it looks for elements carrying
//! the `namespaceItem` class, reads the `data-name` attribute, and takes
//! the first `markdown_summary` child as the description (markup variant
//! verbatim, plain variant as the decoded concatenation of its text runs -
//! exactly the string the highlighter and splicer later agree on).
//! JSON payloads are accepted too, for hosts that already have structured
//! records.

use serde::Deserialize;
use tracing::debug;

use crate::error::SourceError;
use crate::filter::Section;
use crate::splice::{markup_parts, MarkupPart};
use crate::types::Record;

/// The collaborator seam for corpora fetched over a network call.
///
/// Implementations live in the host; the engine only requires that a fetch
/// deterministically yields the document or a [`SourceError`].
pub trait CorpusFetch {
    fn fetch(&self) -> Result<String, SourceError>;
}

impl<F> CorpusFetch for F
where
    F: Fn() -> Result<String, SourceError>,
{
    fn fetch(&self) -> Result<String, SourceError> {
        self()
    }
}

/// Where the corpus comes from. Both variants are handled uniformly.
pub enum CorpusSource {
    /// A pre-rendered blob already in hand.
    Inline(String),
    /// A collaborator endpoint to ask for the blob.
    Remote(Box<dyn CorpusFetch>),
}

impl CorpusSource {
    fn obtain(self) -> Result<String, SourceError> {
        match self {
            CorpusSource::Inline(blob) => Ok(blob),
            CorpusSource::Remote(fetch) => fetch.fetch(),
        }
    }
}

/// A parsed corpus: the records plus their section grouping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corpus {
    pub records: Vec<Record>,
    pub sections: Vec<Section>,
}

/// Obtain and parse a corpus from either source.
///
/// The payload format is sniffed: blobs opening with `{` are JSON record
/// payloads, everything else is treated as markup.
pub fn load_corpus(source: CorpusSource) -> Result<Corpus, SourceError> {
    let blob = source.obtain()?;
    if blob.trim_start().starts_with('{') {
        corpus_from_json(&blob)
    } else {
        corpus_from_markup(&blob)
    }
}

#[derive(Deserialize)]
struct Payload {
    records: Vec<Record>,
}

/// Parse a JSON payload: `{ "records": [{ "name", "description",
/// "descriptionMarkup" }, ...] }`. All records land in one section.
pub fn corpus_from_json(payload: &str) -> Result<Corpus, SourceError> {
    let payload: Payload =
        serde_json::from_str(payload).map_err(|e| SourceError::Malformed(e.to_string()))?;
    let sections = vec![Section {
        id: "all".to_string(),
        items: payload.records.iter().map(|r| r.name.clone()).collect(),
    }];
    Ok(Corpus {
        records: payload.records,
        sections,
    })
}

/// Extract records and sections from a pre-rendered markup blob.
pub fn corpus_from_markup(html: &str) -> Result<Corpus, SourceError> {
    let item_tags = find_class_tags(html, "namespaceItem");
    let section_tags = find_class_tags(html, "section");

    let mut records = Vec::with_capacity(item_tags.len());
    let mut sections: Vec<Section> = Vec::new();

    for (n, &(tag_start, tag_end)) in item_tags.iter().enumerate() {
        let tag = &html[tag_start..tag_end];
        let name = attr_value(tag, "data-name").ok_or_else(|| {
            SourceError::Malformed(format!("namespaceItem {n} is missing data-name"))
        })?;

        // The item's content runs to the next item or section marker
        let block_end = item_tags
            .get(n + 1)
            .map(|&(s, _)| s)
            .into_iter()
            .chain(section_tags.iter().map(|&(s, _)| s).filter(|&s| s > tag_end))
            .min()
            .unwrap_or(html.len());
        let block = &html[tag_end..block_end];

        let description_markup = summary_markup(block).unwrap_or_default();
        let description = plain_text(&description_markup);

        // Assign the item to the nearest preceding section marker
        let section_id = match section_tags.iter().rposition(|&(s, _)| s < tag_start) {
            Some(i) => {
                let (s, e) = section_tags[i];
                attr_value(&html[s..e], "id")
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("section-{i}"))
            }
            None => "section-0".to_string(),
        };
        match sections.iter_mut().find(|s| s.id == section_id) {
            Some(section) => section.items.push(name.to_string()),
            None => sections.push(Section {
                id: section_id,
                items: vec![name.to_string()],
            }),
        }

        records.push(Record {
            name: name.to_string(),
            description,
            description_markup,
        });
    }

    debug!(
        records = records.len(),
        sections = sections.len(),
        "corpus parsed from markup"
    );
    Ok(Corpus { records, sections })
}

/// The plain text a markup fragment renders to: its decoded text runs,
/// concatenated. No whitespace collapsing - offsets into this string must
/// line up with the fragment's leaves.
pub fn plain_text(markup: &str) -> String {
    markup_parts(markup)
        .into_iter()
        .filter_map(|part| match part {
            MarkupPart::Text { decoded, .. } => Some(decoded),
            MarkupPart::Tag(_) => None,
        })
        .collect()
}

/// Byte ranges of every opening tag whose `class` attribute contains
/// `class_name` as a whitespace-separated token.
fn find_class_tags(html: &str, class_name: &str) -> Vec<(usize, usize)> {
    let mut tags = Vec::new();
    let mut rest = html;
    let mut base = 0;

    while let Some(open) = rest.find('<') {
        let Some(close_rel) = rest[open..].find('>') else {
            break;
        };
        let close = open + close_rel + 1;
        let tag = &rest[open..close];
        if let Some(classes) = attr_value(tag, "class") {
            if classes.split_whitespace().any(|c| c == class_name) {
                tags.push((base + open, base + close));
            }
        }
        base += close;
        rest = &rest[close..];
    }

    tags
}

/// Value of a double-quoted attribute inside a raw tag.
fn attr_value<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let needle = format!("{name}=\"");
    let mut search = tag;
    let mut base = 0;
    loop {
        let idx = search.find(&needle)?;
        // Reject matches inside a longer attribute name (e.g. "data-name"
        // when looking for "name")
        let preceded_ok = idx == 0
            || tag[..base + idx]
                .chars()
                .last()
                .is_some_and(|c| c.is_whitespace());
        let value_start = idx + needle.len();
        if preceded_ok {
            let value_end = search[value_start..].find('"')?;
            return Some(&search[value_start..value_start + value_end]);
        }
        base += value_start;
        search = &search[value_start..];
    }
}

/// The inner markup of the first `markdown_summary` element in `block`.
fn summary_markup(block: &str) -> Option<String> {
    let (tag_start, tag_end) = find_class_tags(block, "markdown_summary").into_iter().next()?;
    let tag = &block[tag_start..tag_end];
    let tag_name: String = tag[1..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect();

    // Find the matching close tag, counting nesting of the same element
    let open_marker = format!("<{tag_name}");
    let close_marker = format!("</{tag_name}");
    let mut depth = 1;
    let mut pos = tag_end;
    while depth > 0 {
        let open = block[pos..].find(&open_marker);
        let close = block[pos..].find(&close_marker)?;
        match open {
            Some(o) if o < close => {
                depth += 1;
                pos += o + open_marker.len();
            }
            _ => {
                depth -= 1;
                if depth == 0 {
                    return Some(block[tag_end..pos + close].to_string());
                }
                pos += close + close_marker.len();
            }
        }
    }
    None
}
