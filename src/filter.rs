//! Two-level visibility filtering of sectioned result lists.
//!
//! Items hide individually when they miss the query; a section hides
//! entirely only when every one of its items is hidden, so no empty
//! header is left dangling.

use std::collections::BTreeSet;

/// A rendered section: a heading plus its member items, identified by
/// record name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub id: String,
    pub items: Vec<String>,
}

/// Visibility decision for one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionVisibility {
    pub id: String,
    /// False iff every item in the section is hidden.
    pub visible: bool,
    /// Items to hide while the section itself stays visible. Empty when
    /// the whole section is hidden (hiding the section hides them all).
    pub hidden_items: Vec<String>,
}

/// Decide visibility for every section and item.
///
/// `hits` is the set of matched record names; `None` means no query is
/// active, in which case everything is visible.
pub fn filter_visible(
    sections: &[Section],
    hits: Option<&BTreeSet<String>>,
) -> Vec<SectionVisibility> {
    let Some(hits) = hits else {
        return sections
            .iter()
            .map(|s| SectionVisibility {
                id: s.id.clone(),
                visible: true,
                hidden_items: Vec::new(),
            })
            .collect();
    };

    sections
        .iter()
        .map(|section| {
            let hidden_items: Vec<String> = section
                .items
                .iter()
                .filter(|item| !hits.contains(*item))
                .cloned()
                .collect();
            let all_hidden = hidden_items.len() == section.items.len();
            SectionVisibility {
                id: section.id.clone(),
                visible: !all_hidden,
                hidden_items: if all_hidden { Vec::new() } else { hidden_items },
            }
        })
        .collect()
}
