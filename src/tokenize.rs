//! Tokenizers: one rule per field, nothing injectable.
//!
//! The name field splits at camel-case boundaries so `"HTTPServer"` is
//! findable from `"server"`; every other field uses a generic word
//! tokenizer with a fixed English stopword list. Both are pure functions of
//! their input and report **character** offsets into the original text.
//!
//! # Invariants
//!
//! - Token text is always lowercase.
//! - `start`/`chars` describe the token's position in the *original* string.
//! - Tokenizing a single already-lowercase token yields that token back
//!   (idempotence - property-tested in `tests/property.rs`).

use crate::types::Field;

/// A normalized token with its origin in the source string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Lowercased token text.
    pub text: String,
    /// Character offset of the first source character.
    pub start: usize,
    /// Length of the source run, in characters.
    pub chars: usize,
}

/// Common English words that drown out everything else in a description.
/// Filtered from description indexing and highlight scanning; never applied
/// to name fragments, where single letters are legitimate search units.
/// Must stay sorted: lookup is a binary search.
const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

/// Check if a word is a stop word.
#[inline]
pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.binary_search(&word).is_ok()
}

/// Tokenize `text` with the rule fixed for `field`.
pub fn tokenize(text: &str, field: Field) -> Vec<Token> {
    match field {
        Field::Name => camel_split(text),
        Field::Description => word_tokens(text, true),
    }
}

/// Split at every position immediately preceding an uppercase letter and
/// lowercase the pieces. Empty pieces are dropped, so a leading capital
/// doesn't produce a phantom token: `"HTTPServer"` → `h t t p server`.
fn camel_split(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut piece = String::new();
    let mut piece_start = 0;
    let mut pos = 0;

    for c in text.chars() {
        if c.is_uppercase() && !piece.is_empty() {
            tokens.push(Token {
                text: std::mem::take(&mut piece),
                start: piece_start,
                chars: pos - piece_start,
            });
            piece_start = pos;
        }
        if piece.is_empty() {
            piece_start = pos;
        }
        piece.extend(c.to_lowercase());
        pos += 1;
    }

    if !piece.is_empty() {
        tokens.push(Token {
            text: piece,
            start: piece_start,
            chars: pos - piece_start,
        });
    }

    tokens
}

/// Word boundary detection: anything non-alphanumeric separates words.
#[inline]
fn is_word_boundary(c: char) -> bool {
    !c.is_alphanumeric()
}

/// Generic word tokenizer: alphanumeric runs, lowercased, with character
/// offsets. `filter_stop_words` drops the fixed English list.
pub(crate) fn word_tokens(text: &str, filter_stop_words: bool) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut run = String::new();
    let mut run_start = 0;
    let mut pos = 0;

    for c in text.chars() {
        if is_word_boundary(c) {
            flush_word(&mut tokens, &mut run, run_start, pos, filter_stop_words);
        } else {
            if run.is_empty() {
                run_start = pos;
            }
            run.extend(c.to_lowercase());
        }
        pos += 1;
    }
    flush_word(&mut tokens, &mut run, run_start, pos, filter_stop_words);

    tokens
}

fn flush_word(
    tokens: &mut Vec<Token>,
    run: &mut String,
    run_start: usize,
    pos: usize,
    filter_stop_words: bool,
) {
    if run.is_empty() {
        return;
    }
    let text = std::mem::take(run);
    if !(filter_stop_words && is_stop_word(&text)) {
        tokens.push(Token {
            text,
            start: run_start,
            chars: pos - run_start,
        });
    }
}

/// Normalize a query term: lowercase and collapse whitespace.
pub fn normalize(term: &str) -> String {
    term.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
