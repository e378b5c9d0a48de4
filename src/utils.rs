//! Utility functions for string processing.
//!
//! Everything here works in **character** offsets. The engine never hands
//! out byte offsets: spans computed by the highlighter must line up with
//! leaf lengths counted by the splicer, and both sides count chars.

/// Slice a string by character positions (`from` inclusive, `to` exclusive).
///
/// Out-of-range positions clamp to the end of the string, so callers that
/// have already validated their offsets never panic here.
pub fn char_slice(text: &str, from: usize, to: usize) -> &str {
    let mut indices = text.char_indices().map(|(i, _)| i);
    let start = indices.nth(from).unwrap_or(text.len());
    let end = if to > from {
        text.char_indices()
            .map(|(i, _)| i)
            .nth(to)
            .unwrap_or(text.len())
    } else {
        start
    };
    &text[start..end]
}

/// Number of characters in a string. Named to make call sites read as
/// "length in chars", not bytes.
#[inline]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Escape the five HTML-special characters.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Decode the entities produced by [`escape_html`], plus decimal numeric
/// references. Unknown entities pass through untouched.
pub fn unescape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        if c != '&' {
            out.push(c);
            continue;
        }

        // Scan ahead for a terminating ';' within a small window.
        let rest = &text[start + 1..];
        let semi = rest.char_indices().take(8).find(|(_, c)| *c == ';');
        let Some((semi_idx, _)) = semi else {
            out.push('&');
            continue;
        };

        let entity = &rest[..semi_idx];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => entity
                .strip_prefix('#')
                .and_then(|num| num.parse::<u32>().ok())
                .and_then(char::from_u32),
        };

        match decoded {
            Some(d) => {
                out.push(d);
                // Consume the entity body and the semicolon.
                while let Some((i, _)) = chars.peek() {
                    if *i <= start + semi_idx + 1 {
                        chars.next();
                    } else {
                        break;
                    }
                }
            }
            None => out.push('&'),
        }
    }

    out
}
