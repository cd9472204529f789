//! Normalization of raw message text into the character set the standard
//! fonts can draw.

use crate::font::to_winansi;

/// Normalize raw message text for layout.
///
/// Line breaks and tabs become spaces, characters WinAnsi cannot encode are
/// dropped, whitespace runs collapse to a single space and both ends are
/// trimmed. An empty result means there is nothing to draw.
pub fn sanitize(text: &str) -> String {
    let kept: String = text
        .chars()
        .filter_map(|ch| match ch {
            '\n' | '\r' | '\t' => Some(' '),
            _ if to_winansi(ch).is_some() => Some(ch),
            _ => None,
        })
        .collect();
    collapse_whitespace(&kept).trim_matches(is_space).to_string()
}

/// Collapse every run of spaces (including no-break spaces) into one ASCII
/// space. Does not trim.
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for ch in text.chars() {
        if is_space(ch) || ch.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out
}

fn is_space(ch: char) -> bool {
    ch == ' ' || ch == '\u{00A0}'
}
