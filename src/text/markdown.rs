//! # Inline Markdown
//!
//! Splits message text into styled runs. Only three inline spans are
//! recognized: `**bold**`, `*italic*` and `` `code` ``.
//!
//! The text is read by a single forward scanner. At each position the first
//! matching rule wins:
//!
//! 1. `` ` `` with a later `` ` `` opens a code span.
//! 2. `**` with a later `**` (and something in between) opens a bold span.
//! 3. `*` followed by a non-`*` character, with a later lone `*`, opens an
//!    italic span. Any `**` pair met while looking for the close is skipped
//!    over as literal text.
//! 4. Anything else, including an unmatched delimiter, is plain text.
//!
//! Spans never nest. Whatever sits between a span's delimiters is emitted
//! literally in that span's style, so `*a **b** c*` is one italic run
//! `a **b** c`.

use super::sanitize::collapse_whitespace;
use crate::style::RunStyle;

/// A maximal span of text sharing one style.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledRun {
    pub text: String,
    pub style: RunStyle,
}

impl StyledRun {
    pub fn new(text: impl Into<String>, style: RunStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, RunStyle::Plain)
    }
}

/// Split sanitized text into ordered styled runs, delimiters removed.
///
/// Each run is whitespace-collapsed (not trimmed, so the space between
/// `**Hello**` and `there` survives on the plain run) and empty runs are
/// dropped.
pub fn segment(text: &str) -> Vec<StyledRun> {
    let chars: Vec<char> = text.chars().collect();
    let mut runs = Vec::new();
    let mut plain = String::new();
    let mut i = 0;

    while i < chars.len() {
        match span_at(&chars, i) {
            Some(span) => {
                push_run(&mut runs, &plain, RunStyle::Plain);
                plain.clear();
                let inner: String = chars[span.inner_start..span.inner_end].iter().collect();
                push_run(&mut runs, &inner, span.style);
                i = span.end;
            }
            None => {
                plain.push(chars[i]);
                i += 1;
            }
        }
    }
    push_run(&mut runs, &plain, RunStyle::Plain);

    runs
}

struct Span {
    style: RunStyle,
    inner_start: usize,
    inner_end: usize,
    /// Index just past the closing delimiter.
    end: usize,
}

fn span_at(chars: &[char], i: usize) -> Option<Span> {
    match chars[i] {
        '`' => {
            let close = find_from(chars, i + 1, |j| chars[j] == '`')?;
            (close > i + 1).then_some(Span {
                style: RunStyle::Code,
                inner_start: i + 1,
                inner_end: close,
                end: close + 1,
            })
        }
        '*' => bold_at(chars, i).or_else(|| italic_at(chars, i)),
        _ => None,
    }
}

fn bold_at(chars: &[char], i: usize) -> Option<Span> {
    if chars.get(i + 1) != Some(&'*') {
        return None;
    }
    let close = find_from(chars, i + 3, |j| {
        chars[j] == '*' && chars.get(j + 1) == Some(&'*')
    })?;
    Some(Span {
        style: RunStyle::Bold,
        inner_start: i + 2,
        inner_end: close,
        end: close + 2,
    })
}

fn italic_at(chars: &[char], i: usize) -> Option<Span> {
    match chars.get(i + 1) {
        None | Some('*') => return None,
        Some(_) => {}
    }
    let mut j = i + 2;
    while j < chars.len() {
        if chars[j] == '*' {
            if chars.get(j + 1) == Some(&'*') {
                j += 2;
                continue;
            }
            return Some(Span {
                style: RunStyle::Italic,
                inner_start: i + 1,
                inner_end: j,
                end: j + 1,
            });
        }
        j += 1;
    }
    None
}

fn find_from(chars: &[char], start: usize, pred: impl Fn(usize) -> bool) -> Option<usize> {
    (start..chars.len()).find(|&j| pred(j))
}

/// Append a run, merging consecutive plain text.
fn push_run(runs: &mut Vec<StyledRun>, text: &str, style: RunStyle) {
    let text = collapse_whitespace(text);
    if text.is_empty() {
        return;
    }
    if let Some(last) = runs.last_mut() {
        if style == RunStyle::Plain && last.style == RunStyle::Plain {
            last.text = collapse_whitespace(&(last.text.clone() + &text));
            return;
        }
    }
    runs.push(StyledRun::new(text, style));
}
