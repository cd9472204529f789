//! # Text Layout
//!
//! Sanitizing, inline markdown segmentation and greedy line wrapping.
//!
//! Wrapping works on words rather than characters: a run's text is split on
//! spaces and each word keeps the style of the run it came from, so one
//! visual line can mix bold, italic, code and plain words. Widths come from a
//! caller-supplied measure function, which keeps this module independent of
//! any particular font source.

pub mod markdown;
pub mod sanitize;

pub use markdown::{segment, StyledRun};
pub use sanitize::{collapse_whitespace, sanitize};

use crate::error::TranscriptError;
use crate::style::RunStyle;

/// One row of text after wrapping.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualLine {
    /// Runs in drawing order. Adjacent runs always differ in style.
    pub runs: Vec<StyledRun>,
    /// Total measured width, including separating spaces.
    pub width: f64,
    /// Set when the line holds a single character that is wider than the
    /// available width on its own.
    pub forced: bool,
}

impl VisualLine {
    fn empty() -> Self {
        Self {
            runs: Vec::new(),
            width: 0.0,
            forced: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// The line's text with styles dropped.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    fn push(&mut self, text: &str, style: RunStyle, width: f64) {
        match self.runs.last_mut() {
            Some(last) if last.style == style => last.text.push_str(text),
            _ => self.runs.push(StyledRun::new(text, style)),
        }
        self.width += width;
    }
}

/// What to do when not even one character fits on an empty line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverflowPolicy {
    /// Fail with [`TranscriptError::LayoutOverflow`].
    #[default]
    Error,
    /// Put the character on a line of its own and mark the line `forced`.
    Force,
}

/// Greedy line breaker for a single paragraph of styled runs.
#[derive(Debug, Clone, Copy)]
pub struct LineWrapper {
    max_width: f64,
    first_line_indent: f64,
    overflow: OverflowPolicy,
}

/// A space-delimited word, possibly spanning several styles (`**bold**ly`).
#[derive(Debug, Default)]
struct Word {
    pieces: Vec<(String, RunStyle)>,
}

impl Word {
    fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    fn style(&self) -> RunStyle {
        self.pieces.first().map(|(_, s)| *s).unwrap_or_default()
    }
}

impl LineWrapper {
    pub fn new(max_width: f64) -> Self {
        Self {
            max_width,
            first_line_indent: 0.0,
            overflow: OverflowPolicy::Error,
        }
    }

    /// Reserve `indent` points at the start of the first line (for a label).
    pub fn with_first_line_indent(mut self, indent: f64) -> Self {
        self.first_line_indent = indent.max(0.0);
        self
    }

    pub fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }

    /// Break `runs` into lines no wider than the configured width.
    ///
    /// Words that do not fit on a line of their own are split at the longest
    /// character prefix that fits; the remainder is wrapped like a new word.
    /// Every forced split consumes at least one character, so this always
    /// terminates.
    pub fn wrap<F>(&self, runs: &[StyledRun], measure: F) -> Result<Vec<VisualLine>, TranscriptError>
    where
        F: Fn(&str, RunStyle) -> f64,
    {
        let mut lines: Vec<VisualLine> = Vec::new();
        let mut line = VisualLine::empty();

        for word in split_words(runs) {
            let word_width: f64 = word.pieces.iter().map(|(t, s)| measure(t, *s)).sum();

            if !line.is_empty() {
                let space = measure(" ", word.style());
                if line.width + space + word_width <= self.budget(&lines) {
                    line.push(" ", word.style(), space);
                    for (text, style) in &word.pieces {
                        line.push(text, *style, measure(text, *style));
                    }
                    continue;
                }
                lines.push(std::mem::replace(&mut line, VisualLine::empty()));
            }

            if word_width <= self.budget(&lines) {
                for (text, style) in &word.pieces {
                    line.push(text, *style, measure(text, *style));
                }
                continue;
            }

            if lines.is_empty() && self.first_line_indent > 0.0 && word_width <= self.max_width {
                // Too wide beside the label but fits a full line: the label stands alone.
                lines.push(VisualLine::empty());
                for (text, style) in &word.pieces {
                    line.push(text, *style, measure(text, *style));
                }
                continue;
            }

            line = self.break_word(&word, &mut lines, &measure)?;
        }

        if !line.is_empty() {
            lines.push(line);
        }
        Ok(lines)
    }

    fn budget(&self, lines: &[VisualLine]) -> f64 {
        if lines.is_empty() {
            self.max_width - self.first_line_indent
        } else {
            self.max_width
        }
    }

    /// Split an oversized word across lines. Full lines are appended to
    /// `lines`; the last, partial line is returned so that following words
    /// can continue on it.
    fn break_word<F>(
        &self,
        word: &Word,
        lines: &mut Vec<VisualLine>,
        measure: &F,
    ) -> Result<VisualLine, TranscriptError>
    where
        F: Fn(&str, RunStyle) -> f64,
    {
        let glyphs: Vec<(char, RunStyle, f64)> = word
            .pieces
            .iter()
            .flat_map(|(text, style)| {
                text.chars().map(move |ch| {
                    let mut buf = [0u8; 4];
                    (ch, *style, measure(ch.encode_utf8(&mut buf), *style))
                })
            })
            .collect();

        let mut rest = glyphs.as_slice();
        loop {
            let budget = self.budget(lines);
            let mut taken = 0;
            let mut width = 0.0;
            for (_, _, w) in rest {
                if width + w > budget {
                    break;
                }
                width += w;
                taken += 1;
            }

            let mut forced = false;
            if taken == 0 {
                if lines.is_empty() && self.first_line_indent > 0.0 {
                    // Nothing fits beside the label; start the text below it.
                    lines.push(VisualLine::empty());
                    continue;
                }
                let (ch, _, w) = rest[0];
                match self.overflow {
                    OverflowPolicy::Error => {
                        return Err(TranscriptError::LayoutOverflow {
                            ch,
                            width: w,
                            available: budget,
                        })
                    }
                    OverflowPolicy::Force => {
                        taken = 1;
                        forced = true;
                    }
                }
            }

            let mut line = VisualLine::empty();
            line.forced = forced;
            for (ch, style, w) in &rest[..taken] {
                let mut buf = [0u8; 4];
                line.push(ch.encode_utf8(&mut buf), *style, *w);
            }
            rest = &rest[taken..];

            if rest.is_empty() {
                return Ok(line);
            }
            lines.push(line);
        }
    }
}

/// Split runs into words on spaces. Text on either side of a style change
/// with no space in between stays one word.
fn split_words(runs: &[StyledRun]) -> Vec<Word> {
    let mut words = Vec::new();
    let mut current = Word::default();

    for run in runs {
        for (k, piece) in run.text.split(' ').enumerate() {
            if k > 0 && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            if !piece.is_empty() {
                current.pieces.push((piece.to_string(), run.style));
            }
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Wrap `runs` to `max_width` with no label indent, failing on glyphs that
/// cannot fit at all.
pub fn wrap<F>(runs: &[StyledRun], max_width: f64, measure: F) -> Result<Vec<VisualLine>, TranscriptError>
where
    F: Fn(&str, RunStyle) -> f64,
{
    LineWrapper::new(max_width).wrap(runs, measure)
}
