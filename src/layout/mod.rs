//! # Page Flow and Transcript Layout
//!
//! Turns messages into positioned text on fixed-size pages.
//!
//! Layout never works on an infinite canvas. A [`PageFlow`] owns the current
//! page and a cursor that walks down it; before anything is drawn the flow is
//! asked whether the block fits, and a new page is opened when it doesn't.
//!
//! Coordinates are PDF user space: the origin is the bottom-left corner of
//! the page and `y` is a text baseline, so the cursor *decreases* as content
//! is added.
//!
//! ```text
//! messages ──► sanitize ──► segment ──► wrap ──► PageFlow ──► Vec<LayoutPage>
//! ```

pub mod page_break;

use chrono::NaiveDate;

use crate::error::TranscriptError;
use crate::font::{FontContext, StandardFont};
use crate::model::{LayoutConfig, Message, Role};
use crate::style::{Color, RunStyle};
use crate::text::{segment, sanitize, LineWrapper, VisualLine};
use page_break::{decide_break, lines_that_fit, BreakContext, BreakDecision};

const EPSILON: f64 = 1e-6;

/// One piece of text placed on a page. No wrapping happens after layout.
#[derive(Debug, Clone, PartialEq)]
pub struct TextDraw {
    pub text: String,
    /// Left edge of the text.
    pub x: f64,
    /// Baseline, measured up from the bottom of the page.
    pub y: f64,
    pub font: StandardFont,
    pub font_size: f64,
    pub color: Color,
}

/// A fully laid-out page ready for serialization.
#[derive(Debug, Clone)]
pub struct LayoutPage {
    pub width: f64,
    pub height: f64,
    pub elements: Vec<TextDraw>,
}

impl LayoutPage {
    /// Whether any element on this page carries `text` exactly.
    pub fn contains_text(&self, text: &str) -> bool {
        self.elements.iter().any(|e| e.text == text)
    }
}

/// Where the next line goes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageCursor {
    pub page_index: usize,
    pub y: f64,
}

/// Owns the pages being filled and the cursor on the last one.
pub struct PageFlow<'a> {
    config: &'a LayoutConfig,
    width: f64,
    height: f64,
    cursor: PageCursor,
    pages: Vec<LayoutPage>,
}

impl<'a> PageFlow<'a> {
    /// Start a flow with one empty page and the cursor at the top margin.
    pub fn new(config: &'a LayoutConfig) -> Self {
        let (width, height) = config.size.dimensions();
        let mut flow = Self {
            config,
            width,
            height,
            cursor: PageCursor {
                page_index: 0,
                y: 0.0,
            },
            pages: Vec::new(),
        };
        flow.open_page();
        flow
    }

    pub fn cursor(&self) -> PageCursor {
        self.cursor
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Baseline of the first line on an empty page.
    pub fn top(&self) -> f64 {
        self.height - self.config.margin.top
    }

    pub fn bottom(&self) -> f64 {
        self.config.margin.bottom
    }

    /// Height between the cursor and the bottom margin.
    pub fn remaining_height(&self) -> f64 {
        (self.cursor.y - self.bottom()).max(0.0)
    }

    /// Height available on a freshly opened page.
    pub fn page_capacity(&self) -> f64 {
        (self.top() - self.bottom()).max(0.0)
    }

    /// True while nothing has been drawn below the top margin of this page.
    pub fn is_fresh_page(&self) -> bool {
        self.cursor.y >= self.top() - EPSILON
    }

    /// Open a new page if `needed` points would cross the bottom margin.
    pub fn ensure_space(&mut self, needed: f64) -> PageCursor {
        if self.cursor.y - needed < self.bottom() - EPSILON && !self.is_fresh_page() {
            self.new_page();
        }
        self.cursor
    }

    /// Move down one body line.
    pub fn advance_line(&mut self) -> PageCursor {
        self.advance_by(self.config.line_height)
    }

    pub fn advance_by(&mut self, dy: f64) -> PageCursor {
        self.cursor.y -= dy;
        self.cursor
    }

    pub fn new_page(&mut self) -> PageCursor {
        self.open_page();
        log::debug!("opened page {}", self.cursor.page_index + 1);
        self.cursor
    }

    fn open_page(&mut self) {
        self.pages.push(LayoutPage {
            width: self.width,
            height: self.height,
            elements: Vec::new(),
        });
        self.cursor = PageCursor {
            page_index: self.pages.len() - 1,
            y: self.top(),
        };
    }

    /// Place text on the current page.
    pub fn draw(&mut self, draw: TextDraw) {
        if let Some(page) = self.pages.last_mut() {
            page.elements.push(draw);
        }
    }

    pub fn finish(self) -> Vec<LayoutPage> {
        self.pages
    }
}

/// Lays out a whole transcript: header, messages, footer.
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Lay out `messages` into pages.
    ///
    /// Fails with `InvalidInput` before any page is created when there is
    /// nothing to render, and with `LayoutOverflow` when a single character
    /// is wider than the text column.
    pub fn layout(
        &self,
        messages: &[Message],
        generated_on: NaiveDate,
        font_context: &FontContext,
    ) -> Result<Vec<LayoutPage>, TranscriptError> {
        if messages.is_empty() {
            return Err(TranscriptError::InvalidInput(
                "messages must be a non-empty array".to_string(),
            ));
        }

        let config = &self.config;
        let mut flow = PageFlow::new(config);
        self.layout_header(&mut flow, generated_on, font_context);

        let mut rendered = 0usize;
        for (index, message) in messages.iter().enumerate() {
            let text = sanitize(&message.content);
            if text.is_empty() {
                log::warn!("skipping message {}: no printable content", index);
                continue;
            }
            let lines = self.wrap_message(message, &text, font_context)?;
            if lines.is_empty() {
                log::warn!("skipping message {}: only whitespace inside markup", index);
                continue;
            }
            log::debug!(
                "message {} ({:?}): {} line(s)",
                index,
                message.role,
                lines.len()
            );
            self.layout_message(&mut flow, message, &lines, font_context);
            flow.advance_by(config.message_spacing);
            rendered += 1;
        }

        if rendered == 0 {
            return Err(TranscriptError::InvalidInput(
                "no message has printable content".to_string(),
            ));
        }
        log::debug!("laid out {} of {} message(s)", rendered, messages.len());

        self.layout_footer(&mut flow, font_context);
        let mut pages = flow.finish();
        if config.page_numbers {
            self.number_pages(&mut pages, font_context);
        }
        Ok(pages)
    }

    fn layout_header(&self, flow: &mut PageFlow, generated_on: NaiveDate, fonts: &FontContext) {
        let config = &self.config;
        let y = flow.cursor().y;
        let title = self.centered(
            &config.title,
            y,
            StandardFont::HelveticaBold,
            config.title_size,
            config.title_color,
            fonts,
        );
        flow.draw(title);

        let date_line = format!("Generated on {}", generated_on.format("%B %-d, %Y"));
        let date_y = y - (config.title_size + 4.0);
        let date = self.centered(
            &date_line,
            date_y,
            StandardFont::Helvetica,
            config.date_size,
            config.muted_color,
            fonts,
        );
        flow.draw(date);

        flow.advance_by(config.title_size + 4.0 + config.header_spacing);
    }

    fn wrap_message(
        &self,
        message: &Message,
        text: &str,
        fonts: &FontContext,
    ) -> Result<Vec<VisualLine>, TranscriptError> {
        let size = self.config.font_size;
        let label_width =
            fonts.width_of_text_at_size(message.role.label(), StandardFont::HelveticaBold, size);
        let runs = segment(text);
        LineWrapper::new(self.config.content_width())
            .with_first_line_indent(label_width)
            .wrap(&runs, |t, style| fonts.measure_run(t, style, size))
    }

    fn layout_message(
        &self,
        flow: &mut PageFlow,
        message: &Message,
        lines: &[VisualLine],
        fonts: &FontContext,
    ) {
        let config = &self.config;
        let mut start = 0;

        while start < lines.len() {
            let ctx = BreakContext {
                remaining_height: flow.remaining_height(),
                page_capacity: flow.page_capacity(),
                line_height: config.line_height,
                min_orphan_lines: config.min_orphan_lines,
                min_widow_lines: config.min_widow_lines,
            };
            let pending = lines.len() - start;
            let take = match decide_break(&ctx, pending) {
                BreakDecision::Place => pending,
                BreakDecision::Split {
                    lines_on_current_page,
                } => lines_on_current_page,
                BreakDecision::MoveToNextPage if flow.is_fresh_page() => {
                    // Already at the top of a page: take whatever fits.
                    lines_that_fit(ctx.remaining_height, config.line_height)
                        .clamp(1, pending)
                }
                BreakDecision::MoveToNextPage => {
                    flow.new_page();
                    continue;
                }
            };

            for (i, line) in lines[start..start + take].iter().enumerate() {
                flow.ensure_space(config.line_height);
                let label = (start + i == 0).then_some(message.role);
                self.draw_line(flow, line, label, fonts);
                flow.advance_line();
            }
            start += take;
            if start < lines.len() {
                flow.new_page();
            }
        }
    }

    /// Draw one visual line: the role label on a message's first line, then
    /// one element per run.
    fn draw_line(
        &self,
        flow: &mut PageFlow,
        line: &VisualLine,
        label: Option<Role>,
        fonts: &FontContext,
    ) {
        let config = &self.config;
        let size = config.font_size;
        let y = flow.cursor().y;
        let mut x = config.margin.left;

        if let Some(role) = label {
            let text = role.label();
            flow.draw(TextDraw {
                text: text.to_string(),
                x,
                y,
                font: StandardFont::HelveticaBold,
                font_size: size,
                color: config.label_color,
            });
            x += fonts.width_of_text_at_size(text, StandardFont::HelveticaBold, size);
        }

        for run in &line.runs {
            flow.draw(TextDraw {
                text: run.text.clone(),
                x,
                y,
                font: run.style.font(),
                font_size: size,
                color: self.run_color(run.style),
            });
            x += fonts.measure_run(&run.text, run.style, size);
        }
    }

    fn run_color(&self, style: RunStyle) -> Color {
        match style {
            RunStyle::Code => self.config.title_color,
            _ => self.config.text_color,
        }
    }

    /// The footer sits on the bottom margin of the last page. It claims one
    /// line at the cursor; when that line is gone it gets a page of its own.
    fn layout_footer(&self, flow: &mut PageFlow, fonts: &FontContext) {
        let config = &self.config;
        if flow.cursor().y - config.line_height < flow.bottom() - EPSILON {
            flow.new_page();
        }
        let footer = self.centered(
            &config.footer,
            flow.bottom(),
            StandardFont::HelveticaOblique,
            config.footer_size,
            config.muted_color,
            fonts,
        );
        flow.draw(footer);
    }

    fn number_pages(&self, pages: &mut [LayoutPage], fonts: &FontContext) {
        let config = &self.config;
        let total = pages.len();
        for (i, page) in pages.iter_mut().enumerate() {
            let text = format!("Page {} of {}", i + 1, total);
            let width =
                fonts.width_of_text_at_size(&text, StandardFont::Helvetica, config.footer_size);
            page.elements.push(TextDraw {
                x: page.width - config.margin.right - width,
                y: config.margin.bottom / 2.0,
                text,
                font: StandardFont::Helvetica,
                font_size: config.footer_size,
                color: config.muted_color,
            });
        }
    }

    fn centered(
        &self,
        text: &str,
        y: f64,
        font: StandardFont,
        font_size: f64,
        color: Color,
        fonts: &FontContext,
    ) -> TextDraw {
        let (page_width, _) = self.config.size.dimensions();
        let width = fonts.width_of_text_at_size(text, font, font_size);
        TextDraw {
            text: text.to_string(),
            x: ((page_width - width) / 2.0).max(0.0),
            y,
            font,
            font_size,
            color,
        }
    }
}
