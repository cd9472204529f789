//! # Transcript PDF
//!
//! Lays out a chat conversation as a paginated PDF transcript.
//!
//! Every message is cleaned of characters the standard fonts cannot draw,
//! split into bold, italic and code runs from a small markdown subset,
//! wrapped to the text column and then flowed onto fixed-size pages. A page
//! is never an infinite canvas that gets sliced afterwards: each line asks
//! for space first and a new page is opened when there is none.
//!
//! ## Architecture
//!
//! ```text
//! Input (JSON/API)
//!       ↓
//!   [model]    Messages, metadata, layout config
//!       ↓
//!   [text]     Sanitize, segment markdown, wrap lines
//!       ↓
//!   [layout]   Page flow: header, messages, footer
//!       ↓
//!   [pdf]      Serialize to PDF bytes
//! ```

pub mod error;
pub mod font;
pub mod layout;
pub mod model;
pub mod pdf;
pub mod style;
pub mod text;

#[cfg(feature = "wasm")]
pub mod wasm;

use chrono::{Local, NaiveDate};

pub use error::{TranscriptError, WriteError};
pub use model::{LayoutConfig, Message, Metadata, Role, TranscriptInput};

use font::FontContext;
use layout::{LayoutEngine, LayoutPage};
use model::messages_from_values;
use pdf::{DocumentWriter, PdfWriter};

/// Render a conversation to PDF bytes with the default page setup.
///
/// This is the primary entry point.
pub fn render(messages: &[Message], metadata: &Metadata) -> Result<Vec<u8>, TranscriptError> {
    render_with_config(messages, metadata, &LayoutConfig::default())
}

/// Render a conversation with an explicit layout config.
pub fn render_with_config(
    messages: &[Message],
    metadata: &Metadata,
    config: &LayoutConfig,
) -> Result<Vec<u8>, TranscriptError> {
    render_with(&PdfWriter::new(), messages, metadata, config)
}

/// Render a conversation through any [`DocumentWriter`].
///
/// Writer failures come back as [`TranscriptError::PdfGeneration`] with the
/// writer's error as the source.
pub fn render_with<W: DocumentWriter>(
    writer: &W,
    messages: &[Message],
    metadata: &Metadata,
    config: &LayoutConfig,
) -> Result<Vec<u8>, TranscriptError> {
    let font_context = FontContext::new();
    let pages = layout_with(messages, metadata, config, &font_context)?;
    let bytes = writer.write(&pages, metadata, &font_context)?;
    log::info!("rendered {} page(s), {} bytes", pages.len(), bytes.len());
    Ok(bytes)
}

/// Render a conversation described as JSON to PDF bytes.
///
/// Accepts either a bare array of `{"role", "content"}` objects or an
/// object with a `messages` array and optional `metadata` and `config`.
pub fn render_json(json: &str) -> Result<Vec<u8>, TranscriptError> {
    let input: TranscriptInput = serde_json::from_str(json)?;
    render_input(input)
}

/// Render already-parsed JSON input.
///
/// Malformed entries are skipped; an empty array, or one where every entry
/// is malformed, is `InvalidInput`.
pub fn render_input(input: TranscriptInput) -> Result<Vec<u8>, TranscriptError> {
    let (values, metadata, config) = input.into_parts();
    if values.is_empty() {
        return Err(TranscriptError::InvalidInput(
            "messages must be a non-empty array".to_string(),
        ));
    }
    let messages = messages_from_values(&values);
    if messages.is_empty() {
        return Err(TranscriptError::InvalidInput(format!(
            "all {} message(s) were malformed",
            values.len()
        )));
    }
    render_with_config(&messages, &metadata, &config)
}

/// Lay out a conversation without serializing it, for inspecting pages.
pub fn layout(
    messages: &[Message],
    metadata: &Metadata,
    config: &LayoutConfig,
) -> Result<Vec<LayoutPage>, TranscriptError> {
    layout_with(messages, metadata, config, &FontContext::new())
}

fn layout_with(
    messages: &[Message],
    metadata: &Metadata,
    config: &LayoutConfig,
    font_context: &FontContext,
) -> Result<Vec<LayoutPage>, TranscriptError> {
    let engine = LayoutEngine::new(config.clone());
    engine.layout(messages, generated_on(metadata), font_context)
}

fn generated_on(metadata: &Metadata) -> NaiveDate {
    metadata
        .generated_on
        .unwrap_or_else(|| Local::now().date_naive())
}
