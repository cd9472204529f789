//! Structured error types for the transcript renderer.
//!
//! Four variants cover the real error sources: JSON parsing, invalid input,
//! a glyph that cannot fit its column, and failures inside the document
//! writer. Individual malformed messages are not errors; they are skipped.

use thiserror::Error;

/// Failure reported by a [`DocumentWriter`](crate::pdf::DocumentWriter).
#[derive(Debug, Error)]
pub enum WriteError {
    /// A font could not be registered with the output document.
    #[error("font error: {0}")]
    Font(String),
    /// The page list could not be serialized.
    #[error("serialization error: {0}")]
    Serialize(String),
}

/// The unified error type returned by all public API functions.
#[derive(Debug, Error)]
pub enum TranscriptError {
    /// JSON input failed to parse as a message list.
    #[error("Failed to parse messages: {source}{}", format_hint(.hint))]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: String,
    },

    /// The message list was empty or held nothing renderable.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A single character is wider than the column it has to fit in.
    #[error("Layout overflow: {ch:?} is {width:.2}pt wide but only {available:.2}pt is available")]
    LayoutOverflow { ch: char, width: f64, available: f64 },

    /// The document writer failed while embedding fonts or serializing.
    #[error("PDF generation failed")]
    PdfGeneration {
        #[source]
        source: WriteError,
    },
}

fn format_hint(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for TranscriptError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "Expected an array of {\"role\", \"content\"} objects, or an object with a \"messages\" array.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input, is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        TranscriptError::Parse { source: e, hint }
    }
}

impl From<WriteError> for TranscriptError {
    fn from(source: WriteError) -> Self {
        TranscriptError::PdfGeneration { source }
    }
}
