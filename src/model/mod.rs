//! # Input Model
//!
//! Chat messages, document metadata and the page configuration.
//!
//! Messages arrive as loosely-typed JSON from a chat front end. Parsing is
//! lenient per entry: an entry with a missing, empty or unknown role, or
//! missing or empty content, is skipped with a warning instead of failing
//! the whole document.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::style::Color;

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Parse a role name, ignoring case and surrounding whitespace.
    pub fn parse(name: &str) -> Option<Role> {
        match name.trim().to_ascii_lowercase().as_str() {
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            _ => None,
        }
    }

    /// The label printed before the first line of a message.
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "USER: ",
            Role::Assistant => "ASSISTANT: ",
        }
    }
}

/// One chat turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Build a message from an arbitrary JSON value, or `None` when the
    /// value is not an object with a known string `role` and a non-blank
    /// string `content`.
    pub fn from_value(value: &Value) -> Option<Message> {
        let role = value.get("role")?.as_str().and_then(Role::parse)?;
        let content = value.get("content")?.as_str()?;
        if content.trim().is_empty() {
            return None;
        }
        Some(Message::new(role, content))
    }
}

/// Convert raw JSON entries to messages, skipping malformed ones.
pub fn messages_from_values(values: &[Value]) -> Vec<Message> {
    values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| {
            let msg = Message::from_value(v);
            if msg.is_none() {
                log::warn!("skipping malformed message at index {}", i);
            }
            msg
        })
        .collect()
}

/// Document metadata embedded in the PDF.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    /// Date printed under the title. Today's local date when absent.
    pub generated_on: Option<NaiveDate>,
}

/// The JSON request body: a bare message array, or an object carrying the
/// messages plus optional metadata and layout config.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TranscriptInput {
    Messages(Vec<Value>),
    Document {
        messages: Vec<Value>,
        #[serde(default)]
        metadata: Metadata,
        #[serde(default)]
        config: LayoutConfig,
    },
}

impl TranscriptInput {
    /// Split into raw messages, metadata and config. A metadata title also
    /// becomes the heading on page one.
    pub fn into_parts(self) -> (Vec<Value>, Metadata, LayoutConfig) {
        match self {
            TranscriptInput::Messages(messages) => {
                (messages, Metadata::default(), LayoutConfig::default())
            }
            TranscriptInput::Document {
                messages,
                metadata,
                mut config,
            } => {
                if let Some(ref title) = metadata.title {
                    config.title = title.clone();
                }
                (messages, metadata, config)
            }
        }
    }

    /// Use `title` for both the heading on page one and the PDF Info title.
    pub fn with_title(self, title: &str) -> Self {
        let (messages, mut metadata, mut config) = self.into_parts();
        metadata.title = Some(title.to_string());
        config.title = title.to_string();
        TranscriptInput::Document {
            messages,
            metadata,
            config,
        }
    }
}

/// Standard page sizes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    A5,
    Letter,
    Legal,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Returns (width, height) in points.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::A5 => (419.53, 595.28),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

/// Edge values (top, right, bottom, left) used for page margins.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Edges {
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }
}

/// Fixed geometry and typography for a transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    pub size: PageSize,
    pub margin: Edges,
    /// Body text size in points.
    pub font_size: f64,
    /// Baseline-to-baseline distance of body lines.
    pub line_height: f64,
    /// Extra space after each message.
    pub message_spacing: f64,
    pub title: String,
    pub title_size: f64,
    pub date_size: f64,
    /// Space between the date line and the first message.
    pub header_spacing: f64,
    pub footer: String,
    pub footer_size: f64,
    /// Draw "Page N of M" in the bottom margin.
    pub page_numbers: bool,
    pub min_orphan_lines: usize,
    pub min_widow_lines: usize,
    pub title_color: Color,
    pub label_color: Color,
    pub text_color: Color,
    pub muted_color: Color,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            size: PageSize::A4,
            margin: Edges::uniform(50.0),
            font_size: 12.0,
            line_height: 18.0,
            message_spacing: 10.0,
            title: "Conversation Transcript".to_string(),
            title_size: 18.0,
            date_size: 10.0,
            header_spacing: 30.0,
            footer: "End of Conversation".to_string(),
            footer_size: 10.0,
            page_numbers: false,
            min_orphan_lines: 2,
            min_widow_lines: 2,
            title_color: Color::TITLE_GREY,
            label_color: Color::ROLE_BLUE,
            text_color: Color::BLACK,
            muted_color: Color::MUTED_GREY,
        }
    }
}

impl LayoutConfig {
    /// Width available to a line of body text.
    pub fn content_width(&self) -> f64 {
        self.size.dimensions().0 - self.margin.horizontal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn role_parsing_is_lenient_about_case() {
        assert_eq!(Role::parse(" User "), Some(Role::User));
        assert_eq!(Role::parse("ASSISTANT"), Some(Role::Assistant));
        assert_eq!(Role::parse("system"), None);
        assert_eq!(Role::parse(""), None);
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let values = vec![
            json!({"role": "user", "content": "Hi"}),
            json!({"role": "", "content": "no role"}),
            json!({"role": "assistant", "content": "   "}),
            json!({"role": "assistant", "content": 42}),
            json!({"content": "missing role"}),
            json!("not an object"),
            json!({"role": "assistant", "content": "Hello"}),
        ];
        let messages = messages_from_values(&values);
        assert_eq!(
            messages,
            vec![Message::user("Hi"), Message::assistant("Hello")]
        );
    }

    #[test]
    fn input_accepts_bare_array() {
        let input: TranscriptInput =
            serde_json::from_str(r#"[{"role":"user","content":"Hi"}]"#).unwrap();
        let (messages, _, config) = input.into_parts();
        assert_eq!(messages.len(), 1);
        assert_eq!(config.font_size, 12.0);
    }

    #[test]
    fn input_accepts_object_with_config() {
        let input: TranscriptInput = serde_json::from_str(
            r#"{
                "messages": [{"role":"user","content":"Hi"}],
                "metadata": {"title": "Support chat", "generatedOn": "2026-02-14"},
                "config": {"size": "Letter", "lineHeight": 20, "pageNumbers": true}
            }"#,
        )
        .unwrap();
        let (messages, metadata, config) = input.into_parts();
        assert_eq!(messages.len(), 1);
        assert_eq!(metadata.title.as_deref(), Some("Support chat"));
        assert_eq!(metadata.generated_on, NaiveDate::from_ymd_opt(2026, 2, 14));
        assert_eq!(config.size.dimensions(), (612.0, 792.0));
        assert_eq!(config.line_height, 20.0);
        assert!(config.page_numbers);
        assert_eq!(config.margin.left, 50.0);
    }

    #[test]
    fn metadata_title_becomes_the_heading() {
        let input: TranscriptInput = serde_json::from_str(
            r#"{"messages": [{"role":"user","content":"Hi"}], "metadata": {"title": "Support chat"}}"#,
        )
        .unwrap();
        let (_, metadata, config) = input.into_parts();
        assert_eq!(metadata.title.as_deref(), Some("Support chat"));
        assert_eq!(config.title, "Support chat");

        let input: TranscriptInput =
            serde_json::from_str(r#"{"messages": [{"role":"user","content":"Hi"}]}"#).unwrap();
        let (_, _, config) = input.into_parts();
        assert_eq!(config.title, "Conversation Transcript");
    }

    #[test]
    fn with_title_sets_heading_and_metadata() {
        let input: TranscriptInput =
            serde_json::from_str(r#"[{"role":"user","content":"Hi"}]"#).unwrap();
        let (_, metadata, config) = input.with_title("Support chat").into_parts();
        assert_eq!(metadata.title.as_deref(), Some("Support chat"));
        assert_eq!(config.title, "Support chat");
    }

    #[test]
    fn default_content_width_is_a4_minus_margins() {
        let config = LayoutConfig::default();
        assert!((config.content_width() - 495.28).abs() < 1e-9);
    }
}
