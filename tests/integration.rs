//! Integration tests for the transcript rendering pipeline.
//!
//! These tests exercise the full path from messages or JSON to PDF output.
//! They verify:
//! - JSON input is accepted in both shapes and malformed entries are skipped
//! - Layout produces the right pages and never overlaps or clips lines
//! - Long messages flow across pages with the footer on the last one
//! - Errors carry the right variant and cause
//! - PDF output is structurally valid

use chrono::NaiveDate;

use transcript_pdf::error::WriteError;
use transcript_pdf::font::{FontContext, StandardFont};
use transcript_pdf::layout::LayoutPage;
use transcript_pdf::model::PageSize;
use transcript_pdf::pdf::DocumentWriter;
use transcript_pdf::{
    layout, render, render_json, render_with, render_with_config, LayoutConfig, Message,
    Metadata, TranscriptError,
};

// ─── Helpers ────────────────────────────────────────────────────

const FOOTER: &str = "End of Conversation";

fn metadata() -> Metadata {
    Metadata {
        generated_on: NaiveDate::from_ymd_opt(2026, 2, 14),
        ..Default::default()
    }
}

fn layout_default(messages: &[Message]) -> Vec<LayoutPage> {
    layout(messages, &metadata(), &LayoutConfig::default()).unwrap()
}

fn long_text(words: usize) -> String {
    (0..words)
        .map(|i| format!("word{}", i))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Baselines of body text on a page, top to bottom, deduplicated.
fn body_baselines(page: &LayoutPage, config: &LayoutConfig) -> Vec<f64> {
    let mut ys: Vec<f64> = Vec::new();
    for e in &page.elements {
        if e.font_size == config.font_size && ys.last().map_or(true, |y| (y - e.y).abs() > 1e-6) {
            ys.push(e.y);
        }
    }
    ys
}

fn assert_valid_pdf(bytes: &[u8]) {
    assert!(bytes.len() > 100, "PDF too small to be valid");
    assert!(bytes.starts_with(b"%PDF-1.7"), "Missing PDF header");
    assert!(bytes.windows(5).any(|w| w == b"%%EOF"), "Missing %%EOF marker");
    assert!(bytes.windows(4).any(|w| w == b"xref"), "Missing xref table");
    assert!(bytes.windows(7).any(|w| w == b"trailer"), "Missing trailer");
}

struct FailingWriter;

impl DocumentWriter for FailingWriter {
    fn write(
        &self,
        _pages: &[LayoutPage],
        _metadata: &Metadata,
        _font_context: &FontContext,
    ) -> Result<Vec<u8>, WriteError> {
        Err(WriteError::Font("Helvetica could not be embedded".to_string()))
    }
}

// ─── Scenarios ──────────────────────────────────────────────────

#[test]
fn short_conversation_fits_one_page() {
    let messages = vec![Message::user("Hi"), Message::assistant("**Hello** there")];
    let pages = layout_default(&messages);
    assert_eq!(pages.len(), 1);

    let page = &pages[0];
    assert!(page.contains_text("Conversation Transcript"));
    assert!(page.contains_text("Generated on February 14, 2026"));
    assert!(page.contains_text("USER: "));
    assert!(page.contains_text("Hi"));
    assert!(page.contains_text("ASSISTANT: "));
    assert!(page.contains_text(FOOTER));

    let hello = page.elements.iter().find(|e| e.text == "Hello").unwrap();
    assert_eq!(hello.font, StandardFont::HelveticaBold);
    let there = page.elements.iter().find(|e| e.text == " there").unwrap();
    assert_eq!(there.font, StandardFont::Helvetica);
    assert!(there.x > hello.x);
    assert_eq!(there.y, hello.y);
}

#[test]
fn long_message_spans_pages_with_footer_last() {
    let messages = vec![Message::user(long_text(2000))];
    let pages = layout_default(&messages);
    assert!(pages.len() > 1, "Expected several pages, got {}", pages.len());

    let last = pages.len() - 1;
    for (i, page) in pages.iter().enumerate() {
        assert_eq!(page.contains_text(FOOTER), i == last, "footer placement on page {}", i);
    }
    assert_eq!(
        pages.iter().flat_map(|p| &p.elements).filter(|e| e.text == "USER: ").count(),
        1,
        "label is drawn once per message"
    );
}

#[test]
fn empty_array_is_invalid_input() {
    let err = render_json("[]").unwrap_err();
    assert!(matches!(err, TranscriptError::InvalidInput(_)));

    let err = render(&[], &metadata()).unwrap_err();
    assert!(matches!(err, TranscriptError::InvalidInput(_)));
}

// ─── Layout properties ──────────────────────────────────────────

#[test]
fn lines_never_overlap() {
    let config = LayoutConfig::default();
    let messages: Vec<Message> = (0..30)
        .map(|i| {
            if i % 2 == 0 {
                Message::user(long_text(40 + i * 7))
            } else {
                Message::assistant(format!("Reply with `code` and *emphasis* {}", long_text(i * 11)))
            }
        })
        .collect();
    let pages = layout(&messages, &metadata(), &config).unwrap();

    for (p, page) in pages.iter().enumerate() {
        let ys = body_baselines(page, &config);
        for pair in ys.windows(2) {
            assert!(
                pair[0] - pair[1] >= config.line_height - 1e-6,
                "page {}: baselines {} and {} overlap",
                p,
                pair[0],
                pair[1]
            );
        }
    }
}

#[test]
fn body_text_stays_inside_margins() {
    let config = LayoutConfig::default();
    let fonts = FontContext::new();
    let messages = vec![
        Message::user(long_text(600)),
        Message::assistant(format!("**{}**", long_text(300))),
        Message::user(format!("`{}`", "x".repeat(400))),
    ];
    let pages = layout(&messages, &metadata(), &config).unwrap();

    for page in &pages {
        let right = page.width - config.margin.right;
        for e in page.elements.iter().filter(|e| e.font_size == config.font_size) {
            let end = e.x + fonts.width_of_text_at_size(&e.text, e.font, e.font_size);
            assert!(end <= right + 1e-6, "{:?} runs past the right margin", e.text);
            assert!(e.x >= config.margin.left - 1e-6);
            assert!(e.y >= config.margin.bottom - 1e-6, "{:?} is below the margin", e.text);
            assert!(e.y <= page.height - config.margin.top + 1e-6);
        }
    }
}

#[test]
fn messages_keep_their_order_across_pages() {
    let messages: Vec<Message> = (0..40)
        .map(|i| {
            if i % 3 == 0 {
                Message::assistant(long_text(90))
            } else {
                Message::user(long_text(25))
            }
        })
        .collect();
    let pages = layout_default(&messages);

    let labels: Vec<&str> = pages
        .iter()
        .flat_map(|p| &p.elements)
        .filter(|e| e.text == "USER: " || e.text == "ASSISTANT: ")
        .map(|e| e.text.as_str())
        .collect();
    let expected: Vec<&str> = messages.iter().map(|m| m.role.label()).collect();
    assert_eq!(labels, expected);

    let config = LayoutConfig::default();
    for page in &pages {
        let ys = body_baselines(page, &config);
        assert!(ys.windows(2).all(|w| w[0] > w[1]), "cursor moved up the page");
    }
}

#[test]
fn long_url_moves_below_the_label_unbroken() {
    let url = format!("https://example.com/{}", "a".repeat(50));
    let pages = layout_default(&[Message::assistant(url.clone())]);
    let page = &pages[0];

    let label = page.elements.iter().find(|e| e.text == "ASSISTANT: ").unwrap();
    let link = page.elements.iter().find(|e| e.text == url).expect("url drawn whole");
    assert!(
        (label.y - link.y - LayoutConfig::default().line_height).abs() < 1e-6,
        "url should start on the line below the label"
    );
    assert_eq!(link.x, LayoutConfig::default().margin.left);
}

#[test]
fn pathological_word_terminates() {
    let messages = vec![Message::assistant("a".repeat(20_000))];
    let pages = layout_default(&messages);
    assert!(pages.len() > 1);
    assert!(pages.last().unwrap().contains_text(FOOTER));
}

#[test]
fn glyph_wider_than_column_is_layout_overflow() {
    let config = LayoutConfig {
        size: PageSize::Custom {
            width: 105.0,
            height: 400.0,
        },
        ..Default::default()
    };
    let err = render_with_config(&[Message::user("W")], &metadata(), &config).unwrap_err();
    match err {
        TranscriptError::LayoutOverflow { ch, width, available } => {
            assert_eq!(ch, 'W');
            assert!(width > available);
        }
        other => panic!("expected LayoutOverflow, got {:?}", other),
    }
}

#[test]
fn page_numbers_count_every_page() {
    let config = LayoutConfig {
        page_numbers: true,
        ..Default::default()
    };
    let pages = layout(&[Message::user(long_text(2000))], &metadata(), &config).unwrap();
    let total = pages.len();
    for (i, page) in pages.iter().enumerate() {
        assert!(page.contains_text(&format!("Page {} of {}", i + 1, total)));
    }
}

// ─── Errors ─────────────────────────────────────────────────────

#[test]
fn writer_failure_is_wrapped_with_its_cause() {
    let err = render_with(
        &FailingWriter,
        &[Message::user("Hi")],
        &metadata(),
        &LayoutConfig::default(),
    )
    .unwrap_err();

    assert!(matches!(err, TranscriptError::PdfGeneration { .. }));
    let source = std::error::Error::source(&err).expect("cause is kept");
    assert!(source.to_string().contains("Helvetica could not be embedded"));
}

#[test]
fn malformed_json_has_a_hint() {
    let err = render_json(r#"[{"role": "user", "content": "Hi",}]"#).unwrap_err();
    assert!(matches!(err, TranscriptError::Parse { .. }));
    assert!(err.to_string().contains("Hint:"));
}

#[test]
fn malformed_messages_are_skipped() {
    let json = r#"[
        {"role": "user", "content": "Hi"},
        {"role": "system", "content": "ignored"},
        {"role": "assistant"},
        {"role": "assistant", "content": "Hello"}
    ]"#;
    assert_valid_pdf(&render_json(json).unwrap());
}

#[test]
fn all_malformed_messages_is_invalid_input() {
    let err = render_json(r#"[{"role": "system", "content": "x"}, {"content": "y"}]"#).unwrap_err();
    assert!(matches!(err, TranscriptError::InvalidInput(_)));
}

#[test]
fn unprintable_only_message_is_invalid_input() {
    let err = render(&[Message::user("\u{1F600}\u{1F600}")], &metadata()).unwrap_err();
    assert!(matches!(err, TranscriptError::InvalidInput(_)));
}

#[test]
fn whitespace_only_markup_is_invalid_input() {
    let err = render(&[Message::user("` `")], &metadata()).unwrap_err();
    assert!(matches!(err, TranscriptError::InvalidInput(_)));

    let pages = layout_default(&[Message::user("** **"), Message::assistant("Hello")]);
    assert!(!pages[0].contains_text("USER: "));
    assert!(pages[0].contains_text("Hello"));
}

// ─── PDF output ─────────────────────────────────────────────────

#[test]
fn render_produces_valid_pdf() {
    let bytes = render(
        &[Message::user("Hi"), Message::assistant("**Hello** there")],
        &metadata(),
    )
    .unwrap();
    assert_valid_pdf(&bytes);
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("/Count 1"));
    assert!(text.contains("/BaseFont /Helvetica-Bold"));
}

#[test]
fn json_document_carries_metadata_and_config() {
    let json = r#"{
        "messages": [{"role": "user", "content": "Hi"}],
        "metadata": {"title": "Support chat", "author": "Help desk", "generatedOn": "2026-02-14"},
        "config": {"size": "Letter"}
    }"#;
    let bytes = render_json(json).unwrap();
    assert_valid_pdf(&bytes);
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("/Title (Support chat)"));
    assert!(text.contains("/Author (Help desk)"));
    assert!(text.contains("/MediaBox [0 0 612.00 792.00]"));
}

#[test]
fn long_transcript_page_count_matches_layout() {
    let messages = vec![Message::assistant(long_text(2000))];
    let pages = layout_default(&messages);
    let bytes = render(&messages, &metadata()).unwrap();
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains(&format!("/Count {}", pages.len())));
}

#[test]
fn concurrent_renders_are_isolated() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                render(&[Message::user(long_text(100 * (i + 1)))], &metadata()).map(|b| b.len())
            })
        })
        .collect();
    for handle in handles {
        assert!(handle.join().unwrap().unwrap() > 0);
    }
}
