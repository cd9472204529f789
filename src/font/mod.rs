//! # Font Management
//!
//! The transcript is set in four of the 14 standard PDF fonts, which need no
//! embedding: Helvetica for body text, Helvetica-Bold for labels and bold
//! spans, Helvetica-Oblique for italic spans and Courier for inline code.
//!
//! [`FontContext`] is the measurement side of the drawing contract. It is
//! pure: measuring never touches layout state.

pub mod metrics;

pub use metrics::StandardFontMetrics;

use crate::style::RunStyle;
use metrics::{COURIER_METRICS, HELVETICA_BOLD_METRICS, HELVETICA_METRICS};

/// The standard PDF fonts the transcript uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    Courier,
}

impl StandardFont {
    /// The PDF name for this font.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
            Self::HelveticaOblique => "Helvetica-Oblique",
            Self::Courier => "Courier",
        }
    }

    /// Width table for this font. The oblique cut shares Helvetica's widths.
    pub fn metrics(&self) -> &'static StandardFontMetrics {
        match self {
            Self::Helvetica | Self::HelveticaOblique => &HELVETICA_METRICS,
            Self::HelveticaBold => &HELVETICA_BOLD_METRICS,
            Self::Courier => &COURIER_METRICS,
        }
    }
}

/// Fonts registered for one render, in resource order (`/F0`, `/F1`, ...).
pub struct FontContext {
    fonts: Vec<StandardFont>,
}

impl Default for FontContext {
    fn default() -> Self {
        Self::new()
    }
}

impl FontContext {
    pub fn new() -> Self {
        Self {
            fonts: vec![
                StandardFont::Helvetica,
                StandardFont::HelveticaBold,
                StandardFont::HelveticaOblique,
                StandardFont::Courier,
            ],
        }
    }

    /// A context with an explicit font list, in resource order.
    pub fn with_fonts(fonts: Vec<StandardFont>) -> Self {
        Self { fonts }
    }

    /// All registered fonts.
    pub fn fonts(&self) -> &[StandardFont] {
        &self.fonts
    }

    /// Position of `font` in the resource dictionary, if registered.
    pub fn resource_index(&self, font: StandardFont) -> Option<usize> {
        self.fonts.iter().position(|f| *f == font)
    }

    /// Get the advance width of a single character in points.
    pub fn char_width(&self, ch: char, font: StandardFont, font_size: f64) -> f64 {
        font.metrics().char_width(ch, font_size)
    }

    /// Measure the width of a string in points.
    pub fn width_of_text_at_size(&self, text: &str, font: StandardFont, font_size: f64) -> f64 {
        font.metrics().measure_string(text, font_size)
    }

    /// Measure text set in the font of an inline run style.
    pub fn measure_run(&self, text: &str, style: RunStyle, font_size: f64) -> f64 {
        self.width_of_text_at_size(text, style.font(), font_size)
    }
}

/// Map a Unicode codepoint to a WinAnsiEncoding byte value.
///
/// WinAnsiEncoding is based on Windows-1252. Most codepoints in
/// 0x20..=0x7E and 0xA0..=0xFF map directly. The 0x80..=0x9F range
/// contains special mappings for smart quotes, bullets, dashes, etc.
pub fn to_winansi(ch: char) -> Option<u8> {
    let cp = ch as u32;
    if (0x20..=0x7E).contains(&cp) || (0xA0..=0xFF).contains(&cp) {
        return Some(cp as u8);
    }
    match cp {
        0x20AC => Some(0x80), // Euro sign
        0x201A => Some(0x82), // Single low-9 quotation mark
        0x0192 => Some(0x83), // Latin small letter f with hook
        0x201E => Some(0x84), // Double low-9 quotation mark
        0x2026 => Some(0x85), // Horizontal ellipsis
        0x2020 => Some(0x86), // Dagger
        0x2021 => Some(0x87), // Double dagger
        0x02C6 => Some(0x88), // Modifier letter circumflex accent
        0x2030 => Some(0x89), // Per mille sign
        0x0160 => Some(0x8A), // Latin capital letter S with caron
        0x2039 => Some(0x8B), // Single left-pointing angle quotation
        0x0152 => Some(0x8C), // Latin capital ligature OE
        0x017D => Some(0x8E), // Latin capital letter Z with caron
        0x2018 => Some(0x91), // Left single quotation mark
        0x2019 => Some(0x92), // Right single quotation mark
        0x201C => Some(0x93), // Left double quotation mark
        0x201D => Some(0x94), // Right double quotation mark
        0x2022 => Some(0x95), // Bullet
        0x2013 => Some(0x96), // En dash
        0x2014 => Some(0x97), // Em dash
        0x02DC => Some(0x98), // Small tilde
        0x2122 => Some(0x99), // Trade mark sign
        0x0161 => Some(0x9A), // Latin small letter s with caron
        0x203A => Some(0x9B), // Single right-pointing angle quotation
        0x0153 => Some(0x9C), // Latin small ligature oe
        0x017E => Some(0x9E), // Latin small letter z with caron
        0x0178 => Some(0x9F), // Latin capital letter Y with diaeresis
        _ => None,
    }
}
