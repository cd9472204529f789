//! # Styles
//!
//! Colors and the inline run styles recognized in message text.

use serde::{Deserialize, Serialize};

use crate::font::StandardFont;

/// An RGB color with components in 0.0 - 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
    /// Blue used for role labels.
    pub const ROLE_BLUE: Color = Color {
        r: 0.0,
        g: 0.53,
        b: 0.71,
    };
    pub const TITLE_GREY: Color = Color {
        r: 0.1,
        g: 0.1,
        b: 0.1,
    };
    pub const MUTED_GREY: Color = Color {
        r: 0.4,
        g: 0.4,
        b: 0.4,
    };
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// Inline style of a run of message text.
///
/// The styles are exclusive: a span is bold, italic, code, or none of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RunStyle {
    #[default]
    Plain,
    Bold,
    Italic,
    Code,
}

impl RunStyle {
    pub fn is_bold(self) -> bool {
        self == RunStyle::Bold
    }

    pub fn is_italic(self) -> bool {
        self == RunStyle::Italic
    }

    pub fn is_code(self) -> bool {
        self == RunStyle::Code
    }

    /// The standard font a run of this style is set in.
    pub fn font(self) -> StandardFont {
        match self {
            RunStyle::Plain => StandardFont::Helvetica,
            RunStyle::Bold => StandardFont::HelveticaBold,
            RunStyle::Italic => StandardFont::HelveticaOblique,
            RunStyle::Code => StandardFont::Courier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_style_maps_to_its_own_font() {
        let fonts = [
            RunStyle::Plain.font(),
            RunStyle::Bold.font(),
            RunStyle::Italic.font(),
            RunStyle::Code.font(),
        ];
        for (i, a) in fonts.iter().enumerate() {
            for b in &fonts[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn flags_are_exclusive() {
        assert!(RunStyle::Bold.is_bold() && !RunStyle::Bold.is_italic());
        assert!(RunStyle::Code.is_code() && !RunStyle::Code.is_bold());
        assert!(!RunStyle::Plain.is_bold() && !RunStyle::Plain.is_code());
    }
}
