//! Text measurement used to decide line breaks and page breaks before drawing.

use genpdf::fonts::{FontCache, FontData, FontFamily};

use crate::style::{TextStyle, PT_TO_MM};

/// Measures the rendered width of text in millimetres.
///
/// Every layout decision goes through this trait, so the builder can be
/// driven with real font metrics for output or with a font-free estimate.
pub trait TextMeasure {
    /// Width of `text` set in `style`.
    fn text_width(&self, text: &str, style: &TextStyle) -> f64;

    /// Greedily wraps `text` so that every line fits into `max_width`.
    ///
    /// Explicit newlines are kept, empty input lines become empty output
    /// lines, and words wider than `max_width` are broken between characters.
    fn split_to_width(&self, text: &str, max_width: f64, style: &TextStyle) -> Vec<String> {
        let mut lines = Vec::new();
        for raw_line in text.lines() {
            let mut current = String::new();
            for word in raw_line.split_whitespace() {
                let candidate = if current.is_empty() {
                    word.to_string()
                } else {
                    format!("{current} {word}")
                };
                if self.text_width(&candidate, style) <= max_width {
                    current = candidate;
                    continue;
                }
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                if self.text_width(word, style) <= max_width {
                    current = word.to_string();
                } else {
                    let mut pieces = self.break_word(word, max_width, style);
                    current = pieces.pop().unwrap_or_default();
                    lines.extend(pieces);
                }
            }
            lines.push(current);
        }
        lines
    }

    /// Splits a single word into chunks no wider than `max_width`.
    fn break_word(&self, word: &str, max_width: f64, style: &TextStyle) -> Vec<String> {
        let mut pieces = Vec::new();
        let mut current = String::new();
        for ch in word.chars() {
            current.push(ch);
            if current.chars().count() > 1 && self.text_width(&current, style) > max_width {
                current.pop();
                pieces.push(std::mem::replace(&mut current, ch.to_string()));
            }
        }
        if !current.is_empty() {
            pieces.push(current);
        }
        pieces
    }
}

impl<T: TextMeasure + ?Sized> TextMeasure for &T {
    fn text_width(&self, text: &str, style: &TextStyle) -> f64 {
        (**self).text_width(text, style)
    }
}

/// Font-free width estimate based on an average glyph advance.
///
/// Good enough for layout previews and tests; the numbers are close to
/// Helvetica-like sans fonts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ApproximateMetrics {
    regular_advance: f64,
    bold_advance: f64,
}

impl Default for ApproximateMetrics {
    fn default() -> Self {
        Self {
            regular_advance: 0.5,
            bold_advance: 0.55,
        }
    }
}

impl ApproximateMetrics {
    /// Creates the estimate with the default advances.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a custom advance (in ems) for regular and bold text.
    pub fn with_advances(regular_advance: f64, bold_advance: f64) -> Self {
        Self {
            regular_advance,
            bold_advance,
        }
    }
}

impl TextMeasure for ApproximateMetrics {
    fn text_width(&self, text: &str, style: &TextStyle) -> f64 {
        let advance = if style.is_bold() {
            self.bold_advance
        } else {
            self.regular_advance
        };
        text.chars().count() as f64 * f64::from(style.size()) * PT_TO_MM * advance
    }
}

/// Exact metrics taken from a loaded font family.
///
/// Also owns the font cache used later to embed the fonts into the PDF.
pub struct FontMetrics {
    cache: FontCache,
}

impl FontMetrics {
    /// Wraps a font family for measuring and rendering.
    pub fn new(family: FontFamily<FontData>) -> Self {
        Self {
            cache: FontCache::new(family),
        }
    }

    pub(crate) fn cache_mut(&mut self) -> &mut FontCache {
        &mut self.cache
    }
}

impl TextMeasure for FontMetrics {
    fn text_width(&self, text: &str, style: &TextStyle) -> f64 {
        let width: printpdf::Mm = style.to_genpdf().str_width(&self.cache, text).into();
        width.0
    }
}
