//! Colours, text styles and the tenant theme.

use genpdf::style::{Color, Style};
use thiserror::Error;

/// Conversion factor from typographic points to millimetres.
pub const PT_TO_MM: f64 = 25.4 / 72.0;

/// Line height relative to the font size.
pub const LINE_HEIGHT_FACTOR: f64 = 1.15;

/// Default text size in points.
pub const BODY_FONT_SIZE: u8 = 10;

const BLACK: Color = Color::Rgb(0, 0, 0);

/// Style attributes of a single run of text in the page model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    size: u8,
    bold: bool,
    color: Color,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: BODY_FONT_SIZE,
            bold: false,
            color: BLACK,
        }
    }
}

impl TextStyle {
    /// Creates the default body style (10 pt, regular, black).
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the font size in points.
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Returns whether the text is set in bold.
    pub fn is_bold(&self) -> bool {
        self.bold
    }

    /// Returns the text colour.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Sets the font size and returns the updated style.
    pub fn with_size(mut self, size: u8) -> Self {
        self.size = size;
        self
    }

    /// Marks the style as bold.
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Sets the colour and returns the updated style.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Height of one line of text in millimetres.
    pub fn line_height(&self) -> f64 {
        f64::from(self.size) * LINE_HEIGHT_FACTOR * PT_TO_MM
    }

    /// Converts the style into its `genpdf` counterpart.
    pub fn to_genpdf(&self) -> Style {
        let mut style = Style::new()
            .with_font_size(self.size)
            .with_color(self.color);
        if self.bold {
            style.set_bold();
        }
        style
    }
}

/// Error returned by [`parse_hex_color`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("invalid colour `{input}`; expected #RGB or #RRGGBB")]
pub struct ColorParseError {
    input: String,
}

/// Parses `#RGB` or `#RRGGBB` hex notation.
pub fn parse_hex_color(input: &str) -> Result<Color, ColorParseError> {
    let err = || ColorParseError {
        input: input.to_string(),
    };
    let hex = input.trim().strip_prefix('#').ok_or_else(err)?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(err());
    }

    let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| err());
    match hex.len() {
        3 => {
            let expand = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            Ok(Color::Rgb(expand(0)?, expand(1)?, expand(2)?))
        }
        6 => Ok(Color::Rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        _ => Err(err()),
    }
}

/// Parses an optional tenant colour, falling back to black.
pub fn color_or_black(input: Option<&str>) -> Color {
    match input {
        Some(value) if !value.trim().is_empty() => match parse_hex_color(value) {
            Ok(color) => color,
            Err(err) => {
                log::warn!("{err}; using black");
                BLACK
            }
        },
        _ => BLACK,
    }
}

/// Tenant styling that stays fixed for the whole build.
#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
    /// Colour of titles and the document number.
    pub primary: Color,
    /// Accent colour for rules and the construction reference.
    pub highlight: Color,
    /// Requested font family name, if any.
    pub font: Option<String>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: BLACK,
            highlight: BLACK,
            font: None,
        }
    }
}

impl Theme {
    /// Builds the theme from the tenant's print settings.
    pub fn from_settings(settings: &crate::model::PrintSettings) -> Self {
        Self {
            primary: color_or_black(settings.primary_color.as_deref()),
            highlight: color_or_black(settings.highlight_color.as_deref()),
            font: settings.font.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!(parse_hex_color("#ff8000"), Ok(Color::Rgb(255, 128, 0)));
        assert_eq!(parse_hex_color("#000"), Ok(Color::Rgb(0, 0, 0)));
        assert_eq!(parse_hex_color("#fa0"), Ok(Color::Rgb(255, 170, 0)));
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(parse_hex_color("ff8000").is_err());
        assert!(parse_hex_color("#12FG34").is_err());
        assert!(parse_hex_color("#1234").is_err());
    }

    #[test]
    fn parse_error_names_the_input() {
        let err = parse_hex_color("blau").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid colour `blau`; expected #RGB or #RRGGBB"
        );
        let source: &dyn std::error::Error = &err;
        assert!(source.source().is_none());
    }

    #[test]
    fn missing_or_invalid_colour_falls_back_to_black() {
        assert_eq!(color_or_black(None), BLACK);
        assert_eq!(color_or_black(Some("")), BLACK);
        assert_eq!(color_or_black(Some("blue")), BLACK);
    }

    #[test]
    fn line_height_scales_with_font_size() {
        let body = TextStyle::new();
        let large = TextStyle::new().with_size(20);
        assert!((large.line_height() - 2.0 * body.line_height()).abs() < 1e-9);
    }
}
