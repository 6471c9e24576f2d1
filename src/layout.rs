//! Page model and the cursor/pagination canvas.
//!
//! Content blocks do not draw into a PDF directly.  They append positioned
//! [`DrawOp`]s to the pages of a [`Canvas`], which owns the running vertical
//! cursor and starts new pages.  The finished [`Document`] is a plain value
//! that can be inspected, compared or handed to [`crate::render`].

use std::fmt;
use std::sync::Arc;

use genpdf::style::Color;
use image::GenericImageView;

use crate::style::TextStyle;

/// Width of an A4 page in millimetres.
pub const A4_WIDTH_MM: f64 = 210.0;
/// Height of an A4 page in millimetres.
pub const A4_HEIGHT_MM: f64 = 297.0;

/// Slack for floating point noise in cursor arithmetic.
const TOLERANCE_MM: f64 = 1e-6;

/// Page margins in millimetres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Margins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Margins {
    /// Creates margins from the four sides.
    pub fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::new(20.0, 15.0, 10.0, 15.0)
    }
}

/// Size and margins shared by every page of a document.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
}

impl PageGeometry {
    /// A4 portrait with the given margins.
    pub fn a4(margins: Margins) -> Self {
        Self {
            width: A4_WIDTH_MM,
            height: A4_HEIGHT_MM,
            margins,
        }
    }

    /// Width between the left and right margins.
    pub fn printable_width(&self) -> f64 {
        self.width - self.margins.left - self.margins.right
    }

    /// Lowest y coordinate flowing content may reach.
    pub fn content_bottom(&self) -> f64 {
        self.height - self.margins.bottom
    }

    /// X coordinate of the right margin.
    pub fn right_edge(&self) -> f64 {
        self.width - self.margins.right
    }
}

/// Horizontal alignment of a text run relative to an anchor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Decoded image shared between the page model and the renderer.
#[derive(Clone)]
pub struct ImageData(Arc<image::DynamicImage>);

impl ImageData {
    pub fn new(image: image::DynamicImage) -> Self {
        Self(Arc::new(image))
    }

    pub fn image(&self) -> &image::DynamicImage {
        &self.0
    }
}

impl fmt::Debug for ImageData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (width, height) = self.0.dimensions();
        write!(f, "ImageData({width}x{height})")
    }
}

/// A positioned drawing primitive.  Coordinates are millimetres from the
/// top-left corner of the page; text is positioned by the top of its line.
#[derive(Clone, Debug)]
pub enum DrawOp {
    Text {
        x: f64,
        y: f64,
        text: String,
        style: TextStyle,
    },
    Line {
        from: (f64, f64),
        to: (f64, f64),
        color: Color,
    },
    Image {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        data: ImageData,
    },
}

impl DrawOp {
    /// Returns the text of a text operation.
    pub fn text(&self) -> Option<&str> {
        match self {
            DrawOp::Text { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Top y coordinate of the operation.
    pub fn top(&self) -> f64 {
        match self {
            DrawOp::Text { y, .. } | DrawOp::Image { y, .. } => *y,
            DrawOp::Line { from, to, .. } => from.1.min(to.1),
        }
    }
}

/// One page: flowing body content plus stamps added after layout.
#[derive(Clone, Debug, Default)]
pub struct Page {
    body: Vec<DrawOp>,
    footer: Vec<DrawOp>,
}

impl Page {
    /// Operations placed by the content blocks.
    pub fn body(&self) -> &[DrawOp] {
        &self.body
    }

    /// Operations stamped after layout, such as page numbers.
    pub fn footer(&self) -> &[DrawOp] {
        &self.footer
    }

    /// Body and footer operations in drawing order.
    pub fn ops(&self) -> impl Iterator<Item = &DrawOp> {
        self.body.iter().chain(self.footer.iter())
    }

    /// Texts of all operations in drawing order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops().filter_map(DrawOp::text).collect()
    }

    /// Returns true if any text operation contains `needle`.
    pub fn contains_text(&self, needle: &str) -> bool {
        self.ops()
            .filter_map(DrawOp::text)
            .any(|text| text.contains(needle))
    }
}

/// A laid-out document ready to be rendered.
#[derive(Clone, Debug)]
pub struct Document {
    geometry: PageGeometry,
    pages: Vec<Page>,
}

impl Document {
    pub fn geometry(&self) -> PageGeometry {
        self.geometry
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Pages under construction plus the running vertical cursor.
///
/// The cursor stays between the top margin and the content bottom; callers
/// ask [`Canvas::ensure_space`] before committing a block.
#[derive(Clone, Debug)]
pub struct Canvas {
    geometry: PageGeometry,
    pages: Vec<Page>,
    cursor: f64,
}

impl Canvas {
    /// Creates a canvas with one empty page and the cursor at the top margin.
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            pages: vec![Page::default()],
            cursor: geometry.margins.top,
        }
    }

    pub fn geometry(&self) -> PageGeometry {
        self.geometry
    }

    pub fn cursor(&self) -> f64 {
        self.cursor
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Zero-based index of the page receiving content.
    pub fn current_page(&self) -> usize {
        self.pages.len() - 1
    }

    /// Space left between the cursor and the bottom margin.
    pub fn remaining(&self) -> f64 {
        (self.geometry.content_bottom() - self.cursor).max(0.0)
    }

    /// Returns true if a block of `height` fits below the cursor.
    pub fn fits(&self, height: f64) -> bool {
        height <= self.remaining() + TOLERANCE_MM
    }

    /// Starts a new page and resets the cursor to the top margin.
    pub fn new_page(&mut self) {
        self.pages.push(Page::default());
        self.cursor = self.geometry.margins.top;
        log::debug!("started page {}", self.pages.len());
    }

    /// Starts a new page unless `height` fits on the current one.
    ///
    /// A block taller than a whole page is placed on a fresh page only if the
    /// current page already carries content; it then overflows downwards.
    /// Returns true if a page was started.
    pub fn ensure_space(&mut self, height: f64) -> bool {
        if self.fits(height) || self.at_page_top() {
            return false;
        }
        self.new_page();
        true
    }

    /// Returns true if nothing has been placed on the current page yet.
    pub fn at_page_top(&self) -> bool {
        (self.cursor - self.geometry.margins.top).abs() < TOLERANCE_MM
    }

    /// Moves the cursor down, clamped to the content bottom.
    pub fn advance(&mut self, height: f64) {
        self.cursor = (self.cursor + height).min(self.geometry.content_bottom());
    }

    /// Appends an operation to the current page body.
    pub fn push(&mut self, op: DrawOp) {
        let index = self.current_page();
        self.pages[index].body.push(op);
    }

    /// Replaces the footer stamps of every page.
    pub fn stamp_footers<F>(&mut self, mut stamp: F)
    where
        F: FnMut(usize, usize) -> Vec<DrawOp>,
    {
        let total = self.pages.len();
        for (index, page) in self.pages.iter_mut().enumerate() {
            page.footer = stamp(index + 1, total);
        }
    }

    /// Finishes layout and returns the document.
    pub fn into_document(self) -> Document {
        Document {
            geometry: self.geometry,
            pages: self.pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Canvas {
        Canvas::new(PageGeometry::a4(Margins::default()))
    }

    fn text(y: f64) -> DrawOp {
        DrawOp::Text {
            x: 20.0,
            y,
            text: "x".into(),
            style: TextStyle::new(),
        }
    }

    #[test]
    fn starts_at_top_margin() {
        let canvas = canvas();
        assert_eq!(canvas.cursor(), 10.0);
        assert_eq!(canvas.page_count(), 1);
        assert_eq!(canvas.remaining(), 272.0);
    }

    #[test]
    fn ensure_space_breaks_only_when_needed() {
        let mut canvas = canvas();
        canvas.advance(260.0);
        assert!(!canvas.ensure_space(12.0));
        assert!(canvas.ensure_space(12.5));
        assert_eq!(canvas.page_count(), 2);
        assert_eq!(canvas.cursor(), 10.0);
    }

    #[test]
    fn rounding_noise_does_not_break_pages() {
        let mut canvas = canvas();
        canvas.advance(271.99);
        assert!(canvas.remaining() < 0.01);
        assert!(canvas.fits(0.01));
        assert!(!canvas.ensure_space(0.01));
        assert_eq!(canvas.page_count(), 1);
    }

    #[test]
    fn oversized_block_on_empty_page_does_not_loop() {
        let mut canvas = canvas();
        assert!(!canvas.ensure_space(400.0));
        assert_eq!(canvas.page_count(), 1);
    }

    #[test]
    fn advance_never_passes_bottom_margin() {
        let mut canvas = canvas();
        canvas.advance(1000.0);
        assert_eq!(canvas.cursor(), 282.0);
        assert_eq!(canvas.remaining(), 0.0);
    }

    #[test]
    fn footer_stamps_replace_previous_ones_and_keep_body() {
        let mut canvas = canvas();
        canvas.push(text(10.0));
        canvas.new_page();
        canvas.push(text(10.0));

        canvas.stamp_footers(|page, total| vec![text(page as f64 + total as f64)]);
        canvas.stamp_footers(|page, _| vec![text(page as f64)]);

        let document = canvas.into_document();
        for page in document.pages() {
            assert_eq!(page.body().len(), 1);
            assert_eq!(page.footer().len(), 1);
        }
    }
}
