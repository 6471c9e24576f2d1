//! Serialization of a laid-out [`Document`] through `genpdf`'s low-level
//! renderer.
//!
//! Positions in the page model are absolute millimetres from the top-left
//! corner, so every page is drawn into its full-size area without margins.

use genpdf::error::Error;
use genpdf::fonts::FontCache;
use genpdf::render::{Area, Renderer};
use genpdf::style::Style;
use genpdf::{Position, Rotation, Scale, Size};

use crate::elements::{estimated_image_size, mm_from_f64, DEFAULT_IMAGE_DPI};
use crate::error::PdfBuildError;
use crate::layout::{Document, DrawOp};

fn position(x: f64, y: f64) -> Position {
    Position::new(mm_from_f64(x), mm_from_f64(y))
}

fn draw_op(area: &Area<'_>, font_cache: &FontCache, op: &DrawOp) -> Result<(), Error> {
    match op {
        DrawOp::Text { x, y, text, style } => {
            area.print_str(font_cache, position(*x, *y), style.to_genpdf(), text)?;
        }
        DrawOp::Line { from, to, color } => {
            // genpdf strokes lines at the default width; only the colour applies
            area.draw_line(
                vec![position(from.0, from.1), position(to.0, to.1)],
                Style::new().with_color(*color),
            );
        }
        DrawOp::Image {
            x,
            y,
            width,
            height,
            data,
        } => {
            let (natural_width, natural_height) =
                estimated_image_size(data.image(), DEFAULT_IMAGE_DPI);
            if natural_width > f64::EPSILON && natural_height > f64::EPSILON {
                let scale = Scale::new(width / natural_width, height / natural_height);
                // PDF images are anchored at their lower-left corner
                area.add_image(
                    data.image(),
                    position(*x, y + height),
                    scale,
                    Rotation::default(),
                    Some(DEFAULT_IMAGE_DPI),
                );
            }
        }
    }
    Ok(())
}

/// Renders every page of `document` and returns the PDF bytes.
///
/// The font cache must hold the family the document was measured with.
pub fn render_pdf(
    document: &Document,
    font_cache: &mut FontCache,
    title: &str,
) -> Result<Vec<u8>, PdfBuildError> {
    let geometry = document.geometry();
    let page_size = Size::new(mm_from_f64(geometry.width), mm_from_f64(geometry.height));

    let mut renderer = Renderer::new(page_size, title).map_err(PdfBuildError::Render)?;
    font_cache
        .load_pdf_fonts(&renderer)
        .map_err(PdfBuildError::Render)?;

    for (index, page) in document.pages().iter().enumerate() {
        if index > 0 {
            renderer.add_page(page_size);
        }
        let area = renderer
            .get_page(index)
            .ok_or_else(|| {
                PdfBuildError::Render(Error::new(
                    format!("page {} missing from renderer", index + 1),
                    genpdf::error::ErrorKind::InvalidData,
                ))
            })?
            .first_layer()
            .area();

        for op in page.ops() {
            draw_op(&area, font_cache, op).map_err(PdfBuildError::Render)?;
        }
    }

    let mut bytes = Vec::new();
    renderer.write(&mut bytes).map_err(PdfBuildError::Render)?;
    log::debug!(
        "rendered '{}' with {} pages ({} bytes)",
        title,
        document.page_count(),
        bytes.len()
    );
    Ok(bytes)
}
