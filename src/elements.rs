//! Image helpers for the logo block.
//!
//! Decoding goes through the [`image`] crate with descriptive `genpdf` errors so
//! that a broken logo aborts the build with a message naming the source.

use std::path::Path;

use genpdf::error::{Context as _, Error};
use genpdf::Mm;
use image::GenericImageView;

use crate::model::LogoSource;

/// Resolution assumed for images without usable density information.
pub const DEFAULT_IMAGE_DPI: f64 = 300.0;
const MM_PER_INCH: f64 = 25.4;

pub(crate) fn mm_from_f64(value: f64) -> Mm {
    Mm::from(printpdf::Mm(value))
}

/// Natural size of `image` in millimetres at `dpi`.
pub fn estimated_image_size(image: &image::DynamicImage, dpi: f64) -> (f64, f64) {
    let (px_width, px_height) = image.dimensions();
    let width_mm = MM_PER_INCH * f64::from(px_width) / dpi;
    let height_mm = MM_PER_INCH * f64::from(px_height) / dpi;
    (width_mm, height_mm)
}

/// Loads an image from in-memory bytes.
pub fn decode_image_from_bytes(bytes: impl AsRef<[u8]>) -> Result<image::DynamicImage, Error> {
    image::load_from_memory(bytes.as_ref()).context("Failed to decode image from provided bytes")
}

/// Loads an image from the given path.
pub fn decode_image_from_path(path: impl AsRef<Path>) -> Result<image::DynamicImage, Error> {
    let path = path.as_ref();
    let reader = image::io::Reader::open(path)
        .with_context(|| format!("Failed to open image file {}", path.display()))?;
    reader
        .with_guessed_format()
        .context("Unable to determine image format")?
        .decode()
        .with_context(|| format!("Failed to decode image file {}", path.display()))
}

/// Decodes the configured logo.
pub fn decode_logo(source: &LogoSource) -> Result<image::DynamicImage, Error> {
    match source {
        LogoSource::Path(path) => decode_image_from_path(path),
        LogoSource::Bytes(bytes) => decode_image_from_bytes(bytes),
    }
}

/// Scales a natural size to `width`, shrinking further if the height would
/// exceed `max_height`.  Aspect ratio is preserved.
pub fn fit_size(natural: (f64, f64), width: f64, max_height: f64) -> (f64, f64) {
    let (natural_width, natural_height) = natural;
    if natural_width <= f64::EPSILON || natural_height <= f64::EPSILON {
        return (0.0, 0.0);
    }
    let mut scale = width / natural_width;
    if natural_height * scale > max_height {
        scale = max_height / natural_height;
    }
    (natural_width * scale, natural_height * scale)
}
