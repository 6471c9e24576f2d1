//! Error type shared by the document builder and the renderer.

use std::io;

use thiserror::Error;

/// Failures that abort a document build.
///
/// Missing optional content and layout overflow never surface here; they are
/// handled by skipping the block or starting a new page.
#[derive(Debug, Error)]
pub enum PdfBuildError {
    /// No usable font family could be loaded.
    #[error("failed to load fonts: {0}")]
    FontLoad(#[source] genpdf::error::Error),

    /// The configured logo could not be read or decoded.
    #[error("failed to load logo image: {0}")]
    Image(#[source] genpdf::error::Error),

    /// The page model could not be turned into PDF output.
    #[error("failed to render document: {0}")]
    Render(#[source] genpdf::error::Error),

    /// The rendered document could not be written to disk.
    #[error("failed to write {path}: {source}")]
    Io {
        /// Target path of the failed write.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}
