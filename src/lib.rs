//! Core entry point for the handwerk_pdf crate.
//!
//! Offers and invoices are laid out by a [`builder::DocumentBuilder`] in a
//! single forward pass and rendered to PDF through `genpdf`.

pub mod blocks;
pub mod builder;
pub mod documents;
pub mod elements;
pub mod error;
pub mod fonts;
pub mod layout;
pub mod metrics;
pub mod model;
pub mod money;
pub mod numbering;
pub mod render;
pub mod style;

pub use builder::{DocumentBuilder, RenderedDocument};
pub use error::PdfBuildError;
