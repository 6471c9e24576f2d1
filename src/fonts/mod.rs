//! Font discovery and loading.
//!
//! Font files are looked up in, in order:
//!
//! 1. the directory named by `HANDWERK_PDF_FONTS_DIR`,
//! 2. `assets/fonts` next to the running executable,
//! 3. `assets/fonts` inside the crate directory.
//!
//! A family named `Name` consists of `Name-Regular.ttf`, `Name-Bold.ttf`,
//! `Name-Italic.ttf` and `Name-BoldItalic.ttf`.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::Error;
use genpdf::fonts::{self, FontData, FontFamily};
use log::{debug, warn};

/// Environment variable overriding the font directory.
pub const FONTS_DIR_ENV: &str = "HANDWERK_PDF_FONTS_DIR";

/// Name of the default font family.
pub const DEFAULT_FONT_FAMILY_NAME: &str = "Roboto";

const FONT_STYLES: &[&str] = &["Regular", "Bold", "Italic", "BoldItalic"];

/// Directory holding the fonts shipped with the crate sources.
pub fn bundled_fonts_source_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts")
}

fn font_directory_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = env::var_os(FONTS_DIR_ENV) {
        if !path.is_empty() {
            candidates.push(PathBuf::from(path));
        }
    }

    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            candidates.push(bin_dir.join("assets/fonts"));
        }
    }

    let manifest_candidate = bundled_fonts_source_dir();
    if !candidates.contains(&manifest_candidate) {
        candidates.push(manifest_candidate);
    }

    candidates
}

fn missing_font_files(path: &Path, family: &str) -> Vec<String> {
    FONT_STYLES
        .iter()
        .map(|style| format!("{family}-{style}.ttf"))
        .filter(|name| !path.join(name).is_file())
        .collect()
}

/// Finds the first candidate directory that holds all files of `family`.
pub fn resolve_font_directory(family: &str) -> Result<PathBuf, Error> {
    let mut attempts = Vec::new();

    for candidate in font_directory_candidates() {
        if !candidate.is_dir() {
            attempts.push(format!("{} (directory missing)", candidate.display()));
            continue;
        }

        let missing = missing_font_files(&candidate, family);
        if missing.is_empty() {
            return Ok(candidate);
        }
        attempts.push(format!(
            "{} (missing files [{}])",
            candidate.display(),
            missing.join(", ")
        ));
    }

    Err(Error::new(
        format!(
            "Unable to locate font family '{}'. Checked: {}. Set {} to a directory with the font files.",
            family,
            attempts.join(", "),
            FONTS_DIR_ENV
        ),
        io::Error::new(io::ErrorKind::NotFound, "font directory not found"),
    ))
}

fn load_family(family: &str) -> Result<FontFamily<FontData>, Error> {
    let directory = resolve_font_directory(family)?;
    debug!("loading font family '{}' from {}", family, directory.display());

    fonts::from_files(&directory, family, None).map_err(|err| {
        Error::new(
            format!(
                "Failed to load font family '{}' from {}: {}",
                family,
                directory.display(),
                err
            ),
            io::Error::new(io::ErrorKind::Other, err.to_string()),
        )
    })
}

/// Loads the default Roboto family.
pub fn default_font_family() -> Result<FontFamily<FontData>, Error> {
    load_family(DEFAULT_FONT_FAMILY_NAME)
}

/// Loads the tenant's font family, falling back to the default family.
pub fn font_family(requested: Option<&str>) -> Result<FontFamily<FontData>, Error> {
    match requested.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) if name != DEFAULT_FONT_FAMILY_NAME => match load_family(name) {
            Ok(family) => Ok(family),
            Err(err) => {
                warn!(
                    "Font family '{}' unavailable ({}); falling back to '{}'.",
                    name, err, DEFAULT_FONT_FAMILY_NAME
                );
                default_font_family()
            }
        },
        _ => default_font_family(),
    }
}

/// Indicates whether the default font family can be loaded from disk.
pub fn default_fonts_available() -> bool {
    resolve_font_directory(DEFAULT_FONT_FAMILY_NAME).is_ok()
}
