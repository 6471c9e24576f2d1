//! The document builder: a single forward pass of content blocks over A4 pages.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use genpdf::style::Color;
use log::{debug, info, warn};
use tempfile::NamedTempFile;

use crate::blocks::{
    aligned_x, bank_account_lines, Block, HeaderBlock, ImageBlock, LinesBlock, TableColumns,
    TableHeader, TableRow, TextRun, TotalsBlock, BLOCK_SPACING,
};
use crate::elements::{self, DEFAULT_IMAGE_DPI};
use crate::error::PdfBuildError;
use crate::fonts;
use crate::layout::{Alignment, Canvas, Document, DrawOp, ImageData, Margins, Page, PageGeometry};
use crate::metrics::{FontMetrics, TextMeasure};
use crate::model::{
    BankPlacement, Construction, Customer, DateAlignment, DocumentRecord, PrintSettings,
    ServiceLine,
};
use crate::money::{has_taxed_rows, PriceSummary};
use crate::numbering::DocIdFormat;
use crate::render;
use crate::style::{parse_hex_color, TextStyle, Theme};

/// Default logo width in millimetres.
pub const DEFAULT_LOGO_WIDTH_MM: f64 = 50.0;
/// Upper bound for the logo height in millimetres.
pub const MAX_LOGO_HEIGHT_MM: f64 = 35.0;

const TITLE_FONT_SIZE: u8 = 16;
const SENDER_FONT_SIZE: u8 = 8;
const DOCUMENT_NUMBER_FONT_SIZE: u8 = 14;
const FOOTER_FONT_SIZE: u8 = 8;

/// Rendered PDF together with its target file name.
#[derive(Clone, Debug)]
pub struct RenderedDocument {
    pub filename: String,
    pub page_count: usize,
    pub bytes: Vec<u8>,
}

/// Lays out one offer or invoice.
///
/// Every `add_*` call measures its block, starts a new page if the block does
/// not fit below the cursor, draws it and advances the cursor.  After the
/// last block [`enumerate_pages`](Self::enumerate_pages) stamps page numbers,
/// and [`render`](DocumentBuilder::render) or [`save`](DocumentBuilder::save)
/// consume the builder.
pub struct DocumentBuilder<M = FontMetrics> {
    filename: String,
    theme: Theme,
    canvas: Canvas,
    measure: M,
    doc_ids: DocIdFormat,
}

impl DocumentBuilder<FontMetrics> {
    /// Creates a builder that measures and renders with the theme's font
    /// family (falling back to the default family).
    pub fn new(
        filename: impl Into<String>,
        margins: Margins,
        theme: Theme,
    ) -> Result<Self, PdfBuildError> {
        let family = fonts::font_family(theme.font.as_deref()).map_err(PdfBuildError::FontLoad)?;
        Ok(Self::with_metrics(
            filename,
            margins,
            theme,
            FontMetrics::new(family),
        ))
    }

    /// Serializes the pages into PDF bytes.
    pub fn render(self) -> Result<RenderedDocument, PdfBuildError> {
        let Self {
            filename,
            canvas,
            mut measure,
            ..
        } = self;
        let document = canvas.into_document();
        let title = filename.trim_end_matches(".pdf").to_string();
        let bytes = render::render_pdf(&document, measure.cache_mut(), &title)?;
        Ok(RenderedDocument {
            filename,
            page_count: document.page_count(),
            bytes,
        })
    }

    /// Renders the document and writes it into `directory`.
    ///
    /// The file appears only after it has been rendered and written
    /// completely; a failed build leaves nothing behind.
    pub fn save(self, directory: impl AsRef<Path>) -> Result<PathBuf, PdfBuildError> {
        let rendered = self.render()?;
        let target = write_atomically(directory.as_ref(), &rendered.filename, &rendered.bytes)?;

        info!(
            "saved {} ({} pages, {} bytes)",
            target.display(),
            rendered.page_count,
            rendered.bytes.len()
        );
        Ok(target)
    }
}

impl<M: TextMeasure> DocumentBuilder<M> {
    /// Creates a builder on A4 pages using `measure` for all layout decisions.
    pub fn with_metrics(
        filename: impl Into<String>,
        margins: Margins,
        theme: Theme,
        measure: M,
    ) -> Self {
        Self {
            filename: filename.into(),
            theme,
            canvas: Canvas::new(PageGeometry::a4(margins)),
            measure,
            doc_ids: DocIdFormat::default(),
        }
    }

    /// Uses a custom document id convention for [`add_document_number`](Self::add_document_number).
    pub fn with_doc_id_format(mut self, format: DocIdFormat) -> Self {
        self.doc_ids = format;
        self
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Current vertical position in millimetres from the page top.
    pub fn cursor(&self) -> f64 {
        self.canvas.cursor()
    }

    /// Space left on the current page.
    pub fn remaining_height(&self) -> f64 {
        self.canvas.remaining()
    }

    pub fn page_count(&self) -> usize {
        self.canvas.page_count()
    }

    pub fn pages(&self) -> &[Page] {
        self.canvas.pages()
    }

    pub fn geometry(&self) -> PageGeometry {
        self.canvas.geometry()
    }

    /// Finishes layout without rendering.
    pub fn into_document(self) -> Document {
        self.canvas.into_document()
    }

    /// Places a block at the cursor, breaking the page first if needed.
    fn place<B: Block>(&mut self, block: &B) {
        let height = block.required_height();
        if height <= 0.0 {
            return;
        }
        if self.canvas.ensure_space(height) {
            debug!("page break before block of {height:.1} mm");
        }
        self.commit(block);
    }

    /// Draws a block at the cursor without checking for space.
    fn commit<B: Block>(&mut self, block: &B) {
        let geometry = self.canvas.geometry();
        for op in block.draw(&geometry, self.canvas.cursor()) {
            self.canvas.push(op);
        }
        self.canvas.advance(block.required_height());
    }

    /// Draws the tenant logo right-aligned at the top of the page.
    ///
    /// Without a configured logo this is a no-op; a logo that cannot be
    /// decoded aborts the build.
    pub fn add_logo(&mut self, settings: &PrintSettings) -> Result<(), PdfBuildError> {
        let Some(source) = settings.logo.as_ref() else {
            return Ok(());
        };
        let image = elements::decode_logo(source).map_err(PdfBuildError::Image)?;
        let natural = elements::estimated_image_size(&image, DEFAULT_IMAGE_DPI);
        let width = settings
            .logo_width_mm
            .filter(|width| *width > 0.0)
            .unwrap_or(DEFAULT_LOGO_WIDTH_MM)
            .min(self.geometry().printable_width());
        let (width, height) = elements::fit_size(natural, width, MAX_LOGO_HEIGHT_MM);
        if height <= 0.0 {
            warn!("logo has no visible size; skipping");
            return Ok(());
        }

        let block = ImageBlock {
            data: ImageData::new(image),
            x: self.geometry().right_edge() - width,
            width,
            height,
            spacing_after: BLOCK_SPACING,
        };
        self.place(&block);
        Ok(())
    }

    /// Draws the company title, the sender line and an accent rule.
    pub fn add_header(&mut self, settings: &PrintSettings) {
        let x = self.geometry().margins.left;
        let mut lines = LinesBlock::new(0.0);
        if let Some(name) = non_blank(settings.company_name.as_deref()) {
            let style = TextStyle::new()
                .with_size(TITLE_FONT_SIZE)
                .bold()
                .with_color(self.theme.primary);
            lines.push(TextRun::new(x, name, style));
        }
        if let Some(sender) = non_blank(settings.sender_line.as_deref()) {
            let style = TextStyle::new().with_size(SENDER_FONT_SIZE);
            lines.push(TextRun::new(x, sender, style));
        }

        let block = HeaderBlock {
            lines,
            rule_color: self.theme.highlight,
        };
        self.place(&block);
    }

    /// Renders the recipient address.
    pub fn add_customer(&mut self, customer: &Customer) {
        let x = self.geometry().margins.left;
        let style = TextStyle::new();
        let join = |parts: &[&Option<String>]| {
            parts
                .iter()
                .filter_map(|part| non_blank(part.as_deref()))
                .collect::<Vec<_>>()
                .join(" ")
        };

        let candidates = [
            join(&[&customer.company]),
            join(&[&customer.salutation, &customer.first_name, &customer.last_name]),
            join(&[&customer.street, &customer.number]),
            join(&[&customer.zip, &customer.city]),
        ];

        let mut block = LinesBlock::new(2.0 * BLOCK_SPACING);
        for line in candidates.into_iter().filter(|line| !line.is_empty()) {
            block.push(TextRun::new(x, line, style));
        }
        self.place(&block);
    }

    /// Renders `Datum: dd.mm.yyyy` for the record's date; no-op without one.
    pub fn add_date(&mut self, record: &DocumentRecord, alignment: DateAlignment) {
        let Some(date) = record.date else {
            return;
        };
        let style = TextStyle::new();
        let text = format!("Datum: {}", date.format("%d.%m.%Y"));
        let geometry = self.geometry();
        let alignment = match alignment {
            DateAlignment::Left => Alignment::Left,
            DateAlignment::Right => Alignment::Right,
        };
        let x = aligned_x(
            &self.measure,
            &text,
            &style,
            alignment,
            geometry.margins.left,
            geometry.right_edge(),
        );
        let block = LinesBlock::new(BLOCK_SPACING).with_line(TextRun::new(x, text, style));
        self.place(&block);
    }

    /// Renders `<label> <generated id>` in the primary colour.
    pub fn add_document_number(&mut self, record: &DocumentRecord, label: &str) {
        let text = format!("{} {}", label, self.doc_ids.format(record));
        let style = TextStyle::new()
            .with_size(DOCUMENT_NUMBER_FONT_SIZE)
            .bold()
            .with_color(self.theme.primary);
        let x = self.geometry().margins.left;
        let block = LinesBlock::new(BLOCK_SPACING).with_line(TextRun::new(x, text, style));
        self.place(&block);
    }

    /// Wraps `text` to the printable width and flows it line by line.
    ///
    /// Blank or missing text is a no-op.  Before each line a new page is
    /// started if less than one line height remains, so a paragraph may
    /// continue on the following page.
    pub fn add_text(&mut self, text: Option<&str>) {
        let Some(text) = non_blank(text) else {
            return;
        };
        let style = TextStyle::new();
        let geometry = self.geometry();
        let lines = self
            .measure
            .split_to_width(text, geometry.printable_width(), &style);
        let line_height = style.line_height();

        for line in lines {
            if self.canvas.ensure_space(line_height) {
                debug!("text continues on page {}", self.canvas.page_count());
            }
            if !line.is_empty() {
                self.canvas.push(DrawOp::Text {
                    x: geometry.margins.left,
                    y: self.canvas.cursor(),
                    text: line,
                    style,
                });
            }
            self.canvas.advance(line_height);
        }

        if self.canvas.fits(BLOCK_SPACING) {
            self.canvas.advance(BLOCK_SPACING);
        }
    }

    /// Renders `Bauvorhaben: <name>`; no-op without a construction site.
    ///
    /// `highlight` is a hex colour; missing or invalid values use the theme's
    /// highlight colour.
    pub fn add_construction(&mut self, highlight: Option<&str>, construction: Option<&Construction>) {
        let Some(construction) = construction else {
            return;
        };
        let Some(name) = non_blank(Some(construction.name.as_str())) else {
            return;
        };
        let color = highlight
            .and_then(|value| parse_hex_color(value).ok())
            .unwrap_or(self.theme.highlight);
        let style = TextStyle::new().bold().with_color(color);
        let x = self.geometry().margins.left;
        let block = LinesBlock::new(BLOCK_SPACING)
            .with_line(TextRun::new(x, format!("Bauvorhaben: {name}"), style));
        self.place(&block);
    }

    /// Renders the service table and its totals.
    ///
    /// A row that does not fully fit moves to a new page, and the header row
    /// is repeated there.  The totals are kept together as one block.
    pub fn add_services(&mut self, services: &[ServiceLine]) {
        if services.is_empty() {
            return;
        }
        let geometry = self.geometry();
        let columns = TableColumns::new(&geometry, has_taxed_rows(services));
        let header = TableHeader::new(
            &self.measure,
            &columns,
            self.theme.primary,
            self.theme.highlight,
        );
        let rows: Vec<TableRow> = services
            .iter()
            .enumerate()
            .map(|(index, line)| TableRow::new(&self.measure, &columns, index + 1, line))
            .collect();

        // the header never sits alone at the bottom of a page
        let first_row = rows.first().map_or(0.0, Block::required_height);
        self.canvas
            .ensure_space(header.required_height() + first_row);
        self.place(&header);

        for (index, row) in rows.iter().enumerate() {
            if !self.canvas.fits(row.required_height()) && !self.canvas.at_page_top() {
                debug!(
                    "service row {} moves to page {}",
                    index + 1,
                    self.canvas.page_count() + 1
                );
                self.canvas.new_page();
                self.commit(&header);
            }
            self.commit(row);
        }

        let summary = PriceSummary::of(services);
        let totals = TotalsBlock::new(&self.measure, &geometry, &summary, self.theme.primary);
        self.place(&totals);
    }

    /// Renders the bank account block.
    ///
    /// With [`BankPlacement::Footer`] the block sits directly above the bottom
    /// margin of the current page and the cursor does not move; if flowing
    /// content already reaches into that area a new page is started first.
    pub fn add_bank_account(&mut self, settings: &PrintSettings) {
        let Some(account) = settings.bank_account.as_ref() else {
            return;
        };
        let geometry = self.geometry();
        let block = bank_account_lines(account, geometry.margins.left, self.theme.highlight);
        if block.is_empty() {
            return;
        }

        match settings.bank_placement {
            BankPlacement::Flow => self.place(&block),
            BankPlacement::Footer => {
                let height = block.required_height() - BLOCK_SPACING;
                let top = geometry.content_bottom() - height;
                if self.canvas.cursor() > top {
                    self.canvas.new_page();
                }
                for op in block.draw(&geometry, top) {
                    self.canvas.push(op);
                }
            }
        }
    }

    /// Stamps `Seite X / N` and the reference tokens into the bottom margin of
    /// every page.  Body content and the cursor are left untouched; calling
    /// it again replaces the previous stamps.
    pub fn enumerate_pages<S: AsRef<str>>(&mut self, tokens: &[S]) {
        let geometry = self.geometry();
        let style = TextStyle::new()
            .with_size(FOOTER_FONT_SIZE)
            .with_color(Color::Rgb(90, 90, 90));
        let y = geometry.content_bottom() + (geometry.margins.bottom - style.line_height()) / 2.0;
        let reference = tokens
            .iter()
            .map(|token: &S| -> &str { token.as_ref().trim() })
            .filter(|token| !token.is_empty())
            .collect::<Vec<_>>()
            .join(" · ");
        let measure = &self.measure;

        self.canvas.stamp_footers(|page, total| {
            let label = format!("Seite {page} / {total}");
            let x = aligned_x(
                measure,
                &label,
                &style,
                Alignment::Right,
                geometry.margins.left,
                geometry.right_edge(),
            );
            let mut ops = vec![DrawOp::Text {
                x,
                y,
                text: label,
                style,
            }];
            if !reference.is_empty() {
                ops.push(DrawOp::Text {
                    x: geometry.margins.left,
                    y,
                    text: reference.clone(),
                    style,
                });
            }
            ops
        });
    }
}

/// Writes `bytes` to `directory/filename` through a uniquely named temporary
/// file in the same directory.  The temporary file is removed on every error
/// path, so the target either appears complete or not at all.
pub(crate) fn write_atomically(
    directory: &Path,
    filename: &str,
    bytes: &[u8],
) -> Result<PathBuf, PdfBuildError> {
    let target = directory.join(filename);

    let mut partial =
        NamedTempFile::new_in(directory).map_err(|source| io_error(directory, source))?;
    partial
        .as_file_mut()
        .write_all(bytes)
        .map_err(|source| io_error(partial.path(), source))?;
    partial
        .as_file()
        .sync_all()
        .map_err(|source| io_error(partial.path(), source))?;
    partial
        .persist(&target)
        .map_err(|err| io_error(&target, err.error))?;
    Ok(target)
}

fn io_error(path: &Path, source: io::Error) -> PdfBuildError {
    PdfBuildError::Io {
        path: path.display().to_string(),
        source,
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::ApproximateMetrics;
    use chrono::NaiveDate;
    use image::{DynamicImage, ImageBuffer, ImageOutputFormat, Rgb};
    use rust_decimal_macros::dec;
    use std::io::Cursor;

    use crate::model::{BankAccount, DocumentKind, LogoSource};

    fn builder() -> DocumentBuilder<ApproximateMetrics> {
        DocumentBuilder::with_metrics(
            "test.pdf",
            Margins::default(),
            Theme::default(),
            ApproximateMetrics::new(),
        )
    }

    fn png(width: u32, height: u32) -> Vec<u8> {
        let buffer = ImageBuffer::from_pixel(width, height, Rgb([200, 40, 40]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(buffer)
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .expect("encode png");
        bytes
    }

    #[test]
    fn logo_is_optional() {
        let mut builder = builder();
        builder.add_logo(&PrintSettings::default()).unwrap();
        assert_eq!(builder.cursor(), 10.0);
        assert!(builder.pages()[0].body().is_empty());
    }

    #[test]
    fn logo_advances_by_scaled_height() {
        let mut builder = builder();
        let settings = PrintSettings {
            logo: Some(LogoSource::Bytes(png(600, 300))),
            logo_width_mm: Some(40.0),
            ..PrintSettings::default()
        };
        builder.add_logo(&settings).unwrap();
        assert!((builder.cursor() - (10.0 + 20.0 + BLOCK_SPACING)).abs() < 1e-9);
        match &builder.pages()[0].body()[0] {
            DrawOp::Image { x, width, .. } => {
                assert!((x + width - 195.0).abs() < 1e-9);
            }
            other => panic!("expected image, got {other:?}"),
        }
    }

    #[test]
    fn corrupt_logo_aborts() {
        let mut builder = builder();
        let settings = PrintSettings {
            logo: Some(LogoSource::Bytes(b"not an image".to_vec())),
            ..PrintSettings::default()
        };
        assert!(matches!(
            builder.add_logo(&settings),
            Err(PdfBuildError::Image(_))
        ));
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .expect("list dir")
            .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn atomic_write_creates_only_the_target() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = write_atomically(dir.path(), "RE-0001-2024.pdf", b"%PDF-1.3").unwrap();
        assert_eq!(path, dir.path().join("RE-0001-2024.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.3");
        assert_eq!(entries(dir.path()), vec!["RE-0001-2024.pdf"]);

        // a second build under the same name replaces the first
        write_atomically(dir.path(), "RE-0001-2024.pdf", b"%PDF-1.4").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4");
        assert_eq!(entries(dir.path()), vec!["RE-0001-2024.pdf"]);
    }

    #[test]
    fn failed_write_leaves_no_partial_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        // a non-empty directory occupies the target name, so the final rename fails
        let blocker = dir.path().join("RE-0002-2024.pdf");
        std::fs::create_dir(&blocker).unwrap();
        std::fs::write(blocker.join("keep"), b"x").unwrap();

        let result = write_atomically(dir.path(), "RE-0002-2024.pdf", &[0u8; 64 * 1024]);

        assert!(matches!(result, Err(PdfBuildError::Io { .. })));
        assert_eq!(entries(dir.path()), vec!["RE-0002-2024.pdf"]);
        assert!(blocker.is_dir());
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("does-not-exist");
        let result = write_atomically(&missing, "RE-0003-2024.pdf", b"%PDF");
        match result {
            Err(PdfBuildError::Io { path, .. }) => assert!(path.contains("does-not-exist")),
            other => panic!("expected io error, got {other:?}"),
        }
        assert!(!missing.exists());
    }

    #[test]
    fn header_prints_company_and_sender() {
        let mut builder = builder();
        let settings = PrintSettings {
            company_name: Some("Malerbetrieb Klein".into()),
            sender_line: Some("Malerbetrieb Klein · Gartenweg 2 · 04109 Leipzig".into()),
            ..PrintSettings::default()
        };
        builder.add_header(&settings);
        let page = &builder.pages()[0];
        assert_eq!(
            page.texts(),
            vec![
                "Malerbetrieb Klein",
                "Malerbetrieb Klein · Gartenweg 2 · 04109 Leipzig"
            ]
        );
        assert!(page
            .body()
            .iter()
            .any(|op| matches!(op, DrawOp::Line { .. })));
        assert!(builder.cursor() > 10.0);
    }

    #[test]
    fn customer_skips_empty_lines() {
        let mut builder = builder();
        builder.add_customer(&Customer {
            salutation: Some("Herr".into()),
            first_name: Some("Max".into()),
            last_name: Some("Mustermann".into()),
            zip: Some("12345".into()),
            city: Some("Musterstadt".into()),
            ..Customer::default()
        });
        assert_eq!(
            builder.pages()[0].texts(),
            vec!["Herr Max Mustermann", "12345 Musterstadt"]
        );
    }

    #[test]
    fn date_is_right_aligned_by_default() {
        let mut builder = builder();
        let record = DocumentRecord {
            date: NaiveDate::from_ymd_opt(2024, 6, 15),
            ..DocumentRecord::default()
        };
        builder.add_date(&record, DateAlignment::Right);
        let metrics = ApproximateMetrics::new();
        match &builder.pages()[0].body()[0] {
            DrawOp::Text { x, text, style, .. } => {
                assert_eq!(text, "Datum: 15.06.2024");
                assert!((x + metrics.text_width(text, style) - 195.0).abs() < 1e-9);
            }
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn date_without_value_is_noop() {
        let mut builder = builder();
        builder.add_date(&DocumentRecord::default(), DateAlignment::Left);
        assert_eq!(builder.cursor(), 10.0);
    }

    #[test]
    fn document_number_uses_label_and_id() {
        let mut builder = builder();
        let record = DocumentRecord {
            kind: DocumentKind::Invoice,
            id: 7,
            date: NaiveDate::from_ymd_opt(2024, 1, 2),
            ..DocumentRecord::default()
        };
        builder.add_document_number(&record, "Rechnung");
        assert_eq!(builder.pages()[0].texts(), vec!["Rechnung RE-0007-2024"]);
    }

    #[test]
    fn empty_text_is_noop() {
        let mut builder = builder();
        builder.add_text(None);
        builder.add_text(Some(""));
        builder.add_text(Some("  \n "));
        assert_eq!(builder.cursor(), 10.0);
        assert_eq!(builder.page_count(), 1);
    }

    #[test]
    fn text_advances_by_line_count() {
        let mut builder = builder();
        builder.add_text(Some("eins\nzwei\ndrei"));
        let expected = 10.0 + 3.0 * TextStyle::new().line_height() + BLOCK_SPACING;
        assert!((builder.cursor() - expected).abs() < 1e-9);
    }

    #[test]
    fn construction_is_optional() {
        let mut builder = builder();
        builder.add_construction(None, None);
        assert_eq!(builder.cursor(), 10.0);

        builder.add_construction(
            Some("#ff0000"),
            Some(&Construction {
                id: 3,
                name: "Neubau Lindenweg".into(),
            }),
        );
        match &builder.pages()[0].body()[0] {
            DrawOp::Text { text, style, .. } => {
                assert_eq!(text, "Bauvorhaben: Neubau Lindenweg");
                assert_eq!(style.color(), Color::Rgb(255, 0, 0));
            }
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn tax_column_only_with_taxed_rows() {
        let untaxed = ServiceLine {
            name: "Material".into(),
            quantity: dec!(1),
            unit_price: dec!(10),
            ..ServiceLine::default()
        };
        let mut builder = builder();
        builder.add_services(&[untaxed.clone()]);
        assert!(!builder.pages()[0].contains_text("Steuer"));
        assert!(!builder.pages()[0].contains_text("MwSt:"));

        let taxed = ServiceLine {
            tax_rate: dec!(19),
            ..untaxed
        };
        let mut builder = self::builder();
        builder.add_services(&[taxed]);
        assert!(builder.pages()[0].contains_text("Steuer"));
        assert!(builder.pages()[0].contains_text("MwSt:"));
        assert!(builder.pages()[0].contains_text("11,90 €"));
    }

    #[test]
    fn bank_footer_does_not_move_cursor() {
        let mut builder = builder();
        builder.add_text(Some("Vielen Dank für Ihren Auftrag."));
        let before = builder.cursor();
        let settings = PrintSettings {
            bank_account: Some(BankAccount {
                bank_name: Some("Sparkasse".into()),
                iban: Some("DE89370400440532013000".into()),
                ..BankAccount::default()
            }),
            bank_placement: BankPlacement::Footer,
            ..PrintSettings::default()
        };
        builder.add_bank_account(&settings);
        assert_eq!(builder.cursor(), before);
        assert_eq!(builder.page_count(), 1);
        let last = builder.pages()[0].body().last().unwrap();
        assert!(last.top() < 282.0 && last.top() > 250.0);
    }

    #[test]
    fn bank_flow_advances_cursor() {
        let mut builder = builder();
        let settings = PrintSettings {
            bank_account: Some(BankAccount {
                iban: Some("DE89370400440532013000".into()),
                ..BankAccount::default()
            }),
            ..PrintSettings::default()
        };
        builder.add_bank_account(&settings);
        assert!(builder.cursor() > 10.0);
        assert!(builder.pages()[0].contains_text("IBAN: DE89 3704 0044 0532 0130 00"));
    }

    #[test]
    fn enumerate_pages_keeps_cursor() {
        let mut builder = builder();
        builder.add_text(Some("Hallo"));
        let cursor = builder.cursor();
        builder.enumerate_pages(&["RE-0001-2024"]);
        assert_eq!(builder.cursor(), cursor);
        let footer = builder.pages()[0].footer();
        assert_eq!(footer.len(), 2);
        assert_eq!(footer[0].text(), Some("Seite 1 / 1"));
        assert_eq!(footer[1].text(), Some("RE-0001-2024"));
        assert!(footer[0].top() > 282.0);
    }
}
