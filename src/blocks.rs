//! Content blocks with a pure height computation.
//!
//! A block is measured when it is built and knows its height before anything
//! is drawn, so the builder can decide on a page break first and then commit
//! the block at the cursor.

use genpdf::style::Color;
use rust_decimal::Decimal;

use crate::layout::{Alignment, DrawOp, ImageData, PageGeometry};
use crate::metrics::TextMeasure;
use crate::model::{BankAccount, ServiceLine};
use crate::money::{format_euro, format_number, format_percent, PriceSummary};
use crate::style::TextStyle;

/// Gap left below most blocks.
pub const BLOCK_SPACING: f64 = 4.0;
/// Vertical padding inside table rows.
pub const CELL_PADDING: f64 = 1.2;
/// Horizontal gap kept between table columns.
pub const COLUMN_GAP: f64 = 2.0;
/// Font size of the service table.
pub const TABLE_FONT_SIZE: u8 = 9;

const RULE_GREY: Color = Color::Rgb(190, 190, 190);

/// A measured unit of content.
pub trait Block {
    /// Vertical space the block occupies, trailing spacing included.
    fn required_height(&self) -> f64;

    /// Produces the block's operations with its top edge at `top`.
    fn draw(&self, geometry: &PageGeometry, top: f64) -> Vec<DrawOp>;
}

/// Returns the x coordinate at which `text` starts for the given alignment
/// between `left` and `right`.
pub fn aligned_x<M: TextMeasure + ?Sized>(
    measure: &M,
    text: &str,
    style: &TextStyle,
    alignment: Alignment,
    left: f64,
    right: f64,
) -> f64 {
    match alignment {
        Alignment::Left => left,
        Alignment::Center => left + (right - left - measure.text_width(text, style)) / 2.0,
        Alignment::Right => right - measure.text_width(text, style),
    }
}

/// Text placed at a fixed x offset.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    pub x: f64,
    pub text: String,
    pub style: TextStyle,
}

impl TextRun {
    pub fn new(x: f64, text: impl Into<String>, style: TextStyle) -> Self {
        Self {
            x,
            text: text.into(),
            style,
        }
    }
}

/// Stacked single lines of text, one run per line.
#[derive(Clone, Debug, Default)]
pub struct LinesBlock {
    lines: Vec<TextRun>,
    spacing_after: f64,
}

impl LinesBlock {
    pub fn new(spacing_after: f64) -> Self {
        Self {
            lines: Vec::new(),
            spacing_after,
        }
    }

    pub fn push(&mut self, run: TextRun) {
        self.lines.push(run);
    }

    pub fn with_line(mut self, run: TextRun) -> Self {
        self.push(run);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }
}

impl Block for LinesBlock {
    fn required_height(&self) -> f64 {
        if self.lines.is_empty() {
            return 0.0;
        }
        self.lines
            .iter()
            .map(|run| run.style.line_height())
            .sum::<f64>()
            + self.spacing_after
    }

    fn draw(&self, _geometry: &PageGeometry, top: f64) -> Vec<DrawOp> {
        let mut y = top;
        let mut ops = Vec::with_capacity(self.lines.len());
        for run in &self.lines {
            ops.push(DrawOp::Text {
                x: run.x,
                y,
                text: run.text.clone(),
                style: run.style,
            });
            y += run.style.line_height();
        }
        ops
    }
}

/// Logo image at a fixed x offset.
#[derive(Clone, Debug)]
pub struct ImageBlock {
    pub data: ImageData,
    pub x: f64,
    pub width: f64,
    pub height: f64,
    pub spacing_after: f64,
}

impl Block for ImageBlock {
    fn required_height(&self) -> f64 {
        self.height + self.spacing_after
    }

    fn draw(&self, _geometry: &PageGeometry, top: f64) -> Vec<DrawOp> {
        vec![DrawOp::Image {
            x: self.x,
            y: top,
            width: self.width,
            height: self.height,
            data: self.data.clone(),
        }]
    }
}

/// Company title, optional sender line and an accent rule.
#[derive(Clone, Debug)]
pub struct HeaderBlock {
    pub lines: LinesBlock,
    pub rule_color: Color,
}

const HEADER_RULE_GAP: f64 = 1.5;

impl Block for HeaderBlock {
    fn required_height(&self) -> f64 {
        self.lines.required_height() + HEADER_RULE_GAP + BLOCK_SPACING
    }

    fn draw(&self, geometry: &PageGeometry, top: f64) -> Vec<DrawOp> {
        let mut ops = self.lines.draw(geometry, top);
        let y = top + self.lines.required_height() + HEADER_RULE_GAP / 2.0;
        ops.push(DrawOp::Line {
            from: (geometry.margins.left, y),
            to: (geometry.right_edge(), y),
            color: self.rule_color,
        });
        ops
    }
}

/// One column of the service table.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub title: &'static str,
    pub x: f64,
    pub width: f64,
    pub alignment: Alignment,
}

impl Column {
    fn text_x<M: TextMeasure + ?Sized>(&self, measure: &M, text: &str, style: &TextStyle) -> f64 {
        aligned_x(
            measure,
            text,
            style,
            self.alignment,
            self.x,
            self.x + self.width - COLUMN_GAP,
        )
    }
}

/// Column layout of the service table.
#[derive(Clone, Debug, PartialEq)]
pub struct TableColumns {
    columns: Vec<Column>,
    show_tax: bool,
}

/// Index of the description column.
pub const DESCRIPTION_COLUMN: usize = 1;

impl TableColumns {
    /// Splits the printable width; the tax column only exists if `show_tax`.
    pub fn new(geometry: &PageGeometry, show_tax: bool) -> Self {
        let total = geometry.printable_width();
        let mut specs: Vec<(&'static str, f64, Alignment)> = vec![
            ("Pos.", 0.07, Alignment::Left),
            ("Beschreibung", 0.0, Alignment::Left),
            ("Menge", 0.12, Alignment::Right),
            ("Einzelpreis", 0.14, Alignment::Right),
            ("MwSt", 0.08, Alignment::Right),
            ("Netto", 0.14, Alignment::Right),
        ];
        if show_tax {
            specs.push(("Steuer", 0.12, Alignment::Right));
        }
        let fixed: f64 = specs.iter().map(|(_, share, _)| share).sum();
        specs[DESCRIPTION_COLUMN].1 = 1.0 - fixed;

        let mut x = geometry.margins.left;
        let columns = specs
            .into_iter()
            .map(|(title, share, alignment)| {
                let width = total * share;
                let column = Column {
                    title,
                    x,
                    width,
                    alignment,
                };
                x += width;
                column
            })
            .collect();

        Self { columns, show_tax }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn show_tax(&self) -> bool {
        self.show_tax
    }

    /// Width available for text inside the description column.
    pub fn description_width(&self) -> f64 {
        self.columns[DESCRIPTION_COLUMN].width - COLUMN_GAP
    }
}

/// Header row of the service table, repeated on every page the table spans.
#[derive(Clone, Debug)]
pub struct TableHeader {
    cells: Vec<TextRun>,
    style: TextStyle,
    rule_color: Color,
}

impl TableHeader {
    pub fn new<M: TextMeasure + ?Sized>(
        measure: &M,
        columns: &TableColumns,
        primary: Color,
        rule_color: Color,
    ) -> Self {
        let style = TextStyle::new()
            .with_size(TABLE_FONT_SIZE)
            .bold()
            .with_color(primary);
        let cells = columns
            .columns()
            .iter()
            .map(|column| {
                TextRun::new(
                    column.text_x(measure, column.title, &style),
                    column.title,
                    style,
                )
            })
            .collect();
        Self {
            cells,
            style,
            rule_color,
        }
    }
}

impl Block for TableHeader {
    fn required_height(&self) -> f64 {
        self.style.line_height() + 2.0 * CELL_PADDING
    }

    fn draw(&self, geometry: &PageGeometry, top: f64) -> Vec<DrawOp> {
        let y = top + CELL_PADDING;
        let mut ops: Vec<DrawOp> = self
            .cells
            .iter()
            .map(|cell| DrawOp::Text {
                x: cell.x,
                y,
                text: cell.text.clone(),
                style: cell.style,
            })
            .collect();
        let rule_y = top + self.required_height();
        ops.push(DrawOp::Line {
            from: (geometry.margins.left, rule_y),
            to: (geometry.right_edge(), rule_y),
            color: self.rule_color,
        });
        ops
    }
}

/// One service line, the description wrapped inside its column.
#[derive(Clone, Debug)]
pub struct TableRow {
    /// Lines of each cell, in column order.
    cells: Vec<Vec<TextRun>>,
    style: TextStyle,
}

impl TableRow {
    pub fn new<M: TextMeasure + ?Sized>(
        measure: &M,
        columns: &TableColumns,
        position: usize,
        line: &ServiceLine,
    ) -> Self {
        let style = TextStyle::new().with_size(TABLE_FONT_SIZE);
        let quantity = match line.unit.as_deref().map(str::trim) {
            Some(unit) if !unit.is_empty() => format!("{} {}", format_number(line.quantity), unit),
            _ => format_number(line.quantity),
        };
        let mut values = vec![
            position.to_string(),
            line.name.clone(),
            quantity,
            format_euro(line.unit_price),
            format_percent(line.tax_rate),
            format_euro(line.net()),
        ];
        if columns.show_tax() {
            values.push(format_euro(line.tax()));
        }

        let cells = columns
            .columns()
            .iter()
            .zip(values)
            .enumerate()
            .map(|(index, (column, value))| {
                let lines = if index == DESCRIPTION_COLUMN {
                    measure.split_to_width(&value, columns.description_width(), &style)
                } else {
                    vec![value]
                };
                lines
                    .into_iter()
                    .map(|text| TextRun::new(column.text_x(measure, &text, &style), text, style))
                    .collect()
            })
            .collect();

        Self { cells, style }
    }

    /// Number of text lines in the tallest cell.
    pub fn line_count(&self) -> usize {
        self.cells.iter().map(Vec::len).max().unwrap_or(0).max(1)
    }

    /// Lines of the description cell.
    pub fn description(&self) -> Vec<&str> {
        self.cells[DESCRIPTION_COLUMN]
            .iter()
            .map(|run| run.text.as_str())
            .collect()
    }
}

impl Block for TableRow {
    fn required_height(&self) -> f64 {
        self.line_count() as f64 * self.style.line_height() + 2.0 * CELL_PADDING
    }

    fn draw(&self, geometry: &PageGeometry, top: f64) -> Vec<DrawOp> {
        let line_height = self.style.line_height();
        let mut ops = Vec::new();
        for cell in &self.cells {
            let mut y = top + CELL_PADDING;
            for run in cell {
                ops.push(DrawOp::Text {
                    x: run.x,
                    y,
                    text: run.text.clone(),
                    style: run.style,
                });
                y += line_height;
            }
        }
        let rule_y = top + self.required_height();
        ops.push(DrawOp::Line {
            from: (geometry.margins.left, rule_y),
            to: (geometry.right_edge(), rule_y),
            color: RULE_GREY,
        });
        ops
    }
}

/// Net, tax and gross totals below the table, right aligned.
#[derive(Clone, Debug)]
pub struct TotalsBlock {
    lines: LinesBlock,
}

impl TotalsBlock {
    pub fn new<M: TextMeasure + ?Sized>(
        measure: &M,
        geometry: &PageGeometry,
        summary: &PriceSummary,
        primary: Color,
    ) -> Self {
        let regular = TextStyle::new();
        let emphasized = TextStyle::new().bold().with_color(primary);
        let mut rows = vec![("Netto", summary.net, regular)];
        if summary.tax > Decimal::ZERO {
            rows.push(("MwSt", summary.tax, regular));
        }
        rows.push(("Brutto", summary.gross, emphasized));

        let right = geometry.right_edge() - COLUMN_GAP;
        let label_right = right - 35.0;
        let mut lines = LinesBlock::new(BLOCK_SPACING);
        for (label, amount, style) in rows {
            // label and amount share a line; the amount rides along as a
            // second run drawn at the same y
            let label_text = format!("{label}:");
            let amount_text = format_euro(amount);
            let label_x = aligned_x(
                measure,
                &label_text,
                &style,
                Alignment::Right,
                geometry.margins.left,
                label_right,
            );
            let amount_x = aligned_x(
                measure,
                &amount_text,
                &style,
                Alignment::Right,
                label_right,
                right,
            );
            lines.push(TextRun::new(label_x, label_text, style));
            lines.push(TextRun::new(amount_x, amount_text, style));
        }
        Self { lines }
    }

    /// Labels and amounts in drawing order.
    pub fn texts(&self) -> Vec<&str> {
        self.lines.lines.iter().map(|run| run.text.as_str()).collect()
    }
}

const TOTALS_TOP_GAP: f64 = 2.0;

impl Block for TotalsBlock {
    fn required_height(&self) -> f64 {
        let line_height: f64 = self
            .lines
            .lines
            .chunks(2)
            .map(|pair| pair[0].style.line_height())
            .sum();
        TOTALS_TOP_GAP + line_height + self.lines.spacing_after
    }

    fn draw(&self, _geometry: &PageGeometry, top: f64) -> Vec<DrawOp> {
        let mut ops = Vec::new();
        let mut y = top + TOTALS_TOP_GAP;
        for pair in self.lines.lines.chunks(2) {
            for run in pair {
                ops.push(DrawOp::Text {
                    x: run.x,
                    y,
                    text: run.text.clone(),
                    style: run.style,
                });
            }
            y += pair[0].style.line_height();
        }
        ops
    }
}

/// Groups an IBAN into blocks of four characters.
pub fn format_iban(iban: &str) -> String {
    let compact: Vec<char> = iban.chars().filter(|c| !c.is_whitespace()).collect();
    compact
        .chunks(4)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lines of the bank account block; empty if the account carries no data.
pub fn bank_account_lines(account: &BankAccount, x: f64, highlight: Color) -> LinesBlock {
    let mut block = LinesBlock::new(BLOCK_SPACING);
    if account.is_empty() {
        return block;
    }

    let style = TextStyle::new().with_size(9);
    block.push(TextRun::new(
        x,
        "Bankverbindung",
        style.bold().with_color(highlight),
    ));

    let fields = [
        ("Kontoinhaber", account.account_holder.as_deref().map(str::to_string)),
        ("Bank", account.bank_name.as_deref().map(str::to_string)),
        ("IBAN", account.iban.as_deref().map(format_iban)),
        ("BIC", account.bic.as_deref().map(str::to_string)),
    ];
    for (label, value) in fields {
        match value.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => {
                block.push(TextRun::new(x, format!("{label}: {value}"), style));
            }
            _ => {}
        }
    }
    block
}
