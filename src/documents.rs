//! Build sequences for invoices and offers.

use std::path::{Path, PathBuf};

use crate::builder::DocumentBuilder;
use crate::error::PdfBuildError;
use crate::layout::{Document, Margins};
use crate::metrics::{ApproximateMetrics, TextMeasure};
use crate::model::{DocumentKind, DocumentRecord, PrintSettings};
use crate::numbering::{build_doc_id, capitalize_first_letter, file_name};
use crate::style::Theme;

/// Margins used for offers and invoices.
pub const DOCUMENT_MARGINS: Margins = Margins {
    left: 20.0,
    right: 15.0,
    top: 10.0,
    bottom: 15.0,
};

const PLAIN_INVOICE_TYPE: &str = "RECHNUNG";

/// Runs the invoice sequence on `builder`, page numbering included.
pub fn lay_out_invoice<M: TextMeasure>(
    builder: &mut DocumentBuilder<M>,
    invoice: &DocumentRecord,
    settings: &PrintSettings,
) -> Result<(), PdfBuildError> {
    builder.add_logo(settings)?;
    builder.add_header(settings);
    builder.add_customer(&invoice.customer);
    builder.add_date(invoice, settings.date_alignment);
    builder.add_document_number(invoice, "Rechnung");

    if let Some(kind) = invoice.invoice_type.as_deref().map(str::trim) {
        if !kind.is_empty() && !kind.eq_ignore_ascii_case(PLAIN_INVOICE_TYPE) {
            builder.add_text(Some(&capitalize_first_letter(kind)));
        }
    }

    builder.add_construction(
        settings.highlight_color.as_deref(),
        invoice.construction.as_ref(),
    );
    builder.add_text(settings.invoice_text_before.as_deref());
    builder.add_services(&invoice.services);
    builder.add_text(invoice.text.as_deref());
    builder.add_text(settings.invoice_text_after.as_deref());
    builder.add_bank_account(settings);

    builder.enumerate_pages(&[build_doc_id(invoice)]);
    Ok(())
}

/// Runs the offer sequence on `builder`, page numbering included.
pub fn lay_out_offer<M: TextMeasure>(
    builder: &mut DocumentBuilder<M>,
    offer: &DocumentRecord,
    settings: &PrintSettings,
) -> Result<(), PdfBuildError> {
    builder.add_logo(settings)?;
    builder.add_header(settings);
    builder.add_customer(&offer.customer);
    builder.add_date(offer, settings.date_alignment);
    builder.add_document_number(offer, "Angebot");
    builder.add_construction(
        settings.highlight_color.as_deref(),
        offer.construction.as_ref(),
    );
    builder.add_text(settings.offer_text_before.as_deref());
    builder.add_services(&offer.services);
    builder.add_text(offer.text.as_deref());
    builder.add_text(settings.offer_text_after.as_deref());

    builder.enumerate_pages(&[build_doc_id(offer)]);
    Ok(())
}

/// Runs the sequence matching the record's kind.
pub fn lay_out<M: TextMeasure>(
    builder: &mut DocumentBuilder<M>,
    record: &DocumentRecord,
    settings: &PrintSettings,
) -> Result<(), PdfBuildError> {
    match record.kind {
        DocumentKind::Invoice => lay_out_invoice(builder, record, settings),
        DocumentKind::Offer => lay_out_offer(builder, record, settings),
    }
}

/// Output file name for `record`.
pub fn document_file_name(record: &DocumentRecord) -> String {
    file_name(&build_doc_id(record), record)
}

/// Lays out `record` with estimated metrics, without loading fonts.
pub fn preview_layout(
    record: &DocumentRecord,
    settings: &PrintSettings,
) -> Result<Document, PdfBuildError> {
    let mut builder = DocumentBuilder::with_metrics(
        document_file_name(record),
        DOCUMENT_MARGINS,
        Theme::from_settings(settings),
        ApproximateMetrics::new(),
    );
    lay_out(&mut builder, record, settings)?;
    Ok(builder.into_document())
}

/// Builds the PDF for `record` and saves it into `directory`.
pub fn create_pdf(
    record: &DocumentRecord,
    settings: &PrintSettings,
    directory: impl AsRef<Path>,
) -> Result<PathBuf, PdfBuildError> {
    let mut builder = DocumentBuilder::new(
        document_file_name(record),
        DOCUMENT_MARGINS,
        Theme::from_settings(settings),
    )?;
    lay_out(&mut builder, record, settings)?;
    builder.save(directory)
}

/// Builds and saves an invoice PDF.
pub fn create_invoice_pdf(
    invoice: &DocumentRecord,
    settings: &PrintSettings,
    directory: impl AsRef<Path>,
) -> Result<PathBuf, PdfBuildError> {
    let invoice = DocumentRecord {
        kind: DocumentKind::Invoice,
        ..invoice.clone()
    };
    create_pdf(&invoice, settings, directory)
}

/// Builds and saves an offer PDF.
pub fn create_offer_pdf(
    offer: &DocumentRecord,
    settings: &PrintSettings,
    directory: impl AsRef<Path>,
) -> Result<PathBuf, PdfBuildError> {
    let offer = DocumentRecord {
        kind: DocumentKind::Offer,
        ..offer.clone()
    };
    create_pdf(&offer, settings, directory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Construction, Customer, ServiceLine};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn record(kind: DocumentKind) -> DocumentRecord {
        DocumentRecord {
            kind,
            id: 7,
            date: NaiveDate::from_ymd_opt(2024, 5, 2),
            invoice_type: Some("ABSCHLAGSRECHNUNG".into()),
            customer: Customer {
                company: Some("Acme".into()),
                ..Customer::default()
            },
            services: vec![ServiceLine {
                name: "Estrich".into(),
                unit: Some("m²".into()),
                quantity: dec!(12.5),
                unit_price: dec!(30),
                tax_rate: dec!(19),
            }],
            construction: Some(Construction {
                id: 1,
                name: "Anbau Nord".into(),
            }),
            ..DocumentRecord::default()
        }
    }

    #[test]
    fn invoice_sequence_prints_type_and_reference() {
        let document = preview_layout(&record(DocumentKind::Invoice), &PrintSettings::default())
            .expect("layout");
        let page = &document.pages()[0];
        assert!(page.contains_text("Rechnung RE-0007-2024"));
        assert!(page.contains_text("Abschlagsrechnung"));
        assert!(page.contains_text("Bauvorhaben: Anbau Nord"));
        assert!(page.contains_text("Seite 1 / 1"));
        assert!(page.contains_text("RE-0007-2024"));
    }

    #[test]
    fn plain_invoice_type_is_not_repeated() {
        let mut invoice = record(DocumentKind::Invoice);
        invoice.invoice_type = Some("RECHNUNG".into());
        let document = preview_layout(&invoice, &PrintSettings::default()).expect("layout");
        assert!(!document.pages()[0].texts().contains(&"Rechnung"));
    }

    #[test]
    fn offer_sequence_uses_offer_label_and_texts() {
        let settings = PrintSettings {
            offer_text_before: Some("Wir bieten Ihnen an:".into()),
            invoice_text_before: Some("Wir berechnen:".into()),
            ..PrintSettings::default()
        };
        let document = preview_layout(&record(DocumentKind::Offer), &settings).expect("layout");
        let page = &document.pages()[0];
        assert!(page.contains_text("Angebot AN-0007-2024"));
        assert!(page.contains_text("Wir bieten Ihnen an:"));
        assert!(!page.contains_text("Wir berechnen:"));
        assert!(!page.contains_text("Abschlagsrechnung"));
    }

    #[test]
    fn file_name_includes_company() {
        assert_eq!(
            document_file_name(&record(DocumentKind::Invoice)),
            "RE-0007-2024 Acme.pdf"
        );
    }
}
