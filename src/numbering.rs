//! Document identifiers and output file names.

use chrono::{Datelike, Local};

use crate::model::{DocumentKind, DocumentRecord};

/// Convention for turning a record into a printable document id.
///
/// The default produces `RE-0007-2024` for invoice 7 issued in 2024 and
/// `AN-0007-2024` for the matching offer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocIdFormat {
    invoice_prefix: String,
    offer_prefix: String,
    zero_pad: usize,
}

impl Default for DocIdFormat {
    fn default() -> Self {
        Self {
            invoice_prefix: "RE".to_string(),
            offer_prefix: "AN".to_string(),
            zero_pad: 4,
        }
    }
}

impl DocIdFormat {
    /// Creates a format with custom prefixes and the default padding.
    pub fn new(invoice_prefix: impl Into<String>, offer_prefix: impl Into<String>) -> Self {
        Self {
            invoice_prefix: invoice_prefix.into(),
            offer_prefix: offer_prefix.into(),
            ..Self::default()
        }
    }

    /// Sets zero-padding width and returns the updated format.
    pub fn with_padding(mut self, width: usize) -> Self {
        self.zero_pad = width;
        self
    }

    fn prefix(&self, kind: DocumentKind) -> &str {
        match kind {
            DocumentKind::Invoice => &self.invoice_prefix,
            DocumentKind::Offer => &self.offer_prefix,
        }
    }

    /// Formats the id for an explicit issuing year.
    pub fn format_with_year(&self, kind: DocumentKind, id: u64, year: i32) -> String {
        format!(
            "{}-{:0>width$}-{}",
            self.prefix(kind),
            id,
            year,
            width = self.zero_pad
        )
    }

    /// Formats the id of `record`, taking the year from its date or today.
    pub fn format(&self, record: &DocumentRecord) -> String {
        let year = record
            .date
            .map(|date| date.year())
            .unwrap_or_else(|| Local::now().year());
        self.format_with_year(record.kind, record.id, year)
    }
}

/// Builds the document id with the default convention.
pub fn build_doc_id(record: &DocumentRecord) -> String {
    DocIdFormat::default().format(record)
}

/// Output file name: `<id> [<company>] [<last name>].pdf`.
pub fn file_name(doc_id: &str, record: &DocumentRecord) -> String {
    let mut name = doc_id.to_string();
    let parts = [&record.customer.company, &record.customer.last_name];
    for part in parts.into_iter().flatten() {
        let part = sanitize(part);
        if !part.is_empty() {
            name.push(' ');
            name.push_str(&part);
        }
    }
    name.push_str(".pdf");
    name
}

fn sanitize(part: &str) -> String {
    part.trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            other => other,
        })
        .collect()
}

/// Upper-cases the first character and lower-cases the rest.
pub fn capitalize_first_letter(input: &str) -> String {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Customer;
    use chrono::NaiveDate;

    fn invoice(id: u64, company: Option<&str>, last_name: Option<&str>) -> DocumentRecord {
        DocumentRecord {
            kind: DocumentKind::Invoice,
            id,
            date: NaiveDate::from_ymd_opt(2024, 3, 1),
            customer: Customer {
                company: company.map(str::to_string),
                last_name: last_name.map(str::to_string),
                ..Customer::default()
            },
            ..DocumentRecord::default()
        }
    }

    #[test]
    fn id_is_prefixed_padded_and_dated() {
        assert_eq!(build_doc_id(&invoice(7, None, None)), "RE-0007-2024");
        let offer = DocumentRecord {
            kind: DocumentKind::Offer,
            ..invoice(12345, None, None)
        };
        assert_eq!(build_doc_id(&offer), "AN-12345-2024");
    }

    #[test]
    fn custom_format_changes_prefix_and_padding() {
        let format = DocIdFormat::new("R", "A").with_padding(6);
        assert_eq!(
            format.format_with_year(DocumentKind::Invoice, 42, 2023),
            "R-000042-2023"
        );
    }

    #[test]
    fn file_name_omits_missing_segments() {
        let record = invoice(7, Some("Acme"), None);
        let id = build_doc_id(&record);
        assert_eq!(file_name(&id, &record), "RE-0007-2024 Acme.pdf");

        let record = invoice(7, None, Some("Meier"));
        assert_eq!(file_name(&id, &record), "RE-0007-2024 Meier.pdf");

        let record = invoice(7, Some("Acme"), Some("Meier"));
        assert_eq!(file_name(&id, &record), "RE-0007-2024 Acme Meier.pdf");

        let record = invoice(7, Some("  "), None);
        assert_eq!(file_name(&id, &record), "RE-0007-2024.pdf");
    }

    #[test]
    fn file_name_replaces_path_separators() {
        let record = invoice(7, Some("Bau/Holz GmbH"), None);
        assert_eq!(file_name("RE-0007-2024", &record), "RE-0007-2024 Bau_Holz GmbH.pdf");
    }

    #[test]
    fn capitalizes_invoice_types() {
        assert_eq!(capitalize_first_letter("ABSCHLAGSRECHNUNG"), "Abschlagsrechnung");
        assert_eq!(capitalize_first_letter("schlussrechnung"), "Schlussrechnung");
        assert_eq!(capitalize_first_letter(""), "");
    }
}
