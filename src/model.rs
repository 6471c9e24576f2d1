//! Domain records consumed by the document builder.
//!
//! The structures mirror what the backend API hands out for offers, invoices
//! and tenant print settings.  They deserialize from the backend's camelCase
//! JSON and never fail on malformed amounts: prices, quantities and tax rates
//! go through [`lenient_decimal`], which coerces anything unreadable to zero
//! so that totals stay well-defined.

use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};

/// Kind of business document being printed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// A quote sent before the work starts.
    #[default]
    Offer,
    /// A bill for completed work.
    Invoice,
}

/// Recipient address fields.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Customer {
    pub company: Option<String>,
    pub salutation: Option<String>,
    pub first_name: Option<String>,
    #[serde(alias = "lastname")]
    pub last_name: Option<String>,
    pub street: Option<String>,
    pub number: Option<String>,
    pub zip: Option<String>,
    pub city: Option<String>,
}

/// One row of the service table.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceLine {
    pub name: String,
    pub unit: Option<String>,
    #[serde(deserialize_with = "lenient_decimal")]
    pub quantity: Decimal,
    #[serde(deserialize_with = "lenient_decimal")]
    pub unit_price: Decimal,
    #[serde(deserialize_with = "lenient_decimal")]
    pub tax_rate: Decimal,
}

/// Construction site the document refers to.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Construction {
    pub id: u64,
    pub name: String,
}

/// An offer or invoice together with everything printed on it.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DocumentRecord {
    pub kind: DocumentKind,
    pub id: u64,
    pub date: Option<NaiveDate>,
    /// Invoice sub-type such as `RECHNUNG` or `ABSCHLAGSRECHNUNG`.
    pub invoice_type: Option<String>,
    #[serde(flatten)]
    pub customer: Customer,
    #[serde(alias = "offerServices")]
    pub services: Vec<ServiceLine>,
    pub text: Option<String>,
    pub construction: Option<Construction>,
}

/// Where the logo image is read from.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogoSource {
    /// Image file on disk.
    Path(PathBuf),
    /// Encoded image bytes (PNG, JPEG, ...).
    Bytes(Vec<u8>),
}

/// Bank details printed at the end of an invoice.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BankAccount {
    pub account_holder: Option<String>,
    pub bank_name: Option<String>,
    pub iban: Option<String>,
    pub bic: Option<String>,
}

impl BankAccount {
    /// Returns true when none of the fields carry text.
    pub fn is_empty(&self) -> bool {
        [
            &self.account_holder,
            &self.bank_name,
            &self.iban,
            &self.bic,
        ]
        .iter()
        .all(|field| field.as_deref().map_or(true, |s| s.trim().is_empty()))
    }
}

/// Placement of the bank account block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BankPlacement {
    /// Drawn at the cursor as part of the content flow.
    #[default]
    Flow,
    /// Drawn at a fixed position above the bottom margin.
    Footer,
}

/// Horizontal placement of the date line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateAlignment {
    Left,
    #[default]
    Right,
}

/// Tenant-level styling and boilerplate.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PrintSettings {
    pub primary_color: Option<String>,
    pub highlight_color: Option<String>,
    pub font: Option<String>,
    pub logo: Option<LogoSource>,
    pub logo_width_mm: Option<f64>,
    pub company_name: Option<String>,
    /// Single-line sender address shown above the recipient.
    pub sender_line: Option<String>,
    pub bank_account: Option<BankAccount>,
    pub bank_placement: BankPlacement,
    pub date_alignment: DateAlignment,
    pub invoice_text_before: Option<String>,
    pub invoice_text_after: Option<String>,
    pub offer_text_before: Option<String>,
    pub offer_text_after: Option<String>,
}

/// Parses a decimal written with either `.` or `,` as separator.
///
/// Returns `None` for anything that is not a plain number.  With both
/// separators present, `.` groups thousands and `,` is the decimal separator;
/// English grouping such as `1,234.56` is rejected.
pub fn parse_decimal(input: &str) -> Option<Decimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let (Some(comma), Some(dot)) = (trimmed.find(','), trimmed.rfind('.')) {
        if comma < dot {
            return None;
        }
    }
    let normalized = if trimmed.contains(',') {
        trimmed.replace('.', "").replace(',', ".")
    } else {
        trimmed.to_string()
    };
    Decimal::from_str(&normalized).ok()
}

/// Deserializes numbers or numeric strings, coercing anything else to zero.
pub fn lenient_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Float(f64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    let value = match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Int(v)) => Decimal::from(v),
        Some(Raw::Float(v)) => Decimal::try_from(v).unwrap_or_default(),
        Some(Raw::Text(s)) => parse_decimal(&s).unwrap_or_default(),
        Some(Raw::Other(_)) | None => Decimal::ZERO,
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parse_decimal_accepts_both_separators() {
        assert_eq!(parse_decimal("12.5"), Some(dec!(12.5)));
        assert_eq!(parse_decimal("12,5"), Some(dec!(12.5)));
        assert_eq!(parse_decimal("1.234,56"), Some(dec!(1234.56)));
        assert_eq!(parse_decimal(" 7 "), Some(dec!(7)));
    }

    #[test]
    fn parse_decimal_rejects_garbage() {
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("abc"), None);
        assert_eq!(parse_decimal("12€"), None);
    }

    #[test]
    fn parse_decimal_rejects_english_grouping() {
        assert_eq!(parse_decimal("1,234.56"), None);
        assert_eq!(parse_decimal("12,5.0"), None);
        assert_eq!(parse_decimal("1.234.567,8"), Some(dec!(1234567.8)));
    }

    #[test]
    fn empty_bank_account_detected() {
        assert!(BankAccount::default().is_empty());
        let account = BankAccount {
            iban: Some("   ".into()),
            ..BankAccount::default()
        };
        assert!(account.is_empty());
        let account = BankAccount {
            bic: Some("COBADEFFXXX".into()),
            ..BankAccount::default()
        };
        assert!(!account.is_empty());
    }
}
