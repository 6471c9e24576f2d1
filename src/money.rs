//! Service line arithmetic and German number formatting.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::model::ServiceLine;

/// Rounds to currency precision, midpoint away from zero.
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

impl ServiceLine {
    /// Net amount: `round(quantity × unit price, 2)`.
    pub fn net(&self) -> Decimal {
        round_currency(self.quantity * self.unit_price)
    }

    /// Tax amount: `round(net × rate / 100, 2)` for positive rates, else zero.
    pub fn tax(&self) -> Decimal {
        if self.tax_rate > Decimal::ZERO {
            round_currency(self.net() * self.tax_rate / Decimal::ONE_HUNDRED)
        } else {
            Decimal::ZERO
        }
    }

    /// Net plus tax.
    pub fn gross(&self) -> Decimal {
        self.net() + self.tax()
    }
}

/// Totals of a service table, summed from the per-row values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PriceSummary {
    /// Sum of row net amounts.
    pub net: Decimal,
    /// Sum of row tax amounts for rows with a positive rate.
    pub tax: Decimal,
    /// `net + tax`.
    pub gross: Decimal,
}

impl PriceSummary {
    /// Sums the rows of a service table.
    pub fn of(services: &[ServiceLine]) -> Self {
        let net: Decimal = services.iter().map(ServiceLine::net).sum();
        let tax: Decimal = services
            .iter()
            .filter(|line| line.tax_rate > Decimal::ZERO)
            .map(ServiceLine::tax)
            .sum();
        Self {
            net,
            tax,
            gross: net + tax,
        }
    }
}

/// Returns true when at least one row carries a positive tax rate.
pub fn has_taxed_rows(services: &[ServiceLine]) -> bool {
    services.iter().any(|line| line.tax_rate > Decimal::ZERO)
}

fn group_thousands(digits: &str) -> String {
    let bytes = digits.as_bytes();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, byte) in bytes.iter().enumerate() {
        if index > 0 && (bytes.len() - index) % 3 == 0 {
            out.push('.');
        }
        out.push(char::from(*byte));
    }
    out
}

fn format_german(value: Decimal, min_dp: u32, max_dp: u32) -> String {
    let rounded = value
        .round_dp_with_strategy(max_dp, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i.to_string(), f.to_string()),
        None => (text, String::new()),
    };

    let mut fraction = frac_part;
    while (fraction.len() as u32) < min_dp {
        fraction.push('0');
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&group_thousands(&int_part));
    if !fraction.is_empty() {
        out.push(',');
        out.push_str(&fraction);
    }
    out
}

/// Formats an amount the way `de-DE` prints euros: `1.234,50 €`.
pub fn format_euro(value: Decimal) -> String {
    format!("{} €", format_german(value, 2, 2))
}

/// Formats a plain number in `de-DE` notation with up to three decimals.
pub fn format_number(value: Decimal) -> String {
    format_german(value, 0, 3)
}

/// Formats a tax rate as `19 %`.
pub fn format_percent(value: Decimal) -> String {
    format!("{} %", format_german(value, 0, 2))
}
