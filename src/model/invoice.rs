//! Invoice record types.
//!
//! All monetary values are `rust_decimal::Decimal`; tax and gross amounts are
//! derived per line at construction time with 2-decimal rounding, so every
//! downstream aggregate is a sum of already-rounded values.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Round a monetary amount to 2 decimal places, midpoint away from zero.
pub(crate) fn round2(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Invoice number split into its sequence and year components.
///
/// KSeF numbers carry the form `"{seq}/{year}"`; a number without a slash
/// yields an empty year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceNumber {
    /// Full number as it appears in the source document.
    pub full: String,
    /// Sequence component (before the first `/`).
    pub sequence: String,
    /// Year component (after the first `/`, empty when absent).
    pub year: String,
}

impl InvoiceNumber {
    /// Split a raw invoice number into sequence and year.
    pub fn parse(raw: &str) -> Self {
        let mut parts = raw.splitn(2, '/');
        let sequence = parts.next().unwrap_or("").to_string();
        let year = parts.next().unwrap_or("").to_string();
        Self {
            full: raw.to_string(),
            sequence,
            year,
        }
    }
}

/// One party (seller or buyer) of an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub name: String,
    /// Tax identification number; optional for buyers.
    pub tax_id: Option<String>,
    pub address: String,
}

/// Tax-rate code of a line item: a numeric percentage or an exemption marker
/// such as `"np."` or `"zw"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxRate {
    Rate(Decimal),
    Exempt(String),
}

impl TaxRate {
    /// Parse a rate code; anything that is not a valid decimal is treated as
    /// an exemption marker.
    pub fn parse(code: &str) -> Self {
        let trimmed = code.trim();
        match trimmed.parse::<Decimal>() {
            Ok(rate) => TaxRate::Rate(rate),
            Err(_) => TaxRate::Exempt(trimmed.to_string()),
        }
    }

    /// Display form used in the tax-rate column.
    pub fn label(&self) -> String {
        match self {
            TaxRate::Rate(rate) => format!("{rate}%"),
            TaxRate::Exempt(code) => code.clone(),
        }
    }
}

/// One billable row of an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub unit: String,
    /// Quantity as text, preserving source formatting.
    pub quantity: String,
    pub unit_price: Decimal,
    /// Net line total as given by the source.
    pub net: Decimal,
    pub tax_rate: TaxRate,
    /// Derived: `round(net × rate / 100, 2)`; zero for exempt lines.
    pub tax_amount: Decimal,
    /// Derived: `round(net, 2) + tax_amount`; equals `net` exactly for
    /// exempt lines.
    pub gross: Decimal,
}

impl LineItem {
    /// Build a line item, deriving the tax amount and gross value.
    pub fn new(
        description: String,
        unit: String,
        quantity: String,
        unit_price: Decimal,
        net: Decimal,
        tax_rate: TaxRate,
    ) -> Self {
        let (tax_amount, gross) = match &tax_rate {
            TaxRate::Rate(rate) => {
                let tax = round2(net * *rate / Decimal::from(100));
                (tax, round2(net) + tax)
            }
            TaxRate::Exempt(_) => (Decimal::ZERO, net),
        };
        Self {
            description,
            unit,
            quantity,
            unit_price,
            net,
            tax_rate,
            tax_amount,
            gross,
        }
    }
}

/// A parsed invoice, immutable once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    pub number: InvoiceNumber,
    pub issue_date: String,
    /// Defaults to the issue date when the source omits it.
    pub sale_date: String,
    pub seller: Party,
    pub buyer: Party,
    pub currency: String,
    /// Declared document total, sourced independently of the line items and
    /// never recomputed from them.
    pub total_amount: Decimal,
    /// External tracking (KSeF) identifier.
    pub tracking_id: String,
    pub items: Vec<LineItem>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn item(net: Decimal, rate: TaxRate) -> LineItem {
        LineItem::new(
            "service".into(),
            "pcs".into(),
            "1".into(),
            net,
            net,
            rate,
        )
    }

    #[test]
    fn test_invoice_number_split() {
        let n = InvoiceNumber::parse("5/2024");
        assert_eq!(n.sequence, "5");
        assert_eq!(n.year, "2024");
        assert_eq!(n.full, "5/2024");

        let n = InvoiceNumber::parse("FV-17");
        assert_eq!(n.sequence, "FV-17");
        assert_eq!(n.year, "");
    }

    #[test]
    fn test_tax_rate_parse() {
        assert_eq!(TaxRate::parse("23"), TaxRate::Rate(dec!(23)));
        assert_eq!(TaxRate::parse(" 8 "), TaxRate::Rate(dec!(8)));
        assert_eq!(TaxRate::parse("np."), TaxRate::Exempt("np.".into()));
        assert_eq!(TaxRate::parse("zw"), TaxRate::Exempt("zw".into()));
    }

    #[test]
    fn test_rated_line_derivation() {
        let it = item(dec!(100.00), TaxRate::Rate(dec!(23)));
        assert_eq!(it.tax_amount, dec!(23.00));
        assert_eq!(it.gross, dec!(123.00));
    }

    #[test]
    fn test_rounding_is_applied_per_line() {
        // 10.005 * 23% = 2.30115 -> 2.30; gross = 10.01 + 2.30 = 12.31
        let it = item(dec!(10.005), TaxRate::Rate(dec!(23)));
        assert_eq!(it.tax_amount, dec!(2.30));
        assert_eq!(it.gross, dec!(12.31));
    }

    #[test]
    fn test_exempt_line() {
        let it = item(dec!(10.005), TaxRate::Exempt("np.".into()));
        assert_eq!(it.tax_amount, Decimal::ZERO);
        // Gross equals net exactly, without rounding.
        assert_eq!(it.gross, dec!(10.005));
    }

    proptest! {
        #[test]
        fn prop_tax_and_gross_derivation(net_milli in 0i64..10_000_000, rate in 0u32..=100) {
            let net = Decimal::new(net_milli, 3);
            let rate = Decimal::from(rate);
            let it = item(net, TaxRate::Rate(rate));

            let expected_tax = round2(net * rate / Decimal::from(100));
            prop_assert_eq!(it.tax_amount, expected_tax);
            prop_assert_eq!(it.gross, round2(net) + expected_tax);
            prop_assert!(it.tax_amount >= Decimal::ZERO);
        }
    }
}
