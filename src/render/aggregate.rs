//! Document-total aggregation.

use rust_decimal::Decimal;

use crate::model::{round2, LineItem};

/// Running document totals, accumulated over line items in document order.
///
/// Each sum adds already-rounded per-line values; nothing is re-rounded at
/// the aggregate level. The net sum rounds each line's net once, the same
/// rounding the gross derivation uses.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Totals {
    pub net: Decimal,
    pub tax: Decimal,
    pub gross: Decimal,
}

impl Totals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one line item into the running sums.
    pub fn add(&mut self, item: &LineItem) {
        self.net += round2(item.net);
        self.tax += item.tax_amount;
        self.gross += item.gross;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaxRate;
    use rust_decimal_macros::dec;

    fn item(net: Decimal) -> LineItem {
        LineItem::new(
            "svc".into(),
            "szt.".into(),
            "1".into(),
            net,
            net,
            TaxRate::Rate(dec!(23)),
        )
    }

    #[test]
    fn test_sums_follow_item_order() {
        let mut totals = Totals::new();
        totals.add(&item(dec!(100.00)));
        totals.add(&item(dec!(50.00)));
        assert_eq!(totals.net, dec!(150.00));
        assert_eq!(totals.tax, dec!(34.50));
        assert_eq!(totals.gross, dec!(184.50));
    }

    #[test]
    fn test_aggregate_of_rounded_lines_differs_from_rounding_once() {
        // Three lines of net 10.005 at 23%: per-line rounding gives
        // tax 2.30 and gross 12.31 each, so the document gross is 36.93.
        // Rounding once at the end would give round(3 * 10.005 * 1.23, 2)
        // = 36.92.
        let mut totals = Totals::new();
        for _ in 0..3 {
            totals.add(&item(dec!(10.005)));
        }
        assert_eq!(totals.gross, dec!(36.93));
        assert_eq!(totals.tax, dec!(6.90));

        let unrounded = dec!(10.005) * dec!(3) * dec!(1.23);
        assert_ne!(round2(unrounded), totals.gross);
    }

    #[test]
    fn test_exempt_items_contribute_zero_tax() {
        let mut totals = Totals::new();
        totals.add(&LineItem::new(
            "svc".into(),
            "szt.".into(),
            "1".into(),
            dec!(10),
            dec!(10),
            TaxRate::Exempt("np.".into()),
        ));
        assert_eq!(totals.tax, Decimal::ZERO);
        assert_eq!(totals.gross, dec!(10));
    }
}
