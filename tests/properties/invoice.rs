//! Property tests for invoice totals.

use proptest::prelude::*;
use rust_decimal::Decimal;

use corpbooks::core::{compute_invoice_totals, InvoiceItem};

fn item() -> impl Strategy<Value = InvoiceItem> {
    // quantities up to 1000.00 and prices up to 100000.00
    (0i64..=100_000, 0i64..=10_000_000).prop_map(|(quantity, price)| InvoiceItem {
        description: "Line".to_string(),
        quantity: Decimal::new(quantity, 2),
        unit_price: Decimal::new(price, 2),
        line_total: Decimal::ZERO,
    })
}

fn rate() -> impl Strategy<Value = Decimal> {
    (0i64..=10_000).prop_map(|bp| Decimal::new(bp, 4))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: the total is always the subtotal plus the tax.
    #[test]
    fn property_total_is_subtotal_plus_tax(
        items in proptest::collection::vec(item(), 1..=8),
        rate in rate(),
        exempt in any::<bool>(),
    ) {
        let totals = compute_invoice_totals(&items, exempt, rate).unwrap();
        prop_assert_eq!(totals.total, totals.subtotal + totals.tax);
        prop_assert_eq!(totals.line_totals.len(), items.len());
        prop_assert!(totals.tax >= Decimal::ZERO);
        if exempt {
            prop_assert_eq!(totals.tax, Decimal::ZERO);
        }
    }

    /// PROPERTY: reordering the items never changes the subtotal or the tax.
    #[test]
    fn property_item_order_does_not_change_totals(
        items in proptest::collection::vec(item(), 1..=8),
        rate in rate(),
        shift in 0usize..8,
    ) {
        let forward = compute_invoice_totals(&items, false, rate).unwrap();

        let mut reversed = items.clone();
        reversed.reverse();
        let backward = compute_invoice_totals(&reversed, false, rate).unwrap();
        prop_assert_eq!(forward.subtotal, backward.subtotal);
        prop_assert_eq!(forward.tax, backward.tax);

        let mut rotated = items;
        let len = rotated.len();
        rotated.rotate_left(shift % len);
        let rotated = compute_invoice_totals(&rotated, false, rate).unwrap();
        prop_assert_eq!(forward.subtotal, rotated.subtotal);
        prop_assert_eq!(forward.total, rotated.total);
    }
}
