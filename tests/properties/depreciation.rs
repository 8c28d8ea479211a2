//! Property tests for declining-balance depreciation.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use corpbooks::core::{commit_depreciation, CapitalAsset, FiscalYear, FiscalYearEnd};

fn asset() -> impl Strategy<Value = CapitalAsset> {
    (
        prop_oneof![Just("8"), Just("10"), Just("12"), Just("50")],
        1i64..=100_000_000,
        0i64..=1_000_000,
        1u32..=12,
    )
        .prop_map(|(class, cost, tax, month)| CapitalAsset {
            id: "a1".to_string(),
            description: "Equipment".to_string(),
            cca_class: class.to_string(),
            purchase_date: NaiveDate::from_ymd_opt(2024, month, 1).unwrap(),
            purchase_amount: Decimal::new(cost, 2),
            tax_paid: Decimal::new(tax, 2),
            accumulated_depreciation: Decimal::ZERO,
            disposal: None,
            depreciation: vec![],
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: book value never increases and never drops below zero.
    #[test]
    fn property_book_value_never_increases(
        mut asset in asset(),
        years in 1i32..=12,
    ) {
        let end = FiscalYearEnd::DECEMBER_31;
        let mut last = asset.book_value().unwrap();
        for year in 2024..2024 + years {
            let date = NaiveDate::from_ymd_opt(year, 12, 31).unwrap();
            let entry = commit_depreciation(&mut asset, FiscalYear(year), end, date).unwrap();
            let value = asset.book_value().unwrap();

            prop_assert!(entry.amount >= Decimal::ZERO);
            prop_assert!(value <= last, "book value rose from {last} to {value}");
            prop_assert!(value >= Decimal::ZERO);
            prop_assert_eq!(entry.closing_book_value, value);
            last = value;
        }
        prop_assert_eq!(asset.depreciation.len(), years as usize);
    }
}
