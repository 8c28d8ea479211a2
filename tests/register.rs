//! Depreciation commits through the asset register, driven from several threads

use chrono::NaiveDate;
use corpbooks::core::{read_books_json, AssetRegister, Error, FiscalYear};
use rust_decimal_macros::dec;
use std::fs::File;
use std::sync::Arc;
use std::thread;

fn register() -> AssetRegister {
    let file = File::open("tests/data/books.json").expect("fixture");
    let mut books = read_books_json(file).expect("valid books");
    books.normalize().expect("normalized");
    AssetRegister::new(books.company.fiscal_year_end, books.assets).expect("unique asset ids")
}

#[test]
fn racing_commits_record_one_entry() {
    let register = Arc::new(register());
    let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let register = Arc::clone(&register);
            thread::spawn(move || register.commit_depreciation("desk", FiscalYear(2024), date))
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let committed: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(committed.len(), 1);
    assert_eq!(committed[0].amount, dec!(1000.00));
    for err in results.iter().filter_map(|r| r.as_ref().err()) {
        assert_eq!(
            *err,
            Error::DuplicateDepreciationYear {
                asset: "desk".to_string(),
                year: FiscalYear(2024),
            }
        );
    }

    let desk = register.snapshot("desk").unwrap();
    assert_eq!(desk.depreciation.len(), 1);
    assert_eq!(desk.accumulated_depreciation, dec!(1000.00));
}

#[test]
fn consecutive_years_then_dispose() {
    let register = register();
    let end = |y| NaiveDate::from_ymd_opt(y, 12, 31).unwrap();

    let first = register.commit_depreciation("desk", FiscalYear(2024), end(2024)).unwrap();
    let second = register.commit_depreciation("desk", FiscalYear(2025), end(2025)).unwrap();
    assert_eq!(first.closing_book_value, dec!(9000.00));
    assert_eq!(second.amount, dec!(1800.00));
    assert_eq!(second.closing_book_value, dec!(7200.00));

    register.dispose("desk", end(2026), dec!(5000)).unwrap();
    assert_eq!(
        register.project_depreciation("desk", FiscalYear(2026)),
        Err(Error::AssetDisposed("desk".to_string()))
    );
    assert_eq!(
        register.commit_depreciation("missing", FiscalYear(2026), end(2026)),
        Err(Error::UnknownAsset("missing".to_string()))
    );

    let assets = register.into_assets();
    assert_eq!(assets[0].depreciation.len(), 2);
    assert!(assets[0].is_disposed());
}
