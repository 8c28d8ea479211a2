//! E2E tests for the bookkeeping commands

use std::process::{Command, Output};

fn run(args: &[&str]) -> Output {
    Command::new("cargo")
        .args(["run", "--"])
        .args(args)
        .output()
        .expect("Failed to execute command")
}

/// Invoice totals are recomputed, with no tax for the exempt client
#[test]
fn invoice_totals() {
    let output = run(&["invoice", "-b", "tests/data/books.json"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("INV-001"));
    assert!(stdout.contains("$3000.00"));
    assert!(stdout.contains("$390.00"));
    assert!(stdout.contains("$3390.00"));
    assert!(stdout.contains("Red Cross"));
    assert!(stdout.contains("$1000.00"));
}

#[test]
fn invoice_json_single() {
    let output = run(&["invoice", "-b", "tests/data/books.json", "--id", "INV-001", "--json"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    let rows: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    let rows = rows.as_array().expect("array of invoices");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["total"], "$3390.00");
}

#[test]
fn invoice_unknown_id_fails() {
    let output = run(&["invoice", "-b", "tests/data/books.json", "--id", "INV-404"]);
    assert!(!output.status.success());
}

/// Half-year rule in the acquisition year, full rate afterwards
#[test]
fn schedule_declining_balance() {
    let output = run(&["schedule", "-b", "tests/data/books.json", "--asset", "desk", "-n", "3"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("FY2024"));
    assert!(stdout.contains("$1000.00"));
    assert!(stdout.contains("$9000.00"));
    assert!(stdout.contains("$1800.00"));
    assert!(stdout.contains("$7200.00"));
    assert!(stdout.contains("FY2026"));
}

#[test]
fn depreciate_writes_updated_books() {
    let output = run(&["depreciate", "-b", "tests/data/books.json", "-y", "2024"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    let books: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    let desk = &books["assets"][0];
    assert_eq!(desk["accumulated_depreciation"], "1000.00");
    assert_eq!(desk["depreciation"][0]["fiscal_year"], 2024);
    assert_eq!(desk["depreciation"][0]["half_year"], true);
    assert_eq!(desk["depreciation"][0]["closing_book_value"], "9000.00");
    assert_eq!(desk["depreciation"][0]["date"], "2024-12-31");
}

/// Years before the asset was bought are skipped rather than failing
#[test]
fn depreciate_skips_pre_acquisition() {
    let output = run(&["depreciate", "-b", "tests/data/books.json", "-y", "2023"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    let books: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(books["assets"][0]["depreciation"], serde_json::json!([]));
}

#[test]
fn ledger_quarterly() {
    let output = run(&["ledger", "-b", "tests/data/books.json", "-y", "2024", "--quarterly"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("Remittance"));
    assert!(stdout.contains("2024-01-01 to 2024-03-31"));
    assert!(stdout.contains("2024-10-01 to 2024-12-31"));
    // full year: 390.00 + 65.00 collected, 156.00 paid
    assert!(stdout.contains("$455.00"));
    assert!(stdout.contains("$299.00"));
}

#[test]
fn ledger_rejects_reversed_period() {
    let output = run(&[
        "ledger",
        "-b",
        "tests/data/books.json",
        "--from",
        "2024-12-31",
        "--to",
        "2024-01-01",
    ]);
    assert!(!output.status.success());
}

#[test]
fn return_json() {
    let output = run(&["return", "-b", "tests/data/books.json", "-y", "2024", "--json"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    let r: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(r["company"], "Acme Consulting Inc.");
    assert_eq!(r["gross_income"], "3500.00");
    assert_eq!(r["operating_expenses"], "1500.00");
    assert_eq!(r["pre_tax_net_income"], "2000.00");
    assert_eq!(r["tax_liability"], "300.00");
    assert_eq!(r["retained_earnings"], "2700.00");
    assert_eq!(r["sales_tax_collected"], "455.00");
    assert_eq!(r["sales_tax_paid"], "156.00");
    assert_eq!(r["sales_tax_remittance"], "299.00");
    assert_eq!(r["input_digest"].as_str().map(str::len), Some(64));
}

/// CSV expenses are merged, with blank tax derived from the company rate
#[test]
fn return_with_csv_expenses() {
    let output = run(&[
        "return",
        "-b",
        "tests/data/books.json",
        "--expenses",
        "tests/data/expenses.csv",
        "-y",
        "2024",
        "--json",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    let r: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(r["operating_expenses"], "1650.00");
    assert_eq!(r["sales_tax_paid"], "175.50");
    assert_eq!(r["tax_liability"], "277.50");
}

#[test]
fn return_text() {
    let output = run(&["return", "-b", "tests/data/books.json", "-y", "2024"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("TAX RETURN FY2024"));
    assert!(stdout.contains("Income tax @ 15%: $300.00"));
    assert!(stdout.contains("Remittance: $299.00"));
}

/// The books only cover 2024, so 2025 cannot be filed
#[test]
fn return_incomplete_year_fails() {
    let output = run(&["return", "-b", "tests/data/books.json", "-y", "2025"]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success());
    assert!(stderr.contains("FY2025"));
}

#[test]
fn validate_clean_books() {
    let output = run(&["validate", "-b", "tests/data/books.json"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("No issues found"));
}

#[test]
fn validate_reports_issues() {
    let output = run(&["validate", "-b", "tests/data/stale.json", "--json"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(1));
    let report: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON");
    assert_eq!(report["issue_count"], 2);
    assert_eq!(report["issues"][0]["type"], "StaleInvoiceTotals");
    assert_eq!(report["issues"][1]["type"], "UnknownCcaClass");
}

#[test]
fn unknown_cca_class_rejected_on_load() {
    let output = run(&["invoice", "-b", "tests/data/stale.json"]);
    assert!(!output.status.success());
}

#[test]
fn classes_table() {
    let output = run(&["classes"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert!(stdout.contains("10.1"));
    assert!(stdout.contains("55%"));
}

#[test]
fn schema_csv_header() {
    let output = run(&["schema", "csv-header"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Command failed: {:?}", output);
    assert_eq!(stdout.trim(), "id,date,category,amount,tax,description");
}
