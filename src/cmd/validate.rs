//! Validate command - surface data quality issues without generating reports

use super::BooksArgs;
use clap::Args;
use corpbooks::core::{
    cca, compute_invoice_totals,
    money::{checked_sum, format_amount, validate_rate},
    Books, SubLedger,
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Args, Debug)]
pub struct ValidateCommand {
    #[command(flatten)]
    input: BooksArgs,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// A validation issue for output
#[derive(Debug, Clone, Serialize)]
struct ValidationIssue {
    #[serde(rename = "type")]
    issue_type: &'static str,
    record: String,
    message: String,
}

#[derive(Debug, Serialize)]
struct ValidationOutput<'a> {
    company: &'a str,
    issue_count: usize,
    issues: &'a [ValidationIssue],
}

impl ValidateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        // stored values are checked as written, before anything is derived
        let books = self.input.read_raw()?.books;
        let issues = collect_issues(&books);

        if self.json {
            let output = ValidationOutput {
                company: &books.company.name,
                issue_count: issues.len(),
                issues: &issues,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print_text(&books.company.name, &issues);
        }

        if !issues.is_empty() {
            std::process::exit(1);
        }
        Ok(())
    }
}

fn print_text(company: &str, issues: &[ValidationIssue]) {
    println!();
    println!("VALIDATION RESULTS ({})", company);
    println!();

    if issues.is_empty() {
        println!("\u{2713} No issues found.");
    } else {
        println!("\u{26A0} {} issue(s) found:", issues.len());
        println!();
        for (i, issue) in issues.iter().enumerate() {
            println!("  {}. [{}] {}", i + 1, issue.issue_type, issue.record);
            println!("     {}", issue.message);
            println!();
        }
    }
}

fn issue(issue_type: &'static str, record: impl Into<String>, message: String) -> ValidationIssue {
    ValidationIssue {
        issue_type,
        record: record.into(),
        message,
    }
}

fn collect_issues(books: &Books) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let company = &books.company;

    for (name, rate) in [
        ("income_tax_rate", company.income_tax_rate),
        ("sales_tax_rate", company.sales_tax_rate),
    ] {
        if let Err(e) = validate_rate(rate) {
            issues.push(issue("InvalidRate", format!("company.{name}"), e.to_string()));
        }
    }
    let rate = company.effective_sales_tax_rate();

    for inv in &books.invoices {
        let record = format!("invoice {}", inv.id);
        let client = books.client(&inv.client_id);
        if client.is_none() {
            issues.push(issue(
                "UnknownClient",
                &record,
                format!("client {} is not in the client list", inv.client_id),
            ));
        }
        let exempt = client.is_some_and(|c| c.tax_exempt);
        match compute_invoice_totals(&inv.items, exempt, rate) {
            Ok(totals) => {
                // all-zero totals have simply not been derived yet
                let stored = [inv.subtotal, inv.tax_amount, inv.total];
                if stored.iter().any(|v| !v.is_zero())
                    && stored != [totals.subtotal, totals.tax, totals.total]
                {
                    issues.push(issue(
                        "StaleInvoiceTotals",
                        &record,
                        format!(
                            "stored {} / {} / {}, recomputed {} / {} / {}",
                            format_amount(inv.subtotal),
                            format_amount(inv.tax_amount),
                            format_amount(inv.total),
                            format_amount(totals.subtotal),
                            format_amount(totals.tax),
                            format_amount(totals.total)
                        ),
                    ));
                }
            }
            Err(e) => issues.push(issue("InvalidInvoice", &record, e.to_string())),
        }
    }

    check_span(&mut issues, "income ledger", books.income.as_ref());
    check_span(&mut issues, "expense ledger", books.expenses.as_ref());
    if let Some(ledger) = &books.expenses {
        for e in ledger.entries.iter().filter(|e| e.amount < Decimal::ZERO) {
            issues.push(issue(
                "NegativeExpense",
                format!("expense {}", e.id.as_deref().unwrap_or(&e.date.to_string())),
                format!("amount {} is negative", format_amount(e.amount)),
            ));
        }
    }

    let mut seen_ids = HashSet::new();
    for asset in &books.assets {
        let record = format!("asset {}", asset.id);
        if !seen_ids.insert(asset.id.as_str()) {
            issues.push(issue(
                "DuplicateAsset",
                &record,
                "another asset already uses this id".to_string(),
            ));
        }
        if let Err(e) = cca::lookup(&asset.cca_class) {
            issues.push(issue("UnknownCcaClass", &record, e.to_string()));
        }

        let mut years = HashSet::new();
        for entry in &asset.depreciation {
            if !years.insert(entry.fiscal_year) {
                issues.push(issue(
                    "DuplicateEntry",
                    &record,
                    format!("more than one depreciation entry for {}", entry.fiscal_year),
                ));
            }
        }

        match checked_sum(asset.depreciation.iter().map(|e| e.amount)) {
            Ok(claimed) if claimed != asset.accumulated_depreciation => issues.push(issue(
                "AccumulatedMismatch",
                &record,
                format!(
                    "accumulated depreciation {} but entries sum to {}",
                    format_amount(asset.accumulated_depreciation),
                    format_amount(claimed)
                ),
            )),
            Ok(_) => {}
            Err(e) => issues.push(issue("AmountOverflow", &record, e.to_string())),
        }
        match asset.book_value() {
            Ok(value) if value < Decimal::ZERO => issues.push(issue(
                "NegativeBookValue",
                &record,
                format!("book value {} is below zero", format_amount(value)),
            )),
            Ok(_) => {}
            Err(e) => issues.push(issue("AmountOverflow", &record, e.to_string())),
        }
        if let Some(entry) = asset.depreciation.iter().find(|e| e.asset_id != asset.id) {
            issues.push(issue(
                "ForeignEntry",
                &record,
                format!("{} entry belongs to asset {}", entry.fiscal_year, entry.asset_id),
            ));
        }
    }

    issues
}

fn check_span<T>(issues: &mut Vec<ValidationIssue>, name: &str, ledger: Option<&SubLedger<T>>) {
    if let Some(ledger) = ledger {
        if let Err(e) = ledger.covered() {
            issues.push(issue("InvalidPeriod", name, e.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use corpbooks::core::{read_books_json, DepreciationEntry, FiscalYear};

    const BOOKS: &str = r#"{
        "company": {
            "name": "Acme", "income_tax_rate": "0.15", "sales_tax_rate": "0.13",
            "sales_tax_registered": true
        },
        "clients": [{ "id": "c1", "name": "Initech" }],
        "invoices": [
            {
                "id": "INV-1", "client_id": "c1", "date": "2024-03-01",
                "items": [{ "description": "Consulting", "quantity": 40, "unit_price": "75.00" }],
                "subtotal": "3000.00", "tax_amount": "390.00", "total": "3390.00"
            },
            {
                "id": "INV-2", "client_id": "c9", "date": "2024-03-02",
                "items": [{ "description": "Consulting", "quantity": 1, "unit_price": "100.00" }],
                "subtotal": "100.00", "tax_amount": "0", "total": "100.00"
            }
        ],
        "assets": [{
            "id": "desk", "description": "Desk", "cca_class": "8",
            "purchase_date": "2024-04-01", "purchase_amount": "1000.00",
            "accumulated_depreciation": "50.00"
        }]
    }"#;

    #[test]
    fn reports_each_problem() {
        let books = read_books_json(BOOKS.as_bytes()).unwrap();
        let issues = collect_issues(&books);
        let types: Vec<_> = issues.iter().map(|i| i.issue_type).collect();
        assert_eq!(
            types,
            ["UnknownClient", "StaleInvoiceTotals", "AccumulatedMismatch"]
        );
        assert_eq!(issues[0].record, "invoice INV-2");
    }

    #[test]
    fn clean_books_have_no_issues() {
        let mut books = read_books_json(BOOKS.as_bytes()).unwrap();
        books.invoices.truncate(1);
        books.assets[0].accumulated_depreciation = Decimal::ZERO;
        assert!(collect_issues(&books).is_empty());
    }

    #[test]
    fn reports_duplicate_assets_and_entries() {
        let mut books = read_books_json(BOOKS.as_bytes()).unwrap();
        books.invoices.truncate(1);
        let claim = DepreciationEntry {
            asset_id: "desk".to_string(),
            fiscal_year: FiscalYear(2024),
            date: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            amount: Decimal::new(2500, 2),
            half_year: true,
            opening_book_value: Decimal::new(100000, 2),
            closing_book_value: Decimal::new(97500, 2),
        };
        books.assets[0].depreciation = vec![claim.clone(), claim];
        books.assets.push(books.assets[0].clone());

        let issues = collect_issues(&books);
        let types: Vec<_> = issues.iter().map(|i| i.issue_type).collect();
        assert_eq!(types, ["DuplicateEntry", "DuplicateAsset", "DuplicateEntry"]);
        assert_eq!(issues[1].record, "asset desk");
    }

    #[test]
    fn overflowing_amounts_are_reported() {
        let mut books = read_books_json(BOOKS.as_bytes()).unwrap();
        books.invoices.truncate(1);
        let desk = &mut books.assets[0];
        desk.accumulated_depreciation = Decimal::ZERO;
        desk.purchase_amount = Decimal::MAX;
        desk.tax_paid = Decimal::MAX;

        let issues = collect_issues(&books);
        let types: Vec<_> = issues.iter().map(|i| i.issue_type).collect();
        assert_eq!(types, ["AmountOverflow"]);
    }
}
