//! Return command - annual income tax return and sales tax position

use super::BooksArgs;
use anyhow::Context;
use clap::Args;
use corpbooks::core::{aggregate_tax_return, money::format_amount, FiscalYear, TaxReturn};
use rust_decimal_macros::dec;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct ReturnCommand {
    #[command(flatten)]
    input: BooksArgs,

    /// Fiscal year to report (e.g., 2025 for the year ending in 2025)
    #[arg(short, long)]
    year: i32,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// Return data for JSON output
#[derive(Debug, Serialize)]
struct ReturnOutput<'a> {
    company: &'a str,
    /// SHA-256 of the input the figures were computed from
    input_digest: &'a str,
    #[serde(flatten)]
    tax_return: &'a TaxReturn,
}

impl ReturnCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let loaded = self.input.load()?;
        let year = FiscalYear(self.year);
        let tax_return = aggregate_tax_return(&loaded.books, year)
            .with_context(|| format!("aggregating the {} return", year))?;

        if self.json {
            let output = ReturnOutput {
                company: &loaded.books.company.name,
                input_digest: &loaded.digest,
                tax_return: &tax_return,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print_return(&loaded.books.company.name, &tax_return, &loaded.digest);
        }
        Ok(())
    }
}

fn print_return(company: &str, r: &TaxReturn, digest: &str) {
    println!();
    println!("TAX RETURN {} ({}) - {}", r.fiscal_year, r.period, company);
    println!();

    println!("INCOME");
    println!("  Gross income: {}", format_amount(r.gross_income));
    println!(
        "  Expenses: {} | Depreciation: {} | Total: {}",
        format_amount(r.operating_expenses),
        format_amount(r.depreciation),
        format_amount(r.total_expenses)
    );
    println!("  Net income before tax: {}", format_amount(r.pre_tax_net_income));
    println!(
        "  Income tax @ {}%: {}",
        (r.income_tax_rate * dec!(100)).normalize(),
        format_amount(r.tax_liability)
    );
    println!("  Net income after tax: {}", format_amount(r.post_tax_net_income));
    println!();

    println!("SALES TAX");
    println!(
        "  Collected: {} | Paid: {}",
        format_amount(r.sales_tax_collected),
        format_amount(r.sales_tax_paid)
    );
    if r.sales_tax_remittance < rust_decimal::Decimal::ZERO {
        println!("  Refund due: {}", format_amount(-r.sales_tax_remittance));
    } else {
        println!("  Remittance: {}", format_amount(r.sales_tax_remittance));
    }
    println!();

    println!("EQUITY");
    println!(
        "  Opening retained earnings: {}",
        format_amount(r.prior_retained_earnings)
    );
    println!("  Dividends declared: {}", format_amount(r.dividends));
    println!("  Owner payments: {}", format_amount(r.owner_payments));
    println!("  Closing retained earnings: {}", format_amount(r.retained_earnings));
    println!();

    println!("Input digest: {}", digest);
    println!();
}
