//! Ledger command - sales tax collected, paid and owed over a period

use super::BooksArgs;
use chrono::NaiveDate;
use clap::Args;
use corpbooks::core::{
    compute_tax_ledger, compute_tax_ledger_between, money::format_amount, FiscalYear, TaxLedger,
};
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct LedgerCommand {
    #[command(flatten)]
    input: BooksArgs,

    /// Fiscal year to report
    #[arg(short, long, conflicts_with_all = ["from", "to"], required_unless_present = "from")]
    year: Option<i32>,

    /// First day of the reporting period (YYYY-MM-DD)
    #[arg(long, requires = "to")]
    from: Option<NaiveDate>,

    /// Last day of the reporting period (YYYY-MM-DD)
    #[arg(long, requires = "from")]
    to: Option<NaiveDate>,

    /// Break the fiscal year down into quarters
    #[arg(long, requires = "year")]
    quarterly: bool,

    /// Output as JSON instead of a formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Tabled, Serialize)]
struct LedgerRow {
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Collected")]
    collected: String,
    #[tabled(rename = "Paid")]
    paid: String,
    #[tabled(rename = "Remittance")]
    remittance: String,
    #[tabled(rename = "Refund")]
    refund: String,
}

impl From<&TaxLedger> for LedgerRow {
    fn from(l: &TaxLedger) -> Self {
        LedgerRow {
            period: l.period.to_string(),
            collected: format_amount(l.collected),
            paid: format_amount(l.paid),
            remittance: format_amount(l.remittance),
            refund: if l.is_refund() { "yes".to_string() } else { String::new() },
        }
    }
}

impl LedgerCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let books = self.input.load()?.books;
        let year_end = books.company.fiscal_year_end;

        let ledgers: Vec<TaxLedger> = match (self.year, self.from, self.to) {
            (Some(year), _, _) => {
                let year = FiscalYear(year);
                let mut periods = Vec::new();
                if self.quarterly {
                    periods.extend(year.quarters(year_end));
                }
                periods.push(year.period(year_end));
                periods
                    .into_iter()
                    .map(|p| compute_tax_ledger(&books, p))
                    .collect::<Result<Vec<_>, _>>()?
            }
            (None, Some(from), Some(to)) => vec![compute_tax_ledger_between(&books, from, to)?],
            _ => anyhow::bail!("provide either --year or both --from and --to"),
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&ledgers)?);
        } else {
            let rows: Vec<LedgerRow> = ledgers.iter().map(LedgerRow::from).collect();
            let table = Table::new(&rows)
                .with(Style::rounded())
                .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
                .to_string();
            println!("{}", table);
        }
        Ok(())
    }
}
