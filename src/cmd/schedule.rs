//! Schedule command - projected capital cost allowance per asset

use super::BooksArgs;
use clap::Args;
use corpbooks::core::{self as engine, money::format_amount, FiscalYear};
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct ScheduleCommand {
    #[command(flatten)]
    input: BooksArgs,

    /// Only project this asset
    #[arg(short, long)]
    asset: Option<String>,

    /// First fiscal year to project (defaults to the year after the last recorded one)
    #[arg(short, long)]
    from: Option<i32>,

    /// Number of fiscal years to project
    #[arg(short = 'n', long, default_value_t = 5)]
    years: usize,

    /// Output as JSON instead of a formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Tabled, Serialize)]
struct ScheduleRow {
    #[tabled(rename = "Asset")]
    asset: String,
    #[tabled(rename = "Class")]
    class: String,
    #[tabled(rename = "Year")]
    fiscal_year: String,
    #[tabled(rename = "Half-Year")]
    half_year: String,
    #[tabled(rename = "Opening")]
    opening_book_value: String,
    #[tabled(rename = "CCA")]
    amount: String,
    #[tabled(rename = "Closing")]
    closing_book_value: String,
}

impl ScheduleCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let books = self.input.load()?.books;
        let year_end = books.company.fiscal_year_end;

        let assets: Vec<_> = books
            .assets
            .iter()
            .filter(|a| self.asset.as_deref().is_none_or(|id| a.id == id))
            .collect();
        if let (Some(id), true) = (&self.asset, assets.is_empty()) {
            anyhow::bail!("asset {id} not found");
        }

        let mut rows = Vec::new();
        for asset in assets {
            if asset.is_disposed() {
                log::info!("Skipping disposed asset {}", asset.id);
                continue;
            }
            let entries = engine::schedule(asset, self.from.map(FiscalYear), self.years, year_end)?;
            rows.extend(entries.into_iter().map(|e| ScheduleRow {
                asset: asset.id.clone(),
                class: asset.cca_class.clone(),
                fiscal_year: e.fiscal_year.display(),
                half_year: if e.half_year { "yes".to_string() } else { String::new() },
                opening_book_value: format_amount(e.opening_book_value),
                amount: format_amount(e.amount),
                closing_book_value: format_amount(e.closing_book_value),
            }));
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&rows)?);
        } else if rows.is_empty() {
            println!("No depreciation to project");
        } else {
            let table = Table::new(&rows)
                .with(Style::rounded())
                .with(Modify::new(Columns::new(4..)).with(Alignment::right()))
                .to_string();
            println!("{}", table);
        }
        Ok(())
    }
}
