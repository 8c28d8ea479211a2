//! Depreciate command - commit a fiscal year's capital cost allowance

use super::BooksArgs;
use anyhow::Context;
use chrono::NaiveDate;
use clap::Args;
use corpbooks::core::{money::format_amount, AssetRegister, Error, FiscalYear};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct DepreciateCommand {
    #[command(flatten)]
    input: BooksArgs,

    /// Fiscal year to commit (e.g., 2025 for the year ending in 2025)
    #[arg(short, long)]
    year: i32,

    /// Date recorded on the entries (defaults to the fiscal year end)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Write the updated books here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Tabled, Serialize)]
struct CommittedRow {
    #[tabled(rename = "Asset")]
    asset: String,
    #[tabled(rename = "Half-Year")]
    half_year: String,
    #[tabled(rename = "Opening")]
    opening: String,
    #[tabled(rename = "CCA")]
    amount: String,
    #[tabled(rename = "Closing")]
    closing: String,
}

impl DepreciateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let mut books = self.input.load()?.books;
        let year_end = books.company.fiscal_year_end;
        let year = FiscalYear(self.year);
        let entry_date = self.date.unwrap_or_else(|| year.end_date(year_end));

        let register = AssetRegister::new(year_end, std::mem::take(&mut books.assets))?;
        let mut rows = Vec::new();
        for id in register.ids() {
            match register.commit_depreciation(id, year, entry_date) {
                Ok(entry) => rows.push(CommittedRow {
                    asset: id.clone(),
                    half_year: if entry.half_year { "yes".to_string() } else { String::new() },
                    opening: format_amount(entry.opening_book_value),
                    amount: format_amount(entry.amount),
                    closing: format_amount(entry.closing_book_value),
                }),
                Err(
                    e @ (Error::AssetDisposed(_)
                    | Error::DepreciationBeforeAcquisition { .. }
                    | Error::DuplicateDepreciationYear { .. }),
                ) => log::info!("Skipping: {}", e),
                Err(e) => return Err(e).with_context(|| format!("committing {} for {}", year, id)),
            }
        }
        books.assets = register.into_assets();
        log::info!("Committed {} depreciation entries for {}", rows.len(), year);

        match &self.output {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("creating {}", path.display()))?;
                let mut writer = BufWriter::new(file);
                serde_json::to_writer_pretty(&mut writer, &books)?;
                writer.flush()?;

                if rows.is_empty() {
                    println!("No depreciation committed for {}", year);
                } else {
                    let table = Table::new(&rows)
                        .with(Style::rounded())
                        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
                        .to_string();
                    println!("{}", table);
                }
            }
            None => {
                let stdout = io::stdout();
                let mut writer = stdout.lock();
                serde_json::to_writer_pretty(&mut writer, &books)?;
                writeln!(writer)?;
            }
        }
        Ok(())
    }
}
