//! Classes command - print the capital cost allowance registry

use clap::Args;
use corpbooks::core::cca::{self, DEFAULT_EXPENSE_CATEGORIES};
use rust_decimal_macros::dec;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct ClassesCommand {
    /// List the expense categories instead
    #[arg(long)]
    categories: bool,
}

#[derive(Debug, Tabled)]
struct ClassRow {
    #[tabled(rename = "Class")]
    id: &'static str,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Description")]
    description: &'static str,
}

impl ClassesCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        if self.categories {
            for category in DEFAULT_EXPENSE_CATEGORIES {
                println!("{}", category);
            }
            return Ok(());
        }

        let rows: Vec<ClassRow> = cca::classes()
            .iter()
            .map(|c| ClassRow {
                id: c.id,
                rate: format!("{}%", (c.rate * dec!(100)).normalize()),
                description: c.description,
            })
            .collect();
        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::new(1..2)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
        Ok(())
    }
}
