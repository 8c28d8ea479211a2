//! Invoice command - recomputed invoice totals

use super::BooksArgs;
use clap::Args;
use corpbooks::core::{money::format_amount, Books};
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct InvoiceCommand {
    #[command(flatten)]
    input: BooksArgs,

    /// Only show the invoice with this id
    #[arg(long)]
    id: Option<String>,

    /// Output as JSON instead of a formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Tabled, Serialize)]
struct InvoiceRow {
    #[tabled(rename = "Invoice")]
    id: String,
    #[tabled(rename = "Client")]
    client: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Exempt")]
    exempt: String,
    #[tabled(rename = "Subtotal")]
    subtotal: String,
    #[tabled(rename = "Tax")]
    tax: String,
    #[tabled(rename = "Total")]
    total: String,
}

impl InvoiceCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let books = self.input.load()?.books;
        let rows = build_rows(&books, self.id.as_deref());

        if let Some(id) = &self.id {
            if rows.is_empty() {
                anyhow::bail!("invoice {id} not found");
            }
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&rows)?);
        } else if rows.is_empty() {
            println!("No invoices found");
        } else {
            let table = Table::new(&rows)
                .with(Style::rounded())
                .with(Modify::new(Columns::new(5..)).with(Alignment::right()))
                .to_string();
            println!("{}", table);
        }
        Ok(())
    }
}

fn build_rows(books: &Books, id: Option<&str>) -> Vec<InvoiceRow> {
    books
        .invoices
        .iter()
        .filter(|inv| id.is_none_or(|id| inv.id == id))
        .map(|inv| {
            let client = books.client(&inv.client_id);
            InvoiceRow {
                id: inv.id.clone(),
                client: client.map_or_else(|| inv.client_id.clone(), |c| c.name.clone()),
                date: inv.date.format("%Y-%m-%d").to_string(),
                status: inv.status.to_string(),
                exempt: if client.is_some_and(|c| c.tax_exempt) {
                    "yes".to_string()
                } else {
                    String::new()
                },
                subtotal: format_amount(inv.subtotal),
                tax: format_amount(inv.tax_amount),
                total: format_amount(inv.total),
            }
        })
        .collect()
}
