//! Schema command - print expected input formats

use clap::Args;
use corpbooks::core::{Books, ExpenseCsvRecord};
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format: json-schema, csv-header or csv-fields
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the books file
    JsonSchema,
    /// Header row for the expenses CSV
    CsvHeader,
    /// Expenses CSV column descriptions
    CsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => self.print_json_schema(),
            SchemaFormat::CsvHeader => self.print_csv_header(),
            SchemaFormat::CsvFields => self.print_csv_fields(),
        }
    }

    fn print_json_schema(&self) -> anyhow::Result<()> {
        let schema = schema_for!(Books);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }

    fn print_csv_header(&self) -> anyhow::Result<()> {
        println!("{}", ExpenseCsvRecord::csv_header().join(","));
        Ok(())
    }

    fn print_csv_fields(&self) -> anyhow::Result<()> {
        println!("Expenses CSV Format");
        println!("===================");
        println!();
        for field in ExpenseCsvRecord::csv_schema() {
            let req = if field.required { "required" } else { "optional" };
            println!("{:14} ({:8})  {}", field.name, req, field.description);
        }
        println!();
        println!("Blank tax is derived from the company's sales tax rate");
        Ok(())
    }
}
