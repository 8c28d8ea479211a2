use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser, Debug)]
#[command(name = "corpbooks", version, about = "Corporate bookkeeping: invoices, sales tax, CCA and annual returns")]
struct Opts {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show invoices with recomputed totals
    Invoice(cmd::invoice::InvoiceCommand),
    /// Project capital cost allowance for coming fiscal years
    Schedule(cmd::schedule::ScheduleCommand),
    /// Commit a fiscal year's depreciation and write the updated books
    Depreciate(cmd::depreciate::DepreciateCommand),
    /// Sales tax collected, paid and owed over a period
    Ledger(cmd::ledger::LedgerCommand),
    /// Annual tax return for a fiscal year
    Return(cmd::tax_return::ReturnCommand),
    /// Check books for stale derived values and invalid records
    Validate(cmd::validate::ValidateCommand),
    /// List CCA classes and expense categories
    Classes(cmd::classes::ClassesCommand),
    /// Print the expected input formats
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let opts = Opts::parse();
    match opts.command {
        Command::Invoice(invoice) => invoice.exec(),
        Command::Schedule(schedule) => schedule.exec(),
        Command::Depreciate(depreciate) => depreciate.exec(),
        Command::Ledger(ledger) => ledger.exec(),
        Command::Return(tax_return) => tax_return.exec(),
        Command::Validate(validate) => validate.exec(),
        Command::Classes(classes) => classes.exec(),
        Command::Schema(schema) => schema.exec(),
    }
}
