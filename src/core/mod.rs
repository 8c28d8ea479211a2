pub mod books;
pub mod cca;
pub mod depreciation;
pub mod error;
pub mod fiscal;
pub mod invoice;
pub mod ledger;
pub mod money;
pub mod register;
pub mod tax_return;

// Flat public surface for domain types and functions.
pub use books::{
    read_books_json, read_expenses_csv, Books, CapitalAsset, Client, Company, CsvField,
    DepreciationEntry, Disposal, Dividend, DividendStatus, Expense, ExpenseCsvRecord,
    IncomeEntry, Invoice, InvoiceItem, InvoiceStatus, OwnerPayment, OwnerPaymentKind, SubLedger,
    YearBalance,
};
pub use cca::CcaClass;
pub use depreciation::{
    commit_depreciation, dispose, project_depreciation, schedule, Projection,
};
pub use error::{Error, ErrorKind};
pub use fiscal::{FiscalYear, FiscalYearEnd, Period};
pub use invoice::{compute_invoice_totals, InvoiceTotals};
pub use ledger::{compute_tax_ledger, compute_tax_ledger_between, TaxLedger};
pub use money::{split, split_inclusive, Split};
pub use register::AssetRegister;
pub use tax_return::{aggregate_tax_return, TaxReturn};
