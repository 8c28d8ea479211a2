use super::error::{Error, Result};
use super::fiscal::{FiscalYear, FiscalYearEnd, Period};
use super::{cca, invoice, money};
use chrono::NaiveDate;
use corpbooks_derive::CsvSchema;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Read;

/// Company tax configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Company {
    pub name: String,
    /// Small-business income tax rate, e.g. 0.15
    #[schemars(with = "f64")]
    pub income_tax_rate: Decimal,
    /// Sales tax (HST/GST) rate, e.g. 0.13
    #[schemars(with = "f64")]
    pub sales_tax_rate: Decimal,
    #[serde(default)]
    pub sales_tax_registered: bool,
    #[serde(default)]
    pub fiscal_year_end: FiscalYearEnd,
}

impl Company {
    pub fn validate(&self) -> Result<()> {
        money::validate_rate(self.income_tax_rate)?;
        money::validate_rate(self.sales_tax_rate)?;
        Ok(())
    }

    /// Rate charged on sales: nothing unless registered to collect sales tax
    pub fn effective_sales_tax_rate(&self) -> Decimal {
        if self.sales_tax_registered {
            self.sales_tax_rate
        } else {
            Decimal::ZERO
        }
    }

    pub fn fiscal_year(&self, date: NaiveDate) -> FiscalYear {
        FiscalYear::from_date(date, self.fiscal_year_end)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Client {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tax_exempt: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum InvoiceStatus {
    #[default]
    Draft,
    Sent,
    Paid,
    Overdue,
    Cancelled,
}

impl InvoiceStatus {
    /// Sent to the client, so the sales tax on it is owed
    pub fn is_issued(self) -> bool {
        matches!(
            self,
            InvoiceStatus::Sent | InvoiceStatus::Paid | InvoiceStatus::Overdue
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct InvoiceItem {
    pub description: String,
    #[schemars(with = "f64")]
    pub quantity: Decimal,
    #[schemars(with = "f64")]
    pub unit_price: Decimal,
    #[serde(default)]
    #[schemars(with = "f64")]
    pub line_total: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Invoice {
    pub id: String,
    pub client_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub status: InvoiceStatus,
    pub items: Vec<InvoiceItem>,
    #[serde(default)]
    #[schemars(with = "f64")]
    pub subtotal: Decimal,
    #[serde(default)]
    #[schemars(with = "f64")]
    pub tax_amount: Decimal,
    #[serde(default)]
    #[schemars(with = "f64")]
    pub total: Decimal,
    #[serde(default)]
    pub paid_date: Option<NaiveDate>,
}

impl Invoice {
    /// Recompute and store the derived totals
    pub fn apply_totals(&mut self, client_exempt: bool, rate: Decimal) -> Result<()> {
        let totals = invoice::compute_invoice_totals(&self.items, client_exempt, rate)?;
        for (item, line_total) in self.items.iter_mut().zip(&totals.line_totals) {
            item.line_total = *line_total;
        }
        self.subtotal = totals.subtotal;
        self.tax_amount = totals.tax;
        self.total = totals.total;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Expense {
    #[serde(default)]
    pub id: Option<String>,
    pub date: NaiveDate,
    #[serde(default = "default_category")]
    pub category: String,
    /// Pre-tax amount
    #[schemars(with = "f64")]
    pub amount: Decimal,
    /// Sales tax paid; derived from the company rate when absent
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub tax: Option<Decimal>,
    #[serde(default)]
    pub description: Option<String>,
}

impl Expense {
    pub fn tax(&self) -> Decimal {
        self.tax.unwrap_or(Decimal::ZERO)
    }

    pub fn total(&self) -> Decimal {
        self.amount + self.tax()
    }
}

fn default_category() -> String {
    cca::DEFAULT_EXPENSE_CATEGORIES[0].to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct IncomeEntry {
    #[serde(default)]
    pub id: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub client_id: Option<String>,
    /// Pre-tax amount
    #[schemars(with = "f64")]
    pub amount: Decimal,
    /// Sales tax collected; derived from the company rate when absent
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub tax: Option<Decimal>,
    #[serde(default)]
    pub description: Option<String>,
}

impl IncomeEntry {
    pub fn tax(&self) -> Decimal {
        self.tax.unwrap_or(Decimal::ZERO)
    }

    pub fn total(&self) -> Decimal {
        self.amount + self.tax()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Disposal {
    pub date: NaiveDate,
    #[schemars(with = "f64")]
    pub amount: Decimal,
}

/// One year's capital cost allowance claimed on an asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DepreciationEntry {
    pub asset_id: String,
    pub fiscal_year: FiscalYear,
    pub date: NaiveDate,
    #[schemars(with = "f64")]
    pub amount: Decimal,
    pub half_year: bool,
    #[schemars(with = "f64")]
    pub opening_book_value: Decimal,
    #[schemars(with = "f64")]
    pub closing_book_value: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CapitalAsset {
    pub id: String,
    pub description: String,
    pub cca_class: String,
    pub purchase_date: NaiveDate,
    #[schemars(with = "f64")]
    pub purchase_amount: Decimal,
    #[serde(default)]
    #[schemars(with = "f64")]
    pub tax_paid: Decimal,
    #[serde(default)]
    #[schemars(with = "f64")]
    pub accumulated_depreciation: Decimal,
    #[serde(default)]
    pub disposal: Option<Disposal>,
    /// Committed depreciation, one entry per fiscal year
    #[serde(default)]
    pub depreciation: Vec<DepreciationEntry>,
}

impl CapitalAsset {
    pub fn total_cost(&self) -> Result<Decimal> {
        money::checked_add(self.purchase_amount, self.tax_paid)
    }

    /// Undepreciated capital cost. Fails only if the stored amounts overflow.
    pub fn book_value(&self) -> Result<Decimal> {
        money::checked_sub(self.total_cost()?, self.accumulated_depreciation)
    }

    pub fn is_disposed(&self) -> bool {
        self.disposal.is_some()
    }

    pub fn entry_for(&self, year: FiscalYear) -> Option<&DepreciationEntry> {
        self.depreciation.iter().find(|e| e.fiscal_year == year)
    }

    pub fn latest_entry(&self) -> Option<&DepreciationEntry> {
        self.depreciation.iter().max_by_key(|e| e.fiscal_year)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum DividendStatus {
    #[default]
    Declared,
    Paid,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Dividend {
    pub date: NaiveDate,
    #[schemars(with = "f64")]
    pub amount: Decimal,
    #[serde(default)]
    pub status: DividendStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub enum OwnerPaymentKind {
    Salary,
    Reimbursement,
    ShareholderLoan,
    #[default]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct OwnerPayment {
    pub date: NaiveDate,
    #[schemars(with = "f64")]
    pub amount: Decimal,
    #[serde(default)]
    pub kind: OwnerPaymentKind,
    #[serde(default)]
    pub description: Option<String>,
}

/// Records of one kind together with the date span they are complete for
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SubLedger<T> {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub entries: Vec<T>,
}

impl<T> SubLedger<T> {
    pub fn covered(&self) -> Result<Period> {
        Period::new(self.from, self.to)
    }
}

/// Closing retained earnings of a year already filed
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct YearBalance {
    pub fiscal_year: FiscalYear,
    #[schemars(with = "f64")]
    pub retained_earnings: Decimal,
}

/// All records of a single company
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Books {
    pub company: Company,
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub invoices: Vec<Invoice>,
    #[serde(default)]
    pub income: Option<SubLedger<IncomeEntry>>,
    #[serde(default)]
    pub expenses: Option<SubLedger<Expense>>,
    #[serde(default)]
    pub assets: Vec<CapitalAsset>,
    #[serde(default)]
    pub dividends: Vec<Dividend>,
    #[serde(default)]
    pub owner_payments: Vec<OwnerPayment>,
    #[serde(default)]
    pub retained_earnings: Vec<YearBalance>,
}

impl Books {
    pub fn client(&self, id: &str) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    pub fn client_exempt(&self, id: &str) -> bool {
        self.client(id).is_some_and(|c| c.tax_exempt)
    }

    pub fn asset(&self, id: &str) -> Option<&CapitalAsset> {
        self.assets.iter().find(|a| a.id == id)
    }

    pub fn income_entries(&self) -> &[IncomeEntry] {
        self.income.as_ref().map_or(&[], |l| &l.entries)
    }

    pub fn expense_entries(&self) -> &[Expense] {
        self.expenses.as_ref().map_or(&[], |l| &l.entries)
    }

    /// Closing retained earnings recorded for `year`, zero if none
    pub fn retained_earnings_for(&self, year: FiscalYear) -> Decimal {
        self.retained_earnings
            .iter()
            .find(|b| b.fiscal_year == year)
            .map_or(Decimal::ZERO, |b| b.retained_earnings)
    }

    /// Validate configuration and fill in derived fields: invoice totals and
    /// missing sales tax components.
    pub fn normalize(&mut self) -> Result<()> {
        self.company.validate()?;
        let rate = self.company.effective_sales_tax_rate();

        let mut seen = HashSet::new();
        for asset in &self.assets {
            if !seen.insert(asset.id.as_str()) {
                return Err(Error::DuplicateAsset(asset.id.clone()));
            }
            cca::lookup(&asset.cca_class)?;
            asset.book_value()?;
            let mut years = HashSet::new();
            if let Some(dup) = asset.depreciation.iter().find(|e| !years.insert(e.fiscal_year)) {
                return Err(Error::DuplicateDepreciationYear {
                    asset: asset.id.clone(),
                    year: dup.fiscal_year,
                });
            }
        }

        let exempt: Vec<bool> = self
            .invoices
            .iter()
            .map(|inv| self.client_exempt(&inv.client_id))
            .collect();
        for (invoice, exempt) in self.invoices.iter_mut().zip(exempt) {
            invoice.apply_totals(exempt, rate)?;
        }

        let income_exempt: Vec<bool> = self
            .income_entries()
            .iter()
            .map(|e| e.client_id.as_deref().is_some_and(|id| self.client_exempt(id)))
            .collect();
        if let Some(income) = self.income.as_mut() {
            income.covered()?;
            for (entry, exempt) in income.entries.iter_mut().zip(income_exempt) {
                if entry.tax.is_none() {
                    let rate = if exempt { Decimal::ZERO } else { rate };
                    entry.tax = Some(money::split(entry.amount, rate)?.tax);
                }
            }
        }

        if let Some(expenses) = self.expenses.as_mut() {
            expenses.covered()?;
            for expense in expenses.entries.iter_mut() {
                if expense.tax.is_none() {
                    expense.tax = Some(money::split(expense.amount, rate)?.tax);
                }
            }
        }

        log::debug!(
            "Normalized books for {}: {} invoices, {} income, {} expenses, {} assets",
            self.company.name,
            self.invoices.len(),
            self.income_entries().len(),
            self.expense_entries().len(),
            self.assets.len()
        );
        Ok(())
    }

    /// Append imported expenses. An existing ledger keeps its covered span;
    /// without one, the span is the imported date range.
    pub fn merge_expenses(&mut self, mut extra: Vec<Expense>) {
        match self.expenses.as_mut() {
            Some(ledger) => {
                ledger.entries.append(&mut extra);
                ledger.entries.sort_by_key(|e| e.date);
            }
            None => {
                extra.sort_by_key(|e| e.date);
                if let (Some(first), Some(last)) = (extra.first(), extra.last()) {
                    self.expenses = Some(SubLedger {
                        from: first.date,
                        to: last.date,
                        entries: extra,
                    });
                }
            }
        }
    }
}

/// Read a company's books from JSON
pub fn read_books_json<R: Read>(reader: R) -> anyhow::Result<Books> {
    let books: Books = serde_json::from_reader(reader)?;
    Ok(books)
}

/// Schema information for one CSV column
#[derive(Debug, Clone, Copy)]
pub struct CsvField {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}

/// Expense row as exported by a bank or card statement
#[derive(Debug, Clone, Serialize, Deserialize, CsvSchema)]
pub struct ExpenseCsvRecord {
    /// Optional identifier for linking back to the source statement
    pub id: Option<String>,
    /// Expense date (YYYY-MM-DD)
    pub date: NaiveDate,
    /// Expense category, e.g. Office Supplies
    #[serde(default)]
    pub category: String,
    /// Pre-tax amount
    pub amount: Decimal,
    /// Sales tax paid; derived from the company rate when blank
    pub tax: Option<Decimal>,
    /// Free text description
    pub description: Option<String>,
}

impl From<ExpenseCsvRecord> for Expense {
    fn from(r: ExpenseCsvRecord) -> Self {
        Expense {
            id: r.id.filter(|s| !s.is_empty()),
            date: r.date,
            category: if r.category.trim().is_empty() {
                default_category()
            } else {
                r.category
            },
            amount: r.amount,
            tax: r.tax,
            description: r.description.filter(|s| !s.is_empty()),
        }
    }
}

/// Read expenses from CSV
pub fn read_expenses_csv<R: Read>(reader: R) -> anyhow::Result<Vec<Expense>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let records: std::result::Result<Vec<ExpenseCsvRecord>, _> = rdr.deserialize().collect();
    let mut expenses: Vec<Expense> = records?.into_iter().map(Into::into).collect();
    expenses.sort_by_key(|e| e.date);
    Ok(expenses)
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            InvoiceStatus::Draft => "Draft",
            InvoiceStatus::Sent => "Sent",
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Overdue => "Overdue",
            InvoiceStatus::Cancelled => "Cancelled",
        };
        write!(f, "{s}")
    }
}
