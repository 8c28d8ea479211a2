use super::books::Books;
use super::error::Result;
use super::fiscal::Period;
use super::money::{checked_add, checked_sub, checked_sum};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// Sales tax collected and paid over a reporting period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TaxLedger {
    pub period: Period,
    pub collected: Decimal,
    pub paid: Decimal,
    /// Collected minus paid. Negative means a refund is due.
    pub remittance: Decimal,
}

impl TaxLedger {
    pub fn is_refund(&self) -> bool {
        self.remittance < Decimal::ZERO
    }
}

/// Fold a company's records into the sales tax position for `period`.
///
/// Collected: tax on issued invoices and on income entries dated in the period.
/// Paid: tax on expenses in the period and on capital assets purchased in it.
pub fn compute_tax_ledger(books: &Books, period: Period) -> Result<TaxLedger> {
    let invoice_tax = checked_sum(
        books
            .invoices
            .iter()
            .filter(|i| i.status.is_issued() && period.contains(i.date))
            .map(|i| i.tax_amount),
    )?;
    let income_tax = checked_sum(
        books
            .income_entries()
            .iter()
            .filter(|e| period.contains(e.date))
            .map(|e| e.tax()),
    )?;
    let expense_tax = checked_sum(
        books
            .expense_entries()
            .iter()
            .filter(|e| period.contains(e.date))
            .map(|e| e.tax()),
    )?;
    let asset_tax = checked_sum(
        books
            .assets
            .iter()
            .filter(|a| period.contains(a.purchase_date))
            .map(|a| a.tax_paid),
    )?;

    let collected = checked_add(invoice_tax, income_tax)?;
    let paid = checked_add(expense_tax, asset_tax)?;
    log::debug!(
        "Tax ledger {}: invoices={} income={} expenses={} assets={}",
        period,
        invoice_tax,
        income_tax,
        expense_tax,
        asset_tax
    );

    Ok(TaxLedger {
        period,
        collected,
        paid,
        remittance: checked_sub(collected, paid)?,
    })
}

/// Tax position between two dates, inclusive. Fails if `end` is before `start`.
pub fn compute_tax_ledger_between(books: &Books, start: NaiveDate, end: NaiveDate) -> Result<TaxLedger> {
    compute_tax_ledger(books, Period::new(start, end)?)
}
