use super::books::{Books, DividendStatus, InvoiceStatus, SubLedger};
use super::error::{Error, Result};
use super::fiscal::{FiscalYear, Period};
use super::ledger::compute_tax_ledger;
use super::money::{checked_add, checked_mul, checked_sub, checked_sum, round_currency};
use rust_decimal::Decimal;
use serde::Serialize;

/// Annual tax return summary for one fiscal year
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxReturn {
    pub fiscal_year: FiscalYear,
    pub period: Period,
    pub gross_income: Decimal,
    pub operating_expenses: Decimal,
    pub depreciation: Decimal,
    /// Operating expenses plus depreciation
    pub total_expenses: Decimal,
    pub pre_tax_net_income: Decimal,
    pub income_tax_rate: Decimal,
    pub tax_liability: Decimal,
    pub post_tax_net_income: Decimal,
    pub sales_tax_collected: Decimal,
    pub sales_tax_paid: Decimal,
    pub sales_tax_remittance: Decimal,
    pub dividends: Decimal,
    pub owner_payments: Decimal,
    pub prior_retained_earnings: Decimal,
    pub retained_earnings: Decimal,
}

fn require_coverage<T>(
    ledger: Option<&SubLedger<T>>,
    name: &'static str,
    year: FiscalYear,
    period: &Period,
) -> Result<()> {
    let covered = ledger.and_then(|l| l.covered().ok());
    match covered {
        Some(span) if span.covers(period) => Ok(()),
        _ => Err(Error::IncompleteFiscalYear { ledger: name, year }),
    }
}

/// Aggregate a company's books into the return for `year`.
///
/// Income and expense ledgers must both cover the whole fiscal year.
/// Income tax is never negative; losses are not carried forward.
pub fn aggregate_tax_return(books: &Books, year: FiscalYear) -> Result<TaxReturn> {
    let company = &books.company;
    company.validate()?;
    let period = year.period(company.fiscal_year_end);

    require_coverage(books.income.as_ref(), "income", year, &period)?;
    require_coverage(books.expenses.as_ref(), "expense", year, &period)?;

    let entry_income = checked_sum(
        books
            .income_entries()
            .iter()
            .filter(|e| period.contains(e.date))
            .map(|e| e.amount),
    )?;
    let invoice_income = checked_sum(
        books
            .invoices
            .iter()
            .filter(|i| i.status == InvoiceStatus::Paid && period.contains(i.date))
            .map(|i| i.subtotal),
    )?;
    let gross_income = checked_add(entry_income, invoice_income)?;

    let operating_expenses = checked_sum(
        books
            .expense_entries()
            .iter()
            .filter(|e| period.contains(e.date))
            .map(|e| e.amount),
    )?;
    let depreciation = checked_sum(
        books
            .assets
            .iter()
            .filter_map(|a| a.entry_for(year))
            .map(|e| e.amount),
    )?;
    let total_expenses = checked_add(operating_expenses, depreciation)?;

    let pre_tax_net_income = checked_sub(gross_income, total_expenses)?;
    let tax_liability =
        round_currency(checked_mul(pre_tax_net_income, company.income_tax_rate)?).max(Decimal::ZERO);
    let post_tax_net_income = checked_sub(pre_tax_net_income, tax_liability)?;

    let dividends = checked_sum(
        books
            .dividends
            .iter()
            .filter(|d| d.status != DividendStatus::Cancelled && period.contains(d.date))
            .map(|d| d.amount),
    )?;
    let owner_payments = checked_sum(
        books
            .owner_payments
            .iter()
            .filter(|p| period.contains(p.date))
            .map(|p| p.amount),
    )?;

    let prior_retained_earnings = books.retained_earnings_for(FiscalYear(year.0 - 1));
    let retained_earnings = checked_sub(
        checked_add(prior_retained_earnings, post_tax_net_income)?,
        dividends,
    )?;

    let sales_tax = compute_tax_ledger(books, period)?;

    log::debug!(
        "{} {}: gross={} expenses={} depreciation={} pre_tax={} tax={}",
        company.name,
        year,
        gross_income,
        operating_expenses,
        depreciation,
        pre_tax_net_income,
        tax_liability
    );

    Ok(TaxReturn {
        fiscal_year: year,
        period,
        gross_income,
        operating_expenses,
        depreciation,
        total_expenses,
        pre_tax_net_income,
        income_tax_rate: company.income_tax_rate,
        tax_liability,
        post_tax_net_income,
        sales_tax_collected: sales_tax.collected,
        sales_tax_paid: sales_tax.paid,
        sales_tax_remittance: sales_tax.remittance,
        dividends,
        owner_payments,
        prior_retained_earnings,
        retained_earnings,
    })
}
