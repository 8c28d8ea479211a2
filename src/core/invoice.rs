use super::books::InvoiceItem;
use super::error::{Error, Result};
use super::money::{self, round_currency};
use rust_decimal::Decimal;
use serde::Serialize;

/// Derived amounts of an invoice
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceTotals {
    /// Rounded total of each line, in item order
    pub line_totals: Vec<Decimal>,
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

/// Compute subtotal, sales tax and total for a list of line items.
///
/// Rounding happens per line and once more on the subtotal; the tax is the
/// rounded product of subtotal and rate, and is zero for exempt clients.
pub fn compute_invoice_totals(
    items: &[InvoiceItem],
    client_exempt: bool,
    rate: Decimal,
) -> Result<InvoiceTotals> {
    if items.is_empty() {
        return Err(Error::EmptyInvoice);
    }
    if let Some(line) = items
        .iter()
        .position(|i| i.quantity < Decimal::ZERO || i.unit_price < Decimal::ZERO)
    {
        return Err(Error::NegativeQuantityOrPrice { line });
    }
    let rate = money::validate_rate(rate)?;

    let line_totals = items
        .iter()
        .map(|i| money::checked_mul(i.quantity, i.unit_price).map(round_currency))
        .collect::<Result<Vec<Decimal>>>()?;
    let subtotal = round_currency(money::checked_sum(line_totals.iter().copied())?);
    let tax = if client_exempt {
        Decimal::ZERO
    } else {
        money::split(subtotal, rate)?.tax
    };

    Ok(InvoiceTotals {
        line_totals,
        subtotal,
        tax,
        total: money::checked_add(subtotal, tax)?,
    })
}
