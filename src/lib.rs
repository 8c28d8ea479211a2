//! Accounting engine for small corporations.
//!
//! Turns a company's ledger records into derived figures: invoice totals,
//! sales tax remittance, capital cost allowance and the annual tax return.

pub mod core;
