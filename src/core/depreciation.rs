//! Capital cost allowance on a declining balance with the half-year rule.

use super::books::{CapitalAsset, DepreciationEntry, Disposal};
use super::cca;
use super::error::{Error, Result};
use super::fiscal::{FiscalYear, FiscalYearEnd};
use super::money::{checked_add, checked_mul, checked_sub, round_currency};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Depreciation allowed for one asset in one fiscal year, before it is recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Projection {
    pub amount: Decimal,
    pub is_half_year: bool,
    pub projected_book_value: Decimal,
}

/// Fiscal year in which the asset became available for use
pub fn acquisition_year(asset: &CapitalAsset, year_end: FiscalYearEnd) -> FiscalYear {
    FiscalYear::from_date(asset.purchase_date, year_end)
}

/// Compute the allowance for `year` without touching the asset.
///
/// In the acquisition year only half the declining-balance amount is allowed.
/// The amount never exceeds the remaining book value.
pub fn project_depreciation(
    asset: &CapitalAsset,
    year: FiscalYear,
    year_end: FiscalYearEnd,
) -> Result<Projection> {
    if asset.entry_for(year).is_some() {
        return Err(Error::DuplicateDepreciationYear {
            asset: asset.id.clone(),
            year,
        });
    }
    if asset.is_disposed() {
        return Err(Error::AssetDisposed(asset.id.clone()));
    }
    let acquired = acquisition_year(asset, year_end);
    if year < acquired {
        return Err(Error::DepreciationBeforeAcquisition {
            asset: asset.id.clone(),
            year,
            acquired,
        });
    }
    if let Some(latest) = asset.latest_entry().filter(|e| e.fiscal_year > year) {
        return Err(Error::OutOfOrderDepreciationYear {
            asset: asset.id.clone(),
            year,
            latest: latest.fiscal_year,
        });
    }

    let class = cca::lookup(&asset.cca_class)?;
    let is_half_year = year == acquired;
    let factor = if is_half_year { dec!(0.5) } else { Decimal::ONE };

    let book_value = asset.book_value()?.max(Decimal::ZERO);
    let allowance = checked_mul(checked_mul(book_value, class.rate)?, factor)?;
    let amount = round_currency(allowance).min(book_value);

    Ok(Projection {
        amount,
        is_half_year,
        projected_book_value: checked_sub(book_value, amount)?,
    })
}

/// Record the allowance for `year` on the asset.
///
/// Runs the projection again and, only if it succeeds, appends the entry and
/// moves accumulated depreciation in the same step. A year that is already
/// recorded fails with `DuplicateDepreciationYear` and changes nothing.
pub fn commit_depreciation(
    asset: &mut CapitalAsset,
    year: FiscalYear,
    year_end: FiscalYearEnd,
    entry_date: NaiveDate,
) -> Result<DepreciationEntry> {
    let projection = project_depreciation(asset, year, year_end)?;
    let accumulated = checked_add(asset.accumulated_depreciation, projection.amount)?;
    let entry = DepreciationEntry {
        asset_id: asset.id.clone(),
        fiscal_year: year,
        date: entry_date,
        amount: projection.amount,
        half_year: projection.is_half_year,
        opening_book_value: asset.book_value()?,
        closing_book_value: projection.projected_book_value,
    };

    asset.accumulated_depreciation = accumulated;
    asset.depreciation.push(entry.clone());
    asset.depreciation.sort_by_key(|e| e.fiscal_year);

    log::debug!(
        "Asset {} {}: depreciation={} half_year={} book value {} -> {}",
        asset.id,
        year,
        entry.amount,
        entry.half_year,
        entry.opening_book_value,
        entry.closing_book_value
    );
    Ok(entry)
}

/// Mark the asset as disposed. Recapture and terminal loss are not computed.
pub fn dispose(asset: &mut CapitalAsset, date: NaiveDate, amount: Decimal) -> Result<()> {
    if asset.is_disposed() {
        return Err(Error::AlreadyDisposed(asset.id.clone()));
    }
    if date < asset.purchase_date {
        return Err(Error::DisposalBeforeAcquisition {
            asset: asset.id.clone(),
            date,
            purchased: asset.purchase_date,
        });
    }
    asset.disposal = Some(Disposal { date, amount });
    log::debug!("Asset {} disposed on {} for {}", asset.id, date, amount);
    Ok(())
}

/// Project `years` consecutive allowances starting at `from`, or after the
/// latest recorded year when `from` is not given. The asset is not modified.
/// Stops early once the book value reaches zero.
pub fn schedule(
    asset: &CapitalAsset,
    from: Option<FiscalYear>,
    years: usize,
    year_end: FiscalYearEnd,
) -> Result<Vec<DepreciationEntry>> {
    let mut projected = asset.clone();
    let mut year = from.unwrap_or_else(|| {
        asset
            .latest_entry()
            .map_or_else(|| acquisition_year(asset, year_end), |e| e.fiscal_year.next())
    });

    let mut entries = Vec::with_capacity(years);
    for _ in 0..years {
        if projected.book_value()? <= Decimal::ZERO {
            break;
        }
        let entry = commit_depreciation(&mut projected, year, year_end, year.end_date(year_end))?;
        entries.push(entry);
        year = year.next();
    }
    Ok(entries)
}
