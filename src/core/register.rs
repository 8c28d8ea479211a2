use super::books::{CapitalAsset, DepreciationEntry};
use super::depreciation::{self, Projection};
use super::error::{Error, Result};
use super::fiscal::{FiscalYear, FiscalYearEnd};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// In-memory store of a company's capital assets.
///
/// Each asset sits behind its own lock, so depreciation commits for one asset
/// are serialized while different assets proceed in parallel. Of two
/// concurrent commits for the same (asset, year) exactly one succeeds; the
/// other sees the recorded entry and fails with `DuplicateDepreciationYear`.
#[derive(Debug)]
pub struct AssetRegister {
    year_end: FiscalYearEnd,
    order: Vec<String>,
    assets: HashMap<String, Mutex<CapitalAsset>>,
}

impl AssetRegister {
    /// Fails with `DuplicateAsset` if two assets share an id.
    pub fn new<I>(year_end: FiscalYearEnd, assets: I) -> Result<Self>
    where
        I: IntoIterator<Item = CapitalAsset>,
    {
        let mut order = Vec::new();
        let mut map = HashMap::new();
        for asset in assets {
            if map.contains_key(&asset.id) {
                return Err(Error::DuplicateAsset(asset.id));
            }
            order.push(asset.id.clone());
            map.insert(asset.id.clone(), Mutex::new(asset));
        }
        Ok(AssetRegister {
            year_end,
            order,
            assets: map,
        })
    }

    pub fn ids(&self) -> &[String] {
        &self.order
    }

    fn lock(&self, asset_id: &str) -> Result<MutexGuard<'_, CapitalAsset>> {
        let asset = self
            .assets
            .get(asset_id)
            .ok_or_else(|| Error::UnknownAsset(asset_id.to_string()))?;
        // every mutation below is all-or-nothing, so a poisoned lock still holds consistent data
        Ok(asset.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn project_depreciation(&self, asset_id: &str, year: FiscalYear) -> Result<Projection> {
        let asset = self.lock(asset_id)?;
        depreciation::project_depreciation(&asset, year, self.year_end)
    }

    pub fn commit_depreciation(
        &self,
        asset_id: &str,
        year: FiscalYear,
        entry_date: NaiveDate,
    ) -> Result<DepreciationEntry> {
        let mut asset = self.lock(asset_id)?;
        depreciation::commit_depreciation(&mut asset, year, self.year_end, entry_date)
    }

    pub fn dispose(&self, asset_id: &str, date: NaiveDate, amount: Decimal) -> Result<()> {
        let mut asset = self.lock(asset_id)?;
        depreciation::dispose(&mut asset, date, amount)
    }

    /// Copy of the asset's current state
    pub fn snapshot(&self, asset_id: &str) -> Result<CapitalAsset> {
        Ok(self.lock(asset_id)?.clone())
    }

    /// Release the assets, in the order they were registered
    pub fn into_assets(mut self) -> Vec<CapitalAsset> {
        self.order
            .iter()
            .filter_map(|id| self.assets.remove(id))
            .map(|m| m.into_inner().unwrap_or_else(PoisonError::into_inner))
            .collect()
    }
}
