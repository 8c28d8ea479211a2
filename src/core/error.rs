use super::fiscal::FiscalYear;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Broad category of an engine error, used by callers to decide whether a
/// retry with different input makes sense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or out-of-range input, rejected before any computation.
    Validation,
    /// Conflicts with already-recorded state. Retrying with another target may succeed.
    Conflict,
    /// Not enough data to compute the result yet.
    State,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("invalid rate {0}: must be between 0 and 1")]
    InvalidRate(Decimal),
    #[error("invoice has no line items")]
    EmptyInvoice,
    #[error("line item {line} has a negative quantity or unit price")]
    NegativeQuantityOrPrice { line: usize },
    #[error("unknown CCA class: {0}")]
    UnknownCcaClass(String),
    #[error("invalid period: end {end} is before start {start}")]
    InvalidPeriod { start: NaiveDate, end: NaiveDate },
    #[error("unknown asset: {0}")]
    UnknownAsset(String),
    #[error("asset id {0} appears more than once")]
    DuplicateAsset(String),
    #[error("amount is too large to compute")]
    AmountOverflow,
    #[error("asset {asset} was acquired in {acquired}, cannot depreciate for {year}")]
    DepreciationBeforeAcquisition {
        asset: String,
        year: FiscalYear,
        acquired: FiscalYear,
    },
    #[error("depreciation for {year} already recorded on asset {asset}")]
    DuplicateDepreciationYear { asset: String, year: FiscalYear },
    #[error("asset {asset} already has depreciation for {latest}, cannot record {year}")]
    OutOfOrderDepreciationYear {
        asset: String,
        year: FiscalYear,
        latest: FiscalYear,
    },
    #[error("asset {0} is disposed")]
    AssetDisposed(String),
    #[error("asset {0} is already disposed")]
    AlreadyDisposed(String),
    #[error("asset {asset} disposal date {date} is before its purchase date {purchased}")]
    DisposalBeforeAcquisition {
        asset: String,
        date: NaiveDate,
        purchased: NaiveDate,
    },
    #[error("{ledger} ledger does not cover all of {year}")]
    IncompleteFiscalYear {
        ledger: &'static str,
        year: FiscalYear,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidRate(_)
            | Error::EmptyInvoice
            | Error::NegativeQuantityOrPrice { .. }
            | Error::UnknownCcaClass(_)
            | Error::InvalidPeriod { .. }
            | Error::UnknownAsset(_)
            | Error::DuplicateAsset(_)
            | Error::AmountOverflow
            | Error::DepreciationBeforeAcquisition { .. } => ErrorKind::Validation,
            Error::DuplicateDepreciationYear { .. }
            | Error::OutOfOrderDepreciationYear { .. }
            | Error::AssetDisposed(_)
            | Error::AlreadyDisposed(_)
            | Error::DisposalBeforeAcquisition { .. } => ErrorKind::Conflict,
            Error::IncompleteFiscalYear { .. } => ErrorKind::State,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
