use super::error::{Error, Result};
use chrono::{Datelike, Duration, Months, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Month and day on which a company's fiscal year closes, written "MM-DD".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(try_from = "String", into = "String")]
#[schemars(with = "String")]
pub struct FiscalYearEnd {
    month: u32,
    day: u32,
}

impl FiscalYearEnd {
    pub const DECEMBER_31: FiscalYearEnd = FiscalYearEnd { month: 12, day: 31 };

    pub fn new(month: u32, day: u32) -> Option<Self> {
        // 2000 is a leap year, so 02-29 is accepted and clamped in shorter years
        NaiveDate::from_ymd_opt(2000, month, day).map(|_| FiscalYearEnd { month, day })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// The closing date in the given calendar year. A 02-29 year end closes on
    /// 02-28 in non-leap years.
    pub fn in_year(&self, year: i32) -> NaiveDate {
        (1..=self.day)
            .rev()
            .find_map(|d| NaiveDate::from_ymd_opt(year, self.month, d))
            .expect("fiscal year end month is validated on construction")
    }
}

impl Default for FiscalYearEnd {
    fn default() -> Self {
        FiscalYearEnd::DECEMBER_31
    }
}

impl FromStr for FiscalYearEnd {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (month, day) = s
            .split_once('-')
            .ok_or_else(|| format!("fiscal year end '{s}' must be MM-DD"))?;
        let month = month
            .trim()
            .parse::<u32>()
            .map_err(|e| format!("fiscal year end month '{month}': {e}"))?;
        let day = day
            .trim()
            .parse::<u32>()
            .map_err(|e| format!("fiscal year end day '{day}': {e}"))?;
        FiscalYearEnd::new(month, day).ok_or_else(|| format!("fiscal year end '{s}' is not a date"))
    }
}

impl TryFrom<String> for FiscalYearEnd {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<FiscalYearEnd> for String {
    fn from(end: FiscalYearEnd) -> Self {
        format!("{:02}-{:02}", end.month, end.day)
    }
}

/// A fiscal year, identified by the calendar year in which it ends
/// (e.g. with a 03-31 year end, FY2025 runs 2024-04-01 to 2025-03-31).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub struct FiscalYear(pub i32);

impl FiscalYear {
    /// The fiscal year containing `date`
    pub fn from_date(date: NaiveDate, end: FiscalYearEnd) -> Self {
        if date <= end.in_year(date.year()) {
            FiscalYear(date.year())
        } else {
            FiscalYear(date.year() + 1)
        }
    }

    /// First day: the day after the previous year's closing date
    pub fn start_date(&self, end: FiscalYearEnd) -> NaiveDate {
        end.in_year(self.0 - 1) + Duration::days(1)
    }

    pub fn end_date(&self, end: FiscalYearEnd) -> NaiveDate {
        end.in_year(self.0)
    }

    pub fn period(&self, end: FiscalYearEnd) -> Period {
        Period {
            start: self.start_date(end),
            end: self.end_date(end),
        }
    }

    /// The four reporting quarters of this fiscal year
    pub fn quarters(&self, end: FiscalYearEnd) -> Vec<Period> {
        let start = self.start_date(end);
        let year_end = self.end_date(end);
        (0..4)
            .map(|q| {
                let q_start = start + Months::new(3 * q);
                let q_end = if q == 3 {
                    year_end
                } else {
                    start + Months::new(3 * (q + 1)) - Duration::days(1)
                };
                Period {
                    start: q_start,
                    end: q_end,
                }
            })
            .collect()
    }

    pub fn next(&self) -> FiscalYear {
        FiscalYear(self.0 + 1)
    }

    pub fn display(&self) -> String {
        format!("FY{}", self.0)
    }
}

impl std::fmt::Display for FiscalYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// An inclusive date range used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Period {
    #[schemars(with = "String")]
    start: NaiveDate,
    #[schemars(with = "String")]
    end: NaiveDate,
}

impl Period {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(Error::InvalidPeriod { start, end });
        }
        Ok(Period { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Whether this period fully covers `other`
    pub fn covers(&self, other: &Period) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}
