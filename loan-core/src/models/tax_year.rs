use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Month, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A UK tax year, identified by the calendar year in which it starts.
///
/// Tax years run from 6 April to the following 5 April, so `TaxYear(2025)`
/// is the 2025/26 year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxYear(pub i32);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid tax year '{0}' (expected e.g. 2025/26 or 2025)")]
pub struct ParseTaxYearError(String);

impl TaxYear {
    pub fn start_year(&self) -> i32 {
        self.0
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.0, 4, 6)
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.0 + 1, 4, 5)
    }

    /// The tax year that contains `date`.
    pub fn containing(date: NaiveDate) -> Self {
        if (date.month(), date.day()) >= (4, 6) {
            Self(date.year())
        } else {
            Self(date.year() - 1)
        }
    }

    /// Calendar month of the `index`-th payroll month, counting April as 0.
    pub fn month(
        &self,
        index: usize,
    ) -> Month {
        let mut month = Month::April;
        for _ in 0..index % 12 {
            month = month.succ();
        }
        month
    }

    /// Label such as `"January 2026"` for the `index`-th payroll month.
    pub fn month_label(
        &self,
        index: usize,
    ) -> String {
        let month = self.month(index);
        let year = if month.number_from_month() < 4 {
            self.0 + 1
        } else {
            self.0
        };
        format!("{} {}", month.name(), year)
    }
}

impl fmt::Display for TaxYear {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}/{:02}", self.0, (self.0 + 1).rem_euclid(100))
    }
}

impl FromStr for TaxYear {
    type Err = ParseTaxYearError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let start = trimmed
            .split(['/', '-'])
            .next()
            .and_then(|y| y.parse::<i32>().ok())
            .filter(|y| (1990..=2100).contains(y))
            .ok_or_else(|| ParseTaxYearError(s.to_string()))?;
        Ok(Self(start))
    }
}
