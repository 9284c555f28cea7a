// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Month arithmetic shared by the amortization, summary and trend code.
//!
//! Only year and month take part in due-date matching; the day of month is
//! carried along by [`add_months`] so that installment dates can be shown, but
//! it is never compared.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, LedgerError> {
        if !(1..=12).contains(&month) {
            return Err(LedgerError::InvalidMonth(format!("{}-{}", year, month)));
        }
        Ok(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Months since year 0, so that two months can be subtracted.
    pub fn index(&self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    fn from_index(idx: i64) -> Self {
        Self {
            year: idx.div_euclid(12) as i32,
            month: idx.rem_euclid(12) as u32 + 1,
        }
    }

    pub fn add(&self, n: i32) -> Self {
        self.offset(i64::from(n))
    }

    /// Like [`YearMonth::add`], for shifts that may not fit in an `i32`.
    pub fn offset(&self, n: i64) -> Self {
        Self::from_index(self.index().saturating_add(n))
    }

    /// Number of months from `self` forward to `other` (negative if `other` is earlier).
    pub fn months_until(&self, other: YearMonth) -> i64 {
        other.index() - self.index()
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn days(&self) -> u32 {
        days_in_month(self.year, self.month)
    }

    pub fn label(&self) -> String {
        month_label(self.year, self.month)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (y, m) = s
            .split_once('-')
            .ok_or_else(|| LedgerError::InvalidMonth(s.to_string()))?;
        let year: i32 = y
            .parse()
            .map_err(|_| LedgerError::InvalidMonth(s.to_string()))?;
        let month: u32 = m
            .parse()
            .map_err(|_| LedgerError::InvalidMonth(s.to_string()))?;
        YearMonth::new(year, month).map_err(|_| LedgerError::InvalidMonth(s.to_string()))
    }
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

/// Shift `date` by `n` months, clamping the day to the end of the target month.
///
/// Jan 31 + 1 month is Feb 28 (or 29), never a day in March. Returns `None`
/// only when the result is outside the range chrono can represent.
pub fn add_months(date: NaiveDate, n: i32) -> Option<NaiveDate> {
    let target = YearMonth::from_date(date).add(n);
    let day = date.day().min(target.days());
    NaiveDate::from_ymd_opt(target.year, target.month, day)
}

/// Chart axis label, `MM/YYYY`.
pub fn month_label(year: i32, month: u32) -> String {
    format!("{:02}/{}", month, year)
}
