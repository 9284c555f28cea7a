// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::calendar::YearMonth;
use crate::models::Transaction;
use crate::summary::month_summary;

pub const DEFAULT_MONTHS_BEFORE: u32 = 3;
pub const DEFAULT_MONTHS_AFTER: u32 = 9;
/// Upper bound for either side of the window (100 years).
pub const MAX_TREND_MONTHS: u32 = 1200;

/// Months shown around the reference month (which is always included).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendWindow {
    pub before: u32,
    pub after: u32,
}

impl Default for TrendWindow {
    fn default() -> Self {
        Self {
            before: DEFAULT_MONTHS_BEFORE,
            after: DEFAULT_MONTHS_AFTER,
        }
    }
}

impl TrendWindow {
    /// Both sides capped at [`MAX_TREND_MONTHS`].
    pub fn clamped(self) -> Self {
        Self {
            before: self.before.min(MAX_TREND_MONTHS),
            after: self.after.min(MAX_TREND_MONTHS),
        }
    }

    pub fn span(&self) -> usize {
        let w = self.clamped();
        w.before as usize + w.after as usize + 1
    }

    pub fn months(self, reference: YearMonth) -> impl Iterator<Item = YearMonth> {
        let w = self.clamped();
        let start = reference.offset(-i64::from(w.before));
        (0..w.span() as i64).map(move |i| start.offset(i))
    }
}

/// Parallel chart series, one entry per month in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Trend {
    pub labels: Vec<String>,
    pub income: Vec<Decimal>,
    pub expense: Vec<Decimal>,
}

pub fn compute_trend(txs: &[Transaction], reference: YearMonth, window: TrendWindow) -> Trend {
    debug!(%reference, before = window.before, after = window.after, "projecting trend");
    let mut trend = Trend::default();
    for ym in window.months(reference) {
        let s = month_summary(txs, ym);
        trend.labels.push(ym.label());
        trend.income.push(s.income);
        trend.expense.push(s.expense);
    }
    trend
}
