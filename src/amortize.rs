// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Decides how much of a single transaction falls due in a given month.
//!
//! Income is attributed whole to the month of its date. Expenses are spread
//! over their installments, or repeated every month from the start month on
//! when the transaction is recurring.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::calendar::{YearMonth, add_months};
use crate::models::{Installments, Transaction};

/// Non-negative amounts one transaction adds to a month's income and expense buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Contribution {
    pub income: Decimal,
    pub expense: Decimal,
}

/// Magnitude of one installment.
///
/// Uses the stored per-installment amount when there is one, otherwise splits
/// the total over the (clamped) installment count.
pub fn installment_magnitude(tx: &Transaction) -> Decimal {
    let per = match tx.installment_amount {
        Some(v) => v,
        None => {
            let n = tx.installments.count().unwrap_or(1);
            tx.amount_total / Decimal::from(n)
        }
    };
    per.abs()
}

pub fn contribution(tx: &Transaction, ym: YearMonth) -> Contribution {
    if tx.is_income() {
        if YearMonth::from_date(tx.date) == ym {
            return Contribution {
                income: tx.amount_total,
                expense: Decimal::ZERO,
            };
        }
        return Contribution::default();
    }
    Contribution {
        income: Decimal::ZERO,
        expense: expense_due(tx, ym),
    }
}

pub fn income_due(tx: &Transaction, ym: YearMonth) -> Decimal {
    contribution(tx, ym).income
}

/// Expense magnitude due in `ym`; zero for income rows.
pub fn expense_due(tx: &Transaction, ym: YearMonth) -> Decimal {
    if tx.is_income() {
        return Decimal::ZERO;
    }
    let start = YearMonth::from_date(tx.date);
    let offset = start.months_until(ym);
    let due = match tx.installments {
        Installments::Unbounded => offset >= 0,
        Installments::Finite(_) => {
            // add_months never moves an installment out of its shifted month,
            // so installment i lands in start + i.
            let n = tx.installments.count().unwrap_or(1) as i64;
            (0..n).contains(&offset)
        }
    };
    if due {
        installment_magnitude(tx)
    } else {
        Decimal::ZERO
    }
}

/// Calendar dates of every installment of a finite schedule; empty when recurring.
pub fn schedule(tx: &Transaction) -> Vec<NaiveDate> {
    match tx.installments.count() {
        // stops early once dates run past what chrono can represent
        Some(n) => (0..n)
            .map_while(|i| i32::try_from(i).ok().and_then(|i| add_months(tx.date, i)))
            .collect(),
        None => Vec::new(),
    }
}
