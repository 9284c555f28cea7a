// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::amortize::contribution;
use crate::calendar::YearMonth;
use crate::models::Transaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthSummary {
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
}

/// Income, expense and balance due in `ym` across every transaction.
///
/// Each total is rounded once, after accumulation. The balance is taken from
/// the rounded totals so `balance == income - expense` holds exactly.
pub fn month_summary(txs: &[Transaction], ym: YearMonth) -> MonthSummary {
    let (income, expense) = txs
        .iter()
        .map(|t| contribution(t, ym))
        .fold((Decimal::ZERO, Decimal::ZERO), |(i, e), c| {
            (i + c.income, e + c.expense)
        });
    let income = income.round_dp(2);
    let expense = expense.round_dp(2);
    debug!(month = %ym, transactions = txs.len(), %income, %expense, "month summary");
    MonthSummary {
        income,
        expense,
        balance: income - expense,
    }
}

/// Expense due in `ym`, limited to one category when `category` is set.
///
/// Transactions without a category never match a category-scoped query.
pub fn category_expense(txs: &[Transaction], ym: YearMonth, category: Option<i64>) -> Decimal {
    let total: Decimal = txs
        .iter()
        .filter(|t| category.is_none() || t.category_id == category)
        .map(|t| contribution(t, ym).expense)
        .sum();
    total.round_dp(2)
}
