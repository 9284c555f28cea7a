// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Income,
    Expense,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Income => "income",
            Kind::Expense => "expense",
        }
    }

    /// Apply this kind's sign to a magnitude.
    pub fn signed(&self, amount: Decimal) -> Decimal {
        match self {
            Kind::Income => amount.abs(),
            Kind::Expense => -amount.abs(),
        }
    }
}

impl FromStr for Kind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Kind::Income),
            "expense" => Ok(Kind::Expense),
            other => Err(LedgerError::UnknownKind(other.to_string())),
        }
    }
}

/// How many monthly installments a transaction is spread over.
///
/// `Unbounded` marks a recurring charge that repeats every month with no end.
/// Every finite count orders before `Unbounded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Installments {
    Finite(u32),
    Unbounded,
}

impl Installments {
    /// Build a finite schedule, clamping non-positive counts to 1.
    pub fn finite(n: i64) -> Self {
        Installments::Finite(n.clamp(1, u32::MAX as i64) as u32)
    }

    /// Rebuild from the stored `(installments, recurring)` column pair.
    pub fn from_columns(count: i64, recurring: bool) -> Self {
        if recurring {
            Installments::Unbounded
        } else {
            Installments::finite(count)
        }
    }

    /// Effective count, always >= 1. `None` for recurring transactions.
    pub fn count(&self) -> Option<u32> {
        match self {
            Installments::Finite(n) => Some((*n).max(1)),
            Installments::Unbounded => None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, Installments::Unbounded)
    }
}

impl Default for Installments {
    fn default() -> Self {
        Installments::Finite(1)
    }
}

/// Tags income rows that are listed apart from the main transaction list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncomeSubtype {
    Salary,
    ManualIncome,
    Other,
}

impl IncomeSubtype {
    pub fn as_str(&self) -> &'static str {
        match self {
            IncomeSubtype::Salary => "salary",
            IncomeSubtype::ManualIncome => "manual",
            IncomeSubtype::Other => "other",
        }
    }

    /// Salaries and manual income entries never show up in the main list.
    pub fn hidden_from_main_list(&self) -> bool {
        matches!(self, IncomeSubtype::Salary | IncomeSubtype::ManualIncome)
    }
}

impl FromStr for IncomeSubtype {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "salary" => Ok(IncomeSubtype::Salary),
            "manual" | "manual_income" => Ok(IncomeSubtype::ManualIncome),
            "other" => Ok(IncomeSubtype::Other),
            other => Err(LedgerError::UnknownSubtype(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub description: String,
    pub amount_total: Decimal, // income +, expense -
    pub kind: Kind,
    pub date: NaiveDate, // first installment, or start of a recurring charge
    pub installments: Installments,
    pub installment_amount: Option<Decimal>,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub income_subtype: Option<IncomeSubtype>,
    pub is_paid: bool,
    pub notes: Option<String>,
}

impl Transaction {
    /// A new, unsaved transaction (`id` 0) with the sign forced by `kind`.
    ///
    /// Recurring charges repeat the full amount every month; finite schedules
    /// split it evenly over the installments.
    pub fn new(
        kind: Kind,
        amount: Decimal,
        date: NaiveDate,
        installments: Installments,
    ) -> Self {
        let amount_total = kind.signed(amount);
        let installment_amount = match installments.count() {
            Some(n) => amount_total / Decimal::from(n),
            None => amount_total,
        };
        Self {
            id: 0,
            description: String::new(),
            amount_total,
            kind,
            date,
            installments,
            installment_amount: Some(installment_amount),
            category_id: None,
            category_name: None,
            income_subtype: None,
            is_paid: false,
            notes: None,
        }
    }

    pub fn is_recurring(&self) -> bool {
        self.installments.is_unbounded()
    }

    pub fn is_income(&self) -> bool {
        self.amount_total > Decimal::ZERO
    }

    pub fn is_expense(&self) -> bool {
        self.amount_total < Decimal::ZERO
    }
}
