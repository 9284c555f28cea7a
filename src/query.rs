// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Narrowing, ordering and paging of the transaction list.
//!
//! Totals and trends are computed over the filtered list before it is paged;
//! [`paginate`] only slices what gets displayed.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use crate::error::LedgerError;
use crate::models::Transaction;

pub const PAGE_SIZE: usize = 25;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PaidFilter {
    #[default]
    Unpaid,
    Paid,
}

impl PaidFilter {
    pub fn from_flag(show_paid: bool) -> Self {
        if show_paid {
            PaidFilter::Paid
        } else {
            PaidFilter::Unpaid
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TypeFilter {
    #[default]
    All,
    Income,
    Expense,
}

impl FromStr for TypeFilter {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(TypeFilter::All),
            "income" => Ok(TypeFilter::Income),
            "expense" => Ok(TypeFilter::Expense),
            other => Err(LedgerError::UnknownTypeFilter(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Filters {
    pub paid: PaidFilter,
    pub kind: TypeFilter,
    pub include_categories: Vec<i64>,
    pub exclude_categories: Vec<i64>,
    pub search: Option<String>,
}

impl Filters {
    pub fn matches(&self, tx: &Transaction) -> bool {
        if tx
            .income_subtype
            .is_some_and(|s| s.hidden_from_main_list())
        {
            return false;
        }
        let paid_ok = match self.paid {
            PaidFilter::Unpaid => !tx.is_paid,
            PaidFilter::Paid => tx.is_paid,
        };
        if !paid_ok {
            return false;
        }
        let kind_ok = match self.kind {
            TypeFilter::All => true,
            TypeFilter::Income => tx.is_income(),
            TypeFilter::Expense => tx.is_expense(),
        };
        if !kind_ok {
            return false;
        }
        if !self.include_categories.is_empty()
            && !tx
                .category_id
                .is_some_and(|c| self.include_categories.contains(&c))
        {
            return false;
        }
        // Uncategorized rows are never removed by the exclude set.
        if let Some(c) = tx.category_id {
            if self.exclude_categories.contains(&c) {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => tx
                .description
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Date,
    Description,
    Category,
    Total,
    Installments,
}

impl FromStr for SortKey {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(SortKey::Date),
            "description" => Ok(SortKey::Description),
            "category" => Ok(SortKey::Category),
            "total" => Ok(SortKey::Total),
            "installments" => Ok(SortKey::Installments),
            other => Err(LedgerError::UnknownSortKey(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortOrder {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(LedgerError::UnknownSortOrder(other.to_string())),
        }
    }
}

fn compare(a: &Transaction, b: &Transaction, key: SortKey) -> Ordering {
    let primary = match key {
        SortKey::Date => a.date.cmp(&b.date),
        SortKey::Description => a.description.cmp(&b.description),
        SortKey::Category => a.category_name.cmp(&b.category_name),
        SortKey::Total => a.amount_total.cmp(&b.amount_total),
        SortKey::Installments => a.installments.cmp(&b.installments),
    };
    primary.then_with(|| a.id.cmp(&b.id))
}

/// Apply `filters`, then order by `key` with ties broken by id in the same direction.
pub fn filter_and_sort(
    txs: Vec<Transaction>,
    filters: &Filters,
    key: SortKey,
    order: SortOrder,
) -> Vec<Transaction> {
    let total = txs.len();
    let mut out: Vec<Transaction> = txs.into_iter().filter(|t| filters.matches(t)).collect();
    out.sort_by(|a, b| match order {
        SortOrder::Asc => compare(a, b, key),
        SortOrder::Desc => compare(b, a, key),
    });
    debug!(total, kept = out.len(), ?key, ?order, "filtered transactions");
    out
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub total_pages: usize,
    pub page: usize,
}

/// Slice one page out of `items`. Pages are 1-based; out-of-range requests
/// clamp to the first or last page instead of failing.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let total_pages = items.len().div_ceil(page_size);
    let mut page = page.max(1);
    if total_pages > 0 && page > total_pages {
        page = total_pages;
    }
    let start = (page - 1).saturating_mul(page_size).min(items.len());
    let end = (start + page_size).min(items.len());
    Page {
        items: &items[start..end],
        total_pages,
        page,
    }
}

/// Parse a comma-separated id list, skipping anything that is not a number.
pub fn parse_id_list(raw: &str) -> Vec<i64> {
    raw.split(',')
        .filter_map(|s| s.trim().parse::<i64>().ok())
        .filter(|id| *id >= 0)
        .collect()
}
