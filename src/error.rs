// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Invalid month '{0}', expected YYYY-MM")]
    InvalidMonth(String),
    #[error("Unknown sort key '{0}' (use date|description|category|total|installments)")]
    UnknownSortKey(String),
    #[error("Unknown sort order '{0}' (use asc|desc)")]
    UnknownSortOrder(String),
    #[error("Unknown transaction type '{0}' (use income|expense)")]
    UnknownKind(String),
    #[error("Unknown type filter '{0}' (use all|income|expense)")]
    UnknownTypeFilter(String),
    #[error("Unknown income subtype '{0}' (use salary|manual|other)")]
    UnknownSubtype(String),
    #[error("Category '{0}' already exists")]
    DuplicateCategory(String),
    #[error("Category '{0}' not found")]
    CategoryNotFound(String),
    #[error("Transaction {0} not found")]
    TransactionNotFound(i64),
    #[error("Salary {0} not found")]
    SalaryNotFound(i64),
}
