// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::transactions::load_all;
use crate::models::{Kind, Transaction};
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = check(conn)?;
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

fn sign_mismatch(t: &Transaction) -> bool {
    match t.kind {
        Kind::Income => t.is_expense(),
        Kind::Expense => t.is_income(),
    }
}

/// Collects `[issue, detail]` pairs for every inconsistency found.
pub fn check(conn: &Connection) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    // 1) Amount sign disagrees with the stored type
    let txs = load_all(conn)?;
    for t in txs.iter().filter(|t| sign_mismatch(t)) {
        rows.push(vec![
            "sign_kind_mismatch".into(),
            format!("#{} {} {}", t.id, t.kind.as_str(), t.amount_total),
        ]);
    }

    // 2) Per-installment amount with a different sign than the total
    for t in &txs {
        if let Some(per) = t.installment_amount {
            if per.is_sign_negative() != t.amount_total.is_sign_negative() && !per.is_zero() {
                rows.push(vec![
                    "installment_sign_mismatch".into(),
                    format!("#{} total {} per {}", t.id, t.amount_total, per),
                ]);
            }
        }
    }

    // 3) Zero amounts never contribute anything
    for t in txs.iter().filter(|t| t.amount_total.is_zero()) {
        rows.push(vec!["zero_amount".into(), format!("#{} {}", t.id, t.description)]);
    }

    // 4) Category references that no longer resolve
    let mut stmt = conn.prepare(
        "SELECT t.id, t.category_id FROM transactions t
         LEFT JOIN categories c ON t.category_id=c.id
         WHERE t.category_id IS NOT NULL AND c.id IS NULL",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let cat: i64 = r.get(1)?;
        rows.push(vec![
            "dangling_category".into(),
            format!("#{} -> category {}", id, cat),
        ]);
    }

    Ok(rows)
}
