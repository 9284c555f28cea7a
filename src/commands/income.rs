// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::transactions::load_by_subtype;
use crate::models::{IncomeSubtype, Transaction};
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub const RECENT_MANUAL_INCOME: usize = 10;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("list", sub)) = m.subcommand() {
        let data = recent_manual_income(conn)?;
        if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
            let rows = data
                .iter()
                .map(|t| {
                    vec![
                        t.id.to_string(),
                        t.date.to_string(),
                        t.description.clone(),
                        fmt_money(&t.amount_total),
                    ]
                })
                .collect();
            println!(
                "{}",
                pretty_table(&["Id", "Date", "Description", "Amount"], rows)
            );
        }
    }
    Ok(())
}

/// Latest manually flagged income entries, newest first.
pub fn recent_manual_income(conn: &Connection) -> Result<Vec<Transaction>> {
    let mut data = load_by_subtype(conn, IncomeSubtype::ManualIncome)?;
    data.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    data.truncate(RECENT_MANUAL_INCOME);
    Ok(data)
}
