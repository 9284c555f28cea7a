// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::calendar::YearMonth;
use crate::commands::transactions::{insert_transaction, load_by_subtype};
use crate::error::LedgerError;
use crate::models::{IncomeSubtype, Installments, Kind, Transaction};
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table, today};
use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use rusqlite::{Connection, params};
use tracing::{info, warn};

pub const DEFAULT_PAYDAY: u32 = 5;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            let n = conn.execute(
                "DELETE FROM transactions WHERE id=?1 AND income_subtype=?2",
                params![id, IncomeSubtype::Salary.as_str()],
            )?;
            if n == 0 {
                return Err(LedgerError::SalaryNotFound(id).into());
            }
            info!(id, "salary removed");
            println!("Removed salary #{}", id);
        }
        _ => {}
    }
    Ok(())
}

/// Days outside 1..=28 (or unparseable) fall back to the 5th.
pub fn parse_payday(s: Option<&str>) -> u32 {
    match s.map(|v| v.trim().parse::<i64>()) {
        Some(Ok(d)) if (1..=28).contains(&d) => d as u32,
        Some(_) => {
            warn!(input = s, "payday outside 1..=28, using {}", DEFAULT_PAYDAY);
            DEFAULT_PAYDAY
        }
        None => DEFAULT_PAYDAY,
    }
}

/// First payday on or after `today`.
pub fn salary_start(today: NaiveDate, payday: u32) -> NaiveDate {
    let this_month = YearMonth::from_date(today);
    let ym = if today.day() <= payday {
        this_month
    } else {
        this_month.add(1)
    };
    NaiveDate::from_ymd_opt(ym.year, ym.month, payday.min(ym.days())).unwrap_or(today)
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let description = sub.get_one::<String>("description").unwrap().trim().to_string();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let payday = parse_payday(sub.get_one::<String>("payday").map(|s| s.as_str()));
    let start = salary_start(today(), payday);

    let mut tx = Transaction::new(Kind::Income, amount, start, Installments::Unbounded);
    tx.description = description;
    tx.income_subtype = Some(IncomeSubtype::Salary);
    let id = insert_transaction(conn, &tx)?;
    info!(id, %start, "salary recorded");
    println!(
        "Recorded salary #{} '{}' {} starting {}",
        id,
        tx.description,
        fmt_money(&tx.amount_total),
        start
    );
    Ok(())
}

pub fn list_salaries(conn: &Connection) -> Result<Vec<Transaction>> {
    let mut data = load_by_subtype(conn, IncomeSubtype::Salary)?;
    data.sort_by(|a, b| a.description.cmp(&b.description));
    Ok(data)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = list_salaries(conn)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .iter()
            .map(|t| {
                vec![
                    t.id.to_string(),
                    t.description.clone(),
                    fmt_money(&t.amount_total),
                    t.date.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Id", "Description", "Amount", "Since"], rows)
        );
    }
    Ok(())
}
