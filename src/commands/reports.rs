// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::calendar::YearMonth;
use crate::commands::transactions::load_filtered;
use crate::models::Transaction;
use crate::summary::{category_expense, month_summary};
use crate::trend::{TrendWindow, compute_trend};
use crate::utils::{
    fmt_money, id_for_category, maybe_print_json, month_or_current, pretty_table, trend_window,
};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, sub)?,
        Some(("trend", sub)) => trend(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct SummaryReport {
    pub month: String,
    pub category: Option<String>,
    pub income: Decimal,
    /// Category-scoped when a category was requested.
    pub expense: Decimal,
    /// Always income minus the unscoped expense.
    pub balance: Decimal,
}

pub fn build_summary(
    txs: &[Transaction],
    ym: YearMonth,
    category: Option<(i64, String)>,
) -> SummaryReport {
    let s = month_summary(txs, ym);
    let (expense, category) = match category {
        Some((id, name)) => (category_expense(txs, ym, Some(id)), Some(name)),
        None => (s.expense, None),
    };
    SummaryReport {
        month: ym.to_string(),
        category,
        income: s.income,
        expense,
        balance: s.balance,
    }
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ym = month_or_current(sub.get_one::<String>("month"))?;
    let category = match sub.get_one::<String>("category") {
        Some(name) => Some((id_for_category(conn, name)?, name.trim().to_string())),
        None => None,
    };
    let txs = load_filtered(conn, sub)?;
    let report = build_summary(&txs, ym, category);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        let expense_hdr = match report.category {
            Some(ref c) => format!("Expense ({})", c),
            None => "Expense".to_string(),
        };
        println!(
            "{}",
            pretty_table(
                &["Month", "Income", &expense_hdr, "Balance"],
                vec![vec![
                    report.month.clone(),
                    fmt_money(&report.income),
                    fmt_money(&report.expense),
                    fmt_money(&report.balance),
                ]],
            )
        );
    }
    Ok(())
}

/// Stored window, overridden by `--before` / `--after`.
pub fn resolve_window(conn: &Connection, sub: &clap::ArgMatches) -> Result<TrendWindow> {
    let mut window = trend_window(conn)?;
    if let Some(b) = sub.get_one::<u32>("before") {
        window.before = *b;
    }
    if let Some(a) = sub.get_one::<u32>("after") {
        window.after = *a;
    }
    Ok(window)
}

fn trend(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ym = month_or_current(sub.get_one::<String>("month"))?;
    let window = resolve_window(conn, sub)?;
    let txs = load_filtered(conn, sub)?;
    let t = compute_trend(&txs, ym, window);
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &t)? {
        let rows = t
            .labels
            .iter()
            .zip(t.income.iter().zip(t.expense.iter()))
            .map(|(l, (i, e))| vec![l.clone(), fmt_money(i), fmt_money(e)])
            .collect();
        println!("{}", pretty_table(&["Month", "Income", "Expense"], rows));
    }
    Ok(())
}
