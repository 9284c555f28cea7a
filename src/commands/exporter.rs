// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::reports::resolve_window;
use crate::commands::transactions::load_filtered;
use crate::trend::compute_trend;
use crate::utils::month_or_current;
use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;
use tracing::info;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        Some(("trend", sub)) => export_trend(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let txs = load_filtered(conn, sub)?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "id",
                "date",
                "description",
                "type",
                "amount_total",
                "installments",
                "installment_amount",
                "category",
                "paid",
                "notes",
            ])?;
            for t in &txs {
                wtr.write_record([
                    t.id.to_string(),
                    t.date.to_string(),
                    t.description.clone(),
                    t.kind.as_str().to_string(),
                    t.amount_total.to_string(),
                    match t.installments.count() {
                        Some(n) => n.to_string(),
                        None => "recurring".to_string(),
                    },
                    t.installment_amount
                        .map(|d| d.to_string())
                        .unwrap_or_default(),
                    t.category_name.clone().unwrap_or_default(),
                    t.is_paid.to_string(),
                    t.notes.clone().unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&txs)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    info!(rows = txs.len(), out = %out, "transactions exported");
    println!("Exported {} transactions to {}", txs.len(), out);
    Ok(())
}

fn export_trend(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    let ym = month_or_current(sub.get_one::<String>("month"))?;
    let window = resolve_window(conn, sub)?;
    let txs = load_filtered(conn, sub)?;
    let t = compute_trend(&txs, ym, window);

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record(["month", "income", "expense"])?;
            for (i, label) in t.labels.iter().enumerate() {
                wtr.write_record([
                    label.clone(),
                    format!("{:.2}", t.income[i]),
                    format!("{:.2}", t.expense[i]),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let v = json!({
                "reference": ym.to_string(),
                "labels": t.labels,
                "income": t.income,
                "expense": t.expense,
            });
            std::fs::write(out, serde_json::to_string_pretty(&v)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
            return Ok(());
        }
    }
    info!(months = t.labels.len(), out = %out, "trend exported");
    println!("Exported {} months to {}", t.labels.len(), out);
    Ok(())
}
