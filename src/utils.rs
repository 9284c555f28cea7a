// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use tracing::warn;

use crate::calendar::YearMonth;
use crate::error::LedgerError;
use crate::query::PAGE_SIZE;
use crate::trend::{DEFAULT_MONTHS_AFTER, DEFAULT_MONTHS_BEFORE, TrendWindow};

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// Missing or unparseable dates fall back to today.
pub fn parse_date_or_today(s: Option<&str>) -> NaiveDate {
    match s.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => parse_date(raw).unwrap_or_else(|_| {
            warn!(input = raw, "unparseable date, using today");
            today()
        }),
        None => today(),
    }
}

/// Missing, unparseable or non-positive counts become 1.
pub fn parse_installments(s: Option<&str>) -> i64 {
    s.and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(1)
}

pub fn parse_month(s: &str) -> Result<YearMonth> {
    Ok(s.parse::<YearMonth>()?)
}

/// `--month` if given, otherwise the current month.
pub fn month_or_current(s: Option<&String>) -> Result<YearMonth> {
    match s {
        Some(m) => parse_month(m),
        None => Ok(YearMonth::from_date(today())),
    }
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn id_for_category(conn: &Connection, name: &str) -> Result<i64> {
    let name = name.trim();
    let id: Option<i64> = conn
        .query_row(
            "SELECT id FROM categories WHERE name=?1",
            params![name],
            |r| r.get(0),
        )
        .optional()?;
    id.ok_or_else(|| LedgerError::CategoryNotFound(name.to_string()).into())
}

// Persistent settings
pub const SETTING_TREND_BEFORE: &str = "trend_before";
pub const SETTING_TREND_AFTER: &str = "trend_after";
pub const SETTING_PAGE_SIZE: &str = "page_size";
pub const SETTING_KEYS: [&str; 3] = [SETTING_TREND_BEFORE, SETTING_TREND_AFTER, SETTING_PAGE_SIZE];

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

fn setting_u32(conn: &Connection, key: &str, default: u32) -> Result<u32> {
    let v = get_setting(conn, key)?;
    Ok(v.and_then(|s| s.trim().parse::<u32>().ok())
        .unwrap_or(default))
}

pub fn trend_window(conn: &Connection) -> Result<TrendWindow> {
    Ok(TrendWindow {
        before: setting_u32(conn, SETTING_TREND_BEFORE, DEFAULT_MONTHS_BEFORE)?,
        after: setting_u32(conn, SETTING_TREND_AFTER, DEFAULT_MONTHS_AFTER)?,
    })
}

pub fn page_size(conn: &Connection) -> Result<usize> {
    let n = setting_u32(conn, SETTING_PAGE_SIZE, PAGE_SIZE as u32)?;
    Ok((n as usize).max(1))
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
