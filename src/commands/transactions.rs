// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::amortize::schedule;
use crate::error::LedgerError;
use crate::models::{IncomeSubtype, Installments, Kind, Transaction};
use crate::query::{
    Filters, PaidFilter, SortKey, SortOrder, TypeFilter, filter_and_sort, paginate, parse_id_list,
};
use crate::utils::{
    fmt_money, id_for_category, maybe_print_json, page_size, parse_date_or_today, parse_decimal,
    parse_installments, pretty_table,
};
use anyhow::{Context, Result};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use tracing::info;

/// Installment rows printed by `tx show`.
const SCHEDULE_ROWS: usize = 120;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        Some(("pay", sub)) => pay(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Build a transaction from `tx add` / `tx edit` arguments.
///
/// Dates and installment counts are coerced rather than rejected; the amount
/// must parse.
pub fn tx_from_matches(conn: &Connection, sub: &clap::ArgMatches) -> Result<Transaction> {
    let description = sub.get_one::<String>("description").unwrap().trim().to_string();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let kind: Kind = sub.get_one::<String>("type").unwrap().parse()?;
    let date = parse_date_or_today(sub.get_one::<String>("date").map(|s| s.as_str()));
    let installments = if sub.get_flag("recurring") {
        Installments::Unbounded
    } else {
        Installments::finite(parse_installments(
            sub.get_one::<String>("installments").map(|s| s.as_str()),
        ))
    };

    let mut tx = Transaction::new(kind, amount, date, installments);
    tx.description = description;
    if let Some(cat) = sub.get_one::<String>("category") {
        tx.category_id = Some(id_for_category(conn, cat)?);
        tx.category_name = Some(cat.trim().to_string());
    }
    tx.notes = sub
        .get_one::<String>("notes")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    tx.income_subtype = match sub.get_one::<String>("subtype") {
        Some(s) => Some(s.parse::<IncomeSubtype>()?),
        None => None,
    };
    Ok(tx)
}

pub fn insert_transaction(conn: &Connection, tx: &Transaction) -> Result<i64> {
    let count = tx.installments.count().unwrap_or(1);
    conn.execute(
        "INSERT INTO transactions(description, amount_total, kind, date, installments, installment_amount,
                                  recurring, category_id, income_subtype, paid, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            tx.description,
            tx.amount_total.to_string(),
            tx.kind.as_str(),
            tx.date.to_string(),
            count,
            tx.installment_amount.map(|d| d.to_string()),
            tx.is_recurring(),
            tx.category_id,
            tx.income_subtype.map(|s| s.as_str()),
            tx.is_paid,
            tx.notes,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let tx = tx_from_matches(conn, sub)?;
    let id = insert_transaction(conn, &tx)?;
    info!(id, amount = %tx.amount_total, recurring = tx.is_recurring(), "transaction recorded");
    println!(
        "Recorded #{} {} on {} '{}'{}",
        id,
        fmt_money(&tx.amount_total),
        tx.date,
        tx.description,
        describe_schedule(&tx.installments)
    );
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let existing = load_one(conn, id)?.ok_or(LedgerError::TransactionNotFound(id))?;
    let mut tx = tx_from_matches(conn, sub)?;
    tx.id = id;
    tx.is_paid = existing.is_paid;
    if tx.income_subtype.is_none() {
        tx.income_subtype = existing.income_subtype;
    }
    let count = tx.installments.count().unwrap_or(1);
    conn.execute(
        "UPDATE transactions SET description=?1, amount_total=?2, kind=?3, date=?4, installments=?5,
                installment_amount=?6, recurring=?7, category_id=?8, income_subtype=?9, notes=?10
         WHERE id=?11",
        params![
            tx.description,
            tx.amount_total.to_string(),
            tx.kind.as_str(),
            tx.date.to_string(),
            count,
            tx.installment_amount.map(|d| d.to_string()),
            tx.is_recurring(),
            tx.category_id,
            tx.income_subtype.map(|s| s.as_str()),
            tx.notes,
            id,
        ],
    )?;
    info!(id, "transaction updated");
    println!("Updated #{} '{}'", id, tx.description);
    Ok(())
}

fn remove(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let n = conn.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(LedgerError::TransactionNotFound(id).into());
    }
    info!(id, "transaction removed");
    println!("Removed transaction #{}", id);
    Ok(())
}

/// Marks a transaction as paid. There is no way back to unpaid.
pub fn pay(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let n = conn.execute("UPDATE transactions SET paid=1 WHERE id=?1", params![id])?;
    if n == 0 {
        return Err(LedgerError::TransactionNotFound(id).into());
    }
    info!(id, "transaction marked paid");
    println!("Marked #{} as paid", id);
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let tx = load_one(conn, id)?.ok_or(LedgerError::TransactionNotFound(id))?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &tx)? {
        return Ok(());
    }
    println!(
        "{}",
        pretty_table(&["Field", "Value"], vec![
            vec!["Id".into(), tx.id.to_string()],
            vec!["Description".into(), tx.description.clone()],
            vec!["Type".into(), tx.kind.as_str().into()],
            vec!["Total".into(), fmt_money(&tx.amount_total)],
            vec![
                "Installment".into(),
                fmt_money(&crate::amortize::installment_magnitude(&tx))
            ],
            vec!["Date".into(), tx.date.to_string()],
            vec!["Schedule".into(), describe_schedule(&tx.installments).trim().to_string()],
            vec!["Category".into(), tx.category_name.clone().unwrap_or_default()],
            vec!["Paid".into(), if tx.is_paid { "yes" } else { "no" }.into()],
            vec!["Notes".into(), tx.notes.clone().unwrap_or_default()],
        ])
    );
    let dates = schedule(&tx);
    if dates.len() > 1 {
        let rows = dates
            .iter()
            .take(SCHEDULE_ROWS)
            .enumerate()
            .map(|(i, d)| vec![format!("{}/{}", i + 1, dates.len()), d.to_string()])
            .collect();
        println!("{}", pretty_table(&["Installment", "Due"], rows));
        if dates.len() > SCHEDULE_ROWS {
            println!("... {} more installments", dates.len() - SCHEDULE_ROWS);
        }
    }
    Ok(())
}

fn describe_schedule(installments: &Installments) -> String {
    match installments {
        Installments::Unbounded => " (monthly, recurring)".to_string(),
        Installments::Finite(_) => match installments.count() {
            Some(n) if n > 1 => format!(" ({}x)", n),
            _ => String::new(),
        },
    }
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = load_filtered(conn, sub)?;
    let page_no = sub.get_one::<usize>("page").copied().unwrap_or(1);
    let page = paginate(&data, page_no, page_size(conn)?);
    if maybe_print_json(json_flag, jsonl_flag, &page.items)? {
        return Ok(());
    }
    let rows: Vec<Vec<String>> = page
        .items
        .iter()
        .map(|t| {
            vec![
                t.id.to_string(),
                t.date.to_string(),
                t.description.clone(),
                t.category_name.clone().unwrap_or_default(),
                fmt_money(&t.amount_total),
                match t.installments.count() {
                    Some(n) => n.to_string(),
                    None => "recurring".into(),
                },
                if t.is_paid { "yes" } else { "no" }.into(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Id", "Date", "Description", "Category", "Total", "Inst.", "Paid"],
            rows,
        )
    );
    println!(
        "Page {}/{} ({} transactions)",
        page.page,
        page.total_pages.max(1),
        data.len()
    );
    Ok(())
}

/// Filter, sort and order settings from the shared list arguments.
pub fn filters_from_matches(sub: &clap::ArgMatches) -> Result<(Filters, SortKey, SortOrder)> {
    let filters = Filters {
        paid: PaidFilter::from_flag(sub.get_flag("paid")),
        kind: sub
            .get_one::<String>("type")
            .map(|s| s.parse::<TypeFilter>())
            .transpose()?
            .unwrap_or_default(),
        include_categories: sub
            .get_one::<String>("include")
            .map(|s| parse_id_list(s))
            .unwrap_or_default(),
        exclude_categories: sub
            .get_one::<String>("exclude")
            .map(|s| parse_id_list(s))
            .unwrap_or_default(),
        search: sub.get_one::<String>("search").cloned(),
    };
    let key = sub
        .get_one::<String>("sort")
        .map(|s| s.parse::<SortKey>())
        .transpose()?
        .unwrap_or_default();
    let order = sub
        .get_one::<String>("order")
        .map(|s| s.parse::<SortOrder>())
        .transpose()?
        .unwrap_or_default();
    Ok((filters, key, order))
}

/// Every stored transaction narrowed and ordered by the list arguments (not paged).
pub fn load_filtered(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<Transaction>> {
    let (filters, key, order) = filters_from_matches(sub)?;
    Ok(filter_and_sort(load_all(conn)?, &filters, key, order))
}

const SELECT_TX: &str = "SELECT t.id, t.description, t.amount_total, t.kind, t.date, t.installments,
        t.installment_amount, t.recurring, t.category_id, c.name, t.income_subtype, t.paid, t.notes
     FROM transactions t LEFT JOIN categories c ON t.category_id=c.id";

fn read_row(r: &rusqlite::Row<'_>) -> Result<Transaction> {
    let id: i64 = r.get(0)?;
    let amount_s: String = r.get(2)?;
    let amount_total = amount_s
        .parse::<Decimal>()
        .with_context(|| format!("Invalid amount '{}' on transaction {}", amount_s, id))?;
    let kind_s: String = r.get(3)?;
    let date_s: String = r.get(4)?;
    let date = chrono::NaiveDate::parse_from_str(&date_s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}' on transaction {}", date_s, id))?;
    let count: i64 = r.get(5)?;
    let per_s: Option<String> = r.get(6)?;
    let installment_amount = match per_s {
        Some(s) => Some(
            s.parse::<Decimal>()
                .with_context(|| format!("Invalid installment amount '{}' on {}", s, id))?,
        ),
        None => None,
    };
    let recurring: bool = r.get(7)?;
    let subtype: Option<String> = r.get(10)?;
    Ok(Transaction {
        id,
        description: r.get(1)?,
        amount_total,
        kind: kind_s.parse::<Kind>()?,
        date,
        installments: Installments::from_columns(count, recurring),
        installment_amount,
        category_id: r.get(8)?,
        category_name: r.get(9)?,
        income_subtype: subtype.and_then(|s| s.parse::<IncomeSubtype>().ok()),
        is_paid: r.get(11)?,
        notes: r.get(12)?,
    })
}

pub fn load_all(conn: &Connection) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(&format!("{} ORDER BY t.id", SELECT_TX))?;
    let mut rows = stmt.query([])?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        data.push(read_row(r)?);
    }
    Ok(data)
}

pub fn load_one(conn: &Connection, id: i64) -> Result<Option<Transaction>> {
    let mut stmt = conn.prepare(&format!("{} WHERE t.id=?1", SELECT_TX))?;
    let mut rows = stmt.query(params![id])?;
    match rows.next()? {
        Some(r) => Ok(Some(read_row(r)?)),
        None => Ok(None),
    }
}

/// Rows with a given income subtype, for the separate salary / manual income lists.
pub fn load_by_subtype(conn: &Connection, subtype: IncomeSubtype) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(&format!("{} WHERE t.income_subtype=?1", SELECT_TX))?;
    let mut rows = stmt.query(params![subtype.as_str()])?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        data.push(read_row(r)?);
    }
    Ok(data)
}
