// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::LedgerError;
use crate::models::Category;
use crate::utils::{id_for_category, maybe_print_json, pretty_table};
use anyhow::Result;
use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::info;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let id = add(conn, name)?;
            println!("Added category '{}' (id {})", name.trim(), id);
        }
        Some(("list", sub)) => {
            let data = list_categories(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .into_iter()
                    .map(|c| vec![c.id.to_string(), c.name])
                    .collect();
                println!("{}", pretty_table(&["Id", "Category"], rows));
            }
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let cleared = remove(conn, name)?;
            println!(
                "Removed category '{}' ({} transactions uncategorized)",
                name.trim(),
                cleared
            );
        }
        _ => {}
    }
    Ok(())
}

pub fn add(conn: &Connection, name: &str) -> Result<i64> {
    let name = name.trim();
    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM categories WHERE name=?1",
            params![name],
            |r| r.get(0),
        )
        .optional()?;
    if existing.is_some() {
        return Err(LedgerError::DuplicateCategory(name.to_string()).into());
    }
    conn.execute("INSERT INTO categories(name) VALUES (?1)", params![name])?;
    let id = conn.last_insert_rowid();
    info!(id, name, "category added");
    Ok(id)
}

/// Delete a category, leaving its transactions in place without a category.
/// Returns how many transactions were cleared.
pub fn remove(conn: &Connection, name: &str) -> Result<usize> {
    let id = id_for_category(conn, name)?;
    let tx = conn.unchecked_transaction()?;
    let cleared = tx.execute(
        "UPDATE transactions SET category_id=NULL WHERE category_id=?1",
        params![id],
    )?;
    tx.execute("DELETE FROM categories WHERE id=?1", params![id])?;
    tx.commit()?;
    info!(id, cleared, "category removed");
    Ok(cleared)
}

pub fn list_categories(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare("SELECT id, name, created_at FROM categories ORDER BY name")?;
    let mut rows = stmt.query([])?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let created: Option<String> = r.get(2)?;
        data.push(Category {
            id: r.get(0)?,
            name: r.get(1)?,
            created_at: created
                .and_then(|s| NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S").ok()),
        });
    }
    Ok(data)
}
