// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::trend::MAX_TREND_MONTHS;
use crate::utils::{
    SETTING_KEYS, SETTING_PAGE_SIZE, get_setting, page_size, pretty_table, set_setting,
    trend_window,
};
use anyhow::{Result, bail};
use rusqlite::Connection;
use tracing::info;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("key").unwrap().trim();
            let value = sub.get_one::<String>("value").unwrap().trim();
            set(conn, key, value)?;
            println!("Set {} = {}", key, value);
        }
        Some(("get", sub)) => {
            let key = sub.get_one::<String>("key").unwrap().trim();
            match get_setting(conn, key)? {
                Some(v) => println!("{}", v),
                None => println!("{} is not set", key),
            }
        }
        Some(("list", _)) => {
            let w = trend_window(conn)?;
            let rows = vec![
                vec!["trend_before".into(), w.before.to_string()],
                vec!["trend_after".into(), w.after.to_string()],
                vec!["page_size".into(), page_size(conn)?.to_string()],
            ];
            println!("{}", pretty_table(&["Setting", "Effective value"], rows));
        }
        _ => {}
    }
    Ok(())
}

/// Store a setting after checking the key is known and the value is a count.
pub fn set(conn: &Connection, key: &str, value: &str) -> Result<()> {
    if !SETTING_KEYS.contains(&key) {
        bail!("Unknown setting '{}' (use {})", key, SETTING_KEYS.join("|"));
    }
    let n = match value.parse::<u32>() {
        Ok(n) => n,
        Err(_) => bail!("Invalid value '{}' for {}, expected a non-negative integer", value, key),
    };
    if key != SETTING_PAGE_SIZE && n > MAX_TREND_MONTHS {
        bail!("{} must be at most {} months, got {}", key, MAX_TREND_MONTHS, n);
    }
    set_setting(conn, key, value)?;
    info!(key, value, "setting stored");
    Ok(())
}
