// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{load_catalog, load_ledger};
use crate::config::AppConfig;
use crate::ledger::group_by_year;
use crate::sheets::SheetCache;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, cfg: &AppConfig, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("clear", sub)) => {
            let cache = SheetCache::new(conn, cfg.sheets.cache_ttl_secs);
            match sub.get_one::<String>("range").map(|s| s.trim()) {
                Some(range) => {
                    if cache.invalidate(range)? {
                        println!("Cleared cached range '{}'", range);
                    } else {
                        println!("Range '{}' was not cached", range);
                    }
                }
                None => {
                    let n = cache.clear()?;
                    println!("Cleared {} cached range(s)", n);
                }
            }
        }
        _ => {}
    }
    Ok(())
}

/// Forced reload: drop the cache, then fetch the master list and the ledger.
pub fn sync(conn: &Connection, cfg: &AppConfig) -> Result<()> {
    SheetCache::new(conn, cfg.sheets.cache_ttl_secs).clear()?;
    let (catalog, report) = load_catalog(conn, cfg)?;
    let trades = load_ledger(conn, cfg)?;
    let groups = group_by_year(&trades);

    println!(
        "Loaded {} assets across {} teams ({} short rows skipped)",
        report.loaded,
        catalog.teams().len(),
        report.skipped
    );
    if !report.duplicate_ids.is_empty() {
        println!(
            "Warning: {} asset id(s) appear on more than one row: {}",
            report.duplicate_ids.len(),
            report.duplicate_ids.join(", ")
        );
    }
    println!(
        "Loaded {} trades in {} year(s) ({} with unreadable dates)",
        trades.len(),
        groups.years.len(),
        groups.skipped
    );
    Ok(())
}
