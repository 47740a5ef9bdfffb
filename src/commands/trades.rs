// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::load_ledger;
use crate::config::AppConfig;
use crate::ledger::{YearView, group_by_year, ordered};
use crate::models::Trade;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, cfg: &AppConfig, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("history", sub)) => history(conn, cfg, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
pub struct YearHistory {
    pub year: String,
    pub trades: Vec<Trade>,
}

/// Each requested year, with the current season newest-first and older seasons oldest-first.
pub fn year_histories(
    trades: &[Trade],
    season_key: &str,
    only: Option<&str>,
) -> Result<(Vec<YearHistory>, usize)> {
    let groups = group_by_year(trades);
    let keys: Vec<&str> = match only {
        Some(y) if groups.years.contains_key(y) => vec![y],
        Some(y) => return Err(anyhow!("No trades recorded for year '{}'", y)),
        None => groups.keys_desc(),
    };
    let out = keys
        .into_iter()
        .map(|k| {
            let view = if k == season_key {
                YearView::Current
            } else {
                YearView::Historical
            };
            YearHistory {
                year: k.to_string(),
                trades: ordered(&groups.years[k], view),
            }
        })
        .collect();
    Ok((out, groups.skipped))
}

fn history(conn: &Connection, cfg: &AppConfig, sub: &clap::ArgMatches) -> Result<()> {
    let trades = load_ledger(conn, cfg)?;
    let only = sub.get_one::<String>("year").map(|s| s.trim());
    let (years, skipped) = year_histories(&trades, &cfg.league.season_key(), only)?;

    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &years)? {
        return Ok(());
    }
    for y in years {
        println!("20{} ({} trades)", y.year, y.trades.len());
        let rows = y
            .trades
            .into_iter()
            .map(|t| {
                vec![
                    t.date,
                    t.team1.clone(),
                    t.team1_receives.join(", "),
                    t.team2.clone(),
                    t.team2_receives.join(", "),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Team 1", "Team 1 receives", "Team 2", "Team 2 receives"],
                rows
            )
        );
    }
    if skipped > 0 {
        println!("{} trade(s) skipped: date is not M/D/YY", skipped);
    }
    Ok(())
}
