// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::catalog::AssetCatalog;
use crate::commands::{load_catalog, load_ledger};
use crate::config::AppConfig;
use crate::ledger::year_key;
use crate::proposals::referenced_asset_ids;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, cfg: &AppConfig) -> Result<()> {
    let (catalog, report) = load_catalog(conn, cfg)?;
    let trades = load_ledger(conn, cfg)?;
    let mut rows = Vec::new();

    // 1) Master-list rows that could not be read
    if report.skipped > 0 {
        rows.push(vec!["short_row".into(), format!("{} row(s)", report.skipped)]);
    }

    // 2) Asset ids that collide (team + name)
    for id in &report.duplicate_ids {
        rows.push(vec!["duplicate_asset_id".into(), id.clone()]);
    }

    // 3) Teams on the sheet missing from the league config
    if !cfg.league.teams.is_empty() {
        for team in catalog.teams() {
            if cfg.league.team(team).is_none() {
                rows.push(vec!["unknown_team".into(), team.to_string()]);
            }
        }
    }

    rows.extend(orphaned_interests(conn, &catalog)?);

    // 5) Pending proposals naming assets that have left the sheet
    for id in referenced_asset_ids(conn)? {
        if catalog.get(&id).is_none() {
            rows.push(vec!["proposal_missing_asset".into(), id]);
        }
    }

    // 6) Ledger dates without a year; these never show up in history
    for t in &trades {
        if year_key(&t.date).is_none() {
            rows.push(vec![
                "undated_trade".into(),
                format!("'{}' {} / {}", t.date, t.team1, t.team2),
            ]);
        }
    }

    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

// 4) Interest markers pointing at assets no longer in the catalog
fn orphaned_interests(conn: &Connection, catalog: &AssetCatalog) -> Result<Vec<Vec<String>>> {
    let mut stmt = conn.prepare("SELECT DISTINCT user_id, asset_id FROM interests ORDER BY user_id, asset_id")?;
    let mut cur = stmt.query([])?;
    let mut rows = Vec::new();
    while let Some(r) = cur.next()? {
        let user: String = r.get(0)?;
        let asset: String = r.get(1)?;
        if catalog.get(&asset).is_none() {
            rows.push(vec!["orphaned_interest".into(), format!("{} -> {}", user, asset)]);
        }
    }
    Ok(rows)
}
