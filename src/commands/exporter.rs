// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::load_catalog;
use crate::config::AppConfig;
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use serde_json::json;

pub fn export_assets(conn: &Connection, cfg: &AppConfig, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().trim().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap().trim();
    if fmt != "csv" && fmt != "json" {
        return Err(anyhow!("Unknown format: {} (use csv|json)", fmt));
    }

    let (catalog, _) = load_catalog(conn, cfg)?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "asset_id",
                "team",
                "position",
                "name",
                "price_2025",
                "price_2026",
                "price_2027",
                "original_price",
                "acquisition_year",
                "contract_year",
                "pool",
                "rookie_round",
                "draft_year",
                "is_pick",
                "trade_history",
            ])?;
            for a in catalog.all() {
                wtr.write_record([
                    a.asset_id(),
                    a.team.clone(),
                    a.position.clone(),
                    a.name.clone(),
                    a.price_2025.clone(),
                    a.price_2026.clone(),
                    a.price_2027.clone(),
                    a.original_price.clone(),
                    a.acquisition_year.to_string(),
                    a.contract_year.clone(),
                    a.pool.clone(),
                    a.rookie_round.clone(),
                    a.draft_year.clone(),
                    a.is_pick().to_string(),
                    a.trade_history.clone(),
                ])?;
            }
            wtr.flush()?;
        }
        _ => {
            let mut items = Vec::new();
            for a in catalog.all() {
                let detail = if a.is_pick() {
                    serde_json::to_value(a.to_draft_pick())?
                } else {
                    serde_json::to_value(a.to_roster_player())?
                };
                items.push(json!({
                    "asset_id": a.asset_id(), "kind": if a.is_pick() { "pick" } else { "player" }, "detail": detail
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
    }
    println!("Exported {} assets to {}", catalog.len(), out);
    Ok(())
}
