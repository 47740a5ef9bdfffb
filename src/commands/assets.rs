// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::catalog::{ALL, SearchQuery, SortOrder};
use crate::commands::{exporter, load_catalog};
use crate::config::AppConfig;
use crate::models::Asset;
use crate::utils::{maybe_print_json, pretty_table, split_list};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;
use std::collections::BTreeSet;

pub fn handle(conn: &Connection, cfg: &AppConfig, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(conn, cfg, sub)?,
        Some(("team", sub)) => team(conn, cfg, sub)?,
        Some(("export", sub)) => exporter::export_assets(conn, cfg, sub)?,
        _ => {}
    }
    Ok(())
}

fn multi(sub: &clap::ArgMatches, id: &str) -> BTreeSet<String> {
    let set: BTreeSet<String> = sub
        .get_many::<String>(id)
        .map(|vals| vals.flat_map(|v| split_list(v)).collect())
        .unwrap_or_default();
    if set.is_empty() {
        BTreeSet::from([ALL.to_string()])
    } else {
        set
    }
}

pub fn query_from_args(sub: &clap::ArgMatches) -> Result<SearchQuery> {
    let sort = sub
        .get_one::<String>("sort")
        .map(|s| s.parse::<SortOrder>())
        .transpose()?
        .unwrap_or_default();
    Ok(SearchQuery {
        text: sub
            .get_one::<String>("search")
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
        teams: multi(sub, "team"),
        positions: multi(sub, "position"),
        sort,
    })
}

#[derive(Serialize)]
pub struct AssetRow {
    pub asset_id: String,
    pub team: String,
    pub position: String,
    pub name: String,
    pub kind: &'static str,
    pub price_2025: String,
    pub price_2026: String,
    pub price_2027: String,
    pub contract_year: String,
}

impl From<&Asset> for AssetRow {
    fn from(a: &Asset) -> Self {
        Self {
            asset_id: a.asset_id(),
            team: a.team.clone(),
            position: a.position.clone(),
            name: a.name.clone(),
            kind: if a.is_pick() { "pick" } else { "player" },
            price_2025: a.price_2025.clone(),
            price_2026: a.price_2026.clone(),
            price_2027: a.price_2027.clone(),
            contract_year: a.contract_year.clone(),
        }
    }
}

fn print_assets(sub: &clap::ArgMatches, assets: &[&Asset]) -> Result<()> {
    let data: Vec<AssetRow> = assets.iter().map(|a| AssetRow::from(*a)).collect();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        return Ok(());
    }
    let rows = data
        .into_iter()
        .map(|r| {
            vec![
                r.team,
                r.position,
                r.name,
                r.kind.to_string(),
                r.price_2025,
                r.price_2026,
                r.price_2027,
                r.contract_year,
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Team", "Pos", "Name", "Kind", "2025", "2026", "2027", "Contract"],
            rows
        )
    );
    Ok(())
}

fn list(conn: &Connection, cfg: &AppConfig, sub: &clap::ArgMatches) -> Result<()> {
    let query = query_from_args(sub)?;
    let (catalog, _) = load_catalog(conn, cfg)?;
    let found = catalog.search(&query);
    print_assets(sub, &found)
}

fn team(conn: &Connection, cfg: &AppConfig, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let (catalog, _) = load_catalog(conn, cfg)?;
    let found = catalog.filter_by_team(name);
    print_assets(sub, &found)
}
