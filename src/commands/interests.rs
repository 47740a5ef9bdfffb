// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::assets::AssetRow;
use crate::commands::{load_catalog, require_session, resolve_asset};
use crate::config::AppConfig;
use crate::interests::{InterestError, InterestTracker};
use crate::session;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, cfg: &AppConfig, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(conn, cfg, sub)?,
        Some(("toggle", sub)) => toggle(conn, cfg, sub)?,
        _ => {}
    }
    Ok(())
}

fn list(conn: &Connection, cfg: &AppConfig, sub: &clap::ArgMatches) -> Result<()> {
    let s = require_session(conn)?;
    let (catalog, _) = load_catalog(conn, cfg)?;
    let tracker = InterestTracker::load(conn, &catalog, &s.user_id)?;
    let data: Vec<AssetRow> = tracker.assets().iter().map(AssetRow::from).collect();
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .into_iter()
            .map(|r| vec![r.team, r.position, r.name, r.kind.to_string(), r.price_2025])
            .collect();
        println!(
            "{}",
            pretty_table(&["Team", "Pos", "Name", "Kind", "2025"], rows)
        );
    }
    Ok(())
}

fn toggle(conn: &Connection, cfg: &AppConfig, sub: &clap::ArgMatches) -> Result<()> {
    let key = sub.get_one::<String>("asset").unwrap();
    let team = sub.get_one::<String>("team").map(|s| s.trim());

    let current = session::current(conn)?;
    let Some(s) = current.as_ref() else {
        return Err(InterestError::NotAuthenticated.into());
    };
    let (catalog, _) = load_catalog(conn, cfg)?;
    let asset = resolve_asset(&catalog, team, key)?;

    let mut tracker = InterestTracker::load(conn, &catalog, &s.user_id)?;
    if tracker.toggle(conn, asset, Some(s))? {
        println!("Interested in {} ({})", asset.name, asset.team);
    } else {
        println!("No longer interested in {} ({})", asset.name, asset.team);
    }
    Ok(())
}
