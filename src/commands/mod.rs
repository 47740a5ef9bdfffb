// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod assets;
pub mod cache;
pub mod doctor;
pub mod exporter;
pub mod interests;
pub mod league;
pub mod messages;
pub mod notify;
pub mod proposals;
pub mod session;
pub mod trades;

use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;

use crate::catalog::{AssetCatalog, LoadReport};
use crate::config::AppConfig;
use crate::ledger::parse_ledger;
use crate::models::{Asset, Session, Trade};
use crate::sheets::{CachedSheets, Rows, SheetCache, SheetSource, source_from_config};

/// Fetch a range through the configured source and the sheet cache.
pub fn fetch_range(conn: &Connection, cfg: &AppConfig, range: &str) -> Result<Rows> {
    let source = source_from_config(&cfg.sheets)?;
    let cached = CachedSheets::new(
        source.as_ref(),
        SheetCache::new(conn, cfg.sheets.cache_ttl_secs),
    );
    let rows = cached
        .fetch(range)
        .with_context(|| format!("Failed to load sheet range '{}'", range))?;
    Ok(rows)
}

pub fn load_catalog(conn: &Connection, cfg: &AppConfig) -> Result<(AssetCatalog, LoadReport)> {
    let rows = fetch_range(conn, cfg, &cfg.sheets.roster_range)?;
    Ok(AssetCatalog::from_rows(&rows))
}

pub fn load_ledger(conn: &Connection, cfg: &AppConfig) -> Result<Vec<Trade>> {
    let rows = fetch_range(conn, cfg, &cfg.sheets.trades_range)?;
    Ok(parse_ledger(&rows))
}

pub fn require_session(conn: &Connection) -> Result<Session> {
    crate::session::current(conn)?
        .ok_or_else(|| anyhow!("Not signed in; run `tradeblock login` first"))
}

pub fn require_team(session: &Session) -> Result<String> {
    session
        .team
        .clone()
        .ok_or_else(|| anyhow!("No team for {}; run `tradeblock login --team <name>`", session.email))
}

/// Look up an asset by id, or by name (optionally within `team`).
pub fn resolve_asset<'a>(
    catalog: &'a AssetCatalog,
    team: Option<&str>,
    key: &str,
) -> Result<&'a Asset> {
    let key = key.trim();
    if let Some(team) = team {
        return catalog
            .resolve(team, key)
            .ok_or_else(|| anyhow!("Asset '{}' not found on team '{}'", key, team));
    }
    if let Some(a) = catalog.get(key) {
        return Ok(a);
    }
    let named: Vec<&Asset> = catalog
        .all()
        .iter()
        .filter(|a| a.name.eq_ignore_ascii_case(key))
        .collect();
    match named.as_slice() {
        [one] => Ok(*one),
        [] => Err(anyhow!("Asset '{}' not found", key)),
        many => Err(anyhow!(
            "Asset name '{}' is on {} teams; pass --team",
            key,
            many.len()
        )),
    }
}
