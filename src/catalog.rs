// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Master-list ingestion and the in-memory asset queries served on top of it.
//!
//! Column layout of a master-list row:
//!
//! | idx | field            | idx | field             |
//! |-----|------------------|-----|-------------------|
//! | 0   | team (trimmed)   | 7   | acquisition year  |
//! | 1   | position         | 8   | contract year     |
//! | 2   | name             | 9   | pool              |
//! | 3   | 2025 price       | 10  | rookie round      |
//! | 4   | 2026 price       | 11  | draft year        |
//! | 5   | 2027 price       | 12  | trade history     |
//! | 6   | original price   |     |                   |

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use tracing::{debug, warn};

use crate::models::Asset;
use crate::utils::price_key;

/// Minimum number of cells a master-list row needs (team, position, name).
pub const MIN_ROW_CELLS: usize = 3;

/// Team/position filter value that disables the filter.
pub const ALL: &str = "All";
/// Position filter value matching every draft pick.
pub const PICKS: &str = "Picks";

/// Build an [`Asset`] from one master-list row.
///
/// Returns `None` for rows shorter than [`MIN_ROW_CELLS`]; those are skipped by
/// [`AssetCatalog::load`]. Missing trailing cells default to empty strings,
/// except the 2025 price (`"$0"`) and the acquisition year (`0`).
pub fn parse_row<S: AsRef<str>>(row: &[S]) -> Option<Asset> {
    if row.len() < MIN_ROW_CELLS {
        return None;
    }
    let cell = |i: usize| row.get(i).map(|c| c.as_ref().to_string()).unwrap_or_default();

    Some(Asset {
        team: row[0].as_ref().trim().to_string(),
        position: cell(1),
        name: cell(2),
        price_2025: row
            .get(3)
            .map(|c| c.as_ref().to_string())
            .unwrap_or_else(|| "$0".to_string()),
        price_2026: cell(4),
        price_2027: cell(5),
        original_price: cell(6),
        acquisition_year: row
            .get(7)
            .and_then(|c| c.as_ref().parse::<i32>().ok())
            .unwrap_or(0),
        contract_year: cell(8),
        pool: cell(9),
        rookie_round: cell(10),
        draft_year: cell(11),
        trade_history: cell(12),
    })
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Highest,
    Lowest,
}

impl FromStr for SortOrder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "highest" => Ok(SortOrder::Highest),
            "lowest" => Ok(SortOrder::Lowest),
            other => Err(anyhow!("Unknown sort '{}', expected highest|lowest", other)),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Highest => f.write_str("Highest"),
            SortOrder::Lowest => f.write_str("Lowest"),
        }
    }
}

/// Outcome of a catalog load.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    /// Rows too short to parse.
    pub skipped: usize,
    /// Asset ids shared by more than one row.
    pub duplicate_ids: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    pub teams: BTreeSet<String>,
    pub positions: BTreeSet<String>,
    pub sort: SortOrder,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            text: String::new(),
            teams: BTreeSet::from([ALL.to_string()]),
            positions: BTreeSet::from([ALL.to_string()]),
            sort: SortOrder::Highest,
        }
    }
}

fn is_all(set: &BTreeSet<String>) -> bool {
    set.len() == 1 && set.contains(ALL)
}

/// The current season's assets, in sheet order.
#[derive(Clone, Debug, Default)]
pub struct AssetCatalog {
    assets: Vec<Asset>,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows<S: AsRef<str>>(rows: &[Vec<S>]) -> (Self, LoadReport) {
        let mut catalog = Self::new();
        let report = catalog.load(rows);
        (catalog, report)
    }

    /// Replace the whole catalog with the parsed rows.
    pub fn load<S: AsRef<str>>(&mut self, rows: &[Vec<S>]) -> LoadReport {
        let mut assets = Vec::with_capacity(rows.len());
        let mut skipped = 0usize;
        for (idx, row) in rows.iter().enumerate() {
            match parse_row(row) {
                Some(asset) => assets.push(asset),
                None => {
                    skipped += 1;
                    warn!(row = idx, cells = row.len(), "skipping short master-list row");
                }
            }
        }

        let mut seen: HashMap<String, usize> = HashMap::with_capacity(assets.len());
        for a in &assets {
            *seen.entry(a.asset_id()).or_default() += 1;
        }
        let mut duplicate_ids: Vec<String> = seen
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(id, _)| id)
            .collect();
        duplicate_ids.sort();
        for id in &duplicate_ids {
            warn!(asset_id = %id, "asset id shared by several rows");
        }

        self.assets = assets;
        debug!(loaded = self.assets.len(), skipped, "catalog loaded");
        LoadReport {
            loaded: self.assets.len(),
            skipped,
            duplicate_ids,
        }
    }

    pub fn all(&self) -> &[Asset] {
        &self.assets
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// First asset carrying this id.
    pub fn get(&self, asset_id: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.asset_id() == asset_id)
    }

    /// Resolve an id, or a plain name owned by `team`.
    pub fn resolve(&self, team: &str, id_or_name: &str) -> Option<&Asset> {
        let key = id_or_name.trim();
        self.get(key).or_else(|| {
            self.assets
                .iter()
                .find(|a| a.team.eq_ignore_ascii_case(team.trim()) && a.name.eq_ignore_ascii_case(key))
        })
    }

    pub fn filter_by_team(&self, name: &str) -> Vec<&Asset> {
        let needle = name.to_lowercase();
        self.assets
            .iter()
            .filter(|a| a.team.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn search(&self, q: &SearchQuery) -> Vec<&Asset> {
        let needle = q.text.to_lowercase();
        let any_team = is_all(&q.teams);
        let any_position = is_all(&q.positions);

        let mut out: Vec<&Asset> = self
            .assets
            .iter()
            .filter(|a| needle.is_empty() || a.name.to_lowercase().contains(&needle))
            .filter(|a| any_team || q.teams.contains(&a.team))
            .filter(|a| {
                any_position
                    || q.positions.contains(&a.position)
                    || (a.is_pick() && q.positions.contains(PICKS))
            })
            .collect();

        // sort_by_key is stable, equal prices keep sheet order
        match q.sort {
            SortOrder::Highest => {
                out.sort_by_key(|a| std::cmp::Reverse(price_key(&a.price_2025)))
            }
            SortOrder::Lowest => out.sort_by_key(|a| price_key(&a.price_2025)),
        }
        out
    }

    /// Distinct team names in first-seen order.
    pub fn teams(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for a in &self.assets {
            if !out.contains(&a.team.as_str()) {
                out.push(a.team.as_str());
            }
        }
        out
    }
}
