// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Trades ledger: blocks of rows opened by a dated header row.
//!
//! ```text
//! 3/1/24 | Jared    | Bill      <- header: date, team1, team2
//!        | Player A | Pick B    <- team1 receives, team2 receives
//! ```

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::models::Trade;
use crate::utils::parse_ledger_date;

/// Only a truly empty cell continues a block; whitespace still opens a new one.
fn blank(cell: Option<&str>) -> bool {
    cell.map(str::is_empty).unwrap_or(true)
}

/// Segment ledger rows into trades, in sheet order.
pub fn parse_ledger<S: AsRef<str>>(rows: &[Vec<S>]) -> Vec<Trade> {
    let mut trades = Vec::new();
    let mut open: Option<Trade> = None;

    for (idx, row) in rows.iter().enumerate() {
        let cell = |i: usize| row.get(i).map(|c| c.as_ref());
        if !blank(cell(0)) {
            if let Some(done) = open.take() {
                trades.push(done);
            }
            open = Some(Trade {
                date: cell(0).unwrap_or_default().to_string(),
                team1: cell(1).unwrap_or_default().to_string(),
                team2: cell(2).unwrap_or_default().to_string(),
                team1_receives: Vec::new(),
                team2_receives: Vec::new(),
            });
            continue;
        }

        let Some(current) = open.as_mut() else {
            warn!(row = idx, "ledger row before any dated header, ignoring");
            continue;
        };
        if let Some(a) = cell(1).filter(|c| !c.is_empty()) {
            current.team1_receives.push(a.to_string());
        }
        if let Some(b) = cell(2).filter(|c| !c.is_empty()) {
            current.team2_receives.push(b.to_string());
        }
    }
    if let Some(done) = open.take() {
        trades.push(done);
    }
    debug!(trades = trades.len(), "ledger parsed");
    trades
}

/// Year key of a ledger date: the third `/`-separated component.
pub fn year_key(date: &str) -> Option<&str> {
    let parts: Vec<&str> = date.split('/').collect();
    if parts.len() == 3 { Some(parts[2]) } else { None }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct YearGroups {
    pub years: BTreeMap<String, Vec<Trade>>,
    /// Trades dropped because their date has no year component.
    pub skipped: usize,
}

impl YearGroups {
    /// Year keys, most recent first.
    pub fn keys_desc(&self) -> Vec<&str> {
        self.years.keys().rev().map(|k| k.as_str()).collect()
    }

    pub fn total(&self) -> usize {
        self.years.values().map(|v| v.len()).sum()
    }
}

pub fn group_by_year(trades: &[Trade]) -> YearGroups {
    let mut groups = YearGroups::default();
    for t in trades {
        match year_key(&t.date) {
            Some(y) => groups
                .years
                .entry(y.to_string())
                .or_default()
                .push(t.clone()),
            None => {
                groups.skipped += 1;
                warn!(date = %t.date, team1 = %t.team1, team2 = %t.team2, "trade date has no year, dropped from ledger");
            }
        }
    }
    groups
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum YearView {
    /// Newest first.
    Current,
    /// Oldest first.
    Historical,
}

/// Order one year's trades for display.
///
/// Trades whose date does not parse as `M/D/YY` go after every dated trade,
/// in their original relative order, for both views.
pub fn ordered(trades: &[Trade], view: YearView) -> Vec<Trade> {
    let mut keyed: Vec<(Option<chrono::NaiveDate>, &Trade)> =
        trades.iter().map(|t| (parse_ledger_date(&t.date), t)).collect();
    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => match view {
            YearView::Current => b.cmp(a),
            YearView::Historical => a.cmp(b),
        },
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
    keyed.into_iter().map(|(_, t)| t.clone()).collect()
}
