// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, params};
use thiserror::Error;
use tracing::{debug, info};

use crate::catalog::AssetCatalog;
use crate::models::{Asset, PlayerInterest, Session};

#[derive(Debug, Error)]
pub enum InterestError {
    #[error("no user is signed in")]
    NotAuthenticated,

    #[error("interest store error: {0}")]
    Store(#[from] rusqlite::Error),
}

/// Every interest marker a user has left, oldest first.
pub fn records(conn: &Connection, user_id: &str) -> Result<Vec<PlayerInterest>, InterestError> {
    let mut stmt = conn.prepare(
        "SELECT user_id, asset_id, created_at FROM interests WHERE user_id=?1 ORDER BY id",
    )?;
    let rows = stmt.query_map(params![user_id], |r| {
        Ok(PlayerInterest {
            user_id: r.get(0)?,
            asset_id: r.get(1)?,
            created_at: r.get(2)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Idempotent: a second mark for the same (user, asset) is a no-op.
pub fn mark(conn: &Connection, user_id: &str, asset_id: &str) -> Result<(), InterestError> {
    conn.execute(
        "INSERT OR IGNORE INTO interests(user_id, asset_id) VALUES (?1, ?2)",
        params![user_id, asset_id],
    )?;
    Ok(())
}

/// Removes every marker for (user, asset); returns how many went.
pub fn unmark(conn: &Connection, user_id: &str, asset_id: &str) -> Result<usize, InterestError> {
    let n = conn.execute(
        "DELETE FROM interests WHERE user_id=?1 AND asset_id=?2",
        params![user_id, asset_id],
    )?;
    Ok(n)
}

/// A user's interest markers resolved against the loaded catalog.
#[derive(Debug, Clone, Default)]
pub struct InterestTracker {
    tracked: Vec<Asset>,
}

impl InterestTracker {
    /// Markers whose asset is missing from `catalog` are left out.
    pub fn load(
        conn: &Connection,
        catalog: &AssetCatalog,
        user_id: &str,
    ) -> Result<Self, InterestError> {
        let recs = records(conn, user_id)?;
        let total = recs.len();
        let mut tracked: Vec<Asset> = Vec::with_capacity(total);
        for rec in recs {
            if let Some(asset) = catalog.get(&rec.asset_id) {
                if !tracked.iter().any(|a| a.asset_id() == rec.asset_id) {
                    tracked.push(asset.clone());
                }
            }
        }
        if tracked.len() < total {
            debug!(user_id, dropped = total - tracked.len(), "interests not in catalog");
        }
        Ok(Self { tracked })
    }

    pub fn assets(&self) -> &[Asset] {
        &self.tracked
    }

    pub fn contains(&self, asset: &Asset) -> bool {
        let id = asset.asset_id();
        self.tracked.iter().any(|a| a.asset_id() == id)
    }

    /// Flip interest in `asset`; returns whether the user is interested afterwards.
    ///
    /// Fails without touching local or stored state when nobody is signed in.
    pub fn toggle(
        &mut self,
        conn: &Connection,
        asset: &Asset,
        session: Option<&Session>,
    ) -> Result<bool, InterestError> {
        let session = session.ok_or(InterestError::NotAuthenticated)?;
        let id = asset.asset_id();
        if self.contains(asset) {
            unmark(conn, &session.user_id, &id)?;
            self.tracked.retain(|a| a.asset_id() != id);
            info!(user_id = %session.user_id, asset_id = %id, "interest removed");
            Ok(false)
        } else {
            mark(conn, &session.user_id, &id)?;
            self.tracked.push(asset.clone());
            info!(user_id = %session.user_id, asset_id = %id, "interest added");
            Ok(true)
        }
    }
}
