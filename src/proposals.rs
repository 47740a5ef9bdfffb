// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Trade proposal lifecycle.
//!
//! ```text
//!            yes            no
//! accepted <----- pending -----> rejected
//!                  |  ^
//!                  +--+ maybe
//! ```
//!
//! `accepted` and `rejected` are terminal. Proposals are never deleted and
//! cannot be withdrawn once submitted.

use std::collections::BTreeSet;

use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;
use tracing::info;

use crate::models::{ProposalResponse, ProposalStatus, Session, TradeProposal};
use crate::notify::{Notifier, notify_team};

#[derive(Debug, Error)]
pub enum ProposalError {
    #[error("no user is signed in")]
    NotAuthenticated,

    #[error("a proposal must offer at least one asset")]
    EmptyOffer,

    #[error("a proposal must request at least one asset")]
    EmptyRequest,

    #[error("proposal {0} not found")]
    NotFound(i64),

    #[error("proposal {id} is already {status}")]
    AlreadyResolved { id: i64, status: ProposalStatus },

    #[error("proposal store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProposal {
    pub proposer: String,
    pub recipient: String,
    pub offered: BTreeSet<String>,
    pub requested: BTreeSet<String>,
}

/// Status after `response` arrives for a proposal currently in `current`.
pub fn transition(
    id: i64,
    current: ProposalStatus,
    response: ProposalResponse,
) -> Result<ProposalStatus, ProposalError> {
    if current.is_terminal() {
        return Err(ProposalError::AlreadyResolved {
            id,
            status: current,
        });
    }
    Ok(response.target_status())
}

/// Store a new pending proposal, then tell the recipient's devices.
///
/// Nothing is written unless a user is signed in and both asset sets are non-empty.
pub fn submit(
    conn: &Connection,
    notifier: &dyn Notifier,
    session: Option<&Session>,
    new: NewProposal,
) -> Result<TradeProposal, ProposalError> {
    session.ok_or(ProposalError::NotAuthenticated)?;
    if new.offered.is_empty() {
        return Err(ProposalError::EmptyOffer);
    }
    if new.requested.is_empty() {
        return Err(ProposalError::EmptyRequest);
    }

    conn.execute(
        "INSERT INTO proposals(proposer, recipient, offered, requested, status) VALUES (?1,?2,?3,?4,'pending')",
        params![
            new.proposer,
            new.recipient,
            serde_json::to_string(&new.offered)?,
            serde_json::to_string(&new.requested)?
        ],
    )?;
    let id = conn.last_insert_rowid();
    let proposal = get(conn, id)?.ok_or(ProposalError::NotFound(id))?;
    info!(id, proposer = %proposal.proposer, recipient = %proposal.recipient, "proposal submitted");

    notify_team(
        conn,
        notifier,
        &proposal.recipient,
        "New Trade Proposal",
        &format!("{} sent you a trade proposal", proposal.proposer),
    );
    Ok(proposal)
}

/// Record the recipient's answer, then tell the proposer's devices.
pub fn respond(
    conn: &Connection,
    notifier: &dyn Notifier,
    id: i64,
    response: ProposalResponse,
) -> Result<TradeProposal, ProposalError> {
    let current = get(conn, id)?.ok_or(ProposalError::NotFound(id))?;
    let next = transition(id, current.status, response)?;

    conn.execute(
        "UPDATE proposals SET status=?1, response=?2 WHERE id=?3",
        params![next.as_str(), response.as_str(), id],
    )?;
    info!(id, response = %response, status = %next, "proposal answered");

    let updated = TradeProposal {
        status: next,
        response: Some(response),
        ..current
    };
    notify_team(
        conn,
        notifier,
        &updated.proposer,
        "Trade Proposal Update",
        &format!(
            "{} answered '{}' to your trade proposal",
            updated.recipient, response
        ),
    );
    Ok(updated)
}

fn bad_column(idx: usize, e: anyhow::Error) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, e.into())
}

fn from_row(r: &rusqlite::Row<'_>) -> rusqlite::Result<(TradeProposal, String, String)> {
    let status: String = r.get(5)?;
    let response: Option<String> = r.get(6)?;
    Ok((
        TradeProposal {
            id: r.get(0)?,
            proposer: r.get(1)?,
            recipient: r.get(2)?,
            offered: BTreeSet::new(),
            requested: BTreeSet::new(),
            status: status
                .parse::<ProposalStatus>()
                .map_err(|e| bad_column(5, e))?,
            response: response
                .map(|s| s.parse::<ProposalResponse>())
                .transpose()
                .map_err(|e| bad_column(6, e))?,
            created_at: r.get(7)?,
        },
        r.get(3)?,
        r.get(4)?,
    ))
}

fn decode(
    (mut p, offered, requested): (TradeProposal, String, String),
) -> Result<TradeProposal, ProposalError> {
    p.offered = serde_json::from_str(&offered)?;
    p.requested = serde_json::from_str(&requested)?;
    Ok(p)
}

const SELECT: &str =
    "SELECT id, proposer, recipient, offered, requested, status, response, created_at FROM proposals";

pub fn get(conn: &Connection, id: i64) -> Result<Option<TradeProposal>, ProposalError> {
    let raw = conn
        .query_row(&format!("{SELECT} WHERE id=?1"), params![id], from_row)
        .optional()?;
    raw.map(decode).transpose()
}

/// Pending proposals addressed to `team`, oldest first.
pub fn pending_for(conn: &Connection, team: &str) -> Result<Vec<TradeProposal>, ProposalError> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT} WHERE recipient=?1 COLLATE NOCASE AND status='pending' ORDER BY id"
    ))?;
    let rows = stmt.query_map(params![team], from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(decode(row?)?);
    }
    Ok(out)
}

/// Asset ids named on either side of a pending proposal.
pub fn referenced_asset_ids(conn: &Connection) -> Result<BTreeSet<String>, ProposalError> {
    let mut stmt = conn.prepare("SELECT offered, requested FROM proposals WHERE status='pending'")?;
    let rows = stmt.query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?)))?;
    let mut out = BTreeSet::new();
    for row in rows {
        let (offered, requested) = row?;
        let o: BTreeSet<String> = serde_json::from_str(&offered)?;
        let q: BTreeSet<String> = serde_json::from_str(&requested)?;
        out.extend(o);
        out.extend(q);
    }
    Ok(out)
}
