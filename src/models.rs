// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

/// A rostered player or an unresolved draft pick, as read from the master list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub team: String,
    pub position: String,
    pub name: String,
    pub price_2025: String,
    pub price_2026: String,
    pub price_2027: String,
    pub original_price: String,
    pub acquisition_year: i32,
    pub contract_year: String,
    pub pool: String,
    pub rookie_round: String,
    pub draft_year: String,
    pub trade_history: String,
}

impl Asset {
    /// Team and name concatenated. Two identically named assets on one team collide.
    pub fn asset_id(&self) -> String {
        format!("{}{}", self.team, self.name)
    }

    pub fn is_pick(&self) -> bool {
        has_value(&self.rookie_round) || has_value(&self.draft_year)
    }

    pub fn to_roster_player(&self) -> RosterPlayer {
        RosterPlayer {
            team: self.team.clone(),
            position: self.position.clone(),
            name: self.name.clone(),
            price_2025: self.price_2025.clone(),
            price_2026: self.price_2026.clone(),
            price_2027: self.price_2027.clone(),
            original_price: self.original_price.clone(),
            acquisition_year: self.acquisition_year,
            contract_year: self.contract_year.clone(),
            pool: self.pool.clone(),
            trade_history: self.trade_history.clone(),
        }
    }

    pub fn to_draft_pick(&self) -> DraftPick {
        DraftPick {
            team: self.team.clone(),
            name: self.name.clone(),
            round: self.rookie_round.clone(),
            draft_year: self.draft_year.clone(),
            price_2025: self.price_2025.clone(),
            trade_history: self.trade_history.clone(),
        }
    }
}

// Sheets hands back a lone space for cells someone cleared by hand.
fn has_value(cell: &str) -> bool {
    !cell.trim().is_empty()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterPlayer {
    pub team: String,
    pub position: String,
    pub name: String,
    pub price_2025: String,
    pub price_2026: String,
    pub price_2027: String,
    pub original_price: String,
    pub acquisition_year: i32,
    pub contract_year: String,
    pub pool: String,
    pub trade_history: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftPick {
    pub team: String,
    pub name: String,
    pub round: String,
    pub draft_year: String,
    pub price_2025: String,
    pub trade_history: String,
}

/// One historical transaction block from the trades ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub date: String, // M/D/YY, unvalidated
    pub team1: String,
    pub team2: String,
    pub team1_receives: Vec<String>,
    pub team2_receives: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ProposalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalStatus::Pending => "pending",
            ProposalStatus::Accepted => "accepted",
            ProposalStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ProposalStatus::Pending)
    }
}

impl fmt::Display for ProposalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProposalStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ProposalStatus::Pending),
            "accepted" => Ok(ProposalStatus::Accepted),
            "rejected" => Ok(ProposalStatus::Rejected),
            other => Err(anyhow!("Unknown proposal status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalResponse {
    Yes,
    No,
    Maybe,
}

impl ProposalResponse {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProposalResponse::Yes => "yes",
            ProposalResponse::No => "no",
            ProposalResponse::Maybe => "maybe",
        }
    }

    /// Status a pending proposal moves to when this answer arrives.
    pub fn target_status(&self) -> ProposalStatus {
        match self {
            ProposalResponse::Yes => ProposalStatus::Accepted,
            ProposalResponse::No => ProposalStatus::Rejected,
            ProposalResponse::Maybe => ProposalStatus::Pending,
        }
    }
}

impl fmt::Display for ProposalResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProposalResponse {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yes" => Ok(ProposalResponse::Yes),
            "no" => Ok(ProposalResponse::No),
            "maybe" => Ok(ProposalResponse::Maybe),
            other => Err(anyhow!("Unknown response '{}', expected yes|no|maybe", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeProposal {
    pub id: i64,
    pub proposer: String,
    pub recipient: String,
    pub offered: BTreeSet<String>,
    pub requested: BTreeSet<String>,
    pub status: ProposalStatus,
    pub response: Option<ProposalResponse>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInterest {
    pub user_id: String,
    pub asset_id: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub user_id: String,
    pub team: String,
    pub body: String,
    pub created_at: String,
}

/// The signed-in league member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub email: String,
    pub team: Option<String>,
}
