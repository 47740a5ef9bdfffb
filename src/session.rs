// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Signed-in user, as handed over by the identity provider.

use anyhow::{Result, anyhow};
use rusqlite::Connection;
use tracing::info;

use crate::config::LeagueConfig;
use crate::models::Session;
use crate::utils::{clear_setting, get_setting, set_setting};

const USER_KEY: &str = "session_user";
const EMAIL_KEY: &str = "session_email";
const TEAM_KEY: &str = "session_team";

/// League team matching the part of `email` before the `@`, ignoring case.
pub fn default_team(league: &LeagueConfig, email: &str) -> Option<String> {
    let prefix = email.split('@').next().unwrap_or("").trim();
    if prefix.is_empty() {
        return None;
    }
    league.team(prefix).map(|t| t.name.clone())
}

pub fn login(
    conn: &Connection,
    league: &LeagueConfig,
    user_id: &str,
    email: &str,
    team: Option<&str>,
) -> Result<Session> {
    let user_id = user_id.trim();
    let email = email.trim();
    if user_id.is_empty() {
        return Err(anyhow!("User id must not be empty"));
    }

    let team = match team.map(str::trim).filter(|t| !t.is_empty()) {
        Some(t) if league.teams.is_empty() => Some(t.to_string()),
        Some(t) => Some(
            league
                .team(t)
                .map(|tc| tc.name.clone())
                .ok_or_else(|| anyhow!("Team '{}' is not in the league", t))?,
        ),
        None => default_team(league, email),
    };

    set_setting(conn, USER_KEY, user_id)?;
    set_setting(conn, EMAIL_KEY, email)?;
    match &team {
        Some(t) => set_setting(conn, TEAM_KEY, t)?,
        None => clear_setting(conn, TEAM_KEY)?,
    }
    info!(user_id, team = team.as_deref().unwrap_or(""), "signed in");
    Ok(Session {
        user_id: user_id.to_string(),
        email: email.to_string(),
        team,
    })
}

pub fn logout(conn: &Connection) -> Result<()> {
    for key in [USER_KEY, EMAIL_KEY, TEAM_KEY] {
        clear_setting(conn, key)?;
    }
    info!("signed out");
    Ok(())
}

pub fn current(conn: &Connection) -> Result<Option<Session>> {
    let Some(user_id) = get_setting(conn, USER_KEY)? else {
        return Ok(None);
    };
    Ok(Some(Session {
        user_id,
        email: get_setting(conn, EMAIL_KEY)?.unwrap_or_default(),
        team: get_setting(conn, TEAM_KEY)?,
    }))
}
