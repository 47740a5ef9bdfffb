// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Push notifications for trade events.
//!
//! Clients cannot push to one another directly, so deliveries go through a
//! server-side relay. Delivery is best-effort: failures are logged and dropped.

use rusqlite::{Connection, params};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::NotificationsConfig;
use crate::utils::http_client;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("relay returned {status}: {body}")]
    Relay {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("token lookup failed: {0}")]
    Store(#[from] rusqlite::Error),
}

pub trait Notifier {
    fn send(&self, token: &str, title: &str, body: &str) -> Result<(), NotifyError>;
}

#[derive(Serialize)]
struct RelayPayload<'a> {
    token: &'a str,
    title: &'a str,
    body: &'a str,
}

pub struct RelayNotifier {
    http: reqwest::blocking::Client,
    url: String,
}

impl RelayNotifier {
    pub fn new(url: &str, timeout_secs: u64) -> anyhow::Result<Self> {
        Ok(Self {
            http: http_client(timeout_secs)?,
            url: url.trim().to_string(),
        })
    }
}

impl Notifier for RelayNotifier {
    fn send(&self, token: &str, title: &str, body: &str) -> Result<(), NotifyError> {
        let resp = self
            .http
            .post(&self.url)
            .json(&RelayPayload { token, title, body })
            .send()?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().unwrap_or_default();
            return Err(NotifyError::Relay { status, body });
        }
        Ok(())
    }
}

/// Used when no relay is configured.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send(&self, token: &str, title: &str, body: &str) -> Result<(), NotifyError> {
        info!(target: "notify", token, title, body, "notification (no relay configured)");
        Ok(())
    }
}

pub fn notifier_from_config(cfg: &NotificationsConfig, timeout_secs: u64) -> Box<dyn Notifier> {
    match cfg.relay_url.as_deref().filter(|u| !u.trim().is_empty()) {
        Some(url) => match RelayNotifier::new(url, timeout_secs) {
            Ok(n) => Box::new(n),
            Err(e) => {
                warn!(error = %e, "relay notifier unavailable, logging notifications instead");
                Box::new(LogNotifier)
            }
        },
        None => Box::new(LogNotifier),
    }
}

pub fn register_token(conn: &Connection, token: &str, team: &str, user_id: &str) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO device_tokens(token, team, user_id) VALUES (?1, ?2, ?3)
         ON CONFLICT(token) DO UPDATE SET team=excluded.team, user_id=excluded.user_id",
        params![token, team, user_id],
    )?;
    Ok(())
}

pub fn tokens_for_team(conn: &Connection, team: &str) -> Result<Vec<String>, NotifyError> {
    let mut stmt =
        conn.prepare("SELECT token FROM device_tokens WHERE team=?1 COLLATE NOCASE ORDER BY token")?;
    let rows = stmt.query_map(params![team], |r| r.get::<_, String>(0))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Send to every device registered for `team`. Returns how many sends succeeded; never fails.
pub fn notify_team(
    conn: &Connection,
    notifier: &dyn Notifier,
    team: &str,
    title: &str,
    body: &str,
) -> usize {
    let tokens = match tokens_for_team(conn, team) {
        Ok(t) => t,
        Err(e) => {
            warn!(team, error = %e, "could not look up device tokens");
            return 0;
        }
    };
    let mut sent = 0;
    for token in tokens {
        match notifier.send(&token, title, body) {
            Ok(()) => sent += 1,
            Err(e) => warn!(team, error = %e, "notification send failed"),
        }
    }
    sent
}
