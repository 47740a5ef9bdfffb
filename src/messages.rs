// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use rusqlite::{Connection, params};

use crate::models::{Message, Session};

pub fn post(conn: &Connection, session: &Session, body: &str) -> Result<Message> {
    let body = body.trim();
    if body.is_empty() {
        return Err(anyhow!("Message must not be empty"));
    }
    let team = session.team.clone().unwrap_or_default();
    conn.execute(
        "INSERT INTO messages(user_id, team, body) VALUES (?1, ?2, ?3)",
        params![session.user_id, team, body],
    )?;
    let id = conn.last_insert_rowid();
    let created_at: String =
        conn.query_row("SELECT created_at FROM messages WHERE id=?1", params![id], |r| {
            r.get(0)
        })?;
    Ok(Message {
        id,
        user_id: session.user_id.clone(),
        team,
        body: body.to_string(),
        created_at,
    })
}

fn collect(stmt: &mut rusqlite::Statement<'_>, p: impl rusqlite::Params) -> Result<Vec<Message>> {
    let rows = stmt.query_map(p, |r| {
        Ok(Message {
            id: r.get(0)?,
            user_id: r.get(1)?,
            team: r.get(2)?,
            body: r.get(3)?,
            created_at: r.get(4)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// The `limit` newest messages, returned oldest first for reading top to bottom.
pub fn recent(conn: &Connection, limit: usize) -> Result<Vec<Message>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, team, body, created_at FROM messages ORDER BY id DESC LIMIT ?1",
    )?;
    let mut out = collect(&mut stmt, params![limit as i64])?;
    out.reverse();
    Ok(out)
}

/// Messages posted after `last_id`, oldest first.
pub fn since(conn: &Connection, last_id: i64) -> Result<Vec<Message>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, team, body, created_at FROM messages WHERE id > ?1 ORDER BY id",
    )?;
    collect(&mut stmt, params![last_id])
}
