// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{require_session, require_team};
use crate::notify::register_token;
use anyhow::{Result, anyhow};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("register", sub)) => {
            let token = sub.get_one::<String>("token").unwrap().trim();
            if token.is_empty() {
                return Err(anyhow!("Device token must not be empty"));
            }
            let s = require_session(conn)?;
            let team = require_team(&s)?;
            register_token(conn, token, &team, &s.user_id)?;
            println!("Registered device for {}", team);
        }
        _ => {}
    }
    Ok(())
}
