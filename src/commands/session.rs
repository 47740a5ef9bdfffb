// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::AppConfig;
use crate::session;
use anyhow::Result;
use rusqlite::Connection;

pub fn login(conn: &Connection, cfg: &AppConfig, sub: &clap::ArgMatches) -> Result<()> {
    let user = sub.get_one::<String>("user").unwrap();
    let email = sub.get_one::<String>("email").unwrap();
    let team = sub.get_one::<String>("team").map(|s| s.as_str());
    let s = session::login(conn, &cfg.league, user, email, team)?;
    match &s.team {
        Some(t) => println!("Signed in as {} ({})", s.email, t),
        None => println!("Signed in as {} (no team; pass --team to pick one)", s.email),
    }
    Ok(())
}

pub fn logout(conn: &Connection) -> Result<()> {
    session::logout(conn)?;
    println!("Signed out");
    Ok(())
}

pub fn whoami(conn: &Connection) -> Result<()> {
    match session::current(conn)? {
        Some(s) => println!(
            "{} <{}> team: {}",
            s.user_id,
            s.email,
            s.team.as_deref().unwrap_or("-")
        ),
        None => println!("Not signed in"),
    }
    Ok(())
}
