// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::require_session;
use crate::messages;
use crate::models::Message;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use std::thread;
use std::time::Duration;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("post", sub)) => {
            let s = require_session(conn)?;
            let msg = messages::post(conn, &s, sub.get_one::<String>("body").unwrap())?;
            println!("Posted message #{}", msg.id);
        }
        Some(("list", sub)) => {
            let limit = *sub.get_one::<usize>("limit").unwrap_or(&50);
            let data = messages::recent(conn, limit)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .into_iter()
                    .map(|m| vec![m.created_at, author(&m.team, &m.user_id), m.body])
                    .collect();
                println!("{}", pretty_table(&["When", "From", "Message"], rows));
            }
        }
        Some(("follow", sub)) => {
            let every = Duration::from_secs((*sub.get_one::<u64>("interval").unwrap_or(&5)).max(1));
            follow(conn, every)?;
        }
        _ => {}
    }
    Ok(())
}

fn author(team: &str, user_id: &str) -> String {
    if team.is_empty() {
        user_id.to_string()
    } else {
        team.to_string()
    }
}

fn print_line(m: &Message) {
    println!("[{}] {}: {}", m.created_at, author(&m.team, &m.user_id), m.body);
}

/// Print the latest messages, then poll for new ones until interrupted.
fn follow(conn: &Connection, every: Duration) -> Result<()> {
    let backlog = messages::recent(conn, 20)?;
    let mut last_id = backlog.last().map(|m| m.id).unwrap_or(0);
    for m in &backlog {
        print_line(m);
    }
    loop {
        thread::sleep(every);
        for m in messages::since(conn, last_id)? {
            print_line(&m);
            last_id = m.id;
        }
    }
}
