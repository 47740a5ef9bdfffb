// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::catalog::AssetCatalog;
use crate::commands::{load_catalog, require_session, require_team, resolve_asset};
use crate::config::AppConfig;
use crate::models::ProposalResponse;
use crate::notify::{Notifier, notifier_from_config};
use crate::proposals::{self, NewProposal};
use crate::session;
use crate::utils::{maybe_print_json, pretty_table, split_list};
use anyhow::{Context, Result, anyhow};
use rusqlite::Connection;
use std::collections::BTreeSet;

pub fn handle(conn: &Connection, cfg: &AppConfig, m: &clap::ArgMatches) -> Result<()> {
    let notifier = notifier_from_config(&cfg.notifications, cfg.sheets.timeout_secs);
    handle_with(conn, cfg, notifier.as_ref(), m)
}

/// Same as [`handle`] with the notification channel supplied by the caller.
pub fn handle_with(
    conn: &Connection,
    cfg: &AppConfig,
    notifier: &dyn Notifier,
    m: &clap::ArgMatches,
) -> Result<()> {
    match m.subcommand() {
        Some(("submit", sub)) => submit(conn, cfg, notifier, sub)?,
        Some(("inbox", sub)) => inbox(conn, sub)?,
        Some(("respond", sub)) => respond(conn, notifier, sub)?,
        _ => {}
    }
    Ok(())
}

fn ids(
    catalog: &AssetCatalog,
    team: &str,
    sub: &clap::ArgMatches,
    arg: &str,
) -> Result<BTreeSet<String>> {
    let mut out = BTreeSet::new();
    for raw in sub.get_many::<String>(arg).into_iter().flatten() {
        for key in split_list(raw) {
            let asset = resolve_asset(catalog, Some(team), &key)?;
            out.insert(asset.asset_id());
        }
    }
    Ok(out)
}

fn submit(
    conn: &Connection,
    cfg: &AppConfig,
    notifier: &dyn Notifier,
    sub: &clap::ArgMatches,
) -> Result<()> {
    let current = session::current(conn)?;
    let proposer = match &current {
        Some(s) => require_team(s)?,
        None => String::new(),
    };
    let to = sub.get_one::<String>("to").unwrap().trim().to_string();
    let recipient = match cfg.league.team(&to) {
        Some(t) => t.name.clone(),
        None if cfg.league.teams.is_empty() => to,
        None => return Err(anyhow!("Team '{}' is not in the league", to)),
    };

    let (offered, requested) = if current.is_some() {
        let (catalog, _) = load_catalog(conn, cfg)?;
        (
            ids(&catalog, &proposer, sub, "offer")?,
            ids(&catalog, &recipient, sub, "request")?,
        )
    } else {
        (BTreeSet::new(), BTreeSet::new())
    };

    let p = proposals::submit(
        conn,
        notifier,
        current.as_ref(),
        NewProposal {
            proposer,
            recipient,
            offered,
            requested,
        },
    )?;
    println!(
        "Proposal #{} sent to {}: give {} for {}",
        p.id,
        p.recipient,
        p.offered.iter().cloned().collect::<Vec<_>>().join(", "),
        p.requested.iter().cloned().collect::<Vec<_>>().join(", ")
    );
    Ok(())
}

fn inbox(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let s = require_session(conn)?;
    let team = require_team(&s)?;
    let pending = proposals::pending_for(conn, &team)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &pending)? {
        return Ok(());
    }
    let rows = pending
        .into_iter()
        .map(|p| {
            vec![
                p.id.to_string(),
                p.proposer,
                p.offered.into_iter().collect::<Vec<_>>().join(", "),
                p.requested.into_iter().collect::<Vec<_>>().join(", "),
                p.response.map(|r| r.to_string()).unwrap_or_default(),
                p.created_at,
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "From", "They give", "They want", "Your answer", "Sent"],
            rows
        )
    );
    Ok(())
}

fn respond(conn: &Connection, notifier: &dyn Notifier, sub: &clap::ArgMatches) -> Result<()> {
    require_session(conn)?;
    let id = *sub.get_one::<i64>("id").unwrap();
    let answer: ProposalResponse = sub
        .get_one::<String>("answer")
        .unwrap()
        .parse()
        .context("Invalid --answer")?;
    let p = proposals::respond(conn, notifier, id, answer)?;
    println!("Proposal #{} is now {} (answered {})", p.id, p.status, answer);
    Ok(())
}
