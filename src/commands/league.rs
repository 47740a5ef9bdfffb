// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::AppConfig;
use crate::utils::pretty_table;
use anyhow::Result;

pub fn handle(cfg: &AppConfig, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("teams", _)) => {
            if cfg.league.teams.is_empty() {
                println!("No teams configured; add [[league.teams]] entries to the config file.");
                return Ok(());
            }
            let rows = cfg
                .league
                .teams
                .iter()
                .map(|t| vec![t.name.clone(), t.color.clone(), t.logo.clone()])
                .collect();
            println!("Season {}", cfg.league.season);
            println!("{}", pretty_table(&["Team", "Color", "Logo"], rows));
        }
        _ => {}
    }
    Ok(())
}
