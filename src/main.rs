// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use tradeblock::{cli, commands, config::AppConfig, db};

fn main() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tradeblock=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let cfg = AppConfig::load(matches.get_one::<String>("config").map(|s| s.as_str()))?;
    let conn = db::open_or_init()?;
    tracing::debug!(teams = cfg.league.teams.len(), source = ?cfg.sheets.source, "config loaded");

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("login", sub)) => commands::session::login(&conn, &cfg, sub)?,
        Some(("logout", _)) => commands::session::logout(&conn)?,
        Some(("whoami", _)) => commands::session::whoami(&conn)?,
        Some(("league", sub)) => commands::league::handle(&cfg, sub)?,
        Some(("sync", _)) => commands::cache::sync(&conn, &cfg)?,
        Some(("cache", sub)) => commands::cache::handle(&conn, &cfg, sub)?,
        Some(("assets", sub)) => commands::assets::handle(&conn, &cfg, sub)?,
        Some(("interest", sub)) => commands::interests::handle(&conn, &cfg, sub)?,
        Some(("trades", sub)) => commands::trades::handle(&conn, &cfg, sub)?,
        Some(("proposals", sub)) => commands::proposals::handle(&conn, &cfg, sub)?,
        Some(("messages", sub)) => commands::messages::handle(&conn, sub)?,
        Some(("notify", sub)) => commands::notify::handle(&conn, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn, &cfg)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
