// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::db::APP;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Http,
    #[default]
    Csv,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetsConfig {
    pub source: SourceKind,
    pub spreadsheet_id: String,
    pub api_key: String,
    /// Directory holding one `<sheet name>.csv` per tab when `source = "csv"`.
    pub csv_dir: PathBuf,
    pub roster_range: String,
    pub trades_range: String,
    /// Zero keeps cached ranges until they are cleared explicitly.
    pub cache_ttl_secs: u64,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            source: SourceKind::Csv,
            spreadsheet_id: String::new(),
            api_key: String::new(),
            csv_dir: PathBuf::from("sheets"),
            roster_range: "2025 Master List!A2:M".to_string(),
            trades_range: "Trades!A2:C".to_string(),
            cache_ttl_secs: 3600,
            timeout_secs: 15,
            max_retries: 3,
            retry_backoff_ms: 500,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationsConfig {
    /// Server-side relay that forwards pushes to device tokens.
    pub relay_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamConfig {
    pub name: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub logo: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LeagueConfig {
    pub season: i32,
    pub teams: Vec<TeamConfig>,
}

impl Default for LeagueConfig {
    fn default() -> Self {
        Self {
            season: 2025,
            teams: Vec::new(),
        }
    }
}

impl LeagueConfig {
    pub fn team(&self, name: &str) -> Option<&TeamConfig> {
        self.teams
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name.trim()))
    }

    /// Two-digit year key used by the trades ledger, e.g. 2025 -> "25".
    pub fn season_key(&self) -> String {
        format!("{:02}", self.season.rem_euclid(100))
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub sheets: SheetsConfig,
    pub notifications: NotificationsConfig,
    pub league: LeagueConfig,
}

impl AppConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file at {}", path.display()))?;
        let cfg: Self = toml::from_str(&contents)
            .with_context(|| format!("failed to deserialize TOML config at {}", path.display()))?;
        Ok(cfg)
    }

    /// Explicit path must exist; the default location falls back to built-in defaults.
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        if let Some(p) = explicit {
            return Self::from_file(Path::new(p.trim()));
        }
        let path = default_config_path()?;
        if path.exists() {
            Self::from_file(&path)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    let proj = directories::ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific config dir")?;
    Ok(proj.config_dir().join("tradeblock.toml"))
}
