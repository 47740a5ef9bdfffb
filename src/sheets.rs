// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Spreadsheet ranges: where they come from and how long they are reused.

use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{SheetsConfig, SourceKind};
use crate::utils::http_client;

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

pub type Rows = Vec<Vec<String>>;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {status}: {body}")]
    HttpStatus {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("serialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("cache error: {0}")]
    Cache(#[from] rusqlite::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl SheetError {
    /// Worth another attempt: connection trouble, timeouts, throttling, server errors.
    pub fn is_transient(&self) -> bool {
        match self {
            SheetError::Http(e) => e.is_timeout() || e.is_connect(),
            SheetError::HttpStatus { status, .. } => {
                status.is_server_error() || *status == reqwest::StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }
}

pub type SheetResult<T> = Result<T, SheetError>;

/// Read access to spreadsheet ranges such as `"Trades!A2:C"`.
pub trait SheetSource {
    fn fetch(&self, range: &str) -> SheetResult<Rows>;
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Rows,
}

/// Google Sheets values API, authenticated with a static API key.
pub struct HttpSheets {
    http: reqwest::blocking::Client,
    spreadsheet_id: String,
    api_key: String,
    max_retries: u32,
    backoff: Duration,
}

impl HttpSheets {
    pub fn new(cfg: &SheetsConfig) -> SheetResult<Self> {
        if cfg.spreadsheet_id.trim().is_empty() || cfg.api_key.trim().is_empty() {
            return Err(SheetError::Config(
                "sheets.spreadsheet_id and sheets.api_key are required for the http source".into(),
            ));
        }
        let http = http_client(cfg.timeout_secs)
            .map_err(|e| SheetError::Config(format!("HTTP client: {e}")))?;
        Ok(Self {
            http,
            spreadsheet_id: cfg.spreadsheet_id.trim().to_string(),
            api_key: cfg.api_key.trim().to_string(),
            max_retries: cfg.max_retries,
            backoff: Duration::from_millis(cfg.retry_backoff_ms),
        })
    }

    fn url(&self, range: &str) -> SheetResult<reqwest::Url> {
        let mut url = reqwest::Url::parse(SHEETS_API_BASE)
            .map_err(|e| SheetError::Config(format!("bad API base: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| SheetError::Config("API base cannot hold a path".into()))?
            .push(&self.spreadsheet_id)
            .push("values")
            .push(range);
        Ok(url)
    }

    fn fetch_once(&self, range: &str) -> SheetResult<Rows> {
        let resp = self
            .http
            .get(self.url(range)?)
            .query(&[("key", self.api_key.as_str())])
            .send()?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().unwrap_or_default();
            return Err(SheetError::HttpStatus { status, body });
        }
        let vr: ValueRange = resp.json()?;
        Ok(vr.values)
    }
}

impl SheetSource for HttpSheets {
    fn fetch(&self, range: &str) -> SheetResult<Rows> {
        with_retry(self.max_retries, self.backoff, range, || self.fetch_once(range))
    }
}

/// Run `op` up to `1 + max_retries` times, doubling the pause after each transient failure.
pub fn with_retry<T>(
    max_retries: u32,
    backoff: Duration,
    range: &str,
    mut op: impl FnMut() -> SheetResult<T>,
) -> SheetResult<T> {
    let mut attempt = 0u32;
    loop {
        match op() {
            Ok(v) => return Ok(v),
            Err(e) if e.is_transient() && attempt < max_retries => {
                let pause = backoff * 2u32.saturating_pow(attempt);
                attempt += 1;
                warn!(range, attempt, error = %e, pause_ms = pause.as_millis() as u64, "sheet fetch failed, retrying");
                thread::sleep(pause);
            }
            Err(e) => return Err(e),
        }
    }
}

/// Offline source: one `<sheet name>.csv` per tab.
///
/// Lines above the range's start row are skipped, so `Trades!A2:C` drops a
/// header line while `Trades!A1:C` keeps every line.
pub struct CsvSheets {
    dir: PathBuf,
}

impl CsvSheets {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, range: &str) -> PathBuf {
        let sheet = range.split('!').next().unwrap_or(range).trim();
        self.dir.join(format!("{sheet}.csv"))
    }
}

impl SheetSource for CsvSheets {
    fn fetch(&self, range: &str) -> SheetResult<Rows> {
        let path = self.path_for(range);
        read_csv_rows(&path, start_row(range).saturating_sub(1))
    }
}

/// 1-based first row of an A1-style range; `1` when the range names no row.
pub fn start_row(range: &str) -> usize {
    let cells = range.rsplit_once('!').map(|(_, c)| c).unwrap_or(range);
    let first = cells.split(':').next().unwrap_or("").trim();
    let digits: String = first
        .trim_start_matches(|c: char| c.is_ascii_alphabetic() || c == '$')
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok().filter(|n| *n > 0).unwrap_or(1)
}

fn read_csv_rows(path: &Path, skip: usize) -> SheetResult<Rows> {
    let wrap = |source: csv::Error| SheetError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(wrap)?;
    let mut rows = Vec::new();
    for rec in rdr.records().skip(skip) {
        let rec = rec.map_err(wrap)?;
        let mut cells: Vec<String> = rec.iter().map(|c| c.to_string()).collect();
        // Sheets drops trailing empty cells; do the same so short rows stay short.
        while cells.last().is_some_and(|c| c.is_empty()) {
            cells.pop();
        }
        rows.push(cells);
    }
    Ok(rows)
}

pub fn source_from_config(cfg: &SheetsConfig) -> SheetResult<Box<dyn SheetSource>> {
    match cfg.source {
        SourceKind::Http => Ok(Box::new(HttpSheets::new(cfg)?)),
        SourceKind::Csv => Ok(Box::new(CsvSheets::new(cfg.csv_dir.clone()))),
    }
}

/// Fetched ranges kept in the `sheet_cache` table.
///
/// An entry is served until it is older than `ttl_secs` (0 = no expiry) or
/// removed with [`SheetCache::invalidate`] / [`SheetCache::clear`].
pub struct SheetCache<'c> {
    conn: &'c Connection,
    ttl_secs: u64,
}

impl<'c> SheetCache<'c> {
    pub fn new(conn: &'c Connection, ttl_secs: u64) -> Self {
        Self { conn, ttl_secs }
    }

    pub fn get(&self, range: &str) -> SheetResult<Option<Rows>> {
        let hit: Option<(i64, String)> = self
            .conn
            .query_row(
                "SELECT fetched_at, payload FROM sheet_cache WHERE range=?1",
                params![range],
                |r| Ok((r.get(0)?, r.get(1)?)),
            )
            .optional()?;
        let Some((fetched_at, payload)) = hit else {
            return Ok(None);
        };
        if self.ttl_secs > 0 {
            let age = Utc::now().timestamp().saturating_sub(fetched_at);
            if age < 0 || age as u64 >= self.ttl_secs {
                debug!(range, age, "cached range expired");
                return Ok(None);
            }
        }
        Ok(Some(serde_json::from_str(&payload)?))
    }

    pub fn put(&self, range: &str, rows: &Rows) -> SheetResult<()> {
        self.put_at(range, rows, Utc::now().timestamp())
    }

    pub fn put_at(&self, range: &str, rows: &Rows, fetched_at: i64) -> SheetResult<()> {
        self.conn.execute(
            "INSERT INTO sheet_cache(range, fetched_at, payload) VALUES (?1, ?2, ?3)
             ON CONFLICT(range) DO UPDATE SET fetched_at=excluded.fetched_at, payload=excluded.payload",
            params![range, fetched_at, serde_json::to_string(rows)?],
        )?;
        Ok(())
    }

    pub fn invalidate(&self, range: &str) -> SheetResult<bool> {
        let n = self
            .conn
            .execute("DELETE FROM sheet_cache WHERE range=?1", params![range])?;
        Ok(n > 0)
    }

    pub fn clear(&self) -> SheetResult<usize> {
        Ok(self.conn.execute("DELETE FROM sheet_cache", [])?)
    }
}

/// A source read through a [`SheetCache`]. Failed fetches are never cached.
pub struct CachedSheets<'c, S: SheetSource + ?Sized> {
    source: &'c S,
    cache: SheetCache<'c>,
}

impl<'c, S: SheetSource + ?Sized> CachedSheets<'c, S> {
    pub fn new(source: &'c S, cache: SheetCache<'c>) -> Self {
        Self { source, cache }
    }

    pub fn cache(&self) -> &SheetCache<'c> {
        &self.cache
    }
}

impl<S: SheetSource + ?Sized> SheetSource for CachedSheets<'_, S> {
    fn fetch(&self, range: &str) -> SheetResult<Rows> {
        if let Some(rows) = self.cache.get(range)? {
            debug!(range, rows = rows.len(), "sheet cache hit");
            return Ok(rows);
        }
        let rows = self.source.fetch(range)?;
        self.cache.put(range, &rows)?;
        info!(range, rows = rows.len(), "fetched sheet range");
        Ok(rows)
    }
}
