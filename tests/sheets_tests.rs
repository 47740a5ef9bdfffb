// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::cell::Cell;
use std::io::Write;
use std::time::Duration;

use chrono::Utc;
use tempfile::tempdir;
use tradeblock::db;
use tradeblock::sheets::{
    CachedSheets, CsvSheets, Rows, SheetCache, SheetError, SheetResult, SheetSource, start_row,
    with_retry,
};

struct Counting {
    rows: Rows,
    calls: Cell<usize>,
    fail: bool,
}

impl Counting {
    fn new(rows: Rows) -> Self {
        Self {
            rows,
            calls: Cell::new(0),
            fail: false,
        }
    }
}

impl SheetSource for Counting {
    fn fetch(&self, _range: &str) -> SheetResult<Rows> {
        self.calls.set(self.calls.get() + 1);
        if self.fail {
            return Err(SheetError::Config("offline".into()));
        }
        Ok(self.rows.clone())
    }
}

fn sample() -> Rows {
    vec![vec!["Jared".into(), "QB".into(), "J. Allen".into()]]
}

const RANGE: &str = "2025 Master List!A2:M";

#[test]
fn cached_range_is_served_without_refetch() {
    let conn = db::open_in_memory().unwrap();
    let src = Counting::new(sample());
    let cached = CachedSheets::new(&src, SheetCache::new(&conn, 3600));

    assert_eq!(cached.fetch(RANGE).unwrap(), sample());
    assert_eq!(cached.fetch(RANGE).unwrap(), sample());
    assert_eq!(src.calls.get(), 1);

    // a different range is its own entry
    cached.fetch("Trades!A2:C").unwrap();
    assert_eq!(src.calls.get(), 2);
}

#[test]
fn invalidation_forces_refetch() {
    let conn = db::open_in_memory().unwrap();
    let src = Counting::new(sample());
    let cached = CachedSheets::new(&src, SheetCache::new(&conn, 0));

    cached.fetch(RANGE).unwrap();
    assert!(cached.cache().invalidate(RANGE).unwrap());
    assert!(!cached.cache().invalidate(RANGE).unwrap());
    cached.fetch(RANGE).unwrap();
    assert_eq!(src.calls.get(), 2);

    assert_eq!(cached.cache().clear().unwrap(), 1);
    cached.fetch(RANGE).unwrap();
    assert_eq!(src.calls.get(), 3);
}

#[test]
fn entries_expire_after_ttl() {
    let conn = db::open_in_memory().unwrap();
    let old = Utc::now().timestamp() - 120;

    let short = SheetCache::new(&conn, 60);
    short.put_at(RANGE, &sample(), old).unwrap();
    assert!(short.get(RANGE).unwrap().is_none());

    let forever = SheetCache::new(&conn, 0);
    assert_eq!(forever.get(RANGE).unwrap(), Some(sample()));
}

#[test]
fn failed_fetch_is_not_cached() {
    let conn = db::open_in_memory().unwrap();
    let mut src = Counting::new(sample());
    src.fail = true;
    {
        let cached = CachedSheets::new(&src, SheetCache::new(&conn, 3600));
        assert!(cached.fetch(RANGE).is_err());
        assert!(cached.cache().get(RANGE).unwrap().is_none());
    }
    src.fail = false;
    let cached = CachedSheets::new(&src, SheetCache::new(&conn, 3600));
    assert_eq!(cached.fetch(RANGE).unwrap(), sample());
    assert_eq!(src.calls.get(), 2);
}

fn unavailable() -> SheetError {
    SheetError::HttpStatus {
        status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
        body: String::new(),
    }
}

#[test]
fn retry_recovers_from_transient_failures() {
    let attempts = Cell::new(0);
    let out = with_retry(3, Duration::ZERO, RANGE, || {
        attempts.set(attempts.get() + 1);
        if attempts.get() < 3 {
            Err(unavailable())
        } else {
            Ok(sample())
        }
    })
    .unwrap();
    assert_eq!(out, sample());
    assert_eq!(attempts.get(), 3);
}

#[test]
fn retry_is_bounded_and_skips_permanent_errors() {
    let attempts = Cell::new(0);
    let err = with_retry(2, Duration::ZERO, RANGE, || -> SheetResult<Rows> {
        attempts.set(attempts.get() + 1);
        Err(unavailable())
    })
    .unwrap_err();
    assert!(err.is_transient());
    assert_eq!(attempts.get(), 3);

    attempts.set(0);
    let err = with_retry(5, Duration::ZERO, RANGE, || -> SheetResult<Rows> {
        attempts.set(attempts.get() + 1);
        Err(SheetError::HttpStatus {
            status: reqwest::StatusCode::FORBIDDEN,
            body: "bad key".into(),
        })
    })
    .unwrap_err();
    assert!(!err.is_transient());
    assert_eq!(attempts.get(), 1);
}

#[test]
fn csv_source_reads_tab_by_sheet_name() {
    let dir = tempdir().unwrap();
    let mut f = std::fs::File::create(dir.path().join("Trades.csv")).unwrap();
    writeln!(f, "Date,Team 1,Team 2\n3/1/24,Jared,Bill\n,Player A,\n,,Pick B").unwrap();
    f.flush().unwrap();

    let src = CsvSheets::new(dir.path());
    assert_eq!(src.path_for("Trades!A2:C"), dir.path().join("Trades.csv"));
    let rows = src.fetch("Trades!A2:C").unwrap();
    assert_eq!(
        rows,
        vec![
            vec!["3/1/24", "Jared", "Bill"],
            vec!["", "Player A"],
            vec!["", "", "Pick B"],
        ]
    );

    assert!(matches!(
        src.fetch("Missing!A2:C"),
        Err(SheetError::Csv { .. })
    ));
}

#[test]
fn request_errors_that_are_not_transient_fail_fast() {
    let err = reqwest::blocking::Client::new()
        .get("not a url")
        .send()
        .unwrap_err();
    let attempts = Cell::new(0);
    let mut err = Some(SheetError::Http(err));
    let out = with_retry(3, Duration::ZERO, RANGE, || -> SheetResult<Rows> {
        attempts.set(attempts.get() + 1);
        Err(err.take().unwrap_or_else(unavailable))
    });
    assert!(matches!(out, Err(SheetError::Http(_))));
    assert_eq!(attempts.get(), 1);
}

#[test]
fn range_start_row() {
    assert_eq!(start_row("Trades!A2:C"), 2);
    assert_eq!(start_row("2025 Master List!A1:M"), 1);
    assert_eq!(start_row("Trades!$B$5:C"), 5);
    assert_eq!(start_row("Trades!A:C"), 1);
    assert_eq!(start_row("Trades"), 1);
}

#[test]
fn csv_source_keeps_first_line_when_range_starts_at_row_one() {
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join("Trades.csv"),
        "3/1/24,Jared,Bill\n,Player A,Pick B\n",
    )
    .unwrap();

    let src = CsvSheets::new(dir.path());
    let rows = src.fetch("Trades!A1:C").unwrap();
    assert_eq!(
        rows,
        vec![vec!["3/1/24", "Jared", "Bill"], vec!["", "Player A", "Pick B"]]
    );
    assert_eq!(src.fetch("Trades!A2:C").unwrap().len(), 1);
}
