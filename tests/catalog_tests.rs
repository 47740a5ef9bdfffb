// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeSet;

use tradeblock::catalog::{AssetCatalog, SearchQuery, SortOrder, parse_row};
use tradeblock::utils::price_key;

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn league_rows() -> Vec<Vec<String>> {
    vec![
        row(&["Jared", "QB", "J. Allen", "$50", "$55", "$60", "$40", "2023", "2026", "Vet"]),
        row(&["Jared", "RB", "B. Robinson", "$30"]),
        row(&["Bill", "QB", "P. Mahomes", "$50", "$52"]),
        row(&["Bill", "", "2026 1st", "$5", "", "", "", "", "", "", "1", "2026"]),
        row(&["Jared Jr", "WR", "J. Chase", "$1,200"]),
        row(&["Bill", "", "2027 2nd", "", "", "", "", "", "", "", "2", "2027"]),
    ]
}

#[test]
fn parses_player_row() {
    let a = parse_row(&row(&[
        "Jared", "QB", "J. Allen", "$50", "$55", "$60", "$40", "2023", "2026", "Vet", "", " ",
    ]))
    .unwrap();
    assert_eq!(a.team, "Jared");
    assert_eq!(a.price_2025, "$50");
    assert_eq!(a.acquisition_year, 2023);
    assert_eq!(a.contract_year, "2026");
    assert_eq!(a.pool, "Vet");
    assert!(!a.is_pick());
    assert_eq!(a.asset_id(), "JaredJ. Allen");
}

#[test]
fn classifies_draft_pick() {
    let a = parse_row(&row(&[
        "Jared", "", "2026 1st", "", "", "", "", "", "", "1", "2026", "",
    ]))
    .unwrap();
    assert!(a.is_pick());
    assert_eq!(a.position, "");
}

#[test]
fn short_rows_default_and_reject() {
    let a = parse_row(&row(&["  Bill ", "TE", "T. Kelce"])).unwrap();
    assert_eq!(a.team, "Bill");
    assert_eq!(a.price_2025, "$0");
    assert_eq!(a.price_2026, "");
    assert_eq!(a.acquisition_year, 0);
    assert_eq!(a.trade_history, "");

    let b = parse_row(&row(&["Bill", "TE", "T. Kelce", "$9", "", "", "", "n/a"])).unwrap();
    assert_eq!(b.acquisition_year, 0);

    assert!(parse_row(&row(&["Bill", "TE"])).is_none());
}

#[test]
fn only_team_cell_is_trimmed() {
    let a = parse_row(&row(&[" Jared ", " QB ", " J. Allen "])).unwrap();
    assert_eq!(a.team, "Jared");
    assert_eq!(a.position, " QB ");
    assert_eq!(a.name, " J. Allen ");
}

#[test]
fn projections_carry_only_row_data() {
    let cells = [
        "Jared", "QB", "J. Allen", "$50", "$55", "$60", "$40", "2023", "2026", "Vet", "", "",
        "From Bill 2024",
    ];
    let a = parse_row(&row(&cells)).unwrap();
    let p = a.to_roster_player();
    assert_eq!(
        vec![
            p.team.as_str(),
            p.position.as_str(),
            p.name.as_str(),
            p.price_2025.as_str(),
            p.price_2026.as_str(),
            p.price_2027.as_str(),
            p.original_price.as_str(),
        ],
        cells[..7].to_vec()
    );
    assert_eq!(p.acquisition_year.to_string(), cells[7]);
    assert_eq!(p.contract_year, cells[8]);
    assert_eq!(p.pool, cells[9]);
    assert_eq!(p.trade_history, cells[12]);

    let pick = parse_row(&row(&[
        "Bill", "", "2026 1st", "$5", "", "", "", "", "", "", "1", "2026", "",
    ]))
    .unwrap()
    .to_draft_pick();
    assert_eq!(pick.team, "Bill");
    assert_eq!(pick.name, "2026 1st");
    assert_eq!(pick.round, "1");
    assert_eq!(pick.draft_year, "2026");
    assert_eq!(pick.price_2025, "$5");
}

#[test]
fn load_skips_short_rows_and_flags_duplicates() {
    let mut rows = league_rows();
    rows.push(row(&["Bill"]));
    rows.push(row(&["Jared", "RB", "B. Robinson", "$31"]));
    let (catalog, report) = AssetCatalog::from_rows(&rows);
    assert_eq!(report.loaded, 7);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.duplicate_ids, vec!["JaredB. Robinson".to_string()]);
    assert_eq!(catalog.all()[0].name, "J. Allen");
    assert_eq!(catalog.all()[6].price_2025, "$31");
}

#[test]
fn load_replaces_previous_assets() {
    let (mut catalog, _) = AssetCatalog::from_rows(&league_rows());
    assert_eq!(catalog.len(), 6);
    catalog.load(&[row(&["Zed", "K", "J. Tucker", "$1"])]);
    assert_eq!(catalog.len(), 1);
    assert!(catalog.get("JaredJ. Allen").is_none());
    assert!(catalog.get("ZedJ. Tucker").is_some());
}

#[test]
fn filter_by_team_is_case_insensitive_substring() {
    let (catalog, _) = AssetCatalog::from_rows(&league_rows());
    let names: Vec<&str> = catalog
        .filter_by_team("jARed")
        .iter()
        .map(|a| a.name.as_str())
        .collect();
    assert_eq!(names, vec!["J. Allen", "B. Robinson", "J. Chase"]);
}

#[test]
fn search_filters_by_name_team_and_position() {
    let (catalog, _) = AssetCatalog::from_rows(&league_rows());

    let q = SearchQuery {
        text: "ALLEN".into(),
        ..SearchQuery::default()
    };
    let hits = catalog.search(&q);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "J. Allen");

    // team filter is exact membership, unlike filter_by_team
    let q = SearchQuery {
        teams: set(&["Jared"]),
        ..SearchQuery::default()
    };
    assert_eq!(catalog.search(&q).len(), 2);

    let q = SearchQuery {
        teams: set(&["Bill"]),
        positions: set(&["Picks"]),
        ..SearchQuery::default()
    };
    let picks: Vec<&str> = catalog.search(&q).iter().map(|a| a.name.as_str()).collect();
    assert_eq!(picks, vec!["2026 1st", "2027 2nd"]);

    let q = SearchQuery {
        positions: set(&["QB", "Picks"]),
        ..SearchQuery::default()
    };
    assert_eq!(catalog.search(&q).len(), 4);

    // "All" only disables the filter when it is the sole member
    let q = SearchQuery {
        teams: set(&["All", "Bill"]),
        ..SearchQuery::default()
    };
    assert_eq!(catalog.search(&q).len(), 3);
}

#[test]
fn price_key_strips_formatting() {
    assert_eq!(price_key("$1,200"), 1200);
    assert_eq!(price_key("$0"), 0);
    assert_eq!(price_key(""), 0);
    assert_eq!(price_key("TBD"), 0);
}

#[test]
fn sort_is_stable_and_reverses() {
    let rows = vec![
        row(&["T", "QB", "A", "$10"]),
        row(&["T", "QB", "B", "$30"]),
        row(&["T", "QB", "C", "$10"]),
        row(&["T", "QB", "D", "$20"]),
    ];
    let (catalog, _) = AssetCatalog::from_rows(&rows);
    let names = |sort: SortOrder| -> Vec<String> {
        catalog
            .search(&SearchQuery {
                sort,
                ..SearchQuery::default()
            })
            .iter()
            .map(|a| a.name.clone())
            .collect()
    };
    assert_eq!(names(SortOrder::Highest), vec!["B", "D", "A", "C"]);
    assert_eq!(names(SortOrder::Lowest), vec!["A", "C", "D", "B"]);
}

#[test]
fn sort_order_parses_any_case() {
    assert_eq!("Highest".parse::<SortOrder>().unwrap(), SortOrder::Highest);
    assert_eq!(" lowest ".parse::<SortOrder>().unwrap(), SortOrder::Lowest);
    assert!("newest".parse::<SortOrder>().is_err());
}
