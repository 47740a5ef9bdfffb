// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::cell::RefCell;
use std::collections::BTreeSet;

use rusqlite::Connection;
use tradeblock::db;
use tradeblock::models::{ProposalResponse, ProposalStatus, Session};
use tradeblock::notify::{Notifier, NotifyError, register_token};
use tradeblock::proposals::{self, NewProposal, ProposalError, transition};

#[derive(Default)]
struct Recorder {
    sent: RefCell<Vec<(String, String, String)>>,
    fail: bool,
}

impl Notifier for Recorder {
    fn send(&self, token: &str, title: &str, body: &str) -> Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError::Relay {
                status: reqwest::StatusCode::BAD_GATEWAY,
                body: "relay down".into(),
            });
        }
        self.sent
            .borrow_mut()
            .push((token.to_string(), title.to_string(), body.to_string()));
        Ok(())
    }
}

fn jared() -> Session {
    Session {
        user_id: "u-jared".into(),
        email: "jared@example.com".into(),
        team: Some("Jared".into()),
    }
}

fn ids(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn proposal(offered: &[&str], requested: &[&str]) -> NewProposal {
    NewProposal {
        proposer: "Jared".into(),
        recipient: "Bill".into(),
        offered: ids(offered),
        requested: ids(requested),
    }
}

fn count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM proposals", [], |r| r.get(0))
        .unwrap()
}

#[test]
fn empty_request_is_rejected_before_any_write() {
    let conn = db::open_in_memory().unwrap();
    let n = Recorder::default();
    let err = proposals::submit(&conn, &n, Some(&jared()), proposal(&["JaredJ. Allen"], &[]))
        .unwrap_err();
    assert!(matches!(err, ProposalError::EmptyRequest));

    let err = proposals::submit(&conn, &n, Some(&jared()), proposal(&[], &["BillP. Mahomes"]))
        .unwrap_err();
    assert!(matches!(err, ProposalError::EmptyOffer));

    assert_eq!(count(&conn), 0);
    assert!(n.sent.borrow().is_empty());
}

#[test]
fn submit_requires_signed_in_user() {
    let conn = db::open_in_memory().unwrap();
    let err = proposals::submit(
        &conn,
        &Recorder::default(),
        None,
        proposal(&["JaredJ. Allen"], &["BillP. Mahomes"]),
    )
    .unwrap_err();
    assert!(matches!(err, ProposalError::NotAuthenticated));
    assert_eq!(count(&conn), 0);
}

#[test]
fn submit_stores_pending_and_notifies_recipient() {
    let conn = db::open_in_memory().unwrap();
    register_token(&conn, "tok-bill", "Bill", "u-bill").unwrap();
    register_token(&conn, "tok-jared", "Jared", "u-jared").unwrap();
    let n = Recorder::default();

    let p = proposals::submit(
        &conn,
        &n,
        Some(&jared()),
        proposal(&["JaredJ. Allen", "Jared2026 1st"], &["BillP. Mahomes"]),
    )
    .unwrap();
    assert_eq!(p.status, ProposalStatus::Pending);
    assert_eq!(p.response, None);
    assert_eq!(p.offered.len(), 2);

    let stored = proposals::get(&conn, p.id).unwrap().unwrap();
    assert_eq!(stored, p);

    let sent = n.sent.borrow();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "tok-bill");
    assert_eq!(sent[0].1, "New Trade Proposal");
    assert!(sent[0].2.contains("Jared"));
}

#[test]
fn notification_failure_does_not_roll_back() {
    let conn = db::open_in_memory().unwrap();
    register_token(&conn, "tok-bill", "Bill", "u-bill").unwrap();
    let n = Recorder {
        fail: true,
        ..Recorder::default()
    };
    let p = proposals::submit(
        &conn,
        &n,
        Some(&jared()),
        proposal(&["JaredJ. Allen"], &["BillP. Mahomes"]),
    )
    .unwrap();
    assert_eq!(count(&conn), 1);

    let answered = proposals::respond(&conn, &n, p.id, ProposalResponse::Yes).unwrap();
    assert_eq!(answered.status, ProposalStatus::Accepted);
}

#[test]
fn responses_drive_the_state_machine() {
    let conn = db::open_in_memory().unwrap();
    register_token(&conn, "tok-jared", "Jared", "u-jared").unwrap();
    let n = Recorder::default();
    let p = proposals::submit(
        &conn,
        &n,
        Some(&jared()),
        proposal(&["JaredJ. Allen"], &["BillP. Mahomes"]),
    )
    .unwrap();

    let maybe = proposals::respond(&conn, &n, p.id, ProposalResponse::Maybe).unwrap();
    assert_eq!(maybe.status, ProposalStatus::Pending);
    assert_eq!(maybe.response, Some(ProposalResponse::Maybe));

    let no = proposals::respond(&conn, &n, p.id, ProposalResponse::No).unwrap();
    assert_eq!(no.status, ProposalStatus::Rejected);

    let err = proposals::respond(&conn, &n, p.id, ProposalResponse::Yes).unwrap_err();
    assert!(matches!(
        err,
        ProposalError::AlreadyResolved {
            status: ProposalStatus::Rejected,
            ..
        }
    ));

    let stored = proposals::get(&conn, p.id).unwrap().unwrap();
    assert_eq!(stored.status, ProposalStatus::Rejected);
    assert_eq!(stored.response, Some(ProposalResponse::No));

    // proposer heard about both answers that went through
    assert_eq!(n.sent.borrow().len(), 2);
}

#[test]
fn respond_to_unknown_proposal_fails() {
    let conn = db::open_in_memory().unwrap();
    let err =
        proposals::respond(&conn, &Recorder::default(), 42, ProposalResponse::Yes).unwrap_err();
    assert!(matches!(err, ProposalError::NotFound(42)));
}

#[test]
fn inbox_lists_only_pending_for_recipient() {
    let conn = db::open_in_memory().unwrap();
    let n = Recorder::default();
    let a = proposals::submit(&conn, &n, Some(&jared()), proposal(&["a"], &["b"])).unwrap();
    let b = proposals::submit(&conn, &n, Some(&jared()), proposal(&["c"], &["d"])).unwrap();
    let mut to_jared = proposal(&["e"], &["f"]);
    to_jared.proposer = "Bill".into();
    to_jared.recipient = "Jared".into();
    proposals::submit(&conn, &n, Some(&jared()), to_jared).unwrap();

    proposals::respond(&conn, &n, a.id, ProposalResponse::Yes).unwrap();
    proposals::respond(&conn, &n, b.id, ProposalResponse::Maybe).unwrap();

    let inbox = proposals::pending_for(&conn, "bill").unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].id, b.id);
}

#[test]
fn terminal_states_have_no_transitions() {
    for r in [ProposalResponse::Yes, ProposalResponse::No, ProposalResponse::Maybe] {
        assert!(transition(1, ProposalStatus::Accepted, r).is_err());
        assert!(transition(1, ProposalStatus::Rejected, r).is_err());
    }
    assert_eq!(
        transition(1, ProposalStatus::Pending, ProposalResponse::Yes).unwrap(),
        ProposalStatus::Accepted
    );
    assert_eq!(
        transition(1, ProposalStatus::Pending, ProposalResponse::No).unwrap(),
        ProposalStatus::Rejected
    );
    assert_eq!(
        transition(1, ProposalStatus::Pending, ProposalResponse::Maybe).unwrap(),
        ProposalStatus::Pending
    );
}
