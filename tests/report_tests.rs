// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use duoledger::commands::reports;
use duoledger::installments::{record_series, InstallmentPlan};
use duoledger::models::Kind;
use duoledger::session::{self, View};
use duoledger::store::SqliteStore;
use duoledger::summary::SegmentLabel;
use duoledger::{cli, db};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let store = SqliteStore::new(&conn);
    let d = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
    let entries = [
        ("Luiz", "2025-03-05", Kind::Income, "salário", "3000"),
        ("Iasmin", "2025-03-05", Kind::Income, "salário", "2000"),
        ("Luiz", "2025-03-10", Kind::Expense, "moradia", "1800"),
        ("Iasmin", "2025-03-12", Kind::Investment, "ações", "500"),
    ];
    for (owner, date, kind, cat, amount) in entries {
        let plan = InstallmentPlan::single(owner, d(date), kind, cat, None, amount.parse().unwrap());
        record_series(&store, &plan).unwrap();
    }
    conn
}

fn run_report(conn: &Connection, user: &str, args: &[&str]) {
    let mut argv = vec!["duoledger", "--user", user, "report"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("report", sub)) = matches.subcommand() {
        reports::handle(conn, sub).unwrap();
    } else {
        panic!("report command not parsed");
    }
}

#[test]
fn household_summary_selects_view_and_month() {
    let conn = setup();
    run_report(&conn, "Iasmin", &["summary", "--month", "2025-03", "--scope", "household", "--json"]);

    let s = session::load(&conn, "Iasmin").unwrap();
    assert_eq!(s.view, View::HouseholdSummary);
    assert_eq!(s.selected_period.map(|p| p.to_string()), Some("2025-03".into()));

    let report = reports::build_summary(&conn, &s).unwrap();
    assert_eq!(report.count, 4);
    assert_eq!(report.totals.income, Decimal::from(5000));
    assert_eq!(report.net_balance, Decimal::from(2700));
    let labels: Vec<SegmentLabel> = report.composition.segments().iter().map(|s| s.label).collect();
    assert_eq!(labels, vec![SegmentLabel::Covered, SegmentLabel::Surplus]);
}

#[test]
fn my_summary_uses_saved_month() {
    let conn = setup();
    run_report(&conn, "Luiz", &["summary", "--month", "2025-03", "--json"]);
    // no --month: the month picked last time is reused
    run_report(&conn, "Luiz", &["trend", "--json"]);

    let s = session::load(&conn, "Luiz").unwrap();
    assert_eq!(s.view, View::MySummary);
    let report = reports::build_summary(&conn, &s).unwrap();
    assert_eq!(report.period.to_string(), "2025-03");
    assert_eq!(report.count, 2);
    assert_eq!(report.net_balance, Decimal::from(1200));
    assert!(report.investment_by_category.is_empty());
}
