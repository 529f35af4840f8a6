// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use duoledger::period::Period;
use duoledger::utils::{fmt_date, fmt_money};
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

#[test]
fn period_key_round_trips() {
    for key in ["2024-01", "1999-12", "2025-10", "0001-06"] {
        let p: Period = key.parse().unwrap();
        assert_eq!(p.to_string(), key);
        assert_eq!(p.to_string().parse::<Period>().unwrap(), p);
    }
}

#[test]
fn period_key_rejects_malformed_input() {
    for bad in ["2024-13", "2024-00", "2024-1", "24-01", "2024/01", "abcd-ef", ""] {
        assert!(bad.parse::<Period>().is_err(), "accepted {:?}", bad);
    }
}

#[test]
fn period_is_derived_from_date() {
    let d = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    let p = Period::of(d);
    assert_eq!(p.to_string(), "2024-02");
    assert_eq!(p.year(), 2024);
    assert_eq!(p.month(), 2);
}

#[test]
fn dates_without_a_period_key_are_rejected() {
    let past_9999 = NaiveDate::from_ymd_opt(10000, 1, 1).unwrap();
    assert!(Period::check_date(past_9999).is_err());
    let last = NaiveDate::from_ymd_opt(9999, 12, 31).unwrap();
    let p = Period::check_date(last).unwrap();
    assert_eq!(p.to_string().parse::<Period>().unwrap(), p);
}

#[test]
fn period_offsets_cross_years() {
    let p: Period = "2025-01".parse().unwrap();
    assert_eq!(p.offset(-1).unwrap().to_string(), "2024-12");
    assert_eq!(p.offset(-13).unwrap().to_string(), "2023-12");
    assert_eq!(p.offset(11).unwrap().to_string(), "2025-12");
    assert_eq!(p.offset(12).unwrap().to_string(), "2026-01");
}

#[test]
fn period_offsets_stop_at_representable_years() {
    let p: Period = "2025-01".parse().unwrap();
    assert_eq!(p.offset(-(2025 * 12)), Some(Period::EARLIEST));
    assert_eq!(p.offset(-(2025 * 12) - 1), None);
    assert_eq!(p.offset(i64::MIN), None);
    assert_eq!(p.offset(i64::MAX), None);
    let last: Period = "9999-12".parse().unwrap();
    assert_eq!(last.offset(1), None);
}

#[test]
fn period_order_is_chronological() {
    let mut ps: Vec<Period> = ["2025-02", "2024-12", "2025-10"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();
    ps.sort();
    let keys: Vec<String> = ps.iter().map(|p| p.to_string()).collect();
    assert_eq!(keys, vec!["2024-12", "2025-02", "2025-10"]);
}

#[test]
fn period_label_is_portuguese() {
    assert_eq!("2024-03".parse::<Period>().unwrap().label(), "Março de 2024");
    assert_eq!("2025-12".parse::<Period>().unwrap().label(), "Dezembro de 2025");
}

#[test]
fn money_format_is_locale_independent() {
    assert_eq!(fmt_money(&dec("0"), "R$"), "R$ 0.00");
    assert_eq!(fmt_money(&dec("5"), "R$"), "R$ 5.00");
    assert_eq!(fmt_money(&dec("999.999"), "R$"), "R$ 1,000.00");
    assert_eq!(fmt_money(&dec("1234567.891"), "R$"), "R$ 1,234,567.89");
    assert_eq!(fmt_money(&dec("-1234.5"), "R$"), "R$ -1,234.50");
    assert_eq!(fmt_money(&dec("-0.001"), "€"), "€ 0.00");
    assert_eq!(fmt_money(&dec("123456"), "$"), "$ 123,456.00");
}

#[test]
fn dates_display_day_first() {
    let d = NaiveDate::from_ymd_opt(2025, 7, 4).unwrap();
    assert_eq!(fmt_date(&d), "04/07/2025");
}

#[test]
fn currency_symbol_defaults_and_overrides() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    duoledger::db::init_schema(&conn).unwrap();
    assert_eq!(duoledger::utils::get_currency_symbol(&conn).unwrap(), "R$");

    duoledger::utils::set_currency_symbol(&conn, " US$ ").unwrap();
    duoledger::utils::set_currency_symbol(&conn, "€").unwrap();
    let symbol = duoledger::utils::get_currency_symbol(&conn).unwrap();
    assert_eq!(symbol, "€");
    assert_eq!(fmt_money(&dec("1234.5"), &symbol), "€ 1,234.50");
}
