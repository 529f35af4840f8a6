// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::current_user;
use crate::models::Kind;
use crate::period::Period;
use crate::session::{self, Session, View};
use crate::store::{SqliteStore, TransactionStore};
use crate::summary::{
    available_periods, trailing_window, CategoryShare, Composition, PeriodSummary,
    DEFAULT_TREND_WINDOW,
};
use crate::utils::{fmt_money, get_currency_symbol, maybe_print_json, parse_month, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, sub)?,
        Some(("trend", sub)) => trend(conn, sub)?,
        Some(("months", sub)) => months(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Loads the user's session and moves it to the view and month a report
/// command asks for.
fn select(conn: &Connection, sub: &clap::ArgMatches) -> Result<Session> {
    let user = current_user(sub)?;
    let mut s = session::load(conn, &user)?;
    let view = match sub.get_one::<String>("scope").map(|s| s.as_str()) {
        Some("household") => View::HouseholdSummary,
        _ => View::MySummary,
    };
    s = s.select_view(view);
    // `months` has no --month argument
    if let Ok(Some(m)) = sub.try_get_one::<String>("month") {
        s = s.select_period(parse_month(m)?);
    }
    Ok(s)
}

fn scope_title(s: &Session) -> &'static str {
    match s.view {
        View::HouseholdSummary => "Household",
        _ => "My",
    }
}

fn share_rows(items: &[CategoryShare], symbol: &str) -> Vec<Vec<String>> {
    items
        .iter()
        .map(|c| {
            vec![
                c.category.clone(),
                fmt_money(&c.amount, symbol),
                format!("{:.2}%", c.share),
            ]
        })
        .collect()
}

pub fn build_summary(conn: &Connection, s: &Session) -> Result<PeriodSummary> {
    let store = SqliteStore::new(conn);
    let records = store.list_all()?;
    Ok(PeriodSummary::build(
        &records,
        &s.scope(),
        s.period_or_current(),
    )?)
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let s = select(conn, sub)?;
    let report = build_summary(conn, &s)?;
    session::save(conn, &s)?;

    if maybe_print_json(json_flag, jsonl_flag, &report)? {
        return Ok(());
    }
    let title = scope_title(&s);
    if report.count == 0 {
        println!(
            "{}: no transactions found for {}.",
            title,
            report.period.label()
        );
        return Ok(());
    }

    let symbol = get_currency_symbol(conn)?;
    println!("{} summary - {}", title, report.period.label());
    println!(
        "{}",
        pretty_table(
            &["Income", "Expense", "Investment", "Balance"],
            vec![vec![
                fmt_money(&report.totals.income, &symbol),
                fmt_money(&report.totals.expense, &symbol),
                fmt_money(&report.totals.investment, &symbol),
                fmt_money(&report.net_balance, &symbol),
            ]],
        )
    );

    for (kind, items) in [
        (Kind::Expense, &report.expense_by_category),
        (Kind::Income, &report.income_by_category),
    ] {
        if items.is_empty() {
            println!("No {} this month.", kind);
        } else {
            println!("{} by category", kind);
            println!(
                "{}",
                pretty_table(&["Category", "Amount", "Share"], share_rows(items, &symbol))
            );
        }
    }
    if !report.totals.investment.is_zero() {
        println!("investment by category");
        println!(
            "{}",
            pretty_table(
                &["Category", "Amount", "Share"],
                share_rows(&report.investment_by_category, &symbol)
            )
        );
    }

    match &report.composition {
        Composition::NoData => {}
        Composition::Segments(segments) => {
            let rows = segments
                .iter()
                .map(|seg| vec![seg.label.as_str().to_string(), fmt_money(&seg.amount, &symbol)])
                .collect();
            println!("Income vs expense");
            println!("{}", pretty_table(&["Segment", "Amount"], rows));
        }
    }
    Ok(())
}

fn trend(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let window = sub
        .get_one::<u32>("window")
        .map_or(DEFAULT_TREND_WINDOW, |w| *w as usize);
    let s = select(conn, sub)?;
    let store = SqliteStore::new(conn);
    let records = store.list_all()?;
    let scoped = s.scope().filter(&records);
    let points = trailing_window(scoped, s.period_or_current(), window);
    session::save(conn, &s)?;

    if !maybe_print_json(json_flag, jsonl_flag, &points)? {
        let symbol = get_currency_symbol(conn)?;
        let rows = points
            .iter()
            .map(|p| {
                vec![
                    p.period.label(),
                    fmt_money(&p.income, &symbol),
                    fmt_money(&p.expense, &symbol),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Month", "Income", "Expense"], rows));
    }
    Ok(())
}

#[derive(Serialize)]
struct MonthRow {
    period: Period,
    label: String,
}

fn months(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let s = select(conn, sub)?;
    let store = SqliteStore::new(conn);
    let records = store.list_all()?;
    let data: Vec<MonthRow> = available_periods(s.scope().filter(&records), Period::current())
        .into_iter()
        .map(|p| MonthRow {
            period: p,
            label: p.label(),
        })
        .collect();
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows = data
            .into_iter()
            .map(|m| vec![m.period.to_string(), m.label])
            .collect();
        println!("{}", pretty_table(&["Month", "Label"], rows));
    }
    Ok(())
}
