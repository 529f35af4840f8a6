// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{current_user, required};
use crate::installments::InstallmentPlan;
use crate::models::{normalize_category, Kind, PaymentStatus, TransactionPatch};
use crate::session::{self, Session};
use crate::store::{SqliteStore, TransactionStore};
use crate::utils::{
    fmt_date, fmt_money, get_currency_symbol, maybe_print_json, parse_date, parse_decimal,
    parse_month, pretty_table,
};
use anyhow::Result;
use chrono::Local;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = current_user(sub)?;
    let date = match sub.get_one::<String>("date") {
        Some(d) => parse_date(d)?,
        None => Local::now().date_naive(),
    };
    let kind: Kind = required(sub, "type")?.parse()?;
    let category = required(sub, "category")?;
    let amount = parse_decimal(required(sub, "amount")?)?;
    let description = sub.get_one::<String>("desc").map(|s| s.as_str());

    let mut plan = InstallmentPlan::single(&user, date, kind, category, description, amount);
    if let Some(n) = sub.get_one::<u32>("installments") {
        plan = plan.monthly(*n);
    }
    if let Some(s) = sub.get_one::<String>("status") {
        plan = plan.with_status(s.parse::<PaymentStatus>()?);
    }

    let session = session::load(conn, &user)?;
    let store = SqliteStore::new(conn);
    let ids = session::add_transaction(&session, &store, &plan)?;

    let symbol = get_currency_symbol(conn)?;
    if plan.recurring {
        println!(
            "Recorded {} installment(s) of {} {} '{}' starting {} (ids: {})",
            ids.len(),
            fmt_money(&amount, &symbol),
            kind,
            normalize_category(category),
            fmt_date(&date),
            ids.iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        );
    } else {
        println!(
            "Recorded {} {} '{}' on {}",
            kind,
            fmt_money(&amount, &symbol),
            normalize_category(category),
            fmt_date(&date)
        );
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        if data.is_empty() {
            println!("No transactions to show.");
            return Ok(());
        }
        let symbol = get_currency_symbol(conn)?;
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.owner.clone(),
                    r.kind.clone(),
                    r.category.clone(),
                    r.description.clone(),
                    fmt_money(&r.amount, &symbol),
                    r.status.clone(),
                    r.actions.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &[
                    "ID",
                    "Date",
                    "Owner",
                    "Type",
                    "Category",
                    "Description",
                    "Amount",
                    "Status",
                    "Actions"
                ],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub owner: String,
    pub kind: String,
    pub category: String,
    pub description: String,
    pub amount: rust_decimal::Decimal,
    pub status: String,
    /// What the acting user may do with the row: `edit/rm`, a marker for the
    /// pending deletion or current edit, or empty for other users' rows.
    pub actions: String,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let user = current_user(sub)?;
    let session = session::load(conn, &user)?;
    let month = sub
        .get_one::<String>("month")
        .map(|s| parse_month(s))
        .transpose()?;
    let kind = sub
        .get_one::<String>("type")
        .map(|s| s.parse::<Kind>())
        .transpose()?;
    let category = sub.get_one::<String>("category").map(|c| normalize_category(c));
    let mine = sub.get_flag("mine");
    let limit = sub.get_one::<usize>("limit").copied();

    let store = SqliteStore::new(conn);
    let data = store
        .list_all()?
        .into_iter()
        .filter(|t| !mine || t.is_owned_by(&user))
        .filter(|t| month.is_none_or(|p| t.period() == p))
        .filter(|t| kind.is_none_or(|k| t.kind() == k))
        .filter(|t| category.as_ref().is_none_or(|c| &t.category == c))
        .take(limit.unwrap_or(usize::MAX))
        .map(|t| {
            let actions = if session.pending_delete == Some(t.id) {
                "delete pending".to_string()
            } else if session.editing == Some(t.id) {
                "editing".to_string()
            } else if session.can_modify(&t) {
                "edit/rm".to_string()
            } else {
                String::new()
            };
            TransactionRow {
                id: t.id,
                date: t.occurred_on.to_string(),
                owner: t.owner.clone(),
                kind: t.kind().to_string(),
                category: t.category.clone(),
                description: t.description.clone().unwrap_or_default(),
                amount: t.amount,
                status: t
                    .payment_status()
                    .map(|s| s.to_string())
                    .unwrap_or_default(),
                actions,
            }
        })
        .collect();
    Ok(data)
}

/// Collects the field flags of `tx edit` into a patch.
pub fn patch_from_args(sub: &clap::ArgMatches) -> Result<TransactionPatch> {
    Ok(TransactionPatch {
        occurred_on: sub
            .get_one::<String>("date")
            .map(|s| parse_date(s))
            .transpose()?,
        kind: sub
            .get_one::<String>("type")
            .map(|s| s.parse::<Kind>())
            .transpose()?,
        category: sub.get_one::<String>("category").cloned(),
        description: sub.get_one::<String>("desc").cloned(),
        amount: sub
            .get_one::<String>("amount")
            .map(|s| parse_decimal(s))
            .transpose()?,
        payment_status: sub
            .get_one::<String>("status")
            .map(|s| s.parse::<PaymentStatus>())
            .transpose()?,
    })
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = current_user(sub)?;
    let current = session::load(conn, &user)?;
    let store = SqliteStore::new(conn);

    if sub.get_flag("cancel") {
        session::save(conn, &current.cancel_edit())?;
        println!("Edit cancelled");
        return Ok(());
    }

    let id = *sub
        .get_one::<i64>("id")
        .ok_or_else(|| anyhow::anyhow!("Missing --id"))?;
    let txn = store.get(id)?;
    let editing = current.begin_edit(&txn)?;
    session::save(conn, &editing)?;

    let patch = patch_from_args(sub)?;
    if patch.is_empty() {
        println!(
            "Editing transaction {} ({} {} on {}); pass fields to change or --cancel",
            id,
            txn.kind(),
            txn.category,
            fmt_date(&txn.occurred_on)
        );
        return Ok(());
    }
    let done = session::submit_edit(&editing, &store, &patch)?;
    session::save(conn, &done)?;
    println!("Updated transaction {}", id);
    Ok(())
}

fn remove(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = current_user(sub)?;
    let current = session::load(conn, &user)?;
    let store = SqliteStore::new(conn);

    let next: Session = if let Some(id) = sub.get_one::<i64>("id") {
        let txn = store.get(*id)?;
        let next = current.request_delete(&txn)?;
        println!(
            "Transaction {} ({} {} on {}) marked for deletion; run `tx rm --confirm` or `tx rm --cancel`",
            id,
            txn.kind(),
            txn.category,
            fmt_date(&txn.occurred_on)
        );
        next
    } else if sub.get_flag("confirm") {
        let id = current.pending_delete;
        let next = session::confirm_delete(&current, &store)?;
        if let Some(id) = id {
            println!("Deleted transaction {}", id);
        }
        next
    } else {
        println!("Deletion cancelled");
        current.cancel_delete()
    };
    session::save(conn, &next)?;
    Ok(())
}
