// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{current_user, required};
use crate::store::{SqliteStore, TransactionStore};
use anyhow::{bail, Result};
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = required(sub, "format")?.to_lowercase();
    let out = required(sub, "out")?;
    let mine = sub.get_flag("mine");
    let user = if mine { Some(current_user(sub)?) } else { None };

    let store = SqliteStore::new(conn);
    let mut rows = store.list_all()?;
    if let Some(ref u) = user {
        rows.retain(|t| t.is_owned_by(u));
    }
    // oldest first, as a ledger reads
    rows.reverse();

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "id",
                "date",
                "period",
                "owner",
                "type",
                "category",
                "description",
                "amount",
                "payment_status",
            ])?;
            for t in &rows {
                wtr.write_record([
                    t.id.to_string(),
                    t.occurred_on.to_string(),
                    t.period().to_string(),
                    t.owner.clone(),
                    t.kind().to_string(),
                    t.category.clone(),
                    t.description.clone().unwrap_or_default(),
                    t.amount.to_string(),
                    t.payment_status()
                        .map(|s| s.to_string())
                        .unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let items: Vec<_> = rows
                .iter()
                .map(|t| {
                    json!({
                        "id": t.id, "date": t.occurred_on.to_string(), "period": t.period().to_string(),
                        "owner": t.owner, "type": t.kind().as_str(), "category": t.category,
                        "description": t.description, "amount": t.amount.to_string(),
                        "payment_status": t.payment_status().map(|s| s.as_str()),
                    })
                })
                .collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => bail!("Unknown format: {} (use csv|json)", fmt),
    }
    tracing::info!(count = rows.len(), out = %out, format = %fmt, "exported transactions");
    println!("Exported {} transactions to {}", rows.len(), out);
    Ok(())
}
