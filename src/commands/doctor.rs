// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::period::Period;
use crate::utils::pretty_table;
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;

/// Stored rows that break the record invariants, as `(issue, detail)` pairs.
pub fn find_issues(conn: &Connection) -> Result<Vec<(String, String)>> {
    let mut issues = Vec::new();
    let mut stmt = conn.prepare(
        "SELECT id, date, period, kind, category, amount, payment_status FROM transactions ORDER BY id",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let date: String = r.get(1)?;
        let period: String = r.get(2)?;
        let kind: String = r.get(3)?;
        let category: String = r.get(4)?;
        let amount: String = r.get(5)?;
        let status: Option<String> = r.get(6)?;

        // 1) Period key drifted from the date
        match NaiveDate::parse_from_str(&date, "%Y-%m-%d") {
            Ok(d) => {
                let expected = Period::of(d).to_string();
                if expected != period {
                    issues.push((
                        "period_mismatch".into(),
                        format!("#{} date {} stored under {}", id, date, period),
                    ));
                }
            }
            Err(_) => issues.push(("bad_date".into(), format!("#{} '{}'", id, date))),
        }

        // 2) Amount must be a positive decimal
        match amount.parse::<Decimal>() {
            Ok(a) if a > Decimal::ZERO => {}
            Ok(a) => issues.push(("non_positive_amount".into(), format!("#{} {}", id, a))),
            Err(_) => issues.push(("bad_amount".into(), format!("#{} '{}'", id, amount))),
        }

        if category.trim().is_empty() {
            issues.push(("empty_category".into(), format!("#{}", id)));
        }

        // 3) Payment status only on expenses, always on expenses
        match (kind.as_str(), status.as_deref()) {
            ("expense", None) => {
                issues.push(("expense_without_status".into(), format!("#{}", id)))
            }
            ("expense", Some(_)) | (_, None) => {}
            (k, Some(s)) => issues.push((
                "status_on_non_expense".into(),
                format!("#{} {} marked {}", id, k, s),
            )),
        }
    }
    Ok(issues)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let rows: Vec<Vec<String>> = find_issues(conn)?
        .into_iter()
        .map(|(issue, detail)| vec![issue, detail])
        .collect();
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        tracing::warn!(count = rows.len(), "doctor found inconsistent transactions");
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
