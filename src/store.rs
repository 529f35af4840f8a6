// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Persistence of transaction records.

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;

use crate::error::LedgerError;
use crate::models::{Flow, Kind, NewTransaction, PaymentStatus, Transaction, TransactionPatch};

/// CRUD contract the engine and session handlers are written against.
pub trait TransactionStore {
    fn create(&self, txn: &NewTransaction) -> Result<i64, LedgerError>;

    /// Every record, newest `occurred_on` first.
    fn list_all(&self) -> Result<Vec<Transaction>, LedgerError>;

    fn get(&self, id: i64) -> Result<Transaction, LedgerError>;

    /// Merges the set fields of `patch` into record `id`.
    fn update(&self, id: i64, patch: &TransactionPatch) -> Result<(), LedgerError>;

    fn delete(&self, id: i64) -> Result<(), LedgerError>;
}

/// One row per transaction in the `transactions` table.
pub struct SqliteStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        SqliteStore { conn }
    }
}

const SELECT_COLUMNS: &str = "SELECT id, owner, date, kind, category, description, amount, payment_status, created_at, updated_at FROM transactions";

fn conversion_err<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn from_row(r: &Row<'_>) -> rusqlite::Result<Transaction> {
    let date: String = r.get(2)?;
    let occurred_on =
        NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|e| conversion_err(2, e))?;
    let kind: String = r.get(3)?;
    let kind: Kind = kind.parse().map_err(|e| conversion_err(3, e))?;
    let amount: String = r.get(6)?;
    let amount: Decimal = amount.parse().map_err(|e| conversion_err(6, e))?;
    let status: Option<String> = r.get(7)?;
    let status = status
        .map(|s| s.parse::<PaymentStatus>())
        .transpose()
        .map_err(|e| conversion_err(7, e))?;
    Ok(Transaction {
        id: r.get(0)?,
        owner: r.get(1)?,
        occurred_on,
        flow: Flow::new(kind, status),
        category: r.get(4)?,
        description: r.get(5)?,
        amount,
        created_at: r.get(8)?,
        updated_at: r.get(9)?,
    })
}

impl TransactionStore for SqliteStore<'_> {
    fn create(&self, txn: &NewTransaction) -> Result<i64, LedgerError> {
        txn.validate()?;
        self.conn.execute(
            "INSERT INTO transactions(owner, date, kind, category, description, amount, period, payment_status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                txn.owner,
                txn.occurred_on.to_string(),
                txn.kind().as_str(),
                txn.category,
                txn.description,
                txn.amount.to_string(),
                txn.period().to_string(),
                txn.flow.payment_status().map(|s| s.as_str()),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::info!(
            id,
            owner = %txn.owner,
            kind = %txn.kind(),
            amount = %txn.amount,
            date = %txn.occurred_on,
            "transaction created"
        );
        Ok(id)
    }

    fn list_all(&self) -> Result<Vec<Transaction>, LedgerError> {
        let mut stmt = self
            .conn
            .prepare(&format!("{} ORDER BY date DESC, id DESC", SELECT_COLUMNS))?;
        let rows = stmt.query_map([], from_row)?;
        let mut data = Vec::new();
        for row in rows {
            data.push(row?);
        }
        tracing::debug!(count = data.len(), "listed transactions");
        Ok(data)
    }

    fn get(&self, id: i64) -> Result<Transaction, LedgerError> {
        self.conn
            .query_row(
                &format!("{} WHERE id=?1", SELECT_COLUMNS),
                params![id],
                from_row,
            )
            .optional()?
            .ok_or(LedgerError::NotFound(id))
    }

    fn update(&self, id: i64, patch: &TransactionPatch) -> Result<(), LedgerError> {
        let current = self.get(id)?;
        let next = patch.apply(&current)?;
        self.conn.execute(
            "UPDATE transactions
             SET date=?1, kind=?2, category=?3, description=?4, amount=?5, period=?6,
                 payment_status=?7, updated_at=datetime('now')
             WHERE id=?8",
            params![
                next.occurred_on.to_string(),
                next.kind().as_str(),
                next.category,
                next.description,
                next.amount.to_string(),
                next.period().to_string(),
                next.payment_status().map(|s| s.as_str()),
                id,
            ],
        )?;
        tracing::info!(id, "transaction updated");
        Ok(())
    }

    fn delete(&self, id: i64) -> Result<(), LedgerError> {
        let n = self
            .conn
            .execute("DELETE FROM transactions WHERE id=?1", params![id])?;
        if n == 0 {
            return Err(LedgerError::NotFound(id));
        }
        tracing::info!(id, "transaction deleted");
        Ok(())
    }
}
