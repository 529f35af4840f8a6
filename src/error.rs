// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Failures surfaced by the ledger engine, the store, and session handlers.
///
/// None of these are fatal: the caller reports them and the session stays
/// usable for unrelated operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("Transaction {0} not found")]
    NotFound(i64),
    #[error("Transaction {id} belongs to '{owner}' and cannot be changed by another user")]
    Forbidden { id: i64, owner: String },
    #[error("No transaction is being edited")]
    NoActiveEdit,
    #[error("No deletion is waiting for confirmation")]
    NoPendingDelete,
    /// An installment series stopped partway. The installments in `written`
    /// stay persisted; nothing is rolled back.
    #[error("Installment series failed after {} of {total} records were written: {source}", .written.len())]
    PartialSeries {
        written: Vec<i64>,
        total: u32,
        #[source]
        source: Box<LedgerError>,
    },
    #[error("Database error: {0}")]
    Store(#[source] rusqlite::Error),
}

impl LedgerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        LedgerError::Validation(msg.into())
    }
}

impl From<rusqlite::Error> for LedgerError {
    fn from(err: rusqlite::Error) -> Self {
        use rusqlite::ErrorCode;
        match err.sqlite_error_code() {
            Some(
                ErrorCode::CannotOpen
                | ErrorCode::DatabaseBusy
                | ErrorCode::DatabaseLocked
                | ErrorCode::NotADatabase
                | ErrorCode::ReadOnly,
            ) => LedgerError::StoreUnavailable(err.to_string()),
            _ => LedgerError::Store(err),
        }
    }
}
