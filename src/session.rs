// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Per-user interaction state and the action handlers that change it.
//!
//! A [`Session`] is never mutated in place by a handler: each action takes
//! the current state and returns the next one, so a failed action leaves the
//! caller's state untouched. At most one edit and one pending deletion exist
//! at a time, and starting either clears the other.

use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::installments::{record_series, InstallmentPlan};
use crate::models::{Transaction, TransactionPatch};
use crate::period::Period;
use crate::store::TransactionStore;
use crate::summary::Scope;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    #[default]
    LogTransaction,
    MySummary,
    HouseholdSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: String,
    pub editing: Option<i64>,
    pub pending_delete: Option<i64>,
    #[serde(default)]
    pub view: View,
    #[serde(default)]
    pub selected_period: Option<Period>,
}

impl Session {
    pub fn new(user: &str) -> Self {
        Session {
            user: user.trim().to_string(),
            editing: None,
            pending_delete: None,
            view: View::default(),
            selected_period: None,
        }
    }

    /// Records shown by the current view.
    pub fn scope(&self) -> Scope {
        match self.view {
            View::HouseholdSummary => Scope::Household,
            View::LogTransaction | View::MySummary => Scope::Owner(self.user.clone()),
        }
    }

    /// Only the creator of a record may change or delete it.
    pub fn can_modify(&self, txn: &Transaction) -> bool {
        txn.is_owned_by(&self.user)
    }

    fn ensure_owner(&self, txn: &Transaction) -> Result<(), LedgerError> {
        if self.can_modify(txn) {
            return Ok(());
        }
        tracing::warn!(user = %self.user, id = txn.id, owner = %txn.owner, "rejected change to another user's transaction");
        Err(LedgerError::Forbidden {
            id: txn.id,
            owner: txn.owner.clone(),
        })
    }

    pub fn begin_edit(&self, txn: &Transaction) -> Result<Session, LedgerError> {
        self.ensure_owner(txn)?;
        Ok(Session {
            editing: Some(txn.id),
            pending_delete: None,
            ..self.clone()
        })
    }

    pub fn cancel_edit(&self) -> Session {
        Session {
            editing: None,
            ..self.clone()
        }
    }

    pub fn request_delete(&self, txn: &Transaction) -> Result<Session, LedgerError> {
        self.ensure_owner(txn)?;
        Ok(Session {
            pending_delete: Some(txn.id),
            editing: None,
            ..self.clone()
        })
    }

    pub fn cancel_delete(&self) -> Session {
        Session {
            pending_delete: None,
            ..self.clone()
        }
    }

    pub fn select_view(&self, view: View) -> Session {
        Session {
            view,
            ..self.clone()
        }
    }

    pub fn select_period(&self, period: Period) -> Session {
        Session {
            selected_period: Some(period),
            ..self.clone()
        }
    }

    pub fn period_or_current(&self) -> Period {
        self.selected_period.unwrap_or_else(Period::current)
    }
}

/// Logs a new entry (or installment series) owned by the session user.
pub fn add_transaction<S>(
    session: &Session,
    store: &S,
    plan: &InstallmentPlan,
) -> Result<Vec<i64>, LedgerError>
where
    S: TransactionStore + ?Sized,
{
    let plan = InstallmentPlan {
        owner: session.user.clone(),
        ..plan.clone()
    };
    record_series(store, &plan)
}

/// Applies `patch` to the record being edited and ends the edit.
pub fn submit_edit<S>(
    session: &Session,
    store: &S,
    patch: &TransactionPatch,
) -> Result<Session, LedgerError>
where
    S: TransactionStore + ?Sized,
{
    let id = session.editing.ok_or(LedgerError::NoActiveEdit)?;
    let current = store.get(id)?;
    session.ensure_owner(&current)?;
    store.update(id, patch)?;
    Ok(session.cancel_edit())
}

/// Deletes the record waiting for confirmation. An edit of that same record
/// is dropped as well.
pub fn confirm_delete<S>(session: &Session, store: &S) -> Result<Session, LedgerError>
where
    S: TransactionStore + ?Sized,
{
    let id = session.pending_delete.ok_or(LedgerError::NoPendingDelete)?;
    let current = store.get(id)?;
    session.ensure_owner(&current)?;
    store.delete(id)?;
    let mut next = session.cancel_delete();
    if next.editing == Some(id) {
        next.editing = None;
    }
    Ok(next)
}

fn settings_key(user: &str) -> String {
    format!("session:{}", user.trim())
}

/// Restores the saved state of `user`, or a fresh session when none (or an
/// unreadable one) is stored.
pub fn load(conn: &Connection, user: &str) -> Result<Session, LedgerError> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![settings_key(user)],
            |r| r.get(0),
        )
        .optional()?;
    let Some(raw) = raw else {
        return Ok(Session::new(user));
    };
    match serde_json::from_str::<Session>(&raw) {
        Ok(s) if s.user == user.trim() => Ok(s),
        Ok(_) => Ok(Session::new(user)),
        Err(err) => {
            tracing::warn!(user, error = %err, "discarding unreadable session state");
            Ok(Session::new(user))
        }
    }
}

pub fn save(conn: &Connection, session: &Session) -> Result<(), LedgerError> {
    let value = serde_json::to_string(session)
        .map_err(|e| LedgerError::validation(format!("Cannot serialize session: {}", e)))?;
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![settings_key(&session.user), value],
    )?;
    tracing::debug!(user = %session.user, "session saved");
    Ok(())
}
