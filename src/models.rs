// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::period::Period;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Income,
    Expense,
    Investment,
}

impl Kind {
    pub const ALL: [Kind; 3] = [Kind::Income, Kind::Expense, Kind::Investment];

    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Income => "income",
            Kind::Expense => "expense",
            Kind::Investment => "investment",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Kind::Income),
            "expense" => Ok(Kind::Expense),
            "investment" => Ok(Kind::Investment),
            other => Err(LedgerError::validation(format!(
                "Unknown transaction type '{}' (use income|expense|investment)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(PaymentStatus::Pending),
            "paid" => Ok(PaymentStatus::Paid),
            other => Err(LedgerError::validation(format!(
                "Unknown payment status '{}' (use pending|paid)",
                other
            ))),
        }
    }
}

/// The kind of a record together with the data that only some kinds carry.
/// A payment status exists exactly when the record is an expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Flow {
    Income,
    Expense { status: PaymentStatus },
    Investment,
}

impl Flow {
    /// Builds the flow for `kind`. The status is kept for expenses (defaulting
    /// to pending) and dropped for every other kind.
    pub fn new(kind: Kind, status: Option<PaymentStatus>) -> Self {
        match kind {
            Kind::Income => Flow::Income,
            Kind::Expense => Flow::Expense {
                status: status.unwrap_or_default(),
            },
            Kind::Investment => Flow::Investment,
        }
    }

    pub fn kind(&self) -> Kind {
        match self {
            Flow::Income => Kind::Income,
            Flow::Expense { .. } => Kind::Expense,
            Flow::Investment => Kind::Investment,
        }
    }

    pub fn payment_status(&self) -> Option<PaymentStatus> {
        match self {
            Flow::Expense { status } => Some(*status),
            _ => None,
        }
    }
}

/// A stored ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub owner: String,
    pub occurred_on: NaiveDate,
    pub flow: Flow,
    pub category: String,
    pub description: Option<String>,
    pub amount: Decimal,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl Transaction {
    pub fn kind(&self) -> Kind {
        self.flow.kind()
    }

    pub fn payment_status(&self) -> Option<PaymentStatus> {
        self.flow.payment_status()
    }

    pub fn period(&self) -> Period {
        Period::of(self.occurred_on)
    }

    pub fn is_owned_by(&self, user: &str) -> bool {
        self.owner == user
    }
}

/// A validated, normalized record ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub owner: String,
    pub occurred_on: NaiveDate,
    pub flow: Flow,
    pub category: String,
    pub description: Option<String>,
    pub amount: Decimal,
}

impl NewTransaction {
    pub fn new(
        owner: &str,
        occurred_on: NaiveDate,
        flow: Flow,
        category: &str,
        description: Option<&str>,
        amount: Decimal,
    ) -> Result<Self, LedgerError> {
        let owner = owner.trim();
        if owner.is_empty() {
            return Err(LedgerError::validation("Owner must not be empty"));
        }
        let txn = NewTransaction {
            owner: owner.to_string(),
            occurred_on,
            flow,
            category: normalize_category(category),
            description: normalize_description(description),
            amount,
        };
        txn.validate()?;
        Ok(txn)
    }

    pub fn kind(&self) -> Kind {
        self.flow.kind()
    }

    pub fn period(&self) -> Period {
        Period::of(self.occurred_on)
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        Period::check_date(self.occurred_on)?;
        validate_amount(self.amount)?;
        validate_category(&self.category)
    }
}

/// Field-wise update. `None` leaves the stored value untouched; `id`, owner,
/// and timestamps can never be patched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionPatch {
    pub occurred_on: Option<NaiveDate>,
    pub kind: Option<Kind>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub amount: Option<Decimal>,
    pub payment_status: Option<PaymentStatus>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        *self == TransactionPatch::default()
    }

    /// Applies the patch to a copy of `current`, normalizing text fields and
    /// re-checking the record invariants.
    pub fn apply(&self, current: &Transaction) -> Result<Transaction, LedgerError> {
        let mut next = current.clone();
        if let Some(date) = self.occurred_on {
            next.occurred_on = date;
        }
        let kind = self.kind.unwrap_or(current.kind());
        let status = self.payment_status.or(current.payment_status());
        next.flow = Flow::new(kind, status);
        if let Some(ref cat) = self.category {
            next.category = normalize_category(cat);
        }
        if let Some(ref desc) = self.description {
            next.description = normalize_description(Some(desc));
        }
        if let Some(amount) = self.amount {
            next.amount = amount;
        }
        Period::check_date(next.occurred_on)?;
        validate_amount(next.amount)?;
        validate_category(&next.category)?;
        Ok(next)
    }
}

pub fn validate_amount(amount: Decimal) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::validation(format!(
            "Amount must be positive, got {}",
            amount
        )));
    }
    Ok(())
}

pub fn validate_category(category: &str) -> Result<(), LedgerError> {
    if category.trim().is_empty() {
        return Err(LedgerError::validation("Category must not be empty"));
    }
    Ok(())
}

/// Trims and capitalizes: first character upper case, the rest lower case.
pub fn normalize_category(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

pub fn normalize_description(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
