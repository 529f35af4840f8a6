// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Expansion of one logged intent into dated installment records.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;

use crate::error::LedgerError;
use crate::models::{
    normalize_category, normalize_description, Flow, Kind, NewTransaction, PaymentStatus,
};
use crate::store::TransactionStore;

/// Longest series a single entry may expand into (30 years of months).
pub const MAX_INSTALLMENTS: u32 = 360;

/// What the user asked to log. `amount` is charged per installment, it is
/// never divided across the series.
#[derive(Debug, Clone, PartialEq)]
pub struct InstallmentPlan {
    pub owner: String,
    pub start_date: NaiveDate,
    pub kind: Kind,
    pub category: String,
    pub description: Option<String>,
    pub amount: Decimal,
    pub recurring: bool,
    pub installments: u32,
    pub payment_status: Option<PaymentStatus>,
}

impl InstallmentPlan {
    /// A plain one-off entry.
    pub fn single(
        owner: &str,
        date: NaiveDate,
        kind: Kind,
        category: &str,
        description: Option<&str>,
        amount: Decimal,
    ) -> Self {
        InstallmentPlan {
            owner: owner.to_string(),
            start_date: date,
            kind,
            category: category.to_string(),
            description: description.map(str::to_string),
            amount,
            recurring: false,
            installments: 1,
            payment_status: None,
        }
    }

    pub fn monthly(mut self, installments: u32) -> Self {
        self.recurring = true;
        self.installments = installments;
        self
    }

    pub fn with_status(mut self, status: PaymentStatus) -> Self {
        self.payment_status = Some(status);
        self
    }

    /// Number of records this plan produces.
    pub fn len(&self) -> u32 {
        if self.recurring { self.installments } else { 1 }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Builds every record of the series without touching any store. Fails
    /// as a whole when the input is invalid.
    pub fn expand(&self) -> Result<Vec<NewTransaction>, LedgerError> {
        if self.recurring && !(1..=MAX_INSTALLMENTS).contains(&self.installments) {
            return Err(LedgerError::validation(format!(
                "Installment count must be between 1 and {}, got {}",
                MAX_INSTALLMENTS, self.installments
            )));
        }
        let category = normalize_category(&self.category);
        let description = normalize_description(self.description.as_deref());

        if !self.recurring {
            let txn = NewTransaction::new(
                &self.owner,
                self.start_date,
                Flow::new(self.kind, self.payment_status),
                &category,
                description.as_deref(),
                self.amount,
            )?;
            return Ok(vec![txn]);
        }

        let total = self.installments;
        let mut out = Vec::new();
        for i in 0..total {
            let date = add_months_clamped(self.start_date, i)?;
            // only the first installment may start out paid
            let status = if i == 0 {
                self.payment_status
            } else {
                Some(PaymentStatus::Pending)
            };
            let desc = installment_description(description.as_deref(), &category, i + 1, total);
            out.push(NewTransaction::new(
                &self.owner,
                date,
                Flow::new(self.kind, status),
                &category,
                Some(&desc),
                self.amount,
            )?);
        }
        Ok(out)
    }
}

/// Adds calendar months, clamping the day to the end of the target month
/// (Jan 31 + 1 month is Feb 28 or 29).
pub fn add_months_clamped(date: NaiveDate, months: u32) -> Result<NaiveDate, LedgerError> {
    date.checked_add_months(Months::new(months)).ok_or_else(|| {
        LedgerError::validation(format!("{} + {} months is out of range", date, months))
    })
}

pub fn installment_description(
    description: Option<&str>,
    category: &str,
    number: u32,
    total: u32,
) -> String {
    match description {
        Some(d) => format!("{} (Installment {}/{})", d, number, total),
        None => format!("Installment {}/{} of {}", number, total, category),
    }
}

/// Expands `plan` and writes one record per installment, returning the new
/// ids in series order.
///
/// Writes are not atomic: when installment `k > 0` fails, installments
/// `0..k` stay in the store and the error is [`LedgerError::PartialSeries`].
pub fn record_series<S>(store: &S, plan: &InstallmentPlan) -> Result<Vec<i64>, LedgerError>
where
    S: TransactionStore + ?Sized,
{
    let records = plan.expand()?;
    let total = records.len() as u32;
    let mut written = Vec::with_capacity(records.len());
    for (i, txn) in records.iter().enumerate() {
        match store.create(txn) {
            Ok(id) => {
                tracing::debug!(id, installment = i + 1, total, date = %txn.occurred_on, "installment written");
                written.push(id);
            }
            Err(err) if written.is_empty() => return Err(err),
            Err(err) => {
                tracing::warn!(
                    written = written.len(),
                    total,
                    error = %err,
                    "installment series stopped partway; written installments are kept"
                );
                return Err(LedgerError::PartialSeries {
                    written,
                    total,
                    source: Box::new(err),
                });
            }
        }
    }
    tracing::info!(owner = %plan.owner, total, recurring = plan.recurring, "series recorded");
    Ok(written)
}
