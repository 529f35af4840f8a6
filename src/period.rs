// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Calendar month keys (`YYYY-MM`) used for all grouping.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

const MONTH_NAMES_PT: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

/// A calendar month. Ordering is chronological, which matches the
/// lexicographic order of the `YYYY-MM` key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    pub const EARLIEST: Period = Period { year: 0, month: 1 };

    pub fn new(year: i32, month: u32) -> Result<Self, LedgerError> {
        if !(1..=12).contains(&month) {
            return Err(LedgerError::validation(format!(
                "Invalid month number {}",
                month
            )));
        }
        if !(0..=9999).contains(&year) {
            return Err(LedgerError::validation(format!("Invalid year {}", year)));
        }
        Ok(Period { year, month })
    }

    /// Rejects dates whose month has no `YYYY-MM` key.
    pub fn check_date(date: NaiveDate) -> Result<Self, LedgerError> {
        Period::new(date.year(), date.month())
            .map_err(|_| LedgerError::validation(format!("Date {} is out of range", date)))
    }

    /// The single place a period key is derived from a date.
    pub fn of(date: NaiveDate) -> Self {
        Period {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn current() -> Self {
        Period::of(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Shift by a signed number of months. `None` when the result falls
    /// outside years 0000 to 9999.
    pub fn offset(&self, months: i64) -> Option<Self> {
        let idx = (i64::from(self.year) * 12 + i64::from(self.month) - 1).checked_add(months)?;
        let year = i32::try_from(idx.div_euclid(12)).ok()?;
        Period::new(year, idx.rem_euclid(12) as u32 + 1).ok()
    }

    /// Human label such as `Janeiro de 2024`.
    pub fn label(&self) -> String {
        format!("{} de {}", MONTH_NAMES_PT[self.month as usize - 1], self.year)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LedgerError::validation(format!("Invalid month '{}', expected YYYY-MM", s));
        let (y, m) = s.trim().split_once('-').ok_or_else(invalid)?;
        if y.len() != 4 || m.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = y.parse().map_err(|_| invalid())?;
        let month: u32 = m.parse().map_err(|_| invalid())?;
        Period::new(year, month).map_err(|_| invalid())
    }
}

impl TryFrom<String> for Period {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(p: Period) -> Self {
        p.to_string()
    }
}
