// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Aggregates over stored transactions: totals, category breakdowns,
//! selectable months, the income/expense trend, and the composition of a
//! month's income versus expense.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::LedgerError;
use crate::models::{Kind, Transaction};
use crate::period::Period;

pub const DEFAULT_TREND_WINDOW: usize = 12;

/// Whose records a report covers. Every user may read the whole household.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Owner(String),
    Household,
}

impl Scope {
    pub fn includes(&self, txn: &Transaction) -> bool {
        match self {
            Scope::Owner(user) => txn.is_owned_by(user),
            Scope::Household => true,
        }
    }

    pub fn filter<'a, I>(&self, records: I) -> Vec<&'a Transaction>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        records.into_iter().filter(|t| self.includes(t)).collect()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub income: Decimal,
    pub expense: Decimal,
    pub investment: Decimal,
}

impl Totals {
    pub fn get(&self, kind: Kind) -> Decimal {
        match kind {
            Kind::Income => self.income,
            Kind::Expense => self.expense,
            Kind::Investment => self.investment,
        }
    }

    pub fn net_balance(&self) -> Decimal {
        net_balance(self)
    }
}

pub fn totals_by_kind<'a, I>(records: I) -> Totals
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut totals = Totals::default();
    for t in records {
        match t.kind() {
            Kind::Income => totals.income += t.amount,
            Kind::Expense => totals.expense += t.amount,
            Kind::Investment => totals.investment += t.amount,
        }
    }
    totals
}

/// Income minus everything that left the account. Investments count as an
/// outflow here even though the trend series leaves them out.
pub fn net_balance(totals: &Totals) -> Decimal {
    totals.income - (totals.expense + totals.investment)
}

pub fn group_by_category<'a, I>(records: I, kind: Kind) -> BTreeMap<String, Decimal>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut agg: BTreeMap<String, Decimal> = BTreeMap::new();
    for t in records.into_iter().filter(|t| t.kind() == kind) {
        *agg.entry(t.category.clone()).or_insert(Decimal::ZERO) += t.amount;
    }
    agg
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub amount: Decimal,
    /// Percentage of the kind's total, two decimal places.
    pub share: Decimal,
}

/// Pie-style breakdown: largest category first, ties by name.
pub fn category_breakdown<'a, I>(records: I, kind: Kind) -> Vec<CategoryShare>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let grouped = group_by_category(records, kind);
    let total: Decimal = grouped.values().copied().sum();
    let mut items: Vec<CategoryShare> = grouped
        .into_iter()
        .map(|(category, amount)| {
            let share = if total.is_zero() {
                Decimal::ZERO
            } else {
                (amount * Decimal::ONE_HUNDRED / total).round_dp(2)
            };
            CategoryShare {
                category,
                amount,
                share,
            }
        })
        .collect();
    items.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.category.cmp(&b.category)));
    items
}

/// Months that can be picked for a report, newest first. `current` is always
/// offered so the present month can be selected before anything is logged.
pub fn available_periods<'a, I>(records: I, current: Period) -> Vec<Period>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut set: BTreeSet<Period> = records.into_iter().map(Transaction::period).collect();
    set.insert(current);
    set.into_iter().rev().collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub period: Period,
    pub income: Decimal,
    pub expense: Decimal,
}

/// Income and expense for up to `window_size` months ending at `anchor`,
/// oldest first. Only months that have at least one record appear; a month
/// lacking one of the two kinds reports zero for it. Investments are not
/// part of the series.
pub fn trailing_window<'a, I>(records: I, anchor: Period, window_size: usize) -> Vec<TrendPoint>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    if window_size == 0 {
        return Vec::new();
    }
    let back = i64::try_from(window_size - 1).unwrap_or(i64::MAX);
    let first = anchor.offset(-back).unwrap_or(Period::EARLIEST);
    let mut points: BTreeMap<Period, TrendPoint> = BTreeMap::new();
    for t in records {
        let p = t.period();
        if p < first || p > anchor {
            continue;
        }
        let point = points.entry(p).or_insert(TrendPoint {
            period: p,
            income: Decimal::ZERO,
            expense: Decimal::ZERO,
        });
        match t.kind() {
            Kind::Income => point.income += t.amount,
            Kind::Expense => point.expense += t.amount,
            Kind::Investment => {}
        }
    }
    points.into_values().collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentLabel {
    DeficitNoIncome,
    Covered,
    Surplus,
    FullyCovered,
    CoveredByIncome,
    ExcessDeficit,
}

impl SegmentLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            SegmentLabel::DeficitNoIncome => "deficit, no income",
            SegmentLabel::Covered => "covered",
            SegmentLabel::Surplus => "surplus",
            SegmentLabel::FullyCovered => "fully covered",
            SegmentLabel::CoveredByIncome => "covered by income",
            SegmentLabel::ExcessDeficit => "excess deficit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub amount: Decimal,
    pub label: SegmentLabel,
}

impl Segment {
    fn new(amount: Decimal, label: SegmentLabel) -> Self {
        Segment { amount, label }
    }
}

/// How a month's expense relates to its income. Segments are never zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "framing", content = "segments", rename_all = "snake_case")]
pub enum Composition {
    NoData,
    Segments(Vec<Segment>),
}

impl Composition {
    pub fn segments(&self) -> &[Segment] {
        match self {
            Composition::NoData => &[],
            Composition::Segments(s) => s,
        }
    }
}

pub fn classify(income: Decimal, expense: Decimal) -> Result<Composition, LedgerError> {
    use SegmentLabel::*;

    if income < Decimal::ZERO {
        return Err(LedgerError::validation("Income total cannot be negative"));
    }
    if expense < Decimal::ZERO {
        return Err(LedgerError::validation("Expense total cannot be negative"));
    }

    let composition = if income.is_zero() && expense.is_zero() {
        Composition::NoData
    } else if income.is_zero() {
        Composition::Segments(vec![Segment::new(expense, DeficitNoIncome)])
    } else if expense <= income {
        let surplus = income - expense;
        if expense.is_zero() {
            Composition::Segments(vec![Segment::new(surplus, Surplus)])
        } else if surplus.is_zero() {
            Composition::Segments(vec![Segment::new(expense, FullyCovered)])
        } else {
            Composition::Segments(vec![
                Segment::new(expense, Covered),
                Segment::new(surplus, Surplus),
            ])
        }
    } else {
        Composition::Segments(vec![
            Segment::new(income, CoveredByIncome),
            Segment::new(expense - income, ExcessDeficit),
        ])
    };
    Ok(composition)
}

/// Everything a month report shows for one scope.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodSummary {
    pub period: Period,
    pub totals: Totals,
    pub net_balance: Decimal,
    pub expense_by_category: Vec<CategoryShare>,
    pub income_by_category: Vec<CategoryShare>,
    pub investment_by_category: Vec<CategoryShare>,
    pub composition: Composition,
    pub count: usize,
}

impl PeriodSummary {
    pub fn build(records: &[Transaction], scope: &Scope, period: Period) -> Result<Self, LedgerError> {
        let selected: Vec<&Transaction> = scope
            .filter(records)
            .into_iter()
            .filter(|t| t.period() == period)
            .collect();
        let totals = totals_by_kind(selected.iter().copied());
        Ok(PeriodSummary {
            period,
            totals,
            net_balance: totals.net_balance(),
            expense_by_category: category_breakdown(selected.iter().copied(), Kind::Expense),
            income_by_category: category_breakdown(selected.iter().copied(), Kind::Income),
            investment_by_category: category_breakdown(selected.iter().copied(), Kind::Investment),
            composition: classify(totals.income, totals.expense)?,
            count: selected.len(),
        })
    }
}
