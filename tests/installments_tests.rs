// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::cell::{Cell, RefCell};

use chrono::NaiveDate;
use duoledger::installments::{
    add_months_clamped, record_series, InstallmentPlan, MAX_INSTALLMENTS,
};
use duoledger::models::{Kind, NewTransaction, PaymentStatus, Transaction, TransactionPatch};
use duoledger::store::{SqliteStore, TransactionStore};
use duoledger::{db, LedgerError};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

#[test]
fn month_end_start_clamps_each_installment() {
    let plan = InstallmentPlan::single("Luiz", d("2024-01-31"), Kind::Expense, "rent", None, dec("100"))
        .monthly(3);
    let records = plan.expand().unwrap();
    let dates: Vec<NaiveDate> = records.iter().map(|r| r.occurred_on).collect();
    assert_eq!(dates, vec![d("2024-01-31"), d("2024-02-29"), d("2024-03-31")]);
    // every installment carries the full amount
    assert!(records.iter().all(|r| r.amount == dec("100")));
}

#[test]
fn clamping_handles_non_leap_years_and_year_rollover() {
    assert_eq!(add_months_clamped(d("2023-01-31"), 1).unwrap(), d("2023-02-28"));
    assert_eq!(add_months_clamped(d("2024-11-30"), 3).unwrap(), d("2025-02-28"));
    assert_eq!(add_months_clamped(d("2024-05-15"), 0).unwrap(), d("2024-05-15"));
}

#[test]
fn only_first_installment_keeps_caller_status() {
    let plan = InstallmentPlan::single("Iasmin", d("2024-03-10"), Kind::Expense, "tv", None, dec("250"))
        .monthly(4)
        .with_status(PaymentStatus::Paid);
    let statuses: Vec<_> = plan
        .expand()
        .unwrap()
        .iter()
        .map(|r| r.flow.payment_status())
        .collect();
    assert_eq!(
        statuses,
        vec![
            Some(PaymentStatus::Paid),
            Some(PaymentStatus::Pending),
            Some(PaymentStatus::Pending),
            Some(PaymentStatus::Pending),
        ]
    );
}

#[test]
fn non_expense_series_never_carries_status() {
    let plan = InstallmentPlan::single("Luiz", d("2024-03-10"), Kind::Investment, "ações", None, dec("50"))
        .monthly(2)
        .with_status(PaymentStatus::Paid);
    for r in plan.expand().unwrap() {
        assert_eq!(r.flow.payment_status(), None);
        assert_eq!(r.kind(), Kind::Investment);
    }
}

#[test]
fn descriptions_are_annotated_per_installment() {
    let with_desc = InstallmentPlan::single(
        "Luiz",
        d("2024-01-05"),
        Kind::Expense,
        "  eletrônicos ",
        Some("  Notebook "),
        dec("300"),
    )
    .monthly(2)
    .expand()
    .unwrap();
    assert_eq!(with_desc[0].description.as_deref(), Some("Notebook (Installment 1/2)"));
    assert_eq!(with_desc[1].description.as_deref(), Some("Notebook (Installment 2/2)"));
    assert_eq!(with_desc[0].category, "Eletrônicos");

    let without_desc = InstallmentPlan::single("Luiz", d("2024-01-05"), Kind::Expense, "MORADIA", Some("   "), dec("300"))
        .monthly(2)
        .expand()
        .unwrap();
    assert_eq!(
        without_desc[1].description.as_deref(),
        Some("Installment 2/2 of Moradia")
    );
}

#[test]
fn single_recurring_installment_is_annotated_but_plain_entry_is_not() {
    let recurring = InstallmentPlan::single("Luiz", d("2024-01-05"), Kind::Expense, "gym", None, dec("90"))
        .monthly(1)
        .expand()
        .unwrap();
    assert_eq!(recurring.len(), 1);
    assert_eq!(recurring[0].description.as_deref(), Some("Installment 1/1 of Gym"));

    let plain = InstallmentPlan::single("Luiz", d("2024-01-05"), Kind::Expense, "gym", None, dec("90"))
        .expand()
        .unwrap();
    assert_eq!(plain.len(), 1);
    assert_eq!(plain[0].description, None);
    assert_eq!(plain[0].flow.payment_status(), Some(PaymentStatus::Pending));
}

#[test]
fn zero_installments_are_rejected() {
    let err = InstallmentPlan::single("Luiz", d("2024-01-05"), Kind::Income, "salário", None, dec("10"))
        .monthly(0)
        .expand()
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
}

#[test]
fn oversized_series_is_rejected_before_writing() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    for count in [MAX_INSTALLMENTS + 1, u32::MAX] {
        let plan = InstallmentPlan::single("Luiz", d("2024-01-05"), Kind::Expense, "carro", None, dec("10"))
            .monthly(count);
        assert!(matches!(plan.expand(), Err(LedgerError::Validation(_))));
        assert!(matches!(record_series(&store, &plan), Err(LedgerError::Validation(_))));
    }
    assert!(store.list_all().unwrap().is_empty());

    let longest = InstallmentPlan::single("Luiz", d("2024-01-05"), Kind::Expense, "casa", None, dec("10"))
        .monthly(MAX_INSTALLMENTS);
    assert_eq!(longest.expand().unwrap().len(), MAX_INSTALLMENTS as usize);
}

#[test]
fn series_running_past_year_9999_writes_nothing() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let plan = InstallmentPlan::single("Iasmin", d("9999-11-01"), Kind::Expense, "aluguel", None, dec("900"))
        .monthly(3);
    assert!(matches!(record_series(&store, &plan), Err(LedgerError::Validation(_))));
    assert!(store.list_all().unwrap().is_empty());

    let fits = InstallmentPlan::single("Iasmin", d("9999-11-01"), Kind::Expense, "aluguel", None, dec("900"))
        .monthly(2);
    let ids = record_series(&store, &fits).unwrap();
    assert_eq!(ids.len(), 2);
    let dates: Vec<String> = store
        .list_all()
        .unwrap()
        .iter()
        .map(|t| t.occurred_on.to_string())
        .collect();
    assert_eq!(dates, vec!["9999-12-01", "9999-11-01"]);
}

#[test]
fn invalid_input_writes_nothing() {
    let conn = setup();
    let store = SqliteStore::new(&conn);

    let zero = InstallmentPlan::single("Luiz", d("2024-01-05"), Kind::Expense, "food", None, Decimal::ZERO)
        .monthly(3);
    assert!(matches!(record_series(&store, &zero), Err(LedgerError::Validation(_))));

    let negative = InstallmentPlan::single("Luiz", d("2024-01-05"), Kind::Expense, "food", None, dec("-5"));
    assert!(matches!(record_series(&store, &negative), Err(LedgerError::Validation(_))));

    let no_category = InstallmentPlan::single("Luiz", d("2024-01-05"), Kind::Expense, "   ", None, dec("5"))
        .monthly(2);
    assert!(matches!(record_series(&store, &no_category), Err(LedgerError::Validation(_))));

    assert!(store.list_all().unwrap().is_empty());
}

#[test]
fn series_is_written_in_order() {
    let conn = setup();
    let store = SqliteStore::new(&conn);
    let plan = InstallmentPlan::single("Iasmin", d("2024-10-31"), Kind::Expense, "sofá", Some("Loja"), dec("199.90"))
        .monthly(3)
        .with_status(PaymentStatus::Paid);
    let ids = record_series(&store, &plan).unwrap();
    assert_eq!(ids.len(), 3);

    let first = store.get(ids[0]).unwrap();
    let last = store.get(ids[2]).unwrap();
    assert_eq!(first.occurred_on, d("2024-10-31"));
    assert_eq!(first.payment_status(), Some(PaymentStatus::Paid));
    assert_eq!(last.occurred_on, d("2024-12-31"));
    assert_eq!(last.payment_status(), Some(PaymentStatus::Pending));
    assert_eq!(last.description.as_deref(), Some("Loja (Installment 3/3)"));
    assert_eq!(last.owner, "Iasmin");
}

/// Wraps a real store and starts failing after `ok_writes` creates.
struct FlakyStore<'c> {
    inner: SqliteStore<'c>,
    ok_writes: usize,
    calls: Cell<usize>,
    attempted: RefCell<Vec<NaiveDate>>,
}

impl TransactionStore for FlakyStore<'_> {
    fn create(&self, txn: &NewTransaction) -> Result<i64, LedgerError> {
        self.attempted.borrow_mut().push(txn.occurred_on);
        let n = self.calls.get();
        self.calls.set(n + 1);
        if n >= self.ok_writes {
            return Err(LedgerError::StoreUnavailable("connection dropped".into()));
        }
        self.inner.create(txn)
    }

    fn list_all(&self) -> Result<Vec<Transaction>, LedgerError> {
        self.inner.list_all()
    }

    fn get(&self, id: i64) -> Result<Transaction, LedgerError> {
        self.inner.get(id)
    }

    fn update(&self, id: i64, patch: &TransactionPatch) -> Result<(), LedgerError> {
        self.inner.update(id, patch)
    }

    fn delete(&self, id: i64) -> Result<(), LedgerError> {
        self.inner.delete(id)
    }
}

// A failed write partway through a series is not rolled back.
#[test]
fn partial_series_failure_keeps_written_installments() {
    let conn = setup();
    let store = FlakyStore {
        inner: SqliteStore::new(&conn),
        ok_writes: 2,
        calls: Cell::new(0),
        attempted: RefCell::new(Vec::new()),
    };
    let plan = InstallmentPlan::single("Luiz", d("2024-01-15"), Kind::Expense, "curso", None, dec("80"))
        .monthly(5);

    match record_series(&store, &plan) {
        Err(LedgerError::PartialSeries { written, total, source }) => {
            assert_eq!(written.len(), 2);
            assert_eq!(total, 5);
            assert!(matches!(*source, LedgerError::StoreUnavailable(_)));
        }
        other => panic!("expected partial series failure, got {:?}", other),
    }
    // nothing after the failure was attempted
    assert_eq!(store.attempted.borrow().len(), 3);
    assert_eq!(store.list_all().unwrap().len(), 2);
}

#[test]
fn failure_on_first_installment_is_reported_as_is() {
    let conn = setup();
    let store = FlakyStore {
        inner: SqliteStore::new(&conn),
        ok_writes: 0,
        calls: Cell::new(0),
        attempted: RefCell::new(Vec::new()),
    };
    let plan = InstallmentPlan::single("Luiz", d("2024-01-15"), Kind::Expense, "curso", None, dec("80"))
        .monthly(3);
    let err = record_series(&store, &plan).unwrap_err();
    assert!(matches!(err, LedgerError::StoreUnavailable(_)));
    assert!(store.list_all().unwrap().is_empty());
}
