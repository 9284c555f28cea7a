// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cashcal::amortize::{contribution, expense_due, income_due, installment_magnitude, schedule};
use cashcal::calendar::{YearMonth, add_months};
use cashcal::models::{Installments, Kind, Transaction};
use chrono::NaiveDate;
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn ym(y: i32, m: u32) -> YearMonth {
    YearMonth::new(y, m).unwrap()
}

fn expense(amount: &str, date: NaiveDate, installments: Installments) -> Transaction {
    Transaction::new(Kind::Expense, dec(amount), date, installments)
}

#[test]
fn twelve_installments_land_one_per_month() {
    let t = expense("1200", d(2024, 1, 15), Installments::finite(12));
    assert_eq!(t.amount_total, dec("-1200"));
    for m in 1..=12 {
        assert_eq!(expense_due(&t, ym(2024, m)).round_dp(2), dec("100.00"), "month {}", m);
    }
    assert_eq!(expense_due(&t, ym(2023, 12)), Decimal::ZERO);
    assert_eq!(expense_due(&t, ym(2025, 1)), Decimal::ZERO);
}

#[test]
fn installments_add_up_to_the_total() {
    for (amount, n) in [("100", 3), ("1200", 12), ("99.99", 7), ("10", 1), ("0.05", 4)] {
        let t = expense(amount, d(2024, 1, 31), Installments::finite(n));
        let start = ym(2023, 6);
        let total: Decimal = (0..48).map(|i| expense_due(&t, start.add(i))).sum();
        assert_eq!(total.round_dp(2), dec(amount).round_dp(2), "{} over {}", amount, n);
    }
}

#[test]
fn recurring_expense_starts_in_its_month_and_never_ends() {
    let t = expense("50", d(2024, 3, 10), Installments::Unbounded);
    assert!(t.is_recurring());
    assert_eq!(expense_due(&t, ym(2024, 2)), Decimal::ZERO);
    assert_eq!(expense_due(&t, ym(2024, 3)), dec("50"));
    assert_eq!(expense_due(&t, ym(2024, 4)), dec("50"));
    assert_eq!(expense_due(&t, ym(2031, 11)), dec("50"));
}

#[test]
fn income_counts_only_in_its_own_month() {
    let t = Transaction::new(Kind::Income, dec("3000"), d(2024, 5, 1), Installments::default());
    assert_eq!(income_due(&t, ym(2024, 5)), dec("3000"));
    assert_eq!(income_due(&t, ym(2024, 4)), Decimal::ZERO);
    assert_eq!(income_due(&t, ym(2024, 6)), Decimal::ZERO);
    assert_eq!(expense_due(&t, ym(2024, 5)), Decimal::ZERO);
}

#[test]
fn income_is_never_spread_even_when_recurring_or_split() {
    let salary = Transaction::new(Kind::Income, dec("4000"), d(2024, 2, 5), Installments::Unbounded);
    assert_eq!(income_due(&salary, ym(2024, 2)), dec("4000"));
    assert_eq!(income_due(&salary, ym(2024, 3)), Decimal::ZERO);

    let split = Transaction::new(Kind::Income, dec("600"), d(2024, 2, 5), Installments::finite(3));
    assert_eq!(income_due(&split, ym(2024, 2)), dec("600"));
    assert_eq!(income_due(&split, ym(2024, 3)), Decimal::ZERO);
}

#[test]
fn single_installment_matches_unsplit_expense() {
    let mut plain = expense("80", d(2024, 7, 20), Installments::finite(1));
    plain.installment_amount = None;
    let one = expense("80", d(2024, 7, 20), Installments::finite(1));
    for i in -3..4 {
        let m = ym(2024, 7).add(i);
        assert_eq!(contribution(&plain, m), contribution(&one, m));
    }
    assert_eq!(expense_due(&one, ym(2024, 7)), dec("80"));
}

#[test]
fn non_positive_counts_are_treated_as_one() {
    assert_eq!(Installments::finite(0), Installments::Finite(1));
    assert_eq!(Installments::finite(-4), Installments::Finite(1));

    let mut t = expense("90", d(2024, 1, 1), Installments::Finite(0));
    t.installment_amount = None;
    assert_eq!(installment_magnitude(&t), dec("90"));
    assert_eq!(expense_due(&t, ym(2024, 1)), dec("90"));
    assert_eq!(expense_due(&t, ym(2024, 2)), Decimal::ZERO);
}

#[test]
fn missing_installment_amount_is_derived_from_total() {
    let mut t = expense("300", d(2024, 1, 1), Installments::finite(3));
    t.installment_amount = None;
    assert_eq!(installment_magnitude(&t), dec("100"));
    assert_eq!(expense_due(&t, ym(2024, 3)), dec("100"));
    assert_eq!(expense_due(&t, ym(2024, 4)), Decimal::ZERO);
}

#[test]
fn matching_agrees_with_shifted_dates() {
    let t = expense("500", d(2024, 1, 31), Installments::finite(5));
    for i in -2..8 {
        let m = ym(2024, 1).add(i);
        let by_dates = (0..5)
            .filter_map(|k| add_months(t.date, k))
            .any(|dt| YearMonth::from_date(dt) == m);
        assert_eq!(expense_due(&t, m) > Decimal::ZERO, by_dates, "{}", m);
    }
}

#[test]
fn schedule_lists_clamped_dates() {
    let t = expense("300", d(2024, 1, 31), Installments::finite(3));
    assert_eq!(schedule(&t), vec![d(2024, 1, 31), d(2024, 2, 29), d(2024, 3, 31)]);
    let r = expense("10", d(2024, 1, 31), Installments::Unbounded);
    assert!(schedule(&r).is_empty());
}

#[test]
fn schedule_stops_at_the_last_representable_date() {
    let t = expense("90", NaiveDate::MAX, Installments::Finite(u32::MAX));
    assert_eq!(schedule(&t), vec![NaiveDate::MAX]);
}
