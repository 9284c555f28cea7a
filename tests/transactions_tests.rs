// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cashcal::calendar::YearMonth;
use cashcal::commands::transactions::{insert_transaction, load_all, load_filtered};
use cashcal::commands::{categories, config, doctor, income, reports, salaries, transactions};
use cashcal::models::{IncomeSubtype, Installments, Kind, Transaction};
use cashcal::trend::compute_trend;
use cashcal::{cli, db, utils};
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&mut conn).unwrap();
    categories::add(&conn, "Food").unwrap();
    conn
}

fn run(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["cashcal"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("tx", sub)) => transactions::handle(conn, sub),
        Some(("category", sub)) => categories::handle(conn, sub),
        Some(("salary", sub)) => salaries::handle(conn, sub),
        Some(("config", sub)) => config::handle(conn, sub),
        Some(("report", sub)) => reports::handle(conn, sub),
        other => panic!("unexpected subcommand {:?}", other.map(|(n, _)| n)),
    }
}

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

#[test]
fn add_installment_expense_round_trips() {
    let conn = setup();
    run(&conn, &[
        "tx", "add", "--description", " Laptop ", "--amount", "1200", "--type", "expense",
        "--date", "2024-01-15", "--installments", "12", "--category", "Food",
    ])
    .unwrap();
    let txs = load_all(&conn).unwrap();
    assert_eq!(txs.len(), 1);
    let t = &txs[0];
    assert_eq!(t.description, "Laptop");
    assert_eq!(t.kind, Kind::Expense);
    assert_eq!(t.amount_total, dec("-1200"));
    assert_eq!(t.installments, Installments::Finite(12));
    assert_eq!(t.installment_amount, Some(dec("-100")));
    assert_eq!(t.category_name.as_deref(), Some("Food"));
    assert!(!t.is_paid);
}

#[test]
fn recurring_flag_overrides_installments() {
    let conn = setup();
    run(&conn, &[
        "tx", "add", "--description", "Gym", "--amount", "-50", "--type", "expense",
        "--date", "2024-03-10", "--installments", "6", "--recurring",
    ])
    .unwrap();
    let t = load_all(&conn).unwrap().remove(0);
    assert_eq!(t.installments, Installments::Unbounded);
    assert_eq!(t.amount_total, dec("-50"));
    assert_eq!(t.installment_amount, Some(dec("-50")));
}

#[test]
fn bad_date_and_count_are_coerced() {
    let conn = setup();
    run(&conn, &[
        "tx", "add", "--description", "Odd", "--amount", "30", "--type", "expense",
        "--date", "2024-02-30", "--installments", "-2",
    ])
    .unwrap();
    run(&conn, &[
        "tx", "add", "--description", "Odd2", "--amount", "30", "--type", "income",
        "--installments", "many",
    ])
    .unwrap();
    let txs = load_all(&conn).unwrap();
    assert_eq!(txs[0].date, utils::today());
    assert_eq!(txs[0].installments, Installments::Finite(1));
    assert_eq!(txs[1].installments, Installments::Finite(1));
    assert_eq!(txs[1].amount_total, dec("30"));
}

#[test]
fn invalid_amount_is_rejected() {
    let conn = setup();
    let err = run(&conn, &[
        "tx", "add", "--description", "X", "--amount", "twelve", "--type", "expense",
    ])
    .unwrap_err();
    assert!(err.to_string().contains("Invalid decimal"));
    assert!(load_all(&conn).unwrap().is_empty());
}

#[test]
fn pay_is_one_way_and_edit_keeps_it() {
    let conn = setup();
    run(&conn, &["tx", "add", "--description", "Phone", "--amount", "90", "--type", "expense"]).unwrap();
    let id = load_all(&conn).unwrap()[0].id.to_string();
    run(&conn, &["tx", "pay", &id]).unwrap();
    run(&conn, &["tx", "pay", &id]).unwrap();
    run(&conn, &[
        "tx", "edit", &id, "--description", "Phone bill", "--amount", "95", "--type", "expense",
        "--date", "2024-04-01", "--installments", "2",
    ])
    .unwrap();
    let t = load_all(&conn).unwrap().remove(0);
    assert!(t.is_paid);
    assert_eq!(t.description, "Phone bill");
    assert_eq!(t.installment_amount, Some(dec("-47.5")));
    assert_eq!(t.date, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
}

#[test]
fn missing_transaction_reports_not_found() {
    let conn = setup();
    let err = run(&conn, &["tx", "pay", "42"]).unwrap_err();
    assert_eq!(err.to_string(), "Transaction 42 not found");
    let err = run(&conn, &["tx", "rm", "42"]).unwrap_err();
    assert_eq!(err.to_string(), "Transaction 42 not found");
}

#[test]
fn deleting_category_keeps_its_transactions() {
    let conn = setup();
    run(&conn, &[
        "tx", "add", "--description", "Lunch", "--amount", "20", "--type", "expense", "--category", "Food",
    ])
    .unwrap();
    run(&conn, &["category", "rm", "Food"]).unwrap();
    let txs = load_all(&conn).unwrap();
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].category_id, None);
    assert_eq!(txs[0].category_name, None);
    assert!(categories::list_categories(&conn).unwrap().is_empty());
}

#[test]
fn category_removal_reports_cleared_rows() {
    let conn = setup();
    for desc in ["Lunch", "Dinner"] {
        run(&conn, &[
            "tx", "add", "--description", desc, "--amount", "20", "--type", "expense", "--category", "Food",
        ])
        .unwrap();
    }
    assert_eq!(categories::remove(&conn, "Food").unwrap(), 2);
    assert!(categories::remove(&conn, "Food").is_err());
    assert!(load_all(&conn).unwrap().iter().all(|t| t.category_id.is_none()));
}

#[test]
fn duplicate_category_is_rejected() {
    let conn = setup();
    let err = categories::add(&conn, " Food ").unwrap_err();
    assert_eq!(err.to_string(), "Category 'Food' already exists");
    let err = run(&conn, &[
        "tx", "add", "--description", "X", "--amount", "1", "--type", "expense", "--category", "Nope",
    ])
    .unwrap_err();
    assert_eq!(err.to_string(), "Category 'Nope' not found");
}

#[test]
fn list_filters_are_read_from_arguments() {
    let conn = setup();
    let food = utils::id_for_category(&conn, "Food").unwrap();
    run(&conn, &["tx", "add", "--description", "Lunch", "--amount", "20", "--type", "expense", "--category", "Food"]).unwrap();
    run(&conn, &["tx", "add", "--description", "Bus", "--amount", "3", "--type", "expense"]).unwrap();
    run(&conn, &["tx", "add", "--description", "Gift", "--amount", "40", "--type", "income", "--subtype", "manual"]).unwrap();

    let exclude = food.to_string();
    let matches = cli::build_cli().get_matches_from([
        "cashcal", "tx", "list", "--exclude", exclude.as_str(), "--sort", "description", "--order", "asc",
    ]);
    let Some(("tx", tx_m)) = matches.subcommand() else {
        panic!("no tx subcommand");
    };
    let Some(("list", list_m)) = tx_m.subcommand() else {
        panic!("no list subcommand");
    };
    let rows = load_filtered(&conn, list_m).unwrap();
    let names: Vec<&str> = rows.iter().map(|t| t.description.as_str()).collect();
    assert_eq!(names, vec!["Bus"]);
}

#[test]
fn salaries_are_kept_out_of_the_main_list() {
    let conn = setup();
    run(&conn, &["salary", "add", "--description", "ACME", "--amount", "5000", "--payday", "40"]).unwrap();
    let all = load_all(&conn).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].income_subtype, Some(IncomeSubtype::Salary));
    assert_eq!(all[0].installments, Installments::Unbounded);

    let matches = cli::build_cli().get_matches_from(["cashcal", "tx", "list"]);
    let (_, tx_m) = matches.subcommand().unwrap();
    let (_, list_m) = tx_m.subcommand().unwrap();
    assert!(load_filtered(&conn, list_m).unwrap().is_empty());

    assert_eq!(salaries::list_salaries(&conn).unwrap().len(), 1);
    let id = all[0].id.to_string();
    run(&conn, &["salary", "rm", &id]).unwrap();
    assert!(run(&conn, &["salary", "rm", &id]).is_err());
}

#[test]
fn salary_starts_on_next_payday() {
    let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
    assert_eq!(salaries::salary_start(d(2024, 3, 2), 5), d(2024, 3, 5));
    assert_eq!(salaries::salary_start(d(2024, 3, 5), 5), d(2024, 3, 5));
    assert_eq!(salaries::salary_start(d(2024, 3, 6), 5), d(2024, 4, 5));
    assert_eq!(salaries::salary_start(d(2024, 12, 20), 10), d(2025, 1, 10));
    assert_eq!(salaries::parse_payday(Some("0")), 5);
    assert_eq!(salaries::parse_payday(Some("28")), 28);
    assert_eq!(salaries::parse_payday(None), 5);
}

#[test]
fn manual_income_list_keeps_latest_ten() {
    let conn = setup();
    for day in 1..=12 {
        let date = format!("2024-05-{:02}", day);
        run(&conn, &[
            "tx", "add", "--description", "Tip", "--amount", "10", "--type", "income",
            "--subtype", "manual", "--date", &date,
        ])
        .unwrap();
    }
    let recent = income::recent_manual_income(&conn).unwrap();
    assert_eq!(recent.len(), 10);
    assert_eq!(recent[0].date, NaiveDate::from_ymd_opt(2024, 5, 12).unwrap());
    assert_eq!(recent[9].date, NaiveDate::from_ymd_opt(2024, 5, 3).unwrap());
}

#[test]
fn config_overrides_trend_window() {
    let conn = setup();
    assert_eq!(utils::trend_window(&conn).unwrap().before, 3);
    run(&conn, &["config", "set", "trend_before", "6"]).unwrap();
    run(&conn, &["config", "set", "page_size", "10"]).unwrap();
    assert_eq!(utils::trend_window(&conn).unwrap().before, 6);
    assert_eq!(utils::trend_window(&conn).unwrap().after, 9);
    assert_eq!(utils::page_size(&conn).unwrap(), 10);
    assert!(run(&conn, &["config", "set", "colour", "red"]).is_err());
    assert!(run(&conn, &["config", "set", "trend_after", "-1"]).is_err());
    assert!(run(&conn, &["config", "set", "trend_before", "3000000000"]).is_err());
    assert_eq!(utils::trend_window(&conn).unwrap().before, 6);
    run(&conn, &["config", "set", "page_size", "5000"]).unwrap();
}

#[test]
fn window_flags_are_bounded() {
    let too_far = cli::build_cli().try_get_matches_from([
        "cashcal", "report", "trend", "--before", "3000000000",
    ]);
    assert!(too_far.is_err());
    let ok = cli::build_cli().try_get_matches_from([
        "cashcal", "export", "trend", "--after", "1200", "--out", "t.csv",
    ]);
    assert!(ok.is_ok());
}

#[test]
fn doctor_flags_sign_mismatch() {
    let conn = setup();
    conn.execute(
        "INSERT INTO transactions(description, amount_total, kind, date) VALUES (?1, ?2, ?3, ?4)",
        params!["Broken", "25", "expense", "2024-01-01"],
    )
    .unwrap();
    let rows = doctor::check(&conn).unwrap();
    assert!(rows.iter().any(|r| r[0] == "sign_kind_mismatch"));
}

fn report_matches(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["cashcal", "report"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    let (_, report_m) = matches.subcommand().unwrap();
    let (_, sub) = report_m.subcommand().unwrap();
    sub.clone()
}

/// May 2024: 30 small unpaid expenses, one paid expense, a Food expense,
/// one salary and one other income. The page size is 2.
fn reporting_ledger() -> (Connection, i64) {
    let conn = setup();
    let food = utils::id_for_category(&conn, "Food").unwrap();
    let d = |day| NaiveDate::from_ymd_opt(2024, 5, day).unwrap();
    for i in 0..30 {
        let mut t = Transaction::new(Kind::Expense, dec("1"), d(10), Installments::default());
        t.description = format!("Snack {}", i);
        insert_transaction(&conn, &t).unwrap();
    }
    let mut rent = Transaction::new(Kind::Expense, dec("500"), d(1), Installments::default());
    rent.description = "Rent".into();
    rent.is_paid = true;
    insert_transaction(&conn, &rent).unwrap();
    let mut groceries = Transaction::new(Kind::Expense, dec("40"), d(12), Installments::default());
    groceries.description = "Groceries".into();
    groceries.category_id = Some(food);
    insert_transaction(&conn, &groceries).unwrap();
    let mut salary = Transaction::new(Kind::Income, dec("5000"), d(5), Installments::Unbounded);
    salary.description = "ACME".into();
    salary.income_subtype = Some(IncomeSubtype::Salary);
    insert_transaction(&conn, &salary).unwrap();
    let mut sold = Transaction::new(Kind::Income, dec("200"), d(20), Installments::default());
    sold.description = "Sold bike".into();
    sold.income_subtype = Some(IncomeSubtype::Other);
    insert_transaction(&conn, &sold).unwrap();
    config::set(&conn, "page_size", "2").unwrap();
    (conn, food)
}

fn summary_for(
    conn: &Connection,
    args: &[&str],
    category: Option<(i64, String)>,
) -> reports::SummaryReport {
    let sub = report_matches(args);
    let txs = load_filtered(conn, &sub).unwrap();
    reports::build_summary(&txs, YearMonth::new(2024, 5).unwrap(), category)
}

#[test]
fn summary_covers_every_filtered_row_not_just_one_page() {
    let (conn, food) = reporting_ledger();
    
    let listed = load_filtered(&conn, &report_matches(&["summary"])).unwrap();
    assert_eq!(listed.len(), 32);
    assert_eq!(utils::page_size(&conn).unwrap(), 2);

    let all = summary_for(&conn, &["summary", "--month", "2024-05"], None);
    assert_eq!(all.income, dec("200.00"));
    assert_eq!(all.expense, dec("70.00"));
    assert_eq!(all.balance, dec("130.00"));

    let scoped = summary_for(&conn, &["summary", "--month", "2024-05"], Some((food, "Food".into())));
    assert_eq!(scoped.expense, dec("40.00"));
    assert_eq!(scoped.balance, dec("130.00"));

    let expenses = summary_for(&conn, &["summary", "--type", "expense"], None);
    assert_eq!(expenses.income, Decimal::ZERO);
    assert_eq!(expenses.expense, dec("70.00"));

    let exclude = food.to_string();
    let no_food = summary_for(&conn, &["summary", "--exclude", exclude.as_str()], None);
    assert_eq!(no_food.expense, dec("30.00"));
    let only_food = summary_for(&conn, &["summary", "--include", exclude.as_str()], None);
    assert_eq!(only_food.expense, dec("40.00"));
    assert_eq!(only_food.income, Decimal::ZERO);

    let snacks = summary_for(&conn, &["summary", "--search", "SNACK"], None);
    assert_eq!(snacks.expense, dec("30.00"));

    let paid = summary_for(&conn, &["summary", "--paid"], None);
    assert_eq!(paid.expense, dec("500.00"));
    assert_eq!(paid.income, Decimal::ZERO);

    run(&conn, &["report", "summary", "--month", "2024-05", "--category", "Food", "--json"]).unwrap();
    assert!(run(&conn, &["report", "summary", "--category", "Nope"]).is_err());
}

#[test]
fn trend_uses_the_same_filtered_rows() {
    let (conn, _) = reporting_ledger();
    let sub = report_matches(&["trend", "--month", "2024-05", "--before", "1", "--after", "1"]);
    let window = reports::resolve_window(&conn, &sub).unwrap();
    assert_eq!((window.before, window.after), (1, 1));
    let t = compute_trend(&load_filtered(&conn, &sub).unwrap(), YearMonth::new(2024, 5).unwrap(), window);
    assert_eq!(t.labels, vec!["04/2024", "05/2024", "06/2024"]);
    assert_eq!(t.expense, vec![Decimal::ZERO, dec("70.00"), Decimal::ZERO]);
    assert_eq!(t.income, vec![Decimal::ZERO, dec("200.00"), Decimal::ZERO]);

    run(&conn, &["report", "trend", "--month", "2024-05", "--type", "expense"]).unwrap();
}
