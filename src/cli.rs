// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

use crate::trend::MAX_TREND_MONTHS;

const SORT_KEYS: [&str; 5] = ["date", "description", "category", "total", "installments"];

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    )
}

/// Display filters shared by `tx list`, `report` and `export`.
fn filter_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("paid")
            .long("paid")
            .action(ArgAction::SetTrue)
            .help("Show paid transactions instead of unpaid ones"),
    )
    .arg(
        Arg::new("type")
            .long("type")
            .value_parser(["all", "income", "expense"])
            .default_value("all"),
    )
    .arg(
        Arg::new("include")
            .long("include")
            .value_name("IDS")
            .help("Only these category ids (comma separated)"),
    )
    .arg(
        Arg::new("exclude")
            .long("exclude")
            .value_name("IDS")
            .help("Drop these category ids (comma separated); uncategorized rows are kept"),
    )
    .arg(
        Arg::new("search")
            .long("search")
            .help("Case-insensitive text in the description"),
    )
    .arg(
        Arg::new("sort")
            .long("sort")
            .value_parser(SORT_KEYS)
            .default_value("date"),
    )
    .arg(
        Arg::new("order")
            .long("order")
            .value_parser(["asc", "desc"])
            .default_value("desc"),
    )
}

/// Fields of a transaction as entered by the user.
fn tx_fields(cmd: Command) -> Command {
    cmd.arg(Arg::new("description").long("description").required(true))
        .arg(
            Arg::new("amount")
                .long("amount")
                .required(true)
                .allow_hyphen_values(true),
        )
        .arg(
            Arg::new("type")
                .long("type")
                .required(true)
                .value_parser(["income", "expense"]),
        )
        .arg(
            Arg::new("date")
                .long("date")
                .help("YYYY-MM-DD of the first installment (defaults to today)"),
        )
        .arg(
            Arg::new("installments")
                .long("installments")
                .allow_hyphen_values(true)
                .help("Number of monthly installments (defaults to 1)"),
        )
        .arg(
            Arg::new("recurring")
                .long("recurring")
                .action(ArgAction::SetTrue)
                .help("Repeat the full amount every month with no end"),
        )
        .arg(Arg::new("category").long("category"))
        .arg(Arg::new("notes").long("notes"))
        .arg(
            Arg::new("subtype")
                .long("subtype")
                .value_parser(["salary", "manual", "other"]),
        )
}

/// Months before and after the reference month, overriding the stored window.
fn window_args(cmd: Command) -> Command {
    let months = || value_parser!(u32).range(0..=i64::from(MAX_TREND_MONTHS));
    cmd.arg(Arg::new("before").long("before").value_parser(months()))
        .arg(Arg::new("after").long("after").value_parser(months()))
}

fn id_arg() -> Arg {
    Arg::new("id").required(true).value_parser(value_parser!(i64))
}

pub fn build_cli() -> Command {
    Command::new("cashcal")
        .about("Installment-aware monthly income and expense ledger")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(Command::new("add").arg(Arg::new("name").required(true)))
                .subcommand(json_args(Command::new("list")))
                .subcommand(Command::new("rm").arg(Arg::new("name").required(true))),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and browse transactions")
                .subcommand(tx_fields(Command::new("add")))
                .subcommand(tx_fields(Command::new("edit").arg(id_arg())))
                .subcommand(Command::new("rm").arg(id_arg()))
                .subcommand(Command::new("pay").arg(id_arg()))
                .subcommand(json_args(Command::new("show").arg(id_arg())))
                .subcommand(json_args(filter_args(
                    Command::new("list").arg(
                        Arg::new("page")
                            .long("page")
                            .value_parser(value_parser!(usize))
                            .default_value("1"),
                    ),
                ))),
        )
        .subcommand(
            Command::new("salary")
                .about("Recurring salary income, listed apart from transactions")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("description").long("description").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("payday")
                                .long("payday")
                                .allow_hyphen_values(true)
                                .help("Day of month 1-28 (defaults to 5)"),
                        ),
                )
                .subcommand(json_args(Command::new("list")))
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("income")
                .about("Manually flagged income entries")
                .subcommand(json_args(Command::new("list"))),
        )
        .subcommand(
            Command::new("report")
                .about("Monthly summary and trend")
                .subcommand(json_args(filter_args(
                    Command::new("summary")
                        .arg(Arg::new("month").long("month").help("YYYY-MM"))
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .help("Scope the expense figure to one category"),
                        ),
                )))
                .subcommand(json_args(filter_args(window_args(
                    Command::new("trend").arg(Arg::new("month").long("month").help("YYYY-MM")),
                )))),
        )
        .subcommand(
            Command::new("export")
                .about("Write transactions or the trend series to a file")
                .subcommand(filter_args(
                    Command::new("transactions")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .value_parser(["csv", "json"])
                                .default_value("csv"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ))
                .subcommand(filter_args(window_args(
                    Command::new("trend")
                        .arg(Arg::new("month").long("month"))
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .value_parser(["csv", "json"])
                                .default_value("csv"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ))),
        )
        .subcommand(
            Command::new("config")
                .about("Persistent defaults")
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(
                            Arg::new("value")
                                .required(true)
                                .allow_hyphen_values(true),
                        ),
                )
                .subcommand(Command::new("get").arg(Arg::new("key").required(true)))
                .subcommand(Command::new("list")),
        )
        .subcommand(Command::new("doctor").about("Check stored transactions for inconsistencies"))
}
