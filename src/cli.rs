// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::installments::MAX_INSTALLMENTS;
use clap::{value_parser, Arg, ArgAction, ArgGroup, Command};

const MAX_TREND_WINDOW: i64 = 1200;

const KINDS: [&str; 3] = ["income", "expense", "investment"];
const STATUSES: [&str; 2] = ["pending", "paid"];
const SCOPES: [&str; 2] = ["mine", "household"];

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn scope_arg() -> Arg {
    Arg::new("scope")
        .long("scope")
        .value_parser(SCOPES)
        .default_value("mine")
        .help("Only your transactions, or the whole household")
}

fn month_arg() -> Arg {
    Arg::new("month")
        .long("month")
        .help("Month as YYYY-MM (defaults to the selected or current month)")
}

pub fn build_cli() -> Command {
    Command::new("duoledger")
        .about("Shared household ledger: income, expenses, investments, installments")
        .version(clap::crate_version!())
        .arg(
            Arg::new("user")
                .long("user")
                .short('u')
                .env("DUOLEDGER_USER")
                .global(true)
                .help("Acting user (owner of new transactions)"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("config").about("Settings").subcommand(
                Command::new("currency")
                    .about("Set the currency symbol used in reports")
                    .arg(Arg::new("symbol").long("symbol").required(true)),
            ),
        )
        .subcommand(
            Command::new("tx")
                .about("Log, list, edit and delete transactions")
                .subcommand(
                    Command::new("add")
                        .about("Log a transaction, optionally as monthly installments")
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD, defaults to today"))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .short('t')
                                .required(true)
                                .value_parser(KINDS),
                        )
                        .arg(Arg::new("category").long("category").short('c').required(true))
                        .arg(Arg::new("amount").long("amount").short('a').required(true))
                        .arg(Arg::new("desc").long("desc").short('d'))
                        .arg(
                            Arg::new("installments")
                                .long("installments")
                                .short('n')
                                .value_parser(
                                    value_parser!(u32).range(1..=i64::from(MAX_INSTALLMENTS)),
                                )
                                .help("Repeat monthly for N installments (amount is per installment)"),
                        )
                        .arg(
                            Arg::new("status")
                                .long("status")
                                .value_parser(STATUSES)
                                .help("Payment status for expenses"),
                        ),
                )
                .subcommand(json_args(
                    Command::new("list")
                        .about("List transactions, newest first")
                        .arg(month_arg())
                        .arg(
                            Arg::new("mine")
                                .long("mine")
                                .action(ArgAction::SetTrue)
                                .help("Only transactions you logged"),
                        )
                        .arg(Arg::new("type").long("type").value_parser(KINDS))
                        .arg(Arg::new("category").long("category"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("edit")
                        .about("Edit one of your transactions")
                        .arg(Arg::new("id").long("id").value_parser(value_parser!(i64)))
                        .arg(
                            Arg::new("cancel")
                                .long("cancel")
                                .action(ArgAction::SetTrue)
                                .help("Abandon the current edit"),
                        )
                        .group(
                            ArgGroup::new("target")
                                .args(["id", "cancel"])
                                .required(true),
                        )
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("type").long("type").value_parser(KINDS))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("desc").long("desc"))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("status").long("status").value_parser(STATUSES)),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Delete one of your transactions (two steps)")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .value_parser(value_parser!(i64))
                                .help("Mark a transaction for deletion"),
                        )
                        .arg(
                            Arg::new("confirm")
                                .long("confirm")
                                .action(ArgAction::SetTrue)
                                .help("Delete the marked transaction"),
                        )
                        .arg(
                            Arg::new("cancel")
                                .long("cancel")
                                .action(ArgAction::SetTrue)
                                .help("Keep the marked transaction"),
                        )
                        .group(
                            ArgGroup::new("step")
                                .args(["id", "confirm", "cancel"])
                                .required(true),
                        ),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Monthly summaries")
                .subcommand(json_args(
                    Command::new("summary")
                        .about("Totals, balance and category breakdown for a month")
                        .arg(month_arg())
                        .arg(scope_arg()),
                ))
                .subcommand(json_args(
                    Command::new("trend")
                        .about("Income vs expense over the trailing months")
                        .arg(month_arg())
                        .arg(scope_arg())
                        .arg(
                            Arg::new("window")
                                .long("window")
                                .value_parser(value_parser!(u32).range(1..=MAX_TREND_WINDOW))
                                .default_value("12"),
                        ),
                ))
                .subcommand(json_args(
                    Command::new("months")
                        .about("Months available for reports")
                        .arg(scope_arg()),
                )),
        )
        .subcommand(
            Command::new("category").about("Categories").subcommand(
                Command::new("suggest")
                    .about("Suggested and already used categories for a type")
                    .arg(
                        Arg::new("type")
                            .long("type")
                            .required(true)
                            .value_parser(KINDS),
                    ),
            ),
        )
        .subcommand(
            Command::new("export").about("Export data").subcommand(
                Command::new("transactions")
                    .about("Export the household transactions")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .value_parser(["csv", "json"])
                            .default_value("csv"),
                    )
                    .arg(Arg::new("out").long("out").required(true))
                    .arg(Arg::new("mine").long("mine").action(ArgAction::SetTrue)),
            ),
        )
        .subcommand(Command::new("doctor").about("Check stored transactions for inconsistencies"))
}
