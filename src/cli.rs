// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
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
            .help("Print one JSON object per line"),
    )
}

pub fn build_cli() -> Command {
    Command::new("tradeblock")
        .about("Fantasy football league companion: rosters, picks, interests, and trades")
        .version(clap::crate_version!())
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .help("Path to a TOML config file"),
        )
        .subcommand(Command::new("init").about("Create the local store"))
        .subcommand(
            Command::new("login")
                .about("Sign in as a league member")
                .arg(Arg::new("user").long("user").required(true))
                .arg(Arg::new("email").long("email").required(true))
                .arg(
                    Arg::new("team")
                        .long("team")
                        .help("Team to act for; defaults to the team named like the email prefix"),
                ),
        )
        .subcommand(Command::new("logout").about("Sign out"))
        .subcommand(Command::new("whoami").about("Show the signed-in member"))
        .subcommand(
            Command::new("league")
                .about("League roster")
                .subcommand(Command::new("teams").about("List configured teams")),
        )
        .subcommand(Command::new("sync").about("Drop cached sheets and fetch them again"))
        .subcommand(
            Command::new("cache").about("Spreadsheet cache").subcommand(
                Command::new("clear")
                    .about("Forget cached ranges")
                    .arg(Arg::new("range").long("range").help("Only this range")),
            ),
        )
        .subcommand(
            Command::new("assets")
                .about("Players and draft picks")
                .subcommand(json_flags(
                    Command::new("list")
                        .about("Search the master list")
                        .arg(Arg::new("search").long("search").help("Name contains (any case)"))
                        .arg(
                            Arg::new("team")
                                .long("team")
                                .action(ArgAction::Append)
                                .help("Team to include; repeatable, 'All' for every team"),
                        )
                        .arg(
                            Arg::new("position")
                                .long("position")
                                .action(ArgAction::Append)
                                .help("Position to include; repeatable, 'Picks' for draft picks"),
                        )
                        .arg(
                            Arg::new("sort")
                                .long("sort")
                                .default_value("highest")
                                .help("highest|lowest 2025 price"),
                        ),
                ))
                .subcommand(json_flags(
                    Command::new("team")
                        .about("Assets of teams whose name contains the given text")
                        .arg(Arg::new("name").long("name").required(true)),
                ))
                .subcommand(
                    Command::new("export")
                        .about("Write the master list to a file")
                        .arg(Arg::new("format").long("format").default_value("csv"))
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(
            Command::new("interest")
                .about("Assets you are interested in")
                .subcommand(json_flags(Command::new("list").about("Your interests")))
                .subcommand(
                    Command::new("toggle")
                        .about("Mark or unmark interest in an asset")
                        .arg(Arg::new("asset").long("asset").required(true).help("Asset id or name"))
                        .arg(Arg::new("team").long("team").help("Owning team when --asset is a name")),
                ),
        )
        .subcommand(
            Command::new("trades")
                .about("Trade history ledger")
                .subcommand(json_flags(
                    Command::new("history")
                        .about("Trades grouped by year")
                        .arg(Arg::new("year").long("year").help("Two-digit year, e.g. 24")),
                )),
        )
        .subcommand(
            Command::new("proposals")
                .about("Trade proposals")
                .subcommand(
                    Command::new("submit")
                        .about("Propose a trade to another team")
                        .arg(Arg::new("to").long("to").required(true))
                        .arg(
                            Arg::new("offer")
                                .long("offer")
                                .action(ArgAction::Append)
                                .help("Asset you give (id or name); repeatable or comma separated"),
                        )
                        .arg(
                            Arg::new("request")
                                .long("request")
                                .action(ArgAction::Append)
                                .help("Asset you want (id or name); repeatable or comma separated"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("inbox").about("Pending proposals sent to your team"),
                ))
                .subcommand(
                    Command::new("respond")
                        .about("Answer a proposal")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("answer").long("answer").required(true).help("yes|no|maybe")),
                ),
        )
        .subcommand(
            Command::new("messages")
                .about("League message feed")
                .subcommand(
                    Command::new("post")
                        .about("Post to the feed")
                        .arg(Arg::new("body").long("body").required(true)),
                )
                .subcommand(json_flags(
                    Command::new("list").about("Most recent messages").arg(
                        Arg::new("limit")
                            .long("limit")
                            .default_value("50")
                            .value_parser(value_parser!(usize)),
                    ),
                ))
                .subcommand(
                    Command::new("follow")
                        .about("Print new messages as they arrive")
                        .arg(
                            Arg::new("interval")
                                .long("interval")
                                .default_value("5")
                                .value_parser(value_parser!(u64))
                                .help("Seconds between polls"),
                        ),
                ),
        )
        .subcommand(
            Command::new("notify")
                .about("Push notifications")
                .subcommand(
                    Command::new("register")
                        .about("Register a device token for your team")
                        .arg(Arg::new("token").long("token").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Check league data for problems"))
}
