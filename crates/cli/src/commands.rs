//! Clap command tree definition.

use clap::{Arg, ArgAction, Command};

/// Build the complete CLI command tree.
pub fn build_cli() -> Command {
    Command::new("promrag")
        .about("Index and search Prometheus metric metadata by meaning")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .help("Path to promrag.toml (default: built-in defaults)")
                .global(true),
        )
        .arg(
            Arg::new("provider")
                .long("provider")
                .help("Backend: sqlite3 or qdrant")
                .global(true),
        )
        .arg(
            Arg::new("collection")
                .long("collection")
                .help("Collection name")
                .global(true),
        )
        .arg(
            Arg::new("db")
                .long("db")
                .help("SQLite database path (sqlite3 provider)")
                .global(true),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("JSON output mode")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Increase log verbosity (-v info, -vv debug)")
                .action(ArgAction::Count)
                .global(true),
        )
        .subcommand(
            Command::new("index")
                .about("Add metrics from a JSON array of metadata objects")
                .arg(Arg::new("file").required(true).help("JSON file to index")),
        )
        .subcommand(
            Command::new("search")
                .about("Rank stored metrics against a free-text query")
                .arg(Arg::new("query").required(true).help("Query text"))
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .short('n')
                        .help("Maximum number of results")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("10"),
                ),
        )
        .subcommand(Command::new("drop").about("Delete the collection"))
        .subcommand(
            Command::new("init-config")
                .about("Write a default promrag.toml if none exists")
                .arg(Arg::new("file").required(true).help("Destination path")),
        )
}
