//! promrag CLI: index and search Prometheus metric metadata.
//!
//! `promrag [flags] COMMAND`, one command per invocation. Logs go to
//! stderr, results to stdout.

mod commands;
mod format;

use std::path::{Path, PathBuf};
use std::process;

use clap::ArgMatches;
use promrag::{open_vector_db, MetricMetadata, VectorDbClient, VectorDbConfig};
use tracing_subscriber::EnvFilter;

use commands::build_cli;
use format::{format_error, format_results, OutputMode};

fn main() {
    let matches = build_cli().get_matches();

    init_logging(matches.get_count("verbose"));

    let mode = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    if let Err(e) = run(&matches, mode) {
        eprintln!("{}", format_error(&e, mode));
        process::exit(1);
    }
}

fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run(matches: &ArgMatches, mode: OutputMode) -> Result<(), String> {
    // `init-config` runs before any database is opened.
    if let Some(("init-config", sub)) = matches.subcommand() {
        let path = required(sub, "file")?;
        VectorDbConfig::write_default_if_missing(Path::new(path)).map_err(|e| e.to_string())?;
        println!("{}", path);
        return Ok(());
    }

    let config = load_config(matches)?;
    let db =
        open_vector_db(&config).map_err(|e| format!("Failed to open vector database: {}", e))?;

    let result = dispatch(matches, db.as_ref(), mode);
    let closed = db.close().map_err(|e| e.to_string());
    result.and(closed)
}

fn dispatch(matches: &ArgMatches, db: &dyn VectorDbClient, mode: OutputMode) -> Result<(), String> {
    match matches.subcommand() {
        Some(("index", sub)) => {
            let path = required(sub, "file")?;
            let batch = read_metadata(Path::new(path))?;
            db.add_batch(&batch).map_err(|e| e.to_string())?;
            println!("indexed {} metrics", batch.len());
        }
        Some(("search", sub)) => {
            let query = required(sub, "query")?;
            let limit = sub.get_one::<usize>("limit").copied().unwrap_or(10);
            let results = db.search(query, limit).map_err(|e| e.to_string())?;
            println!("{}", format_results(&results, mode));
        }
        Some(("drop", _)) => {
            db.delete_collection().map_err(|e| e.to_string())?;
            println!("dropped");
        }
        Some((other, _)) => return Err(format!("unknown command '{}'", other)),
        None => return Err("no command given".to_string()),
    }
    Ok(())
}

/// File (if any), then `PRAG_VECTORDB_*`, then command-line flags.
fn load_config(matches: &ArgMatches) -> Result<VectorDbConfig, String> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => VectorDbConfig::from_file(Path::new(path)).map_err(|e| e.to_string())?,
        None => VectorDbConfig::default(),
    };
    config.apply_env_overrides().map_err(|e| e.to_string())?;

    if let Some(provider) = matches.get_one::<String>("provider") {
        config.provider = provider.clone();
    }
    if let Some(collection) = matches.get_one::<String>("collection") {
        config.collection = collection.clone();
    }
    if let Some(db) = matches.get_one::<String>("db") {
        config.sqlite3.db_path = PathBuf::from(db);
    }

    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn read_metadata(path: &Path) -> Result<Vec<MetricMetadata>, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read {}: {}", path.display(), e))?;
    serde_json::from_str(&content)
        .map_err(|e| format!("invalid metadata in {}: {}", path.display(), e))
}

fn required<'a>(matches: &'a ArgMatches, id: &str) -> Result<&'a str, String> {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .ok_or_else(|| format!("missing argument '{}'", id))
}
