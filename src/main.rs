//! Group Cache demo
//!
//! Registers one cache group backed by a key/value source table, looks up the
//! requested keys in order and reports how often the slow source was hit.
//!
//! ```text
//! groupcache --capacity 2048 Tom Tom Jack Nobody
//! Tom=630
//! Tom=630
//! Jack=589
//! Nobody: error: Nobody not exist
//! loader calls: 3
//! ```

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use groupcache::{get_group, register, GroupConfig, Result, SourceTable};

// =============================================================================
// CLI Arguments
// =============================================================================

/// Group Cache - in-process LRU cache with load-through groups
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Group name
    #[arg(long, env = "GROUPCACHE_GROUP", default_value = "scores")]
    group: String,

    /// Cache capacity in bytes (0 = unbounded)
    #[arg(long, env = "GROUPCACHE_CAPACITY", default_value = "2048")]
    capacity: i64,

    /// JSON or YAML file mapping keys to values (defaults to a sample table)
    #[arg(long, env = "GROUPCACHE_SOURCE")]
    source: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,

    /// Keys to look up, in order
    keys: Vec<String>,
}

// =============================================================================
// Main
// =============================================================================

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args);

    let table = match &args.source {
        Some(path) => SourceTable::from_path(path)?,
        None => SourceTable::sample(),
    };

    info!("Starting Group Cache");
    info!("  Group: {}", args.group);
    info!("  Capacity: {} bytes", args.capacity);
    info!("  Source rows: {}", table.len());

    let loads = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&loads);
    let config = GroupConfig::new(args.group.clone(), args.capacity);

    register(&config, move |key: &str| {
        counter.fetch_add(1, Ordering::Relaxed);
        info!(key, "Searching source table");
        match table.get(key) {
            Some(value) => Ok(value.as_bytes().to_vec()),
            None => anyhow::bail!("{key} not exist"),
        }
    })?;

    let group = get_group(&args.group).ok_or_else(|| {
        groupcache::Error::Config(format!("group {} was not registered", args.group))
    })?;

    for key in &args.keys {
        match group.get(key) {
            Ok(value) => println!("{key}={value}"),
            Err(e) => println!("{key}: error: {e}"),
        }
    }

    println!("loader calls: {}", loads.load(Ordering::Relaxed));
    info!(
        entries = group.cached_len(),
        bytes = group.cached_bytes(),
        "Done"
    );
    Ok(())
}

// =============================================================================
// Logging
// =============================================================================

fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}
