// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

mod cli;
pub mod config;
mod error;
mod get;
mod output;
mod query;
mod resources;
mod store;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::prelude::*;

use cli::{Args, Command, GetArgs};
use get::GetOptions;
use store::SqliteStore;

/// Initialize logging with file output and optional stderr
fn init_logging(verbose: bool) {
    use tracing_rolling_file::{RollingConditionBase, RollingFileAppenderBase};
    use tracing_subscriber::fmt::format::FmtSpan;

    let log_dir = config::base_dir()
        .map(|p| p.join("log"))
        .unwrap_or_else(|_| std::path::PathBuf::from("."));

    if let Err(e) = std::fs::create_dir_all(&log_dir) {
        eprintln!("Warning: Could not create log directory: {}", e);
        return;
    }

    // File appender with size-based rotation:
    // - Max 10MB per file
    // - Keep up to 5 files (total max ~50MB)
    // - Also rotate daily
    let log_path = log_dir.join("edgeadm.log");
    let condition = RollingConditionBase::new()
        .daily()
        .max_size(10 * 1024 * 1024);

    let file_appender = match RollingFileAppenderBase::new(log_path, condition, 5) {
        Ok(appender) => appender,
        Err(e) => {
            eprintln!("Warning: Could not create log file: {}", e);
            return;
        }
    };

    let (non_blocking, _guard) = file_appender.get_non_blocking_appender();
    // Leak the guard to keep the background writer alive
    std::mem::forget(_guard);

    let filter = if verbose { "edgeadm=debug" } else { "edgeadm=info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_span_events(FmtSpan::NONE);

    if verbose {
        let stderr_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::NONE);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .with(stderr_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .init();
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Always log to file (~/.edgeadm/log/edgeadm.log), and to stderr with -v
    init_logging(args.verbose);

    match args.command {
        Command::Get(get_args) => run_get(get_args),
    }
}

fn run_get(args: GetArgs) -> Result<()> {
    let config = config::Config::load()?;

    let options = GetOptions {
        namespace: config.resolve_namespace(args.namespace),
        all_namespaces: args.all_namespaces,
        selector: args.selector,
        output: args.output,
        no_headers: args.no_headers,
        show_labels: args.show_labels,
        database_path: config.resolve_database_path(args.input),
    };

    // Validation runs before the store is opened
    let plan = options.validate(&args.resources)?;
    debug!(?plan, "Validated request");

    let store = SqliteStore::open(&options.database_path)?;
    info!(path = %store.path().display(), "Querying edge database");

    let output = get::execute(&store, &plan, Utc::now())?;
    println!("{}", output.rendered);
    if let Some(notice) = output.notice {
        eprintln!("{}", notice);
    }

    Ok(())
}
