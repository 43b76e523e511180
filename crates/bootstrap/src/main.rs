// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `bootstrap` — one-shot database schema and seed-data loader (spec
//! §4.7a). Run once before the first `tester`/`recorder` invocation
//! against a fresh database file; safe to re-run against an existing
//! one.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use endtoend_bootstrap::BootstrapError;
use std::path::PathBuf;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), BootstrapError> {
    let db_path = match parse_args() {
        ArgResult::DbPath(path) => path,
        ArgResult::PrintedAndExit => return Ok(()),
    };

    let log_guard = setup_logging()?;
    info!(db_path = %db_path, "starting bootstrap");

    endtoend_bootstrap::run(&db_path).await?;

    info!("bootstrap finished");
    drop(log_guard);
    Ok(())
}

enum ArgResult {
    DbPath(String),
    PrintedAndExit,
}

fn parse_args() -> ArgResult {
    match std::env::args().nth(1) {
        None => {
            eprintln!("error: missing required argument <db-path>");
            eprintln!("Usage: bootstrap <db-path>");
            std::process::exit(1);
        }
        Some(arg) => match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("bootstrap {}", env!("CARGO_PKG_VERSION"));
                ArgResult::PrintedAndExit
            }
            "--help" | "-h" | "help" => {
                println!("bootstrap {}", env!("CARGO_PKG_VERSION"));
                println!("One-shot schema creation and StateOrder seed for the endtoend database.");
                println!();
                println!("USAGE:");
                println!("    bootstrap <db-path>");
                println!();
                println!("OPTIONS:");
                println!("    -h, --help       Print help information");
                println!("    -v, --version    Print version information");
                ArgResult::PrintedAndExit
            }
            path => ArgResult::DbPath(path.to_string()),
        },
    }
}

fn setup_logging() -> Result<tracing_appender::non_blocking::WorkerGuard, BootstrapError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let log_path = PathBuf::from("bootstrap.log");
    let parent = log_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| std::path::Path::new("."));
    std::fs::create_dir_all(parent)?;

    let file_appender = tracing_appender::rolling::never(
        parent,
        log_path.file_name().ok_or_else(|| BootstrapError::NoLogDir(log_path.clone()))?,
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(guard)
}
