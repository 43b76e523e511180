// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `recorder` — scans the tester's work directory on a 60 s timer,
//! parses each unprocessed artifact into the normalized tables, and
//! archives or re-sentinels the file (spec §4.6/§4.7/§5).
//!
//! The concrete `OrchestratorClient` wired in here is the in-memory
//! fake behind `endtoend-orchestrator-client`'s `test-support` feature
//! (see `DESIGN.md`): a real wire client is explicitly out of scope
//! (spec §1) and reached only through the trait boundary, so this
//! binary demonstrates the full pipeline against the reference
//! implementation. A production deployment swaps in its own client.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod top_error;

use endtoend_core::{Config, SystemClock};
use endtoend_orchestrator_client::FakeOrchestratorClient;
use std::path::PathBuf;
use std::time::Duration;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

use top_error::RecorderBinError;

#[tokio::main]
async fn main() -> Result<(), RecorderBinError> {
    let args = match parse_args() {
        ArgResult::Args(args) => args,
        ArgResult::PrintedAndExit => return Ok(()),
    };

    let log_guard = setup_logging()?;
    info!(config = %args.config_path.display(), db = %args.db_path, "starting recorder");

    let config_text = std::fs::read_to_string(&args.config_path)?;
    let config = Config::from_toml_str(&config_text)?;

    let pool = endtoend_db::connect(&args.db_path).await?;
    let orchestrator = FakeOrchestratorClient::new();
    let clock = SystemClock;

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut tick = tokio::time::interval(Duration::from_secs(60));

    loop {
        tokio::select! {
            _ = tick.tick() => {
                if let Err(err) = endtoend_recorder::run_cycle(&pool, &orchestrator, &clock, &config).await {
                    error!(%err, "recorder cycle failed");
                }
            }
            _ = sigterm.recv() => {
                info!("received SIGTERM, shutting down");
                break;
            }
            _ = sigint.recv() => {
                info!("received SIGINT, shutting down");
                break;
            }
        }
    }

    drop(log_guard);
    Ok(())
}

struct Args {
    config_path: PathBuf,
    db_path: String,
}

enum ArgResult {
    Args(Args),
    PrintedAndExit,
}

fn parse_args() -> ArgResult {
    let mut args = std::env::args().skip(1);
    match args.next() {
        None => {
            eprintln!("error: missing required arguments <config-path> <db-path>");
            eprintln!("Usage: recorder <config-path> <db-path>");
            std::process::exit(1);
        }
        Some(arg) => match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("recorder {}", env!("CARGO_PKG_VERSION"));
                ArgResult::PrintedAndExit
            }
            "--help" | "-h" | "help" => {
                println!("recorder {}", env!("CARGO_PKG_VERSION"));
                println!("Scans the work directory every 60s and records artifacts into the database.");
                println!();
                println!("USAGE:");
                println!("    recorder <config-path> <db-path>");
                println!();
                println!("OPTIONS:");
                println!("    -h, --help       Print help information");
                println!("    -v, --version    Print version information");
                ArgResult::PrintedAndExit
            }
            config_path => {
                let Some(db_path) = args.next() else {
                    eprintln!("error: missing required argument <db-path>");
                    eprintln!("Usage: recorder <config-path> <db-path>");
                    std::process::exit(1);
                };
                ArgResult::Args(Args { config_path: PathBuf::from(config_path), db_path })
            }
        },
    }
}

fn setup_logging() -> Result<tracing_appender::non_blocking::WorkerGuard, RecorderBinError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let log_path = PathBuf::from("recorder.log");
    let parent = log_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| std::path::Path::new("."));
    std::fs::create_dir_all(parent)?;

    let file_appender = tracing_appender::rolling::never(
        parent,
        log_path.file_name().ok_or_else(|| RecorderBinError::NoLogDir(log_path.clone()))?,
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(guard)
}
