// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `tester` — the outer scheduling loop: waits for `runInterval` to
//! elapse, refreshes configuration from `configlocation` if stale,
//! enumerates this round's pairs, and drains them through the worker
//! pool (spec §4.1/§5).
//!
//! The concrete `OrchestratorClient`/`ProbeClient` wired in here are
//! the in-memory fakes behind their crates' `test-support` feature
//! (see `DESIGN.md`): a real wire client is explicitly out of scope
//! (spec §1) and reached only through the trait boundary. Likewise, no
//! concrete [`endtoend_tester::ConfigFetcher`] ships in this binary —
//! `configlocation` refresh is exercised in the library's test suite
//! against a scripted fetcher; a deployment wires its own.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod top_error;

use async_trait::async_trait;
use endtoend_core::{Clock, Config, SystemClock};
use endtoend_engine::Engine;
use endtoend_orchestrator_client::FakeOrchestratorClient;
use endtoend_probe_client::FakeProbeClient;
use endtoend_tester::{run_round, ConfigFetchError, ConfigFetcher, ConfigRefresher};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use top_error::TesterBinError;

/// No remote config source ships with this binary (spec §1 Non-goals);
/// a `configlocation` entry is honored by the refresh machinery but
/// every fetch attempt fails over to the last known good config.
struct UnconfiguredFetcher;

#[async_trait]
impl ConfigFetcher for UnconfiguredFetcher {
    async fn fetch(&self, _url: &str) -> Result<String, ConfigFetchError> {
        Err(ConfigFetchError::Fetch("no remote config fetcher wired into this binary".to_string()))
    }
}

#[tokio::main]
async fn main() -> Result<(), TesterBinError> {
    let config_path = match parse_args() {
        ArgResult::ConfigPath(path) => path,
        ArgResult::PrintedAndExit => return Ok(()),
    };

    let log_guard = setup_logging()?;
    info!(config = %config_path.display(), "starting tester");

    let config_text = std::fs::read_to_string(&config_path)?;
    let initial_config = Config::from_toml_str(&config_text)?;

    let clock = SystemClock;
    let starttime = clock.now_utc();
    let mut refresher = ConfigRefresher::new(UnconfiguredFetcher, initial_config, starttime);
    let mut nextrun = starttime;
    let mut any_unknown = false;

    loop {
        let now = clock.now_utc();
        if nextrun <= now {
            refresher.refresh_if_stale(&clock, any_unknown).await;
            let config = refresher.current().clone();
            nextrun = now + config.run_interval as i64;

            let orchestrator = FakeOrchestratorClient::new();
            let probe = FakeProbeClient::new();
            let engine = Arc::new(Engine::new(orchestrator, probe, clock, Arc::new(config.clone())));

            match run_round(engine, &config, starttime, nextrun).await {
                Ok(unknown) => any_unknown = unknown,
                Err(err) => error!(%err, "round failed"),
            }
        } else {
            let config = refresher.current();
            info!(sleep_secs = config.sleep_between_runs, nextrun, now, "sleeping, timer not passed");
            tokio::time::sleep(Duration::from_secs(config.sleep_between_runs)).await;
        }
    }
}

enum ArgResult {
    ConfigPath(PathBuf),
    PrintedAndExit,
}

fn parse_args() -> ArgResult {
    match std::env::args().nth(1) {
        None => {
            eprintln!("error: missing required argument <config-path>");
            eprintln!("Usage: tester <config-path>");
            std::process::exit(1);
        }
        Some(arg) => match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("tester {}", env!("CARGO_PKG_VERSION"));
                ArgResult::PrintedAndExit
            }
            "--help" | "-h" | "help" => {
                println!("tester {}", env!("CARGO_PKG_VERSION"));
                println!("Drives pair lifecycles against the Orchestrator on a timed outer loop.");
                println!();
                println!("USAGE:");
                println!("    tester <config-path>");
                println!();
                println!("OPTIONS:");
                println!("    -h, --help       Print help information");
                println!("    -v, --version    Print version information");
                ArgResult::PrintedAndExit
            }
            path => ArgResult::ConfigPath(PathBuf::from(path)),
        },
    }
}

fn setup_logging() -> Result<tracing_appender::non_blocking::WorkerGuard, TesterBinError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let log_path = PathBuf::from("tester.log");
    let parent = log_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| std::path::Path::new("."));
    std::fs::create_dir_all(parent)?;

    let file_appender = tracing_appender::rolling::never(
        parent,
        log_path.file_name().ok_or_else(|| TesterBinError::NoLogDir(log_path.clone()))?,
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(guard)
}
