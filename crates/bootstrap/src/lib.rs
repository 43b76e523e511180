// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One-shot database bootstrapper (spec §4.7a): creates the schema if
//! absent and seeds the `StateOrder` table from the canonical in-memory
//! sequence. Idempotent — safe to run against an already-bootstrapped
//! database.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod error;

pub use error::BootstrapError;

use tracing::info;

/// Connect to (creating if absent) the database at `db_path`, then run
/// the schema bootstrap and `StateOrder` seed. Called once by the
/// `bootstrap` binary; re-running it against a live database is a
/// no-op beyond the `INSERT OR IGNORE`/`CREATE TABLE IF NOT EXISTS`
/// statements it issues.
pub async fn run(db_path: &str) -> Result<(), BootstrapError> {
    let pool = endtoend_db::connect(db_path).await?;
    endtoend_db::bootstrap_schema(&pool).await?;
    endtoend_db::seed_state_order(&pool).await?;
    info!(db_path, "bootstrap complete");
    Ok(())
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
