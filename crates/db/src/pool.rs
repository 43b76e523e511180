// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Connection-per-operation access to the SQLite store (spec §7a: "the
//! database is accessed through a connection-per-operation pattern with
//! autocommit; operations that require multi-statement atomicity are
//! gated by `CREATE TABLE IF NOT EXISTS`").

use crate::error::DbError;
use crate::schema;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::info;

/// Open (creating if absent) a SQLite database at `path` and return a
/// pool. Does not run the schema bootstrap — callers that need tables
/// to exist call [`bootstrap`] explicitly (spec §4.7a: the bootstrapper
/// is a distinct, one-shot step from ordinary connection use).
pub async fn connect(path: &str) -> Result<SqlitePool, DbError> {
    let options = SqliteConnectOptions::from_str(&format!("sqlite://{path}"))?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().max_connections(8).connect_with(options).await?;
    Ok(pool)
}

/// Run every `CREATE TABLE IF NOT EXISTS` / `CREATE UNIQUE INDEX IF NOT
/// EXISTS` statement in [`schema::ALL`]. Idempotent: safe to call on
/// every bootstrapper invocation (spec §4.7a).
pub async fn bootstrap_schema(pool: &SqlitePool) -> Result<(), DbError> {
    for statement in schema::ALL {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("schema bootstrap complete");
    Ok(())
}

/// Seed the `StateOrder` table from the canonical in-memory sequence
/// (spec §3a, §4.7a). `INSERT OR IGNORE` makes re-running the
/// bootstrapper against an already-seeded database a no-op.
pub async fn seed_state_order(pool: &SqlitePool) -> Result<(), DbError> {
    for entry in endtoend_core::state_order_sequence() {
        sqlx::query(
            "INSERT OR IGNORE INTO stateorder (state, action, configstate, orderid) VALUES (?, ?, ?, ?)",
        )
        .bind(entry.state)
        .bind(entry.phase.as_str())
        .bind(entry.configstate.as_str())
        .bind(entry.orderid)
        .execute(pool)
        .await?;
    }
    info!("stateorder seed complete");
    Ok(())
}

#[cfg(test)]
#[path = "pool_tests.rs"]
mod tests;
