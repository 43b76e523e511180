// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! `endtoend-db`: the one SQL-issuing crate. SQLite via `sqlx`,
//! connection-per-operation with autocommit (spec §7a), schema and seed
//! data transcribed from the original `dbcalls.py` literals (spec
//! §4.7a).

mod error;
mod pool;
mod repo;
pub mod schema;

pub use error::DbError;
pub use pool::{bootstrap_schema, connect, seed_state_order};
pub use repo::{
    delete_locked_request, get_request, get_request_by_natural_key, insert_action,
    insert_locked_request, insert_ping_result, insert_request, insert_request_state,
    insert_verification, list_locked_requests, update_request_fileloc, upsert_runner_info,
};

pub use sqlx::SqlitePool;
