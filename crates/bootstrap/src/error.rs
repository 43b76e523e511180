// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Top-level error type for the `bootstrap` binary (spec §7a: binaries
//! aggregate their crate-boundary errors via `From`, no `anyhow`).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Db(#[from] endtoend_db::DbError),

    #[error("no log directory for path {0}")]
    NoLogDir(std::path::PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
