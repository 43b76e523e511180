// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Binary-level error type: wraps library errors plus the concerns
//! that only exist at the process boundary (config loading, logging).

use endtoend_core::ConfigError;
use endtoend_tester::TesterError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TesterBinError {
    #[error(transparent)]
    Tester(#[from] TesterError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("no log directory for path {0}")]
    NoLogDir(std::path::PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
