// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Top-level error type for the tester (spec §7a): one variant per
//! crate boundary the outer loop reaches through, plus the I/O
//! failures specific to the heartbeat writer.

use endtoend_engine::EngineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TesterError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
