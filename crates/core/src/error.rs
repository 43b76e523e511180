// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors shared across the core domain types (not the adapter-boundary
//! errors; those live in `orchestrator-client`/`probe-client`).

use thiserror::Error;

/// Errors raised while constructing or validating core domain values.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("malformed vlan range {0:?}: expected \"A-B\", a bare number, or \"any\"")]
    MalformedVlanRange(String),

    #[error("l3_request entry {0:?} is missing an ipv6_prefix")]
    MissingIpv6Prefix(String),

    #[error("unknown phase {0:?}")]
    UnknownPhase(String),

    #[error("unknown request type {0:?}")]
    UnknownRequestType(String),

    #[error("unknown config state {0:?}")]
    UnknownConfigState(String),
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
